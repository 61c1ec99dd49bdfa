use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::ClaimSet;
use auth::RefreshError;
use chrono::Duration;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthenticatedIdentity;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::IssuedToken;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::Clock;
use crate::domain::user::deadline::with_deadline;
use crate::domain::user::models::EmailAddress;
use crate::user::ports::UserRepository;

/// Token lifecycle service: login, refresh and per-request authorization.
///
/// Holds no session state. Every expiry decision is computed from the
/// timestamps inside the presented token and the injected clock.
pub struct AuthService<UR, C>
where
    UR: UserRepository,
    C: Clock,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    clock: Arc<C>,
    token_ttl: Duration,
    lookup_timeout: StdDuration,
}

impl<UR, C> AuthService<UR, C>
where
    UR: UserRepository,
    C: Clock,
{
    pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
    pub const DEFAULT_LOOKUP_TIMEOUT: StdDuration = StdDuration::from_secs(5);

    /// Create an auth service issuing 24 hour tokens.
    ///
    /// # Arguments
    /// * `repository` - User lookup used by login
    /// * `authenticator` - Shared signing keys, credential verifier and policy
    /// * `clock` - Source of the current time
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>, clock: Arc<C>) -> Self {
        Self {
            repository,
            authenticator,
            clock,
            token_ttl: Duration::hours(Self::DEFAULT_TOKEN_TTL_HOURS),
            lookup_timeout: Self::DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    pub fn with_lookup_timeout(mut self, lookup_timeout: StdDuration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Run password work on the blocking pool; argon2 holds a core for
    /// tens of milliseconds.
    async fn run_blocking<T, F>(&self, work: F) -> Result<T, AuthError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || work(&authenticator))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Credential check task failed");
                AuthError::Internal(format!("credential check task failed: {}", e))
            })
    }

    /// Equalize the cost of a rejection that never reached a stored hash.
    async fn reject_without_account(&self, password: String) -> AuthError {
        match self
            .run_blocking(move |authenticator| authenticator.reject_unknown(&password))
            .await
        {
            Ok(_) => AuthError::AuthenticationFailed,
            Err(e) => e,
        }
    }

    fn sign(&self, claims: &ClaimSet) -> Result<IssuedToken, AuthError> {
        let token = self.authenticator.issue_token(claims).map_err(|e| {
            tracing::error!(error = %e, "Token signing failed");
            AuthError::Internal(e.to_string())
        })?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at,
        })
    }
}

#[async_trait]
impl<UR, C> AuthServicePort for AuthService<UR, C>
where
    UR: UserRepository,
    C: Clock,
{
    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AuthError> {
        let Credentials { email, password } = credentials;

        let Ok(email) = EmailAddress::new(email) else {
            tracing::debug!("Login rejected: email does not parse");
            return Err(self.reject_without_account(password).await);
        };

        let user = with_deadline(
            self.lookup_timeout,
            "find_user_by_email",
            self.repository.find_by_email(email.as_str()),
        )
        .await?;

        let Some(user) = user else {
            tracing::debug!("Login rejected: no user with this email");
            return Err(self.reject_without_account(password).await);
        };

        let claims = ClaimSet::new(
            user.id.to_string(),
            user.email.as_str(),
            self.clock.now(),
            self.token_ttl,
        );
        let expires_at = claims.expires_at;
        let stored_hash = user.password_hash;

        let outcome = self
            .run_blocking(move |authenticator| {
                authenticator.authenticate(&password, &stored_hash, &claims)
            })
            .await?;

        match outcome {
            Ok(token) => {
                tracing::info!(user_id = %user.id, "Login succeeded");
                Ok(IssuedToken { token, expires_at })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
                Err(AuthError::AuthenticationFailed)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::warn!(user_id = %user.id, error = %e, "Login rejected: stored hash unreadable");
                Err(AuthError::AuthenticationFailed)
            }
            Err(AuthenticationError::TokenError(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "Token signing failed");
                Err(AuthError::Internal(e.to_string()))
            }
        }
    }

    async fn refresh_token(&self, token: &str) -> Result<IssuedToken, AuthError> {
        let claims = self.authenticator.decode_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh rejected: token did not verify");
            AuthError::from(e)
        })?;

        let now = self.clock.now();
        self.authenticator
            .check_refresh(&claims, now)
            .map_err(|e| {
                tracing::debug!(user_id = %claims.subject, reason = %e, "Refresh rejected");
                match e {
                    RefreshError::NotYetEligible => AuthError::NotEligibleForRefresh,
                    RefreshError::TooOld => AuthError::TokenTooOld,
                }
            })?;

        let issued = self.sign(&claims.renewed(now, self.token_ttl))?;
        tracing::info!(user_id = %claims.subject, "Token refreshed");

        Ok(issued)
    }

    fn authorize(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let claims = self.authenticator.decode_token(token)?;

        if !self.authenticator.is_live(&claims, self.clock.now()) {
            return Err(AuthError::Expired);
        }

        Ok(AuthenticatedIdentity {
            user_id: claims.subject,
        })
    }
}
