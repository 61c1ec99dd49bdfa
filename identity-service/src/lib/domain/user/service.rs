use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::CredentialVerifier;
use chrono::Utc;

use crate::domain::user::deadline::with_deadline;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Page;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    credential_verifier: CredentialVerifier,
    lookup_timeout: Duration,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `lookup_timeout` - Deadline applied to every repository call
    pub fn new(repository: Arc<UR>, lookup_timeout: Duration) -> Self {
        Self {
            repository,
            credential_verifier: CredentialVerifier::new(),
            lookup_timeout,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<UserProfile, UserError> {
        let CreateUserCommand {
            name,
            email,
            password,
        } = command;

        let verifier = self.credential_verifier;
        let password_hash = tokio::task::spawn_blocking(move || verifier.hash(password.expose()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing task failed");
                UserError::Unknown(format!("Password hashing task failed: {}", e))
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                UserError::Unknown(format!("Password hashing failed: {}", e))
            })?;

        let user = User {
            id: UserId::new(),
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = with_deadline(
            self.lookup_timeout,
            "create_user",
            self.repository.create(user),
        )
        .await?;

        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(UserProfile::from(&created_user))
    }

    async fn get_user(&self, id: &UserId) -> Result<UserProfile, UserError> {
        with_deadline(
            self.lookup_timeout,
            "find_user_by_id",
            self.repository.find_by_id(id),
        )
        .await?
        .map(|ref user| UserProfile::from(user))
        .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self, page: Page) -> Result<Vec<UserProfile>, UserError> {
        let users = with_deadline(self.lookup_timeout, "list_users", self.repository.list(&page))
            .await?;

        Ok(users.iter().map(UserProfile::from).collect())
    }
}
