use std::sync::Arc;
use std::sync::Mutex;

use auth::Authenticator;
use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use identity_service::domain::auth::ports::Clock;
use identity_service::domain::auth::service::AuthService;
use identity_service::domain::user::service::UserService;
use identity_service::inbound::http::router::create_router;
use identity_service::repositories::memory::InMemoryUserRepository;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Clock the tests move by hand.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub authenticator: Authenticator,
}

impl TestApp {
    /// Fixed starting instant for every test app.
    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let clock = Arc::new(ManualClock::at(Self::t0()));
        let lookup_timeout = std::time::Duration::from_secs(5);

        let user_service = Arc::new(UserService::new(Arc::clone(&repository), lookup_timeout));
        let auth_service = Arc::new(
            AuthService::new(
                repository,
                Arc::new(Authenticator::new(TEST_SECRET)),
                Arc::clone(&clock),
            )
            .with_lookup_timeout(lookup_timeout),
        );

        let router = create_router(
            user_service,
            auth_service,
            std::time::Duration::from_secs(30),
        );

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            clock,
            authenticator: Authenticator::new(TEST_SECRET),
        }
    }

    /// Move the server clock to `t0 + offset`.
    pub fn advance_to(&self, offset: Duration) {
        self.clock.set(Self::t0() + offset);
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register a user through the public route and return its id.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .post("/api/v1/auth/register")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Log in and return the raw response.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the bearer token.
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let response = self.login(email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"].as_str().unwrap().to_string()
    }
}
