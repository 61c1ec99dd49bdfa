use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Page;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated command containing name, email, and password
    ///
    /// # Returns
    /// Public profile of the created user
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Cancelled` - User store did not answer before the deadline
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<UserProfile, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Cancelled` - User store did not answer before the deadline
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<UserProfile, UserError>;

    /// List users ordered by creation time.
    ///
    /// # Errors
    /// * `Cancelled` - User store did not answer before the deadline
    /// * `DatabaseError` - Database operation failed
    async fn list_users(&self, page: Page) -> Result<Vec<UserProfile>, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve one page of users, oldest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(&self, page: &Page) -> Result<Vec<User>, UserError>;
}
