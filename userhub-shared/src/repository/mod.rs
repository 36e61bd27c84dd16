/// User storage
///
/// This module defines the storage contract the user service depends on and
/// ships two implementations:
///
/// - [`PgUserRepository`]: PostgreSQL via sqlx
/// - [`InMemoryUserRepository`]: process-local map, used by tests and local runs
///
/// # Status-filtered lookups
///
/// `find_by_id_and_status` and `find_by_email_and_status` treat a user whose
/// status differs from the requested one as absent, so callers never see
/// PENDING accounts through an ACTIVE lookup.
///
/// # Example
///
/// ```
/// use userhub_shared::models::user::{NewUser, UserStatus};
/// use userhub_shared::repository::{InMemoryUserRepository, UserRepository};
///
/// # async fn example() -> Result<(), userhub_shared::repository::RepositoryError> {
/// let repo = InMemoryUserRepository::new();
/// let user = repo
///     .insert(NewUser {
///         email: "user@example.com".to_string(),
///         nickname: "bob".to_string(),
///         address: None,
///         certification_code: "code".to_string(),
///         status: UserStatus::Pending,
///     })
///     .await?;
///
/// assert!(repo
///     .find_by_id_and_status(user.id, UserStatus::Active)
///     .await?
///     .is_none());
/// # Ok(())
/// # }
/// ```

use crate::models::user::{NewUser, User, UserStatus, UserUpdate};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Another user already owns this email
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// The user to save does not exist
    #[error("User {0} not found")]
    NotFound(i64),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage contract for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by ID regardless of status
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;

    /// Finds a user by ID only if it currently has `status`
    async fn find_by_id_and_status(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>, RepositoryError>;

    /// Finds a user by email only if it currently has `status`
    async fn find_by_email_and_status(
        &self,
        email: &str,
        status: UserStatus,
    ) -> Result<Option<User>, RepositoryError>;

    /// Inserts a new user and returns it with its assigned ID
    ///
    /// # Errors
    ///
    /// `DuplicateEmail` if the email is already registered
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Persists every mutable field of an existing user
    ///
    /// # Errors
    ///
    /// `NotFound` if no user has `user.id`
    async fn save(&self, user: &User) -> Result<User, RepositoryError>;

    /// Writes the present fields of `update` to an ACTIVE user
    ///
    /// Absent fields keep their stored value. Returns `None` if no ACTIVE
    /// user has `id`.
    async fn update_profile(
        &self,
        id: i64,
        update: &UserUpdate,
    ) -> Result<Option<User>, RepositoryError>;

    /// Sets `last_login_at` of an ACTIVE user, leaving other columns alone
    ///
    /// Returns `None` if no ACTIVE user has `id`.
    async fn record_login(&self, id: i64, at_millis: i64) -> Result<Option<User>, RepositoryError>;

    /// Verifies the storage backend is reachable
    async fn ping(&self) -> Result<(), RepositoryError>;
}
