/// User account service
///
/// Orchestrates the account lifecycle on top of a [`UserRepository`] and a
/// [`MailSender`]:
///
/// ```text
/// create ─> PENDING ─(mail with certification link)─> verify_email ─> ACTIVE
///                                                                      │
///                         get_by_id / get_by_email / update / login <──┘
/// ```
///
/// Lookups, updates, and logins only see ACTIVE users. Certification looks the
/// user up regardless of status so that a PENDING account can be activated.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use userhub_shared::mail::MemoryMailSender;
/// use userhub_shared::models::user::{UserCreate, UserStatus};
/// use userhub_shared::repository::InMemoryUserRepository;
/// use userhub_shared::service::UserService;
///
/// # async fn example() -> Result<(), userhub_shared::service::ServiceError> {
/// let service = UserService::new(
///     Arc::new(InMemoryUserRepository::new()),
///     Arc::new(MemoryMailSender::new()),
///     "http://localhost:8080",
/// );
///
/// let user = service
///     .create(UserCreate {
///         email: "user@example.com".to_string(),
///         nickname: "bob".to_string(),
///         address: None,
///     })
///     .await?;
/// assert_eq!(user.status, UserStatus::Pending);
///
/// service.verify_email(user.id, &user.certification_code).await?;
/// assert!(service.get_by_id(user.id).await?.is_active());
/// # Ok(())
/// # }
/// ```

use crate::mail::{self, MailSender};
use crate::models::user::{CertificationError, NewUser, User, UserCreate, UserStatus, UserUpdate};
use crate::repository::{RepositoryError, UserRepository};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Resource name used in not-found errors
pub const USERS_RESOURCE: &str = "Users";

/// Service errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No matching (ACTIVE) resource
    #[error("Could not find {resource} with ID {id}")]
    NotFound { resource: &'static str, id: String },

    /// Certification code did not match the stored one
    #[error("Certification failed")]
    CertificationCodeNotMatched,

    /// The account is inactive and cannot be certified
    #[error("Account is inactive")]
    InactiveAccount,

    /// Email already registered
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// Storage failure
    #[error(transparent)]
    Repository(RepositoryError),
}

impl ServiceError {
    fn user_not_found(id: impl fmt::Display) -> Self {
        ServiceError::NotFound {
            resource: USERS_RESOURCE,
            id: id.to_string(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail(email) => ServiceError::DuplicateEmail(email),
            RepositoryError::NotFound(id) => ServiceError::user_not_found(id),
            other => ServiceError::Repository(other),
        }
    }
}

impl From<CertificationError> for ServiceError {
    fn from(err: CertificationError) -> Self {
        match err {
            CertificationError::CodeMismatch => ServiceError::CertificationCodeNotMatched,
            CertificationError::Inactive => ServiceError::InactiveAccount,
        }
    }
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// User account operations
///
/// Cheap to clone; clones share the repository and mail sender.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    mail_sender: Arc<dyn MailSender>,
    public_base_url: Arc<str>,
}

impl UserService {
    /// Creates a service
    ///
    /// `public_base_url` is the externally reachable origin of this server,
    /// used to build certification links.
    pub fn new(
        repository: Arc<dyn UserRepository>,
        mail_sender: Arc<dyn MailSender>,
        public_base_url: &str,
    ) -> Self {
        Self {
            repository,
            mail_sender,
            public_base_url: Arc::from(public_base_url),
        }
    }

    /// Gets an ACTIVE user by ID
    ///
    /// # Errors
    ///
    /// `NotFound` if the user doesn't exist or isn't ACTIVE
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<User> {
        self.repository
            .find_by_id_and_status(id, UserStatus::Active)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(id))
    }

    /// Gets an ACTIVE user by email
    ///
    /// # Errors
    ///
    /// `NotFound` if the user doesn't exist or isn't ACTIVE
    pub async fn get_by_email(&self, email: &str) -> ServiceResult<User> {
        self.repository
            .find_by_email_and_status(email, UserStatus::Active)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(email))
    }

    /// Creates a PENDING user and mails the certification link
    ///
    /// A delivery failure is logged; the account is still created.
    ///
    /// # Errors
    ///
    /// `DuplicateEmail` if the email is already registered
    pub async fn create(&self, data: UserCreate) -> ServiceResult<User> {
        let user = self
            .repository
            .insert(NewUser {
                email: data.email,
                nickname: data.nickname,
                address: data.address,
                certification_code: Uuid::new_v4().to_string(),
                status: UserStatus::Pending,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "User created");

        let url = mail::verify_url(&self.public_base_url, user.id, &user.certification_code);
        let message = mail::certification_message(&user.email, &url);
        if let Err(e) = self.mail_sender.send(message).await {
            warn!(user_id = user.id, error = %e, "Failed to send certification mail");
        }

        Ok(user)
    }

    /// Applies a partial update to an ACTIVE user
    pub async fn update(&self, id: i64, update: UserUpdate) -> ServiceResult<User> {
        let saved = self
            .repository
            .update_profile(id, &update)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(id))?;
        debug!(user_id = saved.id, "User profile updated");
        Ok(saved)
    }

    /// Applies a partial update to the ACTIVE user owning `email`
    pub async fn update_by_email(&self, email: &str, update: UserUpdate) -> ServiceResult<User> {
        let user = self.get_by_email(email).await?;
        self.update(user.id, update).await
    }

    /// Records a login for an ACTIVE user
    ///
    /// Only `last_login_at` is written, so a concurrent profile update is kept.
    pub async fn login(&self, id: i64) -> ServiceResult<User> {
        let saved = self
            .repository
            .record_login(id, Utc::now().timestamp_millis())
            .await?
            .ok_or_else(|| ServiceError::user_not_found(id))?;
        debug!(user_id = saved.id, last_login_at = ?saved.last_login_at, "User logged in");
        Ok(saved)
    }

    /// Certifies a user's email, moving a PENDING account to ACTIVE
    ///
    /// # Errors
    ///
    /// - `NotFound` if no user has `id`
    /// - `CertificationCodeNotMatched` if `code` is wrong
    /// - `InactiveAccount` if the account is disabled
    pub async fn verify_email(&self, id: i64, code: &str) -> ServiceResult<User> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(id))?;

        let previous = user.status;
        if let Err(e) = user.certify(code) {
            warn!(user_id = id, error = %e, "Email certification rejected");
            return Err(e.into());
        }

        let saved = self.repository.save(&user).await?;
        info!(user_id = id, from = %previous, to = %saved.status, "Email certified");
        Ok(saved)
    }

    /// Returns the ACTIVE user owning `email` after recording a login
    pub async fn my_info(&self, email: &str) -> ServiceResult<User> {
        let user = self.get_by_email(email).await?;
        self.login(user.id).await
    }

    /// Checks that storage is reachable
    pub async fn check_storage(&self) -> ServiceResult<()> {
        self.repository.ping().await?;
        Ok(())
    }
}
