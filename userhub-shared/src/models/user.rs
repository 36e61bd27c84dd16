/// User model and account lifecycle
///
/// This module provides the User model, its status, and the in-memory state
/// transitions applied before a user is persisted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     nickname VARCHAR(50) NOT NULL,
///     address VARCHAR(255),
///     certification_code VARCHAR(64) NOT NULL,
///     status TEXT NOT NULL DEFAULT 'PENDING',
///     last_login_at BIGINT
/// );
/// ```
///
/// # Lifecycle
///
/// ```text
/// create ──> PENDING ──(matching certification code)──> ACTIVE
/// ```
///
/// INACTIVE accounts cannot be certified.
///
/// # Example
///
/// ```
/// use userhub_shared::models::user::{User, UserStatus};
///
/// let mut user = User {
///     id: 1,
///     email: "user@example.com".to_string(),
///     nickname: "bob".to_string(),
///     address: None,
///     certification_code: "code".to_string(),
///     status: UserStatus::Pending,
///     last_login_at: None,
/// };
///
/// user.certify("code").unwrap();
/// assert_eq!(user.status, UserStatus::Active);
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    /// Email certified, account usable
    Active,

    /// Disabled account
    Inactive,

    /// Created but email not yet certified
    Pending,
}

impl UserStatus {
    /// Returns the status as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Pending => "PENDING",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(UserStatus::Active),
            "INACTIVE" => Ok(UserStatus::Inactive),
            "PENDING" => Ok(UserStatus::Pending),
            other => Err(format!("Invalid user status: {}", other)),
        }
    }
}

/// User model representing an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Storage-assigned identifier
    pub id: i64,

    /// Email address, unique across all users
    pub email: String,

    /// Display name
    pub nickname: String,

    /// Optional postal address
    pub address: Option<String>,

    /// Code mailed to the user at creation; presenting it certifies the email
    pub certification_code: String,

    /// Lifecycle status
    pub status: UserStatus,

    /// Last login as epoch milliseconds (None if never logged in)
    pub last_login_at: Option<i64>,
}

/// Input for inserting a new user
///
/// The id is assigned by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub nickname: String,
    pub address: Option<String>,
    pub certification_code: String,
    pub status: UserStatus,
}

/// Command for creating a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    /// Email address the certification mail is sent to
    pub email: String,

    /// Display name
    pub nickname: String,

    /// Optional postal address
    pub address: Option<String>,
}

/// Partial profile update
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New display name
    pub nickname: Option<String>,

    /// New postal address
    pub address: Option<String>,
}

/// Why a certification attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CertificationError {
    /// Presented code differs from the stored one
    #[error("Certification code does not match")]
    CodeMismatch,

    /// Inactive accounts cannot be re-activated by certification
    #[error("Account is inactive")]
    Inactive,
}

impl User {
    /// Applies a partial update, leaving absent fields untouched
    pub fn apply_update(&mut self, update: &UserUpdate) {
        if let Some(nickname) = &update.nickname {
            self.nickname = nickname.clone();
        }
        if let Some(address) = &update.address {
            self.address = Some(address.clone());
        }
    }

    /// Certifies the account with the given code
    ///
    /// A PENDING user with a matching code becomes ACTIVE. Certifying an
    /// already ACTIVE user with its own code is a no-op.
    ///
    /// # Errors
    ///
    /// - `CodeMismatch` if `code` differs from the stored certification code
    /// - `Inactive` if the account has been disabled
    pub fn certify(&mut self, code: &str) -> Result<(), CertificationError> {
        if self.certification_code != code {
            return Err(CertificationError::CodeMismatch);
        }

        match self.status {
            UserStatus::Pending => {
                self.status = UserStatus::Active;
                Ok(())
            }
            UserStatus::Active => Ok(()),
            UserStatus::Inactive => Err(CertificationError::Inactive),
        }
    }

    /// Records a login at `now_millis` (epoch milliseconds)
    pub fn touch_login(&mut self, now_millis: i64) {
        self.last_login_at = Some(now_millis);
    }

    /// Whether the account is ACTIVE
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_user() -> User {
        User {
            id: 11,
            email: "pending@example.com".to_string(),
            nickname: "pending".to_string(),
            address: Some("Busan".to_string()),
            certification_code: "abcdefgh-ijkl-mnop-qrst-uvwxyzabcdeg".to_string(),
            status: UserStatus::Pending,
            last_login_at: None,
        }
    }

    #[test]
    fn test_status_roundtrip_strings() {
        for status in [UserStatus::Active, UserStatus::Inactive, UserStatus::Pending] {
            assert_eq!(status.as_str().parse::<UserStatus>().unwrap(), status);
        }
        assert!("active".parse::<UserStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&UserStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
    }

    #[test]
    fn test_certify_pending_with_matching_code() {
        let mut user = pending_user();
        user.certify("abcdefgh-ijkl-mnop-qrst-uvwxyzabcdeg").unwrap();
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn test_certify_with_wrong_code_keeps_status() {
        let mut user = pending_user();
        let err = user.certify("abcdefgh-ijkl-mnop-qrst").unwrap_err();
        assert_eq!(err, CertificationError::CodeMismatch);
        assert_eq!(user.status, UserStatus::Pending);
    }

    #[test]
    fn test_certify_active_is_noop() {
        let mut user = pending_user();
        user.status = UserStatus::Active;
        user.certify("abcdefgh-ijkl-mnop-qrst-uvwxyzabcdeg").unwrap();
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn test_certify_inactive_is_rejected() {
        let mut user = pending_user();
        user.status = UserStatus::Inactive;
        let err = user
            .certify("abcdefgh-ijkl-mnop-qrst-uvwxyzabcdeg")
            .unwrap_err();
        assert_eq!(err, CertificationError::Inactive);
        assert_eq!(user.status, UserStatus::Inactive);
    }

    #[test]
    fn test_apply_update_is_partial() {
        let mut user = pending_user();
        user.apply_update(&UserUpdate {
            nickname: Some("pool".to_string()),
            address: None,
        });
        assert_eq!(user.nickname, "pool");
        assert_eq!(user.address.as_deref(), Some("Busan"));

        user.apply_update(&UserUpdate {
            nickname: None,
            address: Some("Seoul".to_string()),
        });
        assert_eq!(user.nickname, "pool");
        assert_eq!(user.address.as_deref(), Some("Seoul"));
    }

    #[test]
    fn test_touch_login() {
        let mut user = pending_user();
        user.touch_login(1_700_000_000_000);
        assert_eq!(user.last_login_at, Some(1_700_000_000_000));
    }
}
