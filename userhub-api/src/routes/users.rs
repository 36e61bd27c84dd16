/// User account endpoints
///
/// # Endpoints
///
/// - `POST /api/users` - Create an account (PENDING) and mail the certification link
/// - `GET  /api/users/:id` - Get an ACTIVE user
/// - `GET  /api/users/:id/verify?certificationCode=...` - Certify email, redirect to frontend
/// - `GET  /api/users/me` - Get own profile (records a login; requires `EMAIL` header)
/// - `PUT  /api/users/me` - Update own nickname/address (requires `EMAIL` header)
///
/// JSON bodies use camelCase field names.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::identity::CallerEmail,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use userhub_shared::models::user::{User, UserCreate, UserStatus, UserUpdate};
use validator::Validate;

/// Create user request
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateRequest {
    /// Email address the certification link is sent to
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    /// Display name
    #[validate(length(min = 1, max = 50, message = "Nickname must be 1-50 characters"))]
    pub nickname: String,

    /// Optional postal address
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
}

impl From<UserCreateRequest> for UserCreate {
    fn from(req: UserCreateRequest) -> Self {
        UserCreate {
            email: req.email,
            nickname: req.nickname,
            address: req.address,
        }
    }
}

/// Update profile request
///
/// Absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    #[validate(length(min = 1, max = 50, message = "Nickname must be 1-50 characters"))]
    pub nickname: Option<String>,

    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
}

impl From<UserUpdateRequest> for UserUpdate {
    fn from(req: UserUpdateRequest) -> Self {
        UserUpdate {
            nickname: req.nickname,
            address: req.address,
        }
    }
}

/// Certification query string
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyQuery {
    pub certification_code: String,
}

/// Public view of a user
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub status: UserStatus,
    /// Epoch milliseconds of the last login
    pub last_login_at: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            status: user.status,
            last_login_at: user.last_login_at,
        }
    }
}

/// Owner's view of their own profile
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyProfileResponse {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub address: Option<String>,
    pub status: UserStatus,
    pub last_login_at: Option<i64>,
}

impl From<User> for MyProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            address: user.address,
            status: user.status,
            last_login_at: user.last_login_at,
        }
    }
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "nickname": "bob",
///   "address": "Seoul"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserCreateRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    let user = state.users.create(req.into()).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get an ACTIVE user by ID
///
/// # Errors
///
/// - `400 Bad Request`: Non-numeric ID
/// - `404 Not Found`: No such user, or the user is not ACTIVE
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users.get_by_id(id).await?;
    Ok(Json(user.into()))
}

/// Certify a user's email
///
/// On success answers `302 Found` with `Location` set to the frontend URL.
///
/// # Errors
///
/// - `400 Bad Request`: Non-numeric ID or missing `certificationCode`
/// - `403 Forbidden`: Code mismatch or inactive account
/// - `404 Not Found`: No such user
pub async fn verify_email(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<VerifyQuery>,
) -> ApiResult<Response> {
    state
        .users
        .verify_email(id, &query.certification_code)
        .await?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, state.config.urls.frontend_url.clone())],
    )
        .into_response())
}

/// Get the caller's own profile, recording a login
///
/// # Errors
///
/// - `401 Unauthorized`: Missing `EMAIL` header
/// - `404 Not Found`: No ACTIVE user with that email
pub async fn get_my_info(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerEmail>,
) -> ApiResult<Json<MyProfileResponse>> {
    let user = state.users.my_info(&caller.0).await?;
    Ok(Json(user.into()))
}

/// Update the caller's nickname and/or address
///
/// # Errors
///
/// - `401 Unauthorized`: Missing `EMAIL` header
/// - `404 Not Found`: No ACTIVE user with that email
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_my_info(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerEmail>,
    ApiJson(req): ApiJson<UserUpdateRequest>,
) -> ApiResult<Json<MyProfileResponse>> {
    req.validate()?;

    let user = state.users.update_by_email(&caller.0, req.into()).await?;
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let valid = UserCreateRequest {
            email: "user@example.com".to_string(),
            nickname: "bob".to_string(),
            address: None,
        };
        assert!(valid.validate().is_ok());

        let invalid = UserCreateRequest {
            email: "not-an-email".to_string(),
            nickname: String::new(),
            address: None,
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("nickname"));
    }

    #[test]
    fn test_email_longer_than_column_is_rejected() {
        let request = UserCreateRequest {
            email: format!("{}@{}.{}.{}.com", "a".repeat(64), "b".repeat(63), "c".repeat(63), "d".repeat(63)),
            nickname: "bob".to_string(),
            address: None,
        };
        assert!(request.email.len() > 255);

        let errors = request.validate().unwrap_err();
        let email_errors = &errors.field_errors()["email"];
        assert_eq!(email_errors.len(), 1);
        assert_eq!(email_errors[0].code, "length");
    }

    #[test]
    fn test_update_request_validation() {
        assert!(UserUpdateRequest::default().validate().is_ok());

        let invalid = UserUpdateRequest {
            nickname: Some(String::new()),
            address: Some("x".repeat(256)),
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("nickname"));
        assert!(errors.field_errors().contains_key("address"));
    }

    #[test]
    fn test_user_response_is_camel_case() {
        let response = UserResponse {
            id: 10,
            email: "user@example.com".to_string(),
            nickname: "bob".to_string(),
            status: UserStatus::Active,
            last_login_at: Some(1),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["lastLoginAt"], 1);
        assert_eq!(json["status"], "ACTIVE");
        assert!(json.get("address").is_none());
    }

    #[test]
    fn test_verify_query_field_name() {
        let query: VerifyQuery =
            serde_json::from_value(serde_json::json!({ "certificationCode": "abc" })).unwrap();
        assert_eq!(query.certification_code, "abc");
    }
}
