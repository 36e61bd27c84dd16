/// Caller identity from the `EMAIL` header
///
/// Routes under `/api/users/me` identify the caller by the email address sent
/// in the `EMAIL` request header. The middleware validates the header and
/// injects a [`CallerEmail`] into request extensions.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use userhub_api::middleware::identity::CallerEmail;
///
/// async fn handler(Extension(caller): Extension<CallerEmail>) -> String {
///     format!("Hello, {}!", caller.0)
/// }
/// ```

use crate::error::ApiError;
use axum::{extract::Request, middleware::Next, response::Response};

/// Name of the header carrying the caller's email (matched case-insensitively)
pub const EMAIL_HEADER: &str = "email";

/// Email address of the calling user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerEmail(pub String);

/// Requires an `EMAIL` header and stores it as [`CallerEmail`]
///
/// # Errors
///
/// - `401 Unauthorized` if the header is missing or blank
/// - `400 Bad Request` if the header is not valid visible ASCII
pub async fn require_email(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let raw = req
        .headers()
        .get(EMAIL_HEADER)
        .ok_or_else(|| ApiError::Unauthorized("Missing EMAIL header".to_string()))?;

    let email = raw
        .to_str()
        .map_err(|_| ApiError::BadRequest("EMAIL header must be ASCII".to_string()))?
        .trim()
        .to_string();

    if email.is_empty() {
        return Err(ApiError::Unauthorized("Missing EMAIL header".to_string()));
    }

    req.extensions_mut().insert(CallerEmail(email));

    Ok(next.run(req).await)
}
