/// Middleware modules for the API server
///
/// - `identity`: Caller identification via the `EMAIL` header
/// - `security`: Security response headers

pub mod identity;
pub mod security;
