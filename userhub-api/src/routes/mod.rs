/// API route handlers
///
/// - `health`: Health check endpoint
/// - `users`: User account endpoints

pub mod health;
pub mod users;
