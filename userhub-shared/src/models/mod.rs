/// Domain models for UserHub
///
/// # Models
///
/// - `user`: User accounts, status, and the certification lifecycle

pub mod user;
