//! # UserHub Shared Library
//!
//! Domain types and business logic for the UserHub account service.
//!
//! ## Module Organization
//!
//! - `models`: User model, status, and certification lifecycle
//! - `repository`: Storage contract with PostgreSQL and in-memory backends
//! - `db`: Connection pool and migrations
//! - `mail`: Certification mail and the outbound mail abstraction
//! - `service`: User account operations

pub mod db;
pub mod mail;
pub mod models;
pub mod repository;
pub mod service;

/// Current version of the UserHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
