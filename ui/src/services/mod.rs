//! Infrastructure Services
//!
//! - **config**: endpoints, CSRF naming and the user-facing message catalog
//! - **errors**: error types for the install and push flows

pub mod config;
pub mod errors;
