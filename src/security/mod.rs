//! Security module - Credential handling and log sanitization
//!
//! This module provides security primitives for:
//! - Holding the bearer token with zeroization and redacted debug output
//! - Masking tokens and URLs before they reach the logs
//! - Validating login input

mod credential;
mod sanitizer;

pub use credential::Credential;
pub use sanitizer::{Sanitizer, SanitizerError};
