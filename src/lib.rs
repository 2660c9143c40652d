//! Serial Verify Service library.
//!
//! Provides serial key verification with constant-time comparison,
//! HMAC-based token issuance, and origin-based access filtering.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod verify;

// Re-exports for convenience
pub use config::Config;
pub use error::VerifyError;
