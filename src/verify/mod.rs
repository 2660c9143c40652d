//! Serial key verification and token issuance.
//!
//! The engine is stateless per call: it reads the immutable configuration it
//! was constructed with, consumes time and randomness, and mutates nothing.
//! Issued tokens are handed to the caller and never retained or re-validated
//! here; TTL is advisory metadata for whoever consumes the token downstream.

pub mod compare;
pub mod token;

use crate::config::Config;
use crate::error::VerifyError;
use crate::verify::token::TokenMinter;
use serde::Serialize;

/// A successful verification outcome.
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedToken {
    /// Opaque token string, `<hex hmac>.<issued-at millis>`.
    pub token: String,
    /// Advisory lifetime in seconds; not enforced server-side.
    #[serde(rename = "expiresInSeconds")]
    pub expires_in_seconds: u64,
    /// Issuance timestamp in epoch milliseconds.
    #[serde(rename = "issuedAt")]
    pub issued_at: i64,
}

/// Verification and issuance engine.
pub struct VerificationEngine {
    serial_key: String,
    ttl_seconds: u64,
    minter: TokenMinter,
}

impl VerificationEngine {
    /// Build an engine from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            serial_key: config.serial_key.clone(),
            ttl_seconds: config.effective_ttl(),
            minter: TokenMinter::new(&config.signing_secret),
        }
    }

    /// Verify a serial key candidate and mint a token on success.
    ///
    /// The comparison is constant-time with respect to the candidate's
    /// content; see [`compare::timing_safe_match`].
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidCredential`] when the candidate does not
    /// match the configured serial key.
    pub fn verify(&self, candidate: &str) -> Result<VerifiedToken, VerifyError> {
        if !compare::timing_safe_match(candidate, &self.serial_key) {
            return Err(VerifyError::InvalidCredential);
        }

        let minted = self.minter.mint(&self.serial_key);

        Ok(VerifiedToken {
            token: minted.token,
            expires_in_seconds: self.ttl_seconds,
            issued_at: minted.issued_at,
        })
    }
}
