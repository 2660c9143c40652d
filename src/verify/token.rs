//! HMAC-based token construction.
//!
//! Tokens are self-contained and never persisted: any party holding the
//! signing secret could reconstruct validity, but this service only issues
//! tokens and never re-validates them.

use chrono::Utc;
use ring::hmac;
use uuid::Uuid;

/// A freshly minted token.
#[derive(Debug, Clone)]
pub struct MintedToken {
    /// Opaque token string, `<64 hex chars>.<issued-at millis>`.
    pub token: String,
    /// Issuance timestamp in epoch milliseconds.
    pub issued_at: i64,
}

/// Mints tokens signed with the server-held secret.
pub struct TokenMinter {
    key: hmac::Key,
}

impl TokenMinter {
    /// Create a minter keyed with the signing secret.
    #[must_use]
    pub fn new(signing_secret: &[u8]) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, signing_secret),
        }
    }

    /// Mint a token for a verified serial key.
    ///
    /// The signed message is `{serial_key}:{issued_at}:{nonce}` with a fresh
    /// random UUID nonce, so two tokens minted within the same millisecond
    /// still differ.
    #[must_use]
    pub fn mint(&self, serial_key: &str) -> MintedToken {
        self.mint_at(serial_key, Utc::now().timestamp_millis(), Uuid::new_v4())
    }

    fn mint_at(&self, serial_key: &str, issued_at: i64, nonce: Uuid) -> MintedToken {
        let message = format!("{serial_key}:{issued_at}:{nonce}");
        let tag = hmac::sign(&self.key, message.as_bytes());

        MintedToken {
            token: format!("{}.{issued_at}", hex::encode(tag.as_ref())),
            issued_at,
        }
    }
}
