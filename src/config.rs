//! Centralized configuration for the Serial Verify Service.
//!
//! All configuration is loaded from environment variables at startup and
//! collected into an immutable [`Config`] that is passed into the access
//! filter and the verification engine. Nothing reads the environment after
//! startup, so unit tests can construct configurations directly.

use rand::RngCore;
use std::collections::HashSet;
use std::env;
use zeroize::Zeroizing;

/// TTL applied when the configured value is absent, unparseable, or
/// non-positive.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60;

/// Origin policy for cross-origin requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Every origin is permitted, including requests without an Origin header.
    AllowAll,
    /// Only the listed origins are permitted. A request without an Origin
    /// header fails the check.
    AllowList(HashSet<String>),
}

impl OriginPolicy {
    /// Parse a policy from a comma-separated allow-list.
    ///
    /// An empty list, or a list containing `*`, means all origins are
    /// allowed. Entries are trimmed and blank entries dropped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let origins: HashSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();

        if origins.is_empty() || origins.contains("*") {
            Self::AllowAll
        } else {
            Self::AllowList(origins)
        }
    }

    /// Whether a request carrying the given `Origin` header is permitted.
    #[must_use]
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match self {
            Self::AllowAll => true,
            Self::AllowList(origins) => origin.is_some_and(|o| origins.contains(o)),
        }
    }
}

/// Serial Verify Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// The shared secret a client must present.
    pub serial_key: String,
    /// HMAC signing secret for issued tokens.
    pub signing_secret: Zeroizing<Vec<u8>>,
    /// Advisory token TTL as configured. `None` when absent or unparseable;
    /// [`Config::effective_ttl`] applies the fallback.
    pub token_ttl_seconds: Option<i64>,
    /// Cross-origin access policy.
    pub origin_policy: OriginPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Loads `.env` when present. Every variable has a default, so this
    /// cannot fail on missing values; invalid values fall back to their
    /// defaults rather than aborting startup.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let serial_key = env::var("SERIAL_KEY").unwrap_or_else(|_| "123456".to_string());

        let signing_secret = match env::var("TOKEN_SECRET") {
            Ok(secret) => Zeroizing::new(secret.into_bytes()),
            Err(_) => {
                // Tokens signed with a per-start secret cannot be validated
                // across restarts or by other instances.
                tracing::warn!(
                    "TOKEN_SECRET not set; generated a random signing secret \
                     that will not survive a restart"
                );
                Zeroizing::new(generate_signing_secret())
            }
        };

        let token_ttl_seconds = env::var("TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok());

        let origin_policy =
            OriginPolicy::parse(&env::var("ALLOWED_ORIGINS").unwrap_or_default());

        Self {
            host,
            port,
            serial_key,
            signing_secret,
            token_ttl_seconds,
            origin_policy,
        }
    }

    /// The TTL advertised with issued tokens, in seconds.
    ///
    /// Uses the configured value when it is strictly positive, otherwise
    /// [`DEFAULT_TOKEN_TTL_SECS`].
    #[must_use]
    pub fn effective_ttl(&self) -> u64 {
        match self.token_ttl_seconds {
            Some(ttl) if ttl > 0 => ttl as u64,
            _ => DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

/// Generate a random 32-byte signing secret, hex-encoded.
///
/// Hex encoding keeps the fallback secret byte-for-byte compatible with one
/// supplied through `TOKEN_SECRET`, which is treated as an opaque string.
fn generate_signing_secret() -> Vec<u8> {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_ttl(ttl: Option<i64>) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            serial_key: "123456".to_string(),
            signing_secret: Zeroizing::new(b"test-signing-secret".to_vec()),
            token_ttl_seconds: ttl,
            origin_policy: OriginPolicy::AllowAll,
        }
    }

    #[test]
    fn test_origin_policy_empty_allows_all() {
        assert_eq!(OriginPolicy::parse(""), OriginPolicy::AllowAll);
        assert_eq!(OriginPolicy::parse("  ,  "), OriginPolicy::AllowAll);
    }

    #[test]
    fn test_origin_policy_wildcard_allows_all() {
        let policy = OriginPolicy::parse("https://good.example, *");
        assert_eq!(policy, OriginPolicy::AllowAll);
        assert!(policy.is_allowed(None));
        assert!(policy.is_allowed(Some("https://evil.example")));
    }

    #[test]
    fn test_origin_policy_allow_list() {
        let policy = OriginPolicy::parse("https://good.example,https://also.example");
        assert!(policy.is_allowed(Some("https://good.example")));
        assert!(policy.is_allowed(Some("https://also.example")));
        assert!(!policy.is_allowed(Some("https://evil.example")));
        assert!(!policy.is_allowed(None));
    }

    #[test]
    fn test_origin_policy_trims_entries() {
        let policy = OriginPolicy::parse(" https://good.example , ");
        assert!(policy.is_allowed(Some("https://good.example")));
        assert!(!policy.is_allowed(Some("https://evil.example")));
    }

    #[test]
    fn test_effective_ttl_uses_configured_value() {
        assert_eq!(config_with_ttl(Some(300)).effective_ttl(), 300);
        assert_eq!(config_with_ttl(Some(1)).effective_ttl(), 1);
    }

    #[test]
    fn test_effective_ttl_falls_back_on_invalid_values() {
        assert_eq!(config_with_ttl(None).effective_ttl(), 60);
        assert_eq!(config_with_ttl(Some(0)).effective_ttl(), 60);
        assert_eq!(config_with_ttl(Some(-5)).effective_ttl(), 60);
    }

    #[test]
    fn test_generated_signing_secret_is_hex() {
        let secret = generate_signing_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.iter().all(u8::is_ascii_hexdigit));
    }

    #[test]
    fn test_config_from_env_defaults() {
        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("SERIAL_KEY");
        env::remove_var("TOKEN_TTL_SECONDS");
        env::remove_var("ALLOWED_ORIGINS");

        let config = Config::from_env();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.serial_key, "123456");
        assert_eq!(config.token_ttl_seconds, None);
        assert_eq!(config.effective_ttl(), DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(config.origin_policy, OriginPolicy::AllowAll);
    }
}
