//! Runtime configuration, read once from the process environment at
//! startup. A `.env` file is honored when present.
//!
//! The credential is deliberately optional: a missing `GEMINI_API_KEY`
//! never crashes startup — every extraction attempt then fails fast with a
//! configuration error instead.

use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "TxInvoice";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the Gemini credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Default extraction model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";

/// Default bind address for the local API.
pub const DEFAULT_BIND: &str = "127.0.0.1:8686";

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "txinvoice=info,tower_http=info".to_string()
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini credential; `None` means every extraction fails fast.
    pub api_key: Option<String>,
    /// Extraction model name.
    pub model: String,
    /// Socket address the API binds.
    pub bind: SocketAddr,
}

impl Config {
    /// Load from the process environment (after `dotenvy` has merged any
    /// `.env` file).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup(API_KEY_VAR).filter(|k| !k.is_empty());
        let model = lookup("TXINVOICE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let bind = lookup("TXINVOICE_BIND")
            .and_then(|raw| match raw.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!(raw, error = %e, "Invalid TXINVOICE_BIND, using default");
                    None
                }
            })
            .unwrap_or_else(|| DEFAULT_BIND.parse().expect("default bind address parses"));
        Self {
            api_key,
            model,
            bind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let config = Config::from_lookup(|_| None);
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
    }

    #[test]
    fn values_come_from_lookup() {
        let config = Config::from_lookup(|key| match key {
            API_KEY_VAR => Some("test-key".into()),
            "TXINVOICE_MODEL" => Some("gemini-pro-vision".into()),
            "TXINVOICE_BIND" => Some("127.0.0.1:9000".into()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.model, "gemini-pro-vision");
        assert_eq!(config.bind.port(), 9000);
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let config = Config::from_lookup(|key| (key == API_KEY_VAR).then(String::new));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn invalid_bind_falls_back_to_default() {
        let config = Config::from_lookup(|key| {
            (key == "TXINVOICE_BIND").then(|| "not-an-addr".to_string())
        });
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
    }
}
