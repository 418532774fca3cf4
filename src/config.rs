//! Demo configuration loaded from environment variables.
//!
//! All values have defaults so the demo runs with no environment at all:
//! `MINT_FEE`, `HMAC_SECRET`, `BASE_FEE`, `FUND_AMOUNT`, `NUM_MINTS`,
//! `TOKEN_URIS` (comma-separated, one per breed).

use anyhow::{bail, Result};

/// Configuration for the demo mint driver.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Minimum payment required per mint request.
    pub mint_fee: u64,
    /// Secret keying the simulator's HMAC word derivation.
    pub hmac_secret: Vec<u8>,
    /// Advisory fee the simulator charges per random word.
    pub base_fee: u64,
    /// Amount to fund the demo subscription with.
    pub fund_amount: u64,
    /// Number of mints the demo drives end-to-end.
    pub num_mints: u64,
    /// Metadata URIs, indexed by breed.
    pub token_uris: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mint_fee = std::env::var("MINT_FEE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000_000);

        let hmac_secret = std::env::var("HMAC_SECRET")
            .unwrap_or_else(|_| "local-dev-secret".into())
            .into_bytes();

        let base_fee = std::env::var("BASE_FEE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(250_000);

        let fund_amount = std::env::var("FUND_AMOUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1_000_000_000);

        let num_mints = std::env::var("NUM_MINTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let token_uris = match std::env::var("TOKEN_URIS") {
            Ok(raw) => {
                let uris: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_owned())
                    .filter(|s| !s.is_empty())
                    .collect();
                if uris.is_empty() {
                    bail!("TOKEN_URIS was set but contained no URIs");
                }
                uris
            }
            Err(_) => Vec::new(),
        };

        Ok(Self {
            mint_fee,
            hmac_secret,
            base_fee,
            fund_amount,
            num_mints,
            token_uris,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_environment() {
        // Env-var tests are process-global; rely on these names being unset
        // in the test environment.
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.num_mints, 3);
        assert!(config.mint_fee > 0);
        assert!(config.token_uris.is_empty());
    }
}
