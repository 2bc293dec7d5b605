//! Marketplace configuration.
//!
//! # Examples
//!
//! ```
//! use taskmarket::config::MarketplaceConfig;
//!
//! let config = MarketplaceConfig::from_json_str(r#"{ "escrow_address": "EQ-escrow" }"#)
//!     .expect("valid config");
//! assert_eq!(config.escrow_address.as_str(), "EQ-escrow");
//! assert_eq!(config.deposit_timeout.as_secs(), 60);
//! ```

use crate::task::domain::{TaskDomainError, WalletAddress};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default time allowed for an escrow deposit.
pub const DEFAULT_DEPOSIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default upper bound on chat message length in characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 2_000;

/// Settings shared by the marketplace services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceConfig {
    /// Custodian address receiving task deposits.
    pub escrow_address: WalletAddress,
    /// Time allowed for a deposit before task creation is abandoned.
    pub deposit_timeout: Duration,
    /// Maximum chat message length in characters.
    pub max_message_chars: usize,
}

impl MarketplaceConfig {
    /// Creates a configuration with default limits.
    #[must_use]
    pub const fn new(escrow_address: WalletAddress) -> Self {
        Self {
            escrow_address,
            deposit_timeout: DEFAULT_DEPOSIT_TIMEOUT,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }

    /// Sets the deposit timeout.
    #[must_use]
    pub const fn with_deposit_timeout(mut self, timeout: Duration) -> Self {
        self.deposit_timeout = timeout;
        self
    }

    /// Sets the chat message length limit.
    #[must_use]
    pub const fn with_max_message_chars(mut self, max: usize) -> Self {
        self.max_message_chars = max;
        self
    }

    /// Parses a JSON configuration document.
    ///
    /// Only `escrow_address` is required; `deposit_timeout_secs` and
    /// `max_message_chars` fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for values that fail validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        let config = raw.validate()?;
        debug!(
            escrow_address = %config.escrow_address,
            deposit_timeout_secs = config.deposit_timeout.as_secs(),
            "marketplace config loaded"
        );
        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    escrow_address: String,
    #[serde(default)]
    deposit_timeout_secs: Option<u64>,
    #[serde(default)]
    max_message_chars: Option<usize>,
}

impl RawConfig {
    fn validate(self) -> Result<MarketplaceConfig, ConfigError> {
        let mut config = MarketplaceConfig::new(WalletAddress::new(self.escrow_address)?);
        if let Some(secs) = self.deposit_timeout_secs {
            if secs == 0 {
                return Err(ConfigError::ZeroDepositTimeout);
            }
            config = config.with_deposit_timeout(Duration::from_secs(secs));
        }
        if let Some(max) = self.max_message_chars {
            if max == 0 {
                return Err(ConfigError::ZeroMessageLimit);
            }
            config = config.with_max_message_chars(max);
        }
        Ok(config)
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for the expected shape.
    #[error("malformed marketplace config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value failed domain validation.
    #[error("invalid marketplace config: {0}")]
    Invalid(#[from] TaskDomainError),
    /// The deposit timeout must be positive.
    #[error("deposit_timeout_secs must be greater than zero")]
    ZeroDepositTimeout,
    /// The chat message limit must be positive.
    #[error("max_message_chars must be greater than zero")]
    ZeroMessageLimit,
}
