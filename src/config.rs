//! Order book configuration.
//!
//! Values can be set in code or read from the environment:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `LIMIT_BOOK_ORDER_CAPACITY` | `order_capacity` | 1024 |
//! | `LIMIT_BOOK_VERIFY_INVARIANTS` | `verify_invariants` | on in debug builds |

use std::env;

use thiserror::Error;

/// Environment variable for the pre-allocated order slots
pub const ENV_ORDER_CAPACITY: &str = "LIMIT_BOOK_ORDER_CAPACITY";

/// Environment variable toggling invariant verification after every mutation
pub const ENV_VERIFY_INVARIANTS: &str = "LIMIT_BOOK_VERIFY_INVARIANTS";

/// Default number of pre-allocated order slots
pub const DEFAULT_ORDER_CAPACITY: usize = 1024;

/// Errors produced while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}: expected an unsigned integer, got {value:?}")]
    InvalidCapacity { var: &'static str, value: String },

    #[error("{var}: expected a boolean, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

/// Configuration for an [`OrderBook`](crate::orderbook::OrderBook).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookConfig {
    /// Number of order slots to pre-allocate
    pub order_capacity: usize,

    /// Run the full invariant check after every `submit`/`cancel` and panic
    /// on violation
    pub verify_invariants: bool,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            order_capacity: DEFAULT_ORDER_CAPACITY,
            verify_invariants: cfg!(debug_assertions),
        }
    }
}

impl BookConfig {
    pub fn with_order_capacity(mut self, order_capacity: usize) -> Self {
        self.order_capacity = order_capacity;
        self
    }

    pub fn with_verify_invariants(mut self, verify: bool) -> Self {
        self.verify_invariants = verify;
        self
    }

    /// Build a configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_ORDER_CAPACITY) {
            config.order_capacity = value.trim().parse().map_err(|_| ConfigError::InvalidCapacity {
                var: ENV_ORDER_CAPACITY,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(ENV_VERIFY_INVARIANTS) {
            config.verify_invariants = parse_flag(&value).ok_or(ConfigError::InvalidFlag {
                var: ENV_VERIFY_INVARIANTS,
                value: value.clone(),
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
