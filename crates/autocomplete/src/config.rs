//! Controller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AutocompleteError, Result};

/// Default quiet period between the last keystroke and the fetch.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Configuration for an [`Autocomplete`](crate::Autocomplete) controller.
///
/// Serialized with the debounce expressed in milliseconds:
///
/// ```
/// use autocomplete::AutocompleteConfig;
/// use std::time::Duration;
///
/// let config = AutocompleteConfig::from_toml_str("debounce_ms = 150").unwrap();
/// assert_eq!(config.debounce, Duration::from_millis(150));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Quiet period before a fetch is issued.
    #[serde(rename = "debounce_ms", with = "millis")]
    pub debounce: Duration,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl AutocompleteConfig {
    /// Set the quiet period using builder pattern.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Parse a configuration from TOML and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| AutocompleteError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.debounce.is_zero() {
            return Err(AutocompleteError::invalid_config(
                "debounce_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        // TOML integers are signed 64-bit.
        let millis = u64::try_from(duration.as_millis())
            .unwrap_or(u64::MAX)
            .min(i64::MAX as u64);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
