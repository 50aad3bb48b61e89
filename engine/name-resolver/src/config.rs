//! Configuration for the name resolver

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default minimum similarity for unconfirmed matches under `assume_match_exists`
pub const DEFAULT_MIN_ASSUMED_SCORE: f64 = 0.6;

/// Resolver tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Lowest similarity accepted without a prompt when the caller asserts the
    /// player exists; anything weaker is an error
    pub min_assumed_score: f64,

    /// Seconds to wait for the operator before leaving a name unanswered
    pub prompt_timeout_secs: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { min_assumed_score: DEFAULT_MIN_ASSUMED_SCORE, prompt_timeout_secs: None }
    }
}

impl ResolverConfig {
    /// Operator prompt timeout, if any
    pub fn prompt_timeout(&self) -> Option<Duration> {
        self.prompt_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_assumed_score) {
            return Err(format!(
                "min_assumed_score must be within [0, 1], got {}",
                self.min_assumed_score
            ));
        }

        if self.prompt_timeout_secs == Some(0) {
            return Err("prompt_timeout_secs must be greater than 0 when set".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.min_assumed_score, DEFAULT_MIN_ASSUMED_SCORE);
        assert_eq!(config.prompt_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_conversion() {
        let config = ResolverConfig { prompt_timeout_secs: Some(30), ..Default::default() };
        assert_eq!(config.prompt_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_validate() {
        let config = ResolverConfig { min_assumed_score: 1.5, ..Default::default() };
        assert!(config.validate().is_err());

        let config = ResolverConfig { prompt_timeout_secs: Some(0), ..Default::default() };
        assert!(config.validate().is_err());
    }
}
