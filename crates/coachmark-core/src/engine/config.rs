//! Engine tuning knobs.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TourError},
    geometry::Size,
    placement::{DEFAULT_EDGE_PADDING, DEFAULT_MARGIN},
};

/// Timing and layout configuration for a [`super::TourEngine`].
///
/// Every field has a default, so a JSON config file only needs the values it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// How often a missing target or action element is looked up again
    pub poll_interval_ms: u64,
    /// How long to wait for a target before degrading to a centered tooltip
    pub mount_timeout_ms: u64,
    /// How often watched fields are re-evaluated
    pub field_poll_interval_ms: u64,
    /// Gap between tooltip and target
    pub margin: f64,
    /// Minimum distance from the viewport edges
    pub edge_padding: f64,
    /// Tooltip size assumed until the host reports a measurement
    pub tooltip: Size,
    pub hotspot_size: f64,
    /// Distance between the target's right edge and the hotspot
    pub hotspot_offset: f64,
    /// Padding of the spotlight around the target
    pub spotlight_padding: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            mount_timeout_ms: 5_000,
            field_poll_interval_ms: 300,
            margin: DEFAULT_MARGIN,
            edge_padding: DEFAULT_EDGE_PADDING,
            tooltip: Size::new(340.0, 180.0),
            hotspot_size: 24.0,
            hotspot_offset: 12.0,
            spotlight_padding: 16.0,
        }
    }
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn mount_timeout(&self) -> Duration {
        Duration::from_millis(self.mount_timeout_ms)
    }

    pub fn field_poll_interval(&self) -> Duration {
        Duration::from_millis(self.field_poll_interval_ms)
    }

    /// Parses a config from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| TourError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks that intervals are positive and sizes are sane.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| {
            Err(TourError::Configuration {
                message: message.to_string(),
            })
        };
        if self.poll_interval_ms == 0 || self.field_poll_interval_ms == 0 {
            return invalid("poll intervals must be greater than zero");
        }
        if self.mount_timeout_ms < self.poll_interval_ms {
            return invalid("mount timeout must be at least one poll interval");
        }
        if self.tooltip.width <= 0.0 || self.tooltip.height <= 0.0 {
            return invalid("tooltip size must be positive");
        }
        if self.margin < 0.0 || self.edge_padding < 0.0 || self.spotlight_padding < 0.0 {
            return invalid("margins and paddings must not be negative");
        }
        if self.hotspot_size <= 0.0 {
            return invalid("hotspot size must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.mount_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"mount_timeout_ms": 2000}"#).unwrap();
        assert_eq!(config.mount_timeout_ms, 2000);
        assert_eq!(config.poll_interval_ms, 250);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = EngineConfig::from_json_str(r#"{"poll_interval_ms": 0}"#).unwrap_err();
        assert!(err.to_string().contains("poll intervals"));
    }

    #[test]
    fn test_timeout_shorter_than_interval_is_rejected() {
        let err =
            EngineConfig::from_json_str(r#"{"poll_interval_ms": 500, "mount_timeout_ms": 100}"#)
                .unwrap_err();
        assert!(err.to_string().contains("mount timeout"));
    }
}
