//! Configuration management for the map tool dispatcher

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Environment variable selecting the dispatch mode (`deferred` | `await`)
pub const ENV_DISPATCH_MODE: &str = "MAPKIT_DISPATCH_MODE";
/// Environment variable for the command queue capacity
pub const ENV_QUEUE_CAPACITY: &str = "MAPKIT_QUEUE_CAPACITY";
/// Environment variable selecting the style change policy (`reset` | `keep`)
pub const ENV_STYLE_CHANGE: &str = "MAPKIT_STYLE_CHANGE";
/// Environment variable for the fit-to-bounds animation length in milliseconds
pub const ENV_FIT_DURATION_MS: &str = "MAPKIT_FIT_DURATION_MS";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting has an unusable value
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// The configuration is internally inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// A configuration document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// When a tool call reports its outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Report success once the command is validated and queued; surface
    /// failures after that point are only logged
    #[default]
    Deferred,
    /// Wait for the surface to apply the command and report its failures
    AwaitCompletion,
}

impl DispatchMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deferred" | "fire_and_forget" => Some(Self::Deferred),
            "await" | "await_completion" | "sync" => Some(Self::AwaitCompletion),
            _ => None,
        }
    }
}

/// What happens to tracked layers when the map style changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleChangePolicy {
    /// Forget every tracked layer, since the reload discarded their groups
    #[default]
    ResetLayers,
    /// Keep the layer bookkeeping; the caller is responsible for clearing
    KeepLayers,
}

impl StyleChangePolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reset" | "reset_layers" => Some(Self::ResetLayers),
            "keep" | "keep_layers" => Some(Self::KeepLayers),
            _ => None,
        }
    }
}

/// Configuration for a map tool provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapkitConfig {
    /// When tool calls report their outcome
    pub dispatch_mode: DispatchMode,

    /// Capacity of the command queue feeding the surface worker
    pub queue_capacity: usize,

    /// Layer bookkeeping on style changes
    pub style_change: StyleChangePolicy,

    /// Animation length for `fit_map_to_bounds`, in milliseconds
    pub fit_duration_ms: u64,
}

impl Default for MapkitConfig {
    fn default() -> Self {
        Self {
            dispatch_mode: DispatchMode::Deferred,
            queue_capacity: 64,
            style_change: StyleChangePolicy::ResetLayers,
            fit_duration_ms: 1000,
        }
    }
}

impl MapkitConfig {
    /// Create a new configuration builder
    pub fn builder() -> MapkitConfigBuilder {
        MapkitConfigBuilder::default()
    }

    /// Parse a JSON configuration document; missing keys keep their defaults
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let invalid = |key: &str, value: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        if let Some(value) = lookup(ENV_DISPATCH_MODE) {
            self.dispatch_mode =
                DispatchMode::parse(&value).ok_or_else(|| invalid(ENV_DISPATCH_MODE, &value))?;
        }

        if let Some(value) = lookup(ENV_QUEUE_CAPACITY) {
            self.queue_capacity = value
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_QUEUE_CAPACITY, &value))?;
        }

        if let Some(value) = lookup(ENV_STYLE_CHANGE) {
            self.style_change = StyleChangePolicy::parse(&value)
                .ok_or_else(|| invalid(ENV_STYLE_CHANGE, &value))?;
        }

        if let Some(value) = lookup(ENV_FIT_DURATION_MS) {
            self.fit_duration_ms = value
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_FIT_DURATION_MS, &value))?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "queue_capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Animation length for `fit_map_to_bounds`
    pub fn fit_duration(&self) -> Duration {
        Duration::from_millis(self.fit_duration_ms)
    }
}

/// Builder for MapkitConfig
#[derive(Debug, Default)]
pub struct MapkitConfigBuilder {
    dispatch_mode: Option<DispatchMode>,
    queue_capacity: Option<usize>,
    style_change: Option<StyleChangePolicy>,
    fit_duration: Option<Duration>,
}

impl MapkitConfigBuilder {
    /// Set the dispatch mode
    pub fn dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = Some(mode);
        self
    }

    /// Set the command queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Set the style change policy
    pub fn style_change(mut self, policy: StyleChangePolicy) -> Self {
        self.style_change = Some(policy);
        self
    }

    /// Set the fit-to-bounds animation length
    pub fn fit_duration(mut self, duration: Duration) -> Self {
        self.fit_duration = Some(duration);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MapkitConfig, ConfigError> {
        let defaults = MapkitConfig::default();
        let config = MapkitConfig {
            dispatch_mode: self.dispatch_mode.unwrap_or(defaults.dispatch_mode),
            queue_capacity: self.queue_capacity.unwrap_or(defaults.queue_capacity),
            style_change: self.style_change.unwrap_or(defaults.style_change),
            fit_duration_ms: self
                .fit_duration
                .map_or(defaults.fit_duration_ms, |d| d.as_millis() as u64),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = MapkitConfig::default();
        assert_eq!(config.dispatch_mode, DispatchMode::Deferred);
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.style_change, StyleChangePolicy::ResetLayers);
        assert_eq!(config.fit_duration(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = MapkitConfig::builder()
            .dispatch_mode(DispatchMode::AwaitCompletion)
            .queue_capacity(8)
            .style_change(StyleChangePolicy::KeepLayers)
            .fit_duration(Duration::from_millis(250))
            .build()
            .unwrap();

        assert_eq!(config.dispatch_mode, DispatchMode::AwaitCompletion);
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.style_change, StyleChangePolicy::KeepLayers);
        assert_eq!(config.fit_duration_ms, 250);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = MapkitConfig::builder().queue_capacity(0).build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DISPATCH_MODE, "await"),
            (ENV_QUEUE_CAPACITY, "16"),
            (ENV_STYLE_CHANGE, "keep"),
        ]);

        let config = MapkitConfig::default()
            .with_overrides(|key| env.get(key).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(config.dispatch_mode, DispatchMode::AwaitCompletion);
        assert_eq!(config.queue_capacity, 16);
        assert_eq!(config.style_change, StyleChangePolicy::KeepLayers);
        assert_eq!(config.fit_duration_ms, 1000);
    }

    #[test]
    fn test_invalid_override() {
        let result = MapkitConfig::default().with_overrides(|key| {
            (key == ENV_QUEUE_CAPACITY).then(|| "lots".to_string())
        });

        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidValue {
                key: ENV_QUEUE_CAPACITY.to_string(),
                value: "lots".to_string(),
            }
        );
    }

    #[test]
    fn test_from_json() {
        let config =
            MapkitConfig::from_json(r#"{"dispatch_mode": "await_completion", "fit_duration_ms": 0}"#)
                .unwrap();
        assert_eq!(config.dispatch_mode, DispatchMode::AwaitCompletion);
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.fit_duration(), Duration::ZERO);

        assert!(matches!(
            MapkitConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
