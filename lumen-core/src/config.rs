//! Lighting tunables loaded from a json5 file.

use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::light_engine::TickContext;

/// The config file written when none exists yet.
pub const DEFAULT_CONFIG: &str = include_str!("../../package-content/lumen_config.json5");

/// Largest number of columns a chunk has to re-check.
const MAX_RANDOM_BUDGET: u32 = 16 * 16 * 16;

/// Tunables of a lighting world.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Whether ticked chunks re-check part of their light every tick.
    pub random_light_updates: bool,
    /// Random re-check budget on the server.
    pub random_updates_server: u32,
    /// Random re-check budget for chunks near an observer.
    pub random_updates_client_active: u32,
    /// Random re-check budget for other observed chunks.
    pub random_updates_client_inactive: u32,
    /// Whether light reads finish pending updates first.
    pub drain_before_read: bool,
}

impl LightingConfig {
    /// Parses and validates a json5 document.
    pub fn from_json5_str(config_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json5::from_str(config_str)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Loads the config at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("reading lighting config {}", path.display()))?;
        Self::from_json5_str(&config_str)
            .with_context(|| format!("loading lighting config {}", path.display()))
    }

    /// Loads the config at `path`, writing the bundled default there first if it is missing.
    pub fn load_or_create(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }
        fs::write(path, DEFAULT_CONFIG)
            .with_context(|| format!("writing default lighting config {}", path.display()))?;
        log::info!("Wrote default lighting config to {}", path.display());
        Ok(Self::default())
    }

    /// Checks every value against its allowed range.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(1..=MAX_RANDOM_BUDGET).contains(&self.random_updates_server) {
            return Err("random_updates_server must be in range 1..4096");
        }
        if !(1..=MAX_RANDOM_BUDGET).contains(&self.random_updates_client_active) {
            return Err("random_updates_client_active must be in range 1..4096");
        }
        if !(1..=MAX_RANDOM_BUDGET).contains(&self.random_updates_client_inactive) {
            return Err("random_updates_client_inactive must be in range 1..4096");
        }
        Ok(())
    }

    /// Number of columns a random tick may re-check in the given context.
    #[must_use]
    pub fn random_update_budget(&self, context: TickContext) -> u32 {
        match context {
            TickContext::Server => self.random_updates_server,
            TickContext::ClientActive => self.random_updates_client_active,
            TickContext::ClientInactive => self.random_updates_client_inactive,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            random_light_updates: true,
            random_updates_server: 32,
            random_updates_client_active: 256,
            random_updates_client_inactive: 64,
            drain_before_read: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_matches_default() {
        let parsed = LightingConfig::from_json5_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, LightingConfig::default());
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let parsed = LightingConfig::from_json5_str("{ random_updates_server: 8 }").unwrap();
        assert_eq!(parsed.random_updates_server, 8);
        assert_eq!(parsed.random_updates_client_active, 256);
        assert!(parsed.drain_before_read);
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let err = LightingConfig::from_json5_str("{ random_updates_client_inactive: 0 }")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_budget_by_context() {
        let config = LightingConfig::default();
        assert_eq!(config.random_update_budget(TickContext::Server), 32);
        assert_eq!(config.random_update_budget(TickContext::ClientActive), 256);
        assert_eq!(config.random_update_budget(TickContext::ClientInactive), 64);
    }
}
