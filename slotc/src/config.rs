//! Resolver Configuration
//!
//! Settings that change lookup rules or bound the simulator. Loaded from the
//! `[config]` table of a scenario file or from a standalone TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Where override declarations take part in overload selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverrideLookup {
    /// An override is a candidate in the class that declares it, like any
    /// other member.
    #[default]
    AtOverride,
    /// An override is only reachable through the slot's introducing
    /// declaration. Classes that declare nothing but overrides of a name do
    /// not stop the upward walk.
    AtIntroduction,
}

/// Configuration for resolution and simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Override visibility during static lookup.
    pub override_lookup: OverrideLookup,

    /// Maximum nesting of body calls during an execution trace.
    pub max_call_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            override_lookup: OverrideLookup::AtOverride,
            max_call_depth: 64,
        }
    }
}

impl ResolverConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override_lookup(mut self, lookup: OverrideLookup) -> Self {
        self.override_lookup = lookup;
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }
}
