//! Interop configuration
//!
//! Loaded once at startup, usually from a `hostwire.toml`:
//!
//! ```toml
//! [interop]
//! fast_dispatch = true          # route resolved calls through dispatch tables
//! bean_properties = true        # synthesize getX/isX/setX property aliases
//! strict_enum_coercion = false  # reject non-text, non-numeric enum inputs
//!
//! [remap]
//! strip_prefixes = ["kjs$"]
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use std::path::Path;

use hostwire_sdk::{InteropError, InteropResult};
use serde::Deserialize;

/// Behaviour switches for the interop core
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InteropOptions {
    /// Invoke resolved overloads through per-type dispatch tables
    pub fast_dispatch: bool,
    /// Synthesize bean property aliases from accessor naming conventions
    pub bean_properties: bool,
    /// Make enum coercion reject inputs it cannot interpret
    pub strict_enum_coercion: bool,
}

impl Default for InteropOptions {
    fn default() -> Self {
        Self {
            fast_dispatch: true,
            bean_properties: true,
            strict_enum_coercion: false,
        }
    }
}

/// Name remapping settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemapOptions {
    /// Prefixes stripped from every member name
    pub strip_prefixes: Vec<String>,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InteropConfig {
    /// `[interop]` table
    pub interop: InteropOptions,
    /// `[remap]` table
    pub remap: RemapOptions,
}

impl InteropConfig {
    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> InteropResult<Self> {
        toml::from_str(content).map_err(|e| InteropError::Configuration(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn load_from_file(path: &Path) -> InteropResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InteropError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}
