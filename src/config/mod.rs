//! Persisted timer configuration.
//!
//! A configuration is only ever constructed from raw JSON after
//! [`schema::validate`] accepted it, so the typed structures below can be used
//! without re-checking field domains. The editor is the one place that builds
//! a [`TimerConfig`] by hand; it re-validates through [`TimerConfig::validate`]
//! before the value is used or written to disk.

pub mod files;
pub mod schema;

use crate::error::{ConfigError, SchemaError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"));

pub fn is_valid_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// `#rrggbb` color string. Letter case is kept as written so a loaded
/// file saves back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(value: &str) -> Option<Self> {
        is_valid_color(value).then(|| Self(value.to_string()))
    }

    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        Self(format!("#{r:02x}{g:02x}{b:02x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn rgb(&self) -> [u8; 3] {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        [channel(1), channel(3), channel(5)]
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_color(&value) {
            Ok(Self(value))
        } else {
            Err(format!("invalid color '{value}'"))
        }
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self("#ffffff".into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowSettings {
    pub bg_color: HexColor,
    pub always_on_top: bool,
    pub global_hotkeys: bool,
    pub default_font: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            bg_color: HexColor("#000000".into()),
            always_on_top: true,
            global_hotkeys: false,
            default_font: "LCD Solid".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Binds {
    pub startstop: String,
    pub restart: String,
}

impl Default for Binds {
    fn default() -> Self {
        Self {
            startstop: "s".into(),
            restart: "r".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalTimerDef {
    pub color: HexColor,
    pub frames: u32,
}

impl Default for GlobalTimerDef {
    fn default() -> Self {
        Self {
            color: HexColor::default(),
            frames: 3000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeRule {
    pub trigger_frame: u32,
    pub change_to: u32,
    pub overwrite: bool,
}

impl Default for ChangeRule {
    fn default() -> Self {
        Self {
            trigger_frame: 100,
            change_to: 1000,
            overwrite: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimerDef {
    pub title: String,
    pub color: HexColor,
    pub frames: u32,
    pub visible: bool,
    pub changes: Vec<ChangeRule>,
}

impl Default for TimerDef {
    fn default() -> Self {
        Self {
            title: "Timer".into(),
            color: HexColor::default(),
            frames: 1024,
            visible: true,
            changes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimerConfig {
    pub window_settings: WindowSettings,
    pub binds: Binds,
    pub global_timer: GlobalTimerDef,
    pub timers: Vec<TimerDef>,
}

impl TimerConfig {
    /// Validate `value` and convert it into a typed configuration.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        schema::validate(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        tracing::info!(path = %path.display(), timers = config.timers.len(), "loaded timer config");
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON. Invalid configurations
    /// are refused so a saved file always loads back.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "saved timer config");
        Ok(())
    }

    /// Run the structural validator over the serialized form.
    pub fn validate(&self) -> Result<(), SchemaError> {
        match serde_json::to_value(self) {
            Ok(value) => schema::validate(&value),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize timer config");
                Err(SchemaError::new("config", crate::error::Violation::WrongType {
                    expected: "object",
                }))
            }
        }
    }
}
