use crate::timer::{EngineOptions, SCHEDULER_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application settings, separate from the timer configurations the user
/// edits and shares.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Write logs to this file instead of stdout.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Timer configuration opened at startup. Falls back to `timers.json`
    /// next to the settings file.
    #[serde(default)]
    pub last_config: Option<PathBuf>,
    /// Scheduler overhead in milliseconds subtracted from every frame delay.
    #[serde(default = "default_tolerance_ms")]
    pub scheduler_tolerance_ms: f64,
    /// Seconds a key capture waits before keeping the previous binding.
    #[serde(default = "default_capture_timeout")]
    pub capture_timeout_secs: f32,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
}

fn default_tolerance_ms() -> f64 {
    SCHEDULER_TOLERANCE.as_secs_f64() * 1000.0
}

fn default_capture_timeout() -> f32 {
    5.0
}

fn default_toast_duration() -> f32 {
    3.0
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            last_config: None,
            scheduler_tolerance_ms: default_tolerance_ms(),
            capture_timeout_secs: default_capture_timeout(),
            toast_duration: default_toast_duration(),
        }
    }
}

impl AppSettings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn engine_options(&self) -> EngineOptions {
        let ms = self.scheduler_tolerance_ms;
        let tolerance = Duration::try_from_secs_f64(ms / 1000.0).unwrap_or_else(|_| {
            tracing::warn!(value = ms, "invalid scheduler tolerance; using default");
            SCHEDULER_TOLERANCE
        });
        EngineOptions { tolerance }
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::try_from_secs_f32(self.capture_timeout_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(crate::hotkey::CAPTURE_TIMEOUT)
    }
}
