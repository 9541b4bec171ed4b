use super::TimerConfig;
use std::path::{Path, PathBuf};

/// File name of the timer configuration created next to the settings file.
pub const DEFAULT_CONFIG_FILE: &str = "timers.json";

pub enum ConfigFileResult {
    Opened { path: PathBuf },
    Created { path: PathBuf },
}

impl ConfigFileResult {
    pub fn path(&self) -> &Path {
        match self {
            ConfigFileResult::Opened { path } | ConfigFileResult::Created { path } => path,
        }
    }
}

pub fn resolve_config_path(settings_path: &Path, relative_path: &str) -> PathBuf {
    let base_dir = settings_path.parent().unwrap_or_else(|| Path::new("."));
    base_dir.join(relative_path)
}

/// Make sure a timer configuration exists beside `settings_path`, writing the
/// default configuration when it does not. An existing file is left as is,
/// even when it would fail validation.
pub fn ensure_config_file(
    settings_path: &Path,
    relative_path: &str,
) -> anyhow::Result<ConfigFileResult> {
    let path = resolve_config_path(settings_path, relative_path);
    if path.exists() {
        return Ok(ConfigFileResult::Opened { path });
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    TimerConfig::default().save(&path)?;
    tracing::info!(path = %path.display(), "created default timer config");
    Ok(ConfigFileResult::Created { path })
}

#[cfg(test)]
mod tests {
    use super::{ensure_config_file, resolve_config_path, ConfigFileResult};
    use crate::config::TimerConfig;
    use std::path::Path;

    #[test]
    fn resolves_path_relative_to_settings_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings_path = dir.path().join("settings.json");
        let resolved = resolve_config_path(&settings_path, "presets/fnaf.json");
        assert_eq!(
            resolved,
            dir.path().join(Path::new("presets").join("fnaf.json"))
        );
    }

    #[test]
    fn creates_default_config_then_reuses_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings_path = dir.path().join("settings.json");

        let created = ensure_config_file(&settings_path, "timers.json").expect("create file");
        let path = match created {
            ConfigFileResult::Created { path } => path,
            ConfigFileResult::Opened { .. } => panic!("expected create"),
        };
        let loaded = TimerConfig::load(&path).expect("default config loads");
        assert_eq!(loaded, TimerConfig::default());

        std::fs::write(&path, "{}").expect("overwrite");
        let opened = ensure_config_file(&settings_path, "timers.json").expect("open file");
        match opened {
            ConfigFileResult::Opened { path: opened_path } => assert_eq!(opened_path, path),
            ConfigFileResult::Created { .. } => panic!("expected open"),
        }
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "{}");
    }
}
