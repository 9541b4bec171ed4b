use interval_timer::config::files::{ensure_config_file, DEFAULT_CONFIG_FILE};
use interval_timer::config::TimerConfig;
use interval_timer::gui::TimerApp;
use interval_timer::logging;
use interval_timer::settings::AppSettings;

use eframe::egui;
use std::path::Path;

const SETTINGS_FILE: &str = "settings.json";

fn main() -> anyhow::Result<()> {
    let settings = AppSettings::load(SETTINGS_FILE)?;
    let _log_guard = logging::init(settings.debug_logging, settings.log_file.as_deref());

    let config_path = match settings.last_config.clone() {
        Some(path) => path,
        None => ensure_config_file(Path::new(SETTINGS_FILE), DEFAULT_CONFIG_FILE)?
            .path()
            .to_path_buf(),
    };
    let (config, startup_error) = match TimerConfig::load(&config_path) {
        Ok(config) => (config, None),
        Err(e) => {
            tracing::error!(path = %config_path.display(), "failed to load timer config: {e}");
            (
                TimerConfig::default(),
                Some(format!("{}: {e}", config_path.display())),
            )
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Interval Timer")
            .with_inner_size([460.0, 360.0])
            .with_min_inner_size([360.0, 240.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Interval Timer",
        native_options,
        Box::new(move |_cc| {
            Box::new(TimerApp::new(
                settings,
                SETTINGS_FILE.to_string(),
                config_path,
                config,
                startup_error,
            ))
        }),
    )
    .map_err(|e| anyhow::anyhow!(e.to_string()))
}
