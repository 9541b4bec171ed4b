mod bind_button;
mod display_window;
mod timer_editor;

pub use bind_button::BindButton;
pub use display_window::DisplayWindow;
pub use timer_editor::{GlobalTimerDialog, TimerDialog};

use crate::common::file_dialog::FileDialog;
use crate::config::TimerConfig;
use crate::control::ControlAction;
use crate::editor::ConfigEditor;
use crate::settings::AppSettings;
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::path::{Path, PathBuf};

const HELP_TEXT: &str = "Add timers in the Timers view and give each a frame count. \
Timers count down at 60 frames per second alongside the global timer. \
A change rule replaces a timer's reload value once the global timer reaches its trigger frame; \
with Overwrite set the timer also restarts from the new value.\n\n\
Open the timer with Controls > Show/Hide timer, then press the start/stop and restart keys \
chosen under Controls > Change settings. Enable global hotkeys to use them while another \
window has focus.";

#[derive(Clone, Copy, PartialEq, Eq)]
enum View {
    Timers,
    Settings,
}

pub struct TimerApp {
    settings: AppSettings,
    settings_path: String,
    config_path: PathBuf,
    editor: ConfigEditor,
    view: View,
    timer_dialog: TimerDialog,
    global_dialog: GlobalTimerDialog,
    bind_buttons: [BindButton; 2],
    display: Option<DisplayWindow>,
    toasts: Toasts,
    show_about: bool,
    show_help: bool,
}

impl TimerApp {
    pub fn new(
        settings: AppSettings,
        settings_path: String,
        config_path: PathBuf,
        config: TimerConfig,
        startup_error: Option<String>,
    ) -> Self {
        let mut app = Self {
            settings,
            settings_path,
            config_path,
            editor: ConfigEditor::new(config),
            view: View::Timers,
            timer_dialog: TimerDialog::default(),
            global_dialog: GlobalTimerDialog::default(),
            bind_buttons: Default::default(),
            display: None,
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
            show_about: false,
            show_help: false,
        };
        if let Some(msg) = startup_error {
            app.toast(ToastKind::Error, msg);
        }
        app
    }

    pub fn editor(&self) -> &ConfigEditor {
        &self.editor
    }

    pub fn is_display_open(&self) -> bool {
        self.display.is_some()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn toast(&mut self, kind: ToastKind, text: impl Into<String>) {
        let text = text.into();
        match kind {
            ToastKind::Error => tracing::error!("{text}"),
            ToastKind::Warning => tracing::warn!("{text}"),
            _ => tracing::info!("{text}"),
        }
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default().duration_in_seconds(self.settings.toast_duration as f64),
        });
    }

    /// Open the display from the current draft, or close it if it is open.
    pub fn toggle_display(&mut self, ctx: &egui::Context) {
        if let Some(display) = self.display.take() {
            display.close();
            return;
        }
        let config = match self.editor.build() {
            Ok(config) => config,
            Err(e) => {
                self.toast(ToastKind::Error, format!("Cannot show timer: {e}"));
                return;
            }
        };
        let (display, warnings) = DisplayWindow::open(&config, self.settings.engine_options(), ctx);
        for w in warnings {
            self.toast(ToastKind::Warning, w.to_string());
        }
        self.display = Some(display);
    }

    /// Replace the draft with the configuration at `path`. On failure the
    /// draft is left untouched.
    pub fn load_config(&mut self, path: &Path) {
        match TimerConfig::load(path) {
            Ok(config) => {
                self.editor.replace(config);
                self.config_path = path.to_path_buf();
                self.settings.last_config = Some(path.to_path_buf());
                if let Err(e) = self.settings.save(&self.settings_path) {
                    tracing::warn!("failed to save settings: {e}");
                }
                self.toast(ToastKind::Success, format!("Loaded {}", path.display()));
            }
            Err(e) => self.toast(ToastKind::Error, e.to_string()),
        }
    }

    pub fn save_config(&mut self, path: &Path) {
        let result = self
            .editor
            .build()
            .map_err(crate::error::ConfigError::from)
            .and_then(|config| config.save(path));
        match result {
            Ok(()) => {
                self.config_path = path.to_path_buf();
                self.toast(ToastKind::Success, format!("Saved {}", path.display()));
            }
            Err(e) => self.toast(ToastKind::Error, format!("Failed to save config: {e}")),
        }
    }

    fn config_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save config").clicked() {
                        ui.close_menu();
                        if let Some(path) = FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_directory(self.config_dir())
                            .save_file()
                        {
                            self.save_config(&path);
                        }
                    }
                    if ui.button("Load config").clicked() {
                        ui.close_menu();
                        if let Some(path) = FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_directory(self.config_dir())
                            .pick_file()
                        {
                            self.load_config(&path);
                        }
                    }
                });
                ui.menu_button("Controls", |ui| {
                    if ui.button("Change settings").clicked() {
                        ui.close_menu();
                        self.view = match self.view {
                            View::Settings => View::Timers,
                            View::Timers => View::Settings,
                        };
                    }
                    if ui.button("Show/Hide timer").clicked() {
                        ui.close_menu();
                        self.toggle_display(ctx);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        ui.close_menu();
                        self.show_about = true;
                    }
                    if ui.button("How to use").clicked() {
                        ui.close_menu();
                        self.show_help = true;
                    }
                });
            });
        });
    }

    fn timers_view(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Global Timer").clicked() {
                self.global_dialog.open(&self.editor);
            }
            if ui.button("Add timer").clicked() {
                let idx = self.editor.add_timer();
                self.timer_dialog.open_for(&self.editor, idx);
            }
        });
        ui.separator();

        let mut edit = None;
        let mut remove = None;
        let mut visibility = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (idx, timer) in self.editor.draft().timers.iter().enumerate() {
                ui.horizontal(|ui| {
                    let mut visible = timer.visible;
                    if ui.checkbox(&mut visible, "").on_hover_text("Visible").changed() {
                        visibility = Some((idx, visible));
                    }
                    let [r, g, b] = timer.color.rgb();
                    ui.colored_label(egui::Color32::from_rgb(r, g, b), &timer.title);
                    ui.label(format!("{} frames", timer.frames));
                    if !timer.changes.is_empty() {
                        ui.weak(format!("{} changes", timer.changes.len()));
                    }
                    if ui.button("Edit").clicked() {
                        edit = Some(idx);
                    }
                    if ui.button("Remove").clicked() {
                        remove = Some(idx);
                    }
                });
            }
        });

        if let Some((idx, visible)) = visibility {
            self.editor.set_visible(idx, visible);
        }
        if let Some(idx) = edit {
            self.timer_dialog.open_for(&self.editor, idx);
        }
        if let Some(idx) = remove {
            if self.editor.remove_timer(idx).is_some() {
                self.timer_dialog.forget(idx);
            }
        }
    }

    fn settings_view(&mut self, ui: &mut egui::Ui) {
        let timeout = self.settings.capture_timeout();
        let mut capture_errors = Vec::new();
        let draft = self.editor.draft_mut();
        egui::Grid::new("window_settings").num_columns(2).show(ui, |ui| {
            ui.label("Background");
            let mut bg = draft.window_settings.bg_color.rgb();
            if ui.color_edit_button_srgb(&mut bg).changed() {
                draft.window_settings.bg_color = crate::config::HexColor::from_rgb(bg);
            }
            ui.end_row();
            ui.label("Always on top");
            ui.checkbox(&mut draft.window_settings.always_on_top, "");
            ui.end_row();
            ui.label("Global hotkeys");
            ui.checkbox(&mut draft.window_settings.global_hotkeys, "");
            ui.end_row();
            ui.label("Font");
            ui.text_edit_singleline(&mut draft.window_settings.default_font);
            ui.end_row();

            let [startstop, restart] = &mut self.bind_buttons;
            ui.label(ControlAction::PauseResume.to_string());
            if let Some(e) = startstop.ui(ui, &mut draft.binds.startstop, timeout) {
                capture_errors.push(e);
            }
            ui.end_row();
            ui.label(ControlAction::Reset.to_string());
            if let Some(e) = restart.ui(ui, &mut draft.binds.restart, timeout) {
                capture_errors.push(e);
            }
            ui.end_row();
        });
        for e in capture_errors {
            self.toast(ToastKind::Warning, e.to_string());
        }
        if self.is_display_open() {
            ui.weak("Changes apply the next time the timer is shown.");
        }
    }

    fn info_windows(&mut self, ctx: &egui::Context) {
        egui::Window::new("About")
            .open(&mut self.show_about)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label(format!("Interval Timer {}", env!("CARGO_PKG_VERSION")));
                ui.label("Frame-accurate countdown timers with scheduled interval changes.");
            });
        egui::Window::new("How to use")
            .open(&mut self.show_help)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label(HELP_TEXT);
            });
    }
}

impl eframe::App for TimerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.menu_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            View::Timers => self.timers_view(ui),
            View::Settings => self.settings_view(ui),
        });

        self.timer_dialog.ui(ctx, &mut self.editor);
        self.global_dialog.ui(ctx, &mut self.editor);
        self.info_windows(ctx);

        if let Some(display) = self.display.as_mut() {
            if !display.show(ctx) {
                if let Some(display) = self.display.take() {
                    display.close();
                }
            }
        }

        self.toasts.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(display) = self.display.take() {
            display.close();
        }
    }
}
