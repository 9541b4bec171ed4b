use crate::config::TimerConfig;
use crate::display::{display_height, visible_readouts, DisplaySession, DISPLAY_WIDTH};
use crate::error::HotkeyError;
use crate::hotkey::WindowKey;
use crate::timer::{EngineOptions, EntityId};
use eframe::egui;

const GLOBAL_FONT_SIZE: f32 = 45.0;
const SIDE_FONT_SIZE: f32 = 40.0;

fn color32(rgb: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Translate input events into window keys.
///
/// Plain presses are read from `Event::Text` so every character a binding can
/// hold is seen, including ones egui has no `Key` for. Presses with ctrl or
/// alt held produce no text and are read from `Event::Key` instead.
fn window_keys(events: &[egui::Event], modifiers: egui::Modifiers) -> Vec<WindowKey> {
    let mut keys = Vec::new();
    for event in events {
        match event {
            egui::Event::Text(text) if !modifiers.ctrl && !modifiers.alt => {
                keys.extend(text.chars().map(|c| WindowKey {
                    key: c.to_ascii_lowercase(),
                    ctrl: false,
                    shift: modifiers.shift,
                    alt: false,
                }));
            }
            egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                modifiers,
                ..
            } if modifiers.ctrl || modifiers.alt => {
                let mut chars = key.symbol_or_name().chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    continue;
                };
                keys.push(WindowKey {
                    key: c.to_ascii_lowercase(),
                    ctrl: modifiers.ctrl,
                    shift: modifiers.shift,
                    alt: modifiers.alt,
                });
            }
            _ => {}
        }
    }
    keys
}

/// The always-on-top countdown window.
pub struct DisplayWindow {
    session: DisplaySession,
    background: egui::Color32,
    always_on_top: bool,
}

impl DisplayWindow {
    pub fn open(
        config: &TimerConfig,
        options: EngineOptions,
        ctx: &egui::Context,
    ) -> (Self, Vec<HotkeyError>) {
        let repaint = ctx.clone();
        let (session, warnings) =
            DisplaySession::open(config, options, move || repaint.request_repaint());
        (
            Self {
                session,
                background: color32(config.window_settings.bg_color.rgb()),
                always_on_top: config.window_settings.always_on_top,
            },
            warnings,
        )
    }

    fn viewport_id() -> egui::ViewportId {
        egui::ViewportId::from_hash_of("interval_timer_display")
    }

    /// Run due ticks and paint the window. Returns `false` once the window
    /// asked to be closed.
    pub fn show(&mut self, ctx: &egui::Context) -> bool {
        let wait = self.session.pump();

        let visible_sides = self
            .session
            .readouts()
            .iter()
            .filter(|r| r.visible && r.id != EntityId::Global)
            .count();
        let mut builder = egui::ViewportBuilder::default()
            .with_title("Interval Timer")
            .with_inner_size([DISPLAY_WIDTH, display_height(visible_sides)])
            .with_decorations(false)
            .with_resizable(false);
        if self.always_on_top {
            builder = builder.with_always_on_top();
        }

        let background = self.background;
        let session = &mut self.session;
        let keep_open = ctx.show_viewport_immediate(Self::viewport_id(), builder, |ctx, _class| {
            if ctx.input(|i| i.viewport().close_requested()) {
                return false;
            }
            let keys = ctx.input(|i| window_keys(&i.events, i.modifiers));
            for key in keys {
                session.handle_window_key(key);
            }

            egui::CentralPanel::default()
                .frame(egui::Frame::none().fill(background))
                .show(ctx, |ui| {
                    let drag = ui.interact(ui.max_rect(), ui.id().with("drag"), egui::Sense::drag());
                    if drag.drag_started() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
                    }
                    for readout in visible_readouts(session.readouts()) {
                        let color = color32(readout.color.rgb());
                        if readout.id == EntityId::Global {
                            ui.vertical_centered(|ui| {
                                ui.label(
                                    egui::RichText::new(&readout.text)
                                        .monospace()
                                        .size(GLOBAL_FONT_SIZE)
                                        .color(color),
                                );
                            });
                        } else {
                            ui.label(
                                egui::RichText::new(&readout.text)
                                    .monospace()
                                    .size(SIDE_FONT_SIZE)
                                    .color(color),
                            );
                        }
                    }
                });
            true
        });

        if let Some(wait) = wait {
            ctx.request_repaint_after(wait);
        }
        keep_open
    }

    pub fn close(self) {
        self.session.close();
    }
}
