use crate::error::CaptureError;
use crate::hotkey::KeyCapture;
use eframe::egui;
use std::time::{Duration, Instant};

/// What a capture-in-progress saw this frame.
fn capture_input(ctx: &egui::Context, capture: &KeyCapture) -> Option<Result<String, CaptureError>> {
    let now = Instant::now();
    if let Err(e) = capture.check_timeout(now) {
        return Some(Err(e));
    }
    ctx.input(|i| {
        if i.viewport().focused == Some(false) {
            return Some(Err(CaptureError::Cancelled));
        }
        for event in &i.events {
            match event {
                egui::Event::Text(text) => {
                    if let Some(c) = text.chars().next() {
                        return Some(capture.accept(c));
                    }
                }
                // Printable keys arrive again as text; anything else ends the capture.
                egui::Event::Key {
                    key, pressed: true, ..
                } if key.symbol_or_name().chars().count() > 1 => {
                    return Some(Err(CaptureError::Cancelled));
                }
                _ => {}
            }
        }
        None
    })
}

/// A button that shows a binding and, when clicked, waits for the next key.
#[derive(Default)]
pub struct BindButton {
    capture: Option<KeyCapture>,
}

impl BindButton {
    /// Draw the button. `binding` always ends up holding a usable key; the
    /// returned error explains why a capture kept the previous one.
    pub fn ui(&mut self, ui: &mut egui::Ui, binding: &mut String, timeout: Duration) -> Option<CaptureError> {
        let text = if self.capture.is_some() {
            "Bind a key...".to_string()
        } else {
            binding.clone()
        };
        let resp = ui.add(egui::Button::new(text).min_size(egui::vec2(90.0, 0.0)));

        let Some(capture) = self.capture.take() else {
            if resp.clicked() {
                self.capture = Some(KeyCapture::begin(binding, Instant::now(), timeout));
            }
            return None;
        };

        let outcome = if ui.input(|i| i.pointer.any_pressed()) && !resp.hovered() {
            Some(Err(CaptureError::Cancelled))
        } else {
            capture_input(ui.ctx(), &capture)
        };
        match outcome {
            Some(outcome) => {
                let err = outcome.as_ref().err().copied();
                *binding = capture.finish(outcome);
                err
            }
            None => {
                ui.ctx().request_repaint_after(Duration::from_millis(100));
                self.capture = Some(capture);
                None
            }
        }
    }
}
