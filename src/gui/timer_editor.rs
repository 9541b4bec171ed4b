use crate::editor::{ConfigEditor, GlobalTimerForm, TimerForm};
use eframe::egui;

/// Edits one side timer. Changes reach the draft only on Apply.
#[derive(Default)]
pub struct TimerDialog {
    pub open: bool,
    index: usize,
    form: Option<TimerForm>,
}

impl TimerDialog {
    pub fn open_for(&mut self, editor: &ConfigEditor, index: usize) {
        self.form = editor.timer_form(index);
        self.index = index;
        self.open = self.form.is_some();
    }

    /// Forget the form when the timer it edits went away.
    pub fn forget(&mut self, removed: usize) {
        if self.open && self.index == removed {
            self.open = false;
            self.form = None;
        } else if self.open && self.index > removed {
            self.index -= 1;
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context, editor: &mut ConfigEditor) {
        if !self.open {
            return;
        }
        let Some(form) = self.form.as_mut() else {
            self.open = false;
            return;
        };
        let mut open_val = self.open;
        let mut close = false;
        let mut apply = false;
        egui::Window::new("Edit Timer")
            .open(&mut open_val)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("timer_fields").num_columns(2).show(ui, |ui| {
                    ui.label("Title");
                    ui.text_edit_singleline(&mut form.title);
                    ui.end_row();
                    ui.label("Color");
                    ui.color_edit_button_srgb(&mut form.color);
                    ui.end_row();
                    ui.label("Frames");
                    ui.text_edit_singleline(&mut form.frames_text);
                    ui.end_row();
                    ui.label("Visible");
                    ui.checkbox(&mut form.visible, "");
                    ui.end_row();
                });
                ui.separator();
                ui.label("Changes");
                let mut remove = None;
                for (idx, change) in form.changes.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label("At global frame");
                        ui.add(egui::TextEdit::singleline(&mut change.trigger_text).desired_width(60.0));
                        ui.label("change to");
                        ui.add(egui::TextEdit::singleline(&mut change.change_to_text).desired_width(60.0));
                        ui.checkbox(&mut change.overwrite, "Overwrite");
                        if ui.button("Remove").clicked() {
                            remove = Some(idx);
                        }
                    });
                }
                if let Some(idx) = remove {
                    form.remove_change(idx);
                }
                if ui.button("Add change").clicked() {
                    form.add_change();
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        apply = true;
                        close = true;
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });
        if apply {
            editor.apply_timer_form(self.index, form);
        }
        if close {
            open_val = false;
        }
        self.open = open_val;
        if !self.open {
            self.form = None;
        }
    }
}

#[derive(Default)]
pub struct GlobalTimerDialog {
    pub open: bool,
    form: Option<GlobalTimerForm>,
}

impl GlobalTimerDialog {
    pub fn open(&mut self, editor: &ConfigEditor) {
        self.form = Some(editor.global_form());
        self.open = true;
    }

    pub fn ui(&mut self, ctx: &egui::Context, editor: &mut ConfigEditor) {
        if !self.open {
            return;
        }
        let Some(form) = self.form.as_mut() else {
            self.open = false;
            return;
        };
        let mut open_val = self.open;
        let mut close = false;
        let mut apply = false;
        egui::Window::new("Global Timer")
            .open(&mut open_val)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Color");
                    ui.color_edit_button_srgb(&mut form.color);
                });
                ui.horizontal(|ui| {
                    ui.label("Frames");
                    ui.text_edit_singleline(&mut form.frames_text);
                });
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        apply = true;
                        close = true;
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });
        if apply {
            editor.apply_global_form(form);
        }
        if close {
            open_val = false;
        }
        self.open = open_val;
        if !self.open {
            self.form = None;
        }
    }
}
