//! Editing state behind the configuration window.
//!
//! Forms hold text exactly as typed; numeric fields only replace the stored
//! value when the text is all digits, otherwise the previous value is kept.
//! Nothing here checks domains: a finished draft goes through the validator
//! before it is shown or saved.

use crate::config::{ChangeRule, GlobalTimerDef, HexColor, TimerConfig, TimerDef};
use crate::error::SchemaError;

pub fn parse_frames_field(text: &str, previous: u32) -> u32 {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return previous;
    }
    text.parse().unwrap_or(previous)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeForm {
    pub trigger_text: String,
    pub change_to_text: String,
    pub overwrite: bool,
    base: ChangeRule,
}

impl ChangeForm {
    pub fn from_rule(rule: &ChangeRule) -> Self {
        Self {
            trigger_text: rule.trigger_frame.to_string(),
            change_to_text: rule.change_to.to_string(),
            overwrite: rule.overwrite,
            base: *rule,
        }
    }

    pub fn to_rule(&self) -> ChangeRule {
        ChangeRule {
            trigger_frame: parse_frames_field(&self.trigger_text, self.base.trigger_frame),
            change_to: parse_frames_field(&self.change_to_text, self.base.change_to),
            overwrite: self.overwrite,
        }
    }
}

impl Default for ChangeForm {
    fn default() -> Self {
        Self::from_rule(&ChangeRule::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerForm {
    pub title: String,
    pub color: [u8; 3],
    pub frames_text: String,
    pub visible: bool,
    pub changes: Vec<ChangeForm>,
    base_frames: u32,
}

impl TimerForm {
    pub fn from_def(def: &TimerDef) -> Self {
        Self {
            title: def.title.clone(),
            color: def.color.rgb(),
            frames_text: def.frames.to_string(),
            visible: def.visible,
            changes: def.changes.iter().map(ChangeForm::from_rule).collect(),
            base_frames: def.frames,
        }
    }

    pub fn add_change(&mut self) {
        self.changes.push(ChangeForm::default());
    }

    pub fn remove_change(&mut self, idx: usize) {
        if idx < self.changes.len() {
            self.changes.remove(idx);
        }
    }

    pub fn to_def(&self) -> TimerDef {
        TimerDef {
            title: self.title.clone(),
            color: HexColor::from_rgb(self.color),
            frames: parse_frames_field(&self.frames_text, self.base_frames),
            visible: self.visible,
            changes: self.changes.iter().map(ChangeForm::to_rule).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalTimerForm {
    pub color: [u8; 3],
    pub frames_text: String,
    base_frames: u32,
}

impl GlobalTimerForm {
    pub fn from_def(def: &GlobalTimerDef) -> Self {
        Self {
            color: def.color.rgb(),
            frames_text: def.frames.to_string(),
            base_frames: def.frames,
        }
    }

    pub fn to_def(&self) -> GlobalTimerDef {
        GlobalTimerDef {
            color: HexColor::from_rgb(self.color),
            frames: parse_frames_field(&self.frames_text, self.base_frames),
        }
    }
}

/// The configuration being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEditor {
    draft: TimerConfig,
}

impl ConfigEditor {
    pub fn new(config: TimerConfig) -> Self {
        Self { draft: config }
    }

    pub fn draft(&self) -> &TimerConfig {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut TimerConfig {
        &mut self.draft
    }

    /// Replace the whole draft with a configuration that already passed
    /// validation, e.g. one loaded from disk.
    pub fn replace(&mut self, config: TimerConfig) {
        self.draft = config;
    }

    pub fn add_timer(&mut self) -> usize {
        self.draft.timers.push(TimerDef::default());
        self.draft.timers.len() - 1
    }

    pub fn remove_timer(&mut self, idx: usize) -> Option<TimerDef> {
        (idx < self.draft.timers.len()).then(|| self.draft.timers.remove(idx))
    }

    pub fn set_visible(&mut self, idx: usize, visible: bool) {
        if let Some(timer) = self.draft.timers.get_mut(idx) {
            timer.visible = visible;
        }
    }

    pub fn timer_form(&self, idx: usize) -> Option<TimerForm> {
        self.draft.timers.get(idx).map(TimerForm::from_def)
    }

    pub fn apply_timer_form(&mut self, idx: usize, form: &TimerForm) {
        if let Some(timer) = self.draft.timers.get_mut(idx) {
            *timer = form.to_def();
        }
    }

    pub fn global_form(&self) -> GlobalTimerForm {
        GlobalTimerForm::from_def(&self.draft.global_timer)
    }

    pub fn apply_global_form(&mut self, form: &GlobalTimerForm) {
        self.draft.global_timer = form.to_def();
    }

    /// Validated snapshot of the draft.
    pub fn build(&self) -> Result<TimerConfig, SchemaError> {
        self.draft.validate()?;
        Ok(self.draft.clone())
    }
}
