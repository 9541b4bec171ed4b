use crate::config::{ChangeRule, GlobalTimerDef, HexColor, TimerDef};

/// Minimum number of digits shown for any counter.
pub const MIN_PAD_WIDTH: usize = 4;

pub fn pad_width(total_frames: u32) -> usize {
    total_frames.to_string().len().max(MIN_PAD_WIDTH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArmedRule {
    rule: ChangeRule,
    fired: bool,
}

/// A single frame counter.
///
/// The counter free-runs: after reaching zero it holds `0` for the frame on
/// which it got there and reloads from its current ceiling on the next
/// display refresh.
#[derive(Debug, Clone)]
pub struct TimerEntity {
    title: String,
    color: HexColor,
    visible: bool,
    is_global: bool,
    initial_frames: u32,
    max_frames: u32,
    remaining_frames: u32,
    pad_width: usize,
    zero_shown: bool,
    rules: Vec<ArmedRule>,
}

impl TimerEntity {
    pub fn global(def: &GlobalTimerDef) -> Self {
        Self::new("Global".into(), def.color.clone(), def.frames, true, true, &[])
    }

    pub fn side(def: &TimerDef) -> Self {
        Self::new(
            def.title.clone(),
            def.color.clone(),
            def.frames,
            def.visible,
            false,
            &def.changes,
        )
    }

    fn new(
        title: String,
        color: HexColor,
        frames: u32,
        visible: bool,
        is_global: bool,
        changes: &[ChangeRule],
    ) -> Self {
        debug_assert!(frames > 0, "validated configs only carry positive frames");
        Self {
            title,
            color,
            visible,
            is_global,
            initial_frames: frames,
            max_frames: frames,
            remaining_frames: frames,
            pad_width: pad_width(frames),
            zero_shown: false,
            rules: changes
                .iter()
                .map(|&rule| ArmedRule { rule, fired: false })
                .collect(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn color(&self) -> &HexColor {
        &self.color
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_global(&self) -> bool {
        self.is_global
    }

    pub fn initial_frames(&self) -> u32 {
        self.initial_frames
    }

    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    pub fn remaining_frames(&self) -> u32 {
        self.remaining_frames
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn fired_rules(&self) -> usize {
        self.rules.iter().filter(|r| r.fired).count()
    }

    /// Count down one frame. Returns `true` only on the step that brings the
    /// counter to zero; a counter already at zero is left alone.
    pub fn decrement(&mut self) -> bool {
        if self.remaining_frames > 0 {
            self.remaining_frames -= 1;
            self.remaining_frames == 0
        } else {
            false
        }
    }

    /// Fire every pending rule whose trigger the global counter has reached.
    /// The global entity never evaluates rules.
    pub fn apply_rules(&mut self, global_remaining: u32) {
        if self.is_global {
            return;
        }
        for armed in self.rules.iter_mut().filter(|r| !r.fired) {
            if global_remaining > armed.rule.trigger_frame {
                continue;
            }
            tracing::debug!(
                timer = %self.title,
                trigger = armed.rule.trigger_frame,
                change_to = armed.rule.change_to,
                overwrite = armed.rule.overwrite,
                "change rule fired"
            );
            self.max_frames = armed.rule.change_to;
            if armed.rule.overwrite {
                // Field-wise hard reset; `self.rules` is borrowed by the loop.
                self.remaining_frames = self.max_frames;
                self.zero_shown = false;
            }
            armed.fired = true;
        }
    }

    /// Reload an exhausted counter and return the padded display text.
    pub fn refresh_display(&mut self) -> String {
        if self.remaining_frames == 0 {
            if self.zero_shown {
                self.hard_reset();
            } else {
                self.zero_shown = true;
            }
        }
        self.display_text()
    }

    pub fn display_text(&self) -> String {
        format!("{:0>width$}", self.remaining_frames, width = self.pad_width)
    }

    /// Restore the configured baseline and re-arm every rule.
    pub fn reset_to_initial(&mut self) {
        self.max_frames = self.initial_frames;
        self.remaining_frames = self.initial_frames;
        self.zero_shown = false;
        for armed in &mut self.rules {
            armed.fired = false;
        }
    }

    pub fn hard_reset(&mut self) {
        self.remaining_frames = self.max_frames;
        self.zero_shown = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(frames: u32, changes: Vec<ChangeRule>) -> TimerEntity {
        TimerEntity::side(&TimerDef {
            frames,
            changes,
            ..TimerDef::default()
        })
    }

    fn rule(trigger_frame: u32, change_to: u32, overwrite: bool) -> ChangeRule {
        ChangeRule {
            trigger_frame,
            change_to,
            overwrite,
        }
    }

    #[test]
    fn pad_width_has_a_floor_of_four() {
        assert_eq!(pad_width(7), 4);
        assert_eq!(pad_width(9999), 4);
        assert_eq!(pad_width(12345), 5);
    }

    #[test]
    fn display_is_zero_padded() {
        let mut timer = side(120, vec![]);
        assert_eq!(timer.refresh_display(), "0120");
        let mut long = side(123_456, vec![]);
        long.decrement();
        assert_eq!(long.refresh_display(), "123455");
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let mut timer = side(1, vec![]);
        assert!(timer.decrement());
        assert!(!timer.decrement());
        assert_eq!(timer.remaining_frames(), 0);
    }

    #[test]
    fn zero_is_shown_once_before_reloading() {
        let mut timer = side(2, vec![]);
        timer.decrement();
        timer.decrement();
        assert_eq!(timer.refresh_display(), "0000");
        timer.decrement();
        assert_eq!(timer.refresh_display(), "0002");
    }

    #[test]
    fn non_overwrite_rule_changes_only_the_ceiling() {
        let mut timer = side(100, vec![rule(50, 20, false)]);
        for _ in 0..10 {
            timer.decrement();
        }
        timer.apply_rules(51);
        assert_eq!(timer.max_frames(), 100);
        timer.apply_rules(50);
        assert_eq!(timer.max_frames(), 20);
        assert_eq!(timer.remaining_frames(), 90);
    }

    #[test]
    fn overwrite_rule_forces_remaining() {
        let mut timer = side(100, vec![rule(50, 20, true)]);
        timer.apply_rules(10);
        assert_eq!(timer.max_frames(), 20);
        assert_eq!(timer.remaining_frames(), 20);
        assert_eq!(timer.fired_rules(), 1);
    }

    #[test]
    fn rule_fires_only_once_per_run() {
        let mut timer = side(100, vec![rule(50, 20, true)]);
        timer.apply_rules(50);
        timer.decrement();
        timer.apply_rules(49);
        assert_eq!(timer.remaining_frames(), 19);
    }

    #[test]
    fn later_rules_win_when_firing_together() {
        let mut timer = side(100, vec![rule(80, 30, false), rule(60, 40, true)]);
        timer.apply_rules(60);
        assert_eq!(timer.max_frames(), 40);
        assert_eq!(timer.remaining_frames(), 40);
    }

    #[test]
    fn overwrite_uses_its_own_ceiling_when_a_later_rule_follows() {
        let mut timer = side(100, vec![rule(50, 30, true), rule(50, 40, false)]);
        timer.apply_rules(50);
        assert_eq!(timer.remaining_frames(), 30);
        assert_eq!(timer.max_frames(), 40);
        assert_eq!(timer.fired_rules(), 2);
    }

    #[test]
    fn global_entity_ignores_rules() {
        let mut global = TimerEntity::global(&GlobalTimerDef::default());
        global.apply_rules(0);
        assert_eq!(global.max_frames(), 3000);
        assert!(global.is_global());
    }

    #[test]
    fn reset_to_initial_rearms_rules() {
        let mut timer = side(100, vec![rule(50, 20, true)]);
        timer.apply_rules(50);
        timer.reset_to_initial();
        assert_eq!(timer.max_frames(), 100);
        assert_eq!(timer.remaining_frames(), 100);
        assert_eq!(timer.fired_rules(), 0);
        timer.apply_rules(50);
        assert_eq!(timer.remaining_frames(), 20);
    }

    #[test]
    fn hard_reset_reloads_current_ceiling() {
        let mut timer = side(100, vec![rule(50, 20, false)]);
        timer.apply_rules(1);
        timer.decrement();
        timer.hard_reset();
        assert_eq!(timer.remaining_frames(), 20);
    }
}
