use super::entity::TimerEntity;
use super::pacer::{FramePacer, SCHEDULER_TOLERANCE};
use crate::config::{HexColor, TimerConfig};
use crate::control::ControlAction;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Global,
    Side(usize),
}

/// What the display surface paints for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    pub id: EntityId,
    pub title: String,
    pub text: String,
    pub color: HexColor,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub tolerance: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            tolerance: SCHEDULER_TOLERANCE,
        }
    }
}

/// Owns the global counter and the side counters of one display session.
///
/// The engine never sleeps. The caller drives it from its event loop with
/// [`Engine::poll`] and wakes up again after the returned duration.
#[derive(Debug, Clone)]
pub struct Engine {
    global: TimerEntity,
    sides: Vec<TimerEntity>,
    texts: Vec<String>,
    running: bool,
    frames_elapsed: u64,
    pacer: FramePacer,
}

impl Engine {
    pub fn from_config(config: &TimerConfig, options: EngineOptions) -> Self {
        let global = TimerEntity::global(&config.global_timer);
        let sides: Vec<TimerEntity> = config.timers.iter().map(TimerEntity::side).collect();
        let texts = std::iter::once(global.display_text())
            .chain(sides.iter().map(TimerEntity::display_text))
            .collect();
        tracing::debug!(
            global_frames = global.initial_frames(),
            side_timers = sides.len(),
            "timer engine created"
        );
        Self {
            global,
            sides,
            texts,
            running: false,
            frames_elapsed: 0,
            pacer: FramePacer::new(options.tolerance),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn global(&self) -> &TimerEntity {
        &self.global
    }

    pub fn sides(&self) -> &[TimerEntity] {
        &self.sides
    }

    pub fn entity(&self, id: EntityId) -> Option<&TimerEntity> {
        match id {
            EntityId::Global => Some(&self.global),
            EntityId::Side(idx) => self.sides.get(idx),
        }
    }

    /// Frames advanced since the last reset.
    pub fn frames_elapsed(&self) -> u64 {
        self.frames_elapsed
    }

    pub fn pacer(&self) -> &FramePacer {
        &self.pacer
    }

    /// Advance every counter by one logical frame.
    ///
    /// The global counter goes first. Reaching zero on it stops the run; side
    /// counters never do. Side counters then evaluate their rules against the
    /// global remaining count.
    pub fn step(&mut self) {
        self.frames_elapsed += 1;

        if self.global.decrement() {
            self.running = false;
            tracing::info!(frames = self.frames_elapsed, "global timer exhausted, run stopped");
        }
        self.texts[0] = self.global.refresh_display();

        let global_remaining = self.global.remaining_frames();
        for (idx, side) in self.sides.iter_mut().enumerate() {
            side.decrement();
            side.apply_rules(global_remaining);
            self.texts[idx + 1] = side.refresh_display();
        }
    }

    /// Run one paced tick. Returns the delay until the next tick, or `None`
    /// when the engine is not running.
    pub fn tick(&mut self) -> Option<Duration> {
        if !self.running {
            return None;
        }
        let start = Instant::now();
        self.step();
        let end = Instant::now();

        if !self.running {
            self.pacer.cancel();
            return None;
        }
        Some(self.pacer.finish_tick(start, end))
    }

    /// Tick if one is due at `now`. Returns how long the caller may sleep
    /// before polling again, or `None` when nothing is scheduled.
    pub fn poll(&mut self, now: Instant) -> Option<Duration> {
        if self.pacer.is_due(now) {
            self.tick();
            if let Some(drift) = self.pacer.drift(Instant::now()) {
                tracing::trace!(drift, frames = self.frames_elapsed, "tick");
            }
        }
        self.pacer.time_until_due(Instant::now())
    }

    /// Toggle the run. Resuming makes a tick due immediately.
    pub fn pause_resume(&mut self) -> bool {
        self.running = !self.running;
        if self.running {
            self.pacer.resume(Instant::now());
        } else {
            self.pacer.cancel();
        }
        tracing::info!(running = self.running, frames = self.frames_elapsed, "timers toggled");
        self.running
    }

    /// Stop the run and put every counter back to its configured state. The
    /// readouts reflect the initial values as soon as this returns.
    pub fn reset(&mut self) {
        self.running = false;
        self.pacer.cancel();
        self.frames_elapsed = 0;

        self.global.reset_to_initial();
        self.texts[0] = self.global.refresh_display();
        for (idx, side) in self.sides.iter_mut().enumerate() {
            side.reset_to_initial();
            self.texts[idx + 1] = side.refresh_display();
        }
        tracing::info!("timers reset");
    }

    pub fn apply(&mut self, action: ControlAction) {
        match action {
            ControlAction::PauseResume => {
                self.pause_resume();
            }
            ControlAction::Reset => self.reset(),
        }
    }

    /// Drop any pending tick. Used when the display surface goes away.
    pub fn shutdown(&mut self) {
        self.running = false;
        self.pacer.cancel();
    }

    /// Current text of every entity, global first.
    pub fn readouts(&self) -> Vec<Readout> {
        std::iter::once((EntityId::Global, &self.global))
            .chain(
                self.sides
                    .iter()
                    .enumerate()
                    .map(|(idx, side)| (EntityId::Side(idx), side)),
            )
            .zip(&self.texts)
            .map(|((id, entity), text)| Readout {
                id,
                title: entity.title().to_string(),
                text: text.clone(),
                color: entity.color().clone(),
                visible: entity.is_visible(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GlobalTimerDef, TimerDef};

    fn engine(global_frames: u32, side_frames: &[u32]) -> Engine {
        let config = TimerConfig {
            global_timer: GlobalTimerDef {
                frames: global_frames,
                ..GlobalTimerDef::default()
            },
            timers: side_frames
                .iter()
                .map(|&frames| TimerDef {
                    frames,
                    ..TimerDef::default()
                })
                .collect(),
            ..TimerConfig::default()
        };
        Engine::from_config(&config, EngineOptions::default())
    }

    #[test]
    fn starts_paused_with_initial_readouts() {
        let engine = engine(3000, &[45]);
        assert!(!engine.is_running());
        let texts: Vec<String> = engine.readouts().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, vec!["3000", "0045"]);
    }

    #[test]
    fn tick_is_gated_by_running_flag() {
        let mut engine = engine(100, &[]);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.global().remaining_frames(), 100);
        engine.pause_resume();
        assert!(engine.tick().is_some());
        assert_eq!(engine.global().remaining_frames(), 99);
    }

    #[test]
    fn pause_resume_toggles_and_schedules() {
        let mut engine = engine(100, &[]);
        assert!(engine.pause_resume());
        assert!(engine.pacer().is_due(Instant::now()));
        assert!(!engine.pause_resume());
        assert!(!engine.pacer().is_pending());
    }

    #[test]
    fn poll_runs_due_tick() {
        let mut engine = engine(100, &[]);
        engine.pause_resume();
        let wait = engine.poll(Instant::now());
        assert_eq!(engine.global().remaining_frames(), 99);
        assert!(wait.is_some_and(|d| d <= engine.pacer().frame_length()));
    }

    #[test]
    fn poll_when_idle_does_nothing() {
        let mut engine = engine(100, &[]);
        assert_eq!(engine.poll(Instant::now()), None);
        assert_eq!(engine.frames_elapsed(), 0);
    }

    #[test]
    fn exhausting_global_cancels_pending_tick() {
        let mut engine = engine(1, &[10]);
        engine.pause_resume();
        assert_eq!(engine.tick(), None);
        assert!(!engine.is_running());
        assert!(!engine.pacer().is_pending());
        assert_eq!(engine.readouts()[0].text, "0000");
    }

    #[test]
    fn resume_after_exhaustion_starts_new_cycle() {
        let mut engine = engine(2, &[]);
        engine.pause_resume();
        engine.tick();
        engine.tick();
        assert!(!engine.is_running());
        engine.pause_resume();
        engine.tick();
        assert!(engine.is_running());
        assert_eq!(engine.global().remaining_frames(), 2);
    }

    #[test]
    fn apply_dispatches_actions() {
        let mut engine = engine(100, &[]);
        engine.apply(ControlAction::PauseResume);
        assert!(engine.is_running());
        engine.tick();
        engine.apply(ControlAction::Reset);
        assert!(!engine.is_running());
        assert_eq!(engine.global().remaining_frames(), 100);
    }

    #[test]
    fn shutdown_cancels_pending_tick() {
        let mut engine = engine(100, &[]);
        engine.pause_resume();
        engine.shutdown();
        assert!(!engine.is_running());
        assert_eq!(engine.poll(Instant::now()), None);
    }

    #[test]
    fn entity_lookup() {
        let engine = engine(100, &[5, 6]);
        assert_eq!(engine.entity(EntityId::Side(1)).map(|e| e.initial_frames()), Some(6));
        assert!(engine.entity(EntityId::Side(2)).is_none());
        assert!(engine.entity(EntityId::Global).is_some_and(|e| e.is_global()));
    }
}
