//! One open display window's worth of state, independent of the GUI toolkit.
//!
//! A session owns the engine built from a validated configuration, the key
//! dispatch table and, in global mode, the hotkey listener. All engine
//! mutation happens in [`DisplaySession::pump`] and
//! [`DisplaySession::handle_window_key`], both called on the UI thread.

use crate::config::TimerConfig;
use crate::control::{control_channel, ControlAction, ControlSender};
use crate::error::HotkeyError;
use crate::global_hotkey::{self, FailedBinding, GlobalHotkeyListener};
use crate::hotkey::{DispatchTable, KeyBinding, WindowKey};
use crate::timer::{Engine, EngineOptions, Readout};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

/// Display width in points.
pub const DISPLAY_WIDTH: f32 = 200.0;
pub const GLOBAL_ROW_HEIGHT: f32 = 56.0;
pub const SIDE_ROW_HEIGHT: f32 = 48.0;

/// Window height for the global readout plus `visible_sides` side readouts.
pub fn display_height(visible_sides: usize) -> f32 {
    GLOBAL_ROW_HEIGHT + SIDE_ROW_HEIGHT * visible_sides as f32
}

/// Readouts that should be painted: the global counter and every visible
/// side counter, in configured order.
pub fn visible_readouts(readouts: Vec<Readout>) -> Vec<Readout> {
    readouts.into_iter().filter(|r| r.visible).collect()
}

type ListenerStart = Result<(GlobalHotkeyListener, Vec<FailedBinding>), HotkeyError>;

pub struct DisplaySession {
    engine: Engine,
    dispatch: DispatchTable,
    listener: Option<GlobalHotkeyListener>,
    actions: Receiver<ControlAction>,
    sink: ControlSender,
}

impl DisplaySession {
    /// Open a session using the platform hotkey backend. `waker` is called
    /// from the listener thread whenever an action was queued.
    pub fn open(
        config: &TimerConfig,
        options: EngineOptions,
        waker: impl Fn() + Send + Sync + 'static,
    ) -> (Self, Vec<HotkeyError>) {
        Self::open_with(config, options, waker, global_hotkey::start_platform_listener)
    }

    pub fn open_with<F>(
        config: &TimerConfig,
        options: EngineOptions,
        waker: impl Fn() + Send + Sync + 'static,
        start_listener: F,
    ) -> (Self, Vec<HotkeyError>)
    where
        F: FnOnce(Vec<(ControlAction, KeyBinding)>, ControlSender) -> ListenerStart,
    {
        let engine = Engine::from_config(config, options);
        let global = config.window_settings.global_hotkeys;
        let (mut dispatch, mut warnings) = DispatchTable::from_binds(&config.binds, global);
        let (sink, actions) = control_channel();
        let sink = sink.with_waker(waker);

        let mut listener = None;
        let bindings = dispatch.global_bindings();
        if !bindings.is_empty() {
            match start_listener(bindings.clone(), sink.clone()) {
                Ok((started, failed)) => {
                    for f in failed {
                        dispatch.demote_to_window(f.action);
                        warnings.push(f.error);
                    }
                    listener = Some(started);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "global hotkeys unavailable, using window keys");
                    for (action, _) in bindings {
                        dispatch.demote_to_window(action);
                    }
                    warnings.push(e);
                }
            }
        }

        tracing::info!(
            timers = engine.sides().len(),
            global_hotkeys = listener.is_some(),
            "display session opened"
        );
        (
            Self {
                engine,
                dispatch,
                listener,
                actions,
                sink,
            },
            warnings,
        )
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Queue an action as if it came from outside the window.
    pub fn sender(&self) -> ControlSender {
        self.sink.clone()
    }

    pub fn handle_window_key(&mut self, key: WindowKey) -> Option<ControlAction> {
        let action = self.dispatch.match_window_key(&key)?;
        tracing::debug!(%action, key = %key.key, "window key");
        self.engine.apply(action);
        Some(action)
    }

    /// Apply queued actions, then tick if one is due. Returns how long the
    /// caller may wait before pumping again.
    pub fn pump(&mut self) -> Option<Duration> {
        while let Ok(action) = self.actions.try_recv() {
            self.engine.apply(action);
        }
        self.engine.poll(Instant::now())
    }

    pub fn readouts(&self) -> Vec<Readout> {
        self.engine.readouts()
    }

    /// Cancel the pending tick, then release the hotkeys and join the
    /// listener thread.
    pub fn close(mut self) {
        self.teardown();
        tracing::info!("display session closed");
    }

    fn teardown(&mut self) {
        self.engine.shutdown();
        if let Some(mut listener) = self.listener.take() {
            listener.stop();
        }
    }
}

impl Drop for DisplaySession {
    fn drop(&mut self) {
        self.teardown();
    }
}
