use crate::config::Binds;
use crate::control::ControlAction;
use crate::error::{CaptureError, HotkeyError};
use std::fmt;
use std::time::{Duration, Instant};

/// Keys that can be bound: the number row and the three letter rows of a
/// QWERTY layout, unshifted.
pub const CAPTURE_KEYS: &str = "`1234567890-=qwertyuiop[]\\asdfghjkl;'zxcvbnm,./";

pub fn is_capture_key(c: char) -> bool {
    CAPTURE_KEYS.contains(c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: char,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    pub fn plain(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    /// A key event matches when it is the bound key and every modifier the
    /// binding asks for is held. Extra modifiers are ignored.
    pub fn matches(&self, event: &WindowKey) -> bool {
        event.key == self.key
            && (!self.ctrl || event.ctrl)
            && (!self.shift || event.shift)
            && (!self.alt || event.alt)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "ctrl+")?;
        }
        if self.shift {
            write!(f, "shift+")?;
        }
        if self.alt {
            write!(f, "alt+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Parse a binding like `"s"` or `"ctrl+alt+s"`.
pub fn parse_binding(s: &str) -> Option<KeyBinding> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut key: Option<char> = None;

    for part in s.split('+') {
        let lower = part.trim().to_ascii_lowercase();
        match lower.as_str() {
            "ctrl" | "control" => ctrl = true,
            "shift" => shift = true,
            "alt" => alt = true,
            "" => return None,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if is_capture_key(c) && key.is_none() => key = Some(c),
                    _ => return None,
                }
            }
        }
    }

    key.map(|key| KeyBinding {
        key,
        ctrl,
        shift,
        alt,
    })
}

/// A key press delivered to the focused display window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowKey {
    pub key: char,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    WindowKey,
    GlobalHotkey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub action: ControlAction,
    pub binding: KeyBinding,
    pub sources: Vec<TriggerSource>,
}

/// Which inputs trigger which control action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchTable {
    entries: Vec<Dispatch>,
}

impl DispatchTable {
    /// Build the table for the configured binds. Bindings that do not parse
    /// leave their action unbound and are reported back.
    pub fn from_binds(binds: &Binds, global: bool) -> (Self, Vec<HotkeyError>) {
        let source = if global {
            TriggerSource::GlobalHotkey
        } else {
            TriggerSource::WindowKey
        };
        let mut entries = Vec::new();
        let mut errors = Vec::new();
        for (action, raw) in [
            (ControlAction::PauseResume, &binds.startstop),
            (ControlAction::Reset, &binds.restart),
        ] {
            match parse_binding(raw) {
                Some(binding) => entries.push(Dispatch {
                    action,
                    binding,
                    sources: vec![source],
                }),
                None => {
                    tracing::warn!(%action, binding = %raw, "ignoring invalid key binding");
                    errors.push(HotkeyError::InvalidBinding(raw.clone()));
                }
            }
        }
        (Self { entries }, errors)
    }

    pub fn entries(&self) -> &[Dispatch] {
        &self.entries
    }

    pub fn sources(&self, action: ControlAction) -> &[TriggerSource] {
        self.entries
            .iter()
            .find(|d| d.action == action)
            .map(|d| d.sources.as_slice())
            .unwrap_or(&[])
    }

    pub fn match_window_key(&self, event: &WindowKey) -> Option<ControlAction> {
        self.entries
            .iter()
            .find(|d| d.sources.contains(&TriggerSource::WindowKey) && d.binding.matches(event))
            .map(|d| d.action)
    }

    pub fn global_bindings(&self) -> Vec<(ControlAction, KeyBinding)> {
        self.entries
            .iter()
            .filter(|d| d.sources.contains(&TriggerSource::GlobalHotkey))
            .map(|d| (d.action, d.binding))
            .collect()
    }

    /// Fall back to window-scoped input for `action` after its global
    /// registration failed.
    pub fn demote_to_window(&mut self, action: ControlAction) {
        if let Some(d) = self.entries.iter_mut().find(|d| d.action == action) {
            d.sources.retain(|s| *s != TriggerSource::GlobalHotkey);
            if !d.sources.contains(&TriggerSource::WindowKey) {
                d.sources.push(TriggerSource::WindowKey);
            }
            tracing::info!(%action, binding = %d.binding, "using window-scoped binding");
        }
    }
}

/// Default time a capture waits for a key before giving up.
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

/// An in-progress key capture for one binding. Whatever happens, the result
/// is a usable binding: the new key or the previous one.
#[derive(Debug, Clone)]
pub struct KeyCapture {
    previous: String,
    started: Instant,
    timeout: Duration,
}

impl KeyCapture {
    pub fn begin(previous: &str, now: Instant, timeout: Duration) -> Self {
        Self {
            previous: previous.to_string(),
            started: now,
            timeout,
        }
    }

    pub fn previous(&self) -> &str {
        &self.previous
    }

    pub fn accept(&self, key: char) -> Result<String, CaptureError> {
        if is_capture_key(key) {
            Ok(key.to_string())
        } else {
            Err(CaptureError::Rejected(key))
        }
    }

    pub fn check_timeout(&self, now: Instant) -> Result<(), CaptureError> {
        if now.saturating_duration_since(self.started) >= self.timeout {
            Err(CaptureError::TimedOut)
        } else {
            Ok(())
        }
    }

    /// Settle the capture, reverting to the previous binding on any error.
    pub fn finish(self, outcome: Result<String, CaptureError>) -> String {
        match outcome {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!(error = %e, previous = %self.previous, "keeping previous binding");
                self.previous
            }
        }
    }
}
