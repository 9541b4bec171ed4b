//! System-wide hotkeys for the display window.
//!
//! Registration, event waiting and unregistration all happen on one
//! background thread because the OS delivers hotkey messages to the thread
//! that registered them. The thread owns the handles; [`GlobalHotkeyListener::stop`]
//! releases them and joins the thread.

use crate::control::{ControlAction, ControlSender};
use crate::error::HotkeyError;
use crate::hotkey::KeyBinding;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const STARTUP_TIMEOUT: Duration = Duration::from_secs(2);

/// OS side of hotkey registration.
pub trait HotkeyBackend: Send + 'static {
    fn register(&mut self, id: i32, binding: &KeyBinding) -> Result<(), HotkeyError>;
    fn unregister(&mut self, id: i32) -> Result<(), HotkeyError>;
    /// Wait up to `timeout` for a registered hotkey and return its id.
    fn next_event(&mut self, timeout: Duration) -> Option<i32>;
}

/// A binding the backend refused; its action has to fall back to window keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedBinding {
    pub action: ControlAction,
    pub error: HotkeyError,
}

pub struct GlobalHotkeyListener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    registered: Vec<ControlAction>,
}

impl GlobalHotkeyListener {
    /// Spawn the listener, register `bindings` on it and wait for the
    /// registration results. Actions whose registration failed are returned
    /// alongside the running listener.
    pub fn start<B: HotkeyBackend>(
        mut backend: B,
        bindings: Vec<(ControlAction, KeyBinding)>,
        sink: ControlSender,
    ) -> Result<(Self, Vec<FailedBinding>), HotkeyError> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let (report_tx, report_rx) = channel();

        let handle = thread::Builder::new()
            .name("global-hotkeys".into())
            .spawn(move || {
                let mut ids: Vec<(i32, ControlAction)> = Vec::new();
                let mut failed = Vec::new();
                for (idx, (action, binding)) in bindings.iter().enumerate() {
                    let id = idx as i32 + 1;
                    match backend.register(id, binding) {
                        Ok(()) => {
                            tracing::info!(%action, %binding, id, "registered global hotkey");
                            ids.push((id, *action));
                        }
                        Err(error) => {
                            tracing::warn!(%action, %binding, %error, "global hotkey unavailable");
                            failed.push(FailedBinding {
                                action: *action,
                                error,
                            });
                        }
                    }
                }
                let registered: Vec<ControlAction> = ids.iter().map(|(_, a)| *a).collect();
                if report_tx.send((registered, failed)).is_err() {
                    stop_flag.store(true, Ordering::SeqCst);
                }

                while !stop_flag.load(Ordering::SeqCst) {
                    let Some(id) = backend.next_event(POLL_INTERVAL) else {
                        continue;
                    };
                    if let Some((_, action)) = ids.iter().find(|(i, _)| *i == id) {
                        tracing::debug!(%action, "global hotkey pressed");
                        if !sink.send(*action) {
                            break;
                        }
                    }
                }

                for (id, action) in ids {
                    if let Err(e) = backend.unregister(id) {
                        tracing::warn!(%action, error = %e, "failed to unregister global hotkey");
                    }
                }
                tracing::debug!("global hotkey listener exited");
            })
            .map_err(|e| HotkeyError::ListenerStart(e.to_string()))?;

        let mut listener = Self {
            stop,
            handle: Some(handle),
            registered: Vec::new(),
        };
        match report_rx.recv_timeout(STARTUP_TIMEOUT) {
            Ok((registered, failed)) => {
                listener.registered = registered;
                Ok((listener, failed))
            }
            Err(e) => {
                listener.stop();
                Err(HotkeyError::ListenerStart(e.to_string()))
            }
        }
    }

    pub fn registered(&self) -> &[ControlAction] {
        &self.registered
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Unregister every hotkey and join the listener thread.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("global hotkey listener panicked");
            }
        }
        self.registered.clear();
    }
}

impl Drop for GlobalHotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start a listener on the platform's hotkey backend.
pub fn start_platform_listener(
    bindings: Vec<(ControlAction, KeyBinding)>,
    sink: ControlSender,
) -> Result<(GlobalHotkeyListener, Vec<FailedBinding>), HotkeyError> {
    #[cfg(target_os = "windows")]
    {
        GlobalHotkeyListener::start(platform::Win32Backend::default(), bindings, sink)
    }
    #[cfg(not(target_os = "windows"))]
    {
        let _ = (bindings, sink);
        Err(HotkeyError::Unsupported)
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use super::HotkeyBackend;
    use crate::error::HotkeyError;
    use crate::hotkey::KeyBinding;
    use std::time::Duration;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, VkKeyScanW, HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL,
        MOD_NOREPEAT, MOD_SHIFT,
    };
    use windows::Win32::UI::WindowsAndMessaging::{PeekMessageW, MSG, PM_REMOVE, WM_HOTKEY};

    #[derive(Default)]
    pub struct Win32Backend;

    fn virtual_key(key: char) -> Option<u32> {
        let scan = unsafe { VkKeyScanW(key as u16) };
        if scan == -1 {
            None
        } else {
            Some((scan as u16 & 0xff) as u32)
        }
    }

    impl HotkeyBackend for Win32Backend {
        fn register(&mut self, id: i32, binding: &KeyBinding) -> Result<(), HotkeyError> {
            let vk = virtual_key(binding.key)
                .ok_or_else(|| HotkeyError::InvalidBinding(binding.to_string()))?;
            let mut mods = MOD_NOREPEAT.0;
            if binding.ctrl {
                mods |= MOD_CONTROL.0;
            }
            if binding.shift {
                mods |= MOD_SHIFT.0;
            }
            if binding.alt {
                mods |= MOD_ALT.0;
            }
            unsafe { RegisterHotKey(None, id, HOT_KEY_MODIFIERS(mods), vk) }.map_err(|e| {
                HotkeyError::Registration {
                    binding: binding.to_string(),
                    reason: e.to_string(),
                }
            })
        }

        fn unregister(&mut self, id: i32) -> Result<(), HotkeyError> {
            unsafe { UnregisterHotKey(None, id) }.map_err(|e| HotkeyError::Registration {
                binding: format!("#{id}"),
                reason: e.to_string(),
            })
        }

        fn next_event(&mut self, timeout: Duration) -> Option<i32> {
            let mut msg = MSG::default();
            let got = unsafe { PeekMessageW(&mut msg, None, WM_HOTKEY, WM_HOTKEY, PM_REMOVE) };
            if got.as_bool() {
                return Some(msg.wParam.0 as i32);
            }
            std::thread::sleep(timeout);
            None
        }
    }
}
