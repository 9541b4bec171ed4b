pub mod common;
pub mod config;
pub mod control;
pub mod display;
pub mod editor;
pub mod error;
pub mod global_hotkey;
pub mod gui;
pub mod hotkey;
pub mod logging;
pub mod settings;
pub mod timer;
