//! Dialogs - modal and non-modal dialog windows
//!
//! Preferences, encoder settings, hotkey configuration, progress

pub mod encode;
pub mod hotkeys;
pub mod prefs;
pub mod progress;
