//! UI layer for the console: app shell, screens, and the confirmation modal.

pub mod app;

pub use app::{ConsoleApp, PersistedConsoleSettings, SETTINGS_STORAGE_KEY};
