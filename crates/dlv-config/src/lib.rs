//! Persisted settings for debug-log-viewer.
//!
//! Settings are stored raw and normalized on read: call
//! [`Settings::normalized`] on whatever a [`SettingsStore`] returns.

#![forbid(unsafe_code)]

pub mod error;
pub mod settings;
pub mod store;

pub use error::{ConfigError, Result};
pub use settings::{SettingKey, Settings, MAX_LINES_CEILING};
pub use store::{JsonSettingsStore, MemorySettingsStore, SettingsStore};
