//! Settings persistence.
//!
//! [`JsonSettingsStore`] keeps one JSON document on disk and replaces it
//! atomically on every write. [`MemorySettingsStore`] is the in-process
//! equivalent used by tests and embedders that persist elsewhere.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::settings::Settings;

/// Get/put access to the settings record.
///
/// Implementations store values as given; readers normalize with
/// [`Settings::normalized`].
pub trait SettingsStore: Send + Sync {
    /// Loads the current settings.
    fn get(&self) -> Result<Settings>;

    /// Replaces the stored settings.
    fn set(&self, settings: &Settings) -> Result<()>;

    /// Read-modify-write helper. Returns the stored value.
    ///
    /// Not atomic across processes; the last writer wins.
    fn update(&self, apply: &mut dyn FnMut(&mut Settings)) -> Result<Settings> {
        let mut settings = self.get()?;
        apply(&mut settings);
        self.set(&settings)?;
        Ok(settings)
    }
}

/// Settings persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    /// Creates a store backed by `path`. Nothing is touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "settings.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self) -> Result<Settings> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(self.io_err(e)),
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "settings file is corrupt, using defaults"
                );
                Ok(Settings::default())
            }
        }
    }

    fn set(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let body = serde_json::to_vec_pretty(settings)?;
        let tmp = self.tmp_path();
        let write_tmp = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&body)?;
            file.sync_all()
        };
        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_err(e));
        }
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;

        debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}

/// Settings held in memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: RwLock<Settings>,
}

impl MemorySettingsStore {
    /// Creates a store seeded with `settings`.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self) -> Result<Settings> {
        Ok(self.inner.read().clone())
    }

    fn set(&self, settings: &Settings) -> Result<()> {
        *self.inner.write() = settings.clone();
        Ok(())
    }
}
