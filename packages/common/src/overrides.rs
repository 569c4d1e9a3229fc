use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::flags::FlagMap;

/// File name used for the persisted overrides, mirroring the browser storage key.
pub const OVERRIDES_FILE: &str = "unborked-flag-overrides.json";

#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Local, per-machine flag overrides persisted as a JSON object.
#[derive(Debug, Clone)]
pub struct OverrideStore {
    path: PathBuf,
}

impl OverrideStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted in `dir` using the default file name.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(OVERRIDES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read overrides. A missing or unreadable file reads as no overrides.
    pub fn load(&self) -> FlagMap {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return FlagMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), "Failed to read flag overrides: {e}");
                return FlagMap::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "Ignoring corrupt flag overrides: {e}");
            FlagMap::new()
        })
    }

    pub fn save(&self, overrides: &FlagMap) -> Result<(), OverrideError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(overrides)?)?;
        Ok(())
    }

    /// Set (`Some`) or remove (`None`) a single override and return the new map.
    pub fn set(&self, name: &str, value: Option<bool>) -> Result<FlagMap, OverrideError> {
        let mut overrides = self.load();
        match value {
            Some(value) => {
                overrides.insert(name.to_string(), value);
            }
            None => {
                overrides.remove(name);
            }
        }
        self.save(&overrides)?;
        Ok(overrides)
    }

    /// Drop every override and return what was cleared.
    pub fn clear(&self) -> Result<FlagMap, OverrideError> {
        let previous = self.load();
        self.save(&FlagMap::new())?;
        Ok(previous)
    }
}
