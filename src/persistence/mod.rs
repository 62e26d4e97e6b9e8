//! Save/load persistence
//!
//! A single flat JSON record holding the score pair plus the preferences
//! owned by other subsystems.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default save file name
pub const SAVE_FILE_NAME: &str = "save.json";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("save file io failed: {0}")]
    Io(#[from] io::Error),

    #[error("save file json invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snapshot of the minimal game state kept on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSave {
    pub left_score: u32,
    pub right_score: u32,
    /// 0..1
    pub master_volume: f32,
    /// 0.4..1.2
    pub ai_responsiveness: f32,
    pub saved_at_iso: String,
}

/// JSON save file at a fixed path
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store `save.json` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SAVE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stamp the record with the current UTC time and write it
    pub fn save(&self, data: &mut GameSave) -> Result<(), PersistenceError> {
        data.saved_at_iso = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)?;
        log::info!("Game saved to: {}", self.path.display());
        Ok(())
    }

    /// Load the record; `Ok(None)` when nothing has been saved yet
    pub fn load(&self) -> Result<Option<GameSave>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        let data = serde_json::from_str(&json)?;
        log::info!("Loaded save from: {}", self.path.display());
        Ok(Some(data))
    }
}
