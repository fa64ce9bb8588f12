//! Saved casts and high scores on disk
//!
//! Everything lives as JSON under the platform data directory
//! (`<data_dir>/explodium/`). Loads tolerate a missing file; anything else
//! surfaces as a [`PersistError`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::HighScores;
use crate::roster::Cast;

const CASTS_FILE: &str = "casts.json";
const HIGHSCORES_FILE: &str = "highscores.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no platform data directory available")]
    NoDataDir,
}

/// A named cast kept for reuse across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCast {
    pub name: String,
    pub cast: Cast,
    /// Unix timestamp (ms) when saved
    pub created_at: f64,
}

fn data_dir() -> Result<PathBuf, PersistError> {
    let base = dirs::data_dir().ok_or(PersistError::NoDataDir)?;
    Ok(base.join("explodium"))
}

pub fn now_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

fn read_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T, PersistError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json<T: Serialize>(dir: &Path, file: &str, value: &T) -> Result<(), PersistError> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(dir.join(file), json)?;
    Ok(())
}

fn load_casts_from(dir: &Path) -> Result<Vec<SavedCast>, PersistError> {
    let mut saved: Vec<SavedCast> = read_json(&dir.join(CASTS_FILE))?;
    // Classification keywords may change between versions; re-derive on load
    for s in &mut saved {
        s.cast.reclassify();
    }
    Ok(saved)
}

fn save_cast_to(dir: &Path, name: &str, cast: &Cast) -> Result<(), PersistError> {
    let mut saved = load_casts_from(dir)?;
    // Same name overwrites, case-insensitive
    saved.retain(|s| !s.name.eq_ignore_ascii_case(name));
    saved.insert(
        0,
        SavedCast {
            name: name.to_string(),
            cast: cast.clone(),
            created_at: now_millis(),
        },
    );
    write_json(dir, CASTS_FILE, &saved)
}

fn delete_cast_from(dir: &Path, name: &str) -> Result<bool, PersistError> {
    let mut saved = load_casts_from(dir)?;
    let before = saved.len();
    saved.retain(|s| !s.name.eq_ignore_ascii_case(name));
    if saved.len() == before {
        return Ok(false);
    }
    write_json(dir, CASTS_FILE, &saved)?;
    Ok(true)
}

/// All saved casts, newest first. A missing file is an empty list.
pub fn load_casts() -> Result<Vec<SavedCast>, PersistError> {
    load_casts_from(&data_dir()?)
}

/// Save a cast under a name, replacing any existing cast with that name.
pub fn save_cast(name: &str, cast: &Cast) -> Result<(), PersistError> {
    save_cast_to(&data_dir()?, name, cast)
}

/// Remove a saved cast by name. Returns whether anything was removed.
pub fn delete_cast(name: &str) -> Result<bool, PersistError> {
    delete_cast_from(&data_dir()?, name)
}

pub fn load_highscores() -> Result<HighScores, PersistError> {
    read_json(&data_dir()?.join(HIGHSCORES_FILE))
}

pub fn save_highscores(scores: &HighScores) -> Result<(), PersistError> {
    write_json(&data_dir()?, HIGHSCORES_FILE, scores)
}
