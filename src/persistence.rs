//! Durable key-value storage for progress.
//!
//! Progress is stored as JSON under [`PROGRESS_KEY`]. Loading never fails:
//! missing, unreadable or corrupt data falls back to a fresh [`Progress`].

use crate::error::{GameError, Result};
use crate::progress::Progress;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const PROGRESS_KEY: &str = "progress";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// One file per key inside a directory. Writes land in a sibling temp file
/// and are renamed into place so a crash never leaves a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(GameError::Persistence(format!("invalid key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

pub fn load_progress(store: &dyn KeyValueStore) -> Progress {
    let text = match store.get(PROGRESS_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => {
            tracing::info!("no saved progress, starting fresh");
            return Progress::default();
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not read saved progress, starting fresh");
            return Progress::default();
        }
    };

    match serde_json::from_str::<Progress>(&text) {
        Ok(progress) if progress.is_valid() => {
            tracing::info!(
                level = progress.level,
                escapes = progress.escapes,
                "loaded progress"
            );
            progress
        }
        Ok(progress) => {
            tracing::warn!(?progress, "saved progress is invalid, starting fresh");
            Progress::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "saved progress is corrupt, starting fresh");
            Progress::default()
        }
    }
}

pub fn save_progress(store: &mut dyn KeyValueStore, progress: &Progress) -> Result<()> {
    let json = serde_json::to_string(progress)?;
    store.set(PROGRESS_KEY, &json)?;
    tracing::info!(
        level = progress.level,
        escapes = progress.escapes,
        "progress saved"
    );
    Ok(())
}

pub fn delete_progress(store: &mut dyn KeyValueStore) -> Result<()> {
    store.remove(PROGRESS_KEY)?;
    tracing::info!("saved progress deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::game::Game;
    use tempfile::TempDir;

    fn test_store() -> (FileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("saves")).unwrap();
        (store, dir)
    }

    fn sample_progress() -> Progress {
        let mut progress = Progress {
            level: 7,
            escapes: 6,
            ..Progress::default()
        };
        progress.achievements.insert("Escaped 3 times!".to_string());
        progress
    }

    #[test]
    fn file_store_round_trips_progress() {
        let (mut store, _dir) = test_store();
        save_progress(&mut store, &sample_progress()).unwrap();

        let reopened = FileStore::open(store.dir()).unwrap();
        assert_eq!(load_progress(&reopened), sample_progress());
    }

    #[test]
    fn missing_save_yields_default() {
        let (store, _dir) = test_store();
        assert_eq!(load_progress(&store), Progress::default());
    }

    #[test]
    fn corrupt_save_yields_default() {
        let (mut store, _dir) = test_store();
        store.set(PROGRESS_KEY, "{ not json").unwrap();
        assert_eq!(load_progress(&store), Progress::default());
    }

    #[test]
    fn level_zero_is_treated_as_corrupt() {
        let mut store = MemoryStore::new();
        store
            .set(PROGRESS_KEY, r#"{"level":0,"escapes":4,"achievements":[]}"#)
            .unwrap();
        assert_eq!(load_progress(&store), Progress::default());
    }

    #[test]
    fn out_of_range_level_falls_back_and_still_starts() {
        let mut store = MemoryStore::new();
        store
            .set(PROGRESS_KEY, r#"{"level":200000,"escapes":0,"achievements":[]}"#)
            .unwrap();
        let progress = load_progress(&store);
        assert_eq!(progress, Progress::default());

        let mut game = Game::with_seed(&Config::default(), progress, 1);
        game.start().unwrap();
        assert_eq!(game.level().map(|level| level.grid_size), Some(6));
    }

    #[test]
    fn missing_achievements_field_defaults_to_empty() {
        let mut store = MemoryStore::new();
        store.set(PROGRESS_KEY, r#"{"level":3,"escapes":2}"#).unwrap();
        let progress = load_progress(&store);
        assert_eq!(progress.level, 3);
        assert!(progress.achievements.is_empty());
    }

    #[test]
    fn delete_removes_saved_progress() {
        let (mut store, _dir) = test_store();
        save_progress(&mut store, &sample_progress()).unwrap();
        delete_progress(&mut store).unwrap();
        assert_eq!(store.get(PROGRESS_KEY).unwrap(), None);
        // Deleting again is harmless.
        delete_progress(&mut store).unwrap();
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let (mut store, _dir) = test_store();
        assert!(matches!(
            store.set("../escape", "x"),
            Err(GameError::Persistence(_))
        ));
    }
}
