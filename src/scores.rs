//! High score storage

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::error::GameError;

/// Key/value store for best scores
pub trait HighScoreStore: Send + Sync {
    /// Stored score for `key`, 0 when absent
    fn get(&self, key: &str) -> Result<u32, GameError>;

    fn set(&self, key: &str, score: u32) -> Result<(), GameError>;

    /// Store `score` if it beats the current best. Returns true when stored.
    fn record(&self, key: &str, score: u32) -> Result<bool, GameError> {
        if score > self.get(key)? {
            self.set(key, score)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Store that lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryScores {
    scores: DashMap<String, u32>,
}

impl MemoryScores {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryScores {
    fn get(&self, key: &str) -> Result<u32, GameError> {
        Ok(self.scores.get(key).map(|s| *s).unwrap_or(0))
    }

    fn set(&self, key: &str, score: u32) -> Result<(), GameError> {
        self.scores.insert(key.to_string(), score);
        Ok(())
    }
}

/// Store persisted as a JSON object on disk
#[derive(Debug)]
pub struct FileScores {
    path: PathBuf,
    scores: DashMap<String, u32>,
    write_lock: Mutex<()>,
}

impl FileScores {
    /// Open the store, starting empty if the file does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref().to_path_buf();
        let scores = DashMap::new();

        if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let stored: HashMap<String, u32> = serde_json::from_str(&raw)?;
            for (key, score) in stored {
                scores.insert(key, score);
            }
            info!("Loaded {} high score(s) from {}", scores.len(), path.display());
        }

        Ok(Self {
            path,
            scores,
            write_lock: Mutex::new(()),
        })
    }

    fn flush(&self) -> Result<(), GameError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| GameError::Config("high score lock poisoned".into()))?;

        let snapshot: HashMap<String, u32> = self
            .scores
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        std::fs::write(&self.path, serde_json::to_string_pretty(&snapshot)?)?;
        debug!("High scores written to {}", self.path.display());
        Ok(())
    }
}

impl HighScoreStore for FileScores {
    fn get(&self, key: &str) -> Result<u32, GameError> {
        Ok(self.scores.get(key).map(|s| *s).unwrap_or(0))
    }

    fn set(&self, key: &str, score: u32) -> Result<(), GameError> {
        self.scores.insert(key.to_string(), score);
        self.flush()
    }
}
