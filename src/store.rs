use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Somewhere to keep the best score between runs.
pub trait ScoreStore {
    fn load(&self) -> Result<u32>;
    fn save(&mut self, high_score: u32) -> Result<()>;
}

#[derive(Serialize, Deserialize, Default)]
struct Record {
    #[serde(rename = "snakeHighScore", default)]
    high_score: u32,
}

/// High score kept as a small JSON document on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    /// A missing file is a fresh install and reads as zero.
    fn load(&self) -> Result<u32> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e).with_context(|| format!("reading {}", self.path.display())),
        };
        let record: Record = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(record.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        let json = serde_json::to_string_pretty(&Record { high_score })?;
        fs::write(&self.path, json).with_context(|| format!("writing {}", self.path.display()))
    }
}

/// Keeps the score in memory only. Counts writes so callers can check persistence happened.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    pub value: u32,
    pub writes: usize,
}

#[cfg(test)]
impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<u32> {
        Ok(self.value)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        self.value = high_score;
        self.writes += 1;
        Ok(())
    }
}
