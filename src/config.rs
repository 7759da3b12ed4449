use anyhow::{Context, Result};
use anyhow::ensure;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "glide-snake.json";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid_size: u32,
    pub moves_per_second: f64,
    pub cooldown_ms: f64,
    pub queue_capacity: usize,
    pub window_width: u32,
    pub high_score_path: PathBuf,
    pub log_level: String,
    /// Phrase prompts for swipes instead of arrow keys.
    pub touch_labels: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: 17,
            moves_per_second: 7.0,
            cooldown_ms: 500.0,
            queue_capacity: 3,
            window_width: 595,
            high_score_path: PathBuf::from("snake_high_score.json"),
            log_level: "info".to_string(),
            touch_labels: false,
        }
    }
}

impl Config {
    /// Reads the config at `path`. A missing file means defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).with_context(|| format!("reading config {}", path.display())),
        };
        let cfg: Config = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validated()
    }

    fn validated(self) -> Result<Self> {
        ensure!(self.grid_size >= 3, "grid_size must be at least 3, got {}", self.grid_size);
        ensure!(
            self.moves_per_second.is_finite() && self.moves_per_second > 0.0,
            "moves_per_second must be positive, got {}",
            self.moves_per_second
        );
        ensure!(
            self.cooldown_ms.is_finite() && self.cooldown_ms >= 0.0,
            "cooldown_ms must be zero or more, got {}",
            self.cooldown_ms
        );
        ensure!(self.queue_capacity >= 1, "queue_capacity must be at least 1");
        ensure!(self.window_width > 0, "window_width must be positive");
        Ok(self)
    }

    /// Milliseconds for the snake to cross one cell.
    pub fn move_ms(&self) -> f64 {
        1000.0 / self.moves_per_second
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
