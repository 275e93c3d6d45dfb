//! Configuration file I/O operations

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::Config;

impl Config {
    /// Get the global config directory path (~/.lumen/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lumen")
    }

    /// Get the global config file path (~/.lumen/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from `path` (or the global path). A missing file yields defaults;
    /// a broken one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::global_config_path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    /// Serialize and write to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        write_locked(path, &content)
    }
}

/// Replace `path` with `content` while holding `<path>.lock`.
///
/// Readers never see a half-written file: the bytes land in `<path>.tmp`
/// first and are renamed into place. Two `lumen config` invocations racing
/// on the same file are serialized by the lock.
pub fn write_locked(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let guard = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path.with_extension("toml.lock"))
        .context("Failed to open config lock")?;
    guard
        .lock_exclusive()
        .with_context(|| format!("Config {} is locked", path.display()))?;

    let staged = path.with_extension("toml.tmp");
    let result = stage_and_swap(&staged, path, content);
    if result.is_err() {
        let _ = std::fs::remove_file(&staged);
    }
    let _ = guard.unlock();
    result
}

fn stage_and_swap(staged: &Path, target: &Path, content: &str) -> Result<()> {
    let mut file = std::fs::File::create(staged)
        .with_context(|| format!("Failed to create {}", staged.display()))?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(staged, target)
        .with_context(|| format!("Failed to replace {}", target.display()))
}
