//! Workspace configuration: `.docket/config.toml`.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory holding the database and config, relative to the workspace root.
pub const DATA_DIR: &str = ".docket";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Database filename inside the data directory.
    #[serde(default = "default_db_file")]
    pub db_file: String,
    /// Default listing page size when the caller supplies none.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_db_file() -> String {
    "docket.sqlite3".to_string()
}

const fn default_page_size() -> u32 {
    crate::query::DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Load config from `<root>/.docket/config.toml`, falling back to
    /// defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on parse failure or an out-of-domain value.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(DATA_DIR).join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| Error::Storage(anyhow!("read {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| Error::invalid(format!("parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size < 1 {
            return Err(Error::invalid("page_size must be a positive integer"));
        }
        if self.db_file.trim().is_empty() {
            return Err(Error::invalid("db_file must not be blank"));
        }
        Ok(())
    }

    /// Path of the database under `root`.
    #[must_use]
    pub fn db_path(&self, root: &Path) -> PathBuf {
        root.join(DATA_DIR).join(&self.db_file)
    }
}

/// Walk up from `start` looking for a directory containing `.docket/`.
#[must_use]
pub fn find_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(DATA_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DATA_DIR, find_root};

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Config::load(dir.path()).expect("load");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let data = dir.path().join(DATA_DIR);
        std::fs::create_dir_all(&data).expect("mkdir");
        std::fs::write(data.join("config.toml"), "page_size = 25\n").expect("write");

        let config = Config::load(dir.path()).expect("load");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.db_file, "docket.sqlite3");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let data = dir.path().join(DATA_DIR);
        std::fs::create_dir_all(&data).expect("mkdir");
        std::fs::write(data.join("config.toml"), "page_size = 0\n").expect("write");
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn find_root_walks_up() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(dir.path().join(DATA_DIR)).expect("mkdir");
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).expect("mkdir nested");

        let root = find_root(&nested).expect("root found");
        assert_eq!(root, dir.path());
        assert!(find_root(std::path::Path::new("/nonexistent-docket")).is_none());
    }
}
