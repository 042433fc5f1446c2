use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use dpk_util::errors::DpkError;
use dpk_util::fs::expand_home;

use crate::repository::Repository;

/// User configuration loaded from `~/.dpk/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DpkConfig {
    /// Repository base URLs, in priority order.
    #[serde(default)]
    pub repositories: Vec<String>,

    #[serde(default)]
    pub architectures: Vec<String>,

    /// Directory holding extracted plain-text indexes.
    #[serde(default, rename = "index-dir")]
    pub index_dir: Option<String>,

    #[serde(default)]
    pub resolve: ResolveConfig,
}

/// Graph ordering settings from `[resolve]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default = "default_break_cycles", rename = "break-cycles")]
    pub break_cycles: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            break_cycles: default_break_cycles(),
        }
    }
}

fn default_break_cycles() -> bool {
    true
}

impl DpkConfig {
    /// Load `~/.dpk/config.toml`, or return defaults if the file doesn't exist.
    ///
    /// Lists left empty are filled from the classic `repositories` and `arch`
    /// files in `~/.dpk/` when present.
    pub fn load() -> miette::Result<Self> {
        let path = Self::default_path();
        let mut config = if path.is_file() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.fill_from_property_files(&dirs_path())?;
        Ok(config)
    }

    /// Fill empty `repositories` / `architectures` from the `repositories`
    /// and `arch` property files in `dir`. Missing files are skipped.
    pub fn fill_from_property_files(&mut self, dir: &Path) -> miette::Result<()> {
        let repositories = dir.join("repositories");
        if self.repositories.is_empty() && repositories.is_file() {
            self.repositories = read_property_list(&repositories)?;
        }
        let arch = dir.join("arch");
        if self.architectures.is_empty() && arch.is_file() {
            self.architectures = read_property_list(&arch)?;
        }
        Ok(())
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DpkError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| DpkError::Config {
            message: format!("Failed to parse {}: {e}", path.display()),
        })?;
        tracing::debug!(
            "loaded {} repositories and {} architectures from {}",
            config.repositories.len(),
            config.architectures.len(),
            path.display()
        );
        Ok(config)
    }

    /// Returns the default path to the config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Every configured repository crossed with every architecture,
    /// repository-major.
    pub fn repositories(&self) -> Vec<Repository> {
        self.repositories
            .iter()
            .flat_map(|repo| {
                self.architectures
                    .iter()
                    .map(move |arch| Repository::new(repo.as_str(), arch.as_str()))
            })
            .collect()
    }

    /// Directory holding extracted indexes, `~/.dpk/indexes` unless configured.
    pub fn index_dir(&self) -> PathBuf {
        match &self.index_dir {
            Some(dir) => expand_home(dir),
            None => dirs_path().join("indexes"),
        }
    }

    /// Paths of the extracted index of every configured repository.
    pub fn index_paths(&self) -> Vec<PathBuf> {
        let dir = self.index_dir();
        self.repositories()
            .iter()
            .map(|repo| dir.join(repo.index_name()))
            .collect()
    }
}

/// Returns the path to the dpk data directory (`~/.dpk/`).
pub fn dirs_path() -> PathBuf {
    expand_home("~/.dpk")
}

/// Read a line-based property file such as the classic `repositories` and
/// `arch` files. Blank lines and `#` comments are skipped, entries are trimmed.
pub fn read_property_list(path: &Path) -> miette::Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| DpkError::Config {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
