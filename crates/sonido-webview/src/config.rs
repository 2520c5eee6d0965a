//! Editor configuration.
//!
//! An editor is described by its preferred size and the directory its web
//! content lives in. Configs can be built in code or loaded from TOML:
//!
//! ```toml
//! width = 640
//! height = 420
//! asset_root = "/Library/Audio/Plug-Ins/CLAP/Sonido Drive.clap/Contents/Resources/ui"
//! entry = "index.html"
//! developer_mode = false
//! background = [26, 26, 31, 255]
//! ```

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::geometry::Rgba;

/// Errors raised while loading or validating an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Width or height is zero
    #[error("editor size must be positive, got {width}x{height}")]
    InvalidSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Asset root does not exist or cannot be inspected
    #[error("asset root '{path}' is not accessible: {source}")]
    MissingAssetRoot {
        /// Configured asset root.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Asset root exists but is a file
    #[error("asset root '{0}' is not a directory")]
    AssetRootNotDirectory(PathBuf),

    /// Entry document escapes the asset root
    #[error("entry '{0}' must be a relative path inside the asset root")]
    InvalidEntry(String),

    /// Entry document does not exist
    #[error("entry document '{0}' not found")]
    MissingEntry(PathBuf),

    /// Entry document path cannot be expressed as a `file://` URL
    #[error("entry document '{0}' has no file URL")]
    InvalidEntryUrl(PathBuf),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

/// Preferred editor size and content location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    /// Preferred width in logical pixels.
    pub width: u32,

    /// Preferred height in logical pixels.
    pub height: u32,

    /// Directory holding the web content.
    pub asset_root: PathBuf,

    /// Entry document, relative to `asset_root`.
    #[serde(default = "default_entry")]
    pub entry: String,

    /// Enable the renderer's inspector.
    #[serde(default)]
    pub developer_mode: bool,

    /// Colour painted behind the renderer.
    #[serde(default)]
    pub background: Rgba,
}

fn default_entry() -> String {
    "index.html".to_string()
}

impl EditorConfig {
    /// Config with the default entry document and background.
    pub fn new(asset_root: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            asset_root: asset_root.into(),
            entry: default_entry(),
            developer_mode: false,
            background: Rgba::default(),
        }
    }

    /// Set the entry document.
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }

    /// Enable or disable developer mode.
    pub fn with_developer_mode(mut self, enabled: bool) -> Self {
        self.developer_mode = enabled;
        self
    }

    /// Set the background colour.
    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a config from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the config to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the size is positive, the asset root is a readable directory and
    /// the entry document exists inside it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.entry_path().map(|_| ())
    }

    /// Validated absolute path of the entry document.
    pub fn entry_path(&self) -> Result<PathBuf, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }

        let metadata =
            std::fs::metadata(&self.asset_root).map_err(|source| ConfigError::MissingAssetRoot {
                path: self.asset_root.clone(),
                source,
            })?;
        if !metadata.is_dir() {
            return Err(ConfigError::AssetRootNotDirectory(self.asset_root.clone()));
        }

        let entry = Path::new(&self.entry);
        let escapes = entry
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if self.entry.is_empty() || escapes {
            return Err(ConfigError::InvalidEntry(self.entry.clone()));
        }

        let path = self.asset_root.join(entry);
        if !path.is_file() {
            return Err(ConfigError::MissingEntry(path));
        }
        std::fs::canonicalize(&path).map_err(|e| ConfigError::read_file(&path, e))
    }

    /// `file://` URL of the validated entry document.
    pub fn entry_url(&self) -> Result<String, ConfigError> {
        file_url(&self.entry_path()?)
    }
}

/// Format an absolute path as a `file://` URL.
fn file_url(path: &Path) -> Result<String, ConfigError> {
    Url::from_file_path(path)
        .map(String::from)
        .map_err(|()| ConfigError::InvalidEntryUrl(path.to_path_buf()))
}
