use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use rectangle::palette::DEFAULT_SEED;

use crate::args::ArgsInteractive;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub seed: u64,
    pub assets: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            seed: DEFAULT_SEED,
            assets: None,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Textured rectangle".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InputError(path.to_owned(), e))?;

        Self::parse(&src)
    }

    pub fn parse(src: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(src)?;

        if config.window.width == 0 || config.window.height == 0 {
            return Err(ConfigError::InvalidWindowSize);
        }

        Ok(config)
    }

    /// Command line values take precedence over the file.
    pub fn apply_args(&mut self, args: &ArgsInteractive) {
        if let Some(assets) = &args.assets {
            self.assets = Some(assets.clone());
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(width) = args.width.filter(|w| *w > 0) {
            self.window.width = width;
        }
        if let Some(height) = args.height.filter(|h| *h > 0) {
            self.window.height = height;
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {0:?}: {1}")]
    InputError(PathBuf, #[source] std::io::Error),
    #[error("Invalid config: {0}")]
    FormatError(#[from] toml::de::Error),
    #[error("Window size must be non-zero")]
    InvalidWindowSize,
}
