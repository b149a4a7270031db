use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

/// Runtime configuration. Constructed once at startup and passed by
/// reference into every component; there is no global instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The directory boundary all served content must live within.
    pub root_folder: PathBuf,
    /// Name of the cache directory under the root. Must keep its leading
    /// dot so the scanner hides it from folder listings.
    #[serde(default = "default_cache_dir_name")]
    pub cache_dir_name: String,
    #[serde(default = "default_quality")]
    pub thumbnail_quality: u8,
    #[serde(default = "default_min_size")]
    pub min_thumbnail_size: u32,
    #[serde(default = "default_max_size")]
    pub max_thumbnail_size: u32,
    /// How many directory levels a folder-preview search may descend.
    #[serde(default = "default_preview_depth")]
    pub preview_depth: u32,
}

fn default_cache_dir_name() -> String {
    String::from(".thumbcache")
}

fn default_quality() -> u8 {
    85
}

fn default_min_size() -> u32 {
    50
}

fn default_max_size() -> u32 {
    400
}

fn default_preview_depth() -> u32 {
    2
}

impl Default for Config {
    fn default() -> Self {
        let root_folder = dirs::picture_dir()
            .unwrap_or_else(|| PathBuf::from("/images"));

        Self {
            root_folder,
            cache_dir_name: default_cache_dir_name(),
            thumbnail_quality: default_quality(),
            min_thumbnail_size: default_min_size(),
            max_thumbnail_size: default_max_size(),
            preview_depth: default_preview_depth(),
        }
    }
}

impl Config {
    pub fn new(root_folder: impl Into<PathBuf>) -> Self {
        Self {
            root_folder: root_folder.into(),
            ..Self::default()
        }
    }

    /// Load config from `path`, creating it with defaults on first run.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("reading config at {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("parsing config at {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)
            .with_context(|| format!("writing config to {}", path.display()))?;

        Ok(())
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
        Ok(home.join(".mediashelf").join("config.toml"))
    }

    /// Absolute location of the thumbnail cache tree.
    pub fn cache_dir(&self) -> PathBuf {
        self.root_folder.join(&self.cache_dir_name)
    }

    /// Clamp a requested pixel size into the allowed range.
    pub fn clamp_size(&self, requested: u32) -> u32 {
        requested.clamp(self.min_thumbnail_size, self.max_thumbnail_size)
    }
}
