// Application settings
// Loaded from ~/.config/sitetools/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::Store;

pub const DEFAULT_PALETTE_URL: &str = "https://palomakop.tv/colors.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Palette
    #[serde(rename = "palette.url")]
    pub palette_url: String,

    // Videos
    #[serde(rename = "video.oembedWidth")]
    pub oembed_width: u32,

    #[serde(rename = "video.vimeoAttempts")]
    pub vimeo_attempts: u32,

    #[serde(rename = "video.vimeoRetryDelayMs")]
    pub vimeo_retry_delay_ms: u64,

    // Network
    #[serde(rename = "http.timeoutSecs")]
    pub http_timeout_secs: u64,

    // Storage
    #[serde(rename = "storage.root")]
    pub storage_root: Option<PathBuf>,  // None = default location
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            palette_url: DEFAULT_PALETTE_URL.to_string(),
            oembed_width: 500,
            vimeo_attempts: 3,
            vimeo_retry_delay_ms: 2000,
            http_timeout_secs: 30,
            storage_root: None,
        }
    }
}

const DEFAULT_CONFIG: &str = r#"{
    // Site palette fetched by `sitetools palette load-url`
    "palette.url": "https://palomakop.tv/colors.json",

    // Vimeo oEmbed lookups
    "video.oembedWidth": 500,
    "video.vimeoAttempts": 3,
    "video.vimeoRetryDelayMs": 2000,

    // Network
    "http.timeoutSecs": 30,

    // Storage directory (null = ~/.config/sitetools/storage)
    "storage.root": null
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sitetools");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            Self::create_default_file(&path);
            return Self::default();
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }

    /// Store at the configured root, or the default one.
    pub fn store(&self) -> Store {
        match &self.storage_root {
            Some(root) => Store::at(root),
            None => Store::open_default(),
        }
    }
}
