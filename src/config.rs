//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\autotagger\config.toml
//! - macOS: ~/Library/Application Support/autotagger/config.toml
//! - Linux: ~/.config/autotagger/config.toml
//!
//! A different file can be given with `--config`. Command-line flags are
//! applied on top of whatever the file says, and the result is immutable for
//! the rest of the run: every component receives it by reference.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Signature written into the comment field of processed files.
pub const DEFAULT_WATERMARK: &str = "Processed by autotagger";

/// Browser-like user agent; the lyrics sites serve stripped pages otherwise.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_3) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/35.0.1916.47 Safari/537.36";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Song catalog lookups
    pub catalog: CatalogConfig,

    /// Lyrics providers
    pub lyrics: LyricsConfig,

    /// What gets written into the tags
    pub tagging: TaggingConfig,

    /// Where processed files end up
    pub output: OutputConfig,

    /// File discovery
    pub scan: ScanConfig,

    /// Optional transcoding
    pub conversion: ConversionConfig,

    /// HTTP client settings
    pub network: NetworkConfig,

    /// Console/file logging
    pub logging: LoggingConfig,
}

/// Catalog (iTunes Search API) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Storefront countries, tried in order until one returns results
    pub countries: Vec<String>,

    /// Take the first result as-is and never retry with the minimal query
    pub strict: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            countries: vec!["US".to_string()],
            strict: false,
        }
    }
}

/// Lyrics provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Whether to look up lyrics at all
    pub enabled: bool,

    /// Provider names in priority order ("azlyrics", "musixmatch")
    pub providers: Vec<String>,

    /// Never fall back to the minimal query
    pub strict: bool,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            providers: vec!["azlyrics".to_string(), "musixmatch".to_string()],
            strict: false,
        }
    }
}

/// Tag writing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Write the watermark into the comment field
    pub watermark: bool,

    /// Watermark text
    pub watermark_text: String,

    /// Download and embed the cover image
    pub embed_cover: bool,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            watermark: true,
            watermark_text: DEFAULT_WATERMARK.to_string(),
            embed_cover: true,
        }
    }
}

impl TaggingConfig {
    /// The watermark to write, if enabled.
    pub fn watermark(&self) -> Option<&str> {
        self.watermark.then_some(self.watermark_text.as_str())
    }
}

/// Output placement settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination root; processed files go back under the source when unset
    pub destination: Option<PathBuf>,

    /// Rename files to "Artist - Title"
    pub rename: bool,

    /// Put everything directly in the destination root
    pub flatten: bool,

    /// Replace existing files instead of picking a " - N" name
    pub overwrite: bool,

    /// Delete the original after a successful run
    pub remove_original: bool,
}

/// File discovery settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Descend into subdirectories
    pub recursive: bool,
}

/// Transcoding settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Target format (m4a, mp3, alac, flac, aiff, aif, ogg); none = keep
    pub format: Option<String>,

    /// Target bitrate in kbit/s
    pub bitrate: Option<u32>,

    /// ffmpeg executable
    pub ffmpeg: PathBuf,
}

/// HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Per-request timeout; transport default when unset
    pub timeout_secs: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Report progress at info level
    pub verbose: bool,

    /// Also write log lines to this file
    pub file: Option<PathBuf>,
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("autotagger"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path.
///
/// Unlike [`load`], a missing or malformed file is an error: the user asked
/// for this file specifically.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        crate::error::Error::config(e.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
