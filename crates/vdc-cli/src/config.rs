//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use vdc_core::AmbiguityPolicy;
use vdc_core::report::{DEFAULT_HIGHLIGHT_SPEEDS, DEFAULT_SPEEDS};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Program used to read video durations.
    pub ffprobe_path: PathBuf,

    /// Fixed reading of two-part times; prompt each session when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<AmbiguityPolicy>,

    /// Playback speeds listed in the report after normal speed.
    pub speeds: Vec<f64>,

    /// Speeds marked as recommended in the report.
    pub highlight_speeds: Vec<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ffprobe_path: PathBuf::from("ffprobe"),
            policy: None,
            speeds: DEFAULT_SPEEDS.to_vec(),
            highlight_speeds: DEFAULT_HIGHLIGHT_SPEEDS.to_vec(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (VDC_*)
        figment = figment.merge(Env::prefixed("VDC_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for vdc.
///
/// On Linux: `~/.config/vdc`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vdc"))
}
