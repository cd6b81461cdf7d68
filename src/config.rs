use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for a mirror batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Directory the per-host mirror trees are written under
    #[serde(default = "default_output_root")]
    pub output_root: String,

    /// Whether to write the page and its assets to disk
    /// (when false, pages are only rendered and inspected for metadata)
    #[serde(default = "default_mirror")]
    pub mirror: bool,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Upper bound on a single page render, in seconds
    #[serde(default = "default_nav_timeout_secs")]
    pub nav_timeout_secs: u64,

    /// Network must stay quiet this long before a page counts as loaded
    #[serde(default = "default_idle_ms")]
    pub idle_ms: u64,

    /// Interval between quiescence probes
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,

    /// Give up waiting for quiescence after this long and mirror what loaded
    #[serde(default = "default_max_quiescence_secs")]
    pub max_quiescence_secs: u64,

    /// Regex patterns for asset URLs to skip
    #[serde(default)]
    pub exclude_assets: Vec<String>,
}

impl MirrorConfig {
    /// Create a new configuration with default values
    pub fn new(output_root: &str) -> Self {
        Self {
            output_root: output_root.to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            mirror: default_mirror(),
            webdriver_url: default_webdriver_url(),
            nav_timeout_secs: default_nav_timeout_secs(),
            idle_ms: default_idle_ms(),
            poll_ms: default_poll_ms(),
            max_quiescence_secs: default_max_quiescence_secs(),
            exclude_assets: Vec::new(),
        }
    }
}

/// Default value for output_root
fn default_output_root() -> String {
    "site-mirror".to_string()
}

/// Default value for mirror
fn default_mirror() -> bool {
    true
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default navigation timeout
fn default_nav_timeout_secs() -> u64 {
    45
}

/// Default quiescence window
fn default_idle_ms() -> u64 {
    500
}

/// Default quiescence probe interval
fn default_poll_ms() -> u64 {
    100
}

/// Default quiescence wait ceiling
fn default_max_quiescence_secs() -> u64 {
    10
}
