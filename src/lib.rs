// Re-export modules
pub mod config;
pub mod filter;
pub mod metadata;
pub mod mirror;
pub mod results;

// Re-export commonly used types for convenience
pub use metadata::PageMetadata;
pub use results::{AssetKind, AssetOutcome, AssetReference, MirrorResult};

use crate::config::MirrorConfig;
use crate::filter::AssetFilter;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Builder for a batch of page mirror jobs
///
/// Renders each URL through a WebDriver-controlled browser, extracts its
/// structural metadata, and (in mirror mode) writes the page and its static
/// assets into a per-host directory tree.
pub struct Mirrors {
    urls: Vec<String>,
    config: Option<MirrorConfig>,
}

impl Mirrors {
    /// Create a new builder for the given page URLs
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls, config: None }
    }

    /// Apply a configuration
    pub fn with_config(mut self, config: MirrorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(
        mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        self.config = Some(MirrorConfig::from_file(path)?);
        Ok(self)
    }

    /// Apply configuration from a JSON string
    pub fn with_config_str(mut self, json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        self.config = Some(MirrorConfig::from_json(json)?);
        Ok(self)
    }

    /// Set the directory the per-host mirror trees are written under
    pub fn with_output_root(mut self, output_root: impl Into<String>) -> Self {
        self.config_mut().output_root = output_root.into();
        self
    }

    /// Enable or disable writing pages and assets to disk
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.config_mut().mirror = mirror;
        self
    }

    /// Set the per-page render timeout in seconds
    pub fn with_nav_timeout(mut self, seconds: u64) -> Self {
        self.config_mut().nav_timeout_secs = seconds;
        self
    }

    /// Set the network quiescence window in milliseconds
    pub fn with_idle_window(mut self, millis: u64) -> Self {
        self.config_mut().idle_ms = millis;
        self
    }

    fn config_mut(&mut self) -> &mut MirrorConfig {
        self.config.get_or_insert_with(MirrorConfig::default)
    }

    /// Start the batch and get a receiver for per-page results
    ///
    /// The receiver yields one `MirrorResult` per input URL as jobs finish,
    /// in completion order, and closes once every job has reached its own
    /// terminal state. A failed job yields a failed result; it never takes
    /// the batch down with it.
    pub async fn generate(
        self,
    ) -> Result<mpsc::Receiver<MirrorResult>, Box<dyn std::error::Error>> {
        let mut config = self.config.unwrap_or_default();

        // Environment overrides, applied last
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                config.webdriver_url = webdriver_url;
            }
        }
        if let Ok(output_root) = std::env::var("MIRROR_OUTPUT_ROOT") {
            if !output_root.is_empty() {
                config.output_root = output_root;
            }
        }

        let asset_filter = Arc::new(AssetFilter::new(&config.exclude_assets)?);

        Ok(mirror::start(&config, asset_filter, &self.urls).await)
    }

    /// Run the whole batch and collect every result
    ///
    /// Waits for all jobs rather than short-circuiting on the first failure.
    pub async fn run(self) -> Result<Vec<MirrorResult>, Box<dyn std::error::Error>> {
        let mut rx = self.generate().await?;

        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        Ok(results)
    }
}
