use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "mirror-page")]
#[command(about = "Fetch pages through a real browser and optionally mirror them to disk")]
#[command(version)]
pub struct Args {
    /// Page URLs to process
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Mirror each page and its static assets to disk
    #[arg(short, long)]
    pub mirror: bool,

    /// Directory to write per-host mirrors under
    #[arg(short, long, default_value = "site-mirror")]
    pub output: String,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config_file: Option<String>,

    /// Network quiescence window in milliseconds (page counts as loaded
    /// after this much silence)
    #[arg(long, default_value_t = 500)]
    pub idle_ms: u64,

    /// Per-page render timeout in seconds
    #[arg(long, default_value_t = 45)]
    pub nav_timeout: u64,
}
