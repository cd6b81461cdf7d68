use clap::Parser;
use mirror_page::Mirrors;
use std::error::Error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URLs to mirror
    #[arg(required = true)]
    urls: Vec<String>,

    /// Output root directory
    #[arg(short, long, default_value = "site-mirror")]
    output: String,

    /// JSON configuration string
    #[arg(short, long)]
    config: Option<String>,

    /// Path to JSON configuration file
    #[arg(long)]
    config_file: Option<String>,

    /// Quiescence window in milliseconds
    #[arg(short, long)]
    idle_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    println!("Mirroring {} URLs into {}", args.urls.len(), args.output);

    let mut builder = Mirrors::new(args.urls).with_mirror(true);

    // Apply configuration from file if specified
    if let Some(config_file) = args.config_file {
        println!("Loading configuration from file: {}", config_file);
        builder = builder.with_config_file(config_file)?;
    }

    // Apply configuration from string if specified (overrides file config)
    if let Some(config_str) = args.config {
        println!("Applying configuration from string");
        builder = builder.with_config_str(&config_str)?;
    }

    // Apply command-line overrides
    builder = builder.with_output_root(args.output);
    if let Some(idle_ms) = args.idle_ms {
        println!("Overriding quiescence window: {}ms", idle_ms);
        builder = builder.with_idle_window(idle_ms);
    }

    // Run the batch to completion and collect every result
    let start_time = std::time::Instant::now();
    let results = builder.run().await?;

    for result in &results {
        match &result.error {
            Some(reason) => println!("failed  {}: {}", result.url, reason),
            None => println!(
                "mirrored {} ({} assets written, {} failed)",
                result.url,
                result.assets_written(),
                result.assets_failed()
            ),
        }
    }

    let duration = start_time.elapsed();
    println!(
        "Batch complete. Processed {} pages in {:.2} seconds.",
        results.len(),
        duration.as_secs_f64()
    );

    Ok(())
}
