use clap::Parser;
use mirror_page::Mirrors;
use mirror_page::results::MirrorResult;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting {} page jobs", args.urls.len());

    println!("Note: rendering requires a WebDriver server (e.g. chromedriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    // Create a Mirrors builder with the specified parameters
    let mut mirrors = Mirrors::new(args.urls);

    // Apply configuration from file first so CLI flags override it
    if let Some(config_file) = args.config_file {
        mirrors = match mirrors.with_config_file(&config_file) {
            Ok(mirrors) => mirrors,
            Err(e) => {
                ::log::error!("Failed to load {}: {}", config_file, e);
                return;
            }
        };
    }

    mirrors = mirrors
        .with_mirror(args.mirror)
        .with_output_root(args.output)
        .with_idle_window(args.idle_ms)
        .with_nav_timeout(args.nav_timeout);

    // Start the batch and get a receiver for results
    let mut rx = match mirrors.generate().await {
        Ok(rx) => rx,
        Err(e) => {
            ::log::error!("Failed to start mirror batch: {}", e);
            return;
        }
    };

    // Process results as jobs finish
    let mut succeeded = 0;
    let mut failed = 0;
    let start_time = std::time::Instant::now();

    while let Some(result) = rx.recv().await {
        if result.is_ok() {
            succeeded += 1;
        } else {
            failed += 1;
        }
        report_result(&result);
    }

    let duration = start_time.elapsed();
    ::log::info!(
        "Batch complete - {} succeeded, {} failed in {:.2} seconds",
        succeeded,
        failed,
        duration.as_secs_f64()
    );
}

/// Prints one line per page plus one per asset failure
fn report_result(result: &MirrorResult) {
    if let Some(reason) = &result.error {
        ::log::error!("{}: {}", result.url, reason);
        return;
    }

    match &result.page_path {
        Some(path) => {
            ::log::info!(
                "{} -> {} ({} assets written, {} failed)",
                result.url,
                path.display(),
                result.assets_written(),
                result.assets_failed()
            );
        }
        None => {
            // Metadata-only run
            if let Some(meta) = &result.metadata {
                ::log::info!(
                    "{}: title={:?}, {} headings, {} links",
                    result.url,
                    meta.title,
                    meta.headings.len(),
                    meta.link_count
                );
            }
        }
    }

    for asset in result.assets.iter().filter(|a| !a.is_ok()) {
        ::log::warn!(
            "  {} {} failed: {}",
            asset.kind,
            asset.url,
            asset.error.as_deref().unwrap_or("unknown")
        );
    }
}
