pub mod assets;
pub mod render;
pub mod writer;

#[cfg(test)]
mod tests;

use crate::config::MirrorConfig;
use crate::filter::{self, AssetFilter};
use crate::metadata;
use crate::results::{AssetOutcome, AssetReference, MirrorResult};
use fantoccini::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use url::Url;

/// One requested page: its validated URL and the derived output location.
///
/// Exists only for the duration of its mirror job.
#[derive(Debug, Clone)]
pub struct MirrorTarget {
    /// Origin URL, fragment stripped
    pub url: Url,

    /// Authority component used as the per-host directory name
    pub host: String,

    /// `output_root/<host>`
    pub dir: PathBuf,
}

impl MirrorTarget {
    /// Validates the candidate string and derives the output location.
    /// Rejection never panics; the reason becomes the job's failed result.
    pub fn new(candidate: &str, output_root: &Path) -> Result<Self, String> {
        if !filter::is_valid_page_url(candidate) {
            return Err("not an absolute URL".to_string());
        }

        let url = Url::parse(candidate).map_err(|e| e.to_string())?;
        let url = filter::normalize_url(&url);
        let host = writer::host_identifier(&url).ok_or("URL has no host")?;
        let dir = output_root.join(&host);

        Ok(Self { url, host, dir })
    }
}

/// Starts the batch and returns a receiver that yields one `MirrorResult`
/// per input URL as jobs finish.
///
/// Every URL gets a job; invalid ones resolve to a failed result without
/// touching the browser. Jobs run concurrently with no fan-out cap, each in
/// its own task with its own WebDriver session, and no job's failure aborts
/// a sibling. The channel closes once every job has delivered its result;
/// that closure is the batch's completed state.
pub async fn start(
    config: &MirrorConfig,
    asset_filter: Arc<AssetFilter>,
    urls: &[String],
) -> mpsc::Receiver<MirrorResult> {
    ::log::info!(
        "Starting mirror batch: {} URLs into {}",
        urls.len(),
        config.output_root
    );

    let (result_tx, result_rx) = mpsc::channel::<MirrorResult>(urls.len().max(1));
    let output_root = PathBuf::from(&config.output_root);

    for raw in urls {
        let target = match MirrorTarget::new(raw, &output_root) {
            Ok(target) => target,
            Err(reason) => {
                ::log::error!("Skipping {}: {}", raw, reason);
                let _ = result_tx
                    .send(MirrorResult::failed(raw.as_str(), reason))
                    .await;
                continue;
            }
        };

        let config = config.clone();
        let asset_filter = Arc::clone(&asset_filter);
        let result_tx = result_tx.clone();

        tokio::spawn(async move {
            let url = target.url.to_string();
            let result = mirror_job(&config, &asset_filter, &target).await;
            if result_tx.send(result).await.is_err() {
                ::log::warn!("Result receiver dropped before {} finished", url);
            }
        });
    }

    // Each job holds its own sender clone; dropping the original closes the
    // channel once the last job completes
    drop(result_tx);

    result_rx
}

/// Runs one mirror job inside its own error boundary: acquire a session,
/// run the pipeline, and release the session on every exit path.
async fn mirror_job(
    config: &MirrorConfig,
    asset_filter: &AssetFilter,
    target: &MirrorTarget,
) -> MirrorResult {
    ::log::info!("Processing {}", target.url);

    let Some(client) = render::connect(&config.webdriver_url).await else {
        return MirrorResult::failed(
            target.url.to_string(),
            "could not reach a WebDriver server",
        );
    };

    let result = run_pipeline(&client, config, asset_filter, target).await;

    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close session for {}: {}", target.url, e);
    }

    result
}

/// render -> write page -> discover -> fetch/write each asset.
///
/// The page file write does not depend on asset completion; each asset runs
/// under its own boundary and only ever fails itself.
async fn run_pipeline(
    client: &Client,
    config: &MirrorConfig,
    asset_filter: &AssetFilter,
    target: &MirrorTarget,
) -> MirrorResult {
    let url = target.url.to_string();

    let html = match render::render(client, &url, config).await {
        Ok(html) => html,
        Err(reason) => {
            ::log::error!("Failed to render {}: {}", url, reason);
            return MirrorResult::failed(url, reason);
        }
    };

    let page_metadata = metadata::extract(&html);

    if !config.mirror {
        return MirrorResult {
            url,
            host: Some(target.host.clone()),
            page_path: None,
            metadata: Some(page_metadata),
            assets: Vec::new(),
            error: None,
        };
    }

    let page_path = match writer::write_page(&target.dir, &html).await {
        Ok(path) => path,
        Err(reason) => {
            ::log::error!("Failed to write page for {}: {}", url, reason);
            return MirrorResult {
                url,
                host: Some(target.host.clone()),
                page_path: None,
                metadata: Some(page_metadata),
                assets: Vec::new(),
                error: Some(reason),
            };
        }
    };
    ::log::info!("Wrote {} -> {}", url, page_path.display());

    let discovered = match assets::discover(client).await {
        Ok(references) => references,
        Err(reason) => {
            // The page itself is already mirrored; report and move on
            ::log::warn!("Asset discovery failed for {}: {}", url, reason);
            Vec::new()
        }
    };

    let outcomes = mirror_assets(client, config, asset_filter, target, discovered).await;

    MirrorResult {
        url,
        host: Some(target.host.clone()),
        page_path: Some(page_path),
        metadata: Some(page_metadata),
        assets: outcomes,
        error: None,
    }
}

/// Fans the discovered references out to per-asset tasks over clones of the
/// job's session client and collects every outcome. References that fail
/// the fetchability gate are reported without a fetch attempt.
async fn mirror_assets(
    client: &Client,
    config: &MirrorConfig,
    asset_filter: &AssetFilter,
    target: &MirrorTarget,
    discovered: Vec<AssetReference>,
) -> Vec<AssetOutcome> {
    let mut outcomes = Vec::with_capacity(discovered.len());
    let fetch_budget = Duration::from_secs(config.nav_timeout_secs);

    let mut jobs = JoinSet::new();
    for reference in discovered {
        if !asset_filter.should_fetch(&reference.url) {
            ::log::debug!("Skipping non-fetchable asset: {}", reference.url);
            outcomes.push(AssetOutcome::failed(&reference, "not a fetchable asset URL"));
            continue;
        }

        let client = client.clone();
        let host_dir = target.dir.clone();
        jobs.spawn(async move {
            fetch_and_write(&client, &host_dir, reference, fetch_budget).await
        });
    }

    while let Some(joined) = jobs.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => ::log::error!("Asset task for {} died: {}", target.url, e),
        }
    }

    outcomes
}

/// Fetch one asset and write it under the per-host directory. Every failure
/// mode lands in the returned outcome; nothing propagates.
async fn fetch_and_write(
    client: &Client,
    host_dir: &Path,
    reference: AssetReference,
    budget: Duration,
) -> AssetOutcome {
    let dest = match writer::asset_destination(host_dir, &reference.url) {
        Ok(dest) => dest,
        Err(reason) => {
            ::log::warn!("Rejecting {} {}: {}", reference.kind, reference.url, reason);
            return AssetOutcome::failed(&reference, reason);
        }
    };

    let bytes = match assets::fetch(client, &reference.url, budget).await {
        Ok(bytes) => bytes,
        Err(reason) => {
            ::log::warn!("Failed to fetch {} {}: {}", reference.kind, reference.url, reason);
            return AssetOutcome::failed(&reference, reason);
        }
    };

    match writer::write_asset(&dest, &bytes).await {
        Ok(()) => {
            ::log::debug!("Wrote {} ({} bytes)", dest.display(), bytes.len());
            AssetOutcome::written(&reference, dest)
        }
        Err(reason) => {
            ::log::warn!("Failed to write {}: {}", dest.display(), reason);
            AssetOutcome::failed(&reference, reason)
        }
    }
}
