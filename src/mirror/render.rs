use crate::config::MirrorConfig;
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};

/// Probe run inside the page to judge load progress: ready state plus the
/// number of resource timing entries recorded so far.
const QUIESCENCE_PROBE: &str = "return [document.readyState === 'complete', \
     performance.getEntriesByType('resource').length];";

/// Connects to the WebDriver instance, trying common fallback ports after
/// the configured URL.
pub async fn connect(webdriver_url: &str) -> Option<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // Selenium/geckodriver default
        "http://127.0.0.1:4444", // Try with IP instead of localhost
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue; // Skip if it's the same as the one we already tried
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!("Failed to connect to any WebDriver server");
    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    None
}

/// Navigates to the URL, waits for network quiescence, and returns the
/// serialized post-script DOM.
///
/// Navigation and quiescence together are bounded by the configured render
/// timeout; any failure inside that window surfaces as the page's render
/// failure and no files are written for it.
pub async fn render(client: &Client, url: &str, config: &MirrorConfig) -> Result<String, String> {
    let render_budget = Duration::from_secs(config.nav_timeout_secs);

    let rendered = timeout(render_budget, async {
        client
            .goto(url)
            .await
            .map_err(|e| describe_cmd_error(&e, "navigating to"))?;

        wait_for_quiescence(client, url, config).await;

        client
            .source()
            .await
            .map_err(|e| describe_cmd_error(&e, "reading source of"))
    })
    .await;

    match rendered {
        Ok(result) => result,
        Err(_) => Err(format!(
            "render timed out after {}s",
            config.nav_timeout_secs
        )),
    }
}

/// Waits until the page has been network-quiet for the configured idle
/// window: ready state complete and no new resource entries appearing. A
/// plain DOM-ready signal is not enough here, since scripts keep injecting
/// asset references after the initial parse.
///
/// Bounded by `max_quiescence_secs`; when the ceiling is hit the page is
/// mirrored as-is.
async fn wait_for_quiescence(client: &Client, url: &str, config: &MirrorConfig) {
    let idle = Duration::from_millis(config.idle_ms);
    let poll = Duration::from_millis(config.poll_ms.max(10));
    let deadline = Instant::now() + Duration::from_secs(config.max_quiescence_secs);

    let mut last_resources: Option<u64> = None;
    let mut stable_since = Instant::now();

    loop {
        let (ready, resources) = match probe(client).await {
            Ok(state) => state,
            Err(e) => {
                // Pages that block script evaluation still get mirrored
                ::log::debug!("Quiescence probe failed for {}: {}", url, e);
                return;
            }
        };

        if last_resources != Some(resources) {
            last_resources = Some(resources);
            stable_since = Instant::now();
        } else if ready && stable_since.elapsed() >= idle {
            ::log::debug!(
                "{} quiescent with {} resources loaded",
                url,
                resources
            );
            return;
        }

        if Instant::now() >= deadline {
            ::log::debug!("Quiescence wait ceiling reached for {}", url);
            return;
        }

        sleep(poll).await;
    }
}

async fn probe(client: &Client) -> Result<(bool, u64), String> {
    let value = client
        .execute(QUIESCENCE_PROBE, vec![])
        .await
        .map_err(|e| e.to_string())?;

    let pair = value.as_array().ok_or("probe returned a non-array")?;
    let ready = pair.first().and_then(|v| v.as_bool()).unwrap_or(false);
    let resources = pair.get(1).and_then(|v| v.as_u64()).unwrap_or(0);
    Ok((ready, resources))
}

/// Folds a WebDriver command error into a reportable reason, keeping the
/// session-loss case distinguishable in logs.
pub fn describe_cmd_error(error: &fantoccini::error::CmdError, context: &str) -> String {
    if error.to_string().contains("Unable to find session") {
        format!("session lost while {}", context)
    } else {
        format!("error while {}: {}", context, error)
    }
}
