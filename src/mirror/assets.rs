use crate::results::{AssetKind, AssetReference};
use fantoccini::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;

/// Enumerates asset-bearing elements in the live document. Runs in the page
/// so that `src`/`href` come back through the browser's own URL resolution,
/// already absolute.
const DISCOVER_SCRIPT: &str = r#"
    const found = [];
    for (const img of document.querySelectorAll('img')) {
        if (img.src) { found.push(['image', img.src]); }
    }
    for (const link of document.querySelectorAll('link[rel~="stylesheet"]')) {
        if (link.href) { found.push(['stylesheet', link.href]); }
    }
    for (const script of document.querySelectorAll('script')) {
        if (script.src) { found.push(['script', script.src]); }
    }
    return found;
"#;

/// Fetches one URL from inside the page, inheriting the session's cookies
/// and referrer, and hands the body back as a byte array.
const FETCH_SCRIPT: &str = r#"
    const url = arguments[0];
    const done = arguments[arguments.length - 1];
    fetch(url, { credentials: 'include' })
        .then((resp) => {
            if (!resp.ok) { throw new Error('HTTP ' + resp.status); }
            return resp.arrayBuffer();
        })
        .then((buf) => done({ ok: true, bytes: Array.from(new Uint8Array(buf)) }))
        .catch((err) => done({ ok: false, error: String(err) }));
"#;

/// Enumerates image, stylesheet-link, and script elements of the rendered
/// page and returns their absolute URLs in document order. Inline scripts
/// (no `src`) are skipped by the script itself. Duplicates are kept.
pub async fn discover(client: &Client) -> Result<Vec<AssetReference>, String> {
    let value = client
        .execute(DISCOVER_SCRIPT, vec![])
        .await
        .map_err(|e| format!("asset discovery script failed: {}", e))?;

    let references = parse_discovered(&value);
    ::log::debug!("Discovered {} asset references", references.len());
    Ok(references)
}

/// Retrieves the raw body of one asset URL through the page's session.
pub async fn fetch(client: &Client, url: &str, budget: Duration) -> Result<Vec<u8>, String> {
    let fetched = timeout(
        budget,
        client.execute_async(FETCH_SCRIPT, vec![Value::String(url.to_string())]),
    )
    .await;

    match fetched {
        Ok(Ok(value)) => parse_fetched(&value),
        Ok(Err(e)) => Err(format!("fetch script failed: {}", e)),
        Err(_) => Err(format!("fetch timed out after {}s", budget.as_secs())),
    }
}

/// Decodes the `[kind, url]` pairs produced by the discovery script,
/// dropping anything malformed.
pub(crate) fn parse_discovered(value: &Value) -> Vec<AssetReference> {
    let Some(entries) = value.as_array() else {
        ::log::debug!("Discovery script returned a non-array, treating as no assets");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let pair = entry.as_array()?;
            let kind = AssetKind::from_tag(pair.first()?.as_str()?)?;
            let url = pair.get(1)?.as_str()?;
            Some(AssetReference::new(url.to_string(), kind))
        })
        .collect()
}

/// Decodes the fetch script's `{ok, bytes | error}` envelope. An empty body
/// counts as a failed fetch.
pub(crate) fn parse_fetched(value: &Value) -> Result<Vec<u8>, String> {
    let ok = value
        .get("ok")
        .and_then(|v| v.as_bool())
        .ok_or("no response")?;

    if !ok {
        let reason = value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown fetch error");
        return Err(reason.to_string());
    }

    let raw = value
        .get("bytes")
        .and_then(|v| v.as_array())
        .ok_or("response carried no body")?;

    let mut bytes = Vec::with_capacity(raw.len());
    for item in raw {
        let byte = item
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or("malformed byte in response body")?;
        bytes.push(byte);
    }

    if bytes.is_empty() {
        return Err("empty response".to_string());
    }

    Ok(bytes)
}
