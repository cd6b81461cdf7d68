use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;

/// Directory name for a mirrored origin: the URL's authority component
///
/// `https://example.com/a/b` maps to `example.com`. A non-default port is
/// kept (`example.com:8080`). Returns `None` for URLs without a host.
pub fn host_identifier(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

/// Destination path for an asset: the per-host directory joined with the
/// asset URL's path component, taken verbatim. Query strings drop out, so
/// two URLs differing only by query collapse to the same file and the last
/// write wins.
///
/// Paths that would escape the per-host directory (`..` segments) or that
/// name no file (`/`, trailing slash) are rejected; the caller reports the
/// rejection as that asset's failure.
pub fn asset_destination(host_dir: &Path, asset_url: &str) -> Result<PathBuf, String> {
    let url = Url::parse(asset_url).map_err(|e| format!("unparseable asset URL: {}", e))?;
    let path = url.path();

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() || path.ends_with('/') {
        return Err("asset URL path names no file".to_string());
    }
    if segments.iter().any(|s| *s == "..") {
        return Err("asset URL path escapes the mirror directory".to_string());
    }

    let mut dest = host_dir.to_path_buf();
    for segment in segments {
        dest.push(segment);
    }
    Ok(dest)
}

/// Writes the rendered page as `<dir>/index.html`, creating the per-host
/// directory if needed. Existing content is silently overwritten.
pub async fn write_page(dir: &Path, html: &str) -> Result<PathBuf, String> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| format!("could not create {}: {}", dir.display(), e))?;

    let page_path = dir.join("index.html");
    fs::write(&page_path, html)
        .await
        .map_err(|e| format!("could not write {}: {}", page_path.display(), e))?;

    Ok(page_path)
}

/// Writes fetched asset bytes to their destination, creating any missing
/// ancestor directories. A single buffer write, so no partial file is left
/// behind on failure.
pub async fn write_asset(dest: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("could not create {}: {}", parent.display(), e))?;
    }

    fs::write(dest, bytes)
        .await
        .map_err(|e| format!("could not write {}: {}", dest.display(), e))?;

    Ok(())
}
