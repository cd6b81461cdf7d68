use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::metadata::PageMetadata;

/// Kind of element an asset reference was discovered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// `<img src="...">`
    Image,
    /// `<link rel="stylesheet" href="...">`
    Stylesheet,
    /// `<script src="...">`
    Script,
}

impl AssetKind {
    /// Parse the kind tag emitted by the in-browser discovery script
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "image" => Some(AssetKind::Image),
            "stylesheet" => Some(AssetKind::Stylesheet),
            "script" => Some(AssetKind::Script),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Stylesheet => "stylesheet",
            AssetKind::Script => "script",
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resource URL discovered in a rendered page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetReference {
    /// Absolute URL as resolved by the browser
    pub url: String,

    /// Element kind it was discovered from
    pub kind: AssetKind,
}

impl AssetReference {
    pub fn new(url: String, kind: AssetKind) -> Self {
        Self { url, kind }
    }
}

/// Terminal outcome of a single asset fetch + write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetOutcome {
    /// Absolute URL of the asset
    pub url: String,

    /// Element kind it was discovered from
    pub kind: AssetKind,

    /// Local path the asset bytes were written to (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Failure reason (on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssetOutcome {
    /// Successful fetch + write
    pub fn written(reference: &AssetReference, path: PathBuf) -> Self {
        Self {
            url: reference.url.clone(),
            kind: reference.kind,
            path: Some(path),
            error: None,
        }
    }

    /// Failed fetch or write; the reason is reported, the page is unaffected
    pub fn failed(reference: &AssetReference, reason: impl Into<String>) -> Self {
        Self {
            url: reference.url.clone(),
            kind: reference.kind,
            path: None,
            error: Some(reason.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Terminal outcome of one mirror job
///
/// Asset failures never invalidate the page-level outcome: `error` is `None`
/// whenever the page itself rendered (and, in mirror mode, was written), no
/// matter how many entries of `assets` failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorResult {
    /// The requested page URL
    pub url: String,

    /// Authority component the output directory was derived from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Path of the written page file (mirror mode, on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_path: Option<PathBuf>,

    /// Structural metadata extracted from the rendered document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMetadata>,

    /// Per-asset outcomes, in discovery order of completion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetOutcome>,

    /// Page-level failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MirrorResult {
    /// Page-level failure before any file was written
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            host: None,
            page_path: None,
            metadata: None,
            assets: Vec::new(),
            error: Some(reason.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Number of assets that fetched and wrote successfully
    pub fn assets_written(&self) -> usize {
        self.assets.iter().filter(|a| a.is_ok()).count()
    }

    /// Number of assets that failed
    pub fn assets_failed(&self) -> usize {
        self.assets.iter().filter(|a| !a.is_ok()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_failure_does_not_fail_the_page() {
        let reference = AssetReference::new("https://example.com/logo.png".into(), AssetKind::Image);
        let result = MirrorResult {
            url: "https://example.com".into(),
            host: Some("example.com".into()),
            page_path: Some(PathBuf::from("mirror/example.com/index.html")),
            metadata: None,
            assets: vec![AssetOutcome::failed(&reference, "net::ERR_FAILED")],
            error: None,
        };

        assert!(result.is_ok());
        assert_eq!(result.assets_written(), 0);
        assert_eq!(result.assets_failed(), 1);
    }

    #[test]
    fn kind_tags_round_trip() {
        for kind in [AssetKind::Image, AssetKind::Stylesheet, AssetKind::Script] {
            assert_eq!(AssetKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(AssetKind::from_tag("iframe"), None);
    }
}
