use regex::Regex;
use url::Url;

/// Returns true iff the string parses as an absolute URL with an authority.
///
/// This is the gate for page URLs: schemes without an authority (`data:`,
/// `mailto:`), relative paths, and unparseable input are all rejected, and
/// rejection is a return value, never an error.
pub fn is_valid_page_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => url.has_authority(),
        Err(_) => false,
    }
}

/// Returns true iff the string can be fetched directly as an asset.
///
/// Stricter than [`is_valid_page_url`]: asset URLs come back from the browser
/// already resolved, so anything that is not plain `http(s)://` at this point
/// (`data:`, `blob:`, stray relative strings) is not fetchable and is dropped
/// before a fetch is attempted.
pub fn is_fetchable_asset_url(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}

/// Create a normalized version of the URL for navigation (drops the fragment)
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}

/// Filter applied to discovered asset URLs before any fetch is attempted
#[derive(Debug, Default)]
pub struct AssetFilter {
    exclude_regexes: Vec<Regex>,
}

impl AssetFilter {
    /// Compile exclude patterns; an invalid pattern fails construction
    pub fn new(exclude_patterns: &[String]) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self { exclude_regexes })
    }

    /// Determine if an asset URL should be fetched
    pub fn should_fetch(&self, url: &str) -> bool {
        if !is_fetchable_asset_url(url) {
            return false;
        }

        for regex in &self.exclude_regexes {
            if regex.is_match(url) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_absolute_urls() {
        assert!(is_valid_page_url("https://example.com"));
        assert!(is_valid_page_url("http://example.com:8080/path?q=1"));
        assert!(is_valid_page_url("https://sub.example.com/a/b#frag"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(!is_valid_page_url(""));
        assert!(!is_valid_page_url("not a url"));
        assert!(!is_valid_page_url("/relative/path"));
        // Parses as a URL but carries no authority
        assert!(!is_valid_page_url("data:text/html,hello"));
        assert!(!is_valid_page_url("mailto:user@example.com"));
    }

    #[test]
    fn asset_gate_requires_http_prefix() {
        assert!(is_fetchable_asset_url("http://example.com/app.js"));
        assert!(is_fetchable_asset_url("https://cdn.example.com/style.css"));

        assert!(!is_fetchable_asset_url("data:image/png;base64,iVBORw0KGgo="));
        assert!(!is_fetchable_asset_url("blob:https://example.com/uuid"));
        assert!(!is_fetchable_asset_url("/relative.js"));
        assert!(!is_fetchable_asset_url(""));
    }

    #[test]
    fn normalize_strips_fragment() {
        let url = Url::parse("https://example.com/page#section").unwrap();
        assert_eq!(normalize_url(&url).as_str(), "https://example.com/page");
    }

    #[test]
    fn exclude_patterns_drop_matching_assets() {
        let filter = AssetFilter::new(&[r"\.woff2?$".to_string(), r"/tracking/".to_string()])
            .unwrap();

        assert!(filter.should_fetch("https://example.com/logo.png"));
        assert!(!filter.should_fetch("https://example.com/font.woff2"));
        assert!(!filter.should_fetch("https://example.com/tracking/pixel.gif"));
        // Scheme gate still applies regardless of patterns
        assert!(!filter.should_fetch("data:image/gif;base64,R0lGOD"));
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        assert!(AssetFilter::new(&["(unclosed".to_string()]).is_err());
    }
}
