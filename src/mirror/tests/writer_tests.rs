use crate::mirror::MirrorTarget;
use crate::mirror::writer;
use std::path::Path;
use url::Url;

#[test]
fn host_identifier_is_the_authority() {
    let url = Url::parse("https://example.com/a/b?q=1").unwrap();
    assert_eq!(writer::host_identifier(&url).as_deref(), Some("example.com"));

    let with_port = Url::parse("http://example.com:8080/").unwrap();
    assert_eq!(
        writer::host_identifier(&with_port).as_deref(),
        Some("example.com:8080")
    );
}

#[test]
fn target_derives_directory_from_host() {
    let target = MirrorTarget::new("https://example.com/page#frag", Path::new("out")).unwrap();

    assert_eq!(target.host, "example.com");
    assert_eq!(target.dir, Path::new("out").join("example.com"));
    // Fragment is gone before navigation
    assert_eq!(target.url.as_str(), "https://example.com/page");
}

#[test]
fn invalid_targets_are_rejected_with_a_reason() {
    for candidate in ["", "not a url", "/relative/path", "data:text/html,x"] {
        let rejected = MirrorTarget::new(candidate, Path::new("out"));
        assert!(rejected.is_err(), "{:?} should be rejected", candidate);
    }
}

#[test]
fn asset_destination_keeps_nested_directories() {
    let host_dir = Path::new("out/example.com");
    let dest =
        writer::asset_destination(host_dir, "https://example.com/static/img/logo.png").unwrap();

    assert_eq!(dest, host_dir.join("static").join("img").join("logo.png"));
}

#[test]
fn query_strings_collapse_to_one_destination() {
    let host_dir = Path::new("out/example.com");
    let a = writer::asset_destination(host_dir, "https://example.com/app.js?v=1").unwrap();
    let b = writer::asset_destination(host_dir, "https://example.com/app.js?v=2").unwrap();

    // Known collapsing behavior: later write wins
    assert_eq!(a, b);
}

#[test]
fn fileless_paths_are_rejected() {
    let host_dir = Path::new("out/example.com");

    assert!(writer::asset_destination(host_dir, "https://example.com/").is_err());
    assert!(writer::asset_destination(host_dir, "https://example.com/dir/").is_err());
}

#[test]
fn encoded_dot_dot_stays_inside_the_host_directory() {
    // The URL parser resolves %2e%2e during parsing, so the path that
    // reaches the writer is already flattened
    let host_dir = Path::new("out/example.com");
    let dest =
        writer::asset_destination(host_dir, "https://example.com/%2e%2e/etc/passwd").unwrap();

    assert!(dest.starts_with(host_dir));
}

#[tokio::test]
async fn page_and_assets_land_in_the_expected_layout() {
    let root = tempfile::tempdir().unwrap();
    let target = MirrorTarget::new("https://example.com", root.path()).unwrap();

    let page_path = writer::write_page(&target.dir, "<html>rendered</html>")
        .await
        .unwrap();
    assert_eq!(page_path, root.path().join("example.com").join("index.html"));

    for asset_url in [
        "https://example.com/logo.png",
        "https://example.com/app.js",
    ] {
        let dest = writer::asset_destination(&target.dir, asset_url).unwrap();
        writer::write_asset(&dest, b"bytes").await.unwrap();
    }

    assert!(root.path().join("example.com/index.html").is_file());
    assert!(root.path().join("example.com/logo.png").is_file());
    assert!(root.path().join("example.com/app.js").is_file());
}

#[tokio::test]
async fn rewriting_the_same_page_overwrites_without_error() {
    let root = tempfile::tempdir().unwrap();
    let target = MirrorTarget::new("https://example.com", root.path()).unwrap();

    writer::write_page(&target.dir, "first").await.unwrap();
    let page_path = writer::write_page(&target.dir, "second").await.unwrap();

    let content = tokio::fs::read_to_string(&page_path).await.unwrap();
    assert_eq!(content, "second");
}

#[tokio::test]
async fn asset_write_creates_missing_ancestors() {
    let root = tempfile::tempdir().unwrap();
    let dest = writer::asset_destination(
        root.path(),
        "https://example.com/deep/ly/nested/style.css",
    )
    .unwrap();

    writer::write_asset(&dest, b"body{}").await.unwrap();

    assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"body{}");
}
