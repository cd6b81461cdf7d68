use crate::mirror::assets::{parse_discovered, parse_fetched};
use crate::results::AssetKind;
use serde_json::json;

#[test]
fn decodes_discovery_pairs_in_order() {
    let value = json!([
        ["image", "https://example.com/logo.png"],
        ["stylesheet", "https://example.com/style.css"],
        ["script", "https://example.com/app.js"],
    ]);

    let references = parse_discovered(&value);

    assert_eq!(references.len(), 3);
    assert_eq!(references[0].kind, AssetKind::Image);
    assert_eq!(references[0].url, "https://example.com/logo.png");
    assert_eq!(references[1].kind, AssetKind::Stylesheet);
    assert_eq!(references[2].kind, AssetKind::Script);
}

#[test]
fn duplicates_are_kept_as_discovered() {
    let value = json!([
        ["image", "https://example.com/logo.png"],
        ["image", "https://example.com/logo.png"],
    ]);

    assert_eq!(parse_discovered(&value).len(), 2);
}

#[test]
fn malformed_discovery_entries_are_dropped() {
    let value = json!([
        ["image", "https://example.com/ok.png"],
        ["iframe", "https://example.com/unknown-kind.html"],
        ["image"],
        "not a pair",
        42,
    ]);

    let references = parse_discovered(&value);
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].url, "https://example.com/ok.png");
}

#[test]
fn non_array_discovery_yields_no_assets() {
    assert!(parse_discovered(&json!(null)).is_empty());
    assert!(parse_discovered(&json!({"nope": true})).is_empty());
}

#[test]
fn decodes_fetched_bytes() {
    let value = json!({"ok": true, "bytes": [137, 80, 78, 71]});
    assert_eq!(parse_fetched(&value).unwrap(), vec![137u8, 80, 78, 71]);
}

#[test]
fn fetch_errors_carry_their_reason() {
    let value = json!({"ok": false, "error": "TypeError: Failed to fetch"});
    assert_eq!(
        parse_fetched(&value).unwrap_err(),
        "TypeError: Failed to fetch"
    );
}

#[test]
fn empty_bodies_count_as_failures() {
    let value = json!({"ok": true, "bytes": []});
    assert_eq!(parse_fetched(&value).unwrap_err(), "empty response");
}

#[test]
fn missing_envelope_is_no_response() {
    assert_eq!(parse_fetched(&json!(null)).unwrap_err(), "no response");
    assert_eq!(parse_fetched(&json!({})).unwrap_err(), "no response");
}

#[test]
fn out_of_range_bytes_are_rejected() {
    let value = json!({"ok": true, "bytes": [12, 999]});
    assert!(parse_fetched(&value).is_err());
}
