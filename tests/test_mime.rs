use fileserve::http::mime::{DEFAULT_MEDIA_TYPE, DIRECTORY_MEDIA_TYPE, MimeRegistry, MimeTable};
use std::io::ErrorKind;
use tempfile::TempDir;

const TABLE: &str = "\
# this line is a comment
text/html\t\thtml htm
text/plain      txt
image/jpeg      jpeg jpg jpe

application/json json
";

#[test]
fn test_load_counts_extension_entries() {
    let table = MimeTable::parse(TABLE);
    assert_eq!(table.len(), 7);
}

#[test]
fn test_resolve_known_extension() {
    let table = MimeTable::parse(TABLE);

    assert_eq!(table.resolve("index.html"), "text/html");
    assert_eq!(table.resolve("/srv/www/photo.JPG"), "image/jpeg");
    assert_eq!(table.resolve("data.json"), "application/json");
}

#[test]
fn test_resolve_defaults() {
    let table = MimeTable::parse(TABLE);

    assert_eq!(table.resolve("noext"), DEFAULT_MEDIA_TYPE);
    assert_eq!(table.resolve("unknown.xyz"), DEFAULT_MEDIA_TYPE);
    assert_eq!(table.resolve("trailingdot."), DEFAULT_MEDIA_TYPE);
    assert_eq!(DEFAULT_MEDIA_TYPE, "application/octet-stream");
}

#[test]
fn test_resolve_directory_marker() {
    let table = MimeTable::parse(TABLE);
    assert_eq!(table.resolve("dir/"), DIRECTORY_MEDIA_TYPE);
    assert_eq!(table.resolve("/srv/www/"), "text/directory");
}

#[test]
fn test_comment_only_when_first_token_is_hash() {
    let table = MimeTable::parse("# text/plain txt\ntext/css css # not-a-comment\n");

    assert_eq!(table.resolve("a.txt"), DEFAULT_MEDIA_TYPE);
    assert_eq!(table.resolve("a.css"), "text/css");
    // tokens after the type are all extensions, "#" included
    assert_eq!(table.len(), 3);
}

#[test]
fn test_load_missing_file() {
    let err = MimeTable::load("/definitely/not/here/mime.types").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_registry_reload_swaps_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mime.types");
    std::fs::write(&path, "text/plain txt\n").unwrap();

    let registry = MimeRegistry::default();
    assert_eq!(registry.current().resolve("a.txt"), DEFAULT_MEDIA_TYPE);

    let before = registry.current();
    assert_eq!(registry.reload(&path).unwrap(), 1);
    assert_eq!(registry.current().resolve("a.txt"), "text/plain");
    // snapshots taken before the reload are unaffected
    assert_eq!(before.resolve("a.txt"), DEFAULT_MEDIA_TYPE);
}

#[test]
fn test_registry_reload_failure_keeps_table() {
    let registry = MimeRegistry::new(MimeTable::parse("text/plain txt\n"));

    assert!(registry.reload("/definitely/not/here/mime.types").is_err());
    assert_eq!(registry.current().resolve("a.txt"), "text/plain");
}
