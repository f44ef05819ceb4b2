//! Directory listing generation against real directories

use fileserve::http::listing::{EntryKind, PARENT_ENTRY, generate_listing, read_entries};
use std::fs;
use tempfile::TempDir;

fn sample_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), b"0123456789").unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    dir
}

#[tokio::test]
async fn test_read_entries_reports_name_size_and_kind() {
    let dir = sample_dir();
    let entries = read_entries(dir.path()).await.unwrap();

    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].name, PARENT_ENTRY);
    assert_eq!(entries[0].kind, Some(EntryKind::Directory));
    assert!(entries[0].modified.is_some());

    assert_eq!(entries[1].name, "a.txt");
    assert_eq!(entries[1].size, Some(10));
    assert_eq!(entries[1].kind, Some(EntryKind::File));
    assert!(entries[1].modified.is_some());

    assert_eq!(entries[2].name, "b");
    assert_eq!(entries[2].kind, Some(EntryKind::Directory));
}

#[tokio::test]
async fn test_listing_renders_rows() {
    let dir = sample_dir();
    let listing = generate_listing("/sample/", dir.path()).await.unwrap();
    let html = String::from_utf8(listing.body().to_vec()).unwrap();

    assert_eq!(listing.len() as usize, html.len());
    assert!(html.contains("<title>Index of /sample/</title>"));
    assert!(html.contains("<h1>Index of /sample/</h1>"));
    assert!(html.contains("<a href=\"a.txt\">a.txt</a>"));
    assert!(html.contains("<td align=\"right\">10</td>"));
    assert!(html.contains("<td>File</td>"));
    assert!(html.contains("<a href=\"b/\">b</a>"));
    assert!(html.contains("<td>Directory</td>"));
    assert!(html.contains("<a href=\"../\">Parent Directory</a>"));
    assert!(!html.contains("href=\"./\""));
    assert!(html.trim_end().ends_with("</html>"));
}

#[tokio::test]
async fn test_listing_of_root_keeps_parent_row_with_metadata() {
    let dir = sample_dir();
    let listing = generate_listing("/", dir.path()).await.unwrap();
    let html = String::from_utf8(listing.body().to_vec()).unwrap();

    let row = html
        .split("<tr>")
        .find(|row| row.contains("Parent Directory"))
        .expect("parent row present");
    assert!(row.contains("<a href=\"../\">Parent Directory</a>"));
    assert!(row.contains("<td>Directory</td>"));
    assert!(!row.contains("<td align=\"right\"></td>"));
    assert!(!row.contains("unknown"));

    // parent row comes before the first entry
    assert!(html.find("Parent Directory").unwrap() < html.find("a.txt").unwrap());
}

#[tokio::test]
async fn test_listing_href_is_percent_encoded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my file#1.txt"), b"x").unwrap();

    let listing = generate_listing("/", dir.path()).await.unwrap();
    let html = String::from_utf8(listing.body().to_vec()).unwrap();

    assert!(html.contains("<a href=\"my%20file%231.txt\">my file#1.txt</a>"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_is_labelled_link() {
    let dir = sample_dir();
    std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("c.lnk")).unwrap();

    let entries = read_entries(dir.path()).await.unwrap();
    let link = entries.iter().find(|e| e.name == "c.lnk").unwrap();

    assert_eq!(link.kind, Some(EntryKind::Link));
}

#[tokio::test]
async fn test_listing_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone");

    assert!(generate_listing("/gone/", &missing).await.is_err());
}
