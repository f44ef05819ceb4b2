//! HTML index pages for directory requests.
//!
//! The page is rendered in memory and handed to the GET/HEAD handler as a
//! [`Listing`], which carries its length and a modification time just like a
//! stored file does.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tracing::warn;

const UNKNOWN: &str = "unknown";

/// Name of the parent entry, rendered as the "Parent Directory" row.
pub const PARENT_ENTRY: &str = "..";

/// Kind of a directory entry, as shown in the "File Type" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Link,
    File,
}

impl EntryKind {
    fn from_metadata(meta: &Metadata) -> Self {
        let ft = meta.file_type();
        if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_symlink() {
            EntryKind::Link
        } else {
            EntryKind::File
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Directory => "Directory",
            EntryKind::Link => "Link",
            EntryKind::File => "File",
        }
    }
}

/// One row of a listing. Metadata fields are `None` when the entry could not
/// be examined.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub name: String,
    pub modified: Option<SystemTime>,
    pub size: Option<u64>,
    pub kind: Option<EntryKind>,
}

impl DirectoryEntry {
    fn from_metadata(name: String, meta: &Metadata) -> Self {
        Self {
            name,
            modified: meta.modified().ok(),
            size: Some(meta.len()),
            kind: Some(EntryKind::from_metadata(meta)),
        }
    }

    fn unknown(name: String) -> Self {
        Self {
            name,
            modified: None,
            size: None,
            kind: None,
        }
    }
}

/// A rendered index page.
#[derive(Debug, Clone)]
pub struct Listing {
    body: Bytes,
    modified: SystemTime,
}

impl Listing {
    pub fn len(&self) -> u64 {
        self.body.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Time the page was rendered.
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Readable view of the page for streaming.
    pub fn into_reader(self) -> io::Cursor<Bytes> {
        io::Cursor::new(self.body)
    }
}

/// Reads the entries of `dir`, sorted by name, preceded by the `..` entry.
/// `.` is never listed. Entries whose metadata cannot be read are logged and
/// kept with unknown fields.
pub async fn read_entries(dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == "." || name == PARENT_ENTRY {
            continue;
        }
        entries.push(stat_entry(name, &entry.path()).await);
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries.insert(0, stat_entry(PARENT_ENTRY.to_string(), &dir.join(PARENT_ENTRY)).await);
    Ok(entries)
}

async fn stat_entry(name: String, path: &Path) -> DirectoryEntry {
    match tokio::fs::symlink_metadata(path).await {
        Ok(meta) => DirectoryEntry::from_metadata(name, &meta),
        Err(e) => {
            warn!(entry = %name, error = %e, "cannot stat directory entry");
            DirectoryEntry::unknown(name)
        }
    }
}

/// Builds the index page for the directory at `dir`, requested as `uri`.
pub async fn generate_listing(uri: &str, dir: &Path) -> io::Result<Listing> {
    let entries = read_entries(dir).await?;
    Ok(Listing {
        body: Bytes::from(render_listing(uri, &entries)),
        modified: SystemTime::now(),
    })
}

/// Renders the HTML page for `entries`. The `..` entry becomes the "Parent
/// Directory" row linking `../`.
pub fn render_listing(uri: &str, entries: &[DirectoryEntry]) -> String {
    let title = escape_html(uri);
    let mut html = String::new();

    let _ = write!(
        html,
        "<html>\n<head>\n  <title>Index of {title}</title></head>\n<body>\n  <h1>Index of {title}</h1>\n  <table>\n  <tr>\n    <th valign=\"top\"></th>\n    <th>Name</th>\n    <th>Last modified</th>\n    <th>Size</th>\n    <th>File Type</th>\n  </tr>\n  <tr>\n    <td colspan=\"5\"><hr></td>\n  </tr>\n"
    );

    for entry in entries {
        let (href, name) = if entry.name == PARENT_ENTRY {
            ("../".to_string(), "Parent Directory".to_string())
        } else {
            let mut href = urlencoding::encode_binary(entry.name.as_bytes()).into_owned();
            if entry.kind == Some(EntryKind::Directory) {
                href.push('/');
            }
            (href, escape_html(&entry.name))
        };
        let modified = entry
            .modified
            .map(listing_timestamp)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let size = entry
            .size
            .map(|s| s.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let kind = entry.kind.map(|k| k.label()).unwrap_or(UNKNOWN);

        push_row(&mut html, &href, &name, &modified, &size, kind);
    }

    html.push_str("  <tr>\n    <td colspan=\"5\"><hr></td>\n  </tr>\n  </table>\n</body>\n</html>\n");
    html
}

fn push_row(html: &mut String, href: &str, name: &str, modified: &str, size: &str, kind: &str) {
    let _ = write!(
        html,
        "  <tr>\n    <td></td>\n    <td><a href=\"{href}\">{name}</a></td>\n    <td align=\"right\">{modified}</td>\n    <td align=\"right\">{size}</td>\n    <td>{kind}</td>\n    <td></td>\n  </tr>\n"
    );
}

/// Formats `time` as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn listing_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
