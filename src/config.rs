use serde::Deserialize;
use std::path::PathBuf;

/// Read-only server configuration shared by every connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the listener binds to.
    pub listen_addr: String,
    /// Document root that request URIs are resolved beneath.
    pub content_base: PathBuf,
    /// Value of the `Server` response header.
    pub server_name: String,
    /// Protocol string written at the start of every status line.
    pub protocol: String,
    /// Log request and response traffic at debug level.
    pub debug: bool,
    /// Path of the extension to media type table.
    pub mime_types: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            content_base: PathBuf::from("content"),
            server_name: concat!("fileserve/", env!("CARGO_PKG_VERSION")).to_string(),
            protocol: "HTTP/1.1".to_string(),
            debug: false,
            mime_types: PathBuf::from("mime.types"),
        }
    }
}

impl Config {
    /// Builds the configuration from `FILESERVE_CONFIG` (a YAML file) when set,
    /// then applies the `LISTEN`, `CONTENT_BASE`, `SERVER_NAME` and `DEBUG`
    /// environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("FILESERVE_CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
                Self::from_yaml(&text)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.listen_addr = addr;
        }
        if let Ok(base) = std::env::var("CONTENT_BASE") {
            cfg.content_base = PathBuf::from(base);
        }
        if let Ok(name) = std::env::var("SERVER_NAME") {
            cfg.server_name = name;
        }
        if let Ok(debug) = std::env::var("DEBUG") {
            cfg.debug = matches!(debug.as_str(), "1" | "true" | "yes");
        }

        Ok(cfg.normalized())
    }

    /// Parses a YAML document; absent keys keep their defaults.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;
        Ok(cfg.normalized())
    }

    /// Content base as a string without a trailing separator, ready to have a
    /// request URI appended.
    pub fn content_root(&self) -> String {
        self.content_base.to_string_lossy().into_owned()
    }

    fn normalized(mut self) -> Self {
        let base = self.content_base.to_string_lossy().into_owned();
        let trimmed = base.trim_end_matches('/');
        if trimmed.len() != base.len() && !trimmed.is_empty() {
            self.content_base = PathBuf::from(trimmed);
        }
        self
    }
}
