use crate::config::Config;
use crate::http::mime::MimeRegistry;
use crate::http::writer::ResponseWriter;

/// Read-only state shared by every connection task.
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub config: Config,
    pub mime: MimeRegistry,
    pub writer: ResponseWriter,
}

impl ServerContext {
    pub fn new(config: Config, mime: MimeRegistry) -> Self {
        let writer = ResponseWriter::new(config.protocol.clone());
        Self {
            config,
            mime,
            writer,
        }
    }
}
