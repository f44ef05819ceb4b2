use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::http::headers::HeaderSet;
use crate::http::response::{StatusCode, error_page};

const CRLF: &str = "\r\n";

fn serialize_status(protocol: &str, code: u16, reason: &str) -> Vec<u8> {
    format!("{} {} {}{}", protocol, code, reason, CRLF).into_bytes()
}

fn serialize_headers(headers: &HeaderSet) -> Vec<u8> {
    let mut buf = Vec::new();

    for (k, v) in headers.iter() {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(CRLF.as_bytes());
    }

    // Header/body separator
    buf.extend_from_slice(CRLF.as_bytes());

    buf
}

/// Writes status lines, header blocks and error pages onto a stream.
#[derive(Debug, Clone)]
pub struct ResponseWriter {
    protocol: String,
}

impl ResponseWriter {
    /// `protocol` is the string that opens every status line, e.g. `HTTP/1.1`.
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
        }
    }

    pub async fn write_status<W>(&self, stream: &mut W, code: u16, reason: &str) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        debug!("{} {} {}", self.protocol, code, reason);
        stream
            .write_all(&serialize_status(&self.protocol, code, reason))
            .await?;
        Ok(())
    }

    /// Writes every header in store order followed by the blank line.
    pub async fn write_headers<W>(&self, stream: &mut W, headers: &HeaderSet) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        for (k, v) in headers.iter() {
            debug!("{}: {}", k, v);
        }
        stream.write_all(&serialize_headers(headers)).await?;
        Ok(())
    }

    pub async fn write_response_head<W>(
        &self,
        stream: &mut W,
        status: StatusCode,
        headers: &HeaderSet,
    ) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        self.write_status(stream, status.as_u16(), status.reason_phrase())
            .await?;
        self.write_headers(stream, headers).await
    }

    /// Writes a complete error response: status line, headers with
    /// `Content-Length` and `Content-type` added, then the HTML error page.
    pub async fn write_error<W>(
        &self,
        stream: &mut W,
        code: u16,
        reason: &str,
        headers: &mut HeaderSet,
    ) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        self.write_status(stream, code, reason).await?;

        let body = error_page(code, reason);
        if !headers.put("Content-Length", body.len().to_string())
            || !headers.put("Content-type", "text/html")
        {
            warn!(code, "response headers full while writing error page");
        }

        self.write_headers(stream, headers).await?;
        stream.write_all(body.as_bytes()).await?;
        Ok(())
    }

    pub async fn write_error_status<W>(
        &self,
        stream: &mut W,
        status: StatusCode,
        headers: &mut HeaderSet,
    ) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        self.write_error(stream, status.as_u16(), status.reason_phrase(), headers)
            .await
    }
}
