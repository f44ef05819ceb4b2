use bytes::{Buf, BytesMut};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::http::headers::HeaderSet;
use crate::http::parser::{
    MAX_LINE, ParseError, extract_query, find_line_end, parse_request_line, split_query,
    store_header_line, trim_newline,
};
use crate::http::request::{Method, Request};
use crate::http::response::StatusCode;
use crate::http::uri::{decode_uri, resolve_uri};
use crate::server::context::ServerContext;

/// A line read off the wire.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Line {
    /// Terminator included; a final unterminated line before EOF is kept too.
    Complete(String),
    /// Longer than [`MAX_LINE`]. Its bytes were consumed and dropped.
    TooLong,
}

/// One accepted connection carrying exactly one request.
///
/// `run` reads the request line and headers, dispatches on the method and
/// writes the response, then shuts the stream down whatever branch was taken.
pub struct Connection<S> {
    pub(crate) stream: S,
    pub(crate) buffer: BytesMut,
    pub(crate) ctx: Arc<ServerContext>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: Arc<ServerContext>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            ctx,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let result = self.process().await;

        let flushed = self.stream.flush().await;
        let closed = self.stream.shutdown().await;

        result?;
        flushed?;
        closed?;
        Ok(())
    }

    async fn process(&mut self) -> anyhow::Result<()> {
        let raw_line = match self.read_line().await? {
            Some(Line::Complete(raw_line)) => raw_line,
            Some(Line::TooLong) => {
                debug!(error = %ParseError::LineTooLong, "rejecting request line");
                let mut response_headers = self.initial_response_headers();
                return self
                    .send_error(StatusCode::BadRequest, &mut response_headers)
                    .await;
            }
            None => {
                debug!("peer closed before sending a request line");
                return Ok(());
            }
        };
        let request_line = trim_newline(&raw_line).to_string();

        let mut response_headers = self.initial_response_headers();

        let line = match parse_request_line(&request_line) {
            Ok(line) => line,
            Err(e) => {
                debug!(error = %e, "rejecting request");
                return self
                    .send_error(StatusCode::BadRequest, &mut response_headers)
                    .await;
            }
        };

        let mut request_headers = HeaderSet::new();
        self.read_request_headers(&mut request_headers).await?;
        if self.ctx.config.debug {
            debug_request(&request_line, &request_headers);
        }

        let escaped_path = match extract_query(&line.uri, &mut request_headers) {
            Ok(path) => path.to_string(),
            Err(e) => {
                warn!(error = %e, "query parameters dropped");
                split_query(&line.uri).0.to_string()
            }
        };

        let path = match decode_uri(&escaped_path) {
            Ok(path) => path,
            Err(e) => {
                debug!(uri = %line.uri, error = %e, "invalid URI encoding");
                return self
                    .send_error(StatusCode::BadRequest, &mut response_headers)
                    .await;
            }
        };

        let Some(method) = Method::from_str(&line.method) else {
            return self
                .send_error(StatusCode::NotImplemented, &mut response_headers)
                .await;
        };

        let fs_path = match resolve_uri(&self.ctx.config.content_root(), &path) {
            Ok(fs_path) => fs_path,
            Err(e) => {
                debug!(uri = %path, error = %e, "refusing to resolve URI");
                return self
                    .send_error(StatusCode::BadRequest, &mut response_headers)
                    .await;
            }
        };

        let request = Request {
            line,
            path,
            headers: request_headers,
        };

        match method {
            Method::GET => {
                self.get_or_head(&request, &fs_path, &mut response_headers, true)
                    .await
            }
            Method::HEAD => {
                self.get_or_head(&request, &fs_path, &mut response_headers, false)
                    .await
            }
            Method::PUT => self.put(&request, &fs_path, &mut response_headers).await,
            Method::POST => self.post(&request, &fs_path, &mut response_headers).await,
            Method::DELETE => self.delete(&fs_path, &mut response_headers).await,
        }
    }

    fn initial_response_headers(&self) -> HeaderSet {
        let mut headers = HeaderSet::new();
        headers.put("Server", self.ctx.config.server_name.clone());
        headers.put("Date", httpdate::fmt_http_date(SystemTime::now()));
        headers
    }

    /// Reads header lines up to the blank line. Once the store is full the
    /// remaining lines are read and discarded; overlong lines are skipped.
    async fn read_request_headers(&mut self, headers: &mut HeaderSet) -> anyhow::Result<()> {
        let mut overflowed = false;

        while let Some(raw) = self.read_line().await? {
            let Line::Complete(raw) = raw else {
                warn!(error = %ParseError::LineTooLong, "request header skipped");
                continue;
            };
            let line = trim_newline(&raw);
            if line.is_empty() {
                break;
            }
            if headers.is_full() {
                if !overflowed {
                    warn!(capacity = headers.len(), "request headers full, discarding the rest");
                    overflowed = true;
                }
                continue;
            }
            if let Err(e) = store_header_line(headers, line) {
                warn!(error = %e, "request header dropped");
            }
        }

        Ok(())
    }

    /// Next line from the peer, terminator included. `None` once the peer has
    /// closed and nothing is left buffered; a final unterminated line is
    /// returned as is. A line longer than [`MAX_LINE`] is consumed up to its
    /// terminator and reported as [`Line::TooLong`], however it was split
    /// across reads.
    pub(crate) async fn read_line(&mut self) -> anyhow::Result<Option<Line>> {
        loop {
            if let Some(end) = find_line_end(&self.buffer) {
                let line = self.buffer.split_to(end);
                if end > MAX_LINE {
                    return Ok(Some(Line::TooLong));
                }
                return Ok(Some(Line::Complete(
                    String::from_utf8_lossy(&line).into_owned(),
                )));
            }

            if self.buffer.len() >= MAX_LINE {
                self.skip_line().await?;
                return Ok(Some(Line::TooLong));
            }

            self.buffer.reserve(1024);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = self.buffer.split();
                return Ok(Some(Line::Complete(
                    String::from_utf8_lossy(&line).into_owned(),
                )));
            }
        }
    }

    /// Drops buffered and incoming bytes through the next `\n`, or until the
    /// peer closes.
    async fn skip_line(&mut self) -> anyhow::Result<()> {
        loop {
            if let Some(end) = find_line_end(&self.buffer) {
                self.buffer.advance(end);
                return Ok(());
            }
            self.buffer.clear();
            self.buffer.reserve(1024);
            if self.stream.read_buf(&mut self.buffer).await? == 0 {
                return Ok(());
            }
        }
    }

    /// Copies exactly `len` body bytes from the peer into `dest`, starting
    /// with whatever is already buffered. Returns the count actually copied,
    /// which is short only if the peer closed early.
    pub(crate) async fn copy_body<W>(&mut self, dest: &mut W, len: u64) -> anyhow::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let buffered = (self.buffer.len() as u64).min(len) as usize;
        dest.write_all(&self.buffer[..buffered]).await?;
        self.buffer.advance(buffered);

        let remaining = len - buffered as u64;
        let mut body = (&mut self.stream).take(remaining);
        let copied = tokio::io::copy(&mut body, dest).await?;

        let total = buffered as u64 + copied;
        if total < len {
            warn!(expected = len, received = total, "request body ended early");
        }
        Ok(total)
    }

    pub(crate) async fn send_error(
        &mut self,
        status: StatusCode,
        headers: &mut HeaderSet,
    ) -> anyhow::Result<()> {
        self.ctx
            .writer
            .write_error_status(&mut self.stream, status, headers)
            .await
    }

    pub(crate) async fn send_head(
        &mut self,
        status: StatusCode,
        headers: &HeaderSet,
    ) -> anyhow::Result<()> {
        self.ctx
            .writer
            .write_response_head(&mut self.stream, status, headers)
            .await
    }
}

/// Logs the request line and every request header.
pub fn debug_request(request_line: &str, headers: &HeaderSet) {
    debug!("{}", request_line);
    for (name, value) in headers.iter() {
        debug!("{}: {}", name, value);
    }
}
