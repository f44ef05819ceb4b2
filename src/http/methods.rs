//! GET, HEAD, PUT, POST and DELETE against the content base.

use std::path::Path;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::http::connection::Connection;
use crate::http::headers::HeaderSet;
use crate::http::listing::generate_listing;
use crate::http::mime::DIRECTORY_MEDIA_TYPE;
use crate::http::request::Request;
use crate::http::response::StatusCode;

type Body = Pin<Box<dyn AsyncRead + Send>>;

/// Outcome of receiving an upload body.
enum Upload {
    /// Body stored; the caller writes the success status.
    Stored,
    /// An error response has already been written.
    Answered,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Serves a regular file, or a generated index for a directory requested
    /// with a trailing `/`. The body is only sent when `send_body` is set.
    pub(crate) async fn get_or_head(
        &mut self,
        request: &Request,
        fs_path: &str,
        headers: &mut HeaderSet,
        send_body: bool,
    ) -> anyhow::Result<()> {
        let meta = match tokio::fs::metadata(fs_path).await {
            Ok(meta) => meta,
            Err(_) => return self.send_error(StatusCode::NotFound, headers).await,
        };

        let (body, len, modified) = if meta.is_dir() && fs_path.ends_with('/') {
            match generate_listing(&request.path, Path::new(fs_path)).await {
                Ok(listing) => {
                    let len = listing.len();
                    let modified = listing.modified();
                    (Box::pin(listing.into_reader()) as Body, len, modified)
                }
                Err(e) => {
                    warn!(path = %fs_path, error = %e, "cannot list directory");
                    return self.send_error(StatusCode::MethodNotAllowed, headers).await;
                }
            }
        } else if meta.is_file() {
            match tokio::fs::File::open(fs_path).await {
                Ok(file) => (Box::pin(file) as Body, meta.len(), meta.modified()?),
                Err(e) => {
                    warn!(path = %fs_path, error = %e, "cannot open file");
                    return self.send_error(StatusCode::NotFound, headers).await;
                }
            }
        } else {
            return self.send_error(StatusCode::NotFound, headers).await;
        };

        let mime = self.ctx.mime.current();
        let media_type = match mime.resolve(fs_path) {
            // some browsers read text/directory as a vCard
            DIRECTORY_MEDIA_TYPE => "text/html",
            media_type => media_type,
        };

        for (name, value) in [
            ("Content-Length", len.to_string()),
            ("Last-Modified", httpdate::fmt_http_date(modified)),
            ("Content-type", media_type.to_string()),
        ] {
            if headers.is_full() {
                warn!(header = name, "response headers full, header dropped");
                continue;
            }
            headers.put(name, value);
        }

        self.send_head(StatusCode::Ok, headers).await?;

        if send_body {
            let sent = tokio::io::copy(&mut body.take(len), &mut self.stream).await?;
            if sent < len {
                warn!(path = %fs_path, expected = len, sent, "resource shrank while sending");
            }
        }

        Ok(())
    }

    /// Stores the body at `fs_path`: 201 when the resource is new, 200 when
    /// it replaced an existing one.
    pub(crate) async fn put(
        &mut self,
        request: &Request,
        fs_path: &str,
        headers: &mut HeaderSet,
    ) -> anyhow::Result<()> {
        let created = tokio::fs::metadata(fs_path).await.is_err();

        match self.receive_upload(request, fs_path, headers).await? {
            Upload::Stored => {
                let status = if created {
                    StatusCode::Created
                } else {
                    StatusCode::Ok
                };
                self.send_head(status, headers).await
            }
            Upload::Answered => Ok(()),
        }
    }

    /// Same body handling as PUT, always answered with 200.
    pub(crate) async fn post(
        &mut self,
        request: &Request,
        fs_path: &str,
        headers: &mut HeaderSet,
    ) -> anyhow::Result<()> {
        match self.receive_upload(request, fs_path, headers).await? {
            Upload::Stored => self.send_head(StatusCode::Ok, headers).await,
            Upload::Answered => Ok(()),
        }
    }

    /// Removes a regular file, or an empty directory requested with a
    /// trailing `/`. Anything else is answered with 405.
    pub(crate) async fn delete(&mut self, fs_path: &str, headers: &mut HeaderSet) -> anyhow::Result<()> {
        let meta = match tokio::fs::metadata(fs_path).await {
            Ok(meta) => meta,
            Err(_) => return self.send_error(StatusCode::NotFound, headers).await,
        };

        let removed = if meta.is_file() {
            tokio::fs::remove_file(fs_path).await
        } else if meta.is_dir() && fs_path.ends_with('/') {
            tokio::fs::remove_dir(fs_path).await
        } else {
            debug!(path = %fs_path, "DELETE target is neither a file nor a directory URI");
            return self.send_error(StatusCode::MethodNotAllowed, headers).await;
        };

        match removed {
            Ok(()) => self.send_head(StatusCode::Ok, headers).await,
            Err(e) => {
                debug!(path = %fs_path, error = %e, "DELETE failed");
                self.send_error(StatusCode::MethodNotAllowed, headers).await
            }
        }
    }

    /// Creates missing parent directories, opens the destination and copies
    /// exactly `Content-Length` bytes into it. The destination is created
    /// before the length is checked, so a 411 leaves an empty file behind.
    async fn receive_upload(
        &mut self,
        request: &Request,
        fs_path: &str,
        headers: &mut HeaderSet,
    ) -> anyhow::Result<Upload> {
        if let Some(parent) = Path::new(fs_path).parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                debug!(path = %parent.display(), error = %e, "cannot create parent directories");
            }
        }

        let mut file = match tokio::fs::File::create(fs_path).await {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %fs_path, error = %e, "cannot open upload destination");
                self.send_error(StatusCode::MethodNotAllowed, headers).await?;
                return Ok(Upload::Answered);
            }
        };

        let len = match request.content_length() {
            Ok(Some(len)) => len,
            Ok(None) => {
                self.send_error(StatusCode::LengthRequired, headers).await?;
                return Ok(Upload::Answered);
            }
            Err(e) => {
                debug!(error = %e, "rejecting upload");
                self.send_error(StatusCode::BadRequest, headers).await?;
                return Ok(Upload::Answered);
            }
        };

        self.copy_body(&mut file, len).await?;
        file.flush().await?;
        Ok(Upload::Stored)
    }
}
