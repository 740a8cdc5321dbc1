use std::{
    io,
    pin::Pin,
    task::{ready, Context, Poll},
};
use tokio::io::{self as tio, AsyncRead, ReadBuf};

use super::Metadata;
use crate::{
    error::{Error, FsResult},
    session::DataStream,
};

/// Open remote file implementing [`AsyncRead`].
///
/// Must be finished with [`File::close`], which drains whatever is left of the
/// transfer before releasing the data connection. A `File` that is dropped
/// instead leaks its data connection.
pub struct File<R: DataStream> {
    path: String,
    metadata: Metadata,
    stream: R,
    eof: bool,
    closed: bool,
}

impl<R: DataStream> File<R> {
    pub(crate) fn new(path: String, metadata: Metadata, stream: R) -> Self {
        Self {
            path,
            metadata,
            stream,
            eof: false,
            closed: false,
        }
    }

    /// Metadata captured when the file was opened. It is not refreshed, so
    /// it can be stale if the remote file changes meanwhile.
    pub fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Drains the unread remainder of the transfer, then closes the data
    /// connection.
    ///
    /// A failed close may leave the session's control connection out of
    /// sync, which affects every later command on it.
    pub async fn close(mut self) -> FsResult<()> {
        self.closed = true;

        match tio::copy(&mut self.stream, &mut tio::sink()).await {
            Ok(0) => {}
            Ok(n) => debug!("drained {} unread bytes of {}", n, self.path),
            Err(err) => {
                warn!("failed to drain {}: {}", self.path, err);
                return Err(Error::transport(&self.path, err));
            }
        }

        debug!("closing data connection of {}", self.path);
        if let Err(err) = self.stream.close().await {
            error!(
                "failed to close data connection of {}, session may be desynchronised: {}",
                self.path, err
            );
            return Err(Error::transport(&self.path, err));
        }

        Ok(())
    }
}

impl<R: DataStream> AsyncRead for File<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.eof || buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        let before = buf.filled().len();
        let result = ready!(Pin::new(&mut self.stream).poll_read(cx, buf));

        match result {
            Ok(()) => {
                if buf.filled().len() == before {
                    self.eof = true;
                }
                Poll::Ready(Ok(()))
            }
            Err(err) => Poll::Ready(Err(Error::transport(&self.path, err).into())),
        }
    }
}

impl<R: DataStream> Drop for File<R> {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                "{} dropped without close, its data connection was not released",
                self.path
            );
        }
    }
}
