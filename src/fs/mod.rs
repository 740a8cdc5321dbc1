//! Filesystem operations over an FTP session.
//!
//! This module exposes a read-only view of a remote server built in the
//! image of [`std::fs`]: files can be opened and read, metadata queried and
//! directories listed. Every operation goes through a single [`FtpSession`]
//! and runs to completion before the next one may start.

mod dir;
mod file;
mod metadata;
mod resolve;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;

pub use dir::{DirEntry, ReadDir};
pub use file::File;
pub use metadata::{FileMode, Metadata};

use crate::{
    error::{Error, FsResult},
    path,
    session::FtpSession,
};

/// Settings of a [`FtpFs`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote directory all paths are taken relative to.
    /// Paths are handed to the session unchanged when unset.
    pub root: Option<String>,
}

/// Read-only filesystem backed by one FTP session.
///
/// Methods take `&mut self` because the session carries a single control
/// connection. A [`File`] returned by [`FtpFs::open`] must be closed before
/// the next transfer is started on the same session.
pub struct FtpFs<S> {
    session: S,
    config: Config,
}

impl<S: FtpSession> FtpFs<S> {
    pub fn new(session: S) -> Self {
        Self::with_config(session, Config::default())
    }

    pub fn with_config(session: S, config: Config) -> Self {
        Self { session, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Gives the session back.
    pub fn into_inner(self) -> S {
        self.session
    }

    fn remote_path(&self, path: &str) -> String {
        match &self.config.root {
            Some(root) => path::join(root, path),
            None => path.to_owned(),
        }
    }

    /// Attempts to open a file in read-only mode.
    ///
    /// The entry is looked up first, so a missing path fails with
    /// [`Error::NotFound`] before any transfer is started.
    pub async fn open<P: AsRef<str>>(&mut self, path: P) -> FsResult<File<S::Stream>> {
        let path = self.remote_path(path.as_ref());
        let metadata = resolve::resolve(&mut self.session, &path).await?;

        debug!("RETR {}", path);
        let stream = self
            .session
            .retrieve(&path)
            .await
            .map_err(|e| Error::session(&path, e))?;

        Ok(File::new(path, metadata, stream))
    }

    /// Queries metadata about the remote file.
    pub async fn metadata<P: AsRef<str>>(&mut self, path: P) -> FsResult<Metadata> {
        let path = self.remote_path(path.as_ref());
        resolve::resolve(&mut self.session, &path).await
    }

    /// Returns an iterator over the entries within a directory.
    pub async fn read_dir<P: AsRef<str>>(&mut self, path: P) -> FsResult<ReadDir> {
        let path = self.remote_path(path.as_ref());
        dir::read_dir(&mut self.session, &path).await
    }

    /// Reads the contents of a file located at the specified path to the end.
    ///
    /// The file is closed even when reading fails; the read error is then
    /// the one returned.
    pub async fn read<P: AsRef<str>>(&mut self, path: P) -> FsResult<Vec<u8>> {
        let mut file = self.open(path).await?;
        let mut buffer = Vec::new();

        let read = file.read_to_end(&mut buffer).await;
        let path = file.path().to_owned();
        let closed = file.close().await;

        read.map_err(|e| Error::from_io(&path, e))?;
        closed?;

        Ok(buffer)
    }

    /// Checks a file or folder exists at the specified path
    pub async fn try_exists<P: AsRef<str>>(&mut self, path: P) -> FsResult<bool> {
        match self.metadata(path).await {
            Ok(_) => Ok(true),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        }
    }
}
