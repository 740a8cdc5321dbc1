//! The FTP session contract consumed by the filesystem layer.
//!
//! Connecting, authenticating and speaking the wire protocol are the job of
//! whatever implements [`FtpSession`]. The filesystem layer only ever asks for
//! a directory listing or a data stream.

pub mod memory;

use chrono::{DateTime, Utc};
use std::{fmt, io};
use thiserror::Error;
use tokio::io::AsyncRead;

pub use memory::MemorySession;

pub type SessionResult<T> = Result<T, SessionError>;

/// Type of a remote entry as reported by the server listing.
///
/// Servers are only expected to report files, directories and links.
/// Anything else is kept verbatim in [`EntryType::Other`] and rejected
/// when the entry is turned into [`Metadata`](crate::fs::Metadata).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryType {
    File,
    Directory,
    Link,
    Other(String),
}

impl EntryType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::File => "file",
            Self::Directory => "dir",
            Self::Link => "link",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Name relative to the listed directory
    pub name: String,
    /// Byte count, meaningless for directories
    pub size: u64,
    pub entry_type: EntryType,
    /// Modification time, absent when the server does not report one
    pub time: Option<DateTime<Utc>>,
}

impl Entry {
    pub fn new<T: Into<String>>(name: T, entry_type: EntryType) -> Self {
        Self {
            name: name.into(),
            size: 0,
            entry_type,
            time: None,
        }
    }

    pub fn file<T: Into<String>>(name: T, size: u64) -> Self {
        Self {
            size,
            ..Self::new(name, EntryType::File)
        }
    }

    pub fn dir<T: Into<String>>(name: T) -> Self {
        Self::new(name, EntryType::Directory)
    }

    pub fn link<T: Into<String>>(name: T) -> Self {
        Self::new(name, EntryType::Link)
    }

    #[must_use]
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }
}

/// Negative reply sent by the server on the control connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code} {message}")]
pub struct Reply {
    pub code: u16,
    pub message: String,
}

impl Reply {
    pub fn new<T: Into<String>>(code: u16, message: T) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Errors reported by a session implementation
#[derive(Debug, Error)]
pub enum SessionError {
    /// Connection-level failure (reset, timeout, broken pipe...)
    #[error("I/O: {0}")]
    Io(#[from] io::Error),
    /// The server rejected the command
    #[error("{0}")]
    Reply(#[from] Reply),
}

/// Data connection returned by [`FtpSession::retrieve`].
///
/// The stream must be read to its end and then closed explicitly. Closing a
/// data connection that still has unread bytes can leave the control
/// connection out of sync, so callers drain before calling [`close`](Self::close).
#[async_trait]
pub trait DataStream: AsyncRead + Unpin + Send {
    /// Releases the data connection and collects the transfer reply.
    async fn close(&mut self) -> io::Result<()>;
}

/// Connected and authenticated FTP session.
///
/// A session runs one command at a time. Starting a second transfer while a
/// [`DataStream`] from a previous one is still open is not supported.
#[async_trait]
pub trait FtpSession: Send {
    type Stream: DataStream + 'static;

    /// Lists the immediate children of a directory, in server order.
    async fn list(&mut self, path: &str) -> SessionResult<Vec<Entry>>;

    /// Opens a data stream for the content of a file.
    async fn retrieve(&mut self, path: &str) -> SessionResult<Self::Stream>;
}
