//! In-memory [`FtpSession`] with a call journal and fault injection.

use std::{
    collections::HashMap,
    io,
    pin::Pin,
    sync::{Arc, Mutex, PoisonError},
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, ReadBuf};

use super::{DataStream, Entry, FtpSession, Reply, SessionError, SessionResult};

/// Command observed by a [`MemorySession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    Retrieve(String),
    /// A data stream was closed with `unread` bytes still pending
    Close { path: String, unread: usize },
}

#[derive(Debug, Clone)]
enum Fault {
    Reset,
    Reply(Reply),
}

impl Fault {
    fn raise(&self) -> SessionError {
        match self {
            Self::Reset => io::Error::new(io::ErrorKind::ConnectionReset, "connection reset").into(),
            Self::Reply(reply) => reply.clone().into(),
        }
    }
}

#[derive(Debug, Default)]
struct Content {
    data: Vec<u8>,
    read_fault: Option<usize>,
    close_fault: bool,
}

type Journal = Arc<Mutex<Vec<Call>>>;

fn record(journal: &Journal, call: Call) {
    journal
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(call);
}

/// Session backed by listings and file contents held in memory.
///
/// Listings are returned exactly as registered, pseudo-entries and ordering
/// included, so it can stand in for any server behaviour.
#[derive(Debug, Default)]
pub struct MemorySession {
    listings: HashMap<String, Vec<Entry>>,
    files: HashMap<String, Content>,
    list_faults: HashMap<String, Fault>,
    retrieve_faults: HashMap<String, Fault>,
    journal: Journal,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the listing returned for `dir`.
    #[must_use]
    pub fn with_listing<T, I>(mut self, dir: T, entries: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = Entry>,
    {
        let _ = self
            .listings
            .insert(dir.into(), entries.into_iter().collect());
        self
    }

    /// Registers the bytes streamed back when `path` is retrieved.
    #[must_use]
    pub fn with_file<T: Into<String>, D: Into<Vec<u8>>>(mut self, path: T, data: D) -> Self {
        self.files.entry(path.into()).or_default().data = data.into();
        self
    }

    /// Makes listing `dir` fail with a connection reset.
    #[must_use]
    pub fn with_list_reset<T: Into<String>>(mut self, dir: T) -> Self {
        let _ = self.list_faults.insert(dir.into(), Fault::Reset);
        self
    }

    /// Makes listing `dir` fail with a negative server reply.
    #[must_use]
    pub fn with_list_reply<T: Into<String>>(mut self, dir: T, reply: Reply) -> Self {
        let _ = self.list_faults.insert(dir.into(), Fault::Reply(reply));
        self
    }

    /// Makes retrieving `path` fail with a negative server reply.
    #[must_use]
    pub fn with_retrieve_reply<T: Into<String>>(mut self, path: T, reply: Reply) -> Self {
        let _ = self.retrieve_faults.insert(path.into(), Fault::Reply(reply));
        self
    }

    /// Resets the data connection of `path` once `offset` bytes were delivered.
    #[must_use]
    pub fn with_read_fault<T: Into<String>>(mut self, path: T, offset: usize) -> Self {
        self.files.entry(path.into()).or_default().read_fault = Some(offset);
        self
    }

    /// Makes closing the data connection of `path` fail.
    #[must_use]
    pub fn with_close_fault<T: Into<String>>(mut self, path: T) -> Self {
        self.files.entry(path.into()).or_default().close_fault = true;
        self
    }

    /// Commands issued so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl FtpSession for MemorySession {
    type Stream = MemoryStream;

    async fn list(&mut self, path: &str) -> SessionResult<Vec<Entry>> {
        record(&self.journal, Call::List(path.to_owned()));

        if let Some(fault) = self.list_faults.get(path) {
            return Err(fault.raise());
        }

        match self.listings.get(path) {
            Some(entries) => Ok(entries.clone()),
            None => Err(Reply::new(550, format!("{path}: No such file or directory")).into()),
        }
    }

    async fn retrieve(&mut self, path: &str) -> SessionResult<MemoryStream> {
        record(&self.journal, Call::Retrieve(path.to_owned()));

        if let Some(fault) = self.retrieve_faults.get(path) {
            return Err(fault.raise());
        }

        match self.files.get(path) {
            Some(content) => Ok(MemoryStream {
                path: path.to_owned(),
                data: content.data.clone(),
                pos: 0,
                read_fault: content.read_fault,
                close_fault: content.close_fault,
                journal: self.journal.clone(),
            }),
            None => Err(Reply::new(550, format!("{path}: No such file or directory")).into()),
        }
    }
}

/// Data stream handed out by [`MemorySession`].
#[derive(Debug)]
pub struct MemoryStream {
    path: String,
    data: Vec<u8>,
    pos: usize,
    read_fault: Option<usize>,
    close_fault: bool,
    journal: Journal,
}

impl AsyncRead for MemoryStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let end = match self.read_fault {
            Some(offset) if self.pos >= offset => {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "data connection reset",
                )))
            }
            Some(offset) => offset.min(self.data.len()),
            None => self.data.len(),
        };

        let len = buf.remaining().min(end - self.pos);
        let start = self.pos;
        buf.put_slice(&self.data[start..start + len]);
        self.pos += len;

        Poll::Ready(Ok(()))
    }
}

#[async_trait]
impl DataStream for MemoryStream {
    async fn close(&mut self) -> io::Result<()> {
        record(
            &self.journal,
            Call::Close {
                path: self.path.clone(),
                unread: self.data.len() - self.pos,
            },
        );

        if self.close_fault {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "426 Connection closed; transfer aborted",
            ));
        }

        Ok(())
    }
}
