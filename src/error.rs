use std::io;
use thiserror::Error;

use crate::session::{Entry, Reply, SessionError};

pub type FsResult<T> = Result<T, Error>;

/// Coarse classification of an [`Error`], for branching without matching
/// on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Transport,
    Protocol,
    Fatal,
}

/// Enum for filesystem errors
#[derive(Debug, Error)]
pub enum Error {
    /// The base name is absent from its parent listing
    #[error("{name}: not found among [{}]", sibling_names(.siblings))]
    NotFound { name: String, siblings: Vec<Entry> },
    /// The session or data connection failed
    #[error("{path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The server rejected a command
    #[error("{path}: {source}")]
    Protocol {
        path: String,
        #[source]
        source: Reply,
    },
    /// The session reported an entry type outside file, directory and link.
    /// Nothing sensible can be done with such a session.
    #[error("{path}: entry {name:?} has unsupported type {kind:?}")]
    Fatal {
        path: String,
        name: String,
        kind: String,
    },
}

fn sibling_names(siblings: &[Entry]) -> String {
    siblings
        .iter()
        .map(|e| e.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::Fatal { .. } => ErrorKind::Fatal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns `true` if the session broke its contract and should be discarded.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }

    pub(crate) fn session(path: &str, error: SessionError) -> Self {
        match error {
            SessionError::Io(source) => Self::transport(path, source),
            SessionError::Reply(source) => Self::Protocol {
                path: path.to_owned(),
                source,
            },
        }
    }

    pub(crate) fn transport(path: &str, source: io::Error) -> Self {
        Self::Transport {
            path: path.to_owned(),
            source,
        }
    }

    /// Recovers an error that went through an [`io::Error`], e.g. from
    /// [`AsyncRead`](tokio::io::AsyncRead) on a [`File`](crate::fs::File).
    pub(crate) fn from_io(path: &str, error: io::Error) -> Self {
        if !error.get_ref().is_some_and(|inner| inner.is::<Self>()) {
            return Self::transport(path, error);
        }

        match error.into_inner().map(|inner| inner.downcast::<Self>()) {
            Some(Ok(inner)) => *inner,
            Some(Err(inner)) => Self::transport(path, io::Error::other(inner)),
            None => Self::transport(path, io::ErrorKind::Other.into()),
        }
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        let kind = match &error {
            Error::NotFound { .. } => io::ErrorKind::NotFound,
            Error::Transport { source, .. } => source.kind(),
            Error::Protocol { .. } | Error::Fatal { .. } => io::ErrorKind::Other,
        };
        Self::new(kind, error)
    }
}

#[cfg(test)]
mod test_error {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_session_errors_keep_their_kind() {
        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let err = Error::session("/pub", reset.into());
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.to_string(), "/pub: reset");

        let err = Error::session("/pub", Reply::new(550, "denied").into());
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("550 denied"));
    }

    #[test]
    fn test_not_found_lists_siblings() {
        let err = Error::NotFound {
            name: "y".to_owned(),
            siblings: vec![Entry::file("z", 1), Entry::dir("w")],
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "y: not found among [z, w]");
    }

    #[test]
    fn test_io_round_trip_preserves_error() {
        let err = Error::Fatal {
            path: "/".to_owned(),
            name: "dev".to_owned(),
            kind: "OS.unix=chr".to_owned(),
        };
        let err = Error::from_io("/ignored", err.into());
        assert!(err.is_fatal());

        let plain = io::Error::new(io::ErrorKind::TimedOut, "slow");
        match Error::from_io("/a", plain) {
            Error::Transport { path, source } => {
                assert_eq!(path, "/a");
                assert_eq!(source.kind(), io::ErrorKind::TimedOut);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
