use std::collections::VecDeque;

use super::{FileMode, Metadata};
use crate::{
    error::{Error, FsResult},
    session::FtpSession,
};

/// Entries returned by the [`ReadDir`] iterator.
#[derive(Debug, Clone)]
pub struct DirEntry {
    metadata: Metadata,
}

impl DirEntry {
    /// Returns the file name for the file that this entry points at.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.metadata.name().to_owned()
    }

    /// Returns the file type for the file that this entry points at.
    #[must_use]
    pub fn file_type(&self) -> FileMode {
        self.metadata.mode()
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }

    /// Returns the metadata for the file that this entry points at.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }
}

/// Iterator over the entries in a remote directory, sorted by name.
#[derive(Debug)]
pub struct ReadDir {
    entries: VecDeque<DirEntry>,
}

impl Iterator for ReadDir {
    type Item = DirEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.entries.len(), Some(self.entries.len()))
    }
}

impl ExactSizeIterator for ReadDir {}

/// Lists the immediate children of `path`.
///
/// The `.` and `..` pseudo-entries are dropped whatever their type, and the
/// rest is sorted by name since servers make no promise about order.
pub(crate) async fn read_dir<S: FtpSession>(session: &mut S, path: &str) -> FsResult<ReadDir> {
    debug!("LIST {}", path);
    let mut files = session
        .list(path)
        .await
        .map_err(|e| Error::session(path, e))?;

    files.retain(|e| e.name != "." && e.name != "..");
    files.sort_by(|a, b| a.name.cmp(&b.name));

    let entries: VecDeque<DirEntry> = files
        .into_iter()
        .map(|e| Metadata::from_entry(path, e).map(|metadata| DirEntry { metadata }))
        .collect::<FsResult<_>>()?;

    Ok(ReadDir { entries })
}
