use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{io::ErrorKind, time::SystemTime};

use crate::{
    error::{Error, FsResult},
    session::{Entry, EntryType},
};

/// Types according to mode unix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileMode(u32);

bitflags! {
    impl FileMode: u32 {
        const DIR = 0x4000;
        const REG = 0x8000;
        const LNK = 0xA000;
    }
}

impl FileMode {
    const TYPE_MASK: u32 = 0xF000;

    fn has_type(self, r#type: Self) -> bool {
        self.bits() & Self::TYPE_MASK == r#type.bits()
    }

    /// Returns `true` if is a dir
    pub fn is_dir(self) -> bool {
        self.has_type(Self::DIR)
    }

    /// Returns `true` if is a regular file
    pub fn is_file(self) -> bool {
        self.has_type(Self::REG)
    }

    /// Returns `true` if is a symlink
    pub fn is_symlink(self) -> bool {
        self.has_type(Self::LNK)
    }
}

/// Metadata of one remote entry, as captured from a directory listing.
///
/// Values are a snapshot: nothing is re-queried after construction.
/// The raw listing entry stays reachable through [`Metadata::underlying`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    entry: Entry,
    mode: FileMode,
}

impl Metadata {
    /// Checks the entry type while ingesting a raw entry listed from `dir`.
    ///
    /// An entry type other than file, directory or link means the session
    /// broke its contract, which is reported as [`Error::Fatal`].
    pub(crate) fn from_entry(dir: &str, entry: Entry) -> FsResult<Self> {
        let mode = match &entry.entry_type {
            EntryType::File => FileMode::REG,
            EntryType::Directory => FileMode::DIR,
            EntryType::Link => FileMode::LNK,
            EntryType::Other(kind) => {
                error!(
                    "session listed {:?} in {} with unsupported type {:?}",
                    entry.name, dir, kind
                );
                return Err(Error::Fatal {
                    path: dir.to_owned(),
                    name: entry.name,
                    kind: kind.to_owned(),
                });
            }
        };

        Ok(Self { entry, mode })
    }

    /// Returns the name relative to the parent directory
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Returns the size of the file
    pub fn size(&self) -> u64 {
        self.entry.size
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn file_type(&self) -> &EntryType {
        &self.entry.entry_type
    }

    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Returns the modification time, if the server reported one
    pub fn mod_time(&self) -> Option<DateTime<Utc>> {
        self.entry.time
    }

    /// Returns the last modification time
    pub fn modified(&self) -> std::io::Result<SystemTime> {
        match self.entry.time {
            Some(time) => Ok(SystemTime::from(time)),
            None => Err(ErrorKind::InvalidData.into()),
        }
    }

    /// Raw listing entry, for fields this type does not expose
    pub fn underlying(&self) -> &Entry {
        &self.entry
    }
}
