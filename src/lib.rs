//! Read-only filesystem view over an FTP session.
//!
//! [`FtpFs`](fs::FtpFs) turns the listings and transfers of an
//! [`FtpSession`](session::FtpSession) into `open`, `metadata` and `read_dir`
//! operations. The session itself (connection, login, wire protocol) is
//! provided by the caller.

#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate async_trait;

mod error;
/// Filesystem operations
pub mod fs;
pub mod path;
/// Session contract consumed by [`fs`]
pub mod session;

pub use error::{Error, ErrorKind, FsResult};
pub use fs::FtpFs;
