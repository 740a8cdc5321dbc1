use super::Metadata;
use crate::{
    error::{Error, FsResult},
    path,
    session::FtpSession,
};

/// Finds the entry at `path` by listing its parent and looking for an exact
/// match on the base name. The first match in listing order wins.
pub(crate) async fn resolve<S: FtpSession>(session: &mut S, path: &str) -> FsResult<Metadata> {
    let (parent, base) = path::split(path);

    debug!("LIST {} to resolve {}", parent, base);
    let mut entries = session
        .list(&parent)
        .await
        .map_err(|e| Error::session(&parent, e))?;

    match entries.iter().position(|e| e.name == base) {
        Some(idx) => Metadata::from_entry(&parent, entries.swap_remove(idx)),
        None => Err(Error::NotFound {
            name: base,
            siblings: entries,
        }),
    }
}
