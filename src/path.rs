//! Slash-separated remote paths.

/// Lexically normalises a path: repeated slashes collapse, `.` components
/// are dropped and `..` removes the preceding component. A rooted path never
/// climbs above `/`. An empty result becomes `"."`.
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    let _ = parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            part => parts.push(part),
        }
    }

    let joined = parts.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_owned()
    } else {
        joined
    }
}

/// Splits a path into its parent directory and its last component.
///
/// Trailing slashes are ignored. A bare name has `"."` as parent and a
/// top-level absolute name has `"/"`.
pub fn split(path: &str) -> (String, String) {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        let base = if path.is_empty() { "." } else { "/" };
        return (base.to_owned(), base.to_owned());
    }

    match trimmed.rfind('/') {
        Some(idx) => (clean(&trimmed[..=idx]), trimmed[idx + 1..].to_owned()),
        None => (".".to_owned(), trimmed.to_owned()),
    }
}

/// Joins `path` onto `root` and cleans the result.
pub fn join(root: &str, path: &str) -> String {
    clean(&format!("{root}/{path}"))
}
