//! Confining client-supplied filenames to a batch directory.

use std::path::{Component, Path, PathBuf};

/// Lexically clean `raw` as if it were rooted at `/`.
///
/// Empty and `.` segments are dropped, `..` removes the previous segment
/// and never climbs above the root. The result always starts with `/`.
pub fn clean_path(raw: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Resolve a client-supplied filename to a path inside `batch_dir`.
///
/// The result is always `batch_dir` followed by zero or more plain
/// components. Segments the host platform would interpret as a root,
/// prefix or separator are dropped.
pub fn sanitize(batch_dir: &Path, raw: &str) -> PathBuf {
    let mut path = batch_dir.to_path_buf();
    for segment in clean_path(raw).split('/') {
        if is_plain_segment(segment) {
            path.push(segment);
        }
    }
    path
}

fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == segment
    )
}
