//! Logical path handling for the virtual filesystem.
//!
//! There is no upward pointer in the tree, so `..` is resolved lexically
//! against the path string, never against the nodes.

/// Lexically cleans an absolute path: collapses repeated slashes, drops `.`
/// segments and resolves `..` against the preceding segment. The result always
/// starts with `/` and never ends with one, except for the root itself.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        String::from("/")
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Builds the target of a path argument: absolute when it starts with `/`,
/// otherwise relative to `current_dir`. The result is cleaned.
pub fn resolve_argument(current_dir: &str, arg: &str) -> String {
    if arg.starts_with('/') {
        clean_path(arg)
    } else {
        clean_path(&format!("{}/{}", current_dir, arg))
    }
}

/// Joins an argument onto `current_dir` even when it starts with `/`, the
/// way RETR names its file. The result is cleaned.
pub fn join_relative(current_dir: &str, arg: &str) -> String {
    clean_path(&format!("{}/{}", current_dir, arg))
}
