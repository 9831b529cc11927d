//! Reconcile tool-reported paths with repository-relative paths.
//!
//! Tools report files as root-relative, absolute, or `file:///` URLs, with
//! either slash style. Review comments need forward-slash paths relative to
//! the repository root (the working directory). All work here is lexical so
//! the result does not depend on the host's path conventions or on the files
//! existing.

use std::path::Path;

const FILE_URL_PREFIX: &str = "file:///";

fn to_slashes(s: &str) -> String {
    s.replace('\\', "/")
}

fn drive_prefix(p: &str) -> Option<&str> {
    let bytes = p.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        Some(&p[..2])
    } else {
        None
    }
}

fn is_absolute(p: &str) -> bool {
    p.starts_with('/') || drive_prefix(p).is_some()
}

fn join(base: &str, rest: &str) -> String {
    if base.is_empty() {
        rest.to_string()
    } else if rest.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), rest)
    }
}

/// Split an absolute slash path into its root and resolved components,
/// folding `.` and `..` (which stops at the root).
fn resolve(path: &str) -> (String, Vec<&str>) {
    let (root, rest) = match drive_prefix(path) {
        Some(drive) => (format!("{}/", drive.to_ascii_uppercase()), &path[2..]),
        None if path.starts_with('/') => ("/".to_string(), path),
        None => (String::new(), path),
    };

    let mut parts: Vec<&str> = Vec::new();
    for part in rest.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if root.is_empty() {
                    parts.push(part);
                }
            }
            _ => parts.push(part),
        }
    }
    (root, parts)
}

/// Lexical equivalent of "path of `to` as seen from `from`"
fn relative(from: &str, to: &str) -> String {
    let (from_root, from_parts) = resolve(from);
    let (to_root, to_parts) = resolve(to);

    if !from_root.eq_ignore_ascii_case(&to_root) {
        return format!("{}{}", to_root, to_parts.join("/"));
    }

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out: Vec<&str> = vec![".."; from_parts.len() - common];
    out.extend(&to_parts[common..]);
    out.join("/")
}

/// Normalize a reported path against the analysis root, relative to `cwd`.
pub fn normalize_path_from(reported: &str, analysis_root: &str, cwd: &Path) -> String {
    let reported = reported.strip_prefix(FILE_URL_PREFIX).unwrap_or(reported);
    let reported = to_slashes(reported);
    let analysis_root = to_slashes(analysis_root);
    let cwd = to_slashes(&cwd.to_string_lossy());

    let target = if is_absolute(&reported) {
        reported
    } else {
        join(&analysis_root, &reported)
    };
    let target = if is_absolute(&target) {
        target
    } else {
        join(&cwd, &target)
    };

    relative(&cwd, &target)
}

/// Normalize a reported path against the analysis root, relative to the
/// process working directory.
pub fn normalize_path(reported: &str, analysis_root: &str) -> std::io::Result<String> {
    let cwd = std::env::current_dir()?;
    Ok(normalize_path_from(reported, analysis_root, &cwd))
}

/// Light cleanup for SARIF URIs: drop one leading `./` or `.\` per line.
pub fn strip_dot_prefix(path: &str) -> String {
    path.split('\n')
        .map(|line| {
            line.strip_prefix("./")
                .or_else(|| line.strip_prefix(".\\"))
                .unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
