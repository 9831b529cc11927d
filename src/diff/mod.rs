use crate::error::DiffError;
use std::collections::{BTreeMap, BTreeSet};

/// Lines added in the new revision, keyed by destination path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddedLines(BTreeMap<String, BTreeSet<u32>>);

impl AddedLines {
    pub fn get(&self, path: &str) -> Option<&BTreeSet<u32>> {
        self.0.get(path)
    }

    /// True only if every line in `start..=end` was added in `path`
    pub fn contains_range(&self, path: &str, start: u32, end: u32) -> bool {
        self.0
            .get(path)
            .is_some_and(|lines| (start..=end).all(|line| lines.contains(&line)))
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HunkHeader {
    old_count: u32,
    new_start: u32,
    new_count: u32,
}

/// Parse `start[,count]`; an omitted count means one line
fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

fn parse_hunk_header(line: &str) -> Result<HunkHeader, DiffError> {
    // @@ -1,2 +3,4 @@ optional section heading
    let malformed = || DiffError::MalformedHunkHeader(line.to_string());
    let mut parts = line.split_whitespace().skip(1);

    let old = parts
        .next()
        .and_then(|p| p.strip_prefix('-'))
        .and_then(parse_range)
        .ok_or_else(malformed)?;
    let new = parts
        .next()
        .and_then(|p| p.strip_prefix('+'))
        .and_then(parse_range)
        .ok_or_else(malformed)?;

    Ok(HunkHeader {
        old_count: old.1,
        new_start: new.0,
        new_count: new.1,
    })
}

fn parse_diff_git_line(line: &str) -> Option<String> {
    // diff --git a/foo b/foo
    let b = line.split_whitespace().nth(3)?;
    Some(b.strip_prefix("b/").unwrap_or(b).to_string())
}

/// Destination path of a `+++` line; `None` for deleted files
fn parse_plus_plus_plus(line: &str) -> Option<String> {
    let rest = line.strip_prefix("+++ ")?;
    let path = rest.split('\t').next().unwrap_or(rest).trim_end();
    if path == "/dev/null" {
        return None;
    }
    Some(path.strip_prefix("b/").unwrap_or(path).to_string())
}

/// Build the added-line map from a unified diff.
///
/// Hunk bodies are consumed by the counts in their `@@` header, so content
/// lines that look like file headers are still classified by their first
/// character. Deleted files (`+++ /dev/null`) contribute nothing.
pub fn map_added_lines(diff_text: &str) -> Result<AddedLines, DiffError> {
    let mut files: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
    let mut current: Option<String> = None;

    let mut old_remaining: u32 = 0;
    let mut new_remaining: u32 = 0;
    let mut new_line: u32 = 0;

    for raw in diff_text.lines() {
        if old_remaining > 0 || new_remaining > 0 {
            match raw.as_bytes().first().copied() {
                Some(b'+') => {
                    if let Some(path) = &current {
                        files.entry(path.clone()).or_default().insert(new_line);
                    }
                    new_line = new_line.saturating_add(1);
                    new_remaining = new_remaining.saturating_sub(1);
                    continue;
                }
                Some(b'-') => {
                    old_remaining = old_remaining.saturating_sub(1);
                    continue;
                }
                // some tools strip the single space from blank context lines
                Some(b' ') | None => {
                    old_remaining = old_remaining.saturating_sub(1);
                    new_remaining = new_remaining.saturating_sub(1);
                    new_line = new_line.saturating_add(1);
                    continue;
                }
                Some(b'\\') => continue,
                Some(_) => {
                    tracing::debug!("Hunk ended early at: {}", raw);
                    old_remaining = 0;
                    new_remaining = 0;
                }
            }
        }

        if raw.starts_with("diff --git ") {
            current = parse_diff_git_line(raw);
        } else if raw.starts_with("+++ ") {
            current = parse_plus_plus_plus(raw);
        } else if raw.starts_with("@@") {
            let header = parse_hunk_header(raw)?;
            old_remaining = header.old_count;
            new_remaining = header.new_count;
            new_line = header.new_start;
            if let Some(path) = &current {
                files.entry(path.clone()).or_default();
            }
        }
    }

    tracing::debug!(
        "Diff touches {} files with {} added lines",
        files.len(),
        files.values().map(BTreeSet::len).sum::<usize>()
    );

    Ok(AddedLines(files))
}
