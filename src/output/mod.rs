mod summary;

pub use summary::{append_step_summary, render_summary, step_summary_path};

use crate::error::OutputError;
use crate::sarif::SarifLog;
use std::io::Write;
use std::path::Path;

/// Write the log as pretty JSON to `path`, or to stdout for `None` / `-`.
pub fn write_sarif(log: &SarifLog, path: Option<&Path>) -> Result<(), OutputError> {
    let mut json = serde_json::to_string_pretty(log)?;
    json.push('\n');

    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => std::fs::write(path, json).map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => std::io::stdout()
            .lock()
            .write_all(json.as_bytes())
            .map_err(|source| OutputError::Write {
                path: "-".into(),
                source,
            }),
    }
}
