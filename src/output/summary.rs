use crate::error::OutputError;
use crate::parser::{Diagnostic, Level};
use crate::paths::normalize_path_from;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable GitHub Actions reads the job summary from
pub const STEP_SUMMARY_ENV: &str = "GITHUB_STEP_SUMMARY";

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

fn location(diag: &Diagnostic, analysis_root: &str, cwd: &Path) -> String {
    let Some(path) = diag.path.as_deref() else {
        return "-".to_string();
    };
    let mut loc = normalize_path_from(path, analysis_root, cwd);
    if let Some(line) = diag.line {
        loc.push_str(&format!(":{}", line));
        if let Some(col) = diag.col {
            loc.push_str(&format!(":{}", col));
        }
    }
    loc
}

fn rule(diag: &Diagnostic) -> String {
    match (diag.id.as_deref(), diag.sym.as_deref()) {
        (Some(id), Some(sym)) => format!("{} ({})", id, sym),
        (Some(rule), None) | (None, Some(rule)) => rule.to_string(),
        (None, None) => "-".to_string(),
    }
}

/// Render the Markdown results table against an explicit working directory.
pub fn render_summary_from<I>(
    diagnostics: I,
    tool_name: &str,
    analysis_root: &str,
    cwd: &Path,
) -> String
where
    I: IntoIterator<Item = Diagnostic>,
{
    let mut rows = String::new();
    let mut counts = [0usize; 3];
    let mut total = 0;

    for diag in diagnostics {
        total += 1;
        match diag.level {
            Some(Level::Error) => counts[0] += 1,
            Some(Level::Warning) => counts[1] += 1,
            Some(Level::Note) => counts[2] += 1,
            None => {}
        }
        rows.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            diag.level.map(|l| l.as_str()).unwrap_or("-"),
            cell(&location(&diag, analysis_root, cwd)),
            cell(&rule(&diag)),
            cell(diag.msg.as_deref().unwrap_or("")),
        ));
    }

    let mut md = format!("## {} results\n\n", tool_name);

    if total == 0 {
        md.push_str("No issues found.\n");
        return md;
    }

    md.push_str(&format!(
        "**{}** diagnostics: {} errors, {} warnings, {} notes\n\n",
        total, counts[0], counts[1], counts[2]
    ));
    md.push_str("| Level | Location | Rule | Message |\n");
    md.push_str("|-------|----------|------|---------|\n");
    md.push_str(&rows);
    md
}

/// Render the Markdown results table relative to the process working directory.
pub fn render_summary<I>(
    diagnostics: I,
    tool_name: &str,
    analysis_root: &str,
) -> std::io::Result<String>
where
    I: IntoIterator<Item = Diagnostic>,
{
    let cwd = std::env::current_dir()?;
    Ok(render_summary_from(diagnostics, tool_name, analysis_root, &cwd))
}

/// Append `markdown` to the job summary file, stamped with the time.
pub fn append_step_summary(path: &Path, markdown: &str) -> Result<(), OutputError> {
    let write_err = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_err)?;

    let stamped = format!(
        "{}\n_Generated {}_\n\n",
        markdown,
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    file.write_all(stamped.as_bytes()).map_err(write_err)
}

/// Job summary file from the environment, if running under Actions
pub fn step_summary_path() -> Option<PathBuf> {
    std::env::var_os(STEP_SUMMARY_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
