use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Severity of a diagnostic, matching the SARIF `level` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
    Note,
}

impl Level {
    /// Parse one of the three SARIF level words. Anything else is unknown.
    pub fn parse(s: &str) -> Option<Level> {
        match s {
            "error" => Some(Level::Error),
            "warning" => Some(Level::Warning),
            "note" => Some(Level::Note),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One issue reported by a tool, normalized across input formats.
///
/// Every field is optional: `None` means the tool did not say, never zero.
/// Lines and columns are 1-based. `path` is exactly what the tool reported;
/// normalization happens downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostic {
    pub id: Option<String>,
    pub sym: Option<String>,
    pub msg: Option<String>,
    pub level: Option<Level>,
    pub path: Option<String>,
    pub line: Option<u32>,
    pub col: Option<u32>,
    pub eline: Option<u32>,
    pub ecol: Option<u32>,
}

impl Diagnostic {
    /// Whether any of the four region coordinates is known
    pub fn has_region(&self) -> bool {
        self.line.is_some() || self.col.is_some() || self.eline.is_some() || self.ecol.is_some()
    }
}
