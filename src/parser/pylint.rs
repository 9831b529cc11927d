use super::{Diagnostic, Level};
use crate::error::ParserError;
use serde::Deserialize;

/// One entry of pylint's `--output-format=json` array
#[derive(Debug, Deserialize)]
struct PylintMessage {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    line: Option<u32>,
    /// 0-based
    #[serde(default)]
    column: Option<u32>,
    #[serde(default, rename = "endLine")]
    end_line: Option<u32>,
    /// 0-based
    #[serde(default, rename = "endColumn")]
    end_column: Option<u32>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "message-id")]
    message_id: Option<String>,
}

fn map_level(kind: &str) -> Option<Level> {
    match kind {
        "convention" | "usage" | "refactor" => Some(Level::Note),
        "warning" => Some(Level::Warning),
        "error" => Some(Level::Error),
        _ => None,
    }
}

impl From<PylintMessage> for Diagnostic {
    fn from(m: PylintMessage) -> Self {
        Diagnostic {
            id: m.message_id,
            sym: m.symbol,
            msg: m.message,
            level: m.kind.as_deref().and_then(map_level),
            path: m.path,
            line: m.line,
            col: m.column.and_then(|c| c.checked_add(1)),
            eline: m.end_line,
            ecol: m.end_column.and_then(|c| c.checked_add(1)),
        }
    }
}

/// Decode the whole JSON array up front, then convert entries on demand
pub fn parse(input: &str) -> Result<impl Iterator<Item = Diagnostic>, ParserError> {
    let messages: Vec<PylintMessage> = serde_json::from_str(input)?;
    Ok(messages.into_iter().map(Diagnostic::from))
}
