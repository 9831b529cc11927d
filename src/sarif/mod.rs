//! SARIF 2.1.0 log assembly.
//!
//! One forward pass over the diagnostics: each record becomes exactly one
//! result, in input order, and rule definitions are registered the first
//! time an `id` shows up together with a `sym`.

use crate::parser::{Diagnostic, Level};
use crate::paths::{normalize_path_from, strip_dot_prefix};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const SARIF_SCHEMA: &str = "http://json.schemastore.org/sarif-2.1.0-rtm.6";

pub const SARIF_VERSION: &str = "2.1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifLog {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    #[serde(default)]
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SarifRegion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifArtifactLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

/// How reported paths become artifact URIs
#[derive(Debug, Clone, Copy)]
pub enum UriMode<'a> {
    /// Keep the reported path, minus a leading `./`
    AsReported,
    /// Resolve against the analysis root, relative to `cwd`
    Rooted { analysis_root: &'a str, cwd: &'a Path },
}

impl UriMode<'_> {
    fn uri(&self, path: &str) -> String {
        match self {
            UriMode::AsReported => strip_dot_prefix(path),
            UriMode::Rooted { analysis_root, cwd } => normalize_path_from(path, analysis_root, cwd),
        }
    }
}

fn to_result(diag: Diagnostic, rule_index: Option<usize>, mode: &UriMode<'_>) -> SarifResult {
    let region = diag.has_region().then_some(SarifRegion {
        start_line: diag.line,
        start_column: diag.col,
        end_line: diag.eline,
        end_column: diag.ecol,
    });

    SarifResult {
        message: SarifMessage { text: diag.msg },
        locations: vec![SarifLocation {
            physical_location: SarifPhysicalLocation {
                artifact_location: SarifArtifactLocation {
                    uri: diag.path.as_deref().map(|p| mode.uri(p)),
                },
                region,
            },
        }],
        level: diag.level,
        rule_id: diag.id.or(diag.sym),
        rule_index,
    }
}

/// Build a single-run SARIF log from a diagnostic stream.
pub fn assemble<I>(diagnostics: I, tool_name: &str, mode: UriMode<'_>) -> SarifLog
where
    I: IntoIterator<Item = Diagnostic>,
{
    let mut rule_indices: HashMap<String, usize> = HashMap::new();
    let mut rules: Vec<SarifRule> = Vec::new();
    let mut results: Vec<SarifResult> = Vec::new();

    for diag in diagnostics {
        if let (Some(id), Some(sym)) = (&diag.id, &diag.sym) {
            if !rule_indices.contains_key(id) {
                rule_indices.insert(id.clone(), rules.len());
                rules.push(SarifRule {
                    id: id.clone(),
                    name: sym.clone(),
                });
            }
        }
        let rule_index = diag.id.as_ref().and_then(|id| rule_indices.get(id).copied());
        results.push(to_result(diag, rule_index, &mode));
    }

    tracing::debug!(
        "Assembled SARIF log for {}: {} results, {} rules",
        tool_name,
        results.len(),
        rules.len()
    );

    SarifLog {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: tool_name.to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}
