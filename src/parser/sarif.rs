use super::{Diagnostic, Level};
use crate::error::ParserError;
use serde_json::Value;

const LOCATION: &str = "/locations/0/physicalLocation";

static NULL: Value = Value::Null;

fn str_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer)?.as_str().map(str::to_string)
}

fn u32_at(value: &Value, pointer: &str) -> Option<u32> {
    u32::try_from(value.pointer(pointer)?.as_u64()?).ok()
}

/// Resolve `ruleIndex` against the run's rule catalog. Out-of-range or
/// missing entries are unknown rather than an error.
fn rule_name(result: &Value, rules: &Value) -> Option<String> {
    let index = usize::try_from(result.get("ruleIndex")?.as_u64()?).ok()?;
    str_at(rules.get(index)?, "/name")
}

fn to_diagnostic(result: &Value, rules: &Value) -> Diagnostic {
    let location = result.pointer(LOCATION).unwrap_or(&NULL);
    Diagnostic {
        id: str_at(result, "/ruleId"),
        sym: rule_name(result, rules),
        msg: str_at(result, "/message/text"),
        level: result.get("level").and_then(Value::as_str).and_then(Level::parse),
        path: str_at(location, "/artifactLocation/uri"),
        line: u32_at(location, "/region/startLine"),
        col: u32_at(location, "/region/startColumn"),
        eline: u32_at(location, "/region/endLine"),
        ecol: u32_at(location, "/region/endColumn"),
    }
}

fn run_diagnostics(mut run: Value) -> impl Iterator<Item = Diagnostic> {
    let results = match run.get_mut("results").map(Value::take) {
        Some(Value::Array(results)) => results,
        _ => Vec::new(),
    };
    let rules = run
        .pointer_mut("/tool/driver/rules")
        .map(Value::take)
        .unwrap_or(Value::Null);
    results
        .into_iter()
        .map(move |result| to_diagnostic(&result, &rules))
}

/// Read a SARIF log back into diagnostics, one per result across all runs
pub fn parse(input: &str) -> Result<impl Iterator<Item = Diagnostic>, ParserError> {
    let mut log: Value = serde_json::from_str(input)?;
    let runs = match log.get_mut("runs").map(Value::take) {
        Some(Value::Array(runs)) => runs,
        _ => Vec::new(),
    };
    Ok(runs.into_iter().flat_map(run_diagnostics))
}
