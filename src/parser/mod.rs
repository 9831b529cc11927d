mod diagnostic;
pub mod pattern;
mod pylint;
mod sarif;

pub use diagnostic::{Diagnostic, Level};
pub use pattern::PatternParser;

use crate::error::ParserError;
use std::collections::HashMap;

/// Single-pass stream of diagnostics borrowed from the parser and its input
pub type Diagnostics<'a> = Box<dyn Iterator<Item = Diagnostic> + 'a>;

/// A configured input format.
///
/// Pattern parsers stream matches as they are pulled. The JSON-backed
/// formats decode the whole document before yielding, so malformed input is
/// reported by `parse` itself rather than mid-stream.
#[derive(Debug, Clone)]
pub enum Parser {
    Pattern(PatternParser),
    Pylint,
    Sarif,
}

impl Parser {
    pub fn parse<'a>(&'a self, input: &'a str) -> Result<Diagnostics<'a>, ParserError> {
        match self {
            Parser::Pattern(p) => Ok(Box::new(p.parse(input))),
            Parser::Pylint => Ok(Box::new(pylint::parse(input)?)),
            Parser::Sarif => Ok(Box::new(sarif::parse(input)?)),
        }
    }
}

type Builder = fn() -> Result<Parser, ParserError>;

fn flake8() -> Result<Parser, ParserError> {
    PatternParser::new(pattern::FLAKE8, None).map(Parser::Pattern)
}

fn mdl() -> Result<Parser, ParserError> {
    PatternParser::new(pattern::MDL, None).map(Parser::Pattern)
}

fn mypy() -> Result<Parser, ParserError> {
    PatternParser::new(pattern::MYPY, None).map(Parser::Pattern)
}

fn pylint() -> Result<Parser, ParserError> {
    Ok(Parser::Pylint)
}

fn sarif() -> Result<Parser, ParserError> {
    Ok(Parser::Sarif)
}

/// Built-in formats, sorted by name. Adding a format is adding a row.
const KNOWN_PARSERS: &[(&str, Builder)] = &[
    ("flake8", flake8),
    ("mdl", mdl),
    ("mypy", mypy),
    ("pylint", pylint),
    ("sarif", sarif),
];

/// Names of all built-in formats
pub fn known_formats() -> impl Iterator<Item = &'static str> {
    KNOWN_PARSERS.iter().map(|(name, _)| *name)
}

/// Look up a built-in format by name
pub fn known_parser(name: &str) -> Result<Parser, ParserError> {
    let (_, build) = KNOWN_PARSERS
        .iter()
        .find(|(known, _)| *known == name)
        .ok_or_else(|| ParserError::UnknownFormat(name.to_string()))?;
    build()
}

/// Build an ad hoc parser from a caller-supplied pattern and level table
pub fn regex_parser(
    pattern: &str,
    level_map: Option<HashMap<String, Level>>,
) -> Result<Parser, ParserError> {
    PatternParser::new(pattern, level_map).map(Parser::Pattern)
}

/// Decode a level map given as a JSON object, e.g. `{"err": "error"}`
pub fn parse_level_map(json: &str) -> Result<HashMap<String, Level>, ParserError> {
    serde_json::from_str(json).map_err(|e| ParserError::InvalidLevelMap(e.to_string()))
}
