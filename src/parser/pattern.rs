use super::{Diagnostic, Level};
use crate::error::ParserError;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// mypy: `path:line:col:eline:ecol: level: message  [code]`, every position optional
pub const MYPY: &str = r"^(?P<path>[^:\n]+):(?:(?P<line>\d+):)?(?:(?P<col>\d+):)?(?:(?P<eline>\d+):)?(?:(?P<ecol>\d+):)? (?P<level>[^:\s]+): (?P<msg>.+?)[ \t]*(?:\[(?P<id>\S+)\])?$";

/// flake8 default format: `path:line:col: E123 message`
pub const FLAKE8: &str = r"^(?P<path>[^:\n]+):(?P<line>\d+):(?P<col>\d+): (?P<id>\w\d+) (?P<msg>.+)$";

/// markdownlint (mdl): `path:line MD001/rule-name message`
pub const MDL: &str = r"^(?P<path>[^:\n]+)(?::(?P<line>\d+))?(?::(?P<col>\d+))? (?P<id>[^/\s]+)/(?P<sym>\S+) (?P<msg>.+)$";

/// Line-oriented parser driven by a regex with named capture groups.
///
/// Recognized group names are `path`, `line`, `col`, `eline`, `ecol`,
/// `level`, `id`, `sym` and `msg`; any other group is ignored. The pattern is
/// compiled in multi-line mode so `^` and `$` anchor on line boundaries.
#[derive(Debug, Clone)]
pub struct PatternParser {
    regex: Regex,
    level_map: Option<HashMap<String, Level>>,
}

impl PatternParser {
    pub fn new(
        pattern: &str,
        level_map: Option<HashMap<String, Level>>,
    ) -> Result<Self, ParserError> {
        let regex = Regex::new(&format!("(?m){}", pattern)).map_err(|e| {
            ParserError::InvalidPattern {
                pattern: pattern.to_string(),
                source: e,
            }
        })?;
        Ok(Self { regex, level_map })
    }

    /// Lazily yield one diagnostic per match, in input order
    pub fn parse<'a>(&'a self, input: &'a str) -> impl Iterator<Item = Diagnostic> + 'a {
        self.regex
            .captures_iter(input)
            .map(move |caps| self.to_diagnostic(&caps))
    }

    fn to_diagnostic(&self, caps: &Captures<'_>) -> Diagnostic {
        let text = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
        let number = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());

        let level = caps.name("level").and_then(|m| match &self.level_map {
            Some(map) => map.get(m.as_str()).copied(),
            None => Level::parse(m.as_str()),
        });

        Diagnostic {
            id: text("id"),
            sym: text("sym"),
            msg: text("msg"),
            level,
            path: text("path"),
            line: number("line"),
            col: number("col"),
            eline: number("eline"),
            ecol: number("ecol"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flake8_line() {
        let parser = PatternParser::new(FLAKE8, None).unwrap();
        let diags: Vec<_> = parser.parse("a.py:10:2: E001 bad indent").collect();
        assert_eq!(
            diags,
            vec![Diagnostic {
                id: Some("E001".to_string()),
                msg: Some("bad indent".to_string()),
                path: Some("a.py".to_string()),
                line: Some(10),
                col: Some(2),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn test_mypy_with_code_and_range() {
        let input = "src/m.py:3:5:3:9: error: Incompatible types  [assignment]\n\
                     src/m.py:7: note: See https://example.com\n\
                     Found 1 error in 1 file (checked 1 source file)\n";
        let parser = PatternParser::new(MYPY, None).unwrap();
        let diags: Vec<_> = parser.parse(input).collect();
        assert_eq!(diags.len(), 2);

        assert_eq!(diags[0].path.as_deref(), Some("src/m.py"));
        assert_eq!(diags[0].line, Some(3));
        assert_eq!(diags[0].col, Some(5));
        assert_eq!(diags[0].eline, Some(3));
        assert_eq!(diags[0].ecol, Some(9));
        assert_eq!(diags[0].level, Some(Level::Error));
        assert_eq!(diags[0].msg.as_deref(), Some("Incompatible types"));
        assert_eq!(diags[0].id.as_deref(), Some("assignment"));

        assert_eq!(diags[1].line, Some(7));
        assert_eq!(diags[1].col, None);
        assert_eq!(diags[1].level, Some(Level::Note));
        assert_eq!(diags[1].msg.as_deref(), Some("See https://example.com"));
        assert_eq!(diags[1].id, None);
    }

    #[test]
    fn test_mdl_rule_and_symbol() {
        let parser = PatternParser::new(MDL, None).unwrap();
        let diags: Vec<_> = parser
            .parse("README.md:1 MD041/first-line-heading First line should be a heading\n")
            .collect();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].id.as_deref(), Some("MD041"));
        assert_eq!(diags[0].sym.as_deref(), Some("first-line-heading"));
        assert_eq!(diags[0].line, Some(1));
        assert_eq!(diags[0].level, None);
    }

    #[test]
    fn test_custom_level_map() {
        let map = HashMap::from([
            ("err".to_string(), Level::Error),
            ("warn".to_string(), Level::Warning),
        ]);
        let parser = PatternParser::new(
            r"^(?<path>[^-\n]+)-(?<line>\d+) (?<level>\w+):(?<id>\w+) (?<msg>.+)$",
            Some(map),
        )
        .unwrap();
        let diags: Vec<_> = parser
            .parse("a.c-4 err:X1 broken\nb.c-5 warn:X2 odd\nc.c-6 info:X3 fyi\n")
            .collect();
        assert_eq!(diags.len(), 3);
        assert_eq!(diags[0].level, Some(Level::Error));
        assert_eq!(diags[1].level, Some(Level::Warning));
        // unmapped vocabulary is unknown, not an error
        assert_eq!(diags[2].level, None);
    }

    #[test]
    fn test_garbage_matches_nothing() {
        let parser = PatternParser::new(FLAKE8, None).unwrap();
        assert_eq!(parser.parse("nothing to see\n\n:::\n").count(), 0);
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        let err = PatternParser::new("(?P<path>", None).unwrap_err();
        assert!(matches!(err, ParserError::InvalidPattern { .. }));
    }

    #[test]
    fn test_parse_is_lazy() {
        let parser = PatternParser::new(FLAKE8, None).unwrap();
        let input = "a.py:1:1: E1 one\na.py:2:1: E2 two\n";
        let mut iter = parser.parse(input);
        assert_eq!(iter.next().and_then(|d| d.line), Some(1));
        assert_eq!(iter.next().and_then(|d| d.line), Some(2));
        assert!(iter.next().is_none());
    }
}
