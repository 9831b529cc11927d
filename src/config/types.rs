use crate::parser::Level;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    /// Tool name recorded in SARIF output and in the comment marker
    #[serde(default = "default_tool_name")]
    pub tool_name: String,

    /// Built-in input format (see `lintbridge formats`)
    #[serde(default)]
    pub format: Option<String>,

    /// Custom regex with named groups, used instead of `format`
    #[serde(default)]
    pub pattern: Option<String>,

    /// Maps captured level words to levels (custom patterns only)
    #[serde(default)]
    pub level_map: HashMap<String, Level>,

    /// Directory the linter ran in, relative to the repository root
    #[serde(default = "default_analysis_path")]
    pub analysis_path: String,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GithubConfig {
    /// owner/repo; falls back to `--repo` or `GITHUB_REPOSITORY`
    #[serde(default)]
    pub repo: Option<String>,

    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,

    #[serde(default = "default_gh_binary")]
    pub gh_binary: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo: None,
            timeout_sec: default_timeout_sec(),
            gh_binary: default_gh_binary(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

/// Where diagnostics come from: a built-in format or a custom pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource<'a> {
    Format(&'a str),
    Pattern(&'a str),
}
