pub const DEFAULT_CONFIG_FILE: &str = "lintbridge.yaml";

pub fn default_tool_name() -> String {
    "lintbridge".to_string()
}

pub fn default_analysis_path() -> String {
    ".".to_string()
}

pub fn default_timeout_sec() -> u64 {
    60
}

pub fn default_gh_binary() -> String {
    "gh".to_string()
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_backoff_base_ms() -> u64 {
    1000
}
