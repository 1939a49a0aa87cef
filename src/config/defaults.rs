pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub const DEFAULT_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

pub const DEFAULT_GITHUB_OAUTH_BASE: &str = "https://github.com";

pub fn default_request_timeout() -> u64 {
    30
}

pub fn default_run_timeout() -> u64 {
    120
}

pub fn default_max_round_trips() -> usize {
    8
}

pub fn default_bind() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    3000
}

pub fn default_session_ttl_minutes() -> i64 {
    24 * 60
}

pub fn default_require_login() -> bool {
    false
}
