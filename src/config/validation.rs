use crate::error::{ReadmeError, Result};
use regex::Regex;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

fn env_ref_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").ok())
        .as_ref()
}

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unset variables are left as written.
pub fn expand_env_var_in_string(value: &str) -> String {
    let Some(re) = env_ref_pattern() else {
        return value.to_string();
    };

    let mut result = value.to_string();
    for cap in re.captures_iter(value) {
        let var_name = &cap[1];
        let replacement = env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name));
        result = result.replace(&cap[0], &replacement);
    }

    result
}

pub fn expand_optional(value: Option<&String>) -> Option<String> {
    value
        .map(|v| expand_env_var_in_string(v))
        .filter(|v| !v.trim().is_empty())
}

pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

/// First non-empty value among the given environment variables.
pub fn env_first(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// Numeric env setting. Present but unparseable is an error, never a
/// silent fallback.
pub fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env_first(&[name]) {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            ReadmeError::ConfigError(format!("Invalid {} value: {}", name, raw))
        }),
        None => Ok(None),
    }
}
