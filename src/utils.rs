// src/utils.rs

use anyhow::{Context, Result};
use url::Url;

/// Reads an environment variable, returning an empty string when unset.
pub fn get_env(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}

/// Reads an environment variable that the job cannot run without.
pub fn require_env(key: &str) -> Result<String> {
    let value = get_env(key);
    if value.trim().is_empty() {
        anyhow::bail!("{key} environment variable not set");
    }
    Ok(value)
}

/// Resolves a base URL from the environment, falling back to the built-in default.
pub fn resolve_url(env_key: &str, default: &str) -> Result<Url> {
    let raw = match get_env(env_key) {
        v if v.trim().is_empty() => default.to_string(),
        v => v,
    };
    Url::parse(raw.trim()).with_context(|| format!("Invalid URL for {env_key}: {raw}"))
}

/// Builds a horizontal rule of `=` characters.
pub fn rule(width: usize) -> String {
    "=".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_url_falls_back_to_default() {
        let url = resolve_url("TRAFFIC_COLLECTOR_TEST_UNSET_URL", "https://example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api");
    }

    #[test]
    fn require_env_rejects_missing_key() {
        let err = require_env("TRAFFIC_COLLECTOR_TEST_UNSET_KEY").unwrap_err();
        assert!(err.to_string().contains("TRAFFIC_COLLECTOR_TEST_UNSET_KEY"));
    }
}
