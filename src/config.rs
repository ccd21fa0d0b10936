use std::path::PathBuf;

use crate::extractor::DEFAULT_USER_AGENT;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
const DEFAULT_STATIC_DIR: &str = "public";

/// Server settings, read once from the environment at start-up.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    pub static_dir: PathBuf,
    pub user_agent: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let static_dir = lookup("STATIC_DIR")
            .as_deref()
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let user_agent = lookup("UPSTREAM_USER_AGENT")
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(DEFAULT_USER_AGENT)
            .to_string();

        Self {
            bind_addr: resolve_bind_addr(&lookup),
            allowed_origins,
            static_dir,
            user_agent,
        }
    }
}

fn resolve_bind_addr(lookup: &impl Fn(&str) -> Option<String>) -> String {
    if let Some(configured) = lookup("APP_ADDR")
        .as_deref()
        .and_then(non_empty)
        .map(ToString::to_string)
    {
        return configured;
    }

    if let Some(port) = lookup("PORT").and_then(|value| value.trim().parse::<u16>().ok()) {
        return format!("0.0.0.0:{port}");
    }

    DEFAULT_BIND_ADDR.to_string()
}

pub(crate) fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]);
        assert_eq!(config.bind_addr, "127.0.0.1:8787");
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn app_addr_wins_over_port() {
        let config = config(&[("APP_ADDR", "0.0.0.0:9000"), ("PORT", "3000")]);
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
    }

    #[test]
    fn port_binds_all_interfaces() {
        assert_eq!(config(&[("PORT", " 3000 ")]).bind_addr, "0.0.0.0:3000");
        assert_eq!(config(&[("PORT", "nope")]).bind_addr, "127.0.0.1:8787");
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = config(&[("ALLOWED_ORIGINS", " https://a.test, ,https://b.test ")]);
        assert_eq!(config.allowed_origins, vec!["https://a.test", "https://b.test"]);
    }

    #[test]
    fn blank_values_fall_back() {
        let config = config(&[("STATIC_DIR", "  "), ("UPSTREAM_USER_AGENT", "")]);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
