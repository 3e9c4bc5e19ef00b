use std::path::PathBuf;
use std::time::Duration;

pub const API_URL_VAR: &str = "DOCAI_API_URL";
pub const TIMEOUT_VAR: &str = "DOCAI_TIMEOUT_SECS";
pub const OUTPUT_DIR_VAR: &str = "DOCAI_OUTPUT_DIR";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    /// `None` waits on the endpoint indefinitely.
    pub timeout: Option<Duration>,
    pub output_dir: PathBuf,
    /// Whether the API URL was set explicitly rather than defaulted.
    pub api_url_configured: bool,
}

fn load_env() {
    let _ = dotenvy::dotenv();
}

impl Config {
    /// `.env` first, then the process environment.
    pub fn from_env() -> Result<Self, String> {
        load_env();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit_url = lookup(API_URL_VAR)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let api_url_configured = explicit_url.is_some();
        let api_url = explicit_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match lookup(TIMEOUT_VAR).map(|t| t.trim().to_string()) {
            Some(t) if !t.is_empty() => t
                .parse::<u64>()
                .map_err(|_| format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_VAR, t))?,
            _ => DEFAULT_TIMEOUT_SECS,
        };

        let output_dir = lookup(OUTPUT_DIR_VAR)
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_output_dir);

        Ok(Self {
            api_url,
            timeout: timeout_from_secs(timeout_secs),
            output_dir,
            api_url_configured,
        })
    }

    pub fn status(&self) -> &'static str {
        if self.api_url_configured {
            "configured"
        } else {
            "not_configured"
        }
    }
}

pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Downloads, then Desktop, then the working directory.
pub fn default_output_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::desktop_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)));
        assert_eq!(config.status(), "not_configured");
    }

    #[test]
    fn reads_explicit_values() {
        let config = Config::from_lookup(lookup(&[
            (API_URL_VAR, " https://extract.example.com "),
            (TIMEOUT_VAR, "0"),
            (OUTPUT_DIR_VAR, "/tmp/exports"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://extract.example.com");
        assert_eq!(config.timeout, None);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.status(), "configured");
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = Config::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(err.contains(TIMEOUT_VAR));
    }
}
