use std::collections::HashMap;

use anyhow::Context;
use url::Url;

#[derive(Debug)]
pub struct Settings {
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".into(),
        }
    }
}

/// Defaults, overridden by `roster.toml` in the working directory,
/// overridden by `ROSTER_API_URL`.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = std::fs::read_to_string("roster.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_url") {
                settings.api_url = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("ROSTER_API_URL") {
        settings.api_url = v;
    }

    settings
}

/// Validates the configured URL and drops any trailing slash so joined
/// request paths never double up.
pub fn normalize_api_url(raw: &str) -> anyhow::Result<String> {
    let parsed = Url::parse(raw).with_context(|| format!("invalid API url: {raw}"))?;
    anyhow::ensure!(
        matches!(parsed.scheme(), "http" | "https"),
        "API url must be http(s), got {}",
        parsed.scheme()
    );
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        assert_eq!(
            normalize_api_url("http://localhost:3000/").unwrap(),
            "http://localhost:3000"
        );
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        assert!(normalize_api_url("ftp://localhost:3000").is_err());
        assert!(normalize_api_url("not a url").is_err());
    }

    #[test]
    fn default_points_at_local_store() {
        assert_eq!(Settings::default().api_url, "http://localhost:3000");
    }

    // Mutates process env; keep this the only test touching ROSTER_API_URL.
    #[test]
    fn env_var_overrides_file_and_default() {
        std::env::set_var("ROSTER_API_URL", "http://store.example:4000");
        let settings = load_settings();
        std::env::remove_var("ROSTER_API_URL");
        assert_eq!(settings.api_url, "http://store.example:4000");
    }
}
