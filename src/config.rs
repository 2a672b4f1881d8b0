use std::env;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Base URL of the upstream media server (no trailing slash)
    pub upstream_url: String,
    /// API token attached to every outbound upstream request
    /// (`X-MediaBrowser-Token` header). Treated as an opaque secret.
    pub api_token: String,
    pub is_dev: bool,
    /// Whether responses carry permissive CORS headers
    pub cors_enabled: bool,
    /// Upstream TCP connect timeout in seconds (default: 10)
    pub connect_timeout_secs: u64,
    /// Upstream read timeout in seconds (default: 30).
    ///
    /// Applied as an idle-read timeout, not a total-request timeout —
    /// a total timeout would abort long-running stream transfers.
    pub read_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    /// In DEV mode, provides sensible defaults. In PROD mode, all vars are required.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Check if running in dev mode
        let is_dev = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        // Port: required in prod, defaults to 3000 in dev
        let port = if is_dev {
            env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?
        } else {
            env::var("PORT")
                .map_err(|_| "PORT is required in production")?
                .parse()?
        };

        // Upstream URL: required in prod, defaults to a local Jellyfin in dev.
        // Trailing slash is trimmed so URL construction stays predictable.
        let upstream_url = if is_dev {
            env::var("UPSTREAM_URL").unwrap_or_else(|_| "http://localhost:8096".to_string())
        } else {
            env::var("UPSTREAM_URL").map_err(|_| "UPSTREAM_URL is required in production")?
        }
        .trim_end_matches('/')
        .to_string();

        // Fail fast on a garbage upstream URL instead of erroring per request
        url::Url::parse(&upstream_url)
            .map_err(|_| format!("UPSTREAM_URL is not a valid absolute URL: {upstream_url}"))?;

        // API token: required in prod, placeholder in dev
        let api_token = if is_dev {
            env::var("UPSTREAM_TOKEN").unwrap_or_else(|_| "dev-token".to_string())
        } else {
            env::var("UPSTREAM_TOKEN").map_err(|_| "UPSTREAM_TOKEN is required in production")?
        };

        let cors_enabled = env::var("CORS")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        let connect_timeout_secs: u64 = env::var("UPSTREAM_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let read_timeout_secs: u64 = env::var("UPSTREAM_READ_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Config {
            port,
            upstream_url,
            api_token,
            is_dev,
            cors_enabled,
            connect_timeout_secs,
            read_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serialize all env-var tests to prevent races between parallel test threads.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Set env vars, run `f`, then restore original state.
    ///
    /// `set` — vars to set; `unset` — vars to remove before running `f`.
    fn with_env(set: &[(&str, &str)], unset: &[&str], f: impl FnOnce()) {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());

        // Save state for all touched vars
        let save_set: Vec<(&str, Option<String>)> = set
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();
        let save_unset: Vec<(&str, Option<String>)> =
            unset.iter().map(|k| (*k, std::env::var(k).ok())).collect();

        for (k, v) in set {
            // SAFETY: serialized by ENV_LOCK — no other thread modifies env vars concurrently.
            unsafe { std::env::set_var(k, v) };
        }
        for k in unset {
            unsafe { std::env::remove_var(k) };
        }

        f();

        // Restore
        for (k, old) in save_set.into_iter().chain(save_unset) {
            match old {
                Some(v) => unsafe { std::env::set_var(k, v) },
                None => unsafe { std::env::remove_var(k) },
            }
        }
    }

    #[test]
    fn dev_mode_uses_defaults() {
        with_env(
            &[("DEV_MODE", "true")],
            &[
                "PORT",
                "UPSTREAM_URL",
                "UPSTREAM_TOKEN",
                "CORS",
                "UPSTREAM_CONNECT_TIMEOUT_SECS",
                "UPSTREAM_READ_TIMEOUT_SECS",
            ],
            || {
                let config = Config::from_env().expect("should succeed in dev mode");
                assert!(config.is_dev);
                assert_eq!(config.port, 3000);
                assert_eq!(config.upstream_url, "http://localhost:8096");
                assert_eq!(config.api_token, "dev-token");
                assert!(!config.cors_enabled);
                assert_eq!(config.connect_timeout_secs, 10);
                assert_eq!(config.read_timeout_secs, 30);
            },
        );
    }

    #[test]
    fn prod_mode_requires_port() {
        with_env(
            &[],
            &["DEV_MODE", "PORT", "UPSTREAM_URL", "UPSTREAM_TOKEN"],
            || {
                let result = Config::from_env();
                assert!(result.is_err(), "Should fail without PORT in prod mode");
            },
        );
    }

    #[test]
    fn prod_mode_requires_upstream_url() {
        with_env(
            &[("PORT", "8080")],
            &["DEV_MODE", "UPSTREAM_URL", "UPSTREAM_TOKEN"],
            || {
                let result = Config::from_env();
                assert!(
                    result.is_err(),
                    "Should fail without UPSTREAM_URL in prod mode"
                );
            },
        );
    }

    #[test]
    fn prod_mode_requires_token() {
        with_env(
            &[("PORT", "8080"), ("UPSTREAM_URL", "https://media.example.com")],
            &["DEV_MODE", "UPSTREAM_TOKEN"],
            || {
                let result = Config::from_env();
                assert!(
                    result.is_err(),
                    "Should fail without UPSTREAM_TOKEN in prod mode"
                );
            },
        );
    }

    #[test]
    fn invalid_upstream_url_rejected() {
        with_env(
            &[("DEV_MODE", "true"), ("UPSTREAM_URL", "not a url")],
            &[],
            || {
                let result = Config::from_env();
                assert!(result.is_err(), "Should reject a non-URL UPSTREAM_URL");
            },
        );
    }

    #[test]
    fn upstream_url_trailing_slash_trimmed() {
        with_env(
            &[
                ("DEV_MODE", "true"),
                ("UPSTREAM_URL", "https://media.example.com/"),
            ],
            &[],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.upstream_url, "https://media.example.com");
            },
        );
    }

    #[test]
    fn cors_enabled_from_env() {
        with_env(&[("DEV_MODE", "true"), ("CORS", "true")], &[], || {
            let config = Config::from_env().unwrap();
            assert!(config.cors_enabled);
        });
    }

    #[test]
    fn timeouts_parsed() {
        with_env(
            &[
                ("DEV_MODE", "true"),
                ("UPSTREAM_CONNECT_TIMEOUT_SECS", "5"),
                ("UPSTREAM_READ_TIMEOUT_SECS", "60"),
            ],
            &[],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.connect_timeout_secs, 5);
                assert_eq!(config.read_timeout_secs, 60);
            },
        );
    }
}
