use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::ConfigError;

static DATABASE_URL: &str = "DATABASE_URL";
static BIND_ADDRESS: &str = "BIND_ADDRESS";
static DOMAIN: &str = "DOMAIN";
static SECRETS_DIR: &str = "SECRETS_DIR";
static SECURE_COOKIES: &str = "SECURE_COOKIES";
static ALLOWED_EXTENSIONS: &str = "ALLOWED_EXTENSIONS";

pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub cookie: CookieSettings,
    pub secrets_dir: PathBuf,
    pub allowed_extensions: HashSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CookieSettings {
    pub domain: Option<String>,
    pub secure: bool,
}

impl Settings {
    pub fn from_env() -> Result<Settings, ConfigError> {
        Settings::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secure = match lookup(SECURE_COOKIES) {
            None => false,
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                name: SECURE_COOKIES,
                value: v,
            })?,
        };

        let allowed_extensions = match lookup(ALLOWED_EXTENSIONS) {
            None => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            Some(v) => {
                let set: HashSet<String> = v
                    .split(',')
                    .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect();
                if set.is_empty() {
                    return Err(ConfigError::Invalid {
                        name: ALLOWED_EXTENSIONS,
                        value: v,
                    });
                }
                set
            }
        };

        Ok(Settings {
            database_url: lookup(DATABASE_URL).unwrap_or_else(|| "main.db".to_string()),
            bind_address: lookup(BIND_ADDRESS).unwrap_or_else(|| "localhost:8080".to_string()),
            cookie: CookieSettings {
                domain: lookup(DOMAIN).filter(|d| !d.is_empty()),
                secure,
            },
            secrets_dir: lookup(SECRETS_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/run/secrets")),
            allowed_extensions,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, "main.db");
        assert_eq!(s.bind_address, "localhost:8080");
        assert_eq!(s.secrets_dir, PathBuf::from("/run/secrets"));
        assert!(s.cookie.domain.is_none());
        assert!(!s.cookie.secure);
        assert_eq!(s.allowed_extensions.len(), DEFAULT_EXTENSIONS.len());
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            ("DATABASE_URL", "/tmp/users.db"),
            ("DOMAIN", "pandas.example"),
            ("SECURE_COOKIES", "true"),
            ("ALLOWED_EXTENSIONS", " .PNG, webp ,,"),
        ])
        .unwrap();
        assert_eq!(s.database_url, "/tmp/users.db");
        assert_eq!(s.cookie.domain.as_deref(), Some("pandas.example"));
        assert!(s.cookie.secure);
        let mut exts: Vec<_> = s.allowed_extensions.into_iter().collect();
        exts.sort();
        assert_eq!(exts, vec!["png", "webp"]);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            settings(&[("SECURE_COOKIES", "maybe")]),
            Err(ConfigError::Invalid { name: "SECURE_COOKIES", .. })
        ));
        assert!(matches!(
            settings(&[("ALLOWED_EXTENSIONS", " , ")]),
            Err(ConfigError::Invalid { name: "ALLOWED_EXTENSIONS", .. })
        ));
    }
}
