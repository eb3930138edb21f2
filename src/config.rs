use crate::error::{Result, ScraperError};
use std::env;

/// Environment files tried in order; later files never override earlier ones.
pub const ENV_FILES: [&str; 2] = [".env.local", ".env"];

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "VITE_SUPABASE_URL"];
const KEY_VARS: [&str; 2] = ["SUPABASE_SERVICE_ROLE_KEY", "VITE_SUPABASE_ANON_KEY"];

/// Credentials for the remote REST backend.
#[derive(Debug, Clone)]
pub struct Settings {
    pub supabase_url: String,
    pub supabase_key: String,
}

impl Settings {
    /// Load `.env.local` / `.env` (if present) and read the credentials.
    pub fn load() -> Result<Self> {
        for file in ENV_FILES {
            let _ = dotenv::from_filename(file);
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    ///
    /// The first non-blank variable of each group wins.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let supabase_url = first(&URL_VARS).ok_or_else(|| {
            ScraperError::Config(format!(
                "missing backend URL; set one of {}",
                URL_VARS.join(", ")
            ))
        })?;
        let supabase_key = first(&KEY_VARS).ok_or_else(|| {
            ScraperError::Config(format!(
                "missing backend credential; set one of {}",
                KEY_VARS.join(", ")
            ))
        })?;

        Ok(Self {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_primary_variables_win() {
        let settings = Settings::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://primary.supabase.co/"),
            ("VITE_SUPABASE_URL", "https://vite.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
            ("VITE_SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();
        assert_eq!(settings.supabase_url, "https://primary.supabase.co");
        assert_eq!(settings.supabase_key, "service");
    }

    #[test]
    fn test_falls_back_to_vite_variables() {
        let settings = Settings::from_lookup(lookup(&[
            ("VITE_SUPABASE_URL", "https://vite.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "  "),
            ("VITE_SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();
        assert_eq!(settings.supabase_url, "https://vite.supabase.co");
        assert_eq!(settings.supabase_key, "anon");
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let err = Settings::from_lookup(lookup(&[("SUPABASE_URL", "https://x.supabase.co")]))
            .unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
        assert!(err.to_string().contains("SUPABASE_SERVICE_ROLE_KEY"));
    }
}
