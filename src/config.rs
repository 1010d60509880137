//! Frontend configuration

use gloo_storage::{LocalStorage, Storage};

/// Backend address used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Local storage key that overrides the API base at runtime.
const STORAGE_KEY_API_BASE: &str = "lexly_api_base";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL without a trailing slash
    pub api_base: String,
}

impl Config {
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: normalize_base(api_base),
        }
    }

    /// Base URL baked in at build time through `LEXLY_API_BASE`.
    pub fn from_build_env() -> Self {
        Self::new(option_env!("LEXLY_API_BASE").unwrap_or(DEFAULT_API_BASE))
    }

    /// Build-time config, overridden by a `lexly_api_base` local storage entry.
    pub fn load() -> Self {
        let config = Self::from_build_env();
        match LocalStorage::get::<String>(STORAGE_KEY_API_BASE) {
            Ok(base) if !base.trim().is_empty() => {
                tracing::info!(api_base = %base, "using API base from local storage");
                Self::new(&base)
            }
            _ => config,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

fn normalize_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE.to_string()
    } else {
        trimmed.to_string()
    }
}
