use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub const DEFAULT_PORT: u16 = 3002;
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub port: u16,
    /// Trimmed; an empty value counts as unset.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    /// Built front end to serve for non-API paths.
    pub static_dir: Option<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| anyhow!("invalid PORT {:?}: {}", raw, e))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base: non_empty("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            static_dir: non_empty("STATIC_DIR").map(PathBuf::from),
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            static_dir: None,
        }
    }
}
