//! Runtime configuration for the admin client.

use std::path::PathBuf;

use careerlink_session::SessionConfig;

/// Environment variable holding the identity API base URL.
pub const API_URL_ENV: &str = "CAREERLINK_API_URL";

/// Environment variable overriding where the token is persisted.
pub const STORAGE_ENV: &str = "CAREERLINK_STORAGE";

/// Base URL used when neither the runtime nor the build environment sets
/// one.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Where the admin client talks to and where it keeps its token.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the identity API, without a trailing slash.
    pub api_base_url: String,

    /// Path of the JSON file the bearer token is persisted in.
    pub storage_path: PathBuf,

    pub session: SessionConfig,
}

impl AdminConfig {
    /// Reads the configuration from the process environment.
    ///
    /// `CAREERLINK_API_URL` is looked up at runtime first, then at build
    /// time, then falls back to [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = non_empty(lookup(API_URL_ENV))
            .or_else(|| non_empty(option_env!("CAREERLINK_API_URL").map(String::from)))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let storage_path = non_empty(lookup(STORAGE_ENV))
            .map(PathBuf::from)
            .unwrap_or_else(default_storage_path);

        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            storage_path,
            session: SessionConfig::default(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// `{data_dir}/careerlink-admin/storage.json`, or `./storage.json` on
/// platforms without a data directory.
pub fn default_storage_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("careerlink-admin").join("storage.json"),
        None => PathBuf::from("storage.json"),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
