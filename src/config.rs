use std::{env, fmt, path::PathBuf};

use anyhow::Result;

use crate::{transport::http::DEFAULT_API_URL, utils::dir::create_application_default_path};

pub const API_KEY_ENV: &str = "CODEPULSE_API_KEY";
pub const API_URL_ENV: &str = "CODEPULSE_API_URL";

/// Account credential for the tracking service. Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Rejects blank keys so that an empty setting behaves like no setting.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(..)")
    }
}

/// Effective agent configuration after flags and environment are merged.
#[derive(Debug)]
pub struct AgentConfig {
    /// Absent key means the agent observes activity but never emits.
    pub api_key: Option<ApiKey>,
    pub api_url: String,
    /// Application directory holding logs.
    pub dir: PathBuf,
}

impl AgentConfig {
    /// Builds the configuration from explicit flag values, falling back to
    /// `CODEPULSE_API_KEY` / `CODEPULSE_API_URL` and the platform state
    /// directory.
    pub fn resolve(
        api_key: Option<String>,
        api_url: Option<String>,
        dir: Option<PathBuf>,
    ) -> Result<Self> {
        let api_key = api_key
            .or_else(|| env::var(API_KEY_ENV).ok())
            .and_then(ApiKey::new);
        let api_url = api_url
            .or_else(|| env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let dir = dir.map_or_else(create_application_default_path, Ok)?;
        Ok(Self { api_key, api_url, dir })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn blank_keys_are_rejected() {
        assert_eq!(ApiKey::new(""), None);
        assert_eq!(ApiKey::new("   "), None);
        assert!(ApiKey::new("f1f6dec1-7b45-419e-80ce-ed668844f6c4").is_some());
    }

    #[test]
    fn debug_output_hides_the_key() {
        let key = ApiKey::new("f1f6dec1-7b45-419e-80ce-ed668844f6c4").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(..)");
    }

    #[test]
    fn explicit_flags_take_priority() -> Result<()> {
        let dir = tempdir()?;
        let config = AgentConfig::resolve(
            Some("secret".into()),
            Some("http://localhost:8080/heartbeats".into()),
            Some(dir.path().to_path_buf()),
        )?;

        assert_eq!(config.api_key, ApiKey::new("secret"));
        assert_eq!(config.api_url, "http://localhost:8080/heartbeats");
        assert_eq!(config.dir, dir.path());
        Ok(())
    }

    #[test]
    fn blank_explicit_key_disables_emission() -> Result<()> {
        let dir = tempdir()?;
        let config = AgentConfig::resolve(Some("  ".into()), None, Some(dir.path().to_path_buf()))?;

        assert_eq!(config.api_key, None);
        Ok(())
    }
}
