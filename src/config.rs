//! Configuration for the inference service endpoint

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use log::{debug, info};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ENDPOINT: &str = "/api/process";

pub const ENV_BASE_URL: &str = "TASKDECK_BASE_URL";
pub const ENV_ENDPOINT: &str = "TASKDECK_ENDPOINT";

/// Inference service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig
{   /// Service base URL, without trailing slash
    pub base_url: String
  , /// Path the request payload is posted to
    pub endpoint: String
  , /// Request timeout in seconds; none when absent
    pub timeout_secs: Option<u64>
}

impl Default for ServiceConfig
{   fn default() -> Self
    {   ServiceConfig
        {   base_url: DEFAULT_BASE_URL.to_string()
          , endpoint: DEFAULT_ENDPOINT.to_string()
          , timeout_secs: None
        }
    }
}

impl ServiceConfig
{   /// Full URL for the inference endpoint
    pub fn endpoint_url(&self) -> String
    {   join_url(&self.base_url, &self.endpoint)
    }

    /// Full URL for an arbitrary service path
    pub fn url_for(&self, path: &str) -> String
    {   join_url(&self.base_url, path)
    }

    fn validate(&self) -> Result<(), crate::error::Error>
    {   if !(self.base_url.starts_with("http://")
          || self.base_url.starts_with("https://"))
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!("base_url must be http(s): {}", self.base_url)
            ));
        }
        if self.timeout_secs == Some(0)
        {   return Err(crate::error::Error::InvalidConfiguration(
              "timeout_secs must be positive".to_string()
            ));
        }
        Ok(())
    }
}

/// taskdeck configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskdeckConfig
{   /// Inference service configuration
    pub service: ServiceConfig
}

impl TaskdeckConfig
{   /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let config_str = fs::read_to_string(path)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(
              format!("{}: {}", path.display(), e)
            )
          })?;
        Self::from_json(&config_str)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str)
      -> Result<Self, crate::error::Error>
    {   let config: TaskdeckConfig = serde_json::from_str(json)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;
        config.service.validate()?;
        Ok(config)
    }

    /// Apply `TASKDECK_*` environment overrides
    pub fn with_env_overrides(self) -> Result<Self, crate::error::Error>
    {   self.with_overrides(
          std::env::var(ENV_BASE_URL).ok()
        , std::env::var(ENV_ENDPOINT).ok()
        )
    }

    /// Apply explicit overrides, e.g. from the command line
    pub fn with_overrides(
      mut self
    , base_url: Option<String>
    , endpoint: Option<String>
    ) -> Result<Self, crate::error::Error>
    {   if let Some(base_url) = base_url
        {   info!("Overriding base_url: {}", base_url);
            self.service.base_url = base_url;
        }
        if let Some(endpoint) = endpoint
        {   info!("Overriding endpoint: {}", endpoint);
            self.service.endpoint = endpoint;
        }
        self.service.validate()?;
        Ok(self)
    }
}

fn join_url(base: &str, path: &str) -> String
{   format!(
      "{}/{}",
      base.trim_end_matches('/'),
      path.trim_start_matches('/')
    )
}
