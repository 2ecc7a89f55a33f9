//! Inference service seam and its HTTP implementation

use async_trait::async_trait;
use std::time::Duration;
use log::{debug, trace, error};

use crate::config::ServiceConfig;
use crate::error::InferenceError;
use crate::request::RequestPayload;
use crate::response::{HealthStatus, ServiceInfo};

/// Something that can run an inference for a payload.
#[async_trait]
pub trait InferenceService: Send + Sync
{   async fn infer(&self, payload: RequestPayload)
      -> crate::InferenceReply;
}

/// reqwest-backed client for the inference HTTP API
pub struct HttpInferenceService
{   config: ServiceConfig
  , http_client: reqwest::Client
}

impl HttpInferenceService
{   pub fn new(config: ServiceConfig)
      -> Result<Self, crate::error::Error>
    {   debug!("Creating HttpInferenceService for {}", config.base_url);
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;
        Ok(HttpInferenceService
        {   config
          , http_client
        })
    }

    pub fn config(&self) -> &ServiceConfig
    {   &self.config
    }

    /// `GET /health`
    pub async fn health(&self)
      -> Result<HealthStatus, InferenceError>
    {   self.get_json("/health").await
    }

    /// `GET /` - service banner with available tasks and models
    pub async fn service_info(&self)
      -> Result<ServiceInfo, InferenceError>
    {   self.get_json("/").await
    }

    async fn get_json<T>(&self, path: &str)
      -> Result<T, InferenceError>
    where T: serde::de::DeserializeOwned
    {   let url = self.config.url_for(path);
        debug!("GET {}", url);

        let response = self.http_client
          .get(&url)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            InferenceError::Transport(e.to_string())
          })?;

        let status = response.status();
        trace!("Probe response status: {}", status);
        let body = response.text().await
          .map_err(|e| InferenceError::Transport(e.to_string()))?;

        if !status.is_success()
        {   return Err(InferenceError::Service
            {   status: status.as_u16()
              , detail: crate::response::extract_detail(&body)
            });
        }

        serde_json::from_str(&body).map_err(|e| {
          error!("Parse error: {}", e);
          InferenceError::MalformedResponse(e.to_string())
        })
    }
}

#[async_trait]
impl InferenceService for HttpInferenceService
{   async fn infer(&self, payload: RequestPayload)
      -> crate::InferenceReply
    {   let url = self.config.endpoint_url();
        debug!("POST {} ({})", url, payload.task);
        trace!("Request payload: {:?}", payload);

        let response = self.http_client
          .post(&url)
          .header("Content-Type", "application/json")
          .json(&payload)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            InferenceError::Transport(e.to_string())
          })?;

        let status = response.status();
        trace!("Inference response status: {}", status);

        let body = match response.text().await
        {   Ok(body) => body
          , Err(e) => {
              error!("Failed to read body: {}", e);
              String::new()
            }
        };

        crate::response::interpret(status.as_u16(), &body)
    }
}
