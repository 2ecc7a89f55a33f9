//! Result union returned by the inference service, and the
//! mapping from (status, body) to an outcome.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use log::{debug, error, trace};

// ===== Result Types =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult
{   pub model: String
  , pub generated_text: String
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment
{   Positive
  , Negative
}

impl Sentiment
{   pub fn label(&self) -> &'static str
    {   match self
        {   Sentiment::Positive => "POSITIVE"
          , Sentiment::Negative => "NEGATIVE"
        }
    }

    pub fn is_positive(&self) -> bool
    {   matches!(self, Sentiment::Positive)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult
{   pub text: String
  , pub sentiment: Sentiment
  , /// Classifier score in [0, 1]
    pub confidence: f64
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>
}

/// A successful inference, tagged on the wire by `task`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task")]
pub enum InferenceResult
{   #[serde(rename = "text-generation")]
    Generation(GenerationResult)
  , #[serde(rename = "sentiment-analysis")]
    Sentiment(SentimentResult)
}

impl InferenceResult
{   /// Task the service says this result is for
    pub fn task(&self) -> crate::TaskMode
    {   match self
        {   InferenceResult::Generation(_) => {
              crate::TaskMode::TextGeneration
            }
          , InferenceResult::Sentiment(_) => {
              crate::TaskMode::SentimentAnalysis
            }
        }
    }
}

/// Non-success body shape
#[derive(Debug, Clone, Deserialize)]
struct ErrorBody
{   #[serde(default)]
    detail: Option<serde_json::Value>
}

// ===== Probe Types =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus
{   pub status: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo
{   pub status: String
  , #[serde(default)]
    pub message: Option<String>
  , #[serde(default)]
    pub available_tasks: Vec<String>
  , #[serde(default)]
    pub models: HashMap<String, String>
}

// ===== Interpretation =====

/// Map a finished HTTP exchange to an inference outcome.
pub fn interpret(status: u16, body: &str) -> crate::InferenceReply
{   trace!("Interpreting response {}: {}", status, body);

    if !(200..300).contains(&status)
    {   let detail = extract_detail(body);
        error!("Service returned {}: {:?}", status, detail);
        return Err(crate::error::InferenceError::Service
        {   status
          , detail
        });
    }

    let result: InferenceResult = serde_json::from_str(body)
      .map_err(|e| {
        error!("Parse error: {}", e);
        crate::error::InferenceError::MalformedResponse(e.to_string())
      })?;

    if let InferenceResult::Sentiment(sentiment) = &result
    {   if !(0.0..=1.0).contains(&sentiment.confidence)
        {   error!("Confidence out of range: {}", sentiment.confidence);
            return Err(crate::error::InferenceError::MalformedResponse(
              format!("confidence {} not in [0, 1]", sentiment.confidence)
            ));
        }
    }

    debug!("Parsed {} result", result.task());
    Ok(result)
}

/// The `detail` string of an error body, if there is one.
/// Non-string details are treated as absent.
pub fn extract_detail(body: &str) -> Option<String>
{   let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail
    {   Some(serde_json::Value::String(detail)) => Some(detail)
      , _ => None
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::error::InferenceError;
    use crate::TaskMode;

    #[test]
    fn parses_generation()
    {   let body = r#"{
          "task": "text-generation",
          "generated_text": "Hello there, friend",
          "prompt": "Hello",
          "model": "gpt2"
        }"#;
        let result = interpret(200, body).unwrap();
        assert_eq!(result.task(), TaskMode::TextGeneration);
        match result
        {   InferenceResult::Generation(gen) => {
              assert_eq!(gen.model, "gpt2");
              assert_eq!(gen.generated_text, "Hello there, friend");
              assert_eq!(gen.prompt.as_deref(), Some("Hello"));
            }
          , other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn parses_sentiment_with_extra_fields()
    {   let body = r#"{
          "task": "sentiment-analysis",
          "text": "I love this!",
          "sentiment": "POSITIVE",
          "confidence": 0.95,
          "model": "distilbert-base-uncased-finetuned-sst-2-english"
        }"#;
        match interpret(200, body).unwrap()
        {   InferenceResult::Sentiment(s) => {
              assert_eq!(s.sentiment, Sentiment::Positive);
              assert_eq!(s.confidence, 0.95);
            }
          , other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn error_detail_is_extracted()
    {   assert_eq!(
          interpret(500, r#"{"detail": "model unavailable"}"#),
          Err(InferenceError::Service
          {   status: 500
            , detail: Some("model unavailable".to_string())
          })
        );
    }

    #[test]
    fn unparseable_error_body_has_no_detail()
    {   for body in ["", "<html>Internal Server Error</html>", "{}", r#"{"detail": [{"msg": "x"}]}"#]
        {   assert_eq!(
              interpret(500, body),
              Err(InferenceError::Service { status: 500, detail: None })
            );
        }
    }

    #[test]
    fn success_with_bad_body_is_malformed()
    {   let bodies = [
          "not json"
        , r#"{"generated_text": "no tag"}"#
        , r#"{"task": "translation", "text": "hola"}"#
        , r#"{"task": "sentiment-analysis", "text": "x", "sentiment": "NEUTRAL", "confidence": 0.5}"#
        , r#"{"task": "sentiment-analysis", "text": "x", "sentiment": "NEGATIVE", "confidence": 1.5}"#
        ];
        for body in bodies
        {   assert!(matches!(
              interpret(200, body),
              Err(InferenceError::MalformedResponse(_))
            ), "{}", body);
        }
    }

    #[test]
    fn service_info_tolerates_missing_fields()
    {   let info: ServiceInfo = serde_json::from_str(
          r#"{"status": "ok", "available_tasks": ["text-generation", "sentiment-analysis"]}"#
        ).unwrap();
        assert_eq!(info.available_tasks.len(), 2);
        assert!(info.models.is_empty());
    }
}
