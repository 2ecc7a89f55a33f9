//! Outbound request payloads

use serde::{Deserialize, Serialize};
use log::{debug, trace};

/// Body posted to the inference endpoint.
///
/// Generation parameters are always present; the service ignores
/// them for sentiment analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload
{   /// Task to perform
    pub task: crate::TaskMode
  , /// Input text, as typed
    pub text: String
  , /// Maximum generated length
    pub max_length: i64
  , /// Sampling temperature
    pub temperature: f64
}

/// Shape a payload from the session's current values.
///
/// The only check is that the input is not blank. Parameters are
/// clamped into their domains; input length is not checked.
pub fn build(
  task: crate::TaskMode
, input_text: &str
, params: &crate::ParameterSet
) -> Result<RequestPayload, crate::error::ValidationError>
{   if input_text.trim().is_empty()
    {   debug!("Rejecting blank input for {}", task);
        return Err(crate::error::ValidationError::EmptyInput);
    }

    let params = params.clamped();
    let payload = RequestPayload
    {   task
      , text: input_text.to_string()
      , max_length: params.max_length
      , temperature: params.temperature
    };
    trace!("Built payload: {:?}", payload);
    Ok(payload)
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::error::ValidationError;
    use crate::{ParameterSet, TaskMode};
    use serde_json::json;

    #[test]
    fn blank_input_is_rejected()
    {   for input in ["", "   ", "\n\t "]
        {   assert_eq!(
              build(TaskMode::TextGeneration, input, &ParameterSet::default()),
              Err(ValidationError::EmptyInput)
            );
        }
    }

    #[test]
    fn generation_payload_is_exact()
    {   let params = ParameterSet { max_length: 50, temperature: 0.7 };
        let payload = build(TaskMode::TextGeneration, "Hello", &params)
          .unwrap();
        assert_eq!(
          serde_json::to_value(&payload).unwrap(),
          json!({
            "task": "text-generation",
            "text": "Hello",
            "max_length": 50,
            "temperature": 0.7
          })
        );
    }

    #[test]
    fn sentiment_payload_keeps_parameters()
    {   let payload = build(
          TaskMode::SentimentAnalysis,
          "I love this!",
          &ParameterSet::default()
        ).unwrap();
        assert_eq!(payload.max_length, 100);
        assert_eq!(payload.temperature, 1.0);
        assert_eq!(payload.task, TaskMode::SentimentAnalysis);
    }

    #[test]
    fn out_of_range_parameters_are_clamped()
    {   let params = ParameterSet { max_length: 4000, temperature: 0.01 };
        let payload = build(TaskMode::TextGeneration, "Hi", &params)
          .unwrap();
        assert_eq!(payload.max_length, 500);
        assert_eq!(payload.temperature, 0.1);
    }

    #[test]
    fn text_is_sent_untrimmed_and_unlimited()
    {   let long = format!("  {}  ", "x".repeat(2000));
        let payload = build(
          TaskMode::SentimentAnalysis,
          &long,
          &ParameterSet::default()
        ).unwrap();
        assert_eq!(payload.text, long);
    }
}
