//! Task modes offered by the inference service

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The inference operation currently selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum TaskMode
{   /// Free-text continuation of a prompt
    #[default]
    #[serde(rename = "text-generation")]
    TextGeneration
  , /// POSITIVE / NEGATIVE classification of a text
    #[serde(rename = "sentiment-analysis")]
    SentimentAnalysis
}

impl TaskMode
{   pub const ALL: [TaskMode; 2]
      = [TaskMode::TextGeneration, TaskMode::SentimentAnalysis];

    /// Wire name used in payloads and result tags
    pub fn as_str(&self) -> &'static str
    {   match self
        {   TaskMode::TextGeneration => "text-generation"
          , TaskMode::SentimentAnalysis => "sentiment-analysis"
        }
    }

    /// Advertised input length. Advisory only, never enforced.
    pub fn advisory_char_limit(&self) -> usize
    {   match self
        {   TaskMode::TextGeneration => 500
          , TaskMode::SentimentAnalysis => 1000
        }
    }

    /// Whether max length / temperature affect this task
    pub fn uses_parameters(&self) -> bool
    {   matches!(self, TaskMode::TextGeneration)
    }

    pub fn title(&self) -> &'static str
    {   match self
        {   TaskMode::TextGeneration => "Text Generation"
          , TaskMode::SentimentAnalysis => "Sentiment Analysis"
        }
    }

    pub fn input_label(&self) -> &'static str
    {   match self
        {   TaskMode::TextGeneration => "Your Prompt"
          , TaskMode::SentimentAnalysis => "Text to Analyze"
        }
    }

    pub fn submit_label(&self) -> &'static str
    {   match self
        {   TaskMode::TextGeneration => "Generate Text"
          , TaskMode::SentimentAnalysis => "Analyze Sentiment"
        }
    }
}

impl fmt::Display for TaskMode
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskMode
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   match s.trim().to_ascii_lowercase().as_str()
        {   "text-generation" | "generation" | "gen" => {
              Ok(TaskMode::TextGeneration)
            }
          , "sentiment-analysis" | "sentiment" | "sa" => {
              Ok(TaskMode::SentimentAnalysis)
            }
          , other => Err(crate::error::Error::Other(
              format!("Unknown task: {}", other)
            ))
        }
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn wire_names_match_serde()
    {   for task in TaskMode::ALL
        {   let json = serde_json::to_value(task).unwrap();
            assert_eq!(json, serde_json::json!(task.as_str()));
            let back: TaskMode = serde_json::from_value(json).unwrap();
            assert_eq!(back, task);
        }
    }

    #[test]
    fn parses_short_names()
    {   assert_eq!("gen".parse::<TaskMode>().unwrap(), TaskMode::TextGeneration);
        assert_eq!(
          " Sentiment ".parse::<TaskMode>().unwrap(),
          TaskMode::SentimentAnalysis
        );
        assert!("translate".parse::<TaskMode>().is_err());
    }

    #[test]
    fn default_is_generation()
    {   assert_eq!(TaskMode::default(), TaskMode::TextGeneration);
        assert!(TaskMode::TextGeneration.uses_parameters());
        assert!(!TaskMode::SentimentAnalysis.uses_parameters());
    }
}
