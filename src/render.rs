//! View models for the lifecycle and the input panel

use std::fmt;

use crate::response::{InferenceResult, Sentiment};
use crate::session::{LifecycleState, SessionState};
use crate::TaskMode;

const BAR_WIDTH: usize = 20;

/// What to show for the current lifecycle state
#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel
{   Empty
  , Pending
  , Generation
    {   model: String
      , generated_text: String
    }
  , Sentiment
    {   text: String
      , sentiment: Sentiment
      , /// `confidence * 100` with one decimal, e.g. `95.0%`
        confidence_display: String
      , /// Indicator fill, equal to the raw confidence
        fill_fraction: f64
    }
  , Error
    {   message: String
    }
}

/// Pure mapping from lifecycle state to view.
/// Result views follow the result's own task tag.
pub fn render(state: &LifecycleState) -> ViewModel
{   match state
    {   LifecycleState::Idle => ViewModel::Empty
      , LifecycleState::Pending => ViewModel::Pending
      , LifecycleState::Failed(message) => ViewModel::Error
        {   message: message.clone()
        }
      , LifecycleState::Succeeded(InferenceResult::Generation(gen)) => {
          ViewModel::Generation
          {   model: gen.model.clone()
            , generated_text: gen.generated_text.clone()
          }
        }
      , LifecycleState::Succeeded(InferenceResult::Sentiment(s)) => {
          ViewModel::Sentiment
          {   text: s.text.clone()
            , sentiment: s.sentiment
            , confidence_display: format_confidence(s.confidence)
            , fill_fraction: s.confidence
          }
        }
    }
}

pub fn format_confidence(confidence: f64) -> String
{   format!("{:.1}%", confidence * 100.0)
}

impl fmt::Display for ViewModel
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   match self
        {   ViewModel::Empty => Ok(())
          , ViewModel::Pending => writeln!(f, "Processing...")
          , ViewModel::Generation { model, generated_text } => {
              writeln!(f, "[Model: {}]", model.to_uppercase())?;
              writeln!(f, "Generated Text")?;
              writeln!(f, "{}", generated_text)
            }
          , ViewModel::Sentiment
            {   text, sentiment, confidence_display, fill_fraction
            } => {
              let mark = if sentiment.is_positive() { "(+)" } else { "(-)" };
              let filled = ((fill_fraction * BAR_WIDTH as f64).round() as usize)
                .min(BAR_WIDTH);
              writeln!(f, "Sentiment Analysis Result")?;
              writeln!(f, "Original Text: {}", text)?;
              writeln!(f, "Sentiment:  {} {}", mark, sentiment.label())?;
              writeln!(f,
                "Confidence: {} [{}{}]",
                confidence_display,
                "#".repeat(filled),
                "-".repeat(BAR_WIDTH - filled)
              )
            }
          , ViewModel::Error { message } => {
              writeln!(f, "Error Occurred: {}", message)
            }
        }
    }
}

/// Input side of the page for the selected task
#[derive(Debug, Clone, PartialEq)]
pub struct InputPanel
{   pub task: TaskMode
  , pub input_label: &'static str
  , pub submit_label: &'static str
  , /// `len / limit characters`; the limit is advisory
    pub char_counter: String
  , /// Shown only for tasks that use them
    pub settings: Option<SettingsPanel>
  , pub notice: Option<String>
  , pub submit_enabled: bool
  , pub controls_enabled: bool
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsPanel
{   pub max_length: i64
  , /// One decimal place
    pub temperature: String
}

pub fn input_panel(session: &SessionState) -> InputPanel
{   let task = session.task();
    let loading = session.loading();
    InputPanel
    {   task
      , input_label: task.input_label()
      , submit_label: if loading { "Processing..." } else { task.submit_label() }
      , char_counter: format!(
          "{} / {} characters",
          session.input().chars().count(),
          task.advisory_char_limit()
        )
      , settings: task.uses_parameters().then(|| SettingsPanel
        {   max_length: session.params().max_length
          , temperature: format!("{:.1}", session.params().temperature)
        })
      , notice: session.validation().map(|err| err.to_string())
      , submit_enabled: !loading && !session.input().trim().is_empty()
      , controls_enabled: !loading
    }
}

impl fmt::Display for InputPanel
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   writeln!(f, "Task: {}", self.task.title())?;
        writeln!(f, "{} ({})", self.input_label, self.char_counter)?;
        if let Some(settings) = &self.settings
        {   writeln!(f,
              "Max Length: {} tokens | Temperature: {}",
              settings.max_length, settings.temperature
            )?;
        }
        if let Some(notice) = &self.notice
        {   writeln!(f, "! {}", notice)?;
        }
        Ok(())
    }
}
