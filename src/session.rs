//! Session state: selected task, input, parameters and the
//! request lifecycle, kept mutually consistent.

use log::{debug, info};

use crate::error::ValidationError;
use crate::request::RequestPayload;
use crate::response::InferenceResult;
use crate::{Completion, Epoch, ParameterSet, TaskMode};

/// Where the current submission stands. Result and error are
/// never held at the same time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LifecycleState
{   #[default]
    Idle
  , Pending
  , Succeeded(InferenceResult)
  , Failed(String)
}

impl LifecycleState
{   pub fn is_pending(&self) -> bool
    {   matches!(self, LifecycleState::Pending)
    }

    pub fn result(&self) -> Option<&InferenceResult>
    {   match self
        {   LifecycleState::Succeeded(result) => Some(result)
          , _ => None
        }
    }

    pub fn error_message(&self) -> Option<&str>
    {   match self
        {   LifecycleState::Failed(message) => Some(message)
          , _ => None
        }
    }
}

/// Everything one client session holds.
#[derive(Debug, Clone, Default)]
pub struct SessionState
{   task: TaskMode
  , input: String
  , params: ParameterSet
  , lifecycle: LifecycleState
  , validation: Option<ValidationError>
  , epoch: Epoch
}

impl SessionState
{   pub fn new() -> Self
    {   SessionState::default()
    }

    pub fn task(&self) -> TaskMode
    {   self.task
    }

    pub fn input(&self) -> &str
    {   &self.input
    }

    pub fn params(&self) -> &ParameterSet
    {   &self.params
    }

    pub fn lifecycle(&self) -> &LifecycleState
    {   &self.lifecycle
    }

    /// Last local validation failure, until the next action
    pub fn validation(&self) -> Option<&ValidationError>
    {   self.validation.as_ref()
    }

    pub fn epoch(&self) -> Epoch
    {   self.epoch
    }

    /// True exactly while the lifecycle is Pending
    pub fn loading(&self) -> bool
    {   self.lifecycle.is_pending()
    }

    /// Switch task. Drops any result, error or pending request;
    /// input and parameters are kept.
    pub fn select_task(&mut self, task: TaskMode)
    {   debug!("Selecting task {} (was {})", task, self.task);
        self.task = task;
        self.reset_lifecycle();
    }

    pub fn set_input(&mut self, input: impl Into<String>)
    {   self.input = input.into();
        self.validation = None;
    }

    pub fn params_mut(&mut self) -> &mut ParameterSet
    {   &mut self.params
    }

    /// Empty the input and drop any result, error or pending request.
    pub fn clear(&mut self)
    {   debug!("Clearing session");
        self.input.clear();
        self.reset_lifecycle();
    }

    /// Validate and enter Pending under a fresh epoch.
    ///
    /// Does not refuse while already Pending: the new epoch
    /// supersedes the old one.
    pub fn begin_submit(&mut self)
      -> Result<(Epoch, RequestPayload), ValidationError>
    {   let payload = crate::request::build(
          self.task,
          &self.input,
          &self.params
        ).map_err(|err| {
          self.validation = Some(err.clone());
          err
        })?;

        if self.loading()
        {   info!("Submit while epoch {} still pending", self.epoch);
        }
        self.epoch += 1;
        self.validation = None;
        self.lifecycle = LifecycleState::Pending;
        debug!("Submitting {} under epoch {}", self.task, self.epoch);
        Ok((self.epoch, payload))
    }

    /// Apply a completion if it belongs to the current epoch.
    /// Returns whether it was applied.
    pub fn apply(&mut self, completion: Completion) -> bool
    {   if completion.epoch != self.epoch
        {   info!(
              "Discarding stale {} completion (epoch {}, current {})",
              completion.task, completion.epoch, self.epoch
            );
            return false;
        }

        self.lifecycle = match completion.reply
        {   Ok(result) => {
              debug!("Epoch {} succeeded", completion.epoch);
              LifecycleState::Succeeded(result)
            }
          , Err(err) => {
              debug!("Epoch {} failed: {}", completion.epoch, err);
              LifecycleState::Failed(err.user_message())
            }
        };
        true
    }

    fn reset_lifecycle(&mut self)
    {   self.epoch += 1;
        self.validation = None;
        self.lifecycle = LifecycleState::Idle;
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::error::{InferenceError, FALLBACK_MESSAGE};
    use crate::response::{GenerationResult, Sentiment, SentimentResult};

    fn generation() -> InferenceResult
    {   InferenceResult::Generation(GenerationResult
        {   model: "gpt2".to_string()
          , generated_text: "Once upon a time".to_string()
          , prompt: None
        })
    }

    fn sentiment() -> InferenceResult
    {   InferenceResult::Sentiment(SentimentResult
        {   text: "meh".to_string()
          , sentiment: Sentiment::Negative
          , confidence: 0.6
          , model: None
        })
    }

    fn complete(state: &mut SessionState, reply: crate::InferenceReply) -> bool
    {   let epoch = state.epoch();
        let task = state.task();
        state.apply(Completion { epoch, task, reply })
    }

    #[test]
    fn task_switch_always_returns_to_idle()
    {   let mut state = SessionState::new();
        state.set_input("Hello");
        let switches = [
          TaskMode::SentimentAnalysis
        , TaskMode::SentimentAnalysis
        , TaskMode::TextGeneration
        , TaskMode::SentimentAnalysis
        ];
        for (i, task) in switches.into_iter().enumerate()
        {   state.begin_submit().unwrap();
            match i % 3
            {   0 => { complete(&mut state, Ok(generation())); }
              , 1 => { complete(&mut state, Err(InferenceError::Transport("x".into()))); }
              , _ => {}
            }
            state.select_task(task);
            assert_eq!(state.task(), task);
            assert_eq!(state.lifecycle(), &LifecycleState::Idle);
            assert!(state.lifecycle().result().is_none());
            assert!(state.lifecycle().error_message().is_none());
            assert!(!state.loading());
        }
    }

    #[test]
    fn task_switch_keeps_input_and_params()
    {   let mut state = SessionState::new();
        state.set_input("keep me");
        state.params_mut().set_max_length(250);
        state.params_mut().set_temperature(1.5);
        state.select_task(TaskMode::SentimentAnalysis);
        assert_eq!(state.input(), "keep me");
        assert_eq!(state.params().max_length, 250);
        assert_eq!(state.params().temperature, 1.5);
    }

    #[test]
    fn reselecting_active_task_only_clears()
    {   let mut state = SessionState::new();
        state.set_input("Hello");
        state.select_task(TaskMode::TextGeneration);
        assert_eq!(state.task(), TaskMode::TextGeneration);
        assert_eq!(state.input(), "Hello");
        assert_eq!(state.lifecycle(), &LifecycleState::Idle);
    }

    #[test]
    fn blank_submit_never_pends()
    {   let mut state = SessionState::new();
        for input in ["", "   "]
        {   state.set_input(input);
            let epoch = state.epoch();
            assert_eq!(state.begin_submit(), Err(ValidationError::EmptyInput));
            assert_eq!(state.lifecycle(), &LifecycleState::Idle);
            assert_eq!(state.validation(), Some(&ValidationError::EmptyInput));
            assert_eq!(state.epoch(), epoch);
        }
    }

    #[test]
    fn failure_uses_detail_or_fallback()
    {   let mut state = SessionState::new();
        state.set_input("Hello");
        state.begin_submit().unwrap();
        complete(&mut state, Err(InferenceError::Service
        {   status: 500
          , detail: Some("model unavailable".into())
        }));
        assert_eq!(state.lifecycle().error_message(), Some("model unavailable"));

        state.begin_submit().unwrap();
        assert!(state.lifecycle().error_message().is_none());
        complete(&mut state, Err(InferenceError::Service { status: 500, detail: None }));
        assert_eq!(state.lifecycle().error_message(), Some(FALLBACK_MESSAGE));
    }

    #[test]
    fn result_tag_wins_over_selected_task()
    {   let mut state = SessionState::new();
        state.set_input("Hello");
        state.begin_submit().unwrap();
        assert!(complete(&mut state, Ok(sentiment())));
        assert_eq!(state.task(), TaskMode::TextGeneration);
        assert_eq!(
          state.lifecycle().result().map(|r| r.task()),
          Some(TaskMode::SentimentAnalysis)
        );
    }

    #[test]
    fn completion_after_clear_is_discarded()
    {   let mut state = SessionState::new();
        state.set_input("Hello");
        let (epoch, _) = state.begin_submit().unwrap();
        state.clear();
        assert_eq!(state.input(), "");
        let applied = state.apply(Completion
        {   epoch
          , task: TaskMode::TextGeneration
          , reply: Ok(generation())
        });
        assert!(!applied);
        assert_eq!(state.lifecycle(), &LifecycleState::Idle);
    }
}
