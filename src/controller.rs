use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use log::{debug, trace, error, warn};

use crate::error::InferenceError;
use crate::service::InferenceService;
use crate::session::{LifecycleState, SessionState};
use crate::{Completion, Epoch, TaskMode};

/// What a call to [`RequestController::settle`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled
{   /// Completion for the current epoch was applied
    Applied(Epoch)
  , /// Completion for a superseded epoch was dropped
    Discarded(Epoch)
  , /// Nothing was in flight
    Idle
}

/// Drives the request lifecycle for one session.
///
/// Service calls run on spawned tasks and report back through a
/// completion channel; the controller applies each completion to
/// the session only if its epoch is still current. Single flight
/// is the caller's job: gate submit on [`loading`](Self::loading).
pub struct RequestController
{   session: SessionState
  , service: Arc<dyn InferenceService>
  , completion_tx: crate::CompletionSender
  , completion_rx: crate::CompletionReceiver
  , outstanding: HashSet<Epoch>
}

impl RequestController
{   pub fn new(service: Arc<dyn InferenceService>) -> Self
    {   debug!("Creating RequestController");
        let (completion_tx, completion_rx)
          = mpsc::unbounded_channel();
        RequestController
        {   session: SessionState::new()
          , service
          , completion_tx
          , completion_rx
          , outstanding: HashSet::new()
        }
    }

    pub fn session(&self) -> &SessionState
    {   &self.session
    }

    pub fn state(&self) -> &LifecycleState
    {   self.session.lifecycle()
    }

    pub fn loading(&self) -> bool
    {   self.session.loading()
    }

    /// Requests dispatched but not yet received back
    pub fn in_flight(&self) -> usize
    {   self.outstanding.len()
    }

    pub fn select_task(&mut self, task: TaskMode)
    {   self.session.select_task(task);
    }

    pub fn set_input(&mut self, input: impl Into<String>)
    {   self.session.set_input(input);
    }

    pub fn set_max_length(&mut self, value: i64)
    {   self.session.params_mut().set_max_length(value);
    }

    pub fn set_temperature(&mut self, value: f64)
    {   self.session.params_mut().set_temperature(value);
    }

    pub fn clear(&mut self)
    {   self.session.clear();
    }

    pub fn view(&self) -> crate::render::ViewModel
    {   crate::render::render(self.session.lifecycle())
    }

    /// Validate the session and dispatch its payload.
    /// Returns immediately with the epoch of the new request;
    /// the lifecycle is Pending until that epoch settles.
    pub fn submit(&mut self)
      -> Result<Epoch, crate::error::ValidationError>
    {   let (epoch, payload) = self.session.begin_submit()?;
        let task = payload.task;
        let service = Arc::clone(&self.service);
        let completion_tx = self.completion_tx.clone();

        self.outstanding.insert(epoch);
        tokio::spawn(async move {
          trace!("Dispatching epoch {}", epoch);
          let call = tokio::spawn(async move {
            service.infer(payload).await
          });
          // a panicking service still settles its epoch
          let reply = call.await.unwrap_or_else(|join_err| {
            error!("Service call for epoch {} died: {}", epoch, join_err);
            Err(InferenceError::Transport(join_err.to_string()))
          });
          if completion_tx
            .send(Completion { epoch, task, reply })
            .is_err()
          {   debug!("Controller gone, dropping epoch {}", epoch);
          }
        });

        Ok(epoch)
    }

    /// Wait for the next completion, if any, and apply it.
    pub async fn settle(&mut self) -> Settled
    {   match self.next_completion().await
        {   Some(completion) => self.apply(completion)
          , None => Settled::Idle
        }
    }

    /// Receive the next completion without applying it.
    /// Resolves to `None` immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion>
    {   if self.outstanding.is_empty()
        {   return None;
        }
        self.completion_rx.recv().await
    }

    /// Apply a completion obtained from
    /// [`next_completion`](Self::next_completion). Completions for
    /// epochs this controller is not waiting on are ignored.
    pub fn apply(&mut self, completion: Completion) -> Settled
    {   let epoch = completion.epoch;
        if !self.outstanding.remove(&epoch)
        {   warn!("Ignoring completion for unknown epoch {}", epoch);
            return Settled::Discarded(epoch);
        }
        if self.session.apply(completion)
        {   Settled::Applied(epoch)
        } else
        {   Settled::Discarded(epoch)
        }
    }

    /// Submit and wait until the submitted epoch settles.
    pub async fn run(&mut self)
      -> Result<&LifecycleState, crate::error::Error>
    {   let epoch = self.submit()?;
        loop
        {   match self.settle().await
            {   Settled::Applied(applied) if applied == epoch => break
              , Settled::Idle => break
              , other => {
                  trace!("Waiting for epoch {}, got {:?}", epoch, other);
                }
            }
        }
        Ok(self.session.lifecycle())
    }
}
