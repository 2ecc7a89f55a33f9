pub mod error;
pub mod config;
pub mod params;
pub mod task;
pub mod request;
pub mod response;
pub mod service;
pub mod session;
pub mod controller;
pub mod render;

/*

taskdeck is an async client for a two-task inference service
(text generation and sentiment analysis). one session owns the
selected task, the input text, the generation parameters and the
request lifecycle; the controller dispatches requests and applies
their outcomes, the renderer turns the lifecycle into a view.

taskdeck/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and shared channel types
│   ├── main.rs         # Terminal front-end
│   ├── error.rs        # Validation / inference / crate errors
│   ├── config.rs       # Service endpoint configuration
│   ├── params.rs       # Generation parameters
│   ├── task.rs         # Task modes
│   ├── request.rs      # Payload building
│   ├── response.rs     # Result union and response interpretation
│   ├── service.rs      # InferenceService trait + HTTP client
│   ├── session.rs      # Session state and lifecycle
│   ├── controller.rs   # Request lifecycle driver
│   └── render.rs       # View models
└── tests/

*/

pub use config::{ServiceConfig, TaskdeckConfig};
pub use controller::RequestController;
pub use error::{Error, InferenceError, ValidationError};
pub use params::ParameterSet;
pub use render::{render, ViewModel};
pub use request::{build, RequestPayload};
pub use response::{InferenceResult, Sentiment};
pub use service::{HttpInferenceService, InferenceService};
pub use session::{LifecycleState, SessionState};
pub use task::TaskMode;

/// TASKDECK CHANNEL TYPES:

// ===== Completion =====

/// Monotonic marker identifying which submission a response
/// belongs to.
pub type Epoch = u64;

pub type InferenceReply
  = Result<crate::response::InferenceResult, crate::error::InferenceError>;

/// A finished service call, tagged with the epoch it was
/// dispatched under.
#[derive(Debug, Clone)]
pub struct Completion
{   pub epoch: Epoch
  , pub task: crate::TaskMode
  , pub reply: InferenceReply
}

pub type CompletionSender
  = tokio::sync::mpsc::UnboundedSender<Completion>;
pub type CompletionReceiver
  = tokio::sync::mpsc::UnboundedReceiver<Completion>;
