use std::fmt;

/// Message shown when a request failed without a usable
/// `detail` from the service.
pub const FALLBACK_MESSAGE: &str
  = "Failed to process request. \
     Please make sure the backend server is running.";

/// Local pre-submit validation failure. Never leaves the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError
{   /// Input text is empty after trimming
    EmptyInput
}

impl fmt::Display for ValidationError
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   ValidationError::EmptyInput => {
              write!(f, "Please enter some text")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Failure of a dispatched inference request.
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceError
{   /// Service could not be reached
    Transport(String)
  , /// Non-success status; `detail` is the user-facing message
    /// when the body carried one
    Service
    {   status: u16
      , detail: Option<String>
    }
  , /// Success status with a body that is not a known result
    MalformedResponse(String)
}

impl InferenceError
{   /// Message surfaced to the user for this failure
    pub fn user_message(&self) -> String
    {   match self
        {   InferenceError::Service { detail: Some(detail), .. } => {
              detail.clone()
            }
          , _ => FALLBACK_MESSAGE.to_string()
        }
    }
}

impl fmt::Display for InferenceError
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   InferenceError::Transport(msg) => {
              write!(f, "Transport error: {}", msg)
            }
          , InferenceError::Service { status, detail } => {
              match detail
              {   Some(detail) => write!(f,
                    "Service error ({}): {}",
                    status, detail
                  )
                , None => write!(f,
                    "Service error ({})",
                    status
                  )
              }
            }
          , InferenceError::MalformedResponse(msg) => {
              write!(f, "Malformed response: {}", msg)
            }
        }
    }
}

impl std::error::Error for InferenceError {}

/// Custom error type for taskdeck operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Request rejected before dispatch
    Validation(ValidationError)
  , /// Dispatched request failed
    Inference(InferenceError)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Validation(err) => {
              write!(f, "Validation error: {}", err)
            }
          , Error::Inference(err) => {
              write!(f, "{}", err)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<ValidationError> for Error
{   fn from(err: ValidationError) -> Self
    {   Error::Validation(err)
    }
}

impl From<InferenceError> for Error
{   fn from(err: InferenceError) -> Self
    {   Error::Inference(err)
    }
}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn service_detail_is_user_message()
    {   let err = InferenceError::Service
        {   status: 500
          , detail: Some("model unavailable".to_string())
        };
        assert_eq!(err.user_message(), "model unavailable");
    }

    #[test]
    fn other_failures_fall_back()
    {   let errs = vec![
          InferenceError::Transport("connection refused".into())
        , InferenceError::Service { status: 502, detail: None }
        , InferenceError::MalformedResponse("eof".into())
        ];
        for err in errs
        {   assert_eq!(err.user_message(), FALLBACK_MESSAGE);
        }
    }
}
