//! Text generation parameters

use serde::{Deserialize, Serialize};

pub const MAX_LENGTH_MIN: i64 = 10;
pub const MAX_LENGTH_MAX: i64 = 500;
pub const MAX_LENGTH_DEFAULT: i64 = 100;

pub const TEMPERATURE_MIN: f64 = 0.1;
pub const TEMPERATURE_MAX: f64 = 2.0;
pub const TEMPERATURE_DEFAULT: f64 = 1.0;

/// Generation parameters as last set by the caller.
///
/// Values are stored verbatim; only [`ParameterSet::clamped`]
/// guarantees they lie within their domains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet
{   /// Maximum generated length, in tokens
    pub max_length: i64
  , /// Sampling temperature
    pub temperature: f64
}

impl Default for ParameterSet
{   fn default() -> Self
    {   ParameterSet
        {   max_length: MAX_LENGTH_DEFAULT
          , temperature: TEMPERATURE_DEFAULT
        }
    }
}

impl ParameterSet
{   pub fn set_max_length(&mut self, value: i64)
    {   self.max_length = value;
    }

    pub fn set_temperature(&mut self, value: f64)
    {   self.temperature = value;
    }

    /// Copy with both values forced into their domains.
    /// A non-finite temperature becomes the default.
    pub fn clamped(&self) -> ParameterSet
    {   let temperature = if self.temperature.is_finite()
        {   self.temperature.clamp(TEMPERATURE_MIN, TEMPERATURE_MAX)
        } else
        {   TEMPERATURE_DEFAULT
        };
        ParameterSet
        {   max_length: self.max_length
              .clamp(MAX_LENGTH_MIN, MAX_LENGTH_MAX)
          , temperature
        }
    }

    pub fn in_domain(&self) -> bool
    {   (MAX_LENGTH_MIN..=MAX_LENGTH_MAX).contains(&self.max_length)
          && (TEMPERATURE_MIN..=TEMPERATURE_MAX)
            .contains(&self.temperature)
    }
}
