//! Tuning load and validation errors.
//!
//! The simulation itself has no failure modes: invalid transitions are guarded
//! no-ops. Only reading balance data from the outside world can fail.

use std::fmt;
use std::io;

/// Errors raised while loading or validating a [`crate::Tuning`].
#[derive(Debug)]
pub enum TuningError {
    /// The tuning file could not be read.
    Io {
        /// Path that was being read.
        path: String,
        source: io::Error,
    },

    /// The tuning document is not valid JSON for [`crate::Tuning`].
    Parse(serde_json::Error),

    /// A value parsed fine but is outside its usable range.
    Invalid {
        /// Dotted field name, e.g. `rocket.speed`.
        field: &'static str,
        /// Human-readable description of the accepted range.
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io { path, source } => {
                write!(f, "failed to read tuning file '{}': {}", path, source)
            }
            TuningError::Parse(err) => write!(f, "malformed tuning JSON: {}", err),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning value '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io { source, .. } => Some(source),
            TuningError::Parse(err) => Some(err),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}
