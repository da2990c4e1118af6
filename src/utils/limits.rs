// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/*
Validation recurses once per matcher node it descends into. Matchers are
acyclic, but a deeply nested matcher paired with a value that follows it all
the way down still consumes one native stack frame per level. ValidationLimits
caps that descent: when the depth reaches max_depth the node is rejected like
any other data failure instead of overflowing the stack.

Limits are chosen per Validator. Callers that build validators in many places
can install a process-wide fallback with set_fallback_validation_limits; the
fallback is read once when a Validator is constructed, so validation itself
never takes the lock.
*/

use core::fmt;

use serde::{Deserialize, Serialize};
use spin::Mutex;

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Bounds enforced while validating.
///
/// Deserializes from camelCase documents; omitted fields take their defaults:
///
/// ```json
/// { "maxDepth": 64 }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ValidationLimits {
    /// Maximum number of nested matcher levels entered for a single value.
    pub max_depth: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidationLimits {
    pub const fn check_depth(&self, depth: usize) -> Result<(), LimitError> {
        if depth >= self.max_depth {
            Err(LimitError::DepthExceeded {
                depth,
                limit: self.max_depth,
            })
        } else {
            Ok(())
        }
    }
}

/// Errors reported when a validation bound is enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitError {
    /// Reported when validation descends beyond the configured nesting depth.
    DepthExceeded {
        /// Depth at which the check tripped.
        depth: usize,
        /// Configured depth limit.
        limit: usize,
    },
}

impl fmt::Display for LimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DepthExceeded { depth, limit } => write!(
                f,
                "validation exceeded nesting depth limit (depth={depth}, limit={limit})"
            ),
        }
    }
}

impl core::error::Error for LimitError {}

static FALLBACK_VALIDATION_LIMITS: Mutex<Option<ValidationLimits>> = Mutex::new(None);

/// Sets the process-wide fallback limits. Validators built with
/// [`Validator::new`](crate::Validator::new) pick these up; validators built with
/// [`Validator::with_limits`](crate::Validator::with_limits) ignore them.
pub fn set_fallback_validation_limits(limits: Option<ValidationLimits>) {
    *FALLBACK_VALIDATION_LIMITS.lock() = limits;
}

/// Returns the process-wide fallback limits, if any.
pub fn fallback_validation_limits() -> Option<ValidationLimits> {
    let guard = FALLBACK_VALIDATION_LIMITS.lock();
    guard.as_ref().copied()
}
