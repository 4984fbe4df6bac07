//! Analysis lifecycle state.

use serde::{Deserialize, Serialize};

/// Where the current analysis stands.
///
/// `result` and `error` can never both be set: they live in different
/// variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnalysisState {
    /// Nothing submitted since the session started or the batch changed.
    #[default]
    Idle,

    /// A submission is in flight.
    Loading,

    /// The model returned an interpretation.
    Completed {
        /// Free-text analysis, passed through unmodified
        result: String,
    },

    /// The submission failed.
    Failed {
        /// User-facing error message
        error: String,
    },
}

impl AnalysisState {
    /// Returns `true` while a submission is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading)
    }

    /// Returns `true` if the analysis finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnalysisState::Completed { .. } | AnalysisState::Failed { .. }
        )
    }

    /// Returns the analysis text, or `""` when there is none.
    pub fn result(&self) -> &str {
        match self {
            AnalysisState::Completed { result } => result,
            _ => "",
        }
    }

    /// Returns the error message, if the analysis failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisState::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Projects the state onto the flat `{result, loading, error}` shape.
    pub fn snapshot(&self) -> AnalysisSnapshot {
        AnalysisSnapshot {
            result: self.result().to_string(),
            loading: self.is_loading(),
            error: self.error().map(str::to_string),
        }
    }
}

impl std::fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisState::Idle => write!(f, "idle"),
            AnalysisState::Loading => write!(f, "loading"),
            AnalysisState::Completed { .. } => write!(f, "completed"),
            AnalysisState::Failed { .. } => write!(f, "failed"),
        }
    }
}

/// Flat view of [`AnalysisState`] for serialization to a front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    /// Analysis text (empty unless completed)
    pub result: String,

    /// Whether a submission is in flight
    pub loading: bool,

    /// Error message, if the analysis failed
    pub error: Option<String>,
}
