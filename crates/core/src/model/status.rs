use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Raised when a package writes a status outside the known vocabulary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatusParseError {
    #[error("unknown completion status: {0}")]
    Completion(String),

    #[error("unknown success status: {0}")]
    Success(String),
}

//
// ─── COMPLETION STATUS ────────────────────────────────────────────────────────
//

/// Union of the SCORM 1.2 lesson status and SCORM 2004 completion status
/// vocabularies.
///
/// SCORM 1.2 `browsed` has no counterpart here and is read as `Incomplete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompletionStatus {
    #[default]
    #[serde(rename = "not attempted")]
    NotAttempted,
    #[serde(rename = "incomplete")]
    Incomplete,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "passed")]
    Passed,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "unknown")]
    Unknown,
}

impl CompletionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotAttempted => "not attempted",
            Self::Incomplete => "incomplete",
            Self::Completed => "completed",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }

    /// True for the statuses that mean the learner reached the end.
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Passed)
    }

    /// The value a SCORM 1.2 package reads back from `cmi.core.lesson_status`.
    #[must_use]
    pub fn as_scorm12(self) -> &'static str {
        match self {
            Self::Unknown => Self::NotAttempted.as_str(),
            other => other.as_str(),
        }
    }

    /// The value a SCORM 2004 package reads back from `cmi.completion_status`.
    ///
    /// Mastery outcomes written through 1.2 imply the content was completed.
    #[must_use]
    pub fn as_scorm2004(self) -> &'static str {
        match self {
            Self::Passed | Self::Failed => Self::Completed.as_str(),
            other => other.as_str(),
        }
    }

    /// Success status implied by a SCORM 1.2 lesson status.
    #[must_use]
    pub fn implied_success(self) -> SuccessStatus {
        match self {
            Self::Passed => SuccessStatus::Passed,
            Self::Failed => SuccessStatus::Failed,
            _ => SuccessStatus::Unknown,
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompletionStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "not attempted" => Ok(Self::NotAttempted),
            "incomplete" | "browsed" => Ok(Self::Incomplete),
            "completed" => Ok(Self::Completed),
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            "unknown" => Ok(Self::Unknown),
            other => Err(StatusParseError::Completion(other.to_string())),
        }
    }
}

//
// ─── SUCCESS STATUS ───────────────────────────────────────────────────────────
//

/// SCORM 2004 mastery outcome, kept separate from completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuccessStatus {
    Passed,
    Failed,
    #[default]
    Unknown,
}

impl SuccessStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SuccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuccessStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            "unknown" => Ok(Self::Unknown),
            other => Err(StatusParseError::Success(other.to_string())),
        }
    }
}

//
// ─── SESSION LIFECYCLE ────────────────────────────────────────────────────────
//

/// Runtime session lifecycle shared by both API versions.
///
/// `Uninitialized -> Active` on initialize, `Active -> Terminated` on
/// finish/terminate. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Active,
    Terminated,
}

impl SessionState {
    /// Move to `Active`. Returns false when the session was not waiting to start.
    pub fn initialize(&mut self) -> bool {
        if *self == Self::Uninitialized {
            *self = Self::Active;
            true
        } else {
            false
        }
    }

    /// Move to `Terminated`. Returns false unless the session was active.
    pub fn terminate(&mut self) -> bool {
        if *self == Self::Active {
            *self = Self::Terminated;
            true
        } else {
            false
        }
    }

    /// Force `Terminated` regardless of the current state, for host teardown.
    pub fn detach(&mut self) {
        *self = Self::Terminated;
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browsed_reads_as_incomplete() {
        assert_eq!(
            "browsed".parse::<CompletionStatus>().unwrap(),
            CompletionStatus::Incomplete
        );
    }

    #[test]
    fn unknown_vocabulary_is_rejected() {
        let err = "done".parse::<CompletionStatus>().unwrap_err();
        assert_eq!(err, StatusParseError::Completion("done".into()));
        assert!("maybe".parse::<SuccessStatus>().is_err());
    }

    #[test]
    fn version_vocabularies_are_respected_on_read() {
        assert_eq!(CompletionStatus::Unknown.as_scorm12(), "not attempted");
        assert_eq!(CompletionStatus::Passed.as_scorm12(), "passed");
        assert_eq!(CompletionStatus::Passed.as_scorm2004(), "completed");
        assert_eq!(CompletionStatus::Unknown.as_scorm2004(), "unknown");
    }

    #[test]
    fn lesson_status_implies_success() {
        assert_eq!(CompletionStatus::Passed.implied_success(), SuccessStatus::Passed);
        assert_eq!(CompletionStatus::Failed.implied_success(), SuccessStatus::Failed);
        assert_eq!(CompletionStatus::Completed.implied_success(), SuccessStatus::Unknown);
    }

    #[test]
    fn lifecycle_only_moves_forward() {
        let mut state = SessionState::default();
        assert!(!state.terminate());
        assert!(state.initialize());
        assert!(state.is_active());
        assert!(!state.initialize());
        assert!(state.terminate());
        assert!(!state.initialize());
        assert_eq!(state, SessionState::Terminated);
    }

    #[test]
    fn detach_ends_a_session_from_any_state() {
        let mut fresh = SessionState::default();
        fresh.detach();
        assert!(!fresh.initialize());

        let mut active = SessionState::default();
        active.initialize();
        active.detach();
        assert!(!active.is_active());
        assert!(!active.terminate());
    }
}
