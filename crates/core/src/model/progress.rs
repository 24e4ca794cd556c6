use serde::{Deserialize, Serialize};

use crate::model::status::{CompletionStatus, SuccessStatus};

/// Upper bound of a raw score when it stands in for a percentage.
pub const RAW_SCORE_MAX: f64 = 100.0;

/// Clamp a fraction into `[0, 1]`.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Clamp a raw score into `[0, 100]`.
#[must_use]
pub fn clamp_raw(value: f64) -> f64 {
    value.clamp(0.0, RAW_SCORE_MAX)
}

/// Parse a SCORM `real` value.
///
/// SCORM transmits numbers as strings. Anything that is not a finite decimal
/// yields `None` so the caller can leave state untouched.
#[must_use]
pub fn parse_real(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a number the way SCORM packages expect to read it back (`80`, `0.5`).
#[must_use]
pub fn format_real(value: f64) -> String {
    format!("{value}")
}

//
// ─── PROGRESS STATE ───────────────────────────────────────────────────────────
//

/// Learner progress for a single mounted content session.
///
/// Numeric fields are clamped on every write, so a value read from here is
/// always safe to forward to the host or the tracking service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressState {
    completion_status: CompletionStatus,
    success_status: SuccessStatus,
    progress_measure: f64,
    score_raw: Option<f64>,
    score_scaled: Option<f64>,
    lesson_location: Option<String>,
    session_time: Option<String>,
    suspend_data: Option<String>,
    exit: Option<String>,
}

impl ProgressState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn completion_status(&self) -> CompletionStatus {
        self.completion_status
    }

    #[must_use]
    pub fn success_status(&self) -> SuccessStatus {
        self.success_status
    }

    #[must_use]
    pub fn progress_measure(&self) -> f64 {
        self.progress_measure
    }

    #[must_use]
    pub fn score_raw(&self) -> Option<f64> {
        self.score_raw
    }

    #[must_use]
    pub fn score_scaled(&self) -> Option<f64> {
        self.score_scaled
    }

    #[must_use]
    pub fn lesson_location(&self) -> Option<&str> {
        self.lesson_location.as_deref()
    }

    #[must_use]
    pub fn session_time(&self) -> Option<&str> {
        self.session_time.as_deref()
    }

    #[must_use]
    pub fn suspend_data(&self) -> Option<&str> {
        self.suspend_data.as_deref()
    }

    #[must_use]
    pub fn exit(&self) -> Option<&str> {
        self.exit.as_deref()
    }

    /// Progress as a whole percentage for host progress bars.
    #[must_use]
    pub fn percent(&self) -> u8 {
        // progress_measure is clamped to [0, 1], so this never leaves 0..=100
        (self.progress_measure * 100.0).round() as u8
    }

    /// True once the content is completed, passed, or mastered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion_status.is_finished() || self.success_status == SuccessStatus::Passed
    }

    pub fn set_completion_status(&mut self, status: CompletionStatus) {
        self.completion_status = status;
    }

    pub fn set_success_status(&mut self, status: SuccessStatus) {
        self.success_status = status;
    }

    /// Store a progress fraction, clamped. Returns the stored value.
    pub fn set_progress_measure(&mut self, value: f64) -> f64 {
        self.progress_measure = clamp_unit(value);
        self.progress_measure
    }

    /// Store a raw score, clamped. Returns the stored value.
    pub fn set_score_raw(&mut self, value: f64) -> f64 {
        let clamped = clamp_raw(value);
        self.score_raw = Some(clamped);
        clamped
    }

    /// Store a scaled score, clamped. Returns the stored value.
    pub fn set_score_scaled(&mut self, value: f64) -> f64 {
        let clamped = clamp_unit(value);
        self.score_scaled = Some(clamped);
        clamped
    }

    pub fn set_lesson_location(&mut self, location: impl Into<String>) {
        self.lesson_location = Some(location.into());
    }

    pub fn set_session_time(&mut self, time: impl Into<String>) {
        self.session_time = Some(time.into());
    }

    pub fn set_suspend_data(&mut self, data: impl Into<String>) {
        self.suspend_data = Some(data.into());
    }

    pub fn set_exit(&mut self, exit: impl Into<String>) {
        self.exit = Some(exit.into());
    }

    /// `resume` when the package left a bookmark, `ab-initio` otherwise.
    #[must_use]
    pub fn entry(&self) -> &'static str {
        match self.lesson_location.as_deref() {
            Some(location) if !location.is_empty() => "resume",
            _ => "ab-initio",
        }
    }

    /// Snapshot in the shape the tracking service accepts.
    #[must_use]
    pub fn payload(&self) -> ProgressPayload {
        ProgressPayload {
            completion_status: self.completion_status,
            success_status: self.success_status,
            progress_measure: self.progress_measure,
            score_raw: self.score_raw,
            score_scaled: self.score_scaled,
            lesson_location: self.lesson_location.clone(),
            session_time: self.session_time.clone(),
            suspend_data: self.suspend_data.clone(),
        }
    }
}

//
// ─── WIRE PAYLOAD ─────────────────────────────────────────────────────────────
//

/// JSON body written to the tracking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPayload {
    pub completion_status: CompletionStatus,
    pub success_status: SuccessStatus,
    pub progress_measure: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_raw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_scaled: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend_data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_zero_valued() {
        let state = ProgressState::new();
        assert_eq!(state.completion_status(), CompletionStatus::NotAttempted);
        assert_eq!(state.success_status(), SuccessStatus::Unknown);
        assert_eq!(state.progress_measure(), 0.0);
        assert_eq!(state.score_raw(), None);
        assert_eq!(state.entry(), "ab-initio");
        assert!(!state.is_complete());
    }

    #[test]
    fn numeric_writes_are_clamped() {
        let mut state = ProgressState::new();
        assert_eq!(state.set_progress_measure(1.7), 1.0);
        assert_eq!(state.set_progress_measure(-0.2), 0.0);
        assert_eq!(state.set_score_raw(150.0), 100.0);
        assert_eq!(state.set_score_scaled(-0.5), 0.0);
        assert_eq!(state.score_scaled(), Some(0.0));
    }

    #[test]
    fn percent_rounds_to_whole_numbers() {
        let mut state = ProgressState::new();
        state.set_progress_measure(0.456);
        assert_eq!(state.percent(), 46);
        state.set_progress_measure(1.0);
        assert_eq!(state.percent(), 100);
    }

    #[test]
    fn parse_real_rejects_garbage_and_non_finite() {
        assert_eq!(parse_real(" 42.5 "), Some(42.5));
        assert_eq!(parse_real("abc"), None);
        assert_eq!(parse_real("NaN"), None);
        assert_eq!(parse_real("inf"), None);
        assert_eq!(format_real(80.0), "80");
        assert_eq!(format_real(0.25), "0.25");
    }

    #[test]
    fn success_alone_counts_as_complete() {
        let mut state = ProgressState::new();
        state.set_success_status(SuccessStatus::Passed);
        assert!(state.is_complete());
    }

    #[test]
    fn payload_omits_unset_fields() {
        let mut state = ProgressState::new();
        state.set_lesson_location("p42");
        state.set_progress_measure(0.5);

        let json = serde_json::to_value(state.payload()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "completion_status": "not attempted",
                "success_status": "unknown",
                "progress_measure": 0.5,
                "lesson_location": "p42",
            })
        );
        assert_eq!(state.entry(), "resume");
    }
}
