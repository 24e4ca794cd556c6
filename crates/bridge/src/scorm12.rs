//! SCORM 1.2 runtime API (`window.API`).

use std::sync::Arc;

use scorm_core::model::{CompletionStatus, ProgressState, format_real, parse_real};
use scorm_core::{Scorm12Element, ScormVersion};
use tracing::debug;

use crate::runtime::{ScormRuntime, arg};
use crate::session::{BridgeSession, Effects};

const TRUE: &str = "true";
const NO_ERROR: &str = "0";

/// The `LMS*` method set a SCORM 1.2 package calls.
pub struct Scorm12Api {
    session: Arc<BridgeSession>,
}

impl Scorm12Api {
    pub(crate) fn new(session: Arc<BridgeSession>) -> Self {
        Self { session }
    }

    pub fn lms_initialize(&self, _param: &str) -> String {
        self.session.initialize(ScormVersion::Scorm12);
        TRUE.into()
    }

    /// Ends the session with an immediate write of the final state.
    pub fn lms_finish(&self, _param: &str) -> String {
        self.session.terminate(ScormVersion::Scorm12);
        TRUE.into()
    }

    pub fn lms_get_value(&self, key: &str) -> String {
        let Some(element) = Scorm12Element::parse(key) else {
            debug!(key, "LMSGetValue for unsupported element");
            return String::new();
        };
        self.session.read(key, |state| read(state, element))
    }

    pub fn lms_set_value(&self, key: &str, value: &str) -> String {
        debug!(key, value, "LMSSetValue");
        let element = Scorm12Element::parse(key);
        self.session.write(key, |state| match element {
            Some(element) => write(state, element, value),
            None => Effects::none(),
        });
        TRUE.into()
    }

    pub fn lms_commit(&self, _param: &str) -> String {
        self.session.commit();
        TRUE.into()
    }

    pub fn lms_get_last_error(&self) -> String {
        NO_ERROR.into()
    }

    pub fn lms_get_error_string(&self, _code: &str) -> String {
        String::new()
    }

    pub fn lms_get_diagnostic(&self, _code: &str) -> String {
        String::new()
    }
}

fn read(state: &ProgressState, element: Scorm12Element) -> String {
    match element {
        Scorm12Element::LessonStatus => state.completion_status().as_scorm12().to_string(),
        Scorm12Element::ScoreRaw => state.score_raw().map(format_real).unwrap_or_default(),
        Scorm12Element::LessonLocation => state.lesson_location().unwrap_or_default().to_string(),
        Scorm12Element::SessionTime => state.session_time().unwrap_or_default().to_string(),
        Scorm12Element::SuspendData => state.suspend_data().unwrap_or_default().to_string(),
        Scorm12Element::Exit => state.exit().unwrap_or_default().to_string(),
        Scorm12Element::Entry => state.entry().to_string(),
    }
}

fn write(state: &mut ProgressState, element: Scorm12Element, value: &str) -> Effects {
    match element {
        Scorm12Element::LessonStatus => match value.parse::<CompletionStatus>() {
            Ok(status) => {
                state.set_completion_status(status);
                state.set_success_status(status.implied_success());
                if status.is_finished() {
                    state.set_progress_measure(1.0);
                    Effects::finished()
                } else {
                    Effects::none()
                }
            }
            Err(err) => {
                debug!(error = %err, "ignored lesson status");
                Effects::none()
            }
        },
        Scorm12Element::ScoreRaw => match parse_real(value) {
            Some(raw) => {
                let raw = state.set_score_raw(raw);
                state.set_progress_measure(raw / 100.0);
                Effects::progress(state.percent())
            }
            None => {
                debug!(value, "ignored non-numeric raw score");
                Effects::none()
            }
        },
        Scorm12Element::LessonLocation => {
            state.set_lesson_location(value);
            Effects::none()
        }
        Scorm12Element::SessionTime => {
            state.set_session_time(value);
            Effects::none()
        }
        Scorm12Element::SuspendData => {
            state.set_suspend_data(value);
            Effects::none()
        }
        Scorm12Element::Exit => {
            state.set_exit(value);
            Effects::none()
        }
        Scorm12Element::Entry => {
            debug!("ignored write to read-only cmi.core.entry");
            Effects::none()
        }
    }
}

impl ScormRuntime for Scorm12Api {
    fn version(&self) -> ScormVersion {
        ScormVersion::Scorm12
    }

    fn invoke(&self, method: &str, args: &[&str]) -> String {
        match method {
            "LMSInitialize" => self.lms_initialize(arg(args, 0)),
            "LMSFinish" => self.lms_finish(arg(args, 0)),
            "LMSGetValue" => self.lms_get_value(arg(args, 0)),
            "LMSSetValue" => self.lms_set_value(arg(args, 0), arg(args, 1)),
            "LMSCommit" => self.lms_commit(arg(args, 0)),
            "LMSGetLastError" => self.lms_get_last_error(),
            "LMSGetErrorString" => self.lms_get_error_string(arg(args, 0)),
            "LMSGetDiagnostic" => self.lms_get_diagnostic(arg(args, 0)),
            other => {
                debug!(method = other, "unknown SCORM 1.2 method");
                "false".into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_lesson_status_is_not_completion() {
        let mut state = ProgressState::new();
        let effects = write(&mut state, Scorm12Element::LessonStatus, "failed");
        assert_eq!(effects, Effects::none());
        assert_eq!(state.success_status().as_str(), "failed");
        assert_eq!(state.progress_measure(), 0.0);
    }

    #[test]
    fn passed_lesson_status_finishes_content() {
        let mut state = ProgressState::new();
        let effects = write(&mut state, Scorm12Element::LessonStatus, "passed");
        assert_eq!(effects, Effects::finished());
        assert_eq!(state.progress_measure(), 1.0);
        assert!(state.is_complete());
    }

    #[test]
    fn raw_score_drives_progress() {
        let mut state = ProgressState::new();
        assert_eq!(
            write(&mut state, Scorm12Element::ScoreRaw, "42"),
            Effects::progress(42)
        );
        assert_eq!(read(&state, Scorm12Element::ScoreRaw), "42");
        assert_eq!(
            write(&mut state, Scorm12Element::ScoreRaw, "-5"),
            Effects::progress(0)
        );
    }

    #[test]
    fn malformed_values_leave_state_alone() {
        let mut state = ProgressState::new();
        write(&mut state, Scorm12Element::ScoreRaw, "ninety");
        write(&mut state, Scorm12Element::LessonStatus, "done");
        assert_eq!(state, ProgressState::new());
    }

    #[test]
    fn entry_reflects_bookmark() {
        let mut state = ProgressState::new();
        assert_eq!(read(&state, Scorm12Element::Entry), "ab-initio");
        write(&mut state, Scorm12Element::Entry, "resume");
        assert_eq!(read(&state, Scorm12Element::Entry), "ab-initio");
        write(&mut state, Scorm12Element::LessonLocation, "slide-3");
        assert_eq!(read(&state, Scorm12Element::Entry), "resume");
    }
}
