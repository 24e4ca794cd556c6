//! SCORM 2004 runtime API (`window.API_1484_11`).

use std::sync::Arc;

use scorm_core::model::{CompletionStatus, ProgressState, SuccessStatus, format_real, parse_real};
use scorm_core::{Scorm2004Element, ScormVersion};
use tracing::debug;

use crate::runtime::{ScormRuntime, arg};
use crate::session::{BridgeSession, Effects};

const TRUE: &str = "true";
const NO_ERROR: &str = "0";

/// The `Initialize`/`Terminate`/`GetValue`/`SetValue` method set of SCORM 2004.
///
/// Completion and mastery are tracked separately: `cmi.completion_status`
/// and `cmi.success_status` each notify the host on their own.
pub struct Scorm2004Api {
    session: Arc<BridgeSession>,
}

impl Scorm2004Api {
    pub(crate) fn new(session: Arc<BridgeSession>) -> Self {
        Self { session }
    }

    pub fn initialize(&self, _param: &str) -> String {
        self.session.initialize(ScormVersion::Scorm2004);
        TRUE.into()
    }

    pub fn terminate(&self, _param: &str) -> String {
        self.session.terminate(ScormVersion::Scorm2004);
        TRUE.into()
    }

    pub fn get_value(&self, key: &str) -> String {
        let Some(element) = Scorm2004Element::parse(key) else {
            debug!(key, "GetValue for unsupported element");
            return String::new();
        };
        self.session.read(key, |state| read(state, element))
    }

    pub fn set_value(&self, key: &str, value: &str) -> String {
        debug!(key, value, "SetValue");
        let element = Scorm2004Element::parse(key);
        self.session.write(key, |state| match element {
            Some(element) => write(state, element, value),
            None => Effects::none(),
        });
        TRUE.into()
    }

    pub fn commit(&self, _param: &str) -> String {
        self.session.commit();
        TRUE.into()
    }

    pub fn get_last_error(&self) -> String {
        NO_ERROR.into()
    }

    pub fn get_error_string(&self, _code: &str) -> String {
        String::new()
    }

    pub fn get_diagnostic(&self, _code: &str) -> String {
        String::new()
    }
}

fn read(state: &ProgressState, element: Scorm2004Element) -> String {
    match element {
        Scorm2004Element::CompletionStatus => {
            state.completion_status().as_scorm2004().to_string()
        }
        Scorm2004Element::SuccessStatus => state.success_status().as_str().to_string(),
        Scorm2004Element::ScoreScaled => state.score_scaled().map(format_real).unwrap_or_default(),
        Scorm2004Element::ScoreRaw => state.score_raw().map(format_real).unwrap_or_default(),
        Scorm2004Element::ProgressMeasure => format_real(state.progress_measure()),
        Scorm2004Element::Location => state.lesson_location().unwrap_or_default().to_string(),
        Scorm2004Element::SessionTime => state.session_time().unwrap_or_default().to_string(),
        Scorm2004Element::SuspendData => state.suspend_data().unwrap_or_default().to_string(),
        Scorm2004Element::Exit => state.exit().unwrap_or_default().to_string(),
        Scorm2004Element::Entry => state.entry().to_string(),
    }
}

fn write(state: &mut ProgressState, element: Scorm2004Element, value: &str) -> Effects {
    match element {
        Scorm2004Element::CompletionStatus => match value.parse::<CompletionStatus>() {
            Ok(status) => {
                state.set_completion_status(status);
                if status.is_finished() {
                    state.set_progress_measure(1.0);
                    Effects::finished()
                } else {
                    Effects::none()
                }
            }
            Err(err) => {
                debug!(error = %err, "ignored completion status");
                Effects::none()
            }
        },
        Scorm2004Element::SuccessStatus => match value.parse::<SuccessStatus>() {
            Ok(status) => {
                state.set_success_status(status);
                if status == SuccessStatus::Passed {
                    Effects::mastered()
                } else {
                    Effects::none()
                }
            }
            Err(err) => {
                debug!(error = %err, "ignored success status");
                Effects::none()
            }
        },
        Scorm2004Element::ScoreScaled => match parse_real(value) {
            Some(scaled) => {
                let scaled = state.set_score_scaled(scaled);
                state.set_progress_measure(scaled);
                Effects::progress(state.percent())
            }
            None => {
                debug!(value, "ignored non-numeric scaled score");
                Effects::none()
            }
        },
        Scorm2004Element::ScoreRaw => {
            match parse_real(value) {
                Some(raw) => {
                    state.set_score_raw(raw);
                }
                None => debug!(value, "ignored non-numeric raw score"),
            }
            Effects::none()
        }
        Scorm2004Element::ProgressMeasure => match parse_real(value) {
            Some(measure) => {
                state.set_progress_measure(measure);
                Effects::progress(state.percent())
            }
            None => {
                debug!(value, "ignored non-numeric progress measure");
                Effects::none()
            }
        },
        Scorm2004Element::Location => {
            state.set_lesson_location(value);
            Effects::none()
        }
        Scorm2004Element::SessionTime => {
            state.set_session_time(value);
            Effects::none()
        }
        Scorm2004Element::SuspendData => {
            state.set_suspend_data(value);
            Effects::none()
        }
        Scorm2004Element::Exit => {
            state.set_exit(value);
            Effects::none()
        }
        Scorm2004Element::Entry => {
            debug!("ignored write to read-only cmi.entry");
            Effects::none()
        }
    }
}

impl ScormRuntime for Scorm2004Api {
    fn version(&self) -> ScormVersion {
        ScormVersion::Scorm2004
    }

    fn invoke(&self, method: &str, args: &[&str]) -> String {
        match method {
            "Initialize" => self.initialize(arg(args, 0)),
            "Terminate" => self.terminate(arg(args, 0)),
            "GetValue" => self.get_value(arg(args, 0)),
            "SetValue" => self.set_value(arg(args, 0), arg(args, 1)),
            "Commit" => self.commit(arg(args, 0)),
            "GetLastError" => self.get_last_error(),
            "GetErrorString" => self.get_error_string(arg(args, 0)),
            "GetDiagnostic" => self.get_diagnostic(arg(args, 0)),
            other => {
                debug!(method = other, "unknown SCORM 2004 method");
                "false".into()
            }
        }
    }
}
