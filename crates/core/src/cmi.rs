//! CMI data model vocabularies for the two supported SCORM versions.
//!
//! Packages address learner data with dotted string keys. These enums are the
//! typed side of that boundary: an unknown key parses to `None` and the
//! adapters treat it as a no-op.

use std::fmt;

/// SCORM runtime version, which decides the global API name a package looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScormVersion {
    Scorm12,
    Scorm2004,
}

impl ScormVersion {
    /// Name of the global object the package searches for at startup.
    #[must_use]
    pub fn global_name(self) -> &'static str {
        match self {
            Self::Scorm12 => "API",
            Self::Scorm2004 => "API_1484_11",
        }
    }
}

impl fmt::Display for ScormVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scorm12 => f.write_str("SCORM 1.2"),
            Self::Scorm2004 => f.write_str("SCORM 2004"),
        }
    }
}

/// Elements of the SCORM 1.2 `cmi` tree the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scorm12Element {
    LessonStatus,
    ScoreRaw,
    LessonLocation,
    SessionTime,
    SuspendData,
    Exit,
    Entry,
}

impl Scorm12Element {
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "cmi.core.lesson_status" => Some(Self::LessonStatus),
            "cmi.core.score.raw" => Some(Self::ScoreRaw),
            "cmi.core.lesson_location" => Some(Self::LessonLocation),
            "cmi.core.session_time" => Some(Self::SessionTime),
            "cmi.suspend_data" => Some(Self::SuspendData),
            "cmi.core.exit" => Some(Self::Exit),
            "cmi.core.entry" => Some(Self::Entry),
            _ => None,
        }
    }
}

/// Elements of the SCORM 2004 `cmi` tree the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scorm2004Element {
    CompletionStatus,
    SuccessStatus,
    ScoreScaled,
    ScoreRaw,
    ProgressMeasure,
    Location,
    SessionTime,
    SuspendData,
    Exit,
    Entry,
}

impl Scorm2004Element {
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "cmi.completion_status" => Some(Self::CompletionStatus),
            "cmi.success_status" => Some(Self::SuccessStatus),
            "cmi.score.scaled" => Some(Self::ScoreScaled),
            "cmi.score.raw" => Some(Self::ScoreRaw),
            "cmi.progress_measure" => Some(Self::ProgressMeasure),
            "cmi.location" => Some(Self::Location),
            "cmi.session_time" => Some(Self::SessionTime),
            "cmi.suspend_data" => Some(Self::SuspendData),
            "cmi.exit" => Some(Self::Exit),
            "cmi.entry" => Some(Self::Entry),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_parse_to_their_element() {
        assert_eq!(
            Scorm12Element::parse("cmi.core.lesson_status"),
            Some(Scorm12Element::LessonStatus)
        );
        assert_eq!(
            Scorm12Element::parse("cmi.suspend_data"),
            Some(Scorm12Element::SuspendData)
        );
        assert_eq!(
            Scorm2004Element::parse("cmi.location"),
            Some(Scorm2004Element::Location)
        );
    }

    #[test]
    fn version_keys_do_not_cross() {
        assert_eq!(Scorm12Element::parse("cmi.location"), None);
        assert_eq!(Scorm2004Element::parse("cmi.core.lesson_status"), None);
        assert_eq!(Scorm2004Element::parse("cmi.interactions.0.id"), None);
    }

    #[test]
    fn global_names_match_package_discovery() {
        assert_eq!(ScormVersion::Scorm12.global_name(), "API");
        assert_eq!(ScormVersion::Scorm2004.global_name(), "API_1484_11");
    }
}
