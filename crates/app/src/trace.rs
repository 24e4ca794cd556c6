//! Line-oriented SCORM call traces.
//!
//! ```text
//! # comment
//! LMSInitialize ""
//! LMSSetValue cmi.core.lesson_location "slide 4"
//! wait 2500
//! LMSFinish ""
//! ```

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TraceError {
    #[error("line {line}: unterminated quoted value")]
    UnterminatedQuote { line: usize },
    #[error("line {line}: wait needs a duration in milliseconds")]
    InvalidWait { line: usize },
}

/// One step of a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceStep {
    Call { method: String, args: Vec<String> },
    Wait(Duration),
}

impl TraceStep {
    /// Global API name the call is addressed to.
    #[must_use]
    pub fn target(method: &str) -> &'static str {
        if method.starts_with("LMS") {
            "API"
        } else {
            "API_1484_11"
        }
    }
}

/// Parse a whole trace file.
///
/// # Errors
///
/// Returns `TraceError` for unterminated quotes or malformed `wait` lines.
pub fn parse(source: &str) -> Result<Vec<TraceStep>, TraceError> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut tokens = tokenize(trimmed, line)?.into_iter();
        let Some(method) = tokens.next() else {
            continue;
        };
        if method == "wait" {
            let millis = tokens
                .next()
                .and_then(|raw| raw.parse::<u64>().ok())
                .ok_or(TraceError::InvalidWait { line })?;
            steps.push(TraceStep::Wait(Duration::from_millis(millis)));
        } else {
            steps.push(TraceStep::Call {
                method,
                args: tokens.collect(),
            });
        }
    }
    Ok(steps)
}

fn tokenize(line: &str, line_no: usize) -> Result<Vec<String>, TraceError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut token = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            token.push(escaped);
                        }
                    }
                    '"' => {
                        closed = true;
                        break;
                    }
                    other => token.push(other),
                }
            }
            if !closed {
                return Err(TraceError::UnterminatedQuote { line: line_no });
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_calls_waits_and_comments() {
        let steps = parse(
            "# intro\n\nLMSInitialize \"\"\nLMSSetValue cmi.core.lesson_location \"slide 4\"\nwait 250\n",
        )
        .unwrap();

        assert_eq!(
            steps,
            vec![
                TraceStep::Call {
                    method: "LMSInitialize".into(),
                    args: vec![String::new()],
                },
                TraceStep::Call {
                    method: "LMSSetValue".into(),
                    args: vec!["cmi.core.lesson_location".into(), "slide 4".into()],
                },
                TraceStep::Wait(Duration::from_millis(250)),
            ]
        );
    }

    #[test]
    fn escaped_quotes_survive() {
        let steps = parse(r#"SetValue cmi.suspend_data "{\"q\":1}""#).unwrap();
        let TraceStep::Call { args, .. } = &steps[0] else {
            panic!("expected a call");
        };
        assert_eq!(args[1], "{\"q\":1}");
    }

    #[test]
    fn malformed_lines_report_their_number() {
        assert_eq!(
            parse("Initialize \"\"\nSetValue cmi.location \"oops"),
            Err(TraceError::UnterminatedQuote { line: 2 })
        );
        assert_eq!(parse("wait soon"), Err(TraceError::InvalidWait { line: 1 }));
    }

    #[test]
    fn calls_route_by_method_prefix() {
        assert_eq!(TraceStep::target("LMSCommit"), "API");
        assert_eq!(TraceStep::target("Commit"), "API_1484_11");
    }
}
