//! Output rendering for the lifecycle manager.
//!
//! Messages are buffered until exit, then rendered either as plain lines
//! (info to stdout, errors to stderr) or as a single JSON document that
//! summarizes every message plus the final exit code.

use serde::Serialize;
use std::io::Write;
use thiserror::Error;

/// Rendering mode for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Raised when the `--output-type` flag names an unknown format.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown output type '{0}', expected 'text' or 'json'")]
pub struct ParseOutputFormatError(String);

impl std::str::FromStr for OutputFormat {
    type Err = ParseOutputFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("text") {
            Ok(OutputFormat::Text)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(OutputFormat::Json)
        } else {
            Err(ParseOutputFormatError(s.to_string()))
        }
    }
}

/// Message channel, also the JSON `severity` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

/// One buffered user-facing message.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

/// Two-valued exit code set; `Failure` is implied by any buffered error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    Failure,
}

impl ExitCode {
    pub fn value(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::Failure => 1,
        }
    }
}

/// Terminal value of one invocation.
///
/// Rendered output plus the resolved code, handed up to the driver. Nothing
/// below `main` terminates the process.
#[derive(Debug)]
pub struct ExitReport {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExitReport {
    /// Flush the rendered output and end the process. Called exactly once,
    /// by the top-level driver.
    pub fn flush_and_exit(self) -> ! {
        if !self.stdout.is_empty() {
            let mut out = std::io::stdout();
            let _ = out.write_all(self.stdout.as_bytes());
            let _ = out.flush();
        }
        if !self.stderr.is_empty() {
            let mut err = std::io::stderr();
            let _ = err.write_all(self.stderr.as_bytes());
            let _ = err.flush();
        }
        std::process::exit(self.code)
    }
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    messages: &'a [Message],
    exit_code: i32,
}

pub(crate) fn render(format: OutputFormat, messages: Vec<Message>, code: ExitCode) -> ExitReport {
    match format {
        OutputFormat::Text => {
            let mut stdout = String::new();
            let mut stderr = String::new();
            for message in &messages {
                let channel = match message.severity {
                    Severity::Info => &mut stdout,
                    Severity::Error => &mut stderr,
                };
                channel.push_str(&message.text);
                channel.push('\n');
            }
            ExitReport {
                code: code.value(),
                stdout,
                stderr,
            }
        }
        OutputFormat::Json => {
            let summary = JsonSummary {
                messages: &messages,
                exit_code: code.value(),
            };
            let mut doc =
                serde_json::to_string(&summary).expect("message summary serializes to JSON");
            doc.push('\n');
            ExitReport {
                code: code.value(),
                stdout: doc,
                stderr: String::new(),
            }
        }
    }
}
