//! The process-wide lifecycle manager.

use std::sync::{Mutex, MutexGuard};

use crate::lifecycle::output::{render, ExitCode, ExitReport, Message, OutputFormat, Severity};

/// Buffers user-facing messages and resolves the process exit code.
///
/// One instance per invocation, shared by reference between the main flow
/// and the version-check task. All mutation goes through an interior mutex,
/// so callers never coordinate among themselves. The output format must be
/// installed before the first message; emitting without a format is a
/// programming error and panics.
pub struct LifecycleManager {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    format: Option<OutputFormat>,
    messages: Vec<Message>,
    failed: bool,
    finalized: bool,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Install the rendering mode. Exactly once, before any message.
    pub fn set_output_format(&self, format: OutputFormat) {
        let mut state = self.lock();
        assert!(state.format.is_none(), "output format installed twice");
        state.format = Some(format);
    }

    /// Append an informational message.
    pub fn info(&self, text: impl Into<String>) {
        self.append(Severity::Info, text.into());
    }

    /// Append an error message and mark the pending exit code as failure.
    pub fn error(&self, text: impl Into<String>) {
        self.append(Severity::Error, text.into());
    }

    /// Resolve the exit code, render everything buffered and hand back the
    /// terminal report.
    ///
    /// Without an explicit code the result is implied by whether [`error`]
    /// was ever called. After this, late appends from an abandoned
    /// background task become no-ops.
    ///
    /// [`error`]: LifecycleManager::error
    pub fn exit(&self, code: Option<ExitCode>) -> ExitReport {
        let mut state = self.lock();
        state.finalized = true;
        let resolved = code.unwrap_or(if state.failed {
            ExitCode::Failure
        } else {
            ExitCode::Success
        });
        let format = state.format.unwrap_or_default();
        let messages = std::mem::take(&mut state.messages);
        render(format, messages, resolved)
    }

    fn append(&self, severity: Severity, text: String) {
        let mut state = self.lock();
        if state.finalized {
            return;
        }
        assert!(
            state.format.is_some(),
            "message emitted before the output format was set"
        );
        if severity == Severity::Error {
            state.failed = true;
        }
        state.messages.push(Message { severity, text });
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("lifecycle state lock poisoned")
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}
