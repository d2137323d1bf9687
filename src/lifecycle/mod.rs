//! Process lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! Command flow / version check:
//!     set_output_format → info/error (buffered, serialized internally)
//!
//! Shutdown:
//!     exit(code) → resolve code → render buffered messages → ExitReport
//!     ExitReport reaches main, which flushes and terminates
//! ```
//!
//! # Design Decisions
//! - One shared instance per invocation, mutation behind an interior mutex
//! - Output is buffered until exit: plain lines in text mode, one JSON
//!   document in json mode
//! - Exit produces a terminal value; only `main` ends the process

pub mod manager;
pub mod output;

pub use manager::LifecycleManager;
pub use output::{ExitCode, ExitReport, Message, OutputFormat, ParseOutputFormatError, Severity};
