//! skyferry startup orchestration.
//!
//! # Architecture Overview
//!
//! ```text
//!   flags ──▶ root orchestrator ──▶ concurrency tuner ──▶ engine bootstrap
//!                    │
//!                    ├──▶ version monitor ──▶ advisory ──▶ lifecycle manager
//!                    │        (background task)                  │
//!                    └──▶ bounded 8 s race ◀─────────────────────┘
//!                                 │
//!                                 ▼
//!                     lifecycle exit → ExitReport → main terminates
//! ```
//!
//! The transfer engine itself (job scheduling, chunking, data-operation
//! retries) is an external collaborator behind the [`engine::TransferEngine`]
//! seam.

pub mod cli;
pub mod concurrency;
pub mod engine;
pub mod environment;
pub mod lifecycle;
pub mod root;
pub mod version;

pub use concurrency::{compute_concurrency_value, ConcurrencySettings};
pub use lifecycle::LifecycleManager;
pub use root::{RootOrchestrator, SHUTDOWN_RACE_CEILING};
pub use version::{CompletionSignal, Version, VersionMonitor};
