//! Root orchestration.
//!
//! # Responsibilities
//! - Install the output format before anything can emit
//! - Derive concurrency settings and bootstrap the transfer engine
//! - Start the version check and race it against the shutdown ceiling
//! - Produce the invocation's terminal exit report
//!
//! # Design Decisions
//! - Fail fast: primary-path errors are fatal and reported exactly once
//! - The version check is advisory and can never change the command outcome
//! - Shutdown waits for the check at most [`SHUTDOWN_RACE_CEILING`], then
//!   abandons it

use std::sync::Arc;
use std::time::Duration;

use crate::cli::{Cli, Command};
use crate::concurrency::ConcurrencySettings;
use crate::engine::TransferEngine;
use crate::environment::AppDirs;
use crate::lifecycle::{ExitCode, ExitReport, LifecycleManager, OutputFormat};
use crate::version::{CompletionSignal, VersionMonitor};

/// Longest the shutdown path will wait for the version check. Fixed, not
/// configurable; bounds the total latency the diagnostic can ever add.
pub const SHUTDOWN_RACE_CEILING: Duration = Duration::from_secs(8);

/// Wires flags into the tuner, the engine bootstrap and the version monitor,
/// then resolves the invocation through the lifecycle manager.
pub struct RootOrchestrator<E: TransferEngine> {
    lcm: Arc<LifecycleManager>,
    engine: E,
    dirs: AppDirs,
    metadata_url: Option<String>,
}

impl<E: TransferEngine> RootOrchestrator<E> {
    pub fn new(lcm: Arc<LifecycleManager>, engine: E, dirs: AppDirs) -> Self {
        Self {
            lcm,
            engine,
            dirs,
            metadata_url: None,
        }
    }

    /// Redirect the version check at a different metadata location. Lets
    /// tests run without touching the public endpoint.
    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = Some(url.into());
        self
    }

    /// Run one invocation end to end and return its terminal report.
    pub async fn execute(self, cli: Cli) -> ExitReport {
        // The format must land in the lifecycle manager before any message,
        // including the complaint about the format flag itself.
        let format = match cli.output_type.parse::<OutputFormat>() {
            Ok(format) => format,
            Err(err) => {
                self.lcm.set_output_format(OutputFormat::default());
                self.lcm.error(err.to_string());
                return self.lcm.exit(Some(ExitCode::Failure));
            }
        };
        self.lcm.set_output_format(format);

        // Auto-tuning and performance advice only apply to benchmark runs,
        // which have no command surface here yet.
        let settings = ConcurrencySettings::from_host(cli.cap_file_handles, false);
        let cap_bits_per_sec = i64::from(cli.cap_mbps) * 1_000_000;

        if let Err(err) = self.engine.start(
            &settings,
            cap_bits_per_sec,
            &self.dirs.job_plan_dir,
            &self.dirs.log_dir,
            false,
        ) {
            self.lcm.error(err.to_string());
            return self.lcm.exit(Some(ExitCode::Failure));
        }

        let signal = self.start_version_monitor();

        let code = self.run_command(&cli);

        await_version_check(signal).await;

        self.lcm.exit(Some(code))
    }

    fn start_version_monitor(&self) -> CompletionSignal {
        let mut monitor = VersionMonitor::new(Arc::clone(&self.lcm));
        if let Some(url) = &self.metadata_url {
            monitor = monitor.with_metadata_url(url.clone());
        }
        monitor.start()
    }

    fn run_command(&self, cli: &Cli) -> ExitCode {
        match &cli.command {
            Some(Command::Env) => {
                for var in AppDirs::known_variables() {
                    let value = std::env::var(var).unwrap_or_default();
                    self.lcm.info(format!("{}={}", var, value));
                }
                ExitCode::Success
            }
            None => {
                self.lcm
                    .info("no command specified, run with --help to see available commands");
                ExitCode::Success
            }
        }
    }
}

/// Bounded shutdown race: proceed when the version check finishes or the
/// ceiling elapses, whichever comes first. A check that loses the race keeps
/// running detached, but its late output is a no-op once the lifecycle
/// manager has finalized.
pub async fn await_version_check(signal: CompletionSignal) {
    if tokio::time::timeout(SHUTDOWN_RACE_CEILING, signal.wait())
        .await
        .is_err()
    {
        tracing::debug!("version check incomplete at shutdown, abandoning it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    use crate::engine::EngineError;

    // Nothing listens on the discard port, so the check fails fast without
    // touching the network.
    const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/version-metadata.txt";

    struct RecordingEngine {
        pool_sizes: Arc<Mutex<Vec<usize>>>,
    }

    impl RecordingEngine {
        fn new() -> (Self, Arc<Mutex<Vec<usize>>>) {
            let pool_sizes = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    pool_sizes: Arc::clone(&pool_sizes),
                },
                pool_sizes,
            )
        }
    }

    impl TransferEngine for RecordingEngine {
        fn start(
            &self,
            settings: &ConcurrencySettings,
            _cap_bits_per_sec: i64,
            _job_plan_dir: &Path,
            _log_dir: &Path,
            _provide_advice: bool,
        ) -> Result<(), EngineError> {
            self.pool_sizes.lock().unwrap().push(settings.pool_size());
            Ok(())
        }
    }

    struct FailingEngine;

    impl TransferEngine for FailingEngine {
        fn start(
            &self,
            _settings: &ConcurrencySettings,
            _cap_bits_per_sec: i64,
            job_plan_dir: &Path,
            _log_dir: &Path,
            _provide_advice: bool,
        ) -> Result<(), EngineError> {
            Err(EngineError::JobPlanFolder {
                path: job_plan_dir.display().to_string(),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    fn test_dirs() -> (tempfile::TempDir, AppDirs) {
        let root = tempfile::tempdir().unwrap();
        let dirs = AppDirs {
            job_plan_dir: root.path().join("plans"),
            log_dir: root.path().join("logs"),
        };
        (root, dirs)
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_race_is_bounded_by_the_ceiling() {
        // A sender that is kept alive but never fires simulates a version
        // check stuck on an unresolvable endpoint.
        let (tx, rx) = oneshot::channel::<()>();
        let signal = CompletionSignal::new(rx);

        let started = tokio::time::Instant::now();
        await_version_check(signal).await;
        assert_eq!(started.elapsed(), SHUTDOWN_RACE_CEILING);
        drop(tx);
    }

    #[tokio::test]
    async fn shutdown_race_returns_early_when_the_check_finishes() {
        let (tx, rx) = oneshot::channel::<()>();
        tx.send(()).unwrap();
        let started = std::time::Instant::now();
        await_version_check(CompletionSignal::new(rx)).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn engine_failure_is_fatal_and_reported() {
        let (_root, dirs) = test_dirs();
        let lcm = Arc::new(LifecycleManager::new());
        let cli = Cli::parse_from(["skyferry"]);

        let report = RootOrchestrator::new(Arc::clone(&lcm), FailingEngine, dirs)
            .with_metadata_url(DEAD_ENDPOINT)
            .execute(cli)
            .await;

        assert_eq!(report.code, 1);
        assert!(report.stderr.contains("job plan folder"));
    }

    #[tokio::test]
    async fn invalid_output_type_fails_before_the_engine_starts() {
        let (_root, dirs) = test_dirs();
        let lcm = Arc::new(LifecycleManager::new());
        let cli = Cli::parse_from(["skyferry", "--output-type", "yaml"]);

        let report = RootOrchestrator::new(Arc::clone(&lcm), FailingEngine, dirs)
            .with_metadata_url(DEAD_ENDPOINT)
            .execute(cli)
            .await;

        assert_eq!(report.code, 1);
        assert!(report.stderr.contains("unknown output type 'yaml'"));
        // FailingEngine would have produced a folder complaint
        assert!(!report.stderr.contains("job plan folder"));
    }

    #[tokio::test]
    async fn explicit_handle_cap_reaches_the_engine() {
        let (_root, dirs) = test_dirs();
        let lcm = Arc::new(LifecycleManager::new());
        let (engine, pool_sizes) = RecordingEngine::new();
        let cli = Cli::parse_from(["skyferry", "--cap-file-handles", "48"]);

        let report = RootOrchestrator::new(Arc::clone(&lcm), engine, dirs)
            .with_metadata_url(DEAD_ENDPOINT)
            .execute(cli)
            .await;

        assert_eq!(report.code, 0);
        assert_eq!(*pool_sizes.lock().unwrap(), vec![48]);
    }

    #[tokio::test]
    async fn env_command_reports_known_variables() {
        let (_root, dirs) = test_dirs();
        let lcm = Arc::new(LifecycleManager::new());
        let (engine, _) = RecordingEngine::new();
        let cli = Cli::parse_from(["skyferry", "env"]);

        let report = RootOrchestrator::new(Arc::clone(&lcm), engine, dirs)
            .with_metadata_url(DEAD_ENDPOINT)
            .execute(cli)
            .await;

        assert_eq!(report.code, 0);
        assert!(report.stdout.contains("SKYFERRY_JOB_PLAN_LOCATION="));
        assert!(report.stdout.contains("SKYFERRY_LOG_LOCATION="));
    }
}
