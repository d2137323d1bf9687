//! Background check for a newer released version.
//!
//! # Responsibilities
//! - Fetch the published latest-version string without blocking the caller
//! - Emit at most one upgrade advisory through the lifecycle manager
//!
//! # Design Decisions
//! - Best effort: every failure aborts silently, the user's command is never
//!   affected
//! - The spawned task owns all network work, so an unreachable endpoint can
//!   never block the main flow; the caller races the completion signal
//!   against its shutdown ceiling and abandons the task if it loses
//! - The signal fires on every exit path, success, failure and early skip
//!   alike

use std::sync::Arc;
use tokio::sync::oneshot;
use url::Url;

use crate::lifecycle::LifecycleManager;
use crate::version::pipeline::{AnonymousPipeline, CredentialKind};
use crate::version::semver::Version;

/// Well-known location of the version metadata document. Its first line is
/// the authoritative latest-version string; later lines are reserved.
pub const VERSION_METADATA_URL: &str = "https://releases.skyferry.io/latest/version-metadata.txt";

/// One-shot completion token for the version check.
///
/// Observed once, at shutdown. Once fired it stays fired; a task that was
/// torn down without sending also resolves the waiter.
pub struct CompletionSignal {
    rx: oneshot::Receiver<()>,
}

impl CompletionSignal {
    pub(crate) fn new(rx: oneshot::Receiver<()>) -> Self {
        Self { rx }
    }

    /// Wait until the monitor task has finished, however it finished.
    pub async fn wait(self) {
        let _ = self.rx.await;
    }
}

/// Fetches and compares version metadata on a background task.
pub struct VersionMonitor {
    lcm: Arc<LifecycleManager>,
    metadata_url: String,
    local_version: String,
}

impl VersionMonitor {
    pub fn new(lcm: Arc<LifecycleManager>) -> Self {
        Self {
            lcm,
            metadata_url: VERSION_METADATA_URL.to_string(),
            local_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Point the monitor at a different metadata location. Lets tests
    /// simulate unreachable or misbehaving endpoints.
    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = url.into();
        self
    }

    /// Override the compiled-in version the remote string is compared to.
    pub fn with_local_version(mut self, version: impl Into<String>) -> Self {
        self.local_version = version.into();
        self
    }

    /// Spawn the check and return immediately.
    pub fn start(self) -> CompletionSignal {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            self.detect_newer_version().await;
            let _ = tx.send(());
        });
        CompletionSignal::new(rx)
    }

    async fn detect_newer_version(&self) {
        // A constrained environment without a usable stderr means diagnostics
        // should not run at all.
        if !stderr_is_probeable() {
            return;
        }

        let Ok(pipeline) = AnonymousPipeline::open(CredentialKind::Anonymous) else {
            return;
        };

        let Ok(url) = Url::parse(&self.metadata_url) else {
            return;
        };

        let Some(remote_raw) = pipeline.download_first_line(&url).await else {
            return;
        };

        let Ok(local) = self.local_version.parse::<Version>() else {
            return;
        };
        let Ok(remote) = remote_raw.parse::<Version>() else {
            return;
        };

        if local.older_than(remote) {
            self.lcm.info(format!(
                "{}: a newer version {} is available to download",
                executable_name(),
                remote_raw
            ));
        }
    }
}

/// Stat the stderr handle. `Stderr` is unbuffered, so a flush is infallible
/// and cannot detect a closed or invalid descriptor; the stat can.
#[cfg(unix)]
fn stderr_is_probeable() -> bool {
    use std::os::fd::AsFd;

    match std::io::stderr().as_fd().try_clone_to_owned() {
        Ok(fd) => std::fs::File::from(fd).metadata().is_ok(),
        Err(_) => false,
    }
}

#[cfg(windows)]
fn stderr_is_probeable() -> bool {
    use std::os::windows::io::AsHandle;

    match std::io::stderr().as_handle().try_clone_to_owned() {
        Ok(handle) => std::fs::File::from(handle).metadata().is_ok(),
        Err(_) => false,
    }
}

#[cfg(not(any(unix, windows)))]
fn stderr_is_probeable() -> bool {
    true
}

/// Final path segment of argv[0], with Windows separators normalized.
fn executable_name() -> String {
    match std::env::args().next() {
        Some(argv0) => {
            let normalized = argv0.replace('\\', "/");
            normalized
                .rsplit('/')
                .next()
                .unwrap_or(&normalized)
                .to_string()
        }
        None => env!("CARGO_PKG_NAME").to_string(),
    }
}
