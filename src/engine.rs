//! Transfer-engine bootstrap seam.
//!
//! The scheduler itself (job planning, chunking, data-operation retries)
//! lives outside this crate. Startup only needs a bootstrap it can hand the
//! derived concurrency settings, the throughput cap and the storage paths.

use std::path::Path;
use thiserror::Error;

use crate::concurrency::ConcurrencySettings;

/// Errors raised while bringing the engine up. All of them are fatal for
/// the invocation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot create job plan folder '{path}': {source}")]
    JobPlanFolder {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create log folder '{path}': {source}")]
    LogFolder {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bootstrap entry point of the transfer engine.
pub trait TransferEngine {
    /// Bring the engine up before any command logic runs.
    fn start(
        &self,
        settings: &ConcurrencySettings,
        cap_bits_per_sec: i64,
        job_plan_dir: &Path,
        log_dir: &Path,
        provide_advice: bool,
    ) -> Result<(), EngineError>;
}

/// Bootstrap for the in-process engine: prepares the storage folders and
/// records the negotiated pool size.
pub struct LocalEngineBootstrap;

impl TransferEngine for LocalEngineBootstrap {
    fn start(
        &self,
        settings: &ConcurrencySettings,
        cap_bits_per_sec: i64,
        job_plan_dir: &Path,
        log_dir: &Path,
        provide_advice: bool,
    ) -> Result<(), EngineError> {
        std::fs::create_dir_all(job_plan_dir).map_err(|source| EngineError::JobPlanFolder {
            path: job_plan_dir.display().to_string(),
            source,
        })?;
        std::fs::create_dir_all(log_dir).map_err(|source| EngineError::LogFolder {
            path: log_dir.display().to_string(),
            source,
        })?;

        tracing::info!(
            pool_size = settings.pool_size(),
            hardware_concurrency = settings.hardware_concurrency,
            auto_tune = settings.auto_tune,
            cap_bits_per_sec,
            provide_advice,
            "transfer engine ready"
        );
        Ok(())
    }
}
