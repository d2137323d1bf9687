//! Application directory resolution.
//!
//! Job plans and logs live under `~/.skyferry` unless the corresponding
//! environment variable points somewhere else.

use std::path::PathBuf;

pub const JOB_PLAN_LOCATION_VAR: &str = "SKYFERRY_JOB_PLAN_LOCATION";
pub const LOG_LOCATION_VAR: &str = "SKYFERRY_LOG_LOCATION";

/// Filesystem locations handed to the engine bootstrap.
#[derive(Debug, Clone)]
pub struct AppDirs {
    pub job_plan_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl AppDirs {
    /// Environment overrides win; otherwise everything nests under the
    /// user's home directory.
    pub fn resolve() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let base = home.join(".skyferry");
        Self {
            job_plan_dir: std::env::var_os(JOB_PLAN_LOCATION_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| base.join("plans")),
            log_dir: std::env::var_os(LOG_LOCATION_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| base.join("logs")),
        }
    }

    /// Variables reported by `skyferry env`.
    pub fn known_variables() -> &'static [&'static str] {
        &[JOB_PLAN_LOCATION_VAR, LOG_LOCATION_VAR]
    }
}
