//! Worker-pool sizing from host hardware concurrency.
//!
//! # Responsibilities
//! - Map the logical core count to a connection/worker pool size
//! - Carry the derived settings to the engine bootstrap
//!
//! # Design Decisions
//! - Piecewise policy: floor for weak machines, linear band, hard ceiling
//! - Pure computation; override policy lives in the root orchestrator

/// Smallest pool handed to the engine, so small VMs are never under-provisioned.
pub const MIN_CONCURRENCY: usize = 32;

/// Largest pool; guards against file-handle and socket exhaustion on big hosts.
pub const MAX_CONCURRENCY: usize = 300;

/// Pool slots granted per core inside the linear band.
const PER_CORE_FACTOR: usize = 16;

/// Map a logical core count to a worker-pool size.
///
/// Monotonic non-decreasing: [`MIN_CONCURRENCY`] for 1-4 cores, 16 per core
/// for 5-18 cores, capped at [`MAX_CONCURRENCY`] from 19 cores up.
pub fn compute_concurrency_value(core_count: usize) -> usize {
    match core_count {
        0..=4 => MIN_CONCURRENCY,
        5..=18 => PER_CORE_FACTOR * core_count,
        _ => MAX_CONCURRENCY,
    }
}

/// Concurrency parameters handed to the transfer-engine bootstrap.
///
/// Built once per invocation and consumed immediately. The tuned value is
/// derived in the constructor and never set by callers; an explicit handle
/// cap, when present, takes its place as the effective pool size.
#[derive(Debug, Clone)]
pub struct ConcurrencySettings {
    /// Logical execution units detected on the host.
    pub hardware_concurrency: usize,

    /// Operator-supplied pool override, wins over the tuned value.
    pub explicit_handle_cap: Option<usize>,

    /// Whether the engine may retune the pool while running.
    pub auto_tune: bool,

    computed_pool_size: usize,
}

impl ConcurrencySettings {
    pub fn new(
        hardware_concurrency: usize,
        explicit_handle_cap: Option<usize>,
        auto_tune: bool,
    ) -> Self {
        Self {
            hardware_concurrency,
            explicit_handle_cap,
            auto_tune,
            computed_pool_size: compute_concurrency_value(hardware_concurrency),
        }
    }

    /// Derive settings from the host's detected parallelism.
    pub fn from_host(explicit_handle_cap: Option<usize>, auto_tune: bool) -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(cores, explicit_handle_cap, auto_tune)
    }

    /// The auto-tuned pool size, always within [32, 300].
    pub fn computed_pool_size(&self) -> usize {
        self.computed_pool_size
    }

    /// Pool size the engine should use: the explicit cap when one was given,
    /// the tuned value otherwise.
    pub fn pool_size(&self) -> usize {
        self.explicit_handle_cap.unwrap_or(self.computed_pool_size)
    }
}
