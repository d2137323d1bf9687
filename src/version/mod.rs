//! Version metadata: parsing, download pipeline and the background monitor.

pub mod monitor;
pub mod pipeline;
pub mod semver;

pub use monitor::{CompletionSignal, VersionMonitor, VERSION_METADATA_URL};
pub use pipeline::{AnonymousPipeline, CredentialKind, MAX_BODY_READ_RETRIES};
pub use semver::{ParseVersionError, Version};
