use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skyferry::cli::Cli;
use skyferry::engine::LocalEngineBootstrap;
use skyferry::environment::AppDirs;
use skyferry::lifecycle::LifecycleManager;
use skyferry::root::RootOrchestrator;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr through tracing; user-facing output is owned
    // by the lifecycle manager so the json document on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyferry=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let lcm = Arc::new(LifecycleManager::new());
    let dirs = AppDirs::resolve();

    let report = RootOrchestrator::new(Arc::clone(&lcm), LocalEngineBootstrap, dirs)
        .execute(cli)
        .await;

    // The one place the process is allowed to end.
    report.flush_and_exit();
}
