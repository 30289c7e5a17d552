// Entrypoint for `jobbot-monitor`: manage watch criteria and the backend's
// background monitor.

use clap::Parser;
use job_bot_cli::cli::MonitorCli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    MonitorCli::parse().run()
}
