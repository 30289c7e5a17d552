// Entrypoint for `jobbot`.
// - Keeps `main` small: set up logging, parse arguments, run one command.
// - Logging goes to stderr and is silent unless `RUST_LOG` is set.

use clap::Parser;
use job_bot_cli::cli::JobBotCli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    JobBotCli::parse().run()
}
