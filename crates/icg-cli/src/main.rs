//! Binary entrypoint for the icg command-line tool.
use clap::Parser;
use icg_cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .init();

    let cli = Cli::parse();
    run(cli, &mut std::io::stdout(), &mut std::io::stderr())
}
