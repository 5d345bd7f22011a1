use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use idem_pay::config::{Cli, Command};
use idem_pay::csv::OutcomeWriter;
use idem_pay::error::AppError;
use idem_pay::{replay, server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Serve(config) => server::serve(config).await,
        Command::Replay(config) => {
            let mut writer = OutcomeWriter::stdout();
            replay::replay(&config, &mut writer).await.map(|_| ())
        }
    }
}
