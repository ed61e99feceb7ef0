use gestor::cli::{self, parse_args};
use gestor::cli_output::icons;
use gestor::config::{log_filter_from_env, AppConfig};

use clap::error::ErrorKind;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Logs go to stderr so tables on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter_from_env()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = AppConfig::from_env();

    let command = match parse_args(std::env::args_os()) {
        Ok(command) => command,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                eprint!("{err}");
                std::process::exit(2);
            }
        },
    };

    if let Err(e) = cli::run(command, &config).await {
        eprintln!("{} {}", icons::FAILURE, e);
        std::process::exit(1);
    }
    Ok(())
}
