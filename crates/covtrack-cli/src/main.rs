use clap::Parser;

mod cli;
pub mod exit_codes;

use cli::args::{Cli, LogFormat};
use cli::commands::dispatch;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.log_format);

    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            let code = exit_codes::for_error(&e);
            if code == exit_codes::CLIENT_ERROR {
                eprintln!("error: {e:#}");
            } else {
                tracing::error!(error = ?e, "Command failed");
                eprintln!("error: Internal error");
            }
            code
        }
    };
    std::process::exit(code);
}
