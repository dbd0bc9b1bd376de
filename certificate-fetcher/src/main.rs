use certificate_fetcher::report::write_failure;
use certificate_fetcher::{Cli, FetchOrchestrator};
use clap::{CommandFactory, Parser};
use logger_redacted::{init_tracing, LoggerConfig};
use std::io;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let verbose = cli.verbose;

    let options = match cli.into_options() {
        Ok(Some(options)) => options,
        Ok(None) => {
            // A missing mandatory flag only shows usage
            let _ = Cli::command().print_help();
            return ExitCode::SUCCESS;
        }
        Err(err) => return fail(err),
    };

    if let Err(e) = init_tracing(&LoggerConfig::new(verbose)) {
        eprintln!("{}", e);
    }

    match FetchOrchestrator::new(options).run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(kind = err.kind(), "certificate download failed");
            fail(err)
        }
    }
}

fn fail(err: certificate_fetcher::FetchError) -> ExitCode {
    let mut stderr = io::stderr().lock();
    let _ = write_failure(&mut stderr, err);
    ExitCode::FAILURE
}
