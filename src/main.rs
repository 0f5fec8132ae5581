use std::path::Path;
use std::process::ExitCode;

use apopt_client::cli::{self, Cli};
use apopt_client::infrastructure::{files, logging};
use apopt_client::{HttpTransport, SessionDriver};
use clap::{CommandFactory, Parser};
use tracing::{debug, error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let normalized = cli::normalize_args(std::env::args());
    let cli = Cli::parse_from(normalized.args);
    logging::init_logging(cli.verbose);

    for flag in &normalized.ignored {
        debug!(flag = %flag, "ignoring unrecognized flag");
    }

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "solve failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = cli.config();

    if cli.show_defaults {
        print!("{}", cli::render_defaults(&config.options));
    }

    if cli.test {
        files::write_test_model(Path::new("."))?;
    }

    let Some(stub) = cli.stub() else {
        if !cli.show_defaults && !cli.test {
            Cli::command().print_help()?;
            return Ok(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    };

    let transport = HttpTransport::new(&config)?;
    let driver =
        SessionDriver::new(transport, &config).on_solve_output(|output| println!("{}", output));
    let report = driver.run(&stub).await?;

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        let failed: Vec<String> = report.failed_steps.iter().map(|s| s.to_string()).collect();
        warn!(steps = %failed.join(", "), "run completed with failed steps");
        Ok(ExitCode::FAILURE)
    }
}
