use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use colombia_tax_engine::cli::{Args, init_logging, run};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = ?err, "Tax calculation failed");
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
