mod app;
mod catalog;
mod cli;
mod effects;
mod render;

use std::process::ExitCode;

use clap::Parser;
use engine_logging::engine_error;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    engine_logging::initialize(args.log_settings());

    match app::run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            engine_error!("{:#}", err);
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
