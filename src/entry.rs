//! Binary entry point: argument parsing, plan construction, and exit-code
//! mapping.
use std::process::ExitCode;

use clap::Parser;

use crate::app;
use crate::args::HarnessArgs;
use crate::config::{build_plan, load_config};
use crate::error::AppResult;

/// Exit code for startup and configuration failures; threshold failures
/// exit with 1.
const CONFIG_ERROR_EXIT: u8 = 2;

#[must_use]
pub fn run() -> ExitCode {
    let args = HarnessArgs::parse();
    crate::logger::init_logging(args.verbose);

    match execute(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(CONFIG_ERROR_EXIT)
        }
    }
}

fn execute(args: &HarnessArgs) -> AppResult<bool> {
    let config = load_config(args.config.as_deref())?;
    let plan = build_plan(args, config.as_ref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(app::run(plan))?;

    // The summary is the only thing written to stdout.
    println!("{}", report.document.render()?);
    Ok(report.passed)
}
