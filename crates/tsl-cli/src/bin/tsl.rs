#![allow(clippy::print_stderr)]

use clap::Parser;
use std::io::IsTerminal;

use tsl_cli::args::CliArgs;
use tsl_cli::driver;

const EXIT_SUCCESS: i32 = 0;
const EXIT_LINT_ERRORS: i32 = 1;
const EXIT_FATAL: i32 = 2;

fn main() {
    // No-op unless TSL_LOG or RUST_LOG is set.
    tsl_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let color = args
        .pretty
        .unwrap_or_else(|| std::io::stdout().is_terminal());

    let code = match driver::run(&args, color) {
        Ok(outcome) => {
            if !outcome.output.is_empty() {
                println!("{}", outcome.output);
            }
            if outcome.has_errors {
                EXIT_LINT_ERRORS
            } else {
                EXIT_SUCCESS
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            EXIT_FATAL
        }
    };
    std::process::exit(code);
}
