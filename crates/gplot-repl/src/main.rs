//! gplot - line-oriented plotting shell.

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = gplot_repl::Cli::parse();
    match gplot_repl::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("gplot: {}", e);
            ExitCode::FAILURE
        }
    }
}
