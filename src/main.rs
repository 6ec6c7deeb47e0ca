//! layers - Resolve dependency sets into ordered layers

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = dep_layers::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
