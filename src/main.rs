mod cli;

use std::process::ExitCode;

use colored::Colorize;

fn main() -> ExitCode {
    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.init_tracing();
    match command_line_interface.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if let Some(usage) = error.downcast_ref::<cli::UsageError>() {
                eprintln!("{usage}");
            } else {
                eprintln!("{} {error:#}", "❌ failed:".red().bold());
            }
            ExitCode::FAILURE
        }
    }
}
