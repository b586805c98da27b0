use anyhow::Result;

use dream_badminton::cli::Command;
use dream_badminton::{handle_detect, handle_import, handle_serve, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Detect { file } => handle_detect(file),
        Command::Import { file, category } => handle_import(file, *category),
    }
}
