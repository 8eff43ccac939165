use std::{
    io::{stderr, stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;

use driver::{Command, RunError};

#[derive(clap::Parser)]
#[command(about = "Tokenize or parse Lox expressions")]
struct Args {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Print the tokens of a source file, one per line
    Tokenize { file: PathBuf },
    /// Parse a source file as a single expression and print its syntax tree
    Parse { file: PathBuf },
}

impl CliCommand {
    fn split(self) -> (Command, PathBuf) {
        match self {
            CliCommand::Tokenize { file } => (Command::Tokenize, file),
            CliCommand::Parse { file } => (Command::Parse, file),
        }
    }
}

fn run_file(command: Command, path: PathBuf) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("Could not read file {}", path.display()))?;

    let mut output = stdout().lock();
    let result = driver::run_source(command, &source, &mut output);
    output.flush()?;

    let code = exit_code(result, &mut stderr().lock())?;
    Ok(ExitCode::from(code))
}

/// Maps the outcome of a run to the process exit code, reporting diagnostics on `stderr`.
/// I/O failures aren't diagnostics and are passed on.
fn exit_code(result: Result<(), RunError>, stderr: &mut impl Write) -> anyhow::Result<u8> {
    match result {
        Ok(()) => Ok(0),
        Err(RunError::Compile(errors)) => {
            writeln!(stderr, "{errors}")?;
            Ok(RunError::COMPILE_ERROR_EXIT_CODE)
        }
        Err(e @ RunError::Io(_)) => Err(e.into()),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let (command, file) = Args::parse().command.split();

    log::debug!("Running {:?} on {}", command, file.display());
    run_file(command, file)
}
