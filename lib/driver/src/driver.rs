use std::io::Write;

use errors::{LoxError, LoxErrors};
use parser::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print every token, one per line.
    Tokenize,
    /// Parse a single expression and print it in its canonical parenthesized form.
    Parse,
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    /// Scan or parse errors. Nothing is written for `parse` in that case, `tokenize` still
    /// writes all tokens it found.
    #[error("{0}")]
    Compile(LoxErrors),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RunError {
    pub const COMPILE_ERROR_EXIT_CODE: u8 = 65;
}

pub fn run_source(command: Command, source: &str, output: &mut impl Write) -> Result<(), RunError> {
    log::debug!("Running {:?} on {} bytes of source", command, source.len());
    match command {
        Command::Tokenize => tokenize(source, output),
        Command::Parse => parse(source, output),
    }
}

pub fn tokenize(source: &str, output: &mut impl Write) -> Result<(), RunError> {
    let (tokens, errors) = scanner::scan(source);

    for token in &tokens {
        writeln!(output, "{token}")?;
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(RunError::Compile(errors.into_iter().collect()))
    }
}

pub fn parse(source: &str, output: &mut impl Write) -> Result<(), RunError> {
    let (tokens, errors) = scanner::scan(source);
    if !errors.is_empty() {
        log::debug!("Not parsing, scanner reported {} errors", errors.len());
        return Err(RunError::Compile(errors.into_iter().collect()));
    }

    let expr = Parser::new(&tokens)
        .parse()
        .map_err(|e| RunError::Compile(LoxError::from(e).into()))?;

    writeln!(output, "{expr}")?;
    Ok(())
}
