use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

use cursor::Line;
use itertools::Itertools;

/// A single diagnostic, rendered the way it's reported on stderr.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error: {message}")]
pub struct LoxError {
    pub line: Line,
    pub message: String,
}

impl LoxError {
    pub fn new(line: Line, message: impl ToString) -> Self {
        Self { line, message: message.to_string() }
    }
}

/// All diagnostics collected during one run, in the order they were reported.
#[derive(thiserror::Error, Clone, Debug, Default, PartialEq)]
pub struct LoxErrors(pub Vec<LoxError>);

impl From<LoxError> for LoxErrors {
    fn from(e: LoxError) -> Self {
        Self(vec![e])
    }
}

impl<E: Into<LoxError>> FromIterator<E> for LoxErrors {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<E: Into<LoxError>> Extend<E> for LoxErrors {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into))
    }
}

impl Deref for LoxErrors {
    type Target = Vec<LoxError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for LoxErrors {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for LoxErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}
