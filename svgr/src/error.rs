use std::fmt;
use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("path syntax error at command {command:?} (arguments {arguments:?}): {reason}")]
    PathSyntax {
	command: String,
	arguments: String,
	reason: PathSyntaxReason,
    },

    ///Malformed markup, passed through from the event scanner or found
    ///while matching open and close tags.
    #[error("malformed markup: {0}")]
    Markup(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSyntaxReason {
    UnknownCommand,
    ///Arguments appear before the first command letter.
    MissingCommand,
    WrongArgumentCount { expected: usize, found: usize },
}

impl fmt::Display for PathSyntaxReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match self {
	    PathSyntaxReason::UnknownCommand => write!(f, "unknown command"),
	    PathSyntaxReason::MissingCommand => write!(f, "arguments without a command"),
	    PathSyntaxReason::WrongArgumentCount { expected: 0, found } => {
		write!(f, "expected no arguments, found {}", found)
	    }
	    PathSyntaxReason::WrongArgumentCount { expected, found } => {
		write!(f, "expected a multiple of {} arguments, found {}", expected, found)
	    }
	}
    }
}
