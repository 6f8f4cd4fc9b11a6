use thiserror::Error;

use svgr::Color;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodegenError {
    ///The title is empty or has nothing to build an identifier from.
    #[error("document title does not yield an identifier")]
    InvalidTitle,

    #[error("color {0:?} has no rgba representation with channels in 0..=1")]
    UnsupportedColor(Color),

    #[error("generated code could not be formatted: {0}")]
    Unformattable(String),
}

///Failure of a whole parse and generate run.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] svgr::Error),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

pub type Result<T> = std::result::Result<T, Error>;
