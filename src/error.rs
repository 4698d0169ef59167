use std::io;

use thiserror::Error;

use crate::parser::DecodeError;
use crate::zip_utils::UnwrapError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("input is empty")]
    EmptyInput,

    #[error(transparent)]
    Unwrap(#[from] UnwrapError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("expected name {0:?} is not a plain file name")]
    InvalidExpectedName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
