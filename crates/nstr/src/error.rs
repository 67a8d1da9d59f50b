use thiserror::Error;

use crate::utf8::EncodingError;

/// Failure of a string or buffer operation.
///
/// Every fallible operation in this crate documents exactly which variants
/// it can produce. A returned value paired with an `Err` does not exist;
/// there are no partial results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("out of range: {0}")]
    OutOfRange(&'static str),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Fail-fast resolution of a [`Result`].
///
/// For call sites that judge recovery unnecessary: [`OrDie::or_die`] returns
/// the success value or panics with the rendered error message. This is the
/// explicit opt-in counterpart of handling the error; every fallible call
/// should end in exactly one of the two.
pub trait OrDie<T> {
    /// Returns the success value or panics with the error's message.
    fn or_die(self) -> T;
}

impl<T> OrDie<T> for Result<T, Error> {
    #[track_caller]
    fn or_die(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}
