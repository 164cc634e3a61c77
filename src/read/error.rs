use std::fmt::{Display, Formatter};

use crate::ty::InvalidSignature;

/// An error that can occur when decoding GVariant data.
///
/// Decoding itself never fails: a frame that cannot be interpreted under its
/// declared type yields that type's default value. The only error is a
/// malformed type string.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// The type string passed to the decoder is malformed
    Signature(InvalidSignature),
}

impl std::error::Error for Error {}

impl From<InvalidSignature> for Error {
    fn from(err: InvalidSignature) -> Self {
        Self::Signature(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Signature(err) => write!(f, "{err}"),
        }
    }
}

/// The Result type for [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
