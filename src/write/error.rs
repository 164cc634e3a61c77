use std::fmt::{Debug, Display, Formatter};

use crate::ty::InvalidSignature;

/// An error that can occur when encoding GVariant data.
#[non_exhaustive]
pub enum Error {
    /// A type string passed to the encoder is malformed
    Signature(InvalidSignature),

    /// A container frame is too large for the 4-byte framing offset range
    Offset(usize),

    /// The value does not have the shape the type string requires
    Value(String),
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
            Error::Offset(len) => {
                write!(
                    f,
                    "container of {len} bytes exceeds the framing offset range"
                )
            }
            Error::Value(context) => {
                write!(f, "value does not match the type: {context}")
            }
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// The Result type for [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
