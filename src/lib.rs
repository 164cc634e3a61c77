//! # Read and write GVariant data
//!
//! This crate serializes and deserializes values in the GVariant binary
//! format used throughout the GLib ecosystem. Types are described at runtime
//! by their GVariant type strings; values are represented by the dynamic
//! [`Value`] enum.
//!
//! The format is always little-endian, and every offset table lives at the
//! tail of its frame. Decoding is *total*: any byte sequence can be
//! interpreted under any type, with malformed frames decoding to the type's
//! default value.
//!
//! ## Examples
//!
//! Serialize a tuple and read it back with [`serialize`] and [`parse`]:
//!
//! ```
//! use gvariant_codec::{parse, serialize, Value};
//!
//! let tuple = Value::List(vec![Value::from("ab"), Value::from(1i32)]);
//! let bytes = serialize("(si)", &tuple).unwrap();
//! assert_eq!(
//!     &bytes[..],
//!     &[0x61, 0x62, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x03]
//! );
//!
//! assert_eq!(parse("(si)", &bytes).unwrap(), tuple);
//! ```
//!
//! Dictionaries accept the mapping form directly:
//!
//! ```
//! use gvariant_codec::{parse, serialize, Value};
//!
//! let dict = Value::Dict(vec![(
//!     Value::from("name"),
//!     Value::variant("s", Value::from("joe")),
//! )]);
//!
//! let bytes = serialize("a{sv}", &dict).unwrap();
//! assert_eq!(parse("a{sv}", &bytes).unwrap(), dict);
//! ```
//!
//! ## Features
//!
//! By default, no features are enabled.
//!
//! ### `glib`
//!
//! Enables comparison tests against the GLib reference implementation. This
//! feature is only useful when running the test suite.

#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// Decode GVariant data
///
/// See [`parse`] to get started
pub mod read;

/// Encode GVariant data
///
/// See [`serialize`] to get started
pub mod write;

mod offsets;
mod ty;
mod util;
mod value;


pub use read::parse;
pub use ty::{InvalidSignature, Ty};
pub use value::Value;
pub use write::serialize;
