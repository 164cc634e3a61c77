//! GVariant value types.

use std::fmt;

/// A decoded GVariant value.
///
/// Integers keep their declared width so that a value round-trips through
/// [`serialize`](crate::serialize) and [`parse`](crate::parse) unchanged.
/// Tuples, dict entries and plain arrays all decode to [`Value::List`];
/// arrays of dict entries decode to [`Value::Dict`]. A maybe type decodes to
/// its payload when present and to [`Value::Null`] when absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent case of a maybe type
    Null,
    /// A boolean (type `b`)
    Boolean(bool),
    /// An unsigned 8-bit integer (type `y`)
    Byte(u8),
    /// A signed 16-bit integer (type `n`)
    Int16(i16),
    /// An unsigned 16-bit integer (type `q`)
    Uint16(u16),
    /// A signed 32-bit integer (type `i`)
    Int32(i32),
    /// An unsigned 32-bit integer (type `u`)
    Uint32(u32),
    /// A signed 64-bit integer (type `x`)
    Int64(i64),
    /// An unsigned 64-bit integer (type `t`)
    Uint64(u64),
    /// An IEEE-754 double (type `d`)
    Double(f64),
    /// Text (types `s`, `o` and `g`)
    String(String),
    /// An ordered sequence: a tuple, a dict entry pair or a plain array
    List(Vec<Value>),
    /// Key-value pairs of an array of dict entries, in enumeration order
    Dict(Vec<(Value, Value)>),
    /// A value carrying its own type signature (type `v`)
    Variant {
        /// The type string the carried value is serialized under
        signature: String,
        /// The carried value
        value: Box<Value>,
    },
}

impl Value {
    /// Create a variant value from a type string and the carried value.
    pub fn variant(signature: impl Into<String>, value: Value) -> Self {
        Self::Variant {
            signature: signature.into(),
            value: Box::new(value),
        }
    }

    /// Returns whether this is the absent case of a maybe type.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a bool, if it is a `Boolean` variant.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as a string reference, if it is a `String` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a slice of items, if it is a `List` variant.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the value as a slice of pairs, if it is a `Dict` variant.
    pub fn as_dict(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Dict(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Returns the carried type string and value, if this is a `Variant`.
    pub fn as_variant(&self) -> Option<(&str, &Value)> {
        match self {
            Self::Variant { signature, value } => Some((signature, value)),
            _ => None,
        }
    }
}

// -- Convenience conversions --

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Int16(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::Uint16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Uint32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Self::List(bytes.iter().map(|&b| Self::Byte(b)).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(pairs: Vec<(Value, Value)>) -> Self {
        Self::Dict(pairs)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "nothing"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Uint16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Uint32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Uint64(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Dict(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Variant { signature, value } => write!(f, "<@{signature} {value}>"),
        }
    }
}
