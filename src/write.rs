//! Encode [`Value`]s into GVariant data.

mod error;

pub use error::{Error, Result};

use std::ops::{Deref, DerefMut};

use bytes::{BufMut, Bytes, BytesMut};

use crate::offsets;
use crate::ty::Ty;
use crate::value::Value;

/// Serialize `value` under the type described by `signature`.
///
/// ```
/// use gvariant_codec::{serialize, Value};
///
/// let bytes = serialize("s", &Value::from("hi")).unwrap();
/// assert_eq!(&bytes[..], &[0x68, 0x69, 0x00]);
/// ```
pub fn serialize(signature: &str, value: &Value) -> Result<Bytes> {
    let ty = Ty::parse(signature)?;
    let mut buf = Builder::new();
    encode(&ty, value, &mut buf)?;
    Ok(buf.freeze())
}

/// Growable output buffer with alignment-aware zero padding.
pub(crate) struct Builder {
    data: BytesMut,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            data: BytesMut::new(),
        }
    }

    /// Zero-pad until the length is a multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) {
        while self.data.len() % alignment != 0 {
            self.data.put_u8(0);
        }
    }

    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }
}

impl Deref for Builder {
    type Target = BytesMut;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl DerefMut for Builder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

/// Append the serialized form of `value`. The caller must have aligned the
/// buffer to the type's alignment.
pub(crate) fn encode(ty: &Ty, value: &Value, buf: &mut Builder) -> Result<()> {
    match (ty, value) {
        (Ty::Boolean, Value::Boolean(v)) => buf.put_u8(*v as u8),
        (Ty::Byte, Value::Byte(v)) => buf.put_u8(*v),
        (Ty::Int16, Value::Int16(v)) => buf.put_i16_le(*v),
        (Ty::Uint16, Value::Uint16(v)) => buf.put_u16_le(*v),
        (Ty::Int32, Value::Int32(v)) => buf.put_i32_le(*v),
        (Ty::Uint32, Value::Uint32(v)) => buf.put_u32_le(*v),
        (Ty::Int64, Value::Int64(v)) => buf.put_i64_le(*v),
        (Ty::Uint64, Value::Uint64(v)) => buf.put_u64_le(*v),
        (Ty::Double, Value::Double(v)) => buf.put_f64_le(*v),
        (Ty::String | Ty::ObjectPath | Ty::Signature, Value::String(text)) => {
            buf.put_slice(text.as_bytes());
            buf.put_u8(0);
        }
        (Ty::Variant, Value::Variant { signature, value }) => {
            let inner = Ty::parse(signature)?;
            encode(&inner, value, buf)?;
            buf.put_u8(0);
            buf.put_slice(signature.as_bytes());
        }
        (Ty::Maybe(_), Value::Null) => {}
        (Ty::Maybe(elem), _) => {
            encode(elem, value, buf)?;
            if !elem.is_fixed() {
                // trailing tag byte distinguishes Just from Nothing
                buf.put_u8(0);
            }
        }
        (Ty::Array(elem), _) => encode_array(elem, value, buf)?,
        (Ty::Tuple(members), Value::List(items)) => encode_tuple(ty, members, items, buf)?,
        (Ty::DictEntry(kty, vty), Value::List(pair)) if pair.len() == 2 => {
            encode_entry(ty, kty, vty, &pair[0], &pair[1], buf)?;
        }
        _ => return Err(mismatch(ty, value)),
    }

    Ok(())
}

fn mismatch(ty: &Ty, value: &Value) -> Error {
    Error::Value(format!("cannot encode {value} as '{ty}'"))
}

fn encode_tuple(ty: &Ty, members: &[Ty], items: &[Value], buf: &mut Builder) -> Result<()> {
    if items.len() != members.len() {
        return Err(Error::Value(format!(
            "tuple '{ty}' has {} members but the value has {} items",
            members.len(),
            items.len()
        )));
    }

    let start = buf.len();
    let mut ends = Vec::new();

    for (index, (member, item)) in members.iter().zip(items).enumerate() {
        buf.align(member.alignment());
        encode(member, item, buf)?;

        // variable-size members record an end offset, except the last one
        if !member.is_fixed() && index + 1 < members.len() {
            ends.push(buf.len() - start);
        }
    }

    if let Some(size) = ty.fixed_size() {
        // fixed-size frames carry their trailing padding, and the unit
        // type its single zero byte
        while buf.len() - start < size {
            buf.put_u8(0);
        }
    }

    // tuple tables are written back to front
    append_table(buf, start, &ends, true)
}

fn encode_entry(
    entry: &Ty,
    kty: &Ty,
    vty: &Ty,
    key: &Value,
    value: &Value,
    buf: &mut Builder,
) -> Result<()> {
    let start = buf.len();
    encode(kty, key, buf)?;
    let key_end = buf.len() - start;

    buf.align(vty.alignment());
    encode(vty, value, buf)?;

    if let Some(size) = entry.fixed_size() {
        while buf.len() - start < size {
            buf.put_u8(0);
        }
    }

    // only the end of the key is recorded; the value runs up to the table
    if !kty.is_fixed() {
        append_table(buf, start, &[key_end], false)?;
    }

    Ok(())
}

fn encode_array(elem: &Ty, value: &Value, buf: &mut Builder) -> Result<()> {
    let start = buf.len();
    let mut ends = Vec::new();

    match (elem, value) {
        (Ty::DictEntry(kty, vty), Value::Dict(pairs)) => {
            for (key, val) in pairs {
                buf.align(elem.alignment());
                encode_entry(elem, kty, vty, key, val, buf)?;
                if !elem.is_fixed() {
                    ends.push(buf.len() - start);
                }
            }
        }
        // a plain sequence; for dict entry elements each item is a pair
        (_, Value::List(items)) => {
            for item in items {
                buf.align(elem.alignment());
                encode(elem, item, buf)?;
                if !elem.is_fixed() {
                    ends.push(buf.len() - start);
                }
            }
        }
        _ => {
            return Err(Error::Value(format!(
                "cannot encode {value} as an array of '{elem}'"
            )))
        }
    }

    // array tables are written front to back, unlike tuples
    append_table(buf, start, &ends, false)
}

/// Append the offset table for the frame starting at `start`.
fn append_table(buf: &mut Builder, start: usize, ends: &[usize], reversed: bool) -> Result<()> {
    if ends.is_empty() {
        return Ok(());
    }

    let payload = buf.len() - start;
    let width = offsets::table_width(payload, ends.len()).ok_or(Error::Offset(payload))?;

    if reversed {
        for &end in ends.iter().rev() {
            offsets::put_cell(&mut buf.data, end, width);
        }
    } else {
        for &end in ends {
            offsets::put_cell(&mut buf.data, end, width);
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::{serialize, Error};
    use crate::test::{assert_bytes_eq, assert_matches};
    use crate::value::Value;

    #[test]
    fn invalid_signature() {
        assert_matches!(
            serialize("(u", &Value::List(vec![])),
            Err(Error::Signature(_))
        );
    }

    #[test]
    fn numerics() {
        assert_bytes_eq(
            &serialize("i", &Value::Int32(-1)).unwrap(),
            &[0xFF, 0xFF, 0xFF, 0xFF],
            "i -1",
        );
        assert_bytes_eq(&serialize("y", &Value::Byte(42)).unwrap(), &[0x2A], "y 42");
        assert_bytes_eq(
            &serialize("q", &Value::Uint16(0x1234)).unwrap(),
            &[0x34, 0x12],
            "q",
        );
        assert_bytes_eq(
            &serialize("d", &Value::Double(1.5)).unwrap(),
            &1.5f64.to_le_bytes(),
            "d",
        );
        assert_bytes_eq(
            &serialize("b", &Value::Boolean(true)).unwrap(),
            &[0x01],
            "b",
        );
    }

    #[test]
    fn text() {
        assert_bytes_eq(
            &serialize("s", &Value::from("hi")).unwrap(),
            &[0x68, 0x69, 0x00],
            "s",
        );
        assert_bytes_eq(&serialize("s", &Value::from("")).unwrap(), &[0x00], "s ''");
    }

    #[test]
    fn maybes() {
        assert_bytes_eq(&serialize("mi", &Value::Null).unwrap(), &[], "mi null");
        assert_bytes_eq(
            &serialize("mi", &Value::Int32(7)).unwrap(),
            &[0x07, 0x00, 0x00, 0x00],
            "mi 7",
        );
        assert_bytes_eq(
            &serialize("ms", &Value::from("x")).unwrap(),
            &[0x78, 0x00, 0x00],
            "ms x",
        );
        assert_bytes_eq(&serialize("ms", &Value::Null).unwrap(), &[], "ms null");
    }

    #[test]
    fn tuples() {
        assert_bytes_eq(
            &serialize(
                "(si)",
                &Value::List(vec![Value::from("ab"), Value::Int32(1)]),
            )
            .unwrap(),
            &[0x61, 0x62, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x03],
            "(si)",
        );

        // the unit type is a single zero byte
        assert_bytes_eq(
            &serialize("()", &Value::List(vec![])).unwrap(),
            &[0x00],
            "()",
        );

        // fixed-size tuples carry trailing padding up to their alignment
        assert_bytes_eq(
            &serialize(
                "(uy)",
                &Value::List(vec![Value::Uint32(1), Value::Byte(2)]),
            )
            .unwrap(),
            &[0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00],
            "(uy)",
        );
        assert_bytes_eq(
            &serialize(
                "(yu)",
                &Value::List(vec![Value::Byte(2), Value::Uint32(1)]),
            )
            .unwrap(),
            &[0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00],
            "(yu)",
        );
    }

    #[test]
    fn table_order_asymmetry() {
        // tuples write their table back to front
        assert_bytes_eq(
            &serialize(
                "(sss)",
                &Value::List(vec![
                    Value::from("a"),
                    Value::from("b"),
                    Value::from("c"),
                ]),
            )
            .unwrap(),
            &[0x61, 0x00, 0x62, 0x00, 0x63, 0x00, 0x04, 0x02],
            "(sss)",
        );

        // arrays write theirs front to back, including the last element
        assert_bytes_eq(
            &serialize(
                "as",
                &Value::List(vec![
                    Value::from("a"),
                    Value::from("b"),
                    Value::from("c"),
                ]),
            )
            .unwrap(),
            &[0x61, 0x00, 0x62, 0x00, 0x63, 0x00, 0x02, 0x04, 0x06],
            "as",
        );
    }

    #[test]
    fn arrays() {
        assert_bytes_eq(&serialize("au", &Value::List(vec![])).unwrap(), &[], "au []");
        assert_bytes_eq(
            &serialize("au", &Value::List(vec![Value::Uint32(1), Value::Uint32(2)])).unwrap(),
            &[0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00],
            "au",
        );
        assert_bytes_eq(
            &serialize("ay", &Value::from(&b"ab"[..])).unwrap(),
            &[0x61, 0x62],
            "ay",
        );
    }

    #[test]
    fn dicts() {
        // fixed-size entries pack without a table
        assert_bytes_eq(
            &serialize(
                "a{yy}",
                &Value::Dict(vec![
                    (Value::Byte(1), Value::Byte(2)),
                    (Value::Byte(3), Value::Byte(4)),
                ]),
            )
            .unwrap(),
            &[0x01, 0x02, 0x03, 0x04],
            "a{yy}",
        );

        let expected = [
            0x6E, 0x61, 0x6D, 0x65, 0x00, 0x00, 0x00, 0x00, // "name" + padding
            0x6A, 0x6F, 0x65, 0x00, 0x00, 0x73, // <@s "joe">
            0x05, // key end within the entry
            0x0F, // entry end within the array
        ];

        let dict = Value::Dict(vec![(
            Value::from("name"),
            Value::variant("s", Value::from("joe")),
        )]);
        assert_bytes_eq(&serialize("a{sv}", &dict).unwrap(), &expected, "a{sv}");

        // a sequence of pairs encodes identically to the mapping form
        let pairs = Value::List(vec![Value::List(vec![
            Value::from("name"),
            Value::variant("s", Value::from("joe")),
        ])]);
        assert_bytes_eq(&serialize("a{sv}", &pairs).unwrap(), &expected, "a{sv} pairs");
    }

    #[test]
    fn variants() {
        assert_bytes_eq(
            &serialize("v", &Value::variant("s", Value::from("joe"))).unwrap(),
            &[0x6A, 0x6F, 0x65, 0x00, 0x00, 0x73],
            "v",
        );

        assert_matches!(
            serialize("v", &Value::variant("!!", Value::Null)),
            Err(Error::Signature(_))
        );
    }

    #[test]
    fn width_transition() {
        // 50 four-byte strings: 250-byte frame, 1-byte cells
        let items: Vec<Value> = (0..50).map(|_| Value::from("abc")).collect();
        let bytes = serialize("as", &Value::List(items)).unwrap();
        assert_eq!(bytes.len(), 200 + 50);

        // 52 strings tip the payload over 0xFF: 2-byte cells
        let items: Vec<Value> = (0..52).map(|_| Value::from("abc")).collect();
        let bytes = serialize("as", &Value::List(items)).unwrap();
        assert_eq!(bytes.len(), 208 + 52 * 2);
    }

    #[test]
    fn type_mismatch() {
        assert_matches!(
            serialize("i", &Value::from("x")),
            Err(Error::Value(_))
        );
        assert_matches!(
            serialize("(yy)", &Value::List(vec![Value::Byte(1)])),
            Err(Error::Value(_))
        );
        assert_matches!(
            serialize("v", &Value::Int32(1)),
            Err(Error::Value(_))
        );
        assert_matches!(
            serialize("au", &Value::Dict(vec![])),
            Err(Error::Value(_))
        );
        assert_matches!(
            serialize("{sv}", &Value::List(vec![Value::from("k")])),
            Err(Error::Value(_))
        );
    }
}
