//! Decode GVariant data into [`Value`]s.
//!
//! Decoding is total: any byte sequence is interpretable under any type.
//! Frames that disagree with their declared type decode to the type's
//! default value instead of raising an error.

mod error;

pub use error::{Error, Result};

use std::ffi::CStr;

use zerocopy::byteorder::little_endian as le;
use zerocopy::FromBytes;

use crate::offsets;
use crate::ty::Ty;
use crate::util::align_offset;
use crate::value::Value;

/// Recursion limit for decoding. The type string has its own nesting limit,
/// but variant payloads can chain arbitrarily deep through data alone.
const MAX_DEPTH: usize = 256;

/// Decode `data` as a serialized value of the type described by `signature`.
///
/// The only error condition is a malformed type string; see the module
/// documentation for the handling of malformed data.
///
/// ```
/// use gvariant_codec::{parse, Value};
///
/// let value = parse("mi", &[0x07, 0x00, 0x00, 0x00]).unwrap();
/// assert_eq!(value, Value::Int32(7));
///
/// // a truncated frame decodes to the default, here Nothing
/// let value = parse("mi", &[0x07, 0x00]).unwrap();
/// assert_eq!(value, Value::Null);
/// ```
pub fn parse(signature: &str, data: &[u8]) -> Result<Value> {
    let ty = Ty::parse(signature)?;
    Ok(decode(&ty, data))
}

/// Decode one frame under a parsed type.
pub(crate) fn decode(ty: &Ty, frame: &[u8]) -> Value {
    decode_at(ty, frame, MAX_DEPTH)
}

fn decode_at(ty: &Ty, frame: &[u8], depth: usize) -> Value {
    if depth == 0 {
        return ty.default_value();
    }

    match ty {
        Ty::Boolean => {
            Value::Boolean(u8::read_from_bytes(frame).map(|b| b != 0).unwrap_or_default())
        }
        Ty::Byte => Value::Byte(u8::read_from_bytes(frame).unwrap_or_default()),
        Ty::Int16 => Value::Int16(le::I16::read_from_bytes(frame).map_or(0, |v| v.get())),
        Ty::Uint16 => Value::Uint16(le::U16::read_from_bytes(frame).map_or(0, |v| v.get())),
        Ty::Int32 => Value::Int32(le::I32::read_from_bytes(frame).map_or(0, |v| v.get())),
        Ty::Uint32 => Value::Uint32(le::U32::read_from_bytes(frame).map_or(0, |v| v.get())),
        Ty::Int64 => Value::Int64(le::I64::read_from_bytes(frame).map_or(0, |v| v.get())),
        Ty::Uint64 => Value::Uint64(le::U64::read_from_bytes(frame).map_or(0, |v| v.get())),
        Ty::Double => Value::Double(le::F64::read_from_bytes(frame).map_or(0.0, |v| v.get())),
        Ty::String | Ty::ObjectPath | Ty::Signature => decode_text(frame),
        Ty::Variant => decode_variant(frame, depth),
        Ty::Maybe(elem) => decode_maybe(elem, frame, depth),
        Ty::Array(elem) => decode_array(elem, frame, depth),
        Ty::Tuple(members) => decode_tuple(ty, members, frame, depth),
        Ty::DictEntry(key, value) => {
            if let Some(size) = ty.fixed_size() {
                if frame.len() != size {
                    return ty.default_value();
                }
            }
            let (key, value) = decode_entry(key, value, frame, depth);
            Value::List(vec![key, value])
        }
    }
}

/// Text is valid iff the frame ends with NUL; an interior NUL truncates.
fn decode_text(frame: &[u8]) -> Value {
    if frame.last() != Some(&0) {
        return Value::String(String::new());
    }

    let text = CStr::from_bytes_until_nul(frame)
        .ok()
        .and_then(|s| s.to_str().ok())
        .unwrap_or_default();
    Value::String(text.to_string())
}

/// The type string of a variant is stored after the last NUL byte of the
/// frame; everything before that NUL is the payload.
fn decode_variant(frame: &[u8], depth: usize) -> Value {
    let Some(sep) = frame.iter().rposition(|&b| b == 0) else {
        return Ty::Variant.default_value();
    };

    let Ok(signature) = std::str::from_utf8(&frame[sep + 1..]) else {
        return Ty::Variant.default_value();
    };

    match Ty::parse(signature) {
        Ok(ty) => Value::Variant {
            signature: signature.to_string(),
            value: Box::new(decode_at(&ty, &frame[..sep], depth - 1)),
        },
        Err(_) => Ty::Variant.default_value(),
    }
}

fn decode_maybe(elem: &Ty, frame: &[u8], depth: usize) -> Value {
    if frame.is_empty() {
        return Value::Null;
    }

    match elem.fixed_size() {
        Some(size) if frame.len() != size => Value::Null,
        Some(_) => decode_at(elem, frame, depth - 1),
        // variable-size payloads carry a trailing tag byte to tell Just from Nothing
        None => decode_at(elem, &frame[..frame.len() - 1], depth - 1),
    }
}

fn decode_tuple(ty: &Ty, members: &[Ty], frame: &[u8], depth: usize) -> Value {
    if let Some(size) = ty.fixed_size() {
        if frame.len() != size {
            return ty.default_value();
        }
    }

    let width = offsets::cell_width(frame.len());
    let mut cur = 0;
    let mut n_cells = 0;
    let mut items = Vec::with_capacity(members.len());

    for (index, member) in members.iter().enumerate() {
        cur = align_offset(cur, member.alignment());

        let next = if let Some(size) = member.fixed_size() {
            cur + size
        } else if index + 1 < members.len() {
            n_cells += 1;
            offsets::tail_offset(frame, n_cells, width)
        } else {
            // the last member runs up to the offset table
            frame.len().saturating_sub(n_cells * width)
        };

        let end = next.min(frame.len());
        let start = cur.min(end);
        items.push(decode_at(member, &frame[start..end], depth - 1));
        cur = end;
    }

    Value::List(items)
}

fn decode_entry(kty: &Ty, vty: &Ty, frame: &[u8], depth: usize) -> (Value, Value) {
    if depth == 0 {
        return (kty.default_value(), vty.default_value());
    }

    let len = frame.len();
    let width = offsets::cell_width(len);

    let (key_end, value_end) = match kty.fixed_size() {
        Some(size) => (size, len),
        None => (
            offsets::tail_offset(frame, 1, width),
            len.saturating_sub(width),
        ),
    };

    let value_end = value_end.min(len);
    let key_end = key_end.min(value_end);
    let key = decode_at(kty, &frame[..key_end], depth - 1);

    let value_start = align_offset(key_end, vty.alignment()).min(value_end);
    let value = decode_at(vty, &frame[value_start..value_end], depth - 1);

    (key, value)
}

fn decode_array(elem: &Ty, frame: &[u8], depth: usize) -> Value {
    let mut frames = Vec::new();

    if !frame.is_empty() {
        if let Some(size) = elem.fixed_size() {
            if frame.len() % size != 0 {
                return empty_array(elem);
            }
            for i in 0..frame.len() / size {
                frames.push(&frame[i * size..(i + 1) * size]);
            }
        } else {
            // the last cell is the end of the last element, which is also
            // where the table starts; that yields the element count
            let width = offsets::cell_width(frame.len());
            let table_start = offsets::tail_offset(frame, 1, width);
            if table_start > frame.len() || (frame.len() - table_start) % width != 0 {
                return empty_array(elem);
            }

            let n = (frame.len() - table_start) / width;
            let mut cur = 0;
            for i in 0..n {
                let end = offsets::tail_offset(frame, n - i, width).min(table_start);
                let start = cur.min(end);
                frames.push(&frame[start..end]);
                cur = align_offset(end, elem.alignment());
            }
        }
    }

    match elem {
        Ty::DictEntry(kty, vty) => Value::Dict(
            frames
                .iter()
                .map(|f| decode_entry(kty, vty, f, depth - 1))
                .collect(),
        ),
        _ => Value::List(
            frames
                .iter()
                .map(|f| decode_at(elem, f, depth - 1))
                .collect(),
        ),
    }
}

fn empty_array(elem: &Ty) -> Value {
    match elem {
        Ty::DictEntry(..) => Value::Dict(Vec::new()),
        _ => Value::List(Vec::new()),
    }
}
