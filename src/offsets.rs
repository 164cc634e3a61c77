//! Framing offset cells.
//!
//! Variable-size containers store a table of offsets at the tail of their
//! frame. The width of a single table cell is not encoded anywhere; both
//! sides derive it from the byte length of the frame itself.

use bytes::BufMut;
use zerocopy::byteorder::little_endian as le;
use zerocopy::FromBytes;

/// The cell width a reader infers for a frame of `frame_len` bytes.
///
/// The empty frame has no table and therefore no cell width.
pub(crate) fn cell_width(frame_len: usize) -> usize {
    if frame_len == 0 {
        0
    } else if frame_len <= 0xFF {
        1
    } else if frame_len <= 0xFFFF {
        2
    } else if frame_len <= 0xFFFF_FFFF {
        4
    } else {
        8
    }
}

/// The cell width a writer must use for `payload_len` bytes of element data
/// followed by `n_cells` table cells.
///
/// The table itself counts towards the frame length, so the width has to be
/// chosen such that the reader infers it back from the total. Returns `None`
/// when the frame does not fit the 4-byte cell range; 8-byte cells are read
/// but never produced.
pub(crate) fn table_width(payload_len: usize, n_cells: usize) -> Option<usize> {
    if payload_len + n_cells <= 0xFF {
        Some(1)
    } else if payload_len + 2 * n_cells <= 0xFFFF {
        Some(2)
    } else if payload_len + 4 * n_cells <= 0xFFFF_FFFF {
        Some(4)
    } else {
        None
    }
}

/// Read the `k`-th offset cell from the end of `frame`, little-endian.
///
/// `k == 1` is the cell nearest the end. Out-of-range reads yield 0; the
/// caller clamps the result into the frame anyway.
pub(crate) fn tail_offset(frame: &[u8], k: usize, width: usize) -> usize {
    let Some(pos) = k
        .checked_mul(width)
        .and_then(|table| frame.len().checked_sub(table))
    else {
        return 0;
    };

    match width {
        1 => frame[pos] as usize,
        2 => le::U16::read_from_bytes(&frame[pos..pos + 2]).map_or(0, |v| v.get() as usize),
        4 => le::U32::read_from_bytes(&frame[pos..pos + 4]).map_or(0, |v| v.get() as usize),
        8 => le::U64::read_from_bytes(&frame[pos..pos + 8])
            .map_or(0, |v| usize::try_from(v.get()).unwrap_or(usize::MAX)),
        _ => 0,
    }
}

/// Append a single offset cell of the given width, little-endian.
pub(crate) fn put_cell(buf: &mut impl BufMut, value: usize, width: usize) {
    match width {
        1 => buf.put_u8(value as u8),
        2 => buf.put_u16_le(value as u16),
        4 => buf.put_u32_le(value as u32),
        _ => buf.put_u64_le(value as u64),
    }
}
