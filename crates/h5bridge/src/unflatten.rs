//! Decoding typed cell buffers read back from the engine into values.
//!
//! Each decoder takes the cell count `n` separately: the caller computes
//! it from the product of the dataset's current extent. Decoding cannot
//! fail on well-formed input of the declared count; supplying a count
//! larger than the buffer holds is a caller contract violation (these
//! functions will panic on the out-of-bounds access rather than invent
//! cells).

use crate::numeric::decode_float;
use crate::value::Value;

/// Decode an integer cell buffer into a sequence of `Int` values.
pub fn unflatten_ints(buffer: &[i32], n: usize) -> Vec<Value> {
    buffer[..n].iter().map(|&v| Value::Int(v.into())).collect()
}

/// Decode a float cell buffer into `Float` and symbol values.
pub fn unflatten_floats(buffer: &[f64], n: usize) -> Vec<Value> {
    buffer[..n].iter().map(|&v| decode_float(v)).collect()
}

/// Decode a fixed-width string buffer into independently-owned `Str`
/// values, one per slot, in engine order.
///
/// Each slot is `slot_size` bytes; trailing NUL padding is stripped.
pub fn unflatten_strings(raw: &[u8], slot_size: usize, n: usize) -> Vec<Value> {
    raw[..n * slot_size]
        .chunks(slot_size)
        .map(|slot| {
            let end = slot
                .iter()
                .rposition(|&b| b != 0)
                .map_or(0, |last| last + 1);
            Value::Str(String::from_utf8_lossy(&slot[..end]).into_owned())
        })
        .collect()
}
