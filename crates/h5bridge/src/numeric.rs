//! Mapping between IEEE-754 special values and symbolic tags.
//!
//! The host value space has no literal for NaN or infinity; they travel as
//! the symbols `"nan"` and `"inf"`. The mapping is asymmetric on purpose:
//!
//! * encoding rejects anything without a tag — in particular there is no
//!   tag for negative infinity, so it cannot be written;
//! * decoding collapses both infinities to `"inf"`, losing the sign of
//!   negative infinity.
//!
//! Both halves of the asymmetry are documented behaviour. Resolving it
//! (e.g. a `"-inf"` tag) is a product decision, not a bug fix.

use crate::error::Error;
use crate::value::{Value, INF_TAG, NAN_TAG};

/// Encode a host value as an IEEE-754 double for a float cell.
///
/// Accepts finite float literals and the `"nan"`/`"inf"` symbols; anything
/// else is a [`Error::TypeMismatch`].
pub fn encode_float(value: &Value) -> Result<f64, Error> {
    match value {
        Value::Float(v) if v.is_finite() => Ok(*v),
        // Non-finite literals cannot come from the host space; reject them
        // rather than guessing a tag (negative infinity has none).
        Value::Float(_) => Err(Error::TypeMismatch(
            "non-finite float literal has no symbolic tag",
        )),
        Value::Symbol(tag) if tag == NAN_TAG => Ok(f64::NAN),
        Value::Symbol(tag) if tag == INF_TAG => Ok(f64::INFINITY),
        Value::Symbol(_) => Err(Error::TypeMismatch("unrecognised symbolic tag")),
        _ => Err(Error::TypeMismatch("cell does not contain a float")),
    }
}

/// Decode an IEEE-754 double read back from storage into a host value.
///
/// Total: every bit pattern maps to a value. Negative infinity comes back
/// as the `"inf"` symbol (sign not preserved).
pub fn decode_float(raw: f64) -> Value {
    if raw.is_nan() {
        Value::nan()
    } else if raw.is_infinite() {
        Value::inf()
    } else {
        Value::Float(raw)
    }
}
