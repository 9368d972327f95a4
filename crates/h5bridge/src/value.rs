//! The dynamic host value space crossing the marshalling boundary.

/// Symbol tag representing an IEEE NaN.
pub const NAN_TAG: &str = "nan";

/// Symbol tag representing infinity.
///
/// There is deliberately no tag for negative infinity; see
/// [`crate::numeric`].
pub const INF_TAG: &str = "inf";

/// A dynamically typed host value.
///
/// This is a closed sum: anything the marshaller does not recognise fails
/// loudly with a type error rather than being passed through.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A signed integer.
    Int(i64),
    /// A finite floating-point number. Non-finite values are carried as
    /// [`Value::Symbol`] tags instead; the host space has no literal for
    /// them.
    Float(f64),
    /// A symbolic marker, e.g. `"nan"` or `"inf"`.
    Symbol(String),
    /// An owned text value (one storage slot on the string read path).
    Str(String),
    /// An ordered sequence of values.
    Seq(Vec<Value>),
    /// A fixed-size tuple of values.
    Tuple(Vec<Value>),
}

impl Value {
    /// The NaN marker.
    pub fn nan() -> Value {
        Value::Symbol(NAN_TAG.to_string())
    }

    /// The infinity marker.
    pub fn inf() -> Value {
        Value::Symbol(INF_TAG.to_string())
    }

    pub fn symbol(tag: impl Into<String>) -> Value {
        Value::Symbol(tag.into())
    }

    pub fn seq(items: impl Into<Vec<Value>>) -> Value {
        Value::Seq(items.into())
    }

    pub fn tuple(items: impl Into<Vec<Value>>) -> Value {
        Value::Tuple(items.into())
    }

    /// The sequence items, if this is a `Seq`.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(Value::nan(), Value::Symbol("nan".to_string()));
        assert_eq!(Value::inf(), Value::Symbol("inf".to_string()));
        assert_eq!(Value::from(3), Value::Int(3));
        assert_eq!(Value::from(1.5), Value::Float(1.5));
    }

    #[test]
    fn as_seq_only_matches_sequences() {
        let seq = Value::seq(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(seq.as_seq().map(<[Value]>::len), Some(2));
        assert_eq!(Value::Int(1).as_seq(), None);
        assert_eq!(Value::tuple(vec![Value::Int(1)]).as_seq(), None);
    }
}
