//! Marshalling layer between a dynamic tagged value space and the flat
//! typed buffers of an HDF5-like storage engine.
//!
//! Inputs are untyped [`Value`] trees: sequences of scalars or of
//! fixed-size tuples of numbers, with IEEE specials carried as the
//! symbols `"nan"` and `"inf"`. Shape and cell type are inferred from the
//! first element in a single look-ahead, then the sequence is streamed
//! once into a row-major [`FlatBuffer`] and handed to the engine — the
//! whole declared extent, or a [`Hyperslab`] selection of it. Reads
//! reverse the trip.
//!
//! The engine itself stays behind the [`StorageEngine`] trait from
//! `h5bridge-engine`; this crate owns only the codec layer.
//!
//! # Example
//!
//! ```
//! use h5bridge::{dataset, Value};
//! use h5bridge_engine::{MemEngine, ScalarType, StorageEngine};
//!
//! let mut engine = MemEngine::new();
//! let file = engine.create_file("demo.h5").unwrap();
//! let space = engine.create_space(&[3]).unwrap();
//! let ds = engine
//!     .create_dataset(file, "counts", ScalarType::Int32, space, None)
//!     .unwrap();
//!
//! let input = Value::seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
//! dataset::write(&mut engine, ds, &input).unwrap();
//! assert_eq!(dataset::read(&mut engine, ds).unwrap(), input);
//! ```

pub mod dataset;
pub mod error;
pub mod flatten;
pub mod lite;
pub mod numeric;
pub mod options;
pub mod selection;
pub mod shape;
pub mod unflatten;
pub mod value;

pub use error::Error;
pub use flatten::{flatten, FlatBuffer};
pub use numeric::{decode_float, encode_float};
pub use options::{Options, DEFAULT_MAX_NAME_LEN};
pub use selection::{Hyperslab, IntoCoords, SelectOperator};
pub use shape::{detect, ElemType, Shape};
pub use unflatten::{unflatten_floats, unflatten_ints, unflatten_strings};
pub use value::{Value, INF_TAG, NAN_TAG};

// Re-export the engine boundary for callers binding a real engine.
pub use h5bridge_engine::{ScalarType, StorageEngine};
