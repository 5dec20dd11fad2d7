//! JSON value model and hand-written text serializer

pub mod serializer;
pub mod value;

pub use serializer::{escape_str, serialize};
pub use value::JsonValue;
