//! Data model for AMQP value documents.
//!
//! - Type codes for every AMQP primitive and compound kind
//! - Scalar values
//! - The node arena and the document (tree plus cursor) built on it

pub(crate) mod arena;
pub mod document;
pub mod types;
pub mod value;

pub use document::{Cursor, Document, DocumentOptions};
pub use types::TypeCode;
pub use value::Value;
