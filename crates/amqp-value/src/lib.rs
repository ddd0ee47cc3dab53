//! AMQP 1.0 typed value documents.
//!
//! This crate provides an in-memory representation of AMQP 1.0 values
//! (scalars, lists, maps, typed arrays and described values) together with
//! the AMQP binary encoding, a compact format-string language for building
//! and reading values, and a canonical text form for debugging and testing.
//!
//! # Overview
//!
//! A [`Document`] is a forest of values stored in a bounded node arena:
//! - **Bounded**: a document never holds more than [`limits::MAX_NODES`]
//!   nodes or nests deeper than [`limits::MAX_DEPTH`]
//! - **Cursor-driven**: values are put, read and navigated through one cursor
//! - **Self-describing**: every value carries its AMQP type
//!
//! # Quick Start
//!
//! ```rust
//! use amqp_value::{Arg, Document};
//!
//! // An open performative: descriptor 0x10 and a list of fields
//! let mut doc = Document::new();
//! doc.fill("DL[SSnI]", &[16u64.into(), "container-1".into(), Arg::Str(None), 965u32.into()])
//!     .unwrap();
//!
//! // Encode to the AMQP wire format
//! let bytes = doc.encode_to_vec().unwrap();
//!
//! // Decode back
//! let mut decoded = Document::new();
//! let consumed = decoded.decode(&bytes).unwrap();
//! assert_eq!(consumed, bytes.len());
//! assert_eq!(
//!     decoded.inspect(),
//!     r#"@open(16) [container-id="container-1", channel-max=965]"#
//! );
//! assert_eq!(decoded, doc);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Type codes, scalar values and the document itself
//! - [`codec`]: AMQP binary encoding and decoding
//! - [`format`]: Fill/scan format strings
//! - [`inspect`]: Canonical text form and well-known descriptors
//! - [`error`]: Error types
//! - [`limits`]: Hard bounds on document size and depth
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Every length and count is checked against the remaining input
//! - Node count and nesting depth are bounded
//! - A rejected input leaves the document as it was

pub mod codec;
pub mod error;
pub mod format;
pub mod inspect;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use error::{DecodeCategory, Error, ErrorKind};
pub use format::{Arg, Scanned};
pub use model::{Cursor, Document, DocumentOptions, TypeCode, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
