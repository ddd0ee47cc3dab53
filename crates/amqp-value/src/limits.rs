//! Hard bounds on document size.
//!
//! A single value document must not be able to force unbounded memory growth
//! or unbounded recursion, whether it is built locally or decoded from an
//! untrusted peer.

/// Absolute maximum number of nodes in one document.
pub const MAX_NODES: usize = u16::MAX as usize;

/// Maximum nesting depth of compound values (lists, maps, arrays, described).
pub const MAX_DEPTH: usize = 128;

/// Node capacity reserved when a document is created.
pub const INITIAL_NODES: usize = 16;

/// Maximum total bytes of binary/string/symbol payload held by one document.
///
/// Payload spans are stored as `u32` offsets.
pub const MAX_PAYLOAD_BYTES: usize = u32::MAX as usize;
