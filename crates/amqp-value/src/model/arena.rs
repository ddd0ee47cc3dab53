//! Node arena backing a value document.
//!
//! Nodes link to each other by index, never by address, so growing the
//! backing vector cannot invalidate a link. Nodes are only ever appended or
//! dropped all at once; there is no per-node free.

use tracing::{debug, trace};

use crate::error::Error;
use crate::model::TypeCode;

/// Index of a node within its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Location of a byte payload within the document's byte store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: u32,
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn range(self) -> std::ops::Range<usize> {
        let start = self.start as usize;
        start..start + self.len as usize
    }
}

/// Type tag and scalar payload of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Atom {
    Null,
    Bool(bool),
    Ubyte(u8),
    Byte(i8),
    Ushort(u16),
    Short(i16),
    Uint(u32),
    Int(i32),
    Char(char),
    Ulong(u64),
    Long(i64),
    Timestamp(i64),
    Float(f32),
    Double(f64),
    Decimal32(u32),
    Decimal64(u64),
    Decimal128([u8; 16]),
    Uuid([u8; 16]),
    Binary(Span),
    String(Span),
    Symbol(Span),
    Described,
    Array { described: bool, element: TypeCode },
    List,
    Map,
}

impl Atom {
    pub fn type_code(&self) -> TypeCode {
        match self {
            Atom::Null => TypeCode::Null,
            Atom::Bool(_) => TypeCode::Bool,
            Atom::Ubyte(_) => TypeCode::Ubyte,
            Atom::Byte(_) => TypeCode::Byte,
            Atom::Ushort(_) => TypeCode::Ushort,
            Atom::Short(_) => TypeCode::Short,
            Atom::Uint(_) => TypeCode::Uint,
            Atom::Int(_) => TypeCode::Int,
            Atom::Char(_) => TypeCode::Char,
            Atom::Ulong(_) => TypeCode::Ulong,
            Atom::Long(_) => TypeCode::Long,
            Atom::Timestamp(_) => TypeCode::Timestamp,
            Atom::Float(_) => TypeCode::Float,
            Atom::Double(_) => TypeCode::Double,
            Atom::Decimal32(_) => TypeCode::Decimal32,
            Atom::Decimal64(_) => TypeCode::Decimal64,
            Atom::Decimal128(_) => TypeCode::Decimal128,
            Atom::Uuid(_) => TypeCode::Uuid,
            Atom::Binary(_) => TypeCode::Binary,
            Atom::String(_) => TypeCode::String,
            Atom::Symbol(_) => TypeCode::Symbol,
            Atom::Described => TypeCode::Described,
            Atom::Array { .. } => TypeCode::Array,
            Atom::List => TypeCode::List,
            Atom::Map => TypeCode::Map,
        }
    }
}

/// One arena slot.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
    pub atom: Atom,
    pub parent: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    /// First child.
    pub down: Option<NodeId>,
    pub children: u32,
}

impl Node {
    pub fn new(atom: Atom, parent: Option<NodeId>) -> Self {
        Self {
            atom,
            parent,
            prev: None,
            next: None,
            down: None,
            children: 0,
        }
    }
}

/// Growable, bounded node store.
#[derive(Debug, Clone)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
    max_nodes: usize,
}

impl Arena {
    /// Creates an arena with room for `initial` nodes, never exceeding `max_nodes`.
    pub fn new(initial: usize, max_nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(initial.min(max_nodes)),
            max_nodes,
        }
    }

    /// Stores a node and returns its index.
    ///
    /// When the arena is at its bound, or the allocator refuses to grow it,
    /// the arena is left exactly as it was.
    pub fn allocate(&mut self, node: Node) -> Result<NodeId, Error> {
        let len = self.nodes.len();
        if len >= self.max_nodes {
            debug!(max_nodes = self.max_nodes, "node arena full");
            return Err(Error::NodeLimit { max: self.max_nodes });
        }
        if len == self.nodes.capacity() {
            let target = (len * 2).max(len + 1).min(self.max_nodes);
            trace!(from = len, to = target, "growing node arena");
            if self.nodes.try_reserve_exact(target - len).is_err() {
                debug!(requested = target, "node arena growth refused");
                return Err(Error::NodeLimit { max: len });
            }
        }
        self.nodes.push(node);
        Ok(NodeId(len as u32))
    }

    /// Drops every node, keeping the backing storage.
    #[inline]
    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    /// Drops nodes allocated after the arena held `len` nodes.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    #[inline]
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
