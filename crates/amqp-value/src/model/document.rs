//! Value documents: a node arena plus a cursor.
//!
//! A document holds a forest of AMQP values. Writes happen at the cursor:
//! every `put_*` inserts a node after the current node inside the entered
//! compound (or at the root level when nothing is entered) and makes it the
//! current node. `enter`/`exit` open and close a compound scope; `next`,
//! `prev`, `down` and `up` move the same cursor without modifying the tree.
//!
//! ```rust
//! use amqp_value::{Document, TypeCode};
//!
//! let mut doc = Document::new();
//! doc.put_list().unwrap();
//! doc.enter().unwrap();
//! doc.put_int(1).unwrap();
//! doc.put_string("two").unwrap();
//! doc.exit().unwrap();
//! assert_eq!(doc.inspect(), r#"[1, "two"]"#);
//!
//! doc.rewind();
//! assert!(doc.next());
//! assert_eq!(doc.type_code(), Some(TypeCode::List));
//! assert_eq!(doc.get_list(), Some(2));
//! ```

use std::borrow::Cow;

use uuid::Uuid;

use crate::error::Error;
use crate::limits::{INITIAL_NODES, MAX_DEPTH, MAX_NODES, MAX_PAYLOAD_BYTES};
use crate::model::arena::{Arena, Atom, Node, NodeId, Span};
use crate::model::{TypeCode, Value};

/// Sizing and bounds for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Nodes reserved up front.
    pub initial_nodes: usize,
    /// Maximum node count; clamped to [`MAX_NODES`].
    pub max_nodes: usize,
    /// Maximum compound nesting depth; clamped to [`MAX_DEPTH`].
    pub max_depth: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            initial_nodes: INITIAL_NODES,
            max_nodes: MAX_NODES,
            max_depth: MAX_DEPTH,
        }
    }
}

impl DocumentOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of nodes reserved up front.
    pub fn initial_nodes(mut self, n: usize) -> Self {
        self.initial_nodes = n;
        self
    }

    /// Sets the maximum node count.
    pub fn max_nodes(mut self, n: usize) -> Self {
        self.max_nodes = n;
        self
    }

    /// Sets the maximum nesting depth.
    pub fn max_depth(mut self, n: usize) -> Self {
        self.max_depth = n;
        self
    }
}

/// A saved cursor position, see [`Document::point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    parent: Option<NodeId>,
    current: Option<NodeId>,
    generation: u32,
}

/// State needed to undo a multi-node insertion.
#[derive(Debug)]
pub(crate) struct Checkpoint {
    nodes: usize,
    bytes: usize,
    root: Option<NodeId>,
    parent: Option<NodeId>,
    current: Option<NodeId>,
    saved: Vec<(NodeId, Node)>,
}

/// A tree of AMQP values backed by a bounded node arena.
#[derive(Debug, Clone)]
pub struct Document {
    arena: Arena,
    bytes: Vec<u8>,
    root: Option<NodeId>,
    parent: Option<NodeId>,
    current: Option<NodeId>,
    base_parent: Option<NodeId>,
    base_current: Option<NodeId>,
    max_depth: usize,
    error: Option<Error>,
    /// Bumped by `clear` so cursors saved before it are refused.
    generation: u32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with default options.
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    /// Creates an empty document with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_options(DocumentOptions::default().initial_nodes(capacity))
    }

    /// Creates an empty document with the given options.
    pub fn with_options(options: DocumentOptions) -> Self {
        let max_nodes = options.max_nodes.min(MAX_NODES);
        Self {
            arena: Arena::new(options.initial_nodes, max_nodes),
            bytes: Vec::new(),
            root: None,
            parent: None,
            current: None,
            base_parent: None,
            base_current: None,
            max_depth: options.max_depth.min(MAX_DEPTH),
            error: None,
            generation: 0,
        }
    }

    // =========================================================================
    // Size and errors
    // =========================================================================

    /// Returns the number of nodes in the document.
    pub fn size(&self) -> usize {
        self.arena.len()
    }

    /// Returns true if the document holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// Returns the number of nodes the arena can hold without growing.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Returns the node bound of this document.
    pub fn max_nodes(&self) -> usize {
        self.arena.max_nodes()
    }

    /// Returns the maximum nesting depth of this document.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the most recent failure of a mutating operation.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Forgets the recorded failure.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn fail<T>(&mut self, err: Error) -> Result<T, Error> {
        self.error = Some(err.clone());
        Err(err)
    }

    /// Empties the document.
    ///
    /// Backing storage is kept; the cursor, narrowing and recorded error are
    /// reset.
    pub fn clear(&mut self) {
        self.arena.reset();
        self.bytes.clear();
        self.root = None;
        self.parent = None;
        self.current = None;
        self.base_parent = None;
        self.base_current = None;
        self.error = None;
        self.generation = self.generation.wrapping_add(1);
    }

    // =========================================================================
    // Node access (crate-internal)
    // =========================================================================

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    #[inline]
    pub(crate) fn payload(&self, span: Span) -> &[u8] {
        &self.bytes[span.range()]
    }

    /// First top-level node of the (possibly narrowed) view.
    pub(crate) fn first_in_scope(&self) -> Option<NodeId> {
        match self.base_parent {
            Some(p) => self.arena.get(p).down,
            None => self.root,
        }
    }

    /// Iterates the children of a node in order.
    pub(crate) fn children(&self, id: NodeId) -> Siblings<'_> {
        Siblings {
            doc: self,
            next: self.arena.get(id).down,
        }
    }

    /// Iterates the top-level nodes of the (possibly narrowed) view.
    pub(crate) fn roots(&self) -> Siblings<'_> {
        Siblings {
            doc: self,
            next: self.first_in_scope(),
        }
    }

    /// Returns the scalar value held by a node.
    pub(crate) fn value_of(&self, id: NodeId) -> Option<Value<'_>> {
        let value = match self.arena.get(id).atom {
            Atom::Null => Value::Null,
            Atom::Bool(v) => Value::Bool(v),
            Atom::Ubyte(v) => Value::Ubyte(v),
            Atom::Byte(v) => Value::Byte(v),
            Atom::Ushort(v) => Value::Ushort(v),
            Atom::Short(v) => Value::Short(v),
            Atom::Uint(v) => Value::Uint(v),
            Atom::Int(v) => Value::Int(v),
            Atom::Char(v) => Value::Char(v),
            Atom::Ulong(v) => Value::Ulong(v),
            Atom::Long(v) => Value::Long(v),
            Atom::Timestamp(v) => Value::Timestamp(v),
            Atom::Float(v) => Value::Float(v),
            Atom::Double(v) => Value::Double(v),
            Atom::Decimal32(v) => Value::Decimal32(v),
            Atom::Decimal64(v) => Value::Decimal64(v),
            Atom::Decimal128(v) => Value::Decimal128(v),
            Atom::Uuid(v) => Value::Uuid(Uuid::from_bytes(v)),
            Atom::Binary(s) => Value::Binary(Cow::Borrowed(self.payload(s))),
            Atom::String(s) => Value::String(Cow::Borrowed(self.payload(s))),
            Atom::Symbol(s) => Value::Symbol(Cow::Borrowed(self.payload(s))),
            Atom::Described | Atom::Array { .. } | Atom::List | Atom::Map => return None,
        };
        Some(value)
    }

    #[inline]
    pub(crate) fn current_node(&self) -> Option<NodeId> {
        self.current
    }

    fn current_atom(&self) -> Option<Atom> {
        self.current.map(|id| self.arena.get(id).atom)
    }

    /// Number of compounds enclosing `id`.
    fn depth_of(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cursor = self.arena.get(id).parent;
        while let Some(p) = cursor {
            depth += 1;
            cursor = self.arena.get(p).parent;
        }
        depth
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    fn store_payload(&mut self, bytes: &[u8]) -> Result<Span, Error> {
        let start = self.bytes.len();
        if start + bytes.len() > MAX_PAYLOAD_BYTES {
            return Err(Error::PayloadLimit {
                max: MAX_PAYLOAD_BYTES,
            });
        }
        self.bytes.extend_from_slice(bytes);
        Ok(Span {
            start: start as u32,
            len: bytes.len() as u32,
        })
    }

    fn atom_for(&mut self, value: Value<'_>) -> Result<Atom, Error> {
        let atom = match value {
            Value::Null => Atom::Null,
            Value::Bool(v) => Atom::Bool(v),
            Value::Ubyte(v) => Atom::Ubyte(v),
            Value::Byte(v) => Atom::Byte(v),
            Value::Ushort(v) => Atom::Ushort(v),
            Value::Short(v) => Atom::Short(v),
            Value::Uint(v) => Atom::Uint(v),
            Value::Int(v) => Atom::Int(v),
            Value::Char(v) => Atom::Char(v),
            Value::Ulong(v) => Atom::Ulong(v),
            Value::Long(v) => Atom::Long(v),
            Value::Timestamp(v) => Atom::Timestamp(v),
            Value::Float(v) => Atom::Float(v),
            Value::Double(v) => Atom::Double(v),
            Value::Decimal32(v) => Atom::Decimal32(v),
            Value::Decimal64(v) => Atom::Decimal64(v),
            Value::Decimal128(v) => Atom::Decimal128(v),
            Value::Uuid(v) => Atom::Uuid(*v.as_bytes()),
            Value::Binary(b) => Atom::Binary(self.store_payload(&b)?),
            Value::String(b) => Atom::String(self.store_payload(&b)?),
            Value::Symbol(b) => Atom::Symbol(self.store_payload(&b)?),
        };
        Ok(atom)
    }

    /// Links a new node after the current node and makes it current.
    ///
    /// Nothing is modified when the node cannot be placed.
    pub(crate) fn add(&mut self, atom: Atom) -> Result<NodeId, Error> {
        if let Some(p) = self.parent {
            let array = self.arena.get(p);
            if let Atom::Array { described, element } = array.atom {
                let found = atom.type_code();
                if described && self.current.is_none() {
                    // the head of a described array holds its descriptor
                    if array.children > 0 {
                        return Err(Error::DescriptorTaken);
                    }
                } else if found != element {
                    return Err(Error::ArrayElementMismatch { element, found });
                }
            }
        }

        let id = self.arena.allocate(Node::new(atom, self.parent))?;

        match (self.current, self.parent) {
            (Some(cur), _) => {
                let next = self.arena.get(cur).next;
                if let Some(n) = next {
                    self.arena.get_mut(n).prev = Some(id);
                }
                let node = self.arena.get_mut(id);
                node.next = next;
                node.prev = Some(cur);
                self.arena.get_mut(cur).next = Some(id);
            }
            (None, Some(p)) => {
                let first = self.arena.get(p).down;
                if let Some(f) = first {
                    self.arena.get_mut(f).prev = Some(id);
                }
                self.arena.get_mut(id).next = first;
                self.arena.get_mut(p).down = Some(id);
            }
            (None, None) => {
                if let Some(f) = self.root {
                    self.arena.get_mut(f).prev = Some(id);
                }
                self.arena.get_mut(id).next = self.root;
                self.root = Some(id);
            }
        }

        if let Some(p) = self.parent {
            self.arena.get_mut(p).children += 1;
        }
        self.current = Some(id);
        Ok(id)
    }

    fn put_atom(&mut self, atom: Atom) -> Result<(), Error> {
        match self.add(atom) {
            Ok(_) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    /// Inserts a value without recording failures.
    pub(crate) fn insert(&mut self, value: Value<'_>) -> Result<NodeId, Error> {
        let mark = self.bytes.len();
        let result = self.atom_for(value).and_then(|atom| self.add(atom));
        if result.is_err() {
            self.bytes.truncate(mark);
        }
        result
    }

    /// Inserts a scalar value.
    pub fn put(&mut self, value: Value<'_>) -> Result<(), Error> {
        match self.insert(value) {
            Ok(_) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    pub fn put_null(&mut self) -> Result<(), Error> {
        self.put_atom(Atom::Null)
    }

    pub fn put_bool(&mut self, v: bool) -> Result<(), Error> {
        self.put_atom(Atom::Bool(v))
    }

    pub fn put_ubyte(&mut self, v: u8) -> Result<(), Error> {
        self.put_atom(Atom::Ubyte(v))
    }

    pub fn put_byte(&mut self, v: i8) -> Result<(), Error> {
        self.put_atom(Atom::Byte(v))
    }

    pub fn put_ushort(&mut self, v: u16) -> Result<(), Error> {
        self.put_atom(Atom::Ushort(v))
    }

    pub fn put_short(&mut self, v: i16) -> Result<(), Error> {
        self.put_atom(Atom::Short(v))
    }

    pub fn put_uint(&mut self, v: u32) -> Result<(), Error> {
        self.put_atom(Atom::Uint(v))
    }

    pub fn put_int(&mut self, v: i32) -> Result<(), Error> {
        self.put_atom(Atom::Int(v))
    }

    pub fn put_char(&mut self, v: char) -> Result<(), Error> {
        self.put_atom(Atom::Char(v))
    }

    pub fn put_ulong(&mut self, v: u64) -> Result<(), Error> {
        self.put_atom(Atom::Ulong(v))
    }

    pub fn put_long(&mut self, v: i64) -> Result<(), Error> {
        self.put_atom(Atom::Long(v))
    }

    /// Inserts a timestamp in milliseconds since the Unix epoch.
    pub fn put_timestamp(&mut self, v: i64) -> Result<(), Error> {
        self.put_atom(Atom::Timestamp(v))
    }

    pub fn put_float(&mut self, v: f32) -> Result<(), Error> {
        self.put_atom(Atom::Float(v))
    }

    pub fn put_double(&mut self, v: f64) -> Result<(), Error> {
        self.put_atom(Atom::Double(v))
    }

    pub fn put_decimal32(&mut self, v: u32) -> Result<(), Error> {
        self.put_atom(Atom::Decimal32(v))
    }

    pub fn put_decimal64(&mut self, v: u64) -> Result<(), Error> {
        self.put_atom(Atom::Decimal64(v))
    }

    pub fn put_decimal128(&mut self, v: [u8; 16]) -> Result<(), Error> {
        self.put_atom(Atom::Decimal128(v))
    }

    pub fn put_uuid(&mut self, v: Uuid) -> Result<(), Error> {
        self.put_atom(Atom::Uuid(*v.as_bytes()))
    }

    pub fn put_binary(&mut self, v: &[u8]) -> Result<(), Error> {
        self.put(Value::Binary(Cow::Borrowed(v)))
    }

    pub fn put_string(&mut self, v: &str) -> Result<(), Error> {
        self.put(Value::String(Cow::Borrowed(v.as_bytes())))
    }

    pub fn put_symbol(&mut self, v: &str) -> Result<(), Error> {
        self.put(Value::Symbol(Cow::Borrowed(v.as_bytes())))
    }

    /// Inserts a described value. After [`enter`](Self::enter), the next two
    /// values put become its descriptor and body.
    pub fn put_described(&mut self) -> Result<(), Error> {
        self.put_atom(Atom::Described)
    }

    /// Inserts an empty list.
    pub fn put_list(&mut self) -> Result<(), Error> {
        self.put_atom(Atom::List)
    }

    /// Inserts an empty map. Children alternate key, value.
    pub fn put_map(&mut self) -> Result<(), Error> {
        self.put_atom(Atom::Map)
    }

    /// Inserts an empty array of `element` values.
    ///
    /// A described array takes its descriptor as the first child.
    pub fn put_array(&mut self, described: bool, element: TypeCode) -> Result<(), Error> {
        if element == TypeCode::Described {
            return self.fail(Error::InvalidArrayElement { element });
        }
        self.put_atom(Atom::Array {
            described,
            element,
        })
    }

    /// Sets the element type of an array whose descriptor was decoded first.
    pub(crate) fn set_array_element(&mut self, id: NodeId, element: TypeCode) {
        if let Atom::Array { described, .. } = self.arena.get(id).atom {
            self.arena.get_mut(id).atom = Atom::Array {
                described,
                element,
            };
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub(crate) fn try_enter(&mut self) -> Result<(), Error> {
        let current = self.current.ok_or(Error::NoCurrentNode)?;
        let found = self.arena.get(current).atom.type_code();
        if !found.is_compound() {
            return Err(Error::TypeMismatch {
                expected: "compound value",
                found,
            });
        }
        if self.depth_of(current) + 1 > self.max_depth {
            return Err(Error::DepthLimit {
                max: self.max_depth,
            });
        }
        self.parent = Some(current);
        self.current = None;
        Ok(())
    }

    pub(crate) fn try_exit(&mut self) -> Result<(), Error> {
        match self.parent {
            Some(p) if self.parent != self.base_parent => {
                self.current = Some(p);
                self.parent = self.arena.get(p).parent;
                Ok(())
            }
            _ => Err(Error::NotEntered),
        }
    }

    /// Opens the current compound so that puts and navigation apply to its
    /// children.
    pub fn enter(&mut self) -> Result<(), Error> {
        match self.try_enter() {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    /// Closes the entered compound, making it the current node.
    pub fn exit(&mut self) -> Result<(), Error> {
        match self.try_exit() {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    /// Moves into the current compound. Returns false if it is not one.
    pub fn down(&mut self) -> bool {
        self.try_enter().is_ok()
    }

    /// Moves out of the entered compound. Returns false at the top level.
    pub fn up(&mut self) -> bool {
        self.try_exit().is_ok()
    }

    /// Advances to the next sibling (or the first child of the entered
    /// compound when positioned before it).
    pub fn next(&mut self) -> bool {
        let target = match (self.current, self.parent) {
            (Some(cur), _) => self.arena.get(cur).next,
            (None, Some(p)) => self.arena.get(p).down,
            (None, None) => self.root,
        };
        match target {
            Some(id) => {
                self.current = Some(id);
                true
            }
            None => false,
        }
    }

    /// Moves back to the previous sibling.
    pub fn prev(&mut self) -> bool {
        match self.current.and_then(|cur| self.arena.get(cur).prev) {
            Some(id) => {
                self.current = Some(id);
                true
            }
            None => false,
        }
    }

    /// Returns the cursor to the start of the (possibly narrowed) view.
    pub fn rewind(&mut self) {
        self.parent = self.base_parent;
        self.current = self.base_current;
    }

    /// Restricts the view to the children of the entered compound.
    ///
    /// Encoding, inspection, `rewind` and `append` from this document then
    /// only see that scope.
    pub fn narrow(&mut self) {
        self.base_parent = self.parent;
        self.base_current = self.current;
    }

    /// Lifts any restriction set by [`narrow`](Self::narrow).
    pub fn widen(&mut self) {
        self.base_parent = None;
        self.base_current = None;
    }

    /// Saves the cursor position.
    ///
    /// The cursor stays valid until the document is cleared.
    pub fn point(&self) -> Cursor {
        Cursor {
            parent: self.parent,
            current: self.current,
            generation: self.generation,
        }
    }

    /// Restores a saved cursor. Returns false if the document was cleared
    /// since the cursor was saved, or the cursor refers to nodes that no
    /// longer exist.
    pub fn restore(&mut self, cursor: Cursor) -> bool {
        if cursor.generation != self.generation {
            return false;
        }
        let len = self.arena.len();
        let valid = |id: Option<NodeId>| id.is_none_or(|id| id.index() < len);
        if !valid(cursor.parent) || !valid(cursor.current) {
            return false;
        }
        self.parent = cursor.parent;
        self.current = cursor.current;
        true
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Type of the current node.
    pub fn type_code(&self) -> Option<TypeCode> {
        self.current_atom().map(|atom| atom.type_code())
    }

    /// Scalar value of the current node.
    pub fn get(&self) -> Option<Value<'_>> {
        self.current.and_then(|id| self.value_of(id))
    }

    pub fn get_bool(&self) -> Option<bool> {
        match self.current_atom()? {
            Atom::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_ubyte(&self) -> Option<u8> {
        match self.current_atom()? {
            Atom::Ubyte(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_byte(&self) -> Option<i8> {
        match self.current_atom()? {
            Atom::Byte(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_ushort(&self) -> Option<u16> {
        match self.current_atom()? {
            Atom::Ushort(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_short(&self) -> Option<i16> {
        match self.current_atom()? {
            Atom::Short(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_uint(&self) -> Option<u32> {
        match self.current_atom()? {
            Atom::Uint(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_int(&self) -> Option<i32> {
        match self.current_atom()? {
            Atom::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_char(&self) -> Option<char> {
        match self.current_atom()? {
            Atom::Char(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_ulong(&self) -> Option<u64> {
        match self.current_atom()? {
            Atom::Ulong(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_long(&self) -> Option<i64> {
        match self.current_atom()? {
            Atom::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_timestamp(&self) -> Option<i64> {
        match self.current_atom()? {
            Atom::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_float(&self) -> Option<f32> {
        match self.current_atom()? {
            Atom::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_double(&self) -> Option<f64> {
        match self.current_atom()? {
            Atom::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_decimal32(&self) -> Option<u32> {
        match self.current_atom()? {
            Atom::Decimal32(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_decimal64(&self) -> Option<u64> {
        match self.current_atom()? {
            Atom::Decimal64(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_decimal128(&self) -> Option<[u8; 16]> {
        match self.current_atom()? {
            Atom::Decimal128(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_uuid(&self) -> Option<Uuid> {
        match self.current_atom()? {
            Atom::Uuid(v) => Some(Uuid::from_bytes(v)),
            _ => None,
        }
    }

    pub fn get_binary(&self) -> Option<&[u8]> {
        match self.current_atom()? {
            Atom::Binary(s) => Some(self.payload(s)),
            _ => None,
        }
    }

    /// Raw bytes of the current string node.
    pub fn get_string(&self) -> Option<&[u8]> {
        match self.current_atom()? {
            Atom::String(s) => Some(self.payload(s)),
            _ => None,
        }
    }

    /// Current string node as `&str`, if it is valid UTF-8.
    pub fn get_str(&self) -> Option<&str> {
        self.get_string().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn get_symbol(&self) -> Option<&[u8]> {
        match self.current_atom()? {
            Atom::Symbol(s) => Some(self.payload(s)),
            _ => None,
        }
    }

    /// Element count of the current list.
    pub fn get_list(&self) -> Option<usize> {
        let id = self.current?;
        let node = self.arena.get(id);
        matches!(node.atom, Atom::List).then_some(node.children as usize)
    }

    /// Element count (keys plus values) of the current map.
    pub fn get_map(&self) -> Option<usize> {
        let id = self.current?;
        let node = self.arena.get(id);
        matches!(node.atom, Atom::Map).then_some(node.children as usize)
    }

    /// Element count of the current array, not counting its descriptor.
    pub fn get_array(&self) -> Option<usize> {
        let id = self.current?;
        let node = self.arena.get(id);
        match node.atom {
            Atom::Array { described, .. } => {
                Some((node.children as usize).saturating_sub(described as usize))
            }
            _ => None,
        }
    }

    /// Element type of the current array.
    pub fn array_type(&self) -> Option<TypeCode> {
        match self.current_atom()? {
            Atom::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Returns true if the current node is a described array.
    pub fn is_array_described(&self) -> bool {
        matches!(
            self.current_atom(),
            Some(Atom::Array {
                described: true,
                ..
            })
        )
    }

    /// Returns true if the current node is a described value.
    pub fn is_described(&self) -> bool {
        matches!(self.current_atom(), Some(Atom::Described))
    }

    // =========================================================================
    // Copying
    // =========================================================================

    /// Replaces this document's content with a copy of `other`'s view.
    pub fn copy(&mut self, other: &Document) -> Result<(), Error> {
        self.clear();
        self.append(other)
    }

    /// Copies every top-level value of `other`'s view to the cursor.
    pub fn append(&mut self, other: &Document) -> Result<(), Error> {
        self.append_n(other, usize::MAX)
    }

    /// Copies at most `limit` top-level values of `other`'s view to the cursor.
    ///
    /// Element types and described flags of arrays are carried over as they
    /// are; nested and described arrays are not reinterpreted.
    pub fn append_n(&mut self, other: &Document, limit: usize) -> Result<(), Error> {
        for id in other.roots().take(limit) {
            if let Err(e) = self.append_node(other, id) {
                return self.fail(e);
            }
        }
        Ok(())
    }

    /// Copies the subtree rooted at `id` of `src` to the cursor.
    pub(crate) fn append_node(&mut self, src: &Document, id: NodeId) -> Result<(), Error> {
        let node = src.node(id);
        match src.value_of(id) {
            Some(value) => {
                self.insert(value)?;
            }
            None => {
                self.add(node.atom)?;
                self.try_enter()?;
                for child in src.children(id) {
                    self.append_node(src, child)?;
                }
                self.try_exit()?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Rollback (decoder support)
    // =========================================================================

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        let mut saved = Vec::with_capacity(3);
        let mut save = |id: Option<NodeId>| {
            if let Some(id) = id {
                saved.push((id, *self.arena.get(id)));
            }
        };
        match (self.current, self.parent) {
            (Some(cur), parent) => {
                save(Some(cur));
                save(self.arena.get(cur).next);
                save(parent);
            }
            (None, Some(p)) => {
                save(Some(p));
                save(self.arena.get(p).down);
            }
            (None, None) => save(self.root),
        }
        Checkpoint {
            nodes: self.arena.len(),
            bytes: self.bytes.len(),
            root: self.root,
            parent: self.parent,
            current: self.current,
            saved,
        }
    }

    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.arena.truncate(checkpoint.nodes);
        self.bytes.truncate(checkpoint.bytes);
        for (id, node) in checkpoint.saved {
            *self.arena.get_mut(id) = node;
        }
        self.root = checkpoint.root;
        self.parent = checkpoint.parent;
        self.current = checkpoint.current;
    }
}

/// Iterator over a run of sibling nodes.
#[derive(Clone)]
pub(crate) struct Siblings<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.arena.get(id).next;
        Some(id)
    }
}
