//! Binary encoding of value documents.
//!
//! Encoding runs in two passes. The layout pass walks the tree bottom-up,
//! recording the content size of every compound and the element constructor
//! of every array, which fixes each constructor and length field. The emit
//! pass then writes the bytes through a bounded [`Writer`]. Because sizes are
//! known before anything is written, every length field is exact and an
//! undersized buffer is rejected before the first byte is touched.

use crate::codec::constructor::{self as ctor, array_element, fixed_width, size_width};
use crate::codec::primitives::Writer;
use crate::error::Error;
use crate::model::arena::{Atom, NodeId};
use crate::model::Document;

const COMPACT_MAX: usize = u8::MAX as usize;
const WIDE_MAX: usize = u32::MAX as usize;

/// Sizes and constructors chosen for one document.
struct Layout<'d> {
    doc: &'d Document,
    /// Content bytes of each compound (everything after the count field).
    content: Vec<usize>,
    /// Element constructor of each array.
    element: Vec<u8>,
}

impl<'d> Layout<'d> {
    fn new(doc: &'d Document) -> Self {
        Self {
            doc,
            content: vec![0; doc.size()],
            element: vec![ctor::NULL; doc.size()],
        }
    }

    /// Plans the subtree at `id` and returns its standalone encoded length.
    fn plan(&mut self, id: NodeId) -> Result<usize, Error> {
        let doc = self.doc;
        let node = *doc.node(id);
        match node.atom {
            Atom::Described => {
                if node.children != 2 {
                    return Err(Error::IncompleteDescribed {
                        children: node.children as usize,
                    });
                }
                let mut total = 1;
                for child in doc.children(id) {
                    total += self.plan(child)?;
                }
                Ok(total)
            }
            Atom::Map if node.children % 2 == 1 => Err(Error::IncompleteMap {
                children: node.children as usize,
            }),
            Atom::List | Atom::Map => {
                let mut content = 0;
                for child in doc.children(id) {
                    content += self.plan(child)?;
                }
                self.content[id.index()] = content;
                self.standalone_len(id)
            }
            Atom::Array { described, element } => {
                let mut children = doc.children(id);
                // element constructor byte
                let mut content = 1;
                if described {
                    let descriptor = children
                        .next()
                        .ok_or(Error::IncompleteDescribed { children: 0 })?;
                    content += 1 + self.plan(descriptor)?;
                }
                let mut compact = true;
                for child in children.clone() {
                    self.plan(child)?;
                    compact &= self.fits_compact(child);
                }
                let elem = array_element(element, compact);
                self.element[id.index()] = elem;
                for child in children {
                    content += self.payload_len(child, elem);
                }
                self.content[id.index()] = content;
                self.standalone_len(id)
            }
            _ => self.standalone_len(id),
        }
    }

    fn standalone_len(&self, id: NodeId) -> Result<usize, Error> {
        let ctor = self.constructor(id);
        let len = self.payload_len(id, ctor);
        if size_width(ctor) == Some(4) && len > WIDE_MAX {
            return Err(Error::PayloadLimit { max: WIDE_MAX });
        }
        Ok(1 + len)
    }

    /// Element count written in a compound's count field.
    fn count(&self, id: NodeId) -> usize {
        let node = self.doc.node(id);
        match node.atom {
            Atom::Array { described, .. } => node.children as usize - described as usize,
            _ => node.children as usize,
        }
    }

    /// Returns true if the value fits the 8-bit size/count form.
    fn fits_compact(&self, id: NodeId) -> bool {
        match self.doc.node(id).atom {
            Atom::Binary(s) | Atom::String(s) | Atom::Symbol(s) => s.len as usize <= COMPACT_MAX,
            Atom::List | Atom::Map | Atom::Array { .. } => {
                self.count(id) <= COMPACT_MAX && self.content[id.index()] + 1 <= COMPACT_MAX
            }
            _ => true,
        }
    }

    /// Constructor for a value encoded on its own (not as an array element).
    fn constructor(&self, id: NodeId) -> u8 {
        let node = self.doc.node(id);
        match node.atom {
            Atom::Null => ctor::NULL,
            Atom::Bool(true) => ctor::TRUE,
            Atom::Bool(false) => ctor::FALSE,
            Atom::Ubyte(_) => ctor::UBYTE,
            Atom::Byte(_) => ctor::BYTE,
            Atom::Ushort(_) => ctor::USHORT,
            Atom::Short(_) => ctor::SHORT,
            Atom::Uint(0) => ctor::UINT0,
            Atom::Uint(v) if v <= 0xff => ctor::SMALLUINT,
            Atom::Uint(_) => ctor::UINT,
            Atom::Int(v) if (-128..=127).contains(&v) => ctor::SMALLINT,
            Atom::Int(_) => ctor::INT,
            Atom::Char(_) => ctor::CHAR,
            Atom::Ulong(0) => ctor::ULONG0,
            Atom::Ulong(v) if v <= 0xff => ctor::SMALLULONG,
            Atom::Ulong(_) => ctor::ULONG,
            Atom::Long(v) if (-128..=127).contains(&v) => ctor::SMALLLONG,
            Atom::Long(_) => ctor::LONG,
            Atom::Timestamp(_) => ctor::TIMESTAMP,
            Atom::Float(_) => ctor::FLOAT,
            Atom::Double(_) => ctor::DOUBLE,
            Atom::Decimal32(_) => ctor::DECIMAL32,
            Atom::Decimal64(_) => ctor::DECIMAL64,
            Atom::Decimal128(_) => ctor::DECIMAL128,
            Atom::Uuid(_) => ctor::UUID,
            Atom::Binary(_) if self.fits_compact(id) => ctor::VBIN8,
            Atom::Binary(_) => ctor::VBIN32,
            Atom::String(_) if self.fits_compact(id) => ctor::STR8,
            Atom::String(_) => ctor::STR32,
            Atom::Symbol(_) if self.fits_compact(id) => ctor::SYM8,
            Atom::Symbol(_) => ctor::SYM32,
            Atom::List if node.children == 0 => ctor::LIST0,
            Atom::List if self.fits_compact(id) => ctor::LIST8,
            Atom::List => ctor::LIST32,
            Atom::Map if self.fits_compact(id) => ctor::MAP8,
            Atom::Map => ctor::MAP32,
            Atom::Array { .. } if self.fits_compact(id) => ctor::ARRAY8,
            Atom::Array { .. } => ctor::ARRAY32,
            Atom::Described => ctor::DESCRIBED,
        }
    }

    /// Bytes following the constructor when `id` is encoded with `ctor`.
    fn payload_len(&self, id: NodeId, ctor: u8) -> usize {
        if let Some(width) = fixed_width(ctor) {
            return width;
        }
        let width = size_width(ctor).unwrap_or(0);
        match self.doc.node(id).atom {
            Atom::Binary(s) | Atom::String(s) | Atom::Symbol(s) => width + s.len as usize,
            Atom::List | Atom::Map | Atom::Array { .. } => 2 * width + self.content[id.index()],
            _ => 0,
        }
    }

    // =========================================================================
    // Emit
    // =========================================================================

    fn write_value(&self, w: &mut Writer<'_>, id: NodeId) -> Result<(), Error> {
        if matches!(self.doc.node(id).atom, Atom::Described) {
            w.write_byte(ctor::DESCRIBED)?;
            for child in self.doc.children(id) {
                self.write_value(w, child)?;
            }
            return Ok(());
        }
        let ctor = self.constructor(id);
        w.write_byte(ctor)?;
        self.write_payload(w, id, ctor)
    }

    fn write_payload(&self, w: &mut Writer<'_>, id: NodeId, ctor: u8) -> Result<(), Error> {
        let node = self.doc.node(id);
        match node.atom {
            Atom::Null => {}
            Atom::Bool(v) => {
                if ctor == ctor::BOOLEAN {
                    w.write_byte(v as u8)?;
                }
            }
            Atom::Ubyte(v) => w.write_byte(v)?,
            Atom::Byte(v) => w.write_byte(v as u8)?,
            Atom::Ushort(v) => w.write_u16(v)?,
            Atom::Short(v) => w.write_u16(v as u16)?,
            Atom::Uint(v) => match ctor {
                ctor::UINT0 => {}
                ctor::SMALLUINT => w.write_byte(v as u8)?,
                _ => w.write_u32(v)?,
            },
            Atom::Int(v) => match ctor {
                ctor::SMALLINT => w.write_byte(v as i8 as u8)?,
                _ => w.write_u32(v as u32)?,
            },
            Atom::Char(c) => w.write_u32(c as u32)?,
            Atom::Ulong(v) => match ctor {
                ctor::ULONG0 => {}
                ctor::SMALLULONG => w.write_byte(v as u8)?,
                _ => w.write_u64(v)?,
            },
            Atom::Long(v) => match ctor {
                ctor::SMALLLONG => w.write_byte(v as i8 as u8)?,
                _ => w.write_u64(v as u64)?,
            },
            Atom::Timestamp(v) => w.write_u64(v as u64)?,
            Atom::Float(v) => w.write_u32(v.to_bits())?,
            Atom::Double(v) => w.write_u64(v.to_bits())?,
            Atom::Decimal32(v) => w.write_u32(v)?,
            Atom::Decimal64(v) => w.write_u64(v)?,
            Atom::Decimal128(v) | Atom::Uuid(v) => w.write_bytes(&v)?,
            Atom::Binary(s) | Atom::String(s) | Atom::Symbol(s) => {
                let width = size_width(ctor).unwrap_or(4);
                w.write_width(width, s.len as usize)?;
                w.write_bytes(self.doc.payload(s))?;
            }
            Atom::List | Atom::Map => {
                if ctor == ctor::LIST0 {
                    return Ok(());
                }
                let width = size_width(ctor).unwrap_or(4);
                w.write_width(width, width + self.content[id.index()])?;
                w.write_width(width, node.children as usize)?;
                for child in self.doc.children(id) {
                    self.write_value(w, child)?;
                }
            }
            Atom::Array { described, .. } => {
                let width = size_width(ctor).unwrap_or(4);
                w.write_width(width, width + self.content[id.index()])?;
                w.write_width(width, self.count(id))?;
                let mut children = self.doc.children(id);
                if described {
                    w.write_byte(ctor::DESCRIBED)?;
                    if let Some(descriptor) = children.next() {
                        self.write_value(w, descriptor)?;
                    }
                }
                let elem = self.element[id.index()];
                w.write_byte(elem)?;
                for child in children {
                    self.write_payload(w, child, elem)?;
                }
            }
            Atom::Described => {
                for child in self.doc.children(id) {
                    self.write_value(w, child)?;
                }
            }
        }
        Ok(())
    }
}

/// Plans every top-level value of the document's view.
fn plan_document(doc: &Document) -> Result<(Layout<'_>, usize), Error> {
    let mut layout = Layout::new(doc);
    let mut total = 0;
    for id in doc.roots() {
        total += layout.plan(id)?;
    }
    Ok((layout, total))
}

/// Returns the number of bytes [`encode`] would write.
pub fn encoded_size(doc: &Document) -> Result<usize, Error> {
    plan_document(doc).map(|(_, total)| total)
}

/// Encodes every top-level value of the document's view into `buf`.
///
/// Returns the number of bytes written. Fails without writing if `buf` is
/// too small.
pub fn encode(doc: &Document, buf: &mut [u8]) -> Result<usize, Error> {
    let (layout, total) = plan_document(doc)?;
    if total > buf.len() {
        return Err(Error::BufferTooSmall {
            needed: total,
            capacity: buf.len(),
        });
    }
    let mut writer = Writer::new(buf);
    for id in doc.roots() {
        layout.write_value(&mut writer, id)?;
    }
    debug_assert_eq!(writer.len(), total);
    Ok(writer.len())
}

/// Encodes the document's view into a new vector.
pub fn encode_to_vec(doc: &Document) -> Result<Vec<u8>, Error> {
    let (layout, total) = plan_document(doc)?;
    let mut buf = vec![0u8; total];
    let mut writer = Writer::new(&mut buf);
    for id in doc.roots() {
        layout.write_value(&mut writer, id)?;
    }
    Ok(buf)
}

impl Document {
    /// See [`encoded_size`].
    pub fn encoded_size(&self) -> Result<usize, Error> {
        encoded_size(self)
    }

    /// See [`encode`].
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, Error> {
        encode(self, buf)
    }

    /// See [`encode_to_vec`].
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, Error> {
        encode_to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::TypeCode;

    fn bytes_of(doc: &Document) -> Vec<u8> {
        doc.encode_to_vec().unwrap()
    }

    #[test]
    fn test_compact_scalars() {
        let mut doc = Document::new();
        doc.put_null().unwrap();
        doc.put_bool(true).unwrap();
        doc.put_bool(false).unwrap();
        doc.put_uint(0).unwrap();
        doc.put_uint(7).unwrap();
        doc.put_uint(300).unwrap();
        doc.put_int(-2).unwrap();
        doc.put_ulong(0).unwrap();
        doc.put_ulong(16).unwrap();
        doc.put_long(-129).unwrap();
        assert_eq!(
            bytes_of(&doc),
            vec![
                0x40, 0x41, 0x42, 0x43, 0x52, 7, 0x70, 0, 0, 1, 44, 0x54, 0xfe, 0x44, 0x53, 16,
                0x81, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
            ]
        );
    }

    #[test]
    fn test_strings_and_symbols() {
        let mut doc = Document::new();
        doc.put_string("hi").unwrap();
        doc.put_symbol("x").unwrap();
        doc.put_binary(&[0xde, 0xad]).unwrap();
        assert_eq!(
            bytes_of(&doc),
            vec![0xa1, 2, b'h', b'i', 0xa3, 1, b'x', 0xa0, 2, 0xde, 0xad]
        );

        doc.clear();
        let long = "a".repeat(300);
        doc.put_string(&long).unwrap();
        let bytes = bytes_of(&doc);
        assert_eq!(&bytes[..5], &[0xb1, 0, 0, 1, 44]);
        assert_eq!(bytes.len(), 305);
    }

    #[test]
    fn test_described_open_list() {
        let mut doc = Document::new();
        doc.put_described().unwrap();
        doc.enter().unwrap();
        doc.put_ulong(0x10).unwrap();
        doc.put_list().unwrap();
        doc.enter().unwrap();
        doc.put_string("c").unwrap();
        doc.put_null().unwrap();
        doc.exit().unwrap();
        doc.exit().unwrap();
        assert_eq!(
            bytes_of(&doc),
            vec![0x00, 0x53, 0x10, 0xc0, 5, 2, 0xa1, 1, b'c', 0x40]
        );
    }

    #[test]
    fn test_empty_compounds() {
        let mut doc = Document::new();
        doc.put_list().unwrap();
        doc.put_map().unwrap();
        doc.put_array(false, TypeCode::Symbol).unwrap();
        assert_eq!(
            bytes_of(&doc),
            vec![0x45, 0xc1, 1, 0, 0xe0, 2, 0, 0xa3]
        );
    }

    #[test]
    fn test_array_shares_constructor() {
        let mut doc = Document::new();
        doc.put_array(false, TypeCode::Uint).unwrap();
        doc.enter().unwrap();
        doc.put_uint(0).unwrap();
        doc.put_uint(1).unwrap();
        doc.exit().unwrap();
        assert_eq!(
            bytes_of(&doc),
            vec![0xe0, 10, 2, 0x70, 0, 0, 0, 0, 0, 0, 0, 1]
        );
    }

    #[test]
    fn test_described_array() {
        let mut doc = Document::new();
        doc.put_array(true, TypeCode::Bool).unwrap();
        doc.enter().unwrap();
        doc.put_ulong(3).unwrap();
        doc.put_bool(true).unwrap();
        doc.exit().unwrap();
        assert_eq!(
            bytes_of(&doc),
            vec![0xe0, 6, 1, 0x00, 0x53, 3, 0x56, 1]
        );
    }

    #[test]
    fn test_wide_list() {
        let mut doc = Document::new();
        doc.put_list().unwrap();
        doc.enter().unwrap();
        for _ in 0..300 {
            doc.put_null().unwrap();
        }
        doc.exit().unwrap();
        let bytes = bytes_of(&doc);
        assert_eq!(bytes[0], 0xd0);
        assert_eq!(&bytes[1..5], &(4u32 + 300).to_be_bytes());
        assert_eq!(&bytes[5..9], &300u32.to_be_bytes());
        assert_eq!(bytes.len(), 9 + 300);
        assert_eq!(doc.encoded_size().unwrap(), bytes.len());
    }

    #[test]
    fn test_buffer_too_small_writes_nothing() {
        let mut doc = Document::new();
        doc.put_string("hello").unwrap();
        let mut buf = [0xaau8; 4];
        let err = doc.encode(&mut buf).unwrap_err();
        assert_eq!(err, Error::BufferTooSmall { needed: 7, capacity: 4 });
        assert_eq!(buf, [0xaa; 4]);

        let mut buf = [0u8; 7];
        assert_eq!(doc.encode(&mut buf).unwrap(), 7);
    }

    #[test]
    fn test_incomplete_described_rejected() {
        let mut doc = Document::new();
        doc.put_described().unwrap();
        doc.enter().unwrap();
        doc.put_ulong(1).unwrap();
        let err = doc.encode_to_vec().unwrap_err();
        assert_eq!(err, Error::IncompleteDescribed { children: 1 });
    }

    #[test]
    fn test_odd_map_rejected() {
        let mut doc = Document::new();
        doc.fill("[{S}]", &["key".into()]).unwrap();
        let err = doc.encode_to_vec().unwrap_err();
        assert_eq!(err, Error::IncompleteMap { children: 1 });
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(doc.encoded_size().unwrap_err(), err);

        doc.rewind();
        doc.next();
        doc.enter().unwrap();
        doc.next();
        doc.enter().unwrap();
        doc.next();
        doc.put_int(1).unwrap();
        assert_eq!(
            bytes_of(&doc),
            [0xc0, 11, 1, 0xc1, 8, 2, 0xa1, 3, b'k', b'e', b'y', 0x54, 1]
        );
    }

    #[test]
    fn test_empty_document_encodes_nothing() {
        let doc = Document::new();
        assert_eq!(doc.encode(&mut []).unwrap(), 0);
    }
}
