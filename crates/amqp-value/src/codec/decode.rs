//! Binary decoding of value documents.
//!
//! Every length and count is checked against the remaining input before it
//! is trusted, and every nested compound goes through the document's depth
//! check, so hostile input can neither over-read nor recurse without bound.
//! A failed decode rolls the document back to its state before the call.

use std::borrow::Cow;

use tracing::{debug, trace};
use uuid::Uuid;

use crate::codec::constructor::{self as ctor, size_width, type_of};
use crate::codec::primitives::Reader;
use crate::error::Error;
use crate::model::arena::Atom;
use crate::model::{Document, TypeCode, Value};

struct Decoder<'a, 'd> {
    reader: Reader<'a>,
    doc: &'d mut Document,
}

impl<'a> Decoder<'a, '_> {
    /// Decodes one value, constructor included.
    fn value(&mut self) -> Result<(), Error> {
        let offset = self.reader.position();
        let ctor = self.reader.read_byte("constructor")?;
        if ctor == ctor::DESCRIBED {
            self.doc.add(Atom::Described)?;
            self.doc.try_enter()?;
            self.value()?;
            self.value()?;
            return self.doc.try_exit();
        }
        self.with_constructor(ctor, offset)
    }

    /// Decodes the payload that follows an already-read constructor.
    fn with_constructor(&mut self, ctor: u8, offset: usize) -> Result<(), Error> {
        match ctor {
            ctor::LIST0 => {
                self.doc.add(Atom::List)?;
            }
            ctor::LIST8 | ctor::LIST32 => self.compound(ctor, Atom::List)?,
            ctor::MAP8 | ctor::MAP32 => self.compound(ctor, Atom::Map)?,
            ctor::ARRAY8 | ctor::ARRAY32 => self.array(ctor)?,
            _ => {
                let value = self.scalar(ctor, offset)?;
                self.doc.insert(value)?;
            }
        }
        Ok(())
    }

    /// Reads a size field and checks it against the remaining input.
    fn size(&mut self, width: usize, context: &'static str) -> Result<usize, Error> {
        let size = self.reader.read_width(width, context)?;
        let remaining = self.reader.remaining_len();
        if size > remaining {
            return Err(Error::LengthExceedsInput {
                context,
                declared: size,
                actual: remaining,
            });
        }
        if size < width {
            return Err(Error::LengthMismatch {
                context,
                declared: size,
                actual: width,
            });
        }
        Ok(size)
    }

    fn check_used(&self, context: &'static str, start: usize, size: usize) -> Result<(), Error> {
        let used = self.reader.position() - start;
        if used != size {
            return Err(Error::LengthMismatch {
                context,
                declared: size,
                actual: used,
            });
        }
        Ok(())
    }

    fn compound(&mut self, ctor: u8, atom: Atom) -> Result<(), Error> {
        let context = if matches!(atom, Atom::Map) { "map" } else { "list" };
        let width = size_width(ctor).unwrap_or(4);
        let size = self.size(width, context)?;
        let start = self.reader.position();
        let count = self.reader.read_width(width, context)?;
        if matches!(atom, Atom::Map) && count % 2 != 0 {
            return Err(Error::OddMapCount { count });
        }
        // every element takes at least its constructor byte
        if count > size - width {
            return Err(Error::LengthMismatch {
                context,
                declared: size,
                actual: width + count,
            });
        }

        self.doc.add(atom)?;
        self.doc.try_enter()?;
        for _ in 0..count {
            self.value()?;
        }
        self.doc.try_exit()?;
        self.check_used(context, start, size)
    }

    fn array(&mut self, ctor: u8) -> Result<(), Error> {
        let width = size_width(ctor).unwrap_or(4);
        let size = self.size(width, "array")?;
        let start = self.reader.position();
        let count = self.reader.read_width(width, "array")?;
        let described = self.reader.peek_byte() == Some(ctor::DESCRIBED);

        // the element type is only known once the descriptor has been read
        let id = self.doc.add(Atom::Array {
            described,
            element: TypeCode::Null,
        })?;
        self.doc.try_enter()?;
        if described {
            self.reader.read_byte("array descriptor")?;
            self.value()?;
        }
        let elem_offset = self.reader.position();
        let elem = self.reader.read_byte("array element constructor")?;
        let element = type_of(elem).ok_or(Error::InvalidConstructor {
            byte: elem,
            offset: elem_offset,
        })?;
        self.doc.set_array_element(id, element);
        for _ in 0..count {
            self.with_constructor(elem, elem_offset)?;
        }
        self.doc.try_exit()?;
        self.check_used("array", start, size)
    }

    fn scalar(&mut self, ctor: u8, offset: usize) -> Result<Value<'a>, Error> {
        let r = &mut self.reader;
        let value = match ctor {
            ctor::NULL => Value::Null,
            ctor::TRUE => Value::Bool(true),
            ctor::FALSE => Value::Bool(false),
            ctor::BOOLEAN => match r.read_byte("boolean")? {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                value => return Err(Error::InvalidBool { value }),
            },
            ctor::UBYTE => Value::Ubyte(r.read_byte("ubyte")?),
            ctor::BYTE => Value::Byte(r.read_byte("byte")? as i8),
            ctor::USHORT => Value::Ushort(r.read_u16("ushort")?),
            ctor::SHORT => Value::Short(r.read_u16("short")? as i16),
            ctor::UINT0 => Value::Uint(0),
            ctor::SMALLUINT => Value::Uint(r.read_byte("uint")? as u32),
            ctor::UINT => Value::Uint(r.read_u32("uint")?),
            ctor::SMALLINT => Value::Int(r.read_byte("int")? as i8 as i32),
            ctor::INT => Value::Int(r.read_u32("int")? as i32),
            ctor::CHAR => {
                let value = r.read_u32("char")?;
                Value::Char(char::from_u32(value).ok_or(Error::InvalidChar { value })?)
            }
            ctor::ULONG0 => Value::Ulong(0),
            ctor::SMALLULONG => Value::Ulong(r.read_byte("ulong")? as u64),
            ctor::ULONG => Value::Ulong(r.read_u64("ulong")?),
            ctor::SMALLLONG => Value::Long(r.read_byte("long")? as i8 as i64),
            ctor::LONG => Value::Long(r.read_u64("long")? as i64),
            ctor::TIMESTAMP => Value::Timestamp(r.read_u64("timestamp")? as i64),
            ctor::FLOAT => Value::Float(f32::from_bits(r.read_u32("float")?)),
            ctor::DOUBLE => Value::Double(f64::from_bits(r.read_u64("double")?)),
            ctor::DECIMAL32 => Value::Decimal32(r.read_u32("decimal32")?),
            ctor::DECIMAL64 => Value::Decimal64(r.read_u64("decimal64")?),
            ctor::DECIMAL128 => Value::Decimal128(r.read_array("decimal128")?),
            ctor::UUID => Value::Uuid(Uuid::from_bytes(r.read_array("uuid")?)),
            ctor::VBIN8 | ctor::VBIN32 => Value::Binary(Cow::Borrowed(variable(r, ctor, "binary")?)),
            ctor::STR8 | ctor::STR32 => Value::String(Cow::Borrowed(variable(r, ctor, "string")?)),
            ctor::SYM8 | ctor::SYM32 => Value::Symbol(Cow::Borrowed(variable(r, ctor, "symbol")?)),
            byte => return Err(Error::InvalidConstructor { byte, offset }),
        };
        Ok(value)
    }
}

/// Reads the length-prefixed payload of a binary, string or symbol.
fn variable<'a>(r: &mut Reader<'a>, ctor: u8, context: &'static str) -> Result<&'a [u8], Error> {
    let width = size_width(ctor).unwrap_or(4);
    let len = r.read_width(width, context)?;
    let remaining = r.remaining_len();
    if len > remaining {
        return Err(Error::LengthExceedsInput {
            context,
            declared: len,
            actual: remaining,
        });
    }
    r.read_bytes(len, context)
}

/// Decodes one top-level value from `bytes` at the document's cursor.
///
/// Returns the number of bytes consumed. Trailing bytes are left for the
/// caller. On failure the document is restored to its state before the call
/// and the error is recorded.
pub fn decode(doc: &mut Document, bytes: &[u8]) -> Result<usize, Error> {
    let checkpoint = doc.checkpoint();
    let mut decoder = Decoder {
        reader: Reader::new(bytes),
        doc: &mut *doc,
    };
    match decoder.value() {
        Ok(()) => {
            let consumed = decoder.reader.position();
            trace!(consumed, "decoded value");
            Ok(consumed)
        }
        Err(e) => {
            let offset = decoder.reader.position();
            debug!(error = %e, offset, "rejected encoded value");
            doc.rollback(checkpoint);
            doc.fail(e)
        }
    }
}

impl Document {
    /// See [`decode`].
    pub fn decode(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        decode(self, bytes)
    }
}
