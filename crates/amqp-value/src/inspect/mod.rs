//! Canonical text form of a document.
//!
//! The rendering is deterministic and total, and two documents compare
//! equal exactly when their text forms are identical.
//!
//! ```rust
//! use amqp_value::{Document, TypeCode};
//!
//! let mut doc = Document::new();
//! doc.put_array(false, TypeCode::Symbol).unwrap();
//! doc.enter().unwrap();
//! doc.put_symbol("foo").unwrap();
//! doc.put_symbol("bar").unwrap();
//! doc.exit().unwrap();
//! assert_eq!(doc.to_string(), "@PN_SYMBOL[:foo, :bar]");
//! ```

pub mod descriptors;

use std::fmt::{self, Write};

use uuid::Uuid;

use crate::model::arena::{Atom, NodeId};
use crate::model::Document;

pub use descriptors::Descriptor;

struct Inspector<'d> {
    doc: &'d Document,
}

impl Inspector<'_> {
    fn node(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        let doc = self.doc;
        match doc.node(id).atom {
            Atom::Null => f.write_str("null"),
            Atom::Bool(v) => write!(f, "{v}"),
            Atom::Ubyte(v) => write!(f, "{v}"),
            Atom::Byte(v) => write!(f, "{v}"),
            Atom::Ushort(v) => write!(f, "{v}"),
            Atom::Short(v) => write!(f, "{v}"),
            Atom::Uint(v) => write!(f, "{v}"),
            Atom::Int(v) => write!(f, "{v}"),
            Atom::Char(v) => write!(f, "'{}'", v.escape_default()),
            Atom::Ulong(v) => write!(f, "{v}"),
            Atom::Long(v) => write!(f, "{v}"),
            Atom::Timestamp(v) => write!(f, "t({v})"),
            Atom::Float(v) => write!(f, "{v:?}"),
            Atom::Double(v) => write!(f, "{v:?}"),
            Atom::Decimal32(v) => write!(f, "D32(0x{v:08x})"),
            Atom::Decimal64(v) => write!(f, "D64(0x{v:016x})"),
            Atom::Decimal128(v) => {
                f.write_str("D128(0x")?;
                for byte in v {
                    write!(f, "{byte:02x}")?;
                }
                f.write_char(')')
            }
            Atom::Uuid(v) => write!(f, "UUID({})", Uuid::from_bytes(v)),
            Atom::Binary(s) => {
                f.write_char('b')?;
                quote(f, doc.payload(s))
            }
            Atom::String(s) => quote(f, doc.payload(s)),
            Atom::Symbol(s) => {
                let bytes = doc.payload(s);
                f.write_char(':')?;
                if is_identifier(bytes) {
                    // identifiers are ASCII
                    bytes.iter().try_for_each(|&b| f.write_char(b as char))
                } else {
                    quote(f, bytes)
                }
            }
            Atom::List => {
                f.write_char('[')?;
                self.sequence(f, doc.children(id), None)?;
                f.write_char(']')
            }
            Atom::Map => {
                f.write_char('{')?;
                for (i, child) in doc.children(id).enumerate() {
                    if i > 0 {
                        f.write_str(if i % 2 == 1 { "=" } else { ", " })?;
                    }
                    self.node(f, child)?;
                }
                f.write_char('}')
            }
            Atom::Array {
                described,
                element,
            } => {
                let mut children = doc.children(id);
                if described {
                    self.descriptor(f, children.next())?;
                    f.write_char(' ')?;
                }
                write!(f, "@{}[", element.name())?;
                self.sequence(f, children, None)?;
                f.write_char(']')
            }
            Atom::Described => {
                let mut children = doc.children(id);
                let fields = self.descriptor(f, children.next())?;
                f.write_char(' ')?;
                match children.next() {
                    Some(body) if fields.is_some() && matches!(doc.node(body).atom, Atom::List) => {
                        f.write_char('[')?;
                        self.sequence(f, doc.children(body), fields)?;
                        f.write_char(']')
                    }
                    Some(body) => self.node(f, body),
                    None => Ok(()),
                }
            }
        }
    }

    /// Writes `@descriptor` and returns the field names of a well-known
    /// descriptor.
    fn descriptor(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: Option<NodeId>,
    ) -> Result<Option<&'static [&'static str]>, fmt::Error> {
        f.write_char('@')?;
        let Some(id) = id else {
            return Ok(None);
        };
        if let Atom::Ulong(code) = self.doc.node(id).atom {
            if let Some(known) = descriptors::lookup(code) {
                write!(f, "{}({code})", known.name)?;
                return Ok(Some(known.fields));
            }
        }
        self.node(f, id)?;
        Ok(None)
    }

    /// Writes comma-separated values. With field names, values are written
    /// as `name=value` and null fields are left out.
    fn sequence(
        &self,
        f: &mut fmt::Formatter<'_>,
        items: impl Iterator<Item = NodeId>,
        fields: Option<&[&str]>,
    ) -> fmt::Result {
        let mut first = true;
        for (i, id) in items.enumerate() {
            let name = fields.and_then(|names| names.get(i));
            if name.is_some() && matches!(self.doc.node(id).atom, Atom::Null) {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            if let Some(name) = name {
                write!(f, "{name}=")?;
            }
            self.node(f, id)?;
        }
        Ok(())
    }
}

/// Writes bytes as a double-quoted literal. Printable ASCII is written
/// as-is apart from `"` and `\`; everything else as `\xHH`.
fn quote(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_char('"')?;
    for &b in bytes {
        match b {
            b'"' => f.write_str("\\\"")?,
            b'\\' => f.write_str("\\\\")?,
            0x20..=0x7e => f.write_char(b as char)?,
            _ => write!(f, "\\x{b:02x}")?,
        }
    }
    f.write_char('"')
}

fn is_identifier(bytes: &[u8]) -> bool {
    match bytes.split_first() {
        Some((first, rest)) => {
            (first.is_ascii_alphabetic() || *first == b'_')
                && rest.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_')
        }
        None => false,
    }
}

impl fmt::Display for Document {
    /// Writes every top-level value of the view, separated by `, `, or
    /// `null` when there are none.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inspector = Inspector { doc: self };
        let mut roots = self.roots().peekable();
        if roots.peek().is_none() {
            return f.write_str("null");
        }
        for (i, id) in roots.enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            inspector.node(f, id)?;
        }
        Ok(())
    }
}

impl PartialEq for Document {
    /// Documents are equal when their canonical text forms are.
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Document {
    /// Returns the canonical text form of the document's view.
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Arg;
    use crate::model::TypeCode;

    fn text(fmt: &str, args: &[Arg<'_>]) -> String {
        let mut doc = Document::new();
        doc.fill(fmt, args).unwrap();
        doc.inspect()
    }

    #[test]
    fn test_empty_document_is_null() {
        assert_eq!(Document::new().inspect(), "null");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(
            text("noBbHhIi", &[
                true.into(),
                200u8.into(),
                (-3i8).into(),
                7u16.into(),
                (-7i16).into(),
                9u32.into(),
                (-9i32).into(),
            ]),
            "null, true, 200, -3, 7, -7, 9, -9"
        );
        assert_eq!(
            text("cLltfd", &[
                'x'.into(),
                u64::MAX.into(),
                i64::MIN.into(),
                Arg::Timestamp(1500),
                1.5f32.into(),
                0.25f64.into(),
            ]),
            "'x', 18446744073709551615, -9223372036854775808, t(1500), 1.5, 0.25"
        );
        assert_eq!(
            text("EF", &[Arg::Decimal32(0x01234567), Arg::Decimal64(1)]),
            "D32(0x01234567), D64(0x0000000000000001)"
        );
        assert_eq!(
            text("G", &[Arg::Decimal128([0xab; 16])]),
            format!("D128(0x{})", "ab".repeat(16))
        );
        let id = Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8);
        assert_eq!(
            text("U", &[id.into()]),
            "UUID(67e55044-10b1-426f-9247-bb680e5fe0c8)"
        );
    }

    #[test]
    fn test_quoting() {
        assert_eq!(text("S", &["say \"hi\"\\".into()]), r#""say \"hi\"\\""#);
        assert_eq!(text("S", &["caf\u{e9}".into()]), r#""caf\xc3\xa9""#);
        assert_eq!(
            text("Z", &[(&[0u8, b'a', 0xff][..]).into()]),
            r#"b"\x00a\xff""#
        );
        assert_eq!(text("s", &["foo_1".into()]), ":foo_1");
        assert_eq!(text("s", &["amqp:open:list".into()]), r#":"amqp:open:list""#);
        assert_eq!(text("s", &["".into()]), r#":"""#);
    }

    #[test]
    fn test_compounds() {
        assert_eq!(text("[]{}", &[]), "[], {}");
        assert_eq!(
            text("{SiS[o]}", &["a".into(), 1i32.into(), "b".into(), false.into()]),
            r#"{"a"=1, "b"=[false]}"#
        );
        assert_eq!(
            text("@T[]", &[TypeCode::Map.into()]),
            "@PN_MAP[]"
        );
    }

    #[test]
    fn test_described() {
        assert_eq!(text("DSi", &["x".into(), 1i32.into()]), r#"@"x" 1"#);
        assert_eq!(
            text("DL[on]", &[0x19u64.into(), true.into()]),
            "@25 [true, null]"
        );
        assert_eq!(
            text("DLi", &[0x10u64.into(), 4i32.into()]),
            "@open(16) 4"
        );
        assert_eq!(
            text(
                "DL[SnSS]",
                &[0x1du64.into(), "amqp:internal-error".into(), "x".into(), "y".into()]
            ),
            r#"@error(29) [condition="amqp:internal-error", info="x", "y"]"#
        );
    }

    #[test]
    fn test_incomplete_described_is_total() {
        let mut doc = Document::new();
        doc.put_described().unwrap();
        assert_eq!(doc.inspect(), "@ ");
        doc.enter().unwrap();
        doc.put_ulong(0x18).unwrap();
        assert_eq!(doc.inspect(), "@close(24) ");
    }

    #[test]
    fn test_equality_is_textual() {
        let mut a = Document::new();
        a.fill("[iS]", &[1i32.into(), "x".into()]).unwrap();
        let mut b = Document::new();
        b.put_list().unwrap();
        b.enter().unwrap();
        b.put_int(1).unwrap();
        b.put_string("x").unwrap();
        assert_eq!(a, b);
        b.put_int(2).unwrap();
        assert_ne!(a, b);
    }
}
