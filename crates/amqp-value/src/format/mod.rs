//! Fill/scan format strings.
//!
//! A format string is a sequence of one-character codes describing a run of
//! values. [`Document::fill`] builds the values at the cursor, taking scalar
//! payloads from a slice of [`Arg`]s; [`Document::scan`] walks an existing
//! document with the same codes and returns what it finds.
//!
//! | code | value | fill argument |
//! |------|-------|---------------|
//! | `n` | null | |
//! | `o` | bool | [`Arg::Bool`] |
//! | `B` `b` | ubyte, byte | [`Arg::Ubyte`], [`Arg::Byte`] |
//! | `H` `h` | ushort, short | [`Arg::Ushort`], [`Arg::Short`] |
//! | `I` `i` | uint, int | [`Arg::Uint`], [`Arg::Int`] |
//! | `c` | char | [`Arg::Char`] |
//! | `L` `l` | ulong, long | [`Arg::Ulong`], [`Arg::Long`] |
//! | `t` | timestamp | [`Arg::Timestamp`] |
//! | `f` `d` | float, double | [`Arg::Float`], [`Arg::Double`] |
//! | `E` `F` `G` | decimal32, decimal64, decimal128 | [`Arg::Decimal32`], ... |
//! | `U` | uuid | [`Arg::Uuid`] |
//! | `Z` | binary | [`Arg::Binary`] (`None` puts null) |
//! | `S` `s` | string, symbol | [`Arg::Str`] (`None` puts null) |
//! | `[` `]` | list | |
//! | `{` `}` | map | |
//! | `@` | array, `@[D]<code>[...]` or `@[D]T[...]` | [`Arg::Type`] for `T` |
//! | `D` | described value: the next two values are descriptor and body | |
//! | `M` | copy of another document, see [`Document::fill`] | [`Arg::Document`] |
//! | `?` | the next value only if the argument is true, else null | [`Arg::Bool`] |
//!
//! Scan additionally accepts `.` (skip a value) and `C` (copy a value); its
//! arrays are written `@[...]`.
//!
//! ```rust
//! use amqp_value::{Arg, Document};
//!
//! let mut doc = Document::new();
//! doc.fill("DL[SSnI]", &[16u64.into(), "container-1".into(), Arg::Str(None), 965u32.into()])
//!     .unwrap();
//! assert_eq!(
//!     doc.inspect(),
//!     r#"@open(16) [container-id="container-1", channel-max=965]"#
//! );
//! ```

mod fill;
mod scan;
pub(crate) mod token;

use uuid::Uuid;

use crate::model::{Document, TypeCode, Value};

/// One fill argument.
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
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
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    Float(f32),
    Double(f64),
    Decimal32(u32),
    Decimal64(u64),
    Decimal128([u8; 16]),
    Uuid(Uuid),
    Binary(Option<&'a [u8]>),
    /// Text for `S` and `s`.
    Str(Option<&'a str>),
    /// Element type for `@T`.
    Type(TypeCode),
    Document(Option<&'a Document>),
}

impl Arg<'_> {
    /// Name of the variant, for error messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Arg::Bool(_) => "bool",
            Arg::Ubyte(_) => "ubyte",
            Arg::Byte(_) => "byte",
            Arg::Ushort(_) => "ushort",
            Arg::Short(_) => "short",
            Arg::Uint(_) => "uint",
            Arg::Int(_) => "int",
            Arg::Char(_) => "char",
            Arg::Ulong(_) => "ulong",
            Arg::Long(_) => "long",
            Arg::Timestamp(_) => "timestamp",
            Arg::Float(_) => "float",
            Arg::Double(_) => "double",
            Arg::Decimal32(_) => "decimal32",
            Arg::Decimal64(_) => "decimal64",
            Arg::Decimal128(_) => "decimal128",
            Arg::Uuid(_) => "uuid",
            Arg::Binary(_) => "binary",
            Arg::Str(_) => "str",
            Arg::Type(_) => "type",
            Arg::Document(_) => "document",
        }
    }
}

macro_rules! arg_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Arg<'_> {
                fn from(v: $ty) -> Self {
                    Arg::$variant(v)
                }
            }
        )*
    };
}

arg_from! {
    bool => Bool,
    u8 => Ubyte,
    i8 => Byte,
    u16 => Ushort,
    i16 => Short,
    u32 => Uint,
    i32 => Int,
    char => Char,
    u64 => Ulong,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Uuid => Uuid,
    TypeCode => Type,
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(v: &'a str) -> Self {
        Arg::Str(Some(v))
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(v: &'a [u8]) -> Self {
        Arg::Binary(Some(v))
    }
}

impl<'a> From<&'a Document> for Arg<'a> {
    fn from(v: &'a Document) -> Self {
        Arg::Document(Some(v))
    }
}

/// One result of [`Document::scan`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scanned {
    /// A scalar code matched a value of its type.
    Value(Value<'static>),
    /// Nothing of the expected type was there.
    Absent,
    /// Result of `?`: whether the following code matched.
    Found(bool),
    /// Result of `C`: a copy of the value.
    Document(Document),
}

impl Scanned {
    /// Returns the matched scalar, if any.
    pub fn value(&self) -> Option<&Value<'static>> {
        match self {
            Scanned::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Returns true unless this is [`Scanned::Absent`] or `Found(false)`.
    pub fn is_present(&self) -> bool {
        !matches!(self, Scanned::Absent | Scanned::Found(false))
    }
}
