//! Scalar values stored in document nodes.

use std::borrow::Cow;

use uuid::Uuid;

use crate::model::TypeCode;

/// A scalar AMQP value.
///
/// Byte payloads borrow from the document they were read from; use
/// [`Value::into_owned`] to detach them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Ubyte(u8),
    Byte(i8),
    Ushort(u16),
    Short(i16),
    Uint(u32),
    Int(i32),
    /// UTF-32 code point.
    Char(char),
    Ulong(u64),
    Long(i64),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    Float(f32),
    Double(f64),
    /// IEEE 754 decimal32, raw bits.
    Decimal32(u32),
    /// IEEE 754 decimal64, raw bits.
    Decimal64(u64),
    /// IEEE 754 decimal128, raw big-endian bytes.
    Decimal128([u8; 16]),
    Uuid(Uuid),
    Binary(Cow<'a, [u8]>),
    /// UTF-8 text; the bytes are not validated.
    String(Cow<'a, [u8]>),
    /// ASCII symbolic name; the bytes are not validated.
    Symbol(Cow<'a, [u8]>),
}

impl Value<'_> {
    /// Returns the type code of this value.
    pub fn type_code(&self) -> TypeCode {
        match self {
            Value::Null => TypeCode::Null,
            Value::Bool(_) => TypeCode::Bool,
            Value::Ubyte(_) => TypeCode::Ubyte,
            Value::Byte(_) => TypeCode::Byte,
            Value::Ushort(_) => TypeCode::Ushort,
            Value::Short(_) => TypeCode::Short,
            Value::Uint(_) => TypeCode::Uint,
            Value::Int(_) => TypeCode::Int,
            Value::Char(_) => TypeCode::Char,
            Value::Ulong(_) => TypeCode::Ulong,
            Value::Long(_) => TypeCode::Long,
            Value::Timestamp(_) => TypeCode::Timestamp,
            Value::Float(_) => TypeCode::Float,
            Value::Double(_) => TypeCode::Double,
            Value::Decimal32(_) => TypeCode::Decimal32,
            Value::Decimal64(_) => TypeCode::Decimal64,
            Value::Decimal128(_) => TypeCode::Decimal128,
            Value::Uuid(_) => TypeCode::Uuid,
            Value::Binary(_) => TypeCode::Binary,
            Value::String(_) => TypeCode::String,
            Value::Symbol(_) => TypeCode::Symbol,
        }
    }

    /// Returns the byte payload of a binary, string or symbol value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) | Value::String(b) | Value::Symbol(b) => Some(b),
            _ => None,
        }
    }

    /// Converts borrowed payloads into owned ones.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(v),
            Value::Ubyte(v) => Value::Ubyte(v),
            Value::Byte(v) => Value::Byte(v),
            Value::Ushort(v) => Value::Ushort(v),
            Value::Short(v) => Value::Short(v),
            Value::Uint(v) => Value::Uint(v),
            Value::Int(v) => Value::Int(v),
            Value::Char(v) => Value::Char(v),
            Value::Ulong(v) => Value::Ulong(v),
            Value::Long(v) => Value::Long(v),
            Value::Timestamp(v) => Value::Timestamp(v),
            Value::Float(v) => Value::Float(v),
            Value::Double(v) => Value::Double(v),
            Value::Decimal32(v) => Value::Decimal32(v),
            Value::Decimal64(v) => Value::Decimal64(v),
            Value::Decimal128(v) => Value::Decimal128(v),
            Value::Uuid(v) => Value::Uuid(v),
            Value::Binary(b) => Value::Binary(Cow::Owned(b.into_owned())),
            Value::String(b) => Value::String(Cow::Owned(b.into_owned())),
            Value::Symbol(b) => Value::Symbol(Cow::Owned(b.into_owned())),
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value<'_> {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value<'_> {
    fn from(v: u32) -> Self {
        Value::Uint(v)
    }
}

impl From<i64> for Value<'_> {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<u64> for Value<'_> {
    fn from(v: u64) -> Self {
        Value::Ulong(v)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::String(Cow::Borrowed(v.as_bytes()))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(v: &'a [u8]) -> Self {
        Value::Binary(Cow::Borrowed(v))
    }
}

impl From<Uuid> for Value<'_> {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}
