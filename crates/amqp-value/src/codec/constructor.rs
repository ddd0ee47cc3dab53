//! AMQP 1.0 format codes (constructor bytes).

use crate::model::TypeCode;

pub const DESCRIBED: u8 = 0x00;

pub const NULL: u8 = 0x40;
pub const TRUE: u8 = 0x41;
pub const FALSE: u8 = 0x42;
pub const UINT0: u8 = 0x43;
pub const ULONG0: u8 = 0x44;
pub const LIST0: u8 = 0x45;

pub const UBYTE: u8 = 0x50;
pub const BYTE: u8 = 0x51;
pub const SMALLUINT: u8 = 0x52;
pub const SMALLULONG: u8 = 0x53;
pub const SMALLINT: u8 = 0x54;
pub const SMALLLONG: u8 = 0x55;
pub const BOOLEAN: u8 = 0x56;

pub const USHORT: u8 = 0x60;
pub const SHORT: u8 = 0x61;

pub const UINT: u8 = 0x70;
pub const INT: u8 = 0x71;
pub const FLOAT: u8 = 0x72;
pub const CHAR: u8 = 0x73;
pub const DECIMAL32: u8 = 0x74;

pub const ULONG: u8 = 0x80;
pub const LONG: u8 = 0x81;
pub const DOUBLE: u8 = 0x82;
pub const TIMESTAMP: u8 = 0x83;
pub const DECIMAL64: u8 = 0x84;

pub const DECIMAL128: u8 = 0x94;
pub const UUID: u8 = 0x98;

pub const VBIN8: u8 = 0xa0;
pub const STR8: u8 = 0xa1;
pub const SYM8: u8 = 0xa3;
pub const VBIN32: u8 = 0xb0;
pub const STR32: u8 = 0xb1;
pub const SYM32: u8 = 0xb3;

pub const LIST8: u8 = 0xc0;
pub const MAP8: u8 = 0xc1;
pub const LIST32: u8 = 0xd0;
pub const MAP32: u8 = 0xd1;
pub const ARRAY8: u8 = 0xe0;
pub const ARRAY32: u8 = 0xf0;

/// Returns the type a constructor produces, or `None` for unknown bytes and
/// for the described-type marker.
pub fn type_of(ctor: u8) -> Option<TypeCode> {
    let tc = match ctor {
        NULL => TypeCode::Null,
        TRUE | FALSE | BOOLEAN => TypeCode::Bool,
        UBYTE => TypeCode::Ubyte,
        BYTE => TypeCode::Byte,
        USHORT => TypeCode::Ushort,
        SHORT => TypeCode::Short,
        UINT | SMALLUINT | UINT0 => TypeCode::Uint,
        INT | SMALLINT => TypeCode::Int,
        CHAR => TypeCode::Char,
        ULONG | SMALLULONG | ULONG0 => TypeCode::Ulong,
        LONG | SMALLLONG => TypeCode::Long,
        TIMESTAMP => TypeCode::Timestamp,
        FLOAT => TypeCode::Float,
        DOUBLE => TypeCode::Double,
        DECIMAL32 => TypeCode::Decimal32,
        DECIMAL64 => TypeCode::Decimal64,
        DECIMAL128 => TypeCode::Decimal128,
        UUID => TypeCode::Uuid,
        VBIN8 | VBIN32 => TypeCode::Binary,
        STR8 | STR32 => TypeCode::String,
        SYM8 | SYM32 => TypeCode::Symbol,
        LIST0 | LIST8 | LIST32 => TypeCode::List,
        MAP8 | MAP32 => TypeCode::Map,
        ARRAY8 | ARRAY32 => TypeCode::Array,
        _ => return None,
    };
    Some(tc)
}

/// Width in bytes of the payload of a fixed-width constructor.
///
/// Returns `None` for variable-width and compound constructors.
pub fn fixed_width(ctor: u8) -> Option<usize> {
    match ctor {
        NULL | TRUE | FALSE | UINT0 | ULONG0 | LIST0 => Some(0),
        UBYTE | BYTE | SMALLUINT | SMALLULONG | SMALLINT | SMALLLONG | BOOLEAN => Some(1),
        USHORT | SHORT => Some(2),
        UINT | INT | FLOAT | CHAR | DECIMAL32 => Some(4),
        ULONG | LONG | DOUBLE | TIMESTAMP | DECIMAL64 => Some(8),
        DECIMAL128 | UUID => Some(16),
        _ => None,
    }
}

/// Width of the size prefix of a variable-width or compound constructor.
pub fn size_width(ctor: u8) -> Option<usize> {
    match ctor {
        VBIN8 | STR8 | SYM8 | LIST8 | MAP8 | ARRAY8 => Some(1),
        VBIN32 | STR32 | SYM32 | LIST32 | MAP32 | ARRAY32 => Some(4),
        _ => None,
    }
}

/// Constructor used for every element of an array of `element` values,
/// given whether all elements fit the compact (8-bit size) form.
pub fn array_element(element: TypeCode, compact: bool) -> u8 {
    match element {
        TypeCode::Null => NULL,
        TypeCode::Bool => BOOLEAN,
        TypeCode::Ubyte => UBYTE,
        TypeCode::Byte => BYTE,
        TypeCode::Ushort => USHORT,
        TypeCode::Short => SHORT,
        TypeCode::Uint => UINT,
        TypeCode::Int => INT,
        TypeCode::Char => CHAR,
        TypeCode::Ulong => ULONG,
        TypeCode::Long => LONG,
        TypeCode::Timestamp => TIMESTAMP,
        TypeCode::Float => FLOAT,
        TypeCode::Double => DOUBLE,
        TypeCode::Decimal32 => DECIMAL32,
        TypeCode::Decimal64 => DECIMAL64,
        TypeCode::Decimal128 => DECIMAL128,
        TypeCode::Uuid => UUID,
        TypeCode::Binary if compact => VBIN8,
        TypeCode::Binary => VBIN32,
        TypeCode::String if compact => STR8,
        TypeCode::String => STR32,
        TypeCode::Symbol if compact => SYM8,
        TypeCode::Symbol => SYM32,
        TypeCode::List if compact => LIST8,
        TypeCode::List => LIST32,
        TypeCode::Map if compact => MAP8,
        TypeCode::Map => MAP32,
        TypeCode::Array if compact => ARRAY8,
        TypeCode::Array => ARRAY32,
        TypeCode::Described => DESCRIBED,
    }
}
