//! AMQP 1.0 type codes.

use std::fmt;

/// Every kind of value a document node can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Null,
    Bool,
    Ubyte,
    Byte,
    Ushort,
    Short,
    Uint,
    Int,
    Char,
    Ulong,
    Long,
    Timestamp,
    Float,
    Double,
    Decimal32,
    Decimal64,
    Decimal128,
    Uuid,
    Binary,
    String,
    Symbol,
    Described,
    Array,
    List,
    Map,
}

impl TypeCode {
    /// All type codes, in declaration order.
    pub const ALL: [TypeCode; 25] = [
        TypeCode::Null,
        TypeCode::Bool,
        TypeCode::Ubyte,
        TypeCode::Byte,
        TypeCode::Ushort,
        TypeCode::Short,
        TypeCode::Uint,
        TypeCode::Int,
        TypeCode::Char,
        TypeCode::Ulong,
        TypeCode::Long,
        TypeCode::Timestamp,
        TypeCode::Float,
        TypeCode::Double,
        TypeCode::Decimal32,
        TypeCode::Decimal64,
        TypeCode::Decimal128,
        TypeCode::Uuid,
        TypeCode::Binary,
        TypeCode::String,
        TypeCode::Symbol,
        TypeCode::Described,
        TypeCode::Array,
        TypeCode::List,
        TypeCode::Map,
    ];

    /// Returns true for list, map, array and described values.
    pub fn is_compound(self) -> bool {
        matches!(
            self,
            TypeCode::Described | TypeCode::Array | TypeCode::List | TypeCode::Map
        )
    }

    /// Name used by the canonical text form for array element types.
    pub fn name(self) -> &'static str {
        match self {
            TypeCode::Null => "PN_NULL",
            TypeCode::Bool => "PN_BOOL",
            TypeCode::Ubyte => "PN_UBYTE",
            TypeCode::Byte => "PN_BYTE",
            TypeCode::Ushort => "PN_USHORT",
            TypeCode::Short => "PN_SHORT",
            TypeCode::Uint => "PN_UINT",
            TypeCode::Int => "PN_INT",
            TypeCode::Char => "PN_CHAR",
            TypeCode::Ulong => "PN_ULONG",
            TypeCode::Long => "PN_LONG",
            TypeCode::Timestamp => "PN_TIMESTAMP",
            TypeCode::Float => "PN_FLOAT",
            TypeCode::Double => "PN_DOUBLE",
            TypeCode::Decimal32 => "PN_DECIMAL32",
            TypeCode::Decimal64 => "PN_DECIMAL64",
            TypeCode::Decimal128 => "PN_DECIMAL128",
            TypeCode::Uuid => "PN_UUID",
            TypeCode::Binary => "PN_BINARY",
            TypeCode::String => "PN_STRING",
            TypeCode::Symbol => "PN_SYMBOL",
            TypeCode::Described => "PN_DESCRIBED",
            TypeCode::Array => "PN_ARRAY",
            TypeCode::List => "PN_LIST",
            TypeCode::Map => "PN_MAP",
        }
    }

    /// Maps a scalar fill/scan code to its type.
    ///
    /// Structural codes (`[`, `{`, `@`, `D`, `M`, ...) are not scalar codes.
    pub fn from_fill_code(code: char) -> Option<TypeCode> {
        match code {
            'n' => Some(TypeCode::Null),
            'o' => Some(TypeCode::Bool),
            'B' => Some(TypeCode::Ubyte),
            'b' => Some(TypeCode::Byte),
            'H' => Some(TypeCode::Ushort),
            'h' => Some(TypeCode::Short),
            'I' => Some(TypeCode::Uint),
            'i' => Some(TypeCode::Int),
            'c' => Some(TypeCode::Char),
            'L' => Some(TypeCode::Ulong),
            'l' => Some(TypeCode::Long),
            't' => Some(TypeCode::Timestamp),
            'f' => Some(TypeCode::Float),
            'd' => Some(TypeCode::Double),
            'E' => Some(TypeCode::Decimal32),
            'F' => Some(TypeCode::Decimal64),
            'G' => Some(TypeCode::Decimal128),
            'U' => Some(TypeCode::Uuid),
            'Z' => Some(TypeCode::Binary),
            'S' => Some(TypeCode::String),
            's' => Some(TypeCode::Symbol),
            _ => None,
        }
    }

    /// Returns the scalar fill/scan code for this type, if it has one.
    pub fn fill_code(self) -> Option<char> {
        let code = match self {
            TypeCode::Null => 'n',
            TypeCode::Bool => 'o',
            TypeCode::Ubyte => 'B',
            TypeCode::Byte => 'b',
            TypeCode::Ushort => 'H',
            TypeCode::Short => 'h',
            TypeCode::Uint => 'I',
            TypeCode::Int => 'i',
            TypeCode::Char => 'c',
            TypeCode::Ulong => 'L',
            TypeCode::Long => 'l',
            TypeCode::Timestamp => 't',
            TypeCode::Float => 'f',
            TypeCode::Double => 'd',
            TypeCode::Decimal32 => 'E',
            TypeCode::Decimal64 => 'F',
            TypeCode::Decimal128 => 'G',
            TypeCode::Uuid => 'U',
            TypeCode::Binary => 'Z',
            TypeCode::String => 'S',
            TypeCode::Symbol => 's',
            TypeCode::Described | TypeCode::Array | TypeCode::List | TypeCode::Map => {
                return None;
            }
        };
        Some(code)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeCode::Null => "null",
            TypeCode::Bool => "boolean",
            TypeCode::Ubyte => "ubyte",
            TypeCode::Byte => "byte",
            TypeCode::Ushort => "ushort",
            TypeCode::Short => "short",
            TypeCode::Uint => "uint",
            TypeCode::Int => "int",
            TypeCode::Char => "char",
            TypeCode::Ulong => "ulong",
            TypeCode::Long => "long",
            TypeCode::Timestamp => "timestamp",
            TypeCode::Float => "float",
            TypeCode::Double => "double",
            TypeCode::Decimal32 => "decimal32",
            TypeCode::Decimal64 => "decimal64",
            TypeCode::Decimal128 => "decimal128",
            TypeCode::Uuid => "uuid",
            TypeCode::Binary => "binary",
            TypeCode::String => "string",
            TypeCode::Symbol => "symbol",
            TypeCode::Described => "described",
            TypeCode::Array => "array",
            TypeCode::List => "list",
            TypeCode::Map => "map",
        };
        f.write_str(name)
    }
}
