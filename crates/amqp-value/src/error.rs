//! Error types for value documents, the binary codec and format strings.

use thiserror::Error;

use crate::model::TypeCode;

/// The closed set of failure categories every operation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The node arena, nesting depth or an output buffer is full.
    CapacityExceeded,
    /// Malformed fill/scan format string or argument mismatch.
    FormatError,
    /// Malformed or truncated binary input.
    DecodeError,
    /// Operation invalid for the current node's type.
    TypeMismatch,
    /// Navigation with no current or entered node.
    InvalidState,
}

impl ErrorKind {
    /// Returns the short tag used in error messages (e.g., "CAPACITY").
    pub fn tag(&self) -> &'static str {
        match self {
            ErrorKind::CapacityExceeded => "CAPACITY",
            ErrorKind::FormatError => "FORMAT",
            ErrorKind::DecodeError => "DECODE",
            ErrorKind::TypeMismatch => "TYPE",
            ErrorKind::InvalidState => "STATE",
        }
    }
}

/// Finer classification of decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeCategory {
    Truncated,
    InvalidConstructor,
    LengthMismatch,
    CapacityExceeded,
}

/// Error reported by document, codec and format-string operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // === CapacityExceeded ===
    #[error("[CAPACITY] node arena full ({max} nodes)")]
    NodeLimit { max: usize },

    #[error("[CAPACITY] nesting depth exceeds maximum {max}")]
    DepthLimit { max: usize },

    #[error("[CAPACITY] payload store exceeds {max} bytes")]
    PayloadLimit { max: usize },

    #[error("[CAPACITY] output buffer too small: need {needed} bytes, have {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },

    // === FormatError ===
    #[error("[FORMAT] unknown code {code:?} at position {position}")]
    UnknownCode { code: char, position: usize },

    #[error("[FORMAT] unbalanced {bracket:?} at position {position}")]
    UnbalancedBracket { bracket: char, position: usize },

    #[error("[FORMAT] array at position {position} must be followed by '['")]
    ArrayWithoutBody { position: usize },

    #[error("[FORMAT] missing argument for code {code:?} at position {position}")]
    MissingArgument { code: char, position: usize },

    #[error("[FORMAT] code {code:?} at position {position} expects {expected} argument")]
    ArgumentMismatch {
        code: char,
        position: usize,
        expected: &'static str,
    },

    #[error("[FORMAT] {count} unused argument(s)")]
    UnusedArguments { count: usize },

    // === DecodeError ===
    #[error("[DECODE] unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("[DECODE] invalid constructor 0x{byte:02x} at offset {offset}")]
    InvalidConstructor { byte: u8, offset: usize },

    #[error("[DECODE] {context} declares {declared} bytes but {actual} are available")]
    LengthExceedsInput {
        context: &'static str,
        declared: usize,
        actual: usize,
    },

    #[error("[DECODE] {context} declares {declared} bytes but its contents use {actual}")]
    LengthMismatch {
        context: &'static str,
        declared: usize,
        actual: usize,
    },

    #[error("[DECODE] map has odd element count {count}")]
    OddMapCount { count: usize },

    #[error("[DECODE] invalid boolean byte 0x{value:02x}")]
    InvalidBool { value: u8 },

    #[error("[DECODE] invalid char code point 0x{value:08x}")]
    InvalidChar { value: u32 },

    // === TypeMismatch ===
    #[error("[TYPE] expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: TypeCode,
    },

    #[error("[TYPE] array of {element} cannot hold {found}")]
    ArrayElementMismatch { element: TypeCode, found: TypeCode },

    #[error("[TYPE] arrays cannot declare {element} elements")]
    InvalidArrayElement { element: TypeCode },

    // === InvalidState ===
    #[error("[STATE] no current node")]
    NoCurrentNode,

    #[error("[STATE] no entered compound to exit")]
    NotEntered,

    #[error("[STATE] described value has {children} of 2 children")]
    IncompleteDescribed { children: usize },

    #[error("[STATE] map has odd child count {children}")]
    IncompleteMap { children: usize },

    #[error("[STATE] described array already has a descriptor")]
    DescriptorTaken,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NodeLimit { .. }
            | Error::DepthLimit { .. }
            | Error::PayloadLimit { .. }
            | Error::BufferTooSmall { .. } => ErrorKind::CapacityExceeded,
            Error::UnknownCode { .. }
            | Error::UnbalancedBracket { .. }
            | Error::ArrayWithoutBody { .. }
            | Error::MissingArgument { .. }
            | Error::ArgumentMismatch { .. }
            | Error::UnusedArguments { .. } => ErrorKind::FormatError,
            Error::UnexpectedEof { .. }
            | Error::InvalidConstructor { .. }
            | Error::LengthExceedsInput { .. }
            | Error::LengthMismatch { .. }
            | Error::OddMapCount { .. }
            | Error::InvalidBool { .. }
            | Error::InvalidChar { .. } => ErrorKind::DecodeError,
            Error::TypeMismatch { .. }
            | Error::ArrayElementMismatch { .. }
            | Error::InvalidArrayElement { .. } => ErrorKind::TypeMismatch,
            Error::NoCurrentNode
            | Error::NotEntered
            | Error::IncompleteDescribed { .. }
            | Error::IncompleteMap { .. }
            | Error::DescriptorTaken => ErrorKind::InvalidState,
        }
    }

    /// Returns the decode category of an error the binary decoder can raise.
    pub fn decode_category(&self) -> Option<DecodeCategory> {
        match self {
            Error::UnexpectedEof { .. } | Error::LengthExceedsInput { .. } => {
                Some(DecodeCategory::Truncated)
            }
            Error::InvalidConstructor { .. }
            | Error::InvalidBool { .. }
            | Error::InvalidChar { .. } => Some(DecodeCategory::InvalidConstructor),
            Error::LengthMismatch { .. } | Error::OddMapCount { .. } => {
                Some(DecodeCategory::LengthMismatch)
            }
            Error::NodeLimit { .. } | Error::DepthLimit { .. } | Error::PayloadLimit { .. } => {
                Some(DecodeCategory::CapacityExceeded)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Error::NodeLimit { max: 1 }.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(Error::UnusedArguments { count: 2 }.kind(), ErrorKind::FormatError);
        assert_eq!(Error::OddMapCount { count: 3 }.kind(), ErrorKind::DecodeError);
        assert_eq!(
            Error::InvalidArrayElement { element: TypeCode::Described }.kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(Error::NotEntered.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_decode_category() {
        let err = Error::UnexpectedEof { context: "uint" };
        assert_eq!(err.decode_category(), Some(DecodeCategory::Truncated));
        assert_eq!(Error::NotEntered.decode_category(), None);
    }

    #[test]
    fn test_message_carries_kind_tag() {
        let err = Error::BufferTooSmall { needed: 10, capacity: 4 };
        assert!(err.to_string().starts_with(&format!("[{}]", err.kind().tag())));
    }
}
