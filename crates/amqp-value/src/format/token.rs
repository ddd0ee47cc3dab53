//! Tokenizer for fill/scan format strings.
//!
//! The whole string is checked (unknown codes, bracket balance, array
//! syntax) before the interpreter touches a document.

use crate::error::Error;
use crate::model::TypeCode;

/// Which interpreter a format string is tokenized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Fill,
    Scan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Scalar(TypeCode),
    OpenList,
    OpenMap,
    /// `element` is `None` when it comes from an argument (fill) or is not
    /// checked (scan).
    OpenArray {
        described: bool,
        element: Option<TypeCode>,
    },
    Close,
    Described,
    Multiple,
    Conditional,
    Skip,
    Copy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub code: char,
    pub position: usize,
}

impl Token {
    pub fn is_close(&self) -> bool {
        self.kind == TokenKind::Close
    }
}

pub(crate) fn tokenize(fmt: &str, mode: Mode) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::with_capacity(fmt.len());
    // opening bracket and its position
    let mut open: Vec<(char, usize)> = Vec::new();
    let mut chars = fmt.char_indices().peekable();

    while let Some((position, code)) = chars.next() {
        let kind = match code {
            '[' => {
                open.push(('[', position));
                TokenKind::OpenList
            }
            '{' => {
                open.push(('{', position));
                TokenKind::OpenMap
            }
            ']' | '}' => {
                let expected = if code == ']' { ['[', '@'] } else { ['{', '{'] };
                match open.pop() {
                    Some((opener, _)) if expected.contains(&opener) => TokenKind::Close,
                    _ => {
                        return Err(Error::UnbalancedBracket {
                            bracket: code,
                            position,
                        });
                    }
                }
            }
            '@' => {
                let described = mode == Mode::Fill && chars.next_if(|&(_, c)| c == 'D').is_some();
                let element = match mode {
                    Mode::Fill => match chars.next() {
                        Some((_, 'T')) => None,
                        Some((at, c)) => match TypeCode::from_fill_code(c) {
                            Some(tc) => Some(tc),
                            None if c == '[' => return Err(Error::ArrayWithoutBody { position }),
                            None => return Err(Error::UnknownCode { code: c, position: at }),
                        },
                        None => return Err(Error::ArrayWithoutBody { position }),
                    },
                    Mode::Scan => None,
                };
                if chars.next_if(|&(_, c)| c == '[').is_none() {
                    return Err(Error::ArrayWithoutBody { position });
                }
                open.push(('@', position));
                TokenKind::OpenArray {
                    described,
                    element,
                }
            }
            'D' => TokenKind::Described,
            '?' => TokenKind::Conditional,
            'M' if mode == Mode::Fill => TokenKind::Multiple,
            '.' if mode == Mode::Scan => TokenKind::Skip,
            'C' if mode == Mode::Scan => TokenKind::Copy,
            _ => match TypeCode::from_fill_code(code) {
                Some(tc) => TokenKind::Scalar(tc),
                None => return Err(Error::UnknownCode { code, position }),
            },
        };
        tokens.push(Token {
            kind,
            code,
            position,
        });
    }

    if let Some((bracket, position)) = open.pop() {
        return Err(Error::UnbalancedBracket { bracket, position });
    }
    Ok(tokens)
}
