//! Scan interpreter: reads values out of a document with a format string.

use crate::error::Error;
use crate::format::token::{tokenize, Mode, Token, TokenKind};
use crate::format::Scanned;
use crate::limits::MAX_DEPTH;
use crate::model::{Document, TypeCode, Value};

struct Scanner<'t> {
    tokens: &'t [Token],
    pos: usize,
    out: Vec<Scanned>,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn at_value(&self) -> bool {
        self.peek().is_some_and(|t| !t.is_close())
    }

    /// Scans one value. When `live` is false the enclosing compound did not
    /// match, so nothing is read and every code yields [`Scanned::Absent`].
    fn value(&mut self, doc: &mut Document, live: bool, depth: usize) -> Result<(), Error> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthLimit { max: MAX_DEPTH });
        }

        // slots for `?` results, filled once the value is known
        let mut pending = Vec::new();
        while self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Conditional)
        {
            self.pos += 1;
            pending.push(self.out.len());
            self.out.push(Scanned::Found(false));
        }

        let Some(token) = self.peek().filter(|t| !t.is_close()) else {
            return Ok(());
        };
        self.pos += 1;
        let moved = live && doc.next();
        let found = match token.kind {
            TokenKind::Skip => moved,
            TokenKind::Scalar(tc) => {
                let value = if moved && doc.type_code() == Some(tc) {
                    doc.get().map(Value::into_owned)
                } else {
                    None
                };
                let found = value.is_some();
                self.out.push(value.map_or(Scanned::Absent, Scanned::Value));
                found
            }
            TokenKind::Copy => match doc.current_node().filter(|_| moved) {
                Some(id) => {
                    let mut copy = Document::new();
                    copy.append_node(doc, id)?;
                    self.out.push(Scanned::Document(copy));
                    true
                }
                None => {
                    self.out.push(Scanned::Absent);
                    false
                }
            },
            TokenKind::OpenList => {
                let matched = moved && doc.type_code() == Some(TypeCode::List);
                self.body(doc, matched, depth)?
            }
            TokenKind::OpenMap => {
                let matched = moved && doc.type_code() == Some(TypeCode::Map);
                self.body(doc, matched, depth)?
            }
            TokenKind::OpenArray { .. } => {
                let matched = moved && doc.type_code() == Some(TypeCode::Array);
                self.body(doc, matched, depth)?
            }
            TokenKind::Described => {
                let matched = moved && doc.is_described() && doc.down();
                for _ in 0..2 {
                    if !self.at_value() {
                        break;
                    }
                    self.value(doc, matched, depth + 1)?;
                }
                if matched {
                    doc.up();
                }
                matched
            }
            TokenKind::Multiple | TokenKind::Conditional | TokenKind::Close => {
                return Err(Error::UnknownCode {
                    code: token.code,
                    position: token.position,
                });
            }
        };
        for slot in pending {
            self.out[slot] = Scanned::Found(found);
        }
        Ok(())
    }

    fn body(&mut self, doc: &mut Document, matched: bool, depth: usize) -> Result<bool, Error> {
        let matched = matched && doc.down();
        while self.at_value() {
            self.value(doc, matched, depth + 1)?;
        }
        self.pos += 1;
        if matched {
            doc.up();
        }
        Ok(matched)
    }
}

impl Document {
    /// Reads values from the start of the document with a format string.
    ///
    /// Each scalar code yields [`Scanned::Value`] when the next value has
    /// its type and [`Scanned::Absent`] otherwise; either way the value is
    /// consumed. `?` yields [`Scanned::Found`] for the code after it, `.`
    /// skips a value and `C` copies one. A compound code that does not
    /// match makes every code inside it yield `Absent`.
    ///
    /// The cursor is left after the last value read.
    pub fn scan(&mut self, fmt: &str) -> Result<Vec<Scanned>, Error> {
        let tokens = tokenize(fmt, Mode::Scan)?;
        self.rewind();
        let mut scanner = Scanner {
            tokens: &tokens,
            pos: 0,
            out: Vec::with_capacity(tokens.len()),
        };
        while scanner.pos < tokens.len() {
            scanner.value(self, true, 0)?;
        }
        Ok(scanner.out)
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;
    use crate::error::ErrorKind;
    use crate::format::Arg;

    fn string(s: &'static str) -> Scanned {
        Scanned::Value(Value::String(Cow::Borrowed(s.as_bytes())))
    }

    #[test]
    fn test_scan_open_performative() {
        let mut doc = Document::new();
        doc.fill(
            "DL[SSnI]",
            &[16u64.into(), "container-1".into(), Arg::Str(None), 965u32.into()],
        )
        .unwrap();

        let scanned = doc.scan("DL[SSnI]").unwrap();
        assert_eq!(
            scanned,
            vec![
                Scanned::Value(Value::Ulong(16)),
                string("container-1"),
                Scanned::Absent,
                Scanned::Value(Value::Null),
                Scanned::Value(Value::Uint(965)),
            ]
        );
    }

    #[test]
    fn test_conditional_and_skip() {
        let mut doc = Document::new();
        doc.fill("[iSi]", &[1i32.into(), "a".into(), 2i32.into()]).unwrap();

        let scanned = doc.scan("[i?S.?i]").unwrap();
        assert_eq!(
            scanned,
            vec![
                Scanned::Value(Value::Int(1)),
                Scanned::Found(true),
                string("a"),
                Scanned::Found(false),
                Scanned::Absent,
            ]
        );
    }

    #[test]
    fn test_mismatched_compound() {
        let mut doc = Document::new();
        doc.fill("i[i]", &[1i32.into(), 2i32.into()]).unwrap();

        assert_eq!(
            doc.scan("[i]i").unwrap(),
            vec![Scanned::Absent, Scanned::Absent]
        );
        assert_eq!(
            doc.scan("i[i]").unwrap(),
            vec![Scanned::Value(Value::Int(1)), Scanned::Value(Value::Int(2))]
        );
    }

    #[test]
    fn test_copy() {
        let mut doc = Document::new();
        doc.fill("[ii]i", &[1i32.into(), 2i32.into(), 3i32.into()]).unwrap();

        let scanned = doc.scan("Ci").unwrap();
        match &scanned[0] {
            Scanned::Document(copy) => assert_eq!(copy.inspect(), "[1, 2]"),
            other => panic!("expected a document, got {other:?}"),
        }
        assert_eq!(scanned[1], Scanned::Value(Value::Int(3)));
        assert!(!doc.scan("..C").unwrap()[0].is_present());
    }

    #[test]
    fn test_array() {
        let mut doc = Document::new();
        doc.fill("@i[ii]", &[1i32.into(), 2i32.into()]).unwrap();
        let scanned = doc.scan("@[ii]").unwrap();
        assert_eq!(scanned[1].value(), Some(&Value::Int(2)));
    }

    #[test]
    fn test_past_end() {
        let mut doc = Document::new();
        doc.put_int(1).unwrap();
        assert_eq!(
            doc.scan("i?i").unwrap(),
            vec![
                Scanned::Value(Value::Int(1)),
                Scanned::Found(false),
                Scanned::Absent
            ]
        );
    }

    #[test]
    fn test_bad_format() {
        let mut doc = Document::new();
        assert_eq!(doc.scan("M").unwrap_err().kind(), ErrorKind::FormatError);
        assert_eq!(doc.scan("[i").unwrap_err().kind(), ErrorKind::FormatError);
    }
}
