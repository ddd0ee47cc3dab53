//! Fill interpreter: builds values from a format string and arguments.

use tracing::trace;

use crate::error::Error;
use crate::format::token::{tokenize, Mode, Token, TokenKind};
use crate::format::Arg;
use crate::limits::MAX_DEPTH;
use crate::model::arena::Atom;
use crate::model::{Document, TypeCode};

struct Filler<'t, 'a> {
    tokens: &'t [Token],
    pos: usize,
    args: &'t [Arg<'a>],
    next_arg: usize,
}

impl<'a> Filler<'_, 'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn at_value(&self) -> bool {
        self.peek().is_some_and(|t| !t.is_close())
    }

    fn arg(&mut self, token: &Token) -> Result<Arg<'a>, Error> {
        let arg = self
            .args
            .get(self.next_arg)
            .copied()
            .ok_or(Error::MissingArgument {
                code: token.code,
                position: token.position,
            })?;
        self.next_arg += 1;
        Ok(arg)
    }

    /// Fills one complete value, including everything nested in it.
    fn value(&mut self, doc: &mut Document, depth: usize) -> Result<(), Error> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthLimit { max: MAX_DEPTH });
        }

        let mut present = true;
        while let Some(token) = self.peek().filter(|t| t.kind == TokenKind::Conditional) {
            self.pos += 1;
            match self.arg(&token)? {
                Arg::Bool(v) => present &= v,
                _ => return Err(mismatch(&token, "bool")),
            }
        }
        if !present {
            // arguments of the suppressed value are still consumed
            if self.at_value() {
                let mut scratch = Document::new();
                self.value(&mut scratch, depth)?;
            }
            return doc.put_null();
        }

        let Some(token) = self.peek().filter(|t| !t.is_close()) else {
            return Ok(());
        };
        self.pos += 1;
        match token.kind {
            TokenKind::Scalar(tc) => self.scalar(doc, tc, &token),
            TokenKind::OpenList => {
                doc.put_list()?;
                self.body(doc, depth)
            }
            TokenKind::OpenMap => {
                doc.put_map()?;
                self.body(doc, depth)
            }
            TokenKind::OpenArray {
                described,
                element,
            } => {
                let element = match element {
                    Some(tc) => tc,
                    None => match self.arg(&token)? {
                        Arg::Type(tc) => tc,
                        _ => return Err(mismatch(&token, "type")),
                    },
                };
                doc.put_array(described, element)?;
                self.body(doc, depth)
            }
            TokenKind::Described => {
                doc.put_described()?;
                doc.enter()?;
                for _ in 0..2 {
                    if !self.at_value() {
                        break;
                    }
                    self.value(doc, depth + 1)?;
                }
                doc.exit()
            }
            TokenKind::Multiple => match self.arg(&token)? {
                Arg::Document(src) => multiple(doc, src),
                _ => Err(mismatch(&token, "document")),
            },
            TokenKind::Conditional | TokenKind::Close | TokenKind::Skip | TokenKind::Copy => {
                Err(Error::UnknownCode {
                    code: token.code,
                    position: token.position,
                })
            }
        }
    }

    /// Fills the children of the compound just put, through its closing bracket.
    fn body(&mut self, doc: &mut Document, depth: usize) -> Result<(), Error> {
        doc.enter()?;
        while self.at_value() {
            self.value(doc, depth + 1)?;
        }
        self.pos += 1;
        doc.exit()
    }

    fn scalar(&mut self, doc: &mut Document, tc: TypeCode, token: &Token) -> Result<(), Error> {
        if tc == TypeCode::Null {
            return doc.put_null();
        }
        match (tc, self.arg(token)?) {
            (TypeCode::Bool, Arg::Bool(v)) => doc.put_bool(v),
            (TypeCode::Ubyte, Arg::Ubyte(v)) => doc.put_ubyte(v),
            (TypeCode::Byte, Arg::Byte(v)) => doc.put_byte(v),
            (TypeCode::Ushort, Arg::Ushort(v)) => doc.put_ushort(v),
            (TypeCode::Short, Arg::Short(v)) => doc.put_short(v),
            (TypeCode::Uint, Arg::Uint(v)) => doc.put_uint(v),
            (TypeCode::Int, Arg::Int(v)) => doc.put_int(v),
            (TypeCode::Char, Arg::Char(v)) => doc.put_char(v),
            (TypeCode::Ulong, Arg::Ulong(v)) => doc.put_ulong(v),
            (TypeCode::Long, Arg::Long(v)) => doc.put_long(v),
            (TypeCode::Timestamp, Arg::Timestamp(v)) => doc.put_timestamp(v),
            (TypeCode::Float, Arg::Float(v)) => doc.put_float(v),
            (TypeCode::Double, Arg::Double(v)) => doc.put_double(v),
            (TypeCode::Decimal32, Arg::Decimal32(v)) => doc.put_decimal32(v),
            (TypeCode::Decimal64, Arg::Decimal64(v)) => doc.put_decimal64(v),
            (TypeCode::Decimal128, Arg::Decimal128(v)) => doc.put_decimal128(v),
            (TypeCode::Uuid, Arg::Uuid(v)) => doc.put_uuid(v),
            (TypeCode::Binary, Arg::Binary(Some(v))) => doc.put_binary(v),
            (TypeCode::String, Arg::Str(Some(v))) => doc.put_string(v),
            (TypeCode::Symbol, Arg::Str(Some(v))) => doc.put_symbol(v),
            (TypeCode::Binary, Arg::Binary(None))
            | (TypeCode::String | TypeCode::Symbol, Arg::Str(None)) => doc.put_null(),
            (_, arg) => {
                trace!(code = %token.code, found = arg.kind(), "fill argument mismatch");
                Err(mismatch(token, expected_arg(tc)))
            }
        }
    }
}

fn mismatch(token: &Token, expected: &'static str) -> Error {
    Error::ArgumentMismatch {
        code: token.code,
        position: token.position,
        expected,
    }
}

/// Name of the argument variant a scalar code takes.
fn expected_arg(tc: TypeCode) -> &'static str {
    match tc {
        TypeCode::Bool => "bool",
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
        TypeCode::String | TypeCode::Symbol => "str",
        TypeCode::Null
        | TypeCode::Described
        | TypeCode::Array
        | TypeCode::List
        | TypeCode::Map => "no",
    }
}

/// Puts the content of `src` for an `M` code.
///
/// Nothing, an empty document or an empty array becomes null; a
/// single-element array becomes that element; any other array is copied
/// whole. A non-array document is copied value by value.
fn multiple(doc: &mut Document, src: Option<&Document>) -> Result<(), Error> {
    let Some(src) = src else {
        return doc.put_null();
    };
    let Some(first) = src.roots().next() else {
        return doc.put_null();
    };
    match src.node(first).atom {
        Atom::Array { described, .. } => {
            let mut elements = src.children(first).skip(described as usize);
            match (elements.next(), elements.next()) {
                (None, _) => doc.put_null(),
                (Some(only), None) => doc.append_node(src, only),
                _ => doc.append_node(src, first),
            }
        }
        _ => {
            for id in src.roots() {
                doc.append_node(src, id)?;
            }
            Ok(())
        }
    }
}

impl Document {
    /// Builds values at the cursor from a format string.
    ///
    /// See the [`format`](crate::format) module for the codes. The format
    /// string is validated before anything is put; argument errors are
    /// found while filling, so values put before the failing code stay in
    /// the document.
    ///
    /// `M` takes an [`Arg::Document`]: `None`, an empty document or an empty
    /// array put null, a single-element array puts the element alone, any
    /// other array is copied as an array, and any other document is copied
    /// in full.
    pub fn fill(&mut self, fmt: &str, args: &[Arg<'_>]) -> Result<(), Error> {
        let result = tokenize(fmt, Mode::Fill).and_then(|tokens| {
            let mut filler = Filler {
                tokens: &tokens,
                pos: 0,
                args,
                next_arg: 0,
            };
            while filler.pos < tokens.len() {
                filler.value(self, 0)?;
            }
            match args.len() - filler.next_arg {
                0 => Ok(()),
                count => Err(Error::UnusedArguments { count }),
            }
        });
        match result {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn filled(fmt: &str, args: &[Arg<'_>]) -> String {
        let mut doc = Document::new();
        doc.fill(fmt, args).unwrap();
        doc.inspect()
    }

    #[test]
    fn test_described_open() {
        assert_eq!(filled("DL[]", &[16u64.into()]), "@open(16) []");
        assert_eq!(
            filled(
                "DL[SSnI]",
                &[16u64.into(), "container-1".into(), Arg::Str(None), 965u32.into()]
            ),
            r#"@open(16) [container-id="container-1", channel-max=965]"#
        );
    }

    #[test]
    fn test_map_literal() {
        let args = [
            "foo".into(),
            1i32.into(),
            987i32.into(),
            3i32.into(),
            "bar".into(),
            965u32.into(),
        ];
        assert_eq!(
            filled("{S[iii]SI}", &args),
            r#"{"foo"=[1, 987, 3], "bar"=965}"#
        );
    }

    #[test]
    fn test_multiple() {
        assert_eq!(filled("M", &[Arg::Document(None)]), "null");

        let mut src = Document::new();
        assert_eq!(filled("M", &[(&src).into()]), "null");

        src.put_array(false, TypeCode::Symbol).unwrap();
        assert_eq!(filled("M", &[(&src).into()]), "null");

        src.enter().unwrap();
        src.put_symbol("foo").unwrap();
        assert_eq!(filled("M", &[(&src).into()]), ":foo");

        src.put_symbol("bar").unwrap();
        assert_eq!(filled("M", &[(&src).into()]), "@PN_SYMBOL[:foo, :bar]");

        src.clear();
        src.put_symbol("baz").unwrap();
        assert_eq!(filled("M", &[(&src).into()]), ":baz");
    }

    #[test]
    fn test_multiple_single_described_element() {
        let mut src = Document::new();
        src.put_array(true, TypeCode::Int).unwrap();
        src.enter().unwrap();
        src.put_ulong(9).unwrap();
        src.put_int(4).unwrap();
        assert_eq!(filled("M", &[(&src).into()]), "4");
    }

    #[test]
    fn test_arrays() {
        assert_eq!(
            filled("@s[ss]", &["a".into(), "b".into()]),
            "@PN_SYMBOL[:a, :b]"
        );
        assert_eq!(
            filled(
                "@T[@T[]@T[oo]]",
                &[
                    TypeCode::Array.into(),
                    TypeCode::Ubyte.into(),
                    TypeCode::Bool.into(),
                    true.into(),
                    false.into(),
                ]
            ),
            "@PN_ARRAY[@PN_UBYTE[], @PN_BOOL[true, false]]"
        );
        assert_eq!(
            filled("@DI[LII]", &[3u64.into(), 1u32.into(), 2u32.into()]),
            "@3 @PN_UINT[1, 2]"
        );
    }

    #[test]
    fn test_conditional() {
        assert_eq!(
            filled("[?S?S]", &[true.into(), "a".into(), false.into(), "b".into()]),
            r#"["a", null]"#
        );
        assert_eq!(
            filled("?[ii]i", &[false.into(), 1i32.into(), 2i32.into(), 3i32.into()]),
            "null, 3"
        );
    }

    #[test]
    fn test_null_text_arguments() {
        assert_eq!(
            filled("SsZ", &[Arg::Str(None), Arg::Str(None), Arg::Binary(None)]),
            "null, null, null"
        );
    }

    #[test]
    fn test_missing_argument_keeps_partial_values() {
        let mut doc = Document::new();
        let err = doc.fill("ii", &[1i32.into()]).unwrap_err();
        assert_eq!(
            err,
            Error::MissingArgument {
                code: 'i',
                position: 1
            }
        );
        assert_eq!(doc.error(), Some(&err));
        assert_eq!(doc.inspect(), "1");
    }

    #[test]
    fn test_argument_mismatch() {
        let mut doc = Document::new();
        let err = doc.fill("i", &["x".into()]).unwrap_err();
        assert_eq!(
            err,
            Error::ArgumentMismatch {
                code: 'i',
                position: 0,
                expected: "int"
            }
        );
        assert!(doc.is_empty());
    }

    #[test]
    fn test_unused_arguments() {
        let mut doc = Document::new();
        let err = doc.fill("i", &[1i32.into(), 2i32.into()]).unwrap_err();
        assert_eq!(err, Error::UnusedArguments { count: 1 });
        assert_eq!(err.kind(), ErrorKind::FormatError);
    }

    #[test]
    fn test_bad_format_mutates_nothing() {
        let mut doc = Document::new();
        assert!(doc.fill("i[i", &[1i32.into(), 2i32.into()]).is_err());
        assert!(doc.fill("ix", &[1i32.into()]).is_err());
        assert!(doc.is_empty());
        assert_eq!(doc.error().map(Error::kind), Some(ErrorKind::FormatError));
    }

    #[test]
    fn test_array_element_mismatch() {
        let mut doc = Document::new();
        let err = doc.fill("@i[iS]", &[1i32.into(), "x".into()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(doc.get_int(), Some(1));
    }
}
