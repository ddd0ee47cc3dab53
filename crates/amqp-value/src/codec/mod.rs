//! AMQP 1.0 binary encoding and decoding.
//!
//! Values are written with the most compact constructor that can hold them
//! and decoded from any valid constructor for their type.

pub mod constructor;
pub mod decode;
pub mod encode;
pub mod primitives;

pub use decode::decode;
pub use encode::{encode, encode_to_vec, encoded_size};
pub use primitives::{Reader, Writer};

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use proptest::collection::vec;
    use proptest::prelude::*;
    use uuid::Uuid;

    use crate::error::Error;
    use crate::model::{Document, TypeCode, Value};

    #[derive(Debug, Clone)]
    enum Tree {
        Scalar(Value<'static>),
        List(Vec<Tree>),
        Map(Vec<(Tree, Tree)>),
        Described(Box<Tree>, Box<Tree>),
        Array {
            descriptor: Option<u64>,
            element: TypeCode,
            items: Vec<Value<'static>>,
        },
    }

    fn arb_value() -> impl Strategy<Value = Value<'static>> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<u8>().prop_map(Value::Ubyte),
            any::<i8>().prop_map(Value::Byte),
            any::<u16>().prop_map(Value::Ushort),
            any::<i16>().prop_map(Value::Short),
            any::<u32>().prop_map(Value::Uint),
            any::<i32>().prop_map(Value::Int),
            any::<char>().prop_map(Value::Char),
            any::<u64>().prop_map(Value::Ulong),
            any::<i64>().prop_map(Value::Long),
            any::<i64>().prop_map(Value::Timestamp),
            any::<f32>().prop_map(Value::Float),
            any::<f64>().prop_map(Value::Double),
            any::<u32>().prop_map(Value::Decimal32),
            any::<u64>().prop_map(Value::Decimal64),
            any::<[u8; 16]>().prop_map(Value::Decimal128),
            any::<u128>().prop_map(|v| Value::Uuid(Uuid::from_u128(v))),
            vec(any::<u8>(), 0..300).prop_map(|b| Value::Binary(Cow::Owned(b))),
            any::<String>().prop_map(|s| Value::String(Cow::Owned(s.into_bytes()))),
            "[a-z][a-z:._-]{0,12}".prop_map(|s| Value::Symbol(Cow::Owned(s.into_bytes()))),
        ]
    }

    /// Arrays of one scalar element kind, optionally described.
    fn arb_array() -> impl Strategy<Value = Tree> {
        fn items<T, S>(
            element: TypeCode,
            strategy: S,
            to_value: fn(T) -> Value<'static>,
        ) -> impl Strategy<Value = (TypeCode, Vec<Value<'static>>)>
        where
            T: std::fmt::Debug,
            S: Strategy<Value = T>,
        {
            vec(strategy, 0..6)
                .prop_map(move |v| (element, v.into_iter().map(to_value).collect()))
        }

        let elements = prop_oneof![
            items(TypeCode::Null, Just(()), |_: ()| Value::Null),
            items(TypeCode::Bool, any::<bool>(), Value::Bool),
            items(TypeCode::Ubyte, any::<u8>(), Value::Ubyte),
            items(TypeCode::Short, any::<i16>(), Value::Short),
            items(TypeCode::Int, any::<i32>(), Value::Int),
            items(TypeCode::Char, any::<char>(), Value::Char),
            items(TypeCode::Ulong, any::<u64>(), Value::Ulong),
            items(TypeCode::Timestamp, any::<i64>(), Value::Timestamp),
            items(TypeCode::Double, any::<f64>(), Value::Double),
            items(TypeCode::Uuid, any::<u128>(), |v: u128| Value::Uuid(Uuid::from_u128(v))),
            items(TypeCode::Binary, vec(any::<u8>(), 0..4), |b: Vec<u8>| {
                Value::Binary(Cow::Owned(b))
            }),
            items(TypeCode::String, "[a-z]{0,300}", |s: String| {
                Value::String(Cow::Owned(s.into_bytes()))
            }),
            items(TypeCode::Symbol, "[a-z]{1,8}", |s: String| {
                Value::Symbol(Cow::Owned(s.into_bytes()))
            }),
        ];
        (proptest::option::of(any::<u64>()), elements).prop_map(
            |(descriptor, (element, items))| Tree::Array {
                descriptor,
                element,
                items,
            },
        )
    }

    fn arb_tree() -> impl Strategy<Value = Tree> {
        let leaf = prop_oneof![4 => arb_value().prop_map(Tree::Scalar), 1 => arb_array()];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                vec(inner.clone(), 0..8).prop_map(Tree::List),
                vec((inner.clone(), inner.clone()), 0..4).prop_map(Tree::Map),
                (inner.clone(), inner)
                    .prop_map(|(d, b)| Tree::Described(Box::new(d), Box::new(b))),
            ]
        })
    }

    fn put_tree(doc: &mut Document, tree: &Tree) -> Result<(), Error> {
        match tree {
            Tree::Scalar(v) => doc.put(v.clone()),
            Tree::List(items) => {
                doc.put_list()?;
                doc.enter()?;
                for item in items {
                    put_tree(doc, item)?;
                }
                doc.exit()
            }
            Tree::Map(entries) => {
                doc.put_map()?;
                doc.enter()?;
                for (k, v) in entries {
                    put_tree(doc, k)?;
                    put_tree(doc, v)?;
                }
                doc.exit()
            }
            Tree::Described(descriptor, body) => {
                doc.put_described()?;
                doc.enter()?;
                put_tree(doc, descriptor)?;
                put_tree(doc, body)?;
                doc.exit()
            }
            Tree::Array {
                descriptor,
                element,
                items,
            } => {
                doc.put_array(descriptor.is_some(), *element)?;
                doc.enter()?;
                if let Some(code) = descriptor {
                    doc.put_ulong(*code)?;
                }
                for item in items {
                    doc.put(item.clone())?;
                }
                doc.exit()
            }
        }
    }

    fn round_trip(doc: &Document) -> Document {
        let bytes = doc.encode_to_vec().unwrap();
        let mut decoded = Document::new();
        assert_eq!(decoded.decode(&bytes).unwrap(), bytes.len());
        assert_eq!(decoded.encode_to_vec().unwrap(), bytes);
        decoded
    }

    #[test]
    fn test_arrays_of_compounds_round_trip() {
        let mut lists = Document::new();
        lists
            .fill(
                "@T[[][oo][][iii][Sosid]]",
                &[
                    TypeCode::List.into(),
                    true.into(),
                    false.into(),
                    1i32.into(),
                    2i32.into(),
                    3i32.into(),
                    "x".into(),
                    true.into(),
                    "y".into(),
                    1i32.into(),
                    2.5f64.into(),
                ],
            )
            .unwrap();
        assert_eq!(
            round_trip(&lists).inspect(),
            r#"@PN_LIST[[], [true, false], [], [1, 2, 3], ["x", true, :y, 1, 2.5]]"#
        );

        let mut maps = Document::new();
        maps.fill(
            "@T[{}{sS}{}{IhIoIf}{iSiSiSiS}]",
            &[
                TypeCode::Map.into(),
                "k".into(),
                "v".into(),
                1u32.into(),
                (-2i16).into(),
                2u32.into(),
                true.into(),
                3u32.into(),
                1.5f32.into(),
                1i32.into(),
                "a".into(),
                2i32.into(),
                "b".into(),
                3i32.into(),
                "c".into(),
                4i32.into(),
                "d".into(),
            ],
        )
        .unwrap();
        assert_eq!(
            round_trip(&maps).inspect(),
            r#"@PN_MAP[{}, {:k="v"}, {}, {1=-2, 2=true, 3=1.5}, {1="a", 2="b", 3="c", 4="d"}]"#
        );

        let mut arrays = Document::new();
        arrays
            .fill(
                "@T[@T[]@T[oo]]",
                &[
                    TypeCode::Array.into(),
                    TypeCode::Ubyte.into(),
                    TypeCode::Bool.into(),
                    true.into(),
                    false.into(),
                ],
            )
            .unwrap();
        assert_eq!(round_trip(&arrays), arrays);
    }

    /// Boundary values of a scalar element kind.
    fn samples(element: TypeCode) -> Vec<Value<'static>> {
        fn bytes(b: &[u8]) -> Cow<'static, [u8]> {
            Cow::Owned(b.to_vec())
        }
        match element {
            TypeCode::Null => vec![Value::Null, Value::Null],
            TypeCode::Bool => vec![Value::Bool(true), Value::Bool(false)],
            TypeCode::Ubyte => vec![Value::Ubyte(0), Value::Ubyte(u8::MAX)],
            TypeCode::Byte => vec![Value::Byte(i8::MIN), Value::Byte(-1), Value::Byte(i8::MAX)],
            TypeCode::Ushort => vec![Value::Ushort(0), Value::Ushort(u16::MAX)],
            TypeCode::Short => vec![Value::Short(i16::MIN), Value::Short(i16::MAX)],
            TypeCode::Uint => vec![Value::Uint(0), Value::Uint(255), Value::Uint(u32::MAX)],
            TypeCode::Int => vec![Value::Int(i32::MIN), Value::Int(-1), Value::Int(i32::MAX)],
            TypeCode::Char => vec![Value::Char('a'), Value::Char('\u{e9}'), Value::Char(char::MAX)],
            TypeCode::Ulong => vec![Value::Ulong(0), Value::Ulong(255), Value::Ulong(u64::MAX)],
            TypeCode::Long => vec![Value::Long(i64::MIN), Value::Long(-128), Value::Long(i64::MAX)],
            TypeCode::Timestamp => vec![
                Value::Timestamp(i64::MIN),
                Value::Timestamp(0),
                Value::Timestamp(1500),
            ],
            TypeCode::Float => vec![
                Value::Float(-0.0),
                Value::Float(f32::MIN_POSITIVE),
                Value::Float(f32::MAX),
            ],
            TypeCode::Double => vec![Value::Double(-1.5), Value::Double(f64::MAX)],
            TypeCode::Decimal32 => vec![Value::Decimal32(0), Value::Decimal32(u32::MAX)],
            TypeCode::Decimal64 => vec![Value::Decimal64(1), Value::Decimal64(u64::MAX)],
            TypeCode::Decimal128 => vec![Value::Decimal128([0; 16]), Value::Decimal128([0xff; 16])],
            TypeCode::Uuid => vec![
                Value::Uuid(Uuid::nil()),
                Value::Uuid(Uuid::from_u128(u128::MAX)),
            ],
            TypeCode::Binary => vec![Value::Binary(bytes(b"")), Value::Binary(bytes(&[0, 0xff]))],
            TypeCode::String => vec![
                Value::String(bytes(b"")),
                Value::String(bytes("caf\u{e9}".as_bytes())),
            ],
            TypeCode::Symbol => vec![
                Value::Symbol(bytes(b"a")),
                Value::Symbol(bytes(b"amqp:accepted:list")),
            ],
            TypeCode::Described | TypeCode::Array | TypeCode::List | TypeCode::Map => Vec::new(),
        }
    }

    /// Puts two or more elements of `element` kind at the cursor.
    fn put_samples(doc: &mut Document, element: TypeCode) -> Result<(), Error> {
        match element {
            TypeCode::List => {
                doc.put_list()?;
                doc.put_list()?;
                doc.enter()?;
                doc.put_int(1)?;
                doc.put_string("x")?;
                doc.exit()
            }
            TypeCode::Map => {
                doc.put_map()?;
                doc.put_map()?;
                doc.enter()?;
                doc.put_symbol("k")?;
                doc.put_uint(7)?;
                doc.exit()
            }
            TypeCode::Array => {
                doc.put_array(false, TypeCode::Bool)?;
                doc.put_array(false, TypeCode::Long)?;
                doc.enter()?;
                doc.put_long(-5)?;
                doc.exit()
            }
            _ => samples(element).into_iter().try_for_each(|v| doc.put(v)),
        }
    }

    #[test]
    fn test_arrays_of_every_element_kind_round_trip() {
        let kinds = TypeCode::ALL.into_iter().filter(|tc| *tc != TypeCode::Described);
        for element in kinds {
            let mut empty = Document::new();
            empty.put_array(false, element).unwrap();
            assert_eq!(
                round_trip(&empty).inspect(),
                format!("@{}[]", element.name()),
                "{element:?}"
            );

            for described in [false, true] {
                let mut doc = Document::new();
                doc.put_array(described, element).unwrap();
                doc.enter().unwrap();
                if described {
                    doc.put_ulong(0x77).unwrap();
                }
                put_samples(&mut doc, element).unwrap();
                doc.exit().unwrap();
                assert!(doc.get_array().unwrap() >= 2, "{element:?}");

                let back = round_trip(&doc);
                assert_eq!(back.inspect(), doc.inspect(), "{element:?}");
                back_matches_array(&back, described, element);
            }
        }
    }

    fn back_matches_array(doc: &Document, described: bool, element: TypeCode) {
        let mut doc = doc.clone();
        doc.rewind();
        assert!(doc.next());
        assert_eq!(doc.array_type(), Some(element));
        assert_eq!(doc.is_array_described(), described);
    }

    #[test]
    fn test_long_strings_widen_array_elements() {
        let long = "x".repeat(300);
        let mut doc = Document::new();
        doc.put_array(false, TypeCode::String).unwrap();
        doc.enter().unwrap();
        doc.put_string("short").unwrap();
        doc.put_string(&long).unwrap();
        doc.exit().unwrap();

        let bytes = doc.encode_to_vec().unwrap();
        // array32: size and count are four bytes, then one shared str32 constructor
        assert_eq!(bytes[0], 0xf0);
        assert_eq!(bytes[9], 0xb1);
        assert_eq!(bytes.len(), 1 + 4 + 4 + 1 + (4 + 5) + (4 + 300));
        assert_eq!(round_trip(&doc), doc);

        let mut short = Document::new();
        short.fill("@Z[ZZ]", &[(&b"ab"[..]).into(), (&b""[..]).into()]).unwrap();
        assert_eq!(
            short.encode_to_vec().unwrap(),
            [0xe0, 6, 2, 0xa0, 2, b'a', b'b', 0]
        );
        assert_eq!(round_trip(&short).inspect(), r#"@PN_BINARY[b"ab", b""]"#);
    }

    proptest! {
        #[test]
        fn prop_encode_decode_preserves_text(tree in arb_tree()) {
            let mut doc = Document::new();
            put_tree(&mut doc, &tree).unwrap();

            let bytes = doc.encode_to_vec().unwrap();
            prop_assert_eq!(doc.encoded_size().unwrap(), bytes.len());

            let mut decoded = Document::new();
            prop_assert_eq!(decoded.decode(&bytes).unwrap(), bytes.len());
            prop_assert_eq!(decoded.inspect(), doc.inspect());

            // compact constructor choice is stable
            prop_assert_eq!(decoded.encode_to_vec().unwrap(), bytes);
        }

        #[test]
        fn prop_decode_arbitrary_bytes_is_atomic(bytes in vec(any::<u8>(), 0..64)) {
            let mut doc = Document::new();
            doc.put_string("before").unwrap();
            let before = doc.inspect();

            match doc.decode(&bytes) {
                Ok(consumed) => {
                    prop_assert!(consumed > 0 && consumed <= bytes.len());
                    prop_assert!(doc.size() > 1);
                }
                Err(_) => {
                    prop_assert_eq!(doc.inspect(), before);
                    prop_assert!(doc.error().is_some());
                }
            }
        }
    }
}
