mod assets;
use assets::*;
use nbtkit::{
    snbt::{self, SnbtErrorKind},
    Nbt,
    NbtCompound,
    NbtError,
    Payload,
    SnbtStyle,
    Tag,
    TagId,
    MAX_DEPTH,
};

fn error_kind(input: &str) -> SnbtErrorKind {
    match snbt::parse(input) {
        Err(NbtError::MalformedSnbt(error)) => error.kind(),
        other => panic!("expected a syntax error for {:?}, got {:?}", input, other),
    }
}

#[test]
fn edge_cases() {
    let nbt = snbt::parse(SNBT_EDGE_CASES).unwrap();
    assert_compound_eq!(&nbt, &*SNBT_EDGE_CASES_VALIDATE);
}

#[test]
fn formatting() {
    for style in [SnbtStyle::Compact, SnbtStyle::Formatted] {
        let repr = SNBT_EDGE_CASES_VALIDATE.to_snbt(style);
        assert_compound_eq!(&snbt::parse(&repr).unwrap(), &*SNBT_EDGE_CASES_VALIDATE);
    }

    assert_compound_eq!(
        &snbt::parse(&BIG_TEST_VALIDATE.to_string()).unwrap(),
        &*BIG_TEST_VALIDATE
    );
}

#[test]
fn random_trees_round_trip() {
    let mut rng = seeded_rng(0xC0FFEE);

    for _ in 0 .. 64 {
        let nbt = Nbt::from(random_compound(&mut rng, 4));
        for style in [SnbtStyle::Compact, SnbtStyle::Formatted] {
            let text = nbt.to_snbt(style);
            let parsed = Nbt::from_snbt(&text).unwrap();
            assert_eq!(parsed, nbt, "{}", text);
        }
    }
}

#[test]
fn literals() {
    assert_eq!(snbt::parse_payload("5b").unwrap(), Payload::Byte(5));
    assert_eq!(snbt::parse_payload("5").unwrap(), Payload::Int(5));
    assert_eq!(snbt::parse_payload("5.0").unwrap(), Payload::Double(5.0));
    assert_eq!(snbt::parse_payload("5.0f").unwrap(), Payload::Float(5.0));
    assert_eq!(snbt::parse_payload("-7S").unwrap(), Payload::Short(-7));
    assert_eq!(snbt::parse_payload("1e2").unwrap(), Payload::Double(100.0));
    assert_eq!(snbt::parse_payload(" 'quoted' ").unwrap(), Payload::from("quoted"));
    assert!(matches!(snbt::parse_payload("NaNd").unwrap(), Payload::Double(value) if value.is_nan()));

    // Too large for an int, so it reads as a bare string
    assert_eq!(snbt::parse_payload("3000000000").unwrap(), Payload::from("3000000000"));

    assert!(matches!(
        snbt::parse_payload("300b"),
        Err(NbtError::InvalidLiteral {
            kind: TagId::Byte,
            ..
        })
    ));
    assert!(matches!(
        snbt::parse_payload("1e39f"),
        Err(NbtError::InvalidLiteral {
            kind: TagId::Float,
            ..
        })
    ));
    assert!(matches!(
        snbt::parse_payload("[I; 1, 2.5]"),
        Err(NbtError::InvalidLiteral { kind: TagId::Int, .. })
    ));
    assert_eq!(
        snbt::parse_payload("[I; 1, -2]").unwrap(),
        Payload::IntArray(vec![1, -2])
    );
    assert!(matches!(
        snbt::parse_payload("[I; 1i, 2I]"),
        Err(NbtError::InvalidLiteral { kind: TagId::Int, literal }) if &*literal == "1i"
    ));
    assert!(matches!(
        snbt::parse_payload("not bare"),
        Err(NbtError::InvalidLiteral {
            kind: TagId::String,
            ..
        })
    ));
}

#[test]
fn lists_are_homogeneous() {
    assert!(matches!(
        snbt::parse("{a: [1b, 2s]}"),
        Err(NbtError::ListTypeMismatch {
            expected: TagId::Byte,
            found: TagId::Short
        })
    ));
    assert!(snbt::parse("{a: [[1b], [2s], []]}").is_ok());
}

#[test]
fn syntax_errors() {
    assert_eq!(error_kind("{a: 1,}"), SnbtErrorKind::TrailingComma);
    assert_eq!(error_kind("{a 1}"), SnbtErrorKind::ExpectedColon);
    assert_eq!(error_kind("{:1}"), SnbtErrorKind::InvalidKey);
    assert_eq!(error_kind("{a: \"abc}"), SnbtErrorKind::UnmatchedQuote);
    assert_eq!(error_kind("{a: [1, 2}"), SnbtErrorKind::UnmatchedBracket);
    assert_eq!(error_kind("{a: 1]}"), SnbtErrorKind::UnexpectedBracket);
    assert_eq!(error_kind("{a: }"), SnbtErrorKind::EmptyElement);
    assert_eq!(error_kind("{a: [1, , 2]}"), SnbtErrorKind::EmptyElement);
    assert_eq!(error_kind("[1, 2]"), SnbtErrorKind::ExpectedCompound);
    assert_eq!(error_kind("{a: 'x' y}"), SnbtErrorKind::TrailingCharacters);
}

#[test]
fn error_positions() {
    let error = match snbt::parse("{first: 1, second: {x: 'open}}") {
        Err(NbtError::MalformedSnbt(error)) => error,
        other => panic!("unexpected result {:?}", other),
    };

    assert_eq!(error.kind(), SnbtErrorKind::UnmatchedQuote);
    assert_eq!(error.column(), 23);
    assert!(error.segment().contains("'open"));
    assert!(error.to_string().starts_with("Unmatched quote at column 23"));
}

#[test]
fn depth_limit() {
    let nested = |depth: usize| format!("{{a: {}{}}}", "[".repeat(depth), "]".repeat(depth));

    assert!(snbt::parse(&nested(MAX_DEPTH - 1)).is_ok());
    assert!(matches!(
        snbt::parse(&nested(MAX_DEPTH)),
        Err(NbtError::DepthLimitExceeded(MAX_DEPTH))
    ));
}

#[test]
fn tags_render_with_their_names() {
    let tag = Tag::new("my key", NbtCompound::new()).unwrap();
    assert_eq!(tag.to_snbt(SnbtStyle::Compact), r#""my key":{}"#);
    assert_eq!(Tag::root(NbtCompound::new()).to_snbt(SnbtStyle::Formatted), "{}");

    let nbt = Nbt::from_snbt("{ list: [ 1.5f , -2f ], 'quote\"d': \"a\\\\b\" }").unwrap();
    assert_eq!(
        nbt.to_snbt(SnbtStyle::Compact),
        r#"{list:[1.5f,-2.0f],"quote\"d":"a\\b"}"#
    );
    assert_eq!(
        nbt.to_snbt(SnbtStyle::Formatted),
        r#"{list: [1.5f, -2.0f], "quote\"d": "a\\b"}"#
    );
}
