#![cfg(feature = "json")]

mod assets;
use assets::*;
use nbtkit::{compound, Nbt, NbtCompound, NbtError, NbtList, Payload, Tag, TagId, MAX_DEPTH};
use serde_json::{json, Value};

fn same_numbers(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => left.as_f64() == right.as_f64(),
        (Value::Array(left), Value::Array(right)) =>
            left.len() == right.len()
                && left.iter().zip(right).all(|(left, right)| same_numbers(left, right)),
        (Value::Object(left), Value::Object(right)) =>
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|((lk, lv), (rk, rv))| lk == rk && same_numbers(lv, rv)),
        _ => left == right,
    }
}

#[test]
fn numbers_take_the_narrowest_type() {
    let cases = [
        (json!(100), Payload::Byte(100)),
        (json!(-128), Payload::Byte(-128)),
        (json!(200), Payload::Short(200)),
        (json!(-32769), Payload::Int(-32769)),
        (json!(40000), Payload::Int(40000)),
        (json!(-2147483648i64), Payload::Int(i32::MIN)),
        (json!(2147483648i64), Payload::Long(2147483648)),
        (json!(3000000000u64), Payload::Long(3000000000)),
        (json!(1.5), Payload::Float(1.5)),
        (json!(0.1), Payload::Double(0.1)),
        (json!(-7.0), Payload::Byte(-7)),
        (json!(true), Payload::Byte(1)),
        (json!("text"), Payload::from("text")),
    ];

    for (value, expected) in cases {
        assert_eq!(Payload::from_json(&value).unwrap(), expected, "{}", value);
    }
}

#[test]
fn json_round_trip() {
    let value = json!({
        "name": "Steve",
        "level": 30,
        "xp": 0.25,
        "uuid": [-1000000, 2147483647],
        "inventory": [{"id": "stone", "count": 64}, {"id": "dirt", "count": 1}],
        "flags": {"creative": 0, "fly_speed": 0.1}
    });

    let nbt = Nbt::from_json(&value).unwrap();
    let root = nbt.root();
    assert_eq!(root.get::<&str>("name").unwrap(), "Steve");
    assert_eq!(root.get_payload("level"), Some(&Payload::Byte(30)));
    assert_eq!(root.get_payload("xp"), Some(&Payload::Float(0.25)));
    assert_eq!(root.get::<&NbtList>("inventory").unwrap().element_id(), Some(TagId::Compound));
    assert_eq!(
        root.get::<&NbtCompound>("flags").unwrap().get_payload("fly_speed"),
        Some(&Payload::Double(0.1))
    );

    // Key order survives the bridge
    assert_eq!(nbt.to_json(), value);
    assert_eq!(nbt.to_json_string().unwrap(), serde_json::to_string(&value).unwrap());
    assert_eq!(Nbt::from_json_str(&nbt.to_json_string().unwrap()).unwrap(), nbt);
}

#[test]
fn mixed_arrays_fail() {
    assert!(matches!(
        Nbt::from_json(&json!({"pos": [1.5, 64.0]})),
        Err(NbtError::ListTypeMismatch {
            expected: TagId::Float,
            found: TagId::Byte
        })
    ));
    assert!(matches!(
        Nbt::from_json(&json!({"a": null})),
        Err(NbtError::InvalidJsonValue(_))
    ));
    assert!(matches!(
        Nbt::from_json(&json!("not an object")),
        Err(NbtError::InvalidRootTag)
    ));
    assert!(matches!(Nbt::from_json_str("{\"a\": "), Err(NbtError::Json(_))));
}

#[test]
fn tags_and_names() {
    let tag = Tag::from_json(&json!({"Level": {"x": 1}})).unwrap();
    assert_eq!(tag.name(), "Level");
    assert!(!tag.is_root());
    assert_eq!(tag.to_json(), json!({"Level": {"x": 1}}));

    let tag = Tag::from_json(&json!([1, 2, 3])).unwrap();
    assert_eq!(tag.name(), "");
    assert_eq!(tag.id(), TagId::List);

    let root = Tag::root(compound! { "x": 1i8 });
    assert_eq!(root.to_json(), json!({"x": 1}));
}

#[test]
fn arrays_and_special_floats() {
    let nbt = Nbt::from(compound! {
        "bytes": [B; 1, -2],
        "ints": [I; 3],
        "longs": [L; 9007199254740993i64],
        "nan": f64::NAN,
        "inf": f32::INFINITY
    });

    assert_eq!(
        nbt.to_json(),
        json!({
            "bytes": [1, -2],
            "ints": [3],
            "longs": [9007199254740993i64],
            "nan": null,
            "inf": null
        })
    );
}

#[test]
fn duplicate_names_keep_the_last_value() {
    let mut compound = NbtCompound::new();
    compound.push_tag(Tag::new("a", 1i8).unwrap());
    compound.push_tag(Tag::new("a", 2i8).unwrap());

    assert_eq!(Nbt::from(compound).to_json(), json!({"a": 2}));
}

#[test]
fn random_trees_survive_as_json_values() {
    let mut rng = seeded_rng(0x7A6);

    // Types are not preserved, but the numbers are
    for _ in 0 .. 32 {
        let nbt = Nbt::from(random_compound(&mut rng, 3));
        let value = nbt.to_json();
        match Nbt::from_json(&value) {
            Ok(read) => assert!(same_numbers(&read.to_json(), &value), "{}", value),
            Err(NbtError::ListTypeMismatch { .. }) => {}
            Err(error) => panic!("unexpected error {}", error),
        }
    }
}

#[test]
fn deep_nesting() {
    let mut value = json!({});
    for _ in 0 .. MAX_DEPTH {
        value = json!({ "a": value });
    }

    assert!(matches!(
        Nbt::from_json(&value),
        Err(NbtError::DepthLimitExceeded(MAX_DEPTH))
    ));
}
