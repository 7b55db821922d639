#![allow(dead_code)]

use nbtkit::{NbtCompound, NbtList, Payload, Tag};
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[macro_export]
macro_rules! assert_compound_eq {
    ($left:expr, $right:expr) => {{
        let left: &nbtkit::NbtCompound = &$left;
        let right: &nbtkit::NbtCompound = &$right;
        assert!(
            left == right,
            "compounds differ\n left: {}\nright: {}",
            left.to_snbt(nbtkit::SnbtStyle::Formatted),
            right.to_snbt(nbtkit::SnbtStyle::Formatted)
        );
    }};
}

// The classic hello world document: a compound named "hello world" holding one string
pub const HELLO_WORLD_JAVA: &[u8] = &[
    0x0A, 0x00, 0x0B, b'h', b'e', b'l', b'l', b'o', b' ', b'w', b'o', b'r', b'l', b'd', 0x08,
    0x00, 0x04, b'n', b'a', b'm', b'e', 0x00, 0x09, b'B', b'a', b'n', b'a', b'n', b'r', b'a',
    b'm', b'a', 0x00,
];

pub const HELLO_WORLD_BEDROCK: &[u8] = &[
    0x0A, 0x0B, 0x00, b'h', b'e', b'l', b'l', b'o', b' ', b'w', b'o', b'r', b'l', b'd', 0x08,
    0x04, 0x00, b'n', b'a', b'm', b'e', 0x09, 0x00, b'B', b'a', b'n', b'a', b'n', b'r', b'a',
    b'm', b'a', 0x00,
];

// An unnamed root compound holding the int `value: 1`, in both byte orders
pub const SMALL_ROOT_JAVA: &[u8] = &[
    0x0A, 0x00, 0x00, 0x03, 0x00, 0x05, b'v', b'a', b'l', b'u', b'e', 0x00, 0x00, 0x00, 0x01,
    0x00,
];

pub const SMALL_ROOT_BEDROCK: &[u8] = &[
    0x0A, 0x00, 0x00, 0x03, 0x05, 0x00, b'v', b'a', b'l', b'u', b'e', 0x01, 0x00, 0x00, 0x00,
    0x00,
];

pub static BIG_TEST_VALIDATE: Lazy<NbtCompound> = Lazy::new(|| {
    let mut level = NbtCompound::new();

    let mut nested_test = NbtCompound::new();
    let mut egg = NbtCompound::new();
    egg.insert("name", "Eggbert").unwrap();
    egg.insert("value", 0.5f32).unwrap();
    let mut ham = NbtCompound::new();
    ham.insert("name", "Hampus").unwrap();
    ham.insert("value", 0.75f32).unwrap();
    nested_test.insert("egg", egg).unwrap();
    nested_test.insert("ham", ham).unwrap();
    level.insert("nested compound test", nested_test).unwrap();

    level.insert("intTest", 2147483647i32).unwrap();
    level.insert("byteTest", 127i8).unwrap();
    level
        .insert(
            "stringTest",
            "HELLO WORLD THIS IS A TEST STRING \u{C5}\u{C4}\u{D6}!",
        )
        .unwrap();
    level
        .insert(
            "listTest (long)",
            NbtList::from_values(vec![11i64.into(), 12i64.into(), 13i64.into(), 14i64.into(), 15i64.into()])
                .unwrap(),
        )
        .unwrap();
    level.insert("doubleTest", 0.49312871321823148f64).unwrap();
    level.insert("floatTest", 0.49823147058486938f32).unwrap();
    level.insert("longTest", 9223372036854775807i64).unwrap();

    let mut list = NbtList::new();
    let mut compound0 = NbtCompound::new();
    compound0.insert("created-on", 1264099775885i64).unwrap();
    compound0.insert("name", "Compound tag #0").unwrap();
    list.push(compound0).unwrap();
    let mut compound1 = NbtCompound::new();
    compound1.insert("created-on", 1264099775885i64).unwrap();
    compound1.insert("name", "Compound tag #1").unwrap();
    list.push(compound1).unwrap();
    level.insert("listTest (compound)", list).unwrap();

    let mut bytes = Vec::new();
    for n in 0 .. 1000 {
        bytes.push(((n * n * 255 + n * 7) % 100) as i8);
    }
    level
        .insert(
            "byteArrayTest (the first 1000 values of (n*n*255+n*7)%100, starting with n=0 (0, 62, \
             34, 16, 8, ...))",
            bytes,
        )
        .unwrap();

    level.insert("shortTest", 32767i16).unwrap();

    level
});

pub const SNBT_EDGE_CASES: &str = r##"{
    byte_min: -128b,
    byte_max: 127B,
    bool_true: true,
    bool_false: false,
    short_min: -32768s,
    short_max: 32767S,
    int_min: -2147483648,
    int_max: 2147483647,
    long_min: -9223372036854775808L,
    long_max: 9223372036854775807l,
    f32_0: 0.0f,
    f32_10: 10F,
    f32_dec: .653f,
    f32_neg: -1.23453f,
    f64_0: 0.0,
    f64_n10: -10d,
    f64_dec: 0.987,
    f64_neg: -128375.1,
    f64_exp: 1.5e3,
    f64_suffixed: 123.4D,
    "this is a ;.# v3ry $trange keë": "with a weirder { value? [.*; \"\\\"'\"] }",
    'unicode test': "aé日𐐁",
    escapes: "tab\there",
    "": empty_key,
    empty_byte_array: [B;],
    empty_int_array: [I; ],
    empty_long_array: [L;],
    empty_list: [],
    chaotic_array: [
        [[I;]],
        [[L; 10]],
        [[B;], [B; 1b, 2b, 3]],
        [{foo: {bar: [baz, buz]}, ".{}": {}}],
        [0.0, 0.0d]
    ],
    nested_compounds: {
        c1: {
            c2: {
                c3: {c4: {c5: {"this is a key": 'and [ this }{] "}" is { \'heh\' a \\"lol"}'}}},
                a: b
            }
        }
    }
}"##;

pub static SNBT_EDGE_CASES_VALIDATE: Lazy<NbtCompound> = Lazy::new(|| {
    let mut compound = NbtCompound::new();
    compound.insert("byte_min", i8::MIN).unwrap();
    compound.insert("byte_max", i8::MAX).unwrap();
    compound.insert("bool_true", true).unwrap();
    compound.insert("bool_false", false).unwrap();
    compound.insert("short_min", i16::MIN).unwrap();
    compound.insert("short_max", i16::MAX).unwrap();
    compound.insert("int_min", i32::MIN).unwrap();
    compound.insert("int_max", i32::MAX).unwrap();
    compound.insert("long_min", i64::MIN).unwrap();
    compound.insert("long_max", i64::MAX).unwrap();
    compound.insert("f32_0", 0.0f32).unwrap();
    compound.insert("f32_10", 10f32).unwrap();
    compound.insert("f32_dec", 0.653f32).unwrap();
    compound.insert("f32_neg", -1.23453f32).unwrap();
    compound.insert("f64_0", 0.0f64).unwrap();
    compound.insert("f64_n10", -10f64).unwrap();
    compound.insert("f64_dec", 0.987f64).unwrap();
    compound.insert("f64_neg", -128375.1f64).unwrap();
    compound.insert("f64_exp", 1500f64).unwrap();
    compound.insert("f64_suffixed", 123.4f64).unwrap();
    compound
        .insert(
            "this is a ;.# v3ry $trange keë",
            "with a weirder { value? [.*; \"\\\"'\"] }",
        )
        .unwrap();
    compound.insert("unicode test", "aé日\u{10401}").unwrap();
    compound.insert("escapes", r"tab\there").unwrap();
    compound.insert("", "empty_key").unwrap();
    compound.insert("empty_byte_array", Vec::<i8>::new()).unwrap();
    compound.insert("empty_int_array", Vec::<i32>::new()).unwrap();
    compound.insert("empty_long_array", Vec::<i64>::new()).unwrap();
    compound.insert("empty_list", NbtList::new()).unwrap();

    let list = |values: Vec<Payload>| NbtList::from_values(values).unwrap();
    let mut chaotic_array = NbtList::new();
    chaotic_array.push(list(vec![Payload::IntArray(Vec::new())])).unwrap();
    chaotic_array.push(list(vec![Payload::LongArray(vec![10])])).unwrap();
    chaotic_array
        .push(list(vec![
            Payload::ByteArray(Vec::new()),
            Payload::ByteArray(vec![1, 2, 3]),
        ]))
        .unwrap();
    let mut c0 = NbtCompound::new();
    let mut foo = NbtCompound::new();
    foo.insert("bar", list(vec!["baz".into(), "buz".into()])).unwrap();
    c0.insert("foo", foo).unwrap();
    c0.insert(".{}", NbtCompound::new()).unwrap();
    chaotic_array.push(list(vec![c0.into()])).unwrap();
    chaotic_array.push(list(vec![0.0f64.into(), 0.0f64.into()])).unwrap();
    compound.insert("chaotic_array", chaotic_array).unwrap();

    let mut nested_compounds = NbtCompound::new();
    let mut c1 = NbtCompound::new();
    let mut c2 = NbtCompound::new();
    let mut c3 = NbtCompound::new();
    let mut c4 = NbtCompound::new();
    let mut c5 = NbtCompound::new();
    c5.insert(
        "this is a key",
        r#"and [ this }{] "}" is { 'heh' a \"lol"}"#,
    )
    .unwrap();
    c4.insert("c5", c5).unwrap();
    c3.insert("c4", c4).unwrap();
    c2.insert("c3", c3).unwrap();
    c2.insert("a", "b").unwrap();
    c1.insert("c2", c2).unwrap();
    nested_compounds.insert("c1", c1).unwrap();
    compound.insert("nested_compounds", nested_compounds).unwrap();
    compound
});

/// A document resembling a player save, with a NaN coordinate.
pub static PLAYER_NAN_VALUE: Lazy<Tag> = Lazy::new(|| {
    let mut player = NbtCompound::new();
    let pos = NbtList::from_values(vec![0.0f64.into(), f64::NAN.into(), 0.0f64.into()]).unwrap();
    player.insert("Pos", pos).unwrap();
    player.insert("Health", 20.0f32).unwrap();
    player.insert("Dimension", "minecraft:overworld").unwrap();
    Tag::root(player)
});

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Builds a random compound with up to `depth` levels of nested containers. Floats are always
/// finite so that trees compare equal to themselves.
pub fn random_compound(rng: &mut StdRng, depth: usize) -> NbtCompound {
    let len = rng.gen_range(0 .. 8);
    let mut compound = NbtCompound::with_capacity(len);
    for _ in 0 .. len {
        let name = random_string(rng);
        let kind = rng.gen_range(1 ..= 12);
        compound.insert(name, random_payload(rng, kind, depth)).unwrap();
    }
    compound
}

fn random_payload(rng: &mut StdRng, kind: u8, depth: usize) -> Payload {
    // Containers turn into strings once the depth is used up
    let kind = if depth == 0 && matches!(kind, 9 | 10) { 8 } else { kind };

    match kind {
        1 => Payload::Byte(rng.gen()),
        2 => Payload::Short(rng.gen()),
        3 => Payload::Int(rng.gen()),
        4 => Payload::Long(rng.gen()),
        5 => Payload::Float(rng.gen_range(-1.0e6f32 .. 1.0e6)),
        6 => Payload::Double(rng.gen_range(-1.0e12f64 .. 1.0e12)),
        7 => Payload::ByteArray((0 .. rng.gen_range(0 .. 16)).map(|_| rng.gen()).collect()),
        8 => Payload::String(random_string(rng)),
        9 => {
            let element = rng.gen_range(1 ..= 12);
            let values = (0 .. rng.gen_range(0 .. 6))
                .map(|_| random_payload(rng, element, depth - 1))
                .collect();
            Payload::List(NbtList::from_values(values).unwrap())
        }
        10 => Payload::Compound(random_compound(rng, depth - 1)),
        11 => Payload::IntArray((0 .. rng.gen_range(0 .. 16)).map(|_| rng.gen()).collect()),
        _ => Payload::LongArray((0 .. rng.gen_range(0 .. 16)).map(|_| rng.gen()).collect()),
    }
}

fn random_string(rng: &mut StdRng) -> String {
    const ALPHABET: &[char] = &[
        'a', 'b', 'z', 'A', 'Q', '0', '7', '_', '-', '.', '+', ' ', ':', ',', '{', ']', '"', '\'',
        '\\', 'é', '日', '\u{10401}',
    ];

    (0 .. rng.gen_range(0 .. 12))
        .map(|_| ALPHABET[rng.gen_range(0 .. ALPHABET.len())])
        .collect()
}
