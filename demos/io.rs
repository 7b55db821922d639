use nbtkit::{
    io::{read_nbt, write_nbt, Edition, Flavor},
    NbtError,
    Tag,
};
use std::io::Cursor;

// The classic hello world document, uncompressed and big-endian
const HELLO_WORLD: &[u8] = &[
    0x0A, 0x00, 0x0B, b'h', b'e', b'l', b'l', b'o', b' ', b'w', b'o', b'r', b'l', b'd', 0x08,
    0x00, 0x04, b'n', b'a', b'm', b'e', 0x00, 0x09, b'B', b'a', b'n', b'a', b'n', b'r', b'a',
    b'm', b'a', 0x00,
];

fn main() -> Result<(), NbtError> {
    // You can read nbt from raw bytes, and the compression is guessed if you don't name it
    let tag: Tag = read_nbt(&mut Cursor::new(HELLO_WORLD), Edition::Java, None)?;

    println!("uncompressed: {}", tag);

    // Writing gz compressed data and reading it back works the same way
    let mut compressed = Vec::new();
    write_nbt(&mut compressed, &tag, Edition::Java, Flavor::GzCompressed)?;
    let decompressed = read_nbt(&mut Cursor::new(compressed), Edition::Java, None)?;

    println!("gz compressed: {}", decompressed);

    // Bedrock data only differs in byte order
    let mut vec = Vec::new();
    write_nbt(&mut vec, &tag, Edition::Bedrock, Flavor::Uncompressed)?;

    println!("bedrock bytes: {:02X?}", vec);

    Ok(())
}
