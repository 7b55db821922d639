use nbtkit::{NbtCompound, NbtError, NbtList, Payload, SnbtStyle};

fn main() -> Result<(), NbtError> {
    // Named payloads are stored in NbtCompounds
    let mut nbt = NbtCompound::new();

    // You can insert payloads directly
    nbt.insert("int", Payload::Int(128))?;
    // or you can insert the value and let it be converted
    nbt.insert("byte", 42_u8)?;

    // Vecs that are not of bytes, ints, or longs have to be converted to an NbtList first
    let list = NbtList::from_values(vec!["string 1".into(), "string 2".into()])?;
    nbt.insert("list", list)?;

    // Lists only hold one type of payload
    let mut numbers = NbtList::new();
    numbers.push(1i16)?;
    if let Err(error) = numbers.push("two") {
        println!("rejected: {}", error);
    }
    nbt.insert("numbers", numbers)?;

    // Display renders compact SNBT
    println!("{}", nbt);
    println!("{}", nbt.to_snbt(SnbtStyle::Formatted));

    Ok(())
}
