use nbtkit::{Nbt, NbtError, SnbtStyle};

fn main() -> Result<(), NbtError> {
    // Every JSON number becomes the narrowest payload which holds it exactly
    let nbt = Nbt::from_json_str(
        r#"{
        "name": "Steve",
        "level": 30,
        "xp": 1250000,
        "speed": 0.1,
        "inventory": [{"id": "stone", "count": 64}]
    }"#,
    )?;

    println!("{}", nbt.to_snbt(SnbtStyle::Formatted));
    println!("{}", nbt.to_json_string()?);

    Ok(())
}
