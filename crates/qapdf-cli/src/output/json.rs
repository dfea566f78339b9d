use qapdf_core::error::QaPdfError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), QaPdfError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
