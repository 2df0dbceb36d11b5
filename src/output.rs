use serde::Serialize;
use std::fmt::Display;

pub fn output_data<T: Serialize>(data: &T, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        "yaml" => {
            println!("{}", serde_yaml::to_string(data)?);
        }
        _ => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
    }
    Ok(())
}

/// Like [`output_data`], but `pretty` renders through `Display`.
pub fn output_display<T: Serialize + Display>(data: &T, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        "json" | "yaml" => output_data(data, format),
        _ => {
            println!("{}", data);
            Ok(())
        }
    }
}

pub fn print_error(message: &str) {
    eprintln!("\x1b[31m❌ Error: {}\x1b[0m", message);
}

pub fn print_warning(message: &str) {
    eprintln!("\x1b[33m⚠️  Warning: {}\x1b[0m", message);
}
