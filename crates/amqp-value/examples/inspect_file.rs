//! Simple decoder to inspect files of AMQP-encoded values.
//!
//! Decodes values back to back until the input is exhausted and prints the
//! canonical text form of each.

use std::fs;

use amqp_value::Document;

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "values.amqp".to_string());

    println!("Reading: {}", path);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    println!("\n=== Values ===");
    let mut offset = 0;
    let mut count = 0;
    while offset < data.len() {
        let mut doc = Document::new();
        match doc.decode(&data[offset..]) {
            Ok(consumed) => {
                println!("[{}] @{} ({} bytes) {}", count, offset, consumed, doc);
                offset += consumed;
                count += 1;
            }
            Err(e) => {
                println!("[{}] @{} {}", count, offset, e);
                break;
            }
        }
    }

    println!("\n=== Summary ===");
    println!("Values: {}", count);
    println!("Bytes decoded: {} of {}", offset, data.len());
}
