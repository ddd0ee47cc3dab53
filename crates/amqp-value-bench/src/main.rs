//! Benchmark for AMQP value documents using a synthetic link session.
//!
//! Fills open/begin/attach performatives followed by a run of transfers,
//! then times encoding, decoding and inspection of the whole stream.

use std::time::Instant;

use amqp_value::Document;
use uuid::Uuid;

/// Nodes per transfer: described, descriptor, list and six fields. The
/// session header (open, begin, attach) needs fewer nodes than three transfers.
const NODES_PER_TRANSFER: usize = 9;

const ITERS: u32 = 10;

fn fill_session(doc: &mut Document, transfers: usize) {
    doc.fill(
        "DL[SSIHI]",
        &[
            0x10u64.into(),
            "bench-container".into(),
            "localhost".into(),
            65536u32.into(),
            2047u16.into(),
            30_000u32.into(),
        ],
    )
    .expect("Failed to fill open");
    doc.fill(
        "DL[nIII]",
        &[0x11u64.into(), 0u32.into(), 2048u32.into(), 2048u32.into()],
    )
    .expect("Failed to fill begin");
    doc.fill(
        "DL[SIoBB]",
        &[
            0x12u64.into(),
            "bench-link".into(),
            0u32.into(),
            false.into(),
            1u8.into(),
            0u8.into(),
        ],
    )
    .expect("Failed to fill attach");

    for i in 0..transfers {
        let tag = Uuid::new_v4();
        doc.fill(
            "DL[IIZIoo]",
            &[
                0x14u64.into(),
                0u32.into(),
                (i as u32).into(),
                (&tag.as_bytes()[..]).into(),
                0u32.into(),
                (i % 2 == 0).into(),
                false.into(),
            ],
        )
        .expect("Failed to fill transfer");
    }
}

/// Decodes every value in `bytes` into one document.
fn decode_all(bytes: &[u8]) -> Document {
    let mut doc = Document::new();
    let mut offset = 0;
    while offset < bytes.len() {
        offset += doc.decode(&bytes[offset..]).expect("Failed to decode");
    }
    doc
}

fn main() {
    let max_transfers = amqp_value::limits::MAX_NODES / NODES_PER_TRANSFER - 3;
    let transfers = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(5000)
        .min(max_transfers);

    println!("=== AMQP Value Benchmark ===");
    println!("Transfers: {}", transfers);

    // Fill
    let fill_start = Instant::now();
    let mut doc = Document::new();
    fill_session(&mut doc, transfers);
    let fill_time = fill_start.elapsed();
    println!("\nFill: {} nodes in {:?}", doc.size(), fill_time);

    // Encode
    for _ in 0..3 {
        let _ = doc.encode_to_vec().expect("Failed to encode");
    }
    let encode_start = Instant::now();
    let mut encoded = Vec::new();
    for _ in 0..ITERS {
        encoded = doc.encode_to_vec().expect("Failed to encode");
    }
    let encode_time = encode_start.elapsed() / ITERS;
    println!(
        "\nEncode: {} bytes in {:?} (avg of {} iterations)",
        encoded.len(),
        encode_time,
        ITERS
    );
    println!(
        "  Throughput: {:.2} MB/s",
        (encoded.len() as f64 / 1_000_000.0) / encode_time.as_secs_f64()
    );

    // Encoding into a caller buffer must match
    let mut buf = vec![0u8; doc.encoded_size().expect("Failed to size")];
    let written = doc.encode(&mut buf).expect("Failed to encode into buffer");
    assert_eq!(&buf[..written], &encoded[..]);

    // Decode
    for _ in 0..3 {
        let _ = decode_all(&encoded);
    }
    let decode_start = Instant::now();
    let mut decoded = Document::new();
    for _ in 0..ITERS {
        decoded = decode_all(&encoded);
    }
    let decode_time = decode_start.elapsed() / ITERS;
    println!(
        "\nDecode: {:?} (avg of {} iterations)",
        decode_time, ITERS
    );
    println!(
        "  Throughput: {:.2} MB/s",
        (encoded.len() as f64 / 1_000_000.0) / decode_time.as_secs_f64()
    );
    assert_eq!(decoded.size(), doc.size());

    // Inspect
    let inspect_start = Instant::now();
    let text = decoded.inspect();
    let inspect_time = inspect_start.elapsed();
    println!("\nInspect: {} chars in {:?}", text.len(), inspect_time);
    assert!(decoded == doc, "Decoded stream should inspect identically");

    // Scan the first transfer back out
    let scanned = decoded.scan("...DL[IIZ]").expect("Failed to scan");
    println!("\n=== First Transfer ===");
    for item in &scanned {
        println!("  {:?}", item);
    }

    println!("\n=== Summary ===");
    println!("Values: {}", transfers + 3);
    println!("Nodes: {}", doc.size());
    println!(
        "Encoded: {} bytes ({:.1} bytes/transfer)",
        encoded.len(),
        encoded.len() as f64 / (transfers.max(1)) as f64
    );
}
