//! Write an 800x600 grayscale gradient to `example-gray.jpg`.
//!
//! Bytes are streamed to the file through a closure, one at a time.
//!
//! Run with: cargo run --example example_gray --release

use baseline_jpeg::write_jpeg;
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filename = "example-gray.jpg";
    let width = 800u32;
    let height = 600u32;

    // Average of a horizontal and a vertical fade
    let mut image = vec![0u8; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let red = 255 * x / width;
            let green = 255 * y / height;
            image[(y * width + x) as usize] = ((red + green) / 2) as u8;
        }
    }

    let mut file = BufWriter::new(File::create(filename)?);
    let mut io_error = None;
    let mut output = |byte: u8| {
        if io_error.is_none() {
            if let Err(e) = file.write_all(&[byte]) {
                io_error = Some(e);
            }
        }
    };

    let ok = write_jpeg(
        &mut output,
        &image,
        width,
        height,
        false,
        90,
        false,
        Some("baseline-jpeg example image"),
    );

    if let Some(e) = io_error {
        return Err(e.into());
    }
    file.flush()?;

    if !ok {
        eprintln!("encoding failed");
        std::process::exit(1);
    }
    println!("Wrote {}", filename);
    Ok(())
}
