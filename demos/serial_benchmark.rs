//! Timing harness for large encodes.
//!
//! Encodes a synthetic 8000x6000 RGB image with and without 4:2:0
//! subsampling, optional PPM photographs loaded through the `image` crate,
//! and an 8000x6000 grayscale image, printing the wall time of each run.
//!
//! Run with: cargo run --example serial_benchmark --release [-- sample.ppm ...]

use baseline_jpeg::{Encoder, Image, IoSink};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

const WIDTH: u32 = 8000;
const HEIGHT: u32 = 6000;
const QUALITY: u8 = 90;
const COMMENT: &str = "baseline-jpeg example image";

/// Encode `image` into `filename` and print the elapsed time.
fn run(
    label: &str,
    encoder: &Encoder,
    image: &Image<'_>,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("# {}", label);
    let mut sink = IoSink::new(BufWriter::new(File::create(filename)?));

    let start = Instant::now();
    encoder.encode(image, &mut sink)?;
    let elapsed = start.elapsed();

    sink.finish()?;
    println!("time: {:.3}s\n", elapsed.as_secs_f64());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let encoder = Encoder::new().quality(QUALITY).comment(COMMENT);
    let subsampled = encoder.clone().downsample(true);

    // Red fades horizontally, green vertically, blue fixed
    let mut rgb = vec![0u8; WIDTH as usize * HEIGHT as usize * 3];
    for (i, px) in rgb.chunks_exact_mut(3).enumerate() {
        let x = i as u32 % WIDTH;
        let y = i as u32 / WIDTH;
        px[0] = (255 * x / WIDTH) as u8;
        px[1] = (255 * y / HEIGHT) as u8;
        px[2] = 127;
    }
    let image = Image::rgb(&rgb, WIDTH, HEIGHT);

    run(
        "8000x6000 RGB, 4:2:0, quality 90",
        &subsampled,
        &image,
        "test1_serial.jpg",
    )?;
    run(
        "8000x6000 RGB, 4:4:4, quality 90",
        &encoder,
        &image,
        "test2_serial.jpg",
    )?;
    drop(rgb);

    for (i, arg) in std::env::args().skip(1).enumerate() {
        let path = Path::new(&arg);
        let photo = match image::open(path) {
            Ok(photo) => photo.into_rgb8(),
            Err(e) => {
                eprintln!("skipping {}: {}\n", path.display(), e);
                continue;
            }
        };
        let (width, height) = photo.dimensions();
        let image = Image::rgb(photo.as_raw(), width, height);
        for (mode, enc) in [("4:2:0", &subsampled), ("4:4:4", &encoder)] {
            run(
                &format!(
                    "{} ({}x{}), {}, quality 90",
                    path.display(),
                    width,
                    height,
                    mode
                ),
                enc,
                &image,
                &format!("ppm{}_{}_serial.jpg", i + 1, mode.replace(':', "")),
            )?;
        }
    }

    let gray: Vec<u8> = (0..WIDTH * HEIGHT)
        .map(|i| {
            let x = i % WIDTH;
            let y = i / WIDTH;
            ((255 * x / WIDTH + 255 * y / HEIGHT) / 2) as u8
        })
        .collect();
    run(
        "8000x6000 grayscale, quality 90",
        &encoder,
        &Image::gray(&gray, WIDTH, HEIGHT),
        "test3_serial.jpg",
    )?;

    Ok(())
}
