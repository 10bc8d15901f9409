//! A Rust library encoding animated GIF89a streams from pre-decoded RGBA
//! frames.
//!
//! The three tightly coupled subsystems are: a Pairwise Nearest Neighbor
//! (PNN) color quantizer, a palette applier with a packed-key lookup
//! cache, and a hand-rolled variable-width LZW encoder feeding the GIF
//! container assembler.
//!
//! # Quick Start
//!
//! ```
//! use chromagif::{quantize, apply_palette, GifEncoder, FrameOptions, QuantizeOptions};
//!
//! let rgba = vec![10u8, 20, 30, 255, 10, 20, 30, 255, 10, 20, 30, 255, 10, 20, 30, 255];
//! let palette = quantize(&rgba, 2, &QuantizeOptions::default()).unwrap();
//! let indices = apply_palette(&rgba, &palette, QuantizeOptions::default().format).unwrap();
//!
//! let mut gif = GifEncoder::new();
//! gif.write_frame(2, 2, &indices, &FrameOptions::default().with_palette(palette)).unwrap();
//! gif.finish().unwrap();
//! let bytes = gif.bytes();
//! assert_eq!(&bytes[0..6], b"GIF89a");
//! ```
//!
//! # Features
//!
//! - **PNN quantization**: agglomerative clustering with heap-driven merge
//!   order and square-root count weighting.
//! - **Packed-key indexing**: nearest-palette lookup with a per-format
//!   cache.
//! - **Hand-rolled LZW**: variable-width dictionary coding with GIF
//!   sub-blocking.
//! - **Optional parallelism**: enable the `rayon` feature to apply an
//!   already-computed palette across a frame batch concurrently (see
//!   [`batch`]).
//!
//! Out of scope: image decoding, file I/O, CLI, and multi-frame animation
//! orchestration — callers supply pre-decoded RGBA byte arrays and drive
//! [`GifEncoder`] themselves.

#[cfg(feature = "rayon")]
pub mod batch;
pub mod color;
pub mod error;
pub mod gif;
pub mod lzw;
pub mod palette;
pub mod quant;
pub mod utils;

#[cfg(feature = "rayon")]
pub use batch::encode_frames_parallel_indexed;
pub use color::{Palette, PixelFormat};
pub use error::{GifError, Result};
pub use gif::{FrameOptions, GifEncoder};
pub use palette::apply_palette;
pub use quant::{quantize, QuantizeOptions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_single_uniform_frame() {
        let rgba = vec![10u8, 20, 30, 255].repeat(4);
        let opts = QuantizeOptions::default().with_format(PixelFormat::Rgb444);
        let palette = quantize(&rgba, 2, &opts).unwrap();
        assert_eq!(palette.len(), 1);

        let indices = apply_palette(&rgba, &palette, PixelFormat::Rgb444).unwrap();
        assert_eq!(indices, vec![0, 0, 0, 0]);

        let mut gif = GifEncoder::new();
        gif.write_frame(2, 2, &indices, &FrameOptions::default().with_palette(palette))
            .unwrap();
        gif.finish().unwrap();
        let bytes = gif.bytes();
        assert_eq!(&bytes[0..6], b"GIF89a");
        assert_eq!(*bytes.last().unwrap(), 0x3B);
    }

    #[test]
    fn checkerboard_round_trips_through_quantize_and_index() {
        let mut rgba = Vec::new();
        for row in 0..4u8 {
            for col in 0..4u8 {
                if (row + col) % 2 == 0 {
                    rgba.extend_from_slice(&[0, 0, 0, 255]);
                } else {
                    rgba.extend_from_slice(&[255, 255, 255, 255]);
                }
            }
        }
        let opts = QuantizeOptions::default().with_format(PixelFormat::Rgb565);
        let palette = quantize(&rgba, 256, &opts).unwrap();
        assert_eq!(palette.len(), 2);

        let first = apply_palette(&rgba, &palette, PixelFormat::Rgb565).unwrap();
        let second = apply_palette(&rgba, &palette, PixelFormat::Rgb565).unwrap();
        assert_eq!(first, second);
    }
}
