//! End-to-end tests decoding produced GIF bytes with an independent
//! decoder (the `image` crate) rather than trusting our own encoder's
//! assumptions about itself.

use std::io::Write;

use chromagif::{apply_palette, quantize, FrameOptions, GifEncoder, PixelFormat, QuantizeOptions};
use image::AnimationDecoder;

fn encode_uniform_frame(width: u16, height: u16, color: [u8; 4]) -> Vec<u8> {
    let rgba: Vec<u8> = color
        .iter()
        .copied()
        .cycle()
        .take(width as usize * height as usize * 4)
        .collect();
    let opts = QuantizeOptions::default().with_format(PixelFormat::Rgb444);
    let palette = quantize(&rgba, 2, &opts).unwrap();
    let indices = apply_palette(&rgba, &palette, PixelFormat::Rgb444).unwrap();

    let mut gif = GifEncoder::new();
    gif.write_frame(
        width,
        height,
        &indices,
        &FrameOptions::default().with_palette(palette),
    )
    .unwrap();
    gif.finish().unwrap();
    gif.bytes()
}

#[test]
fn single_uniform_frame_decodes_to_expected_dimensions() {
    let bytes = encode_uniform_frame(2, 2, [10, 20, 30, 255]);

    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(&bytes)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 1);
    let frame = frames[0].buffer();
    assert_eq!(frame.width(), 2);
    assert_eq!(frame.height(), 2);
    for px in frame.pixels() {
        assert_eq!([px[0], px[1], px[2]], [10, 20, 30]);
    }
}

#[test]
fn checkerboard_frame_round_trips_through_an_independent_decoder() {
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
    let indices = apply_palette(&rgba, &palette, PixelFormat::Rgb565).unwrap();

    let mut gif = GifEncoder::new();
    gif.write_frame(4, 4, &indices, &FrameOptions::default().with_palette(palette))
        .unwrap();
    gif.finish().unwrap();
    let bytes = gif.bytes();

    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(&bytes)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    let frame = frames[0].buffer();
    for (i, px) in frame.pixels().enumerate() {
        let row = i / 4;
        let col = i % 4;
        let expected = if (row + col) % 2 == 0 { 0 } else { 255 };
        assert_eq!([px[0], px[1], px[2]], [expected, expected, expected]);
    }
}

#[test]
fn encoded_bytes_survive_an_on_disk_round_trip() {
    let bytes = encode_uniform_frame(3, 3, [1, 2, 3, 255]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.gif");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(&bytes)
        .unwrap();

    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(on_disk, bytes);

    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(&on_disk)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 1);
}

#[test]
fn two_frame_looping_animation_decodes_both_frames() {
    let palette = quantize(
        &[0, 0, 0, 255, 255, 255, 255, 255, 255, 255, 255, 255, 0, 0, 0, 255],
        256,
        &QuantizeOptions::default().with_format(PixelFormat::Rgb444),
    )
    .unwrap();

    let frame_a = apply_palette(
        &[0, 0, 0, 255, 255, 255, 255, 255, 255, 255, 255, 255, 0, 0, 0, 255],
        &palette,
        PixelFormat::Rgb444,
    )
    .unwrap();
    let frame_b: Vec<u8> = frame_a.iter().map(|&i| 1 - i).collect();

    let mut gif = GifEncoder::new();
    gif.write_frame(
        2,
        2,
        &frame_a,
        &FrameOptions::default().with_palette(palette).with_repeat(0),
    )
    .unwrap();
    gif.write_frame(2, 2, &frame_b, &FrameOptions::default())
        .unwrap();
    gif.finish().unwrap();
    let bytes = gif.bytes();

    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(&bytes)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 2);
}
