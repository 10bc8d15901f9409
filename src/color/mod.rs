//! Color packing, distance, and palette primitives shared by the quantizer
//! and the palette applier.

mod distance;
mod packing;

use bytemuck::{Pod, Zeroable};

/// A zero-copy view over one RGBA pixel. `rgba` byte buffers are cast to
/// `&[Rgba8]` via `bytemuck::cast_slice` rather than walked in
/// `chunks_exact(4)`, avoiding a bounds check per channel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Casts a row-major RGBA byte buffer to pixel structs. Panics (via
/// `bytemuck`) only if `rgba.len()` is not a multiple of 4; callers
/// validate that themselves before calling this.
pub fn as_pixels(rgba: &[u8]) -> &[Rgba8] {
    bytemuck::cast_slice(rgba)
}

pub use distance::{euclidean_distance_sq, snap_colors_to_palette, yiq_distance_sq};
pub use packing::{rgb444, rgb565, rgba4444};

/// Selects which packed-key function (and therefore which channels
/// participate in histogramming/lookup) a quantize or apply-palette call
/// uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 16-bit key, RGB only, 5/6/5 bits.
    Rgb565,
    /// 12-bit key, RGB only, 4/4/4 bits.
    #[default]
    Rgb444,
    /// 16-bit key, RGBA, 4/4/4/4 bits. The only format that carries alpha
    /// into the histogram/cache key.
    Rgba4444,
}

impl PixelFormat {
    /// Number of distinct values the packed key can take; also the size of
    /// the dense histogram/cache array used for this format.
    pub fn key_space(self) -> usize {
        match self {
            PixelFormat::Rgb565 => 1 << 16,
            PixelFormat::Rgb444 => 1 << 12,
            PixelFormat::Rgba4444 => 1 << 16,
        }
    }

    /// Whether this format's packed key encodes alpha.
    pub fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Rgba4444)
    }

    /// Packs one RGBA pixel into this format's key.
    pub fn pack(self, r: u8, g: u8, b: u8, a: u8) -> u32 {
        match self {
            PixelFormat::Rgb565 => rgb565(r, g, b) as u32,
            PixelFormat::Rgb444 => rgb444(r, g, b) as u32,
            PixelFormat::Rgba4444 => rgba4444(r, g, b, a) as u32,
        }
    }
}

/// A quantized color palette. Entries are either all RGB or all RGBA; GIF's
/// color table never carries alpha, so [`Palette::rgb_bytes`] always drops
/// it when present.
#[derive(Debug, Clone, PartialEq)]
pub enum Palette {
    Rgb(Vec<[u8; 3]>),
    Rgba(Vec<[u8; 4]>),
}

impl Palette {
    pub fn len(&self) -> usize {
        match self {
            Palette::Rgb(v) => v.len(),
            Palette::Rgba(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Palette::Rgba(_))
    }

    /// Channel values of entry `i`, alpha defaulting to 255 for RGB palettes.
    pub fn get(&self, i: usize) -> Option<[u8; 4]> {
        match self {
            Palette::Rgb(v) => v.get(i).map(|c| [c[0], c[1], c[2], 255]),
            Palette::Rgba(v) => v.get(i).copied(),
        }
    }

    /// Flat `r, g, b` triples suitable for a GIF color table. Alpha, if any,
    /// is dropped.
    pub fn rgb_bytes(&self) -> Vec<u8> {
        match self {
            Palette::Rgb(v) => v.iter().flat_map(|c| c.iter().copied()).collect(),
            Palette::Rgba(v) => v.iter().flat_map(|c| [c[0], c[1], c[2]]).collect(),
        }
    }
}
