//! Stateful GIF89a container assembly: header, Logical Screen Descriptor,
//! color tables, Graphic Control Extensions, Image Descriptors, and the
//! NETSCAPE2.0 looping extension, built frame-by-frame around the LZW
//! encoder in [`crate::lzw`].

mod stream;

use crate::color::Palette;
use crate::error::{GifError, Result};
use crate::lzw::LzwEncoder;
use stream::Stream;

/// Per-frame options for [`GifEncoder::write_frame`].
#[derive(Debug, Clone)]
pub struct FrameOptions {
    /// Required on the first frame; optional (local color table) on
    /// later frames.
    pub palette: Option<Palette>,
    /// Forces this call to be treated as the first frame, for manual
    /// mode. Auto mode sets this implicitly on the encoder's first
    /// `write_frame` call.
    pub first: bool,
    pub transparent: bool,
    /// Negative forces non-transparent regardless of `transparent`.
    pub transparent_index: i32,
    /// Frame delay in milliseconds; converted to GIF's 1/100s units.
    pub delay: u32,
    /// `-1` = no NETSCAPE2.0 block, `0` = loop forever, `>0` = N extra
    /// iterations. Only consulted on the first frame.
    pub repeat: i32,
    /// LZW minimum code size input; also informs the Logical Screen
    /// Descriptor's color-resolution field via the color table size.
    pub color_depth: u8,
    /// GIF disposal method (0..7). Negative derives it from
    /// `transparent` (2 if transparent, else 0).
    pub dispose: i32,
}

impl Default for FrameOptions {
    fn default() -> Self {
        FrameOptions {
            palette: None,
            first: false,
            transparent: false,
            transparent_index: 0,
            delay: 0,
            repeat: -1,
            color_depth: 8,
            dispose: -1,
        }
    }
}

impl FrameOptions {
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn with_first(mut self, first: bool) -> Self {
        self.first = first;
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_transparent_index(mut self, index: i32) -> Self {
        self.transparent_index = index;
        self
    }

    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay = delay_ms;
        self
    }

    pub fn with_repeat(mut self, repeat: i32) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_color_depth(mut self, color_depth: u8) -> Self {
        self.color_depth = color_depth;
        self
    }

    pub fn with_dispose(mut self, dispose: i32) -> Self {
        self.dispose = dispose;
        self
    }
}

/// `ceil(log2(len))`, floored at 1 — the number of bits needed to index a
/// color table of `len` entries, per the GIF color-table-size rule.
fn color_table_bits(len: usize) -> u8 {
    let mut bits = 1u8;
    while (1usize << bits) < len {
        bits += 1;
    }
    bits
}

/// Assembles a complete GIF89a byte stream across one or more frames.
/// Owns its output buffer and LZW scratch tables for its whole lifetime so
/// that encoding a batch of frames never reallocates them.
pub struct GifEncoder {
    stream: Stream,
    lzw: LzwEncoder,
    header_written: bool,
    frame_count: u32,
}

impl Default for GifEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl GifEncoder {
    pub fn new() -> Self {
        GifEncoder {
            stream: Stream::new(),
            lzw: LzwEncoder::new(),
            header_written: false,
            frame_count: 0,
        }
    }

    /// Clears the output stream and resets lifecycle state. LZW scratch
    /// buffers are reused, not reallocated.
    pub fn reset(&mut self) {
        self.stream.reset();
        self.header_written = false;
        self.frame_count = 0;
    }

    /// Writes the six-byte `GIF89a` signature. Called automatically by
    /// the first `write_frame` in auto mode; callers in manual mode may
    /// call this themselves beforehand.
    pub fn write_header(&mut self) -> Result<()> {
        self.stream.write_bytes(*b"GIF89a");
        self.header_written = true;
        Ok(())
    }

    /// Encodes one frame: Graphic Control Extension, Image Descriptor,
    /// optional Local Color Table, and LZW-compressed pixel data. On the
    /// encoder's first frame (auto mode) or whenever `opts.first` is set
    /// (manual mode), also writes the header (if not already written),
    /// Logical Screen Descriptor, Global Color Table, and — if
    /// `opts.repeat >= 0` — the NETSCAPE2.0 looping extension.
    pub fn write_frame(
        &mut self,
        width: u16,
        height: u16,
        indices: &[u8],
        opts: &FrameOptions,
    ) -> Result<()> {
        if indices.len() != (width as usize) * (height as usize) {
            return Err(GifError::InvalidInput(
                "index buffer length must equal width * height".into(),
            ));
        }

        if !self.header_written {
            self.write_header()?;
        }

        let is_first = opts.first || self.frame_count == 0;

        if is_first {
            let palette = opts
                .palette
                .as_ref()
                .ok_or(GifError::MissingFirstFramePalette)?;
            self.write_logical_screen_descriptor(width, height, palette, opts.color_depth)?;
            if opts.repeat >= 0 {
                self.write_netscape_loop(opts.repeat as u16);
            }
        }

        self.write_graphic_control_extension(opts);
        self.write_image_descriptor(width, height, is_first, opts)?;

        let lzw_bytes = self.lzw.encode_frame(indices, opts.color_depth)?;
        self.stream.write_bytes(lzw_bytes);

        self.frame_count += 1;
        log::debug!(
            "gif: wrote frame {} ({}x{}, {} indices)",
            self.frame_count,
            width,
            height,
            indices.len()
        );
        Ok(())
    }

    fn write_logical_screen_descriptor(
        &mut self,
        width: u16,
        height: u16,
        palette: &Palette,
        color_depth: u8,
    ) -> Result<()> {
        if palette.len() > 256 {
            return Err(GifError::InvalidInput("palette exceeds 256 entries".into()));
        }
        let table_bits = color_table_bits(palette.len().max(1));
        let packed = (1u8 << 7)
            | ((color_depth.saturating_sub(1) & 0x07) << 4)
            | (table_bits - 1);
        self.stream.write_u16(width);
        self.stream.write_u16(height);
        self.stream.write_byte(packed);
        self.stream.write_byte(0); // background color index
        self.stream.write_byte(0); // pixel aspect ratio
        self.write_color_table(palette, table_bits);
        Ok(())
    }

    fn write_netscape_loop(&mut self, repeat: u16) {
        self.stream.write_byte(0x21);
        self.stream.write_byte(0xFF);
        self.stream.write_byte(0x0B);
        self.stream.write_bytes(*b"NETSCAPE2.0");
        self.stream.write_byte(0x03);
        self.stream.write_byte(0x01);
        self.stream.write_u16(repeat);
        self.stream.write_byte(0x00);
    }

    fn write_graphic_control_extension(&mut self, opts: &FrameOptions) {
        let transparent = opts.transparent && opts.transparent_index >= 0;
        let dispose = if opts.dispose >= 0 {
            (opts.dispose as u8) & 0x07
        } else if transparent {
            2
        } else {
            0
        };
        let packed = (dispose << 2) | (transparent as u8);
        let delay_cs = ((opts.delay as f64) / 10.0).round() as u16;
        let transparent_index = if transparent {
            opts.transparent_index as u8
        } else {
            0
        };

        self.stream.write_byte(0x21);
        self.stream.write_byte(0xF9);
        self.stream.write_byte(0x04);
        self.stream.write_byte(packed);
        self.stream.write_u16(delay_cs);
        self.stream.write_byte(transparent_index);
        self.stream.write_byte(0x00);
    }

    fn write_image_descriptor(
        &mut self,
        width: u16,
        height: u16,
        is_first: bool,
        opts: &FrameOptions,
    ) -> Result<()> {
        self.stream.write_byte(0x2C);
        self.stream.write_u16(0);
        self.stream.write_u16(0);
        self.stream.write_u16(width);
        self.stream.write_u16(height);

        let local_palette = if !is_first { opts.palette.as_ref() } else { None };
        match local_palette {
            Some(palette) => {
                if palette.len() > 256 {
                    return Err(GifError::InvalidInput("palette exceeds 256 entries".into()));
                }
                let table_bits = color_table_bits(palette.len().max(1));
                self.stream.write_byte(0x80 | (table_bits - 1));
                self.write_color_table(palette, table_bits);
            }
            None => self.stream.write_byte(0x00),
        }
        Ok(())
    }

    fn write_color_table(&mut self, palette: &Palette, table_bits: u8) {
        let target_entries = 1usize << table_bits;
        let rgb = palette.rgb_bytes();
        self.stream.write_bytes(rgb);
        for _ in palette.len()..target_entries {
            self.stream.write_bytes([0, 0, 0]);
        }
    }

    /// Writes the `0x3B` trailer byte.
    pub fn finish(&mut self) -> Result<()> {
        self.stream.write_byte(0x3B);
        Ok(())
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.stream.bytes()
    }

    pub fn bytes_view(&self) -> &[u8] {
        self.stream.bytes_view()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.stream.into_inner()
    }
}
