//! Pairwise Nearest Neighbor (PNN) color quantization: reduces an RGBA
//! pixel buffer to a palette of at most `max_colors` entries.

mod heap;
mod histogram;

use crate::color::{Palette, PixelFormat};
use crate::error::{GifError, Result};
use heap::Heap;
use histogram::Bin;

/// Tunables for [`quantize`]. Construct with [`Default::default`] and
/// chain `with_*` setters.
#[derive(Debug, Clone)]
pub struct QuantizeOptions {
    pub format: PixelFormat,
    /// Weight bin counts by their square root before clustering, biasing
    /// merges away from highly-populated bins. May be auto-disabled; see
    /// [`QuantizeOptions::default`].
    pub use_sqrt: bool,
    /// When `Some(threshold)`, alpha is snapped to 0 (below threshold) or
    /// 255 (at or above) on emit. `None` leaves alpha as the rounded
    /// cluster mean. Only meaningful when `format == Rgba4444`.
    pub one_bit_alpha: Option<u8>,
    /// When true, palette entries whose emitted alpha is `<=
    /// clear_alpha_threshold` have their RGB replaced by
    /// `clear_alpha_color` and alpha forced to 0.
    pub clear_alpha: bool,
    pub clear_alpha_threshold: u8,
    pub clear_alpha_color: [u8; 3],
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        QuantizeOptions {
            format: PixelFormat::Rgba4444,
            use_sqrt: true,
            one_bit_alpha: None,
            clear_alpha: false,
            clear_alpha_threshold: 0,
            clear_alpha_color: [0, 0, 0],
        }
    }
}

impl QuantizeOptions {
    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_use_sqrt(mut self, use_sqrt: bool) -> Self {
        self.use_sqrt = use_sqrt;
        self
    }

    pub fn with_one_bit_alpha(mut self, threshold: Option<u8>) -> Self {
        self.one_bit_alpha = threshold;
        self
    }

    pub fn with_clear_alpha(mut self, clear_alpha: bool) -> Self {
        self.clear_alpha = clear_alpha;
        self
    }

    pub fn with_clear_alpha_threshold(mut self, threshold: u8) -> Self {
        self.clear_alpha_threshold = threshold;
        self
    }

    pub fn with_clear_alpha_color(mut self, color: [u8; 3]) -> Self {
        self.clear_alpha_color = color;
        self
    }
}

fn clamp_round(x: f64) -> u8 {
    x.round().clamp(0.0, 255.0) as u8
}

/// Reduces `rgba` (row-major RGBA bytes) to a palette of at most
/// `max_colors` entries via pairwise-nearest-neighbor agglomerative
/// clustering over the pixel histogram.
pub fn quantize(rgba: &[u8], max_colors: usize, opts: &QuantizeOptions) -> Result<Palette> {
    if rgba.len() % 4 != 0 {
        return Err(GifError::InvalidInput(
            "RGBA buffer length must be a multiple of 4".into(),
        ));
    }

    let has_alpha = opts.format.has_alpha();
    let mut bins = histogram::build_histogram(rgba, opts.format);
    let maxbins = bins.len() - 1;
    log::debug!("quantize: histogram built, {maxbins} nonempty bins");

    if maxbins == 0 {
        return Ok(empty_palette(has_alpha));
    }

    let mut use_sqrt = opts.use_sqrt;
    if use_sqrt && (max_colors.pow(2) as f64 / maxbins as f64) < 0.022 {
        use_sqrt = false;
        log::debug!("quantize: auto-disabling use_sqrt (max_colors^2/maxbins below threshold)");
    }
    if use_sqrt {
        for bin in bins.iter_mut().skip(1) {
            bin.cnt = bin.cnt.sqrt();
        }
    }

    histogram::link_bins(&mut bins);

    let bincount = maxbins as i64;
    let merges_needed = maxbins.saturating_sub(max_colors);

    if merges_needed > 0 {
        let mut heap = Heap::with_capacity(maxbins);
        for i in 1..=maxbins {
            histogram::find_nn(&mut bins, i, has_alpha);
            heap.push(&bins, i);
        }

        let mut i: i64 = 0;
        for _ in 0..merges_needed {
            let b1 = loop {
                let candidate = heap.peek().ok_or_else(|| {
                    GifError::Internal("PNN merge heap emptied before quota reached".into())
                })?;
                let current = bins[candidate].tm >= bins[candidate].mtm
                    && bins[bins[candidate].nn].mtm <= bins[candidate].tm;
                if current {
                    break candidate;
                }
                if bins[candidate].mtm == bincount - 1 {
                    heap.pop_replace_with_last(&bins);
                    continue;
                }
                histogram::find_nn(&mut bins, candidate, has_alpha);
                bins[candidate].tm = i;
                heap.sift_down_root(&bins);
            };

            let nb = bins[b1].nn;
            let n1 = bins[b1].cnt;
            let n2 = bins[nb].cnt;
            let d = 1.0 / (n1 + n2);
            bins[b1].rc = d * (n1 * bins[b1].rc + n2 * bins[nb].rc);
            bins[b1].gc = d * (n1 * bins[b1].gc + n2 * bins[nb].gc);
            bins[b1].bc = d * (n1 * bins[b1].bc + n2 * bins[nb].bc);
            if has_alpha {
                bins[b1].ac = d * (n1 * bins[b1].ac + n2 * bins[nb].ac);
            }
            bins[b1].cnt += bins[nb].cnt;

            i += 1;
            bins[b1].mtm = i;
            histogram::unlink(&mut bins, nb);
            bins[nb].mtm = bincount - 1;
        }
        log::debug!("quantize: performed {merges_needed} merges");
    }

    Ok(emit_palette(&bins, has_alpha, opts))
}

fn empty_palette(has_alpha: bool) -> Palette {
    if has_alpha {
        Palette::Rgba(Vec::new())
    } else {
        Palette::Rgb(Vec::new())
    }
}

fn emit_palette(bins: &[Bin], has_alpha: bool, opts: &QuantizeOptions) -> Palette {
    let mut rgb_out: Vec<[u8; 3]> = Vec::new();
    let mut rgba_out: Vec<[u8; 4]> = Vec::new();

    let mut j = bins[0].fw;
    while j != 0 {
        let bin = &bins[j];
        let r = clamp_round(bin.rc);
        let g = clamp_round(bin.gc);
        let b = clamp_round(bin.bc);

        if has_alpha {
            let mut a = clamp_round(bin.ac);
            if let Some(threshold) = opts.one_bit_alpha {
                a = if a < threshold { 0 } else { 255 };
            }
            let mut rgb = [r, g, b];
            if opts.clear_alpha && a <= opts.clear_alpha_threshold {
                rgb = opts.clear_alpha_color;
                a = 0;
            }
            let entry = [rgb[0], rgb[1], rgb[2], a];
            if !rgba_out.contains(&entry) {
                rgba_out.push(entry);
            }
        } else {
            let entry = [r, g, b];
            if !rgb_out.contains(&entry) {
                rgb_out.push(entry);
            }
        }

        j = bins[j].fw;
    }

    if has_alpha {
        Palette::Rgba(rgba_out)
    } else {
        Palette::Rgb(rgb_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(r: u8, g: u8, b: u8, a: u8, n: usize) -> Vec<u8> {
        let mut v = Vec::with_capacity(n * 4);
        for _ in 0..n {
            v.extend_from_slice(&[r, g, b, a]);
        }
        v
    }

    #[test]
    fn uniform_color_collapses_to_one_entry() {
        let rgba = solid(10, 20, 30, 255, 4);
        let opts = QuantizeOptions::default().with_format(PixelFormat::Rgb444);
        let palette = quantize(&rgba, 2, &opts).unwrap();
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn palette_never_exceeds_max_colors() {
        let mut rgba = Vec::new();
        for i in 0..64u8 {
            rgba.extend_from_slice(&[i, i.wrapping_mul(3), i.wrapping_mul(7), 255]);
        }
        let opts = QuantizeOptions::default().with_format(PixelFormat::Rgb565);
        let palette = quantize(&rgba, 8, &opts).unwrap();
        assert!(palette.len() <= 8);
    }

    #[test]
    fn max_colors_above_maxbins_is_not_an_error() {
        let rgba = solid(1, 2, 3, 255, 1);
        let opts = QuantizeOptions::default().with_format(PixelFormat::Rgb444);
        let palette = quantize(&rgba, 256, &opts).unwrap();
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn rejects_truncated_pixel_buffer() {
        let opts = QuantizeOptions::default();
        let err = quantize(&[1, 2, 3], 2, &opts).unwrap_err();
        matches!(err, GifError::InvalidInput(_));
    }

    #[test]
    fn one_bit_alpha_snaps_to_extremes() {
        let mut rgba = solid(200, 100, 50, 100, 1);
        rgba.extend(solid(200, 100, 50, 200, 1));
        let opts = QuantizeOptions::default()
            .with_format(PixelFormat::Rgba4444)
            .with_one_bit_alpha(Some(127));
        let palette = quantize(&rgba, 256, &opts).unwrap();
        let alphas: Vec<u8> = (0..palette.len())
            .map(|i| palette.get(i).unwrap()[3])
            .collect();
        assert!(alphas.contains(&0));
        assert!(alphas.contains(&255));
    }

    #[test]
    fn clear_alpha_replaces_low_alpha_colors() {
        let rgba = solid(200, 100, 50, 0, 4);
        let opts = QuantizeOptions::default()
            .with_format(PixelFormat::Rgba4444)
            .with_clear_alpha(true)
            .with_clear_alpha_threshold(0)
            .with_clear_alpha_color([0, 0, 0]);
        let palette = quantize(&rgba, 256, &opts).unwrap();
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.get(0).unwrap(), [0, 0, 0, 0]);
    }
}
