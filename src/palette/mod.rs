//! Maps RGBA pixels to their nearest palette entry, accelerated by a
//! packed-key lookup cache.

use crate::color::{Palette, PixelFormat};
use crate::error::{GifError, Result};

/// Maps each pixel in `rgba` to the index of its nearest color in
/// `palette` under squared Euclidean distance, returning one byte per
/// pixel. `format` selects the packed cache key (and, for `Rgba4444`,
/// folds alpha into both the key and the distance).
pub fn apply_palette(rgba: &[u8], palette: &Palette, format: PixelFormat) -> Result<Vec<u8>> {
    if rgba.len() % 4 != 0 {
        return Err(GifError::InvalidInput(
            "RGBA buffer length must be a multiple of 4".into(),
        ));
    }
    if palette.is_empty() {
        return Err(GifError::InvalidInput(
            "cannot apply an empty palette".into(),
        ));
    }
    if palette.len() > 256 {
        return Err(GifError::InvalidInput(
            "palette exceeds 256 entries".into(),
        ));
    }

    let has_alpha = format.has_alpha();
    let mut cache: Vec<Option<u8>> = vec![None; format.key_space()];
    let mut out = Vec::with_capacity(rgba.len() / 4);

    for px in crate::color::as_pixels(rgba) {
        let (r, g, b, a) = (px.r, px.g, px.b, px.a);
        let key = format.pack(r, g, b, a) as usize;
        let idx = match cache[key] {
            Some(idx) => idx,
            None => {
                let idx = nearest_index(palette, r, g, b, a, has_alpha);
                cache[key] = Some(idx);
                idx
            }
        };
        out.push(idx);
    }

    Ok(out)
}

/// Linear nearest-neighbor scan with per-channel early exit. For
/// `Rgba4444` the scan starts from the alpha term (the tightest channel in
/// practice) before accumulating r/g/b; ties resolve to the earlier index.
fn nearest_index(palette: &Palette, r: u8, g: u8, b: u8, a: u8, has_alpha: bool) -> u8 {
    let mut best_idx: u8 = 0;
    let mut best_dist: u32 = u32::MAX;

    for i in 0..palette.len() {
        let entry = palette.get(i).unwrap();
        let (pr, pg, pb, pa) = (entry[0], entry[1], entry[2], entry[3]);

        let mut dist: u32 = 0;
        let mut over = false;

        if has_alpha {
            dist += sq_diff(a, pa);
            over = dist >= best_dist;
        }
        if !over {
            dist += sq_diff(r, pr);
            over = dist >= best_dist;
        }
        if !over {
            dist += sq_diff(g, pg);
            over = dist >= best_dist;
        }
        if !over {
            dist += sq_diff(b, pb);
            over = dist >= best_dist;
        }

        if !over && dist < best_dist {
            best_dist = dist;
            best_idx = i as u8;
        }
    }

    best_idx
}

fn sq_diff(a: u8, b: u8) -> u32 {
    let d = a as i32 - b as i32;
    (d * d) as u32
}
