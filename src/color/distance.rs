//! Color distance metrics and palette snapping. These are auxiliary
//! utilities; the quantizer's hot path uses its own inlined squared-error
//! arithmetic rather than going through here (see `crate::quant`).

/// Squared Euclidean distance over equal-dimension color vectors. Channels
/// missing from the shorter vector are treated as 0.
pub fn euclidean_distance_sq(a: &[u8], b: &[u8]) -> u32 {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let ac = *a.get(i).unwrap_or(&0) as i32;
            let bc = *b.get(i).unwrap_or(&0) as i32;
            let d = ac - bc;
            (d * d) as u32
        })
        .sum()
}

/// RGB -> YIQ via the standard NTSC matrix.
fn rgb_to_yiq(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let i = 0.596 * r - 0.274 * g - 0.322 * b;
    let q = 0.211 * r - 0.523 * g + 0.312 * b;
    (y, i, q)
}

/// Squared YIQ distance, with an alpha term added on top. Colors shorter
/// than 4 channels default alpha to 255.
pub fn yiq_distance_sq(a: &[u8], b: &[u8]) -> f64 {
    let (ay, ai, aq) = rgb_to_yiq(a[0], a[1], a[2]);
    let (by, bi, bq) = rgb_to_yiq(b[0], b[1], b[2]);
    let aa = *a.get(3).unwrap_or(&255) as f64;
    let ba = *b.get(3).unwrap_or(&255) as f64;
    let dy = ay - by;
    let di = ai - bi;
    let dq = aq - bq;
    let da = aa - ba;
    0.5053 * dy * dy + 0.299 * di * di + 0.1957 * dq * dq + da * da
}

/// For each color in `known`, finds the nearest entry in `palette` by
/// squared Euclidean distance over the first three channels; if
/// `0 < dist² <= threshold²`, overwrites that palette entry with the known
/// color (adjusting alpha presence to match the palette's own dimension).
pub fn snap_colors_to_palette(palette: &mut [Vec<u8>], known: &[Vec<u8>], threshold: u32) {
    let threshold_sq = threshold * threshold;
    for k in known {
        let mut best_idx = None;
        let mut best_dist = u32::MAX;
        for (idx, entry) in palette.iter().enumerate() {
            let dist = euclidean_distance_sq(&entry[..3.min(entry.len())], &k[..3.min(k.len())]);
            if dist < best_dist {
                best_dist = dist;
                best_idx = Some(idx);
            }
        }
        if let Some(idx) = best_idx {
            if best_dist > 0 && best_dist <= threshold_sq {
                let dims = palette[idx].len();
                let mut adjusted = k.clone();
                adjusted.truncate(3);
                if dims > 3 {
                    let alpha = k.get(3).copied().unwrap_or(255);
                    adjusted.push(alpha);
                }
                palette[idx] = adjusted;
            }
        }
    }
}
