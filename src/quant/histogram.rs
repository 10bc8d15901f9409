//! Histogram bins and the PNN merge primitives: nearest-neighbor search and
//! weighted-average merging. Bins are arena-indexed (`fw`/`bk`) rather than
//! linked via owning references, per the doubly-linked-bins design note.

/// One histogram bucket. Before step 3 of `quant::quantize`, `cnt` holds a
/// raw pixel count; after, channel fields hold per-bin means rather than
/// sums, and `cnt` may hold a square-rooted weight.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bin {
    pub rc: f64,
    pub gc: f64,
    pub bc: f64,
    pub ac: f64,
    pub cnt: f64,
    pub fw: usize,
    pub bk: usize,
    pub nn: usize,
    pub err: f64,
    pub tm: i64,
    pub mtm: i64,
}

impl Default for Bin {
    fn default() -> Self {
        Bin {
            rc: 0.0,
            gc: 0.0,
            bc: 0.0,
            ac: 0.0,
            cnt: 0.0,
            fw: 0,
            bk: 0,
            nn: 0,
            err: f64::INFINITY,
            tm: 0,
            mtm: 0,
        }
    }
}

/// Builds the dense histogram for `rgba` under `format`, returning bins in
/// `1..=maxbins` (index 0 is reserved as the linked list's sentinel head).
pub(crate) fn build_histogram(
    rgba: &[u8],
    format: crate::color::PixelFormat,
) -> Vec<Bin> {
    let mut cells: Vec<Bin> = vec![Bin::default(); format.key_space()];
    let has_alpha = format.has_alpha();

    for px in crate::color::as_pixels(rgba) {
        let (r, g, b, a) = (px.r, px.g, px.b, px.a);
        let key = format.pack(r, g, b, a) as usize;
        let cell = &mut cells[key];
        cell.rc += r as f64;
        cell.gc += g as f64;
        cell.bc += b as f64;
        if has_alpha {
            cell.ac += a as f64;
        }
        cell.cnt += 1.0;
    }

    let mut bins = vec![Bin::default()];
    for cell in cells {
        if cell.cnt > 0.0 {
            let mut mean = cell;
            mean.rc /= mean.cnt;
            mean.gc /= mean.cnt;
            mean.bc /= mean.cnt;
            if has_alpha {
                mean.ac /= mean.cnt;
            } else {
                mean.ac = 255.0;
            }
            bins.push(mean);
        }
    }
    bins
}

/// Links bins `1..=maxbins` into a doubly-linked list in index order; index
/// 0 is the sentinel head/tail.
pub(crate) fn link_bins(bins: &mut [Bin]) {
    let maxbins = bins.len() - 1;
    bins[0].fw = if maxbins >= 1 { 1 } else { 0 };
    bins[0].bk = maxbins;
    for i in 1..=maxbins {
        bins[i].fw = if i < maxbins { i + 1 } else { 0 };
        bins[i].bk = i - 1;
    }
}

/// Squared merge error between bins `i` and `j`, weighted by cluster sizes.
pub(crate) fn merge_err(bins: &[Bin], i: usize, j: usize, has_alpha: bool) -> f64 {
    let (bi, bj) = (&bins[i], &bins[j]);
    let dr = bi.rc - bj.rc;
    let dg = bi.gc - bj.gc;
    let db = bi.bc - bj.bc;
    let mut sum = dr * dr + dg * dg + db * db;
    if has_alpha {
        let da = bi.ac - bj.ac;
        sum += da * da;
    }
    let n1 = bi.cnt;
    let n2 = bj.cnt;
    n1 * n2 / (n1 + n2) * sum
}

/// Finds the forward neighbor of `i` minimizing `merge_err`, writing the
/// result into `bins[i].nn`/`bins[i].err`. Only scans bins reachable via
/// `fw` starting at `bins[i].fw` (forward-only, per the spec's Design
/// Notes — reproduced verbatim rather than widened to a full pairwise
/// scan).
pub(crate) fn find_nn(bins: &mut [Bin], i: usize, has_alpha: bool) {
    let mut best_j = 0usize;
    let mut best_err = f64::INFINITY;

    let mut j = bins[i].fw;
    while j != 0 {
        let (bi, bj) = (&bins[i], &bins[j]);
        let dr = bi.rc - bj.rc;
        let dg = bi.gc - bj.gc;
        let db = bi.bc - bj.bc;
        let n1 = bi.cnt;
        let n2 = bj.cnt;
        let scale = n1 * n2 / (n1 + n2);

        let mut partial = dr * dr;
        let mut over = partial * scale > best_err;
        if !over {
            partial += dg * dg;
            over = partial * scale > best_err;
        }
        if !over {
            partial += db * db;
            over = partial * scale > best_err;
        }
        if !over && has_alpha {
            let da = bi.ac - bj.ac;
            partial += da * da;
            over = partial * scale > best_err;
        }

        if !over {
            let err = partial * scale;
            if err < best_err {
                best_err = err;
                best_j = j;
            }
        }

        j = bins[j].fw;
    }

    bins[i].nn = best_j;
    bins[i].err = best_err;
}

/// Unlinks bin `nb` from the doubly-linked list.
pub(crate) fn unlink(bins: &mut [Bin], nb: usize) {
    let bk = bins[nb].bk;
    let fw = bins[nb].fw;
    bins[bk].fw = fw;
    bins[fw].bk = bk;
}
