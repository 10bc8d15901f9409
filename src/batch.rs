//! Optional batch helper parallelizing palette application across many
//! already-quantized frames. Never touches the PNN merge loop or the LZW
//! encoder — both remain strictly sequential (see module docs on
//! `GifEncoder`), so `quantize`'s non-goal of parallel clustering holds
//! regardless of whether this helper is used.

use crate::color::{Palette, PixelFormat};
use crate::error::Result;
use crate::palette::apply_palette;

/// Frame count above which [`encode_frames_parallel_indexed`] switches
/// from a sequential `apply_palette` loop to a `rayon` `par_iter`.
const PARALLEL_THRESHOLD: usize = 4;

/// Applies `palette` to every frame in `rgba_frames`, returning one index
/// buffer per frame in the same order. Frame batches larger than
/// [`PARALLEL_THRESHOLD`] are processed with `rayon`; smaller batches run
/// sequentially, matching the teacher's `if pages.len() > N` parallelism
/// gate.
#[cfg(feature = "rayon")]
pub fn encode_frames_parallel_indexed(
    rgba_frames: &[Vec<u8>],
    palette: &Palette,
    format: PixelFormat,
) -> Result<Vec<Vec<u8>>> {
    if rgba_frames.len() > PARALLEL_THRESHOLD {
        use rayon::prelude::*;
        rgba_frames
            .par_iter()
            .map(|frame| apply_palette(frame, palette, format))
            .collect()
    } else {
        rgba_frames
            .iter()
            .map(|frame| apply_palette(frame, palette, format))
            .collect()
    }
}

#[cfg(all(test, feature = "rayon"))]
mod tests {
    use super::*;

    #[test]
    fn parallel_and_sequential_paths_agree() {
        let palette = Palette::Rgb(vec![[0, 0, 0], [255, 255, 255]]);
        let frame = vec![0u8, 0, 0, 255, 255, 255, 255, 255];
        let frames: Vec<Vec<u8>> = (0..10).map(|_| frame.clone()).collect();
        let result = encode_frames_parallel_indexed(&frames, &palette, PixelFormat::Rgb444).unwrap();
        assert_eq!(result.len(), 10);
        for indices in result {
            assert_eq!(indices, vec![0, 1]);
        }
    }
}
