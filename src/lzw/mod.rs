//! Hand-rolled variable-width LZW encoder, GIF-flavored: LSB-first bit
//! packing, 9..12 bit code width, clear-code dictionary resets, and
//! length-prefixed sub-blocking.

use bitvec::prelude::*;
use thiserror::Error;

/// Errors internal to the LZW encoder. These model invariant violations
/// that should be unreachable given a correctly sized dictionary; they
/// exist so a bug surfaces as an error rather than an infinite loop or
/// silently corrupt output.
#[derive(Debug, Error)]
pub enum LzwError {
    #[error("hash table probe did not terminate within {0} slots")]
    HashTableFull(usize),
}

const HSIZE: usize = 5003;
const MAX_CODE_BITS: u32 = 12;
const MAX_DICT_SIZE: u32 = 1 << MAX_CODE_BITS;
const SUBBLOCK_FLUSH_LEN: usize = 254;

/// Reusable LZW encoder state. The hash/code tables are scratch buffers
/// meant to be reused across frames (cleared at the start of each
/// [`LzwEncoder::encode_frame`] call) to avoid per-frame reallocation.
pub(crate) struct LzwEncoder {
    htab: Vec<i64>,
    codetab: Vec<u32>,
}

impl LzwEncoder {
    pub(crate) fn new() -> Self {
        LzwEncoder {
            htab: vec![-1; HSIZE],
            codetab: vec![0; HSIZE],
        }
    }

    fn reset_tables(&mut self) {
        self.htab.iter_mut().for_each(|slot| *slot = -1);
    }

    /// Finds (or inserts) the dictionary entry for `(prefix, suffix)`.
    /// Returns `Some(code)` if the pair was already present, `None` if a
    /// fresh slot was claimed for it (the caller is responsible for
    /// deciding whether a new code may still be assigned).
    fn probe(&mut self, prefix: u32, suffix: u8) -> Result<ProbeResult, LzwError> {
        let fcode: i64 = ((prefix as i64) << 8) | suffix as i64;
        let first_hash = (((suffix as i64) << 12) ^ prefix as i64).rem_euclid(HSIZE as i64) as usize;
        let mut step = ((fcode >> 12) ^ fcode) & (HSIZE as i64 - 1);
        if step == 0 {
            step = 1;
        }

        let mut idx = first_hash;
        for _ in 0..HSIZE {
            if self.htab[idx] == fcode {
                return Ok(ProbeResult::Found(self.codetab[idx]));
            }
            if self.htab[idx] == -1 {
                return Ok(ProbeResult::Empty(idx, fcode));
            }
            idx = (idx as i64 - (HSIZE as i64 - step)).rem_euclid(HSIZE as i64) as usize;
        }

        Err(LzwError::HashTableFull(HSIZE))
    }

    /// Encodes one frame's index stream into a complete GIF image-data
    /// block: leading `min_code_size` byte, LZW codes packed into
    /// length-prefixed sub-blocks, and the terminating zero-length block.
    pub(crate) fn encode_frame(
        &mut self,
        indices: &[u8],
        color_depth: u8,
    ) -> Result<Vec<u8>, LzwError> {
        let min_code_size = color_depth.max(2);
        let init_bits = min_code_size as u32 + 1;
        let clear_code = 1u32 << (init_bits - 1);
        let eoi_code = clear_code + 1;

        self.reset_tables();
        let mut next_code = eoi_code + 1;
        let mut code_width = init_bits;

        let mut bits: BitVec<u8, Lsb0> = BitVec::new();
        push_code(&mut bits, clear_code, code_width);

        if let Some((&first, rest)) = indices.split_first() {
            let mut ent = first as u32;

            for &c in rest {
                match self.probe(ent, c)? {
                    ProbeResult::Found(code) => {
                        ent = code;
                    }
                    ProbeResult::Empty(idx, fcode) => {
                        push_code(&mut bits, ent, code_width);

                        if next_code < MAX_DICT_SIZE {
                            self.htab[idx] = fcode;
                            self.codetab[idx] = next_code;
                            next_code += 1;
                            if next_code > (1 << code_width) && code_width < MAX_CODE_BITS {
                                code_width += 1;
                            }
                        } else {
                            push_code(&mut bits, clear_code, code_width);
                            self.reset_tables();
                            next_code = eoi_code + 1;
                            code_width = init_bits;
                        }
                        ent = c as u32;
                    }
                }
            }

            push_code(&mut bits, ent, code_width);
        }

        push_code(&mut bits, eoi_code, code_width);

        let code_bytes = bits.into_vec();
        let mut out = Vec::with_capacity(code_bytes.len() + code_bytes.len() / SUBBLOCK_FLUSH_LEN + 2);
        out.push(min_code_size);
        for chunk in code_bytes.chunks(SUBBLOCK_FLUSH_LEN) {
            out.push(chunk.len() as u8);
            out.extend_from_slice(chunk);
        }
        out.push(0);

        log::trace!(
            "lzw: encoded {} pixels, final code width {}",
            indices.len(),
            code_width
        );

        Ok(out)
    }
}

enum ProbeResult {
    Found(u32),
    Empty(usize, i64),
}

fn push_code(bits: &mut BitVec<u8, Lsb0>, code: u32, width: u32) {
    for shift in 0..width {
        bits.push((code >> shift) & 1 != 0);
    }
}
