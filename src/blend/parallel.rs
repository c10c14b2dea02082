//! Region compositing on the rayon pool
//!
//! Each chunk is an independent contiguous run, so splitting never changes
//! the result.

use rayon::prelude::*;

use super::engine::{channel_op, composite_run, warn_if_not_point_wise};
use super::{BlendMode, Pixel};

/// One 64x64 tile
pub const DEFAULT_CHUNK_LEN: usize = 64 * 64;

/// Blend a whole region, splitting it into `chunk_len`-pixel runs.
///
/// # Panics
/// If the slices differ in length or `chunk_len` is zero.
pub fn blend_parallel(
    composite: &[Pixel],
    layer: &[Pixel],
    out: &mut [Pixel],
    mode: BlendMode,
    chunk_len: usize,
) {
    assert!(chunk_len > 0, "chunk length must be positive");
    assert_eq!(
        composite.len(),
        layer.len(),
        "composite and layer buffers must have the same length"
    );
    assert_eq!(
        composite.len(),
        out.len(),
        "output buffer must match the input length"
    );

    warn_if_not_point_wise(mode);
    let op = channel_op(mode);

    tracing::trace!(
        "Blending {} pixels as {} in chunks of {}",
        out.len(),
        mode,
        chunk_len
    );

    out.par_chunks_mut(chunk_len)
        .zip(composite.par_chunks(chunk_len))
        .zip(layer.par_chunks(chunk_len))
        .for_each(|((dst, inp), lay)| composite_run(op, inp, lay, dst));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::blend;

    fn gradient(len: usize, alpha: f32) -> Vec<Pixel> {
        (0..len)
            .map(|i| {
                let t = i as f32 / len as f32;
                [t * alpha, (1.0 - t) * alpha, 0.5 * alpha, alpha]
            })
            .collect()
    }

    #[test]
    fn test_parallel_matches_serial() {
        let composite = gradient(1000, 0.8);
        let layer: Vec<Pixel> = gradient(1000, 0.6).into_iter().rev().collect();

        for mode in BlendMode::ALL.into_iter().filter(|m| m.is_point_wise()) {
            let serial = blend(&composite, &layer, mode);
            let mut parallel = composite.clone();
            blend_parallel(&composite, &layer, &mut parallel, mode, 37);

            let bits = |px: &[Pixel]| -> Vec<u32> {
                px.iter().flatten().map(|v| v.to_bits()).collect()
            };
            assert_eq!(bits(&serial[..]), bits(&parallel[..]), "{mode}");
        }
    }

    #[test]
    fn test_chunk_larger_than_region() {
        let composite = gradient(10, 1.0);
        let layer = gradient(10, 0.5);
        let mut out = vec![[0.0; 4]; 10];

        blend_parallel(&composite, &layer, &mut out, BlendMode::Normal, DEFAULT_CHUNK_LEN);
        assert_eq!(out, blend(&composite, &layer, BlendMode::Normal));
    }

    #[test]
    fn test_empty_region() {
        let mut out: Vec<Pixel> = Vec::new();
        blend_parallel(&[], &[], &mut out, BlendMode::Multiply, 16);
        assert!(out.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_zero_chunk_len_panics() {
        let composite = gradient(4, 1.0);
        let mut out = composite.clone();
        blend_parallel(&composite, &composite, &mut out, BlendMode::Normal, 0);
    }
}
