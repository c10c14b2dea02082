//! Point-wise layer mode compositing
//!
//! `in` is the composite of the layers below, `lay` is the layer being
//! applied. Both are premultiplied. Each mode is a per-channel formula over
//! `(inC, inA, layC, layA)`; alpha is always the Porter-Duff union
//! `layA + inA - layA * inA`.
//!
//! The formulas are evaluated exactly as written, including divisions that
//! can produce inf/NaN for zero color or alpha. Terms that mix in a `0.5`
//! constant or a square root are widened to `f64` before narrowing on store.

use super::{BlendMode, Pixel};

/// Interleaved channels per sample
pub const CHANNELS: usize = 4;

const ALPHA: usize = 3;

pub(super) type ChannelOp = fn(f32, f32, f32, f32) -> f32;

/// Comparison-based `MIN`, so NaN operands select `b`
#[inline]
fn min(a: f32, b: f32) -> f32 {
    if a < b {
        a
    } else {
        b
    }
}

#[inline]
fn max(a: f32, b: f32) -> f32 {
    if a > b {
        a
    } else {
        b
    }
}

/// The parts of each operand outside the other's coverage
#[inline]
fn tails(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    lay_c * (1.0 - in_a) + in_c * (1.0 - lay_a)
}

/// `value + layC·(1−inA) + inC·(1−layA)`, summed left to right
#[inline]
fn with_tails(value: f32, in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    value + lay_c * (1.0 - in_a) + in_c * (1.0 - lay_a)
}

// Porter-Duff A over B
fn normal(in_c: f32, _in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    lay_c + in_c * (1.0 - lay_a)
}

// Porter-Duff B over A
fn behind(in_c: f32, in_a: f32, lay_c: f32, _lay_a: f32) -> f32 {
    in_c + lay_c * (1.0 - in_a)
}

fn multiply(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    with_tails(lay_c * in_c, in_c, in_a, lay_c, lay_a)
}

fn screen(in_c: f32, _in_a: f32, lay_c: f32, _lay_a: f32) -> f32 {
    lay_c + in_c - lay_c * in_c
}

fn difference(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    in_c + lay_c - 2.0 * min(lay_c * in_a, in_c * lay_a)
}

fn darken_only(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    with_tails(min(lay_c * in_a, in_c * lay_a), in_c, in_a, lay_c, lay_a)
}

fn lighten_only(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    with_tails(max(lay_c * in_a, in_c * lay_a), in_c, in_a, lay_c, lay_a)
}

fn overlay(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    if 2.0 * in_c < in_a {
        with_tails(2.0 * lay_c * in_c, in_c, in_a, lay_c, lay_a)
    } else {
        with_tails(
            lay_a * in_a - 2.0 * (in_a - in_c) * (lay_a - lay_c),
            in_c,
            in_a,
            lay_c,
            lay_a,
        )
    }
}

fn dodge(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    if lay_c * in_a + in_c * lay_a >= lay_a * in_a {
        with_tails(lay_a * in_a, in_c, in_a, lay_c, lay_a)
    } else {
        with_tails(
            in_c * lay_a / (1.0 - lay_c / lay_a),
            in_c,
            in_a,
            lay_c,
            lay_a,
        )
    }
}

fn burn(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    if lay_c * in_a + in_c * lay_a <= lay_a * in_a {
        tails(in_c, in_a, lay_c, lay_a)
    } else {
        with_tails(
            lay_a * (lay_c * in_a + in_c * lay_a - lay_a * in_a) / lay_c,
            in_c,
            in_a,
            lay_c,
            lay_a,
        )
    }
}

fn hard_light(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    if 2.0 * lay_c < lay_a {
        with_tails(2.0 * lay_c * in_c, in_c, in_a, lay_c, lay_a)
    } else {
        with_tails(
            lay_a * in_a - 2.0 * (in_a - in_c) * (lay_a - lay_c),
            in_c,
            in_a,
            lay_c,
            lay_a,
        )
    }
}

fn soft_light(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    if 2.0 * lay_c < lay_a {
        with_tails(
            in_c * (lay_a - (1.0 - in_c / in_a) * (2.0 * lay_c - lay_a)),
            in_c,
            in_a,
            lay_c,
            lay_a,
        )
    } else if 8.0 * in_c <= in_a {
        with_tails(
            in_c * (lay_a
                - (1.0 - in_c / in_a) * (2.0 * lay_c - lay_a) * (3.0 - 8.0 * in_c / in_a)),
            in_c,
            in_a,
            lay_c,
            lay_a,
        )
    } else {
        let root = f64::from(in_c / in_a).sqrt();
        let value = f64::from(in_c * lay_a)
            + (root * f64::from(in_a) - f64::from(in_c)) * f64::from(2.0 * lay_c - lay_a);
        (value + f64::from(lay_c * (1.0 - in_a)) + f64::from(in_c * (1.0 - lay_a))) as f32
    }
}

// if Dc + Sc >= 1 then 1 else Dc + Sc
fn addition(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    if lay_c * in_a + in_c * lay_a >= lay_a * in_a {
        with_tails(lay_a * in_a, in_c, in_a, lay_c, lay_a)
    } else {
        in_c + lay_c
    }
}

// if Dc - Sc <= 0 then 0 else Dc - Sc
fn subtract(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    if in_c * lay_a - lay_c * in_a <= 0.0 {
        tails(in_c, in_a, lay_c, lay_a)
    } else {
        in_c + lay_c - 2.0 * lay_c * in_a
    }
}

// Dc - Sc + 0.5, clamped to [0, 1]
fn grain_extract(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    let half = 0.5 * f64::from(lay_a) * f64::from(in_a);
    let value = f64::from(in_c * lay_a - lay_c * in_a) + half;

    if value >= f64::from(lay_a * in_a) {
        with_tails(lay_a * in_a, in_c, in_a, lay_c, lay_a)
    } else if value <= 0.0 {
        tails(in_c, in_a, lay_c, lay_a)
    } else {
        (f64::from(in_c + lay_c - 2.0 * lay_c * in_a) + 0.5 * f64::from(in_a) * f64::from(lay_a))
            as f32
    }
}

// Dc + Sc - 0.5, clamped to [0, 1]
fn grain_merge(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    let half = 0.5 * f64::from(lay_a) * f64::from(in_a);
    let value = f64::from(in_c * lay_a + lay_c * in_a) - half;

    if value >= f64::from(lay_a * in_a) {
        with_tails(lay_a * in_a, in_c, in_a, lay_c, lay_a)
    } else if value <= 0.0 {
        tails(in_c, in_a, lay_c, lay_a)
    } else {
        (f64::from(in_c + lay_c) - 0.5 * f64::from(in_a) * f64::from(lay_a)) as f32
    }
}

// if Dc / Sc > 1 then 1 else Dc / Sc
fn divide(in_c: f32, in_a: f32, lay_c: f32, lay_a: f32) -> f32 {
    if in_c / lay_c > in_a / lay_a {
        with_tails(lay_a * in_a, in_c, in_a, lay_c, lay_a)
    } else {
        with_tails(in_c * lay_a * lay_a / lay_c, in_c, in_a, lay_c, lay_a)
    }
}

/// The color formula for `mode`, or `None` when color is left untouched.
pub(super) fn channel_op(mode: BlendMode) -> Option<ChannelOp> {
    use BlendMode::*;
    match mode {
        Normal => Some(normal),
        Behind => Some(behind),
        Multiply => Some(multiply),
        Screen => Some(screen),
        Difference => Some(difference),
        DarkenOnly => Some(darken_only),
        LightenOnly => Some(lighten_only),
        Overlay => Some(overlay),
        Dodge => Some(dodge),
        Burn => Some(burn),
        HardLight => Some(hard_light),
        SoftLight => Some(soft_light),
        Addition => Some(addition),
        Subtract => Some(subtract),
        GrainExtract => Some(grain_extract),
        GrainMerge => Some(grain_merge),
        Divide => Some(divide),
        // TODO: HSV modes need a non-separable formula over all three channels
        Hue | Saturation | Color | Value => None,
        Erase | AntiErase | ColorErase | Replace | Dissolve => None,
    }
}

/// Called once per region, never per pixel.
pub(super) fn warn_if_not_point_wise(mode: BlendMode) {
    #[cfg(debug_assertions)]
    if !mode.is_point_wise() {
        tracing::warn!("{} is not a point operation, color left untouched", mode);
    }
    #[cfg(not(debug_assertions))]
    let _ = mode;
}

/// Composite one sample. Slices must hold at least four channels.
#[inline]
fn composite_sample(op: Option<ChannelOp>, inp: &[f32], lay: &[f32], out: &mut [f32]) {
    let in_a = inp[ALPHA];
    let lay_a = lay[ALPHA];

    if let Some(op) = op {
        for c in 0..ALPHA {
            out[c] = op(inp[c], in_a, lay[c], lay_a);
        }
    }

    out[ALPHA] = lay_a + in_a - lay_a * in_a;
}

/// Composite equal-length pixel runs with a resolved formula
pub(super) fn composite_run(
    op: Option<ChannelOp>,
    composite: &[Pixel],
    layer: &[Pixel],
    out: &mut [Pixel],
) {
    for ((inp, lay), dst) in composite.iter().zip(layer).zip(out.iter_mut()) {
        composite_sample(op, inp, lay, dst);
    }
}

/// Blend a single pixel
pub fn blend_pixel(composite: &Pixel, layer: &Pixel, out: &mut Pixel, mode: BlendMode) {
    composite_sample(channel_op(mode), composite, layer, out);
}

/// Blend `layer` over `composite` into `out`.
///
/// Placeholder modes write only alpha, so `out` keeps whatever color it held.
///
/// # Panics
/// If the three slices differ in length.
pub fn blend_into(composite: &[Pixel], layer: &[Pixel], out: &mut [Pixel], mode: BlendMode) {
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
    composite_run(channel_op(mode), composite, layer, out);
}

/// Blend into a freshly allocated buffer seeded with the backdrop
pub fn blend(composite: &[Pixel], layer: &[Pixel], mode: BlendMode) -> Vec<Pixel> {
    let mut out = composite.to_vec();
    blend_into(composite, layer, &mut out, mode);
    out
}

/// Blend `samples` interleaved RGBA floats from `in_buf` (backdrop) and
/// `aux_buf` (layer) into `out_buf`.
///
/// # Panics
/// If any buffer holds fewer than `samples * 4` floats.
pub fn blend_samples(
    in_buf: &[f32],
    aux_buf: &[f32],
    out_buf: &mut [f32],
    samples: usize,
    mode: BlendMode,
) {
    let len = samples * CHANNELS;
    assert!(
        in_buf.len() >= len && aux_buf.len() >= len && out_buf.len() >= len,
        "buffers too short for {samples} samples"
    );

    warn_if_not_point_wise(mode);
    let op = channel_op(mode);
    for ((inp, lay), out) in in_buf[..len]
        .chunks_exact(CHANNELS)
        .zip(aux_buf[..len].chunks_exact(CHANNELS))
        .zip(out_buf[..len].chunks_exact_mut(CHANNELS))
    {
        composite_sample(op, inp, lay, out);
    }
}
