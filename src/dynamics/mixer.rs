//! Dynamics mixer - turns one input sample into brush modulation factors
//!
//! Every query builds one factor per axis from the sample coordinates, keeps
//! only the axes enabled for its target and hands them to [`mix`]. Axis
//! formulas differ per target; see the individual queries.

use std::f64::consts::PI;
use std::sync::Arc;

use super::mix::{mix, MixTerms, Term};
use super::options::{DynamicAxis, DynamicTarget, DynamicsOptions};
use super::random::{RandomSource, ThreadRandom};
use crate::core::contracts::{DabDynamics, DynamicsCoords, PaintBase};

/// Weight applied to pressure for the opacity-style targets
pub const PRESSURE_SCALE: f64 = 1.5;
/// Weight applied to velocity for the opacity-style targets
pub const VELOCITY_SCALE: f64 = 1.0;
/// Distance over which the fading axis falls off, in pixels
pub const FADE_LENGTH: f64 = 100.0;
/// Steepness of the fading falloff
pub const FADE_EXPONENT: f64 = 5.541;

/// Mixed size factors below this are replaced by [`SIZE_FLOOR`]
pub const SIZE_FLOOR_THRESHOLD: f64 = 1.0 / 64.0;
pub const SIZE_FLOOR: f64 = 1.0 / 8.0;

/// Gaussian-like falloff over the stroke distance
pub fn fading(pixel_dist: f64) -> f64 {
    let p = pixel_dist / FADE_LENGTH;
    (-p * p * FADE_EXPONENT).exp()
}

/// Direction of the tilt vector in turns, normalized into `[0, 1)`.
///
/// Includes the half-turn correction applied before mixing. A NaN `ytilt`
/// with zero `xtilt` maps to 0.5.
pub fn tilt_angle(xtilt: f64, ytilt: f64) -> f64 {
    let mut tilt = if xtilt == 0.0 {
        if ytilt >= 0.0 {
            0.5
        } else if ytilt < 0.0 {
            0.0
        } else {
            -1.0
        }
    } else {
        let angle = (-ytilt / xtilt).atan() / (2.0 * PI);
        if xtilt > 0.0 {
            angle + 0.5
        } else {
            angle
        }
    };

    tilt += 0.5;

    while tilt >= 1.0 {
        tilt -= 1.0;
    }
    while tilt < 0.0 {
        tilt += 1.0;
    }

    tilt
}

/// Per-context dynamics state: the options plus the random source.
///
/// Queries borrow the mixer immutably so one mixer can serve several
/// stroke threads.
#[derive(Clone)]
pub struct DynamicsMixer {
    context: String,
    options: DynamicsOptions,
    random: Arc<dyn RandomSource>,
}

impl DynamicsMixer {
    /// Mixer with default options and the thread-local generator
    pub fn new(context: impl Into<String>) -> Self {
        Self::with_options(context, DynamicsOptions::default())
    }

    pub fn with_options(context: impl Into<String>, options: DynamicsOptions) -> Self {
        let context = context.into();
        tracing::debug!("Dynamics mixer created for context '{}'", context);

        Self {
            context,
            options,
            random: Arc::new(ThreadRandom),
        }
    }

    /// Replace the source used by the random axis
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn options(&self) -> &DynamicsOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DynamicsOptions {
        &mut self.options
    }

    pub fn set_options(&mut self, options: DynamicsOptions) {
        tracing::debug!("Dynamics options replaced for context '{}'", self.context);
        self.options = options;
    }

    /// Axis term, evaluating `factor` only when `target` is enabled on it
    fn term(&self, axis: DynamicAxis, target: DynamicTarget, factor: impl FnOnce() -> f64) -> Term {
        let axis = self.options.axis(axis);
        (axis.enabled(target).then(factor), axis.prescale)
    }

    /// Formulas shared by opacity, hardness, rate, color and angle
    fn standard_terms(
        &self,
        target: DynamicTarget,
        coords: &DynamicsCoords,
        pixel_dist: f64,
        velocity: fn(f64) -> f64,
    ) -> MixTerms {
        MixTerms {
            pressure: self.term(DynamicAxis::Pressure, target, || {
                PRESSURE_SCALE * coords.pressure
            }),
            velocity: self.term(DynamicAxis::Velocity, target, || {
                VELOCITY_SCALE * velocity(coords.velocity)
            }),
            random: self.term(DynamicAxis::Random, target, || self.random.uniform()),
            tilt: self.term(DynamicAxis::Tilt, target, || 1.0 - coords.tilt_magnitude()),
            direction: self.term(DynamicAxis::Direction, target, || coords.direction + 0.5),
            fading: self.term(DynamicAxis::Fading, target, || fading(pixel_dist)),
        }
    }

    fn standard_query(&self, target: DynamicTarget, coords: &DynamicsCoords, pixel_dist: f64) -> f64 {
        if !self.options.any_enabled(target) {
            return 1.0;
        }
        mix(&self.standard_terms(target, coords, pixel_dist, |v| 1.0 - v))
    }

    pub fn opacity(&self, coords: &DynamicsCoords, pixel_dist: f64) -> f64 {
        self.standard_query(DynamicTarget::Opacity, coords, pixel_dist)
    }

    pub fn hardness(&self, coords: &DynamicsCoords, pixel_dist: f64) -> f64 {
        self.standard_query(DynamicTarget::Hardness, coords, pixel_dist)
    }

    /// Fading alone never switches rate dynamics on, but it is mixed in
    /// once another axis drives rate.
    pub fn rate(&self, coords: &DynamicsCoords, pixel_dist: f64) -> f64 {
        let target = DynamicTarget::Rate;
        let gated = DynamicAxis::ALL
            .iter()
            .filter(|axis| **axis != DynamicAxis::Fading)
            .any(|axis| self.options.enabled(*axis, target));

        if !gated {
            return 1.0;
        }
        mix(&self.standard_terms(target, coords, pixel_dist, |v| 1.0 - v))
    }

    /// Like opacity, but faster strokes raise the factor
    pub fn color(&self, coords: &DynamicsCoords, pixel_dist: f64) -> f64 {
        if !self.options.any_enabled(DynamicTarget::Color) {
            return 1.0;
        }
        mix(&self.standard_terms(DynamicTarget::Color, coords, pixel_dist, |v| v))
    }

    /// Brush scale for one dab.
    ///
    /// Each axis uses its `size` formula when that flag is set, otherwise its
    /// `inverse-size` formula. The mixed value is treated as an area: tiny
    /// values snap to [`SIZE_FLOOR`], the rest are square-rooted.
    pub fn size(
        &self,
        paint: &PaintBase,
        coords: &DynamicsCoords,
        pixel_dist: f64,
        use_dynamics: bool,
    ) -> f64 {
        let mut scale = 1.0;

        if use_dynamics {
            let magnitude = coords.tilt_magnitude();

            let terms = MixTerms {
                pressure: self.size_term(
                    DynamicAxis::Pressure,
                    || coords.pressure,
                    || 1.0 - 0.9 * coords.pressure,
                ),
                velocity: self.size_term(
                    DynamicAxis::Velocity,
                    || 1.0 - coords.velocity.sqrt(),
                    || coords.velocity.sqrt(),
                ),
                random: self.size_term(
                    DynamicAxis::Random,
                    || 1.0 - self.random.uniform(),
                    || self.random.uniform(),
                ),
                tilt: self.size_term(DynamicAxis::Tilt, || 1.0 - magnitude, || magnitude),
                direction: self.term(DynamicAxis::Direction, DynamicTarget::Size, || {
                    coords.direction + 0.5
                }),
                fading: {
                    let axis = &self.options.fading;
                    (
                        (axis.size || axis.inverse_size).then(|| fading(pixel_dist)),
                        axis.prescale,
                    )
                },
            };

            scale = mix(&terms);

            if scale < SIZE_FLOOR_THRESHOLD {
                scale = SIZE_FLOOR;
            } else {
                scale = scale.sqrt();
            }
        }

        scale * paint.brush_scale
    }

    fn size_term(
        &self,
        axis: DynamicAxis,
        size: impl FnOnce() -> f64,
        inverse_size: impl FnOnce() -> f64,
    ) -> Term {
        let axis = self.options.axis(axis);
        let factor = if axis.size {
            Some(size())
        } else if axis.inverse_size {
            Some(inverse_size())
        } else {
            None
        };
        (factor, axis.prescale)
    }

    /// Width over height of the dab, multiplied into the base aspect ratio
    pub fn aspect_ratio(&self, paint: &PaintBase, coords: &DynamicsCoords, pixel_dist: f64) -> f64 {
        let target = DynamicTarget::AspectRatio;
        let mut aspect_ratio = 1.0;

        if self.options.any_enabled(target) {
            let terms = MixTerms {
                pressure: self.term(DynamicAxis::Pressure, target, || 2.0 * coords.pressure),
                velocity: self.term(DynamicAxis::Velocity, target, || 2.0 * coords.velocity),
                random: self.term(DynamicAxis::Random, target, || {
                    let u = self.random.uniform();
                    if u <= 0.5 {
                        1.0 / (u / 0.5 + 1.0)
                    } else {
                        (u - 0.5) / 0.5 + 1.0
                    }
                }),
                tilt: self.term(DynamicAxis::Tilt, target, || {
                    ((1.0 - coords.xtilt.abs()) / (1.0 - coords.ytilt.abs())).sqrt()
                }),
                direction: self.term(DynamicAxis::Direction, target, || {
                    let ratio = ((1.0 + coords.direction) % 0.5) / 0.25;
                    if coords.direction > 0.0 && coords.direction < 0.5 {
                        1.0 / ratio
                    } else {
                        ratio
                    }
                }),
                fading: self.term(DynamicAxis::Fading, target, || fading(pixel_dist)),
            };

            aspect_ratio = mix(&terms);
        }

        paint.brush_aspect_ratio * aspect_ratio
    }

    /// Dab rotation in turns, offset from the base brush angle.
    ///
    /// Tilt contributes the direction of the tilt vector rather than its
    /// length. With no axis enabled the base angle is returned unchanged.
    pub fn angle(&self, paint: &PaintBase, coords: &DynamicsCoords, pixel_dist: f64) -> f64 {
        let target = DynamicTarget::Angle;

        if !self.options.any_enabled(target) {
            return paint.brush_angle;
        }

        let mut terms = self.standard_terms(target, coords, pixel_dist, |v| 1.0 - v);
        terms.tilt = self.term(DynamicAxis::Tilt, target, || {
            tilt_angle(coords.xtilt, coords.ytilt)
        });

        mix(&terms) - 0.5 + paint.brush_angle
    }

    /// All seven factors for one dab, with size dynamics on
    pub fn evaluate(&self, paint: &PaintBase, coords: &DynamicsCoords, pixel_dist: f64) -> DabDynamics {
        DabDynamics {
            opacity: self.opacity(coords, pixel_dist),
            size: self.size(paint, coords, pixel_dist, true),
            aspect_ratio: self.aspect_ratio(paint, coords, pixel_dist),
            rate: self.rate(coords, pixel_dist),
            color: self.color(coords, pixel_dist),
            hardness: self.hardness(coords, pixel_dist),
            angle: self.angle(paint, coords, pixel_dist),
        }
    }
}
