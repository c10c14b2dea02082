//! Brush dynamics
//!
//! Converts pen input (pressure, velocity, tilt, direction), stroke distance
//! and randomness into per-dab modulation factors.

mod mix;
mod mixer;
mod options;
mod random;

pub use mix::{mix, MixTerms, Term};
pub use mixer::{
    fading, tilt_angle, DynamicsMixer, FADE_EXPONENT, FADE_LENGTH, PRESSURE_SCALE, SIZE_FLOOR,
    SIZE_FLOOR_THRESHOLD, VELOCITY_SCALE,
};
pub use options::{
    AxisOptions, DynamicAxis, DynamicTarget, DynamicsOptions, DynamicsProperty, PropertyValue,
};
pub use random::{RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
