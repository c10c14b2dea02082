//! Weighted combination of the per-axis factors

/// One axis contribution: its factor when the target is enabled for that
/// axis, and the axis prescale.
pub type Term = (Option<f64>, f64);

/// Fixed axis order used by every query.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixTerms {
    pub pressure: Term,
    pub velocity: Term,
    pub random: Term,
    pub tilt: Term,
    pub direction: Term,
    pub fading: Term,
}

impl MixTerms {
    fn ordered(&self) -> [Term; 6] {
        [
            self.pressure,
            self.velocity,
            self.random,
            self.tilt,
            self.direction,
            self.fading,
        ]
    }
}

/// Mix the active terms into one modulation factor.
///
/// A term is active when its factor is present and greater than -1.0. Only
/// active terms add `|prescale|` to the weight sum; inactive ones count as a
/// zero factor. When no weight remains the result is 1.0. A negative result
/// wraps to `1.0 + r` and is then floored at 0.0.
pub fn mix(terms: &MixTerms) -> f64 {
    let mut scale_sum = 0.0;

    // Inactive axes still enter the weighted sum, as zero
    let weighted = terms.ordered().map(|(value, scale)| match value {
        Some(v) if v > -1.0 => {
            scale_sum += scale.abs();
            (v, scale)
        }
        _ => (0.0, scale),
    });

    let mut result = 1.0;

    if scale_sum > 0.0 {
        let [first, rest @ ..] = weighted;
        result = rest
            .iter()
            .fold((first.0 * first.1) / scale_sum, |acc, &(v, scale)| {
                acc + (v * scale) / scale_sum
            });
    }

    if result < 0.0 {
        result += 1.0;
    }

    // Comparison rather than f64::max so NaN propagates
    if 0.0 > result {
        0.0
    } else {
        result
    }
}
