use serde::{Deserialize, Serialize};

/// One input event as seen by the dynamics mixer.
///
/// Values arrive already normalized by the device layer; the mixer never
/// clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DynamicsCoords {
    /// Pen pressure (0.0 - 1.0)
    pub pressure: f64,
    /// Normalized drawing speed (0.0 - 1.0)
    pub velocity: f64,
    /// Horizontal tilt (-1.0 - 1.0)
    pub xtilt: f64,
    /// Vertical tilt (-1.0 - 1.0)
    pub ytilt: f64,
    /// Stroke direction as a fraction of a full turn (0.0 - 1.0)
    pub direction: f64,
}

impl DynamicsCoords {
    pub fn with_pressure(pressure: f64) -> Self {
        Self {
            pressure,
            ..Self::default()
        }
    }

    pub fn with_tilt(xtilt: f64, ytilt: f64) -> Self {
        Self {
            xtilt,
            ytilt,
            ..Self::default()
        }
    }

    /// Length of the tilt vector.
    pub fn tilt_magnitude(&self) -> f64 {
        (self.xtilt * self.xtilt + self.ytilt * self.ytilt).sqrt()
    }
}

impl Default for DynamicsCoords {
    fn default() -> Self {
        Self {
            pressure: 1.0,
            velocity: 0.0,
            xtilt: 0.0,
            ytilt: 0.0,
            direction: 0.0,
        }
    }
}

/// Base brush values owned by the paint options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaintBase {
    /// Multiplied into the size query
    pub brush_scale: f64,
    /// Multiplied into the aspect ratio query
    pub brush_aspect_ratio: f64,
    /// Added to the angle query, in turns
    pub brush_angle: f64,
}

impl Default for PaintBase {
    fn default() -> Self {
        Self {
            brush_scale: 1.0,
            brush_aspect_ratio: 1.0,
            brush_angle: 0.0,
        }
    }
}

/// Modulation factors for a single dab
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DabDynamics {
    pub opacity: f64,
    pub size: f64,
    pub aspect_ratio: f64,
    pub rate: f64,
    pub color: f64,
    pub hardness: f64,
    pub angle: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_defaults() {
        let coords = DynamicsCoords::default();
        assert_eq!(coords.pressure, 1.0);
        assert_eq!(coords.velocity, 0.0);
        assert_eq!(coords.tilt_magnitude(), 0.0);
    }

    #[test]
    fn test_tilt_magnitude() {
        let coords = DynamicsCoords::with_tilt(0.6, -0.8);
        assert!((coords.tilt_magnitude() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_coords_json_camel_case() {
        let coords: DynamicsCoords =
            serde_json::from_str(r#"{"pressure":0.25,"xtilt":0.5}"#).unwrap();
        assert_eq!(coords.pressure, 0.25);
        assert_eq!(coords.xtilt, 0.5);
        assert_eq!(coords.direction, 0.0);

        let paint: PaintBase = serde_json::from_str(r#"{"brushScale":2.0}"#).unwrap();
        assert_eq!(paint.brush_scale, 2.0);
        assert_eq!(paint.brush_aspect_ratio, 1.0);
    }
}
