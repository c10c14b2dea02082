//! Per-axis dynamics configuration
//!
//! Each of the six driving axes carries one enable flag per modulation
//! target plus a `prescale` weight. Properties are also reachable by name
//! (`pressure-opacity`, `tilt-inverse-size`, `fading-prescale`, ...) so a
//! settings layer can persist and restore them without knowing the struct.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::CoreError;

/// An input-derived driving factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DynamicAxis {
    Pressure,
    Velocity,
    Direction,
    Tilt,
    Random,
    Fading,
}

impl DynamicAxis {
    pub const ALL: [DynamicAxis; 6] = [
        DynamicAxis::Pressure,
        DynamicAxis::Velocity,
        DynamicAxis::Direction,
        DynamicAxis::Tilt,
        DynamicAxis::Random,
        DynamicAxis::Fading,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DynamicAxis::Pressure => "pressure",
            DynamicAxis::Velocity => "velocity",
            DynamicAxis::Direction => "direction",
            DynamicAxis::Tilt => "tilt",
            DynamicAxis::Random => "random",
            DynamicAxis::Fading => "fading",
        }
    }
}

impl Display for DynamicAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DynamicAxis {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DynamicAxis::ALL
            .iter()
            .copied()
            .find(|axis| axis.name() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown dynamics axis '{s}'")))
    }
}

/// A brush parameter an axis can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DynamicTarget {
    Opacity,
    Hardness,
    Rate,
    Size,
    InverseSize,
    AspectRatio,
    Color,
    Angle,
}

impl DynamicTarget {
    pub const ALL: [DynamicTarget; 8] = [
        DynamicTarget::Opacity,
        DynamicTarget::Hardness,
        DynamicTarget::Rate,
        DynamicTarget::Size,
        DynamicTarget::InverseSize,
        DynamicTarget::AspectRatio,
        DynamicTarget::Color,
        DynamicTarget::Angle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DynamicTarget::Opacity => "opacity",
            DynamicTarget::Hardness => "hardness",
            DynamicTarget::Rate => "rate",
            DynamicTarget::Size => "size",
            DynamicTarget::InverseSize => "inverse-size",
            DynamicTarget::AspectRatio => "aspect-ratio",
            DynamicTarget::Color => "color",
            DynamicTarget::Angle => "angle",
        }
    }
}

impl Display for DynamicTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DynamicTarget {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DynamicTarget::ALL
            .iter()
            .copied()
            .find(|target| target.name() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown dynamics target '{s}'")))
    }
}

/// A named property: either a target flag or the axis prescale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamicsProperty {
    Flag(DynamicAxis, DynamicTarget),
    Prescale(DynamicAxis),
}

impl Display for DynamicsProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicsProperty::Flag(axis, target) => write!(f, "{axis}-{target}"),
            DynamicsProperty::Prescale(axis) => write!(f, "{axis}-prescale"),
        }
    }
}

impl FromStr for DynamicsProperty {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || CoreError::UnknownProperty(s.to_string());

        let (axis, rest) = s.split_once('-').ok_or_else(unknown)?;
        let axis: DynamicAxis = axis.parse().map_err(|_| unknown())?;

        if rest == "prescale" {
            return Ok(DynamicsProperty::Prescale(axis));
        }

        let target: DynamicTarget = rest.parse().map_err(|_| unknown())?;
        Ok(DynamicsProperty::Flag(axis, target))
    }
}

/// Value carried by a named property
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Double(f64),
}

/// Flags and weight for one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisOptions {
    pub opacity: bool,
    pub hardness: bool,
    pub rate: bool,
    pub size: bool,
    pub inverse_size: bool,
    pub aspect_ratio: bool,
    pub color: bool,
    pub angle: bool,
    /// Weight of this axis against the other active axes (0.0 - 1.0)
    pub prescale: f64,
}

impl AxisOptions {
    pub fn enabled(&self, target: DynamicTarget) -> bool {
        match target {
            DynamicTarget::Opacity => self.opacity,
            DynamicTarget::Hardness => self.hardness,
            DynamicTarget::Rate => self.rate,
            DynamicTarget::Size => self.size,
            DynamicTarget::InverseSize => self.inverse_size,
            DynamicTarget::AspectRatio => self.aspect_ratio,
            DynamicTarget::Color => self.color,
            DynamicTarget::Angle => self.angle,
        }
    }

    pub fn set_enabled(&mut self, target: DynamicTarget, enabled: bool) {
        let flag = match target {
            DynamicTarget::Opacity => &mut self.opacity,
            DynamicTarget::Hardness => &mut self.hardness,
            DynamicTarget::Rate => &mut self.rate,
            DynamicTarget::Size => &mut self.size,
            DynamicTarget::InverseSize => &mut self.inverse_size,
            DynamicTarget::AspectRatio => &mut self.aspect_ratio,
            DynamicTarget::Color => &mut self.color,
            DynamicTarget::Angle => &mut self.angle,
        };
        *flag = enabled;
    }
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            opacity: false,
            hardness: false,
            rate: false,
            size: false,
            inverse_size: false,
            aspect_ratio: false,
            color: false,
            angle: false,
            prescale: 1.0,
        }
    }
}

/// The six axis blocks of one dynamics configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DynamicsOptions {
    pub pressure: AxisOptions,
    pub velocity: AxisOptions,
    pub direction: AxisOptions,
    pub tilt: AxisOptions,
    pub random: AxisOptions,
    pub fading: AxisOptions,
}

impl Default for DynamicsOptions {
    /// Only pressure drives opacity; every prescale is 1.0
    fn default() -> Self {
        Self {
            pressure: AxisOptions {
                opacity: true,
                ..AxisOptions::default()
            },
            velocity: AxisOptions::default(),
            direction: AxisOptions::default(),
            tilt: AxisOptions::default(),
            random: AxisOptions::default(),
            fading: AxisOptions::default(),
        }
    }
}

impl DynamicsOptions {
    /// Every target disabled
    pub fn none() -> Self {
        Self {
            pressure: AxisOptions::default(),
            ..Self::default()
        }
    }

    pub fn axis(&self, axis: DynamicAxis) -> &AxisOptions {
        match axis {
            DynamicAxis::Pressure => &self.pressure,
            DynamicAxis::Velocity => &self.velocity,
            DynamicAxis::Direction => &self.direction,
            DynamicAxis::Tilt => &self.tilt,
            DynamicAxis::Random => &self.random,
            DynamicAxis::Fading => &self.fading,
        }
    }

    pub fn axis_mut(&mut self, axis: DynamicAxis) -> &mut AxisOptions {
        match axis {
            DynamicAxis::Pressure => &mut self.pressure,
            DynamicAxis::Velocity => &mut self.velocity,
            DynamicAxis::Direction => &mut self.direction,
            DynamicAxis::Tilt => &mut self.tilt,
            DynamicAxis::Random => &mut self.random,
            DynamicAxis::Fading => &mut self.fading,
        }
    }

    pub fn enabled(&self, axis: DynamicAxis, target: DynamicTarget) -> bool {
        self.axis(axis).enabled(target)
    }

    pub fn set_enabled(&mut self, axis: DynamicAxis, target: DynamicTarget, enabled: bool) {
        self.axis_mut(axis).set_enabled(target, enabled);
    }

    /// Whether any axis drives `target`
    pub fn any_enabled(&self, target: DynamicTarget) -> bool {
        DynamicAxis::ALL
            .iter()
            .any(|axis| self.enabled(*axis, target))
    }

    pub fn prescale(&self, axis: DynamicAxis) -> f64 {
        self.axis(axis).prescale
    }

    /// Set an axis weight. Values outside `[0, 1]` are rejected.
    pub fn set_prescale(&mut self, axis: DynamicAxis, prescale: f64) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&prescale) {
            return Err(CoreError::InvalidInput(format!(
                "{axis}-prescale must be in [0, 1], got {prescale}"
            )));
        }
        self.axis_mut(axis).prescale = prescale;
        Ok(())
    }

    /// Every property name, axis-major
    pub fn property_names() -> impl Iterator<Item = DynamicsProperty> {
        DynamicAxis::ALL.into_iter().flat_map(|axis| {
            DynamicTarget::ALL
                .into_iter()
                .map(move |target| DynamicsProperty::Flag(axis, target))
                .chain(std::iter::once(DynamicsProperty::Prescale(axis)))
        })
    }

    pub fn property(&self, name: &str) -> Result<PropertyValue, CoreError> {
        Ok(match name.parse::<DynamicsProperty>()? {
            DynamicsProperty::Flag(axis, target) => PropertyValue::Bool(self.enabled(axis, target)),
            DynamicsProperty::Prescale(axis) => PropertyValue::Double(self.prescale(axis)),
        })
    }

    pub fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), CoreError> {
        let property: DynamicsProperty = name.parse()?;

        match (property, value) {
            (DynamicsProperty::Flag(axis, target), PropertyValue::Bool(enabled)) => {
                self.set_enabled(axis, target, enabled);
            }
            (DynamicsProperty::Prescale(axis), PropertyValue::Double(prescale)) => {
                self.set_prescale(axis, prescale)?;
            }
            (DynamicsProperty::Flag(..), _) => {
                return Err(CoreError::PropertyType {
                    name: name.to_string(),
                    expected: "boolean",
                });
            }
            (DynamicsProperty::Prescale(_), _) => {
                return Err(CoreError::PropertyType {
                    name: name.to_string(),
                    expected: "double",
                });
            }
        }

        tracing::debug!("Dynamics property {} set to {:?}", name, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DynamicsOptions::default();

        for axis in DynamicAxis::ALL {
            assert_eq!(options.prescale(axis), 1.0);
            for target in DynamicTarget::ALL {
                let expected = axis == DynamicAxis::Pressure && target == DynamicTarget::Opacity;
                assert_eq!(options.enabled(axis, target), expected, "{axis}-{target}");
            }
        }
    }

    #[test]
    fn test_none_disables_everything() {
        let options = DynamicsOptions::none();
        for target in DynamicTarget::ALL {
            assert!(!options.any_enabled(target));
        }
    }

    #[test]
    fn test_property_name_parsing() {
        assert_eq!(
            "tilt-inverse-size".parse::<DynamicsProperty>(),
            Ok(DynamicsProperty::Flag(DynamicAxis::Tilt, DynamicTarget::InverseSize))
        );
        assert_eq!(
            "fading-prescale".parse::<DynamicsProperty>(),
            Ok(DynamicsProperty::Prescale(DynamicAxis::Fading))
        );
        assert_eq!(
            "speed-opacity".parse::<DynamicsProperty>(),
            Err(CoreError::UnknownProperty("speed-opacity".to_string()))
        );
        assert!("pressure".parse::<DynamicsProperty>().is_err());
        assert!("pressure-weight".parse::<DynamicsProperty>().is_err());
    }

    #[test]
    fn test_property_names_round_trip() {
        let names: Vec<String> = DynamicsOptions::property_names()
            .map(|p| p.to_string())
            .collect();

        assert_eq!(names.len(), 6 * 9);
        assert_eq!(names[0], "pressure-opacity");
        assert_eq!(names[8], "pressure-prescale");
        assert_eq!(names[names.len() - 1], "fading-prescale");

        let options = DynamicsOptions::default();
        for name in &names {
            assert!(options.property(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_set_property() {
        let mut options = DynamicsOptions::default();

        options
            .set_property("velocity-aspect-ratio", PropertyValue::Bool(true))
            .unwrap();
        assert!(options.velocity.aspect_ratio);

        options
            .set_property("random-prescale", PropertyValue::Double(0.25))
            .unwrap();
        assert_eq!(options.random.prescale, 0.25);
        assert_eq!(
            options.property("random-prescale"),
            Ok(PropertyValue::Double(0.25))
        );
    }

    #[test]
    fn test_set_property_type_mismatch() {
        let mut options = DynamicsOptions::default();

        let err = options
            .set_property("pressure-size", PropertyValue::Double(1.0))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::PropertyType {
                name: "pressure-size".to_string(),
                expected: "boolean",
            }
        );

        assert!(options
            .set_property("tilt-prescale", PropertyValue::Bool(true))
            .is_err());
    }

    #[test]
    fn test_prescale_range() {
        let mut options = DynamicsOptions::default();

        assert!(options.set_prescale(DynamicAxis::Tilt, 1.5).is_err());
        assert!(options.set_prescale(DynamicAxis::Tilt, -0.1).is_err());
        assert!(options.set_prescale(DynamicAxis::Tilt, f64::NAN).is_err());
        assert_eq!(options.tilt.prescale, 1.0);

        options.set_prescale(DynamicAxis::Tilt, 0.0).unwrap();
        assert_eq!(options.tilt.prescale, 0.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut options = DynamicsOptions::default();
        options.fading.size = true;
        options.tilt.prescale = 0.5;

        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"inverseSize\":false"));

        let restored: DynamicsOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, options);
    }

    #[test]
    fn test_serde_missing_fields_use_defaults() {
        let options: DynamicsOptions =
            serde_json::from_str(r#"{"tilt":{"angle":true}}"#).unwrap();

        assert!(options.tilt.angle);
        assert_eq!(options.tilt.prescale, 1.0);
        assert!(options.pressure.opacity);
    }
}
