//! Layer blend modes - point-wise compositing of a layer over a backdrop
//!
//! All buffers use the interleaved premultiplied `RaGaBaA float` layout.

mod engine;
mod parallel;

pub use engine::{blend, blend_into, blend_pixel, blend_samples, CHANNELS};
pub use parallel::{blend_parallel, DEFAULT_CHUNK_LEN};

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::CoreError;

/// A premultiplied RGBA sample
pub type Pixel = [f32; 4];

/// Layer modes, numbered as they are stored by the paint options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum BlendMode {
    #[default]
    Normal = 0,
    Dissolve = 1,
    Behind = 2,
    Multiply = 3,
    Screen = 4,
    Overlay = 5,
    Difference = 6,
    Addition = 7,
    Subtract = 8,
    DarkenOnly = 9,
    LightenOnly = 10,
    Hue = 11,
    Saturation = 12,
    Color = 13,
    Value = 14,
    Divide = 15,
    Dodge = 16,
    Burn = 17,
    HardLight = 18,
    SoftLight = 19,
    GrainExtract = 20,
    GrainMerge = 21,
    ColorErase = 22,
    Erase = 23,
    Replace = 24,
    AntiErase = 25,
}

impl BlendMode {
    /// Every mode, in id order
    pub const ALL: [BlendMode; 26] = [
        BlendMode::Normal,
        BlendMode::Dissolve,
        BlendMode::Behind,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Difference,
        BlendMode::Addition,
        BlendMode::Subtract,
        BlendMode::DarkenOnly,
        BlendMode::LightenOnly,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Value,
        BlendMode::Divide,
        BlendMode::Dodge,
        BlendMode::Burn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::GrainExtract,
        BlendMode::GrainMerge,
        BlendMode::ColorErase,
        BlendMode::Erase,
        BlendMode::Replace,
        BlendMode::AntiErase,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        use BlendMode::*;
        match self {
            Normal => "normal",
            Dissolve => "dissolve",
            Behind => "behind",
            Multiply => "multiply",
            Screen => "screen",
            Overlay => "overlay",
            Difference => "difference",
            Addition => "addition",
            Subtract => "subtract",
            DarkenOnly => "darken-only",
            LightenOnly => "lighten-only",
            Hue => "hue",
            Saturation => "saturation",
            Color => "color",
            Value => "value",
            Divide => "divide",
            Dodge => "dodge",
            Burn => "burn",
            HardLight => "hard-light",
            SoftLight => "soft-light",
            GrainExtract => "grain-extract",
            GrainMerge => "grain-merge",
            ColorErase => "color-erase",
            Erase => "erase",
            Replace => "replace",
            AntiErase => "anti-erase",
        }
    }

    /// Whether the engine has a color formula for this mode.
    ///
    /// Modes without one leave the color channels of the output untouched
    /// and only write alpha.
    pub fn is_implemented(self) -> bool {
        !matches!(
            self,
            BlendMode::Dissolve
                | BlendMode::Hue
                | BlendMode::Saturation
                | BlendMode::Color
                | BlendMode::Value
                | BlendMode::ColorErase
                | BlendMode::Erase
                | BlendMode::Replace
                | BlendMode::AntiErase
        )
    }

    /// Dissolve needs per-pixel noise keyed to canvas position and must be
    /// composited elsewhere.
    pub fn is_point_wise(self) -> bool {
        self != BlendMode::Dissolve
    }
}

impl Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlendMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| CoreError::UnknownBlendMode(s.to_string()))
    }
}

impl TryFrom<u8> for BlendMode {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        BlendMode::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| CoreError::UnknownBlendMode(value.to_string()))
    }
}

impl From<BlendMode> for u8 {
    fn from(mode: BlendMode) -> Self {
        mode.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_table_order() {
        for (index, mode) in BlendMode::ALL.iter().enumerate() {
            assert_eq!(mode.id() as usize, index);
            assert_eq!(BlendMode::try_from(index as u8), Ok(*mode));
        }
        assert!(BlendMode::try_from(26).is_err());
    }

    #[test]
    fn test_name_parsing() {
        assert_eq!("darken-only".parse::<BlendMode>(), Ok(BlendMode::DarkenOnly));
        assert_eq!("soft-light".parse::<BlendMode>(), Ok(BlendMode::SoftLight));
        assert_eq!(BlendMode::GrainMerge.to_string(), "grain-merge");
        assert_eq!(
            "vivid-light".parse::<BlendMode>(),
            Err(CoreError::UnknownBlendMode("vivid-light".to_string()))
        );
    }

    #[test]
    fn test_serde_names_match_display() {
        for mode in BlendMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.name()));
        }
    }

    #[test]
    fn test_placeholder_modes() {
        assert!(BlendMode::Normal.is_implemented());
        assert!(BlendMode::Divide.is_implemented());
        assert!(!BlendMode::Hue.is_implemented());
        assert!(!BlendMode::AntiErase.is_implemented());
        assert!(!BlendMode::Dissolve.is_point_wise());
        assert!(BlendMode::Replace.is_point_wise());
    }
}
