//! Gate types, rotations, and decoding of combined detector labels.
//!
//! The detector emits one class per (type, orientation) pair, named
//! `"<TYPE>_<rotation>"`, e.g. `"NAND_270"`. [`decode_label`] splits such a
//! label back into its parts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The logic function of a gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateType {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl GateType {
    /// All gate types, in a stable order.
    pub const ALL: [GateType; 7] = [
        GateType::And,
        GateType::Or,
        GateType::Not,
        GateType::Nand,
        GateType::Nor,
        GateType::Xor,
        GateType::Xnor,
    ];

    /// The canonical upper-case name used by the detector.
    pub fn as_str(&self) -> &'static str {
        match self {
            GateType::And => "AND",
            GateType::Or => "OR",
            GateType::Not => "NOT",
            GateType::Nand => "NAND",
            GateType::Nor => "NOR",
            GateType::Xor => "XOR",
            GateType::Xnor => "XNOR",
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GateType {
    type Err = LabelDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GateType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LabelDecodeError::UnknownGateType(s.to_string()))
    }
}

/// Orientation of a gate glyph in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Rotation angle in degrees.
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = LabelDecodeError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::R0),
            90 => Ok(Rotation::R90),
            180 => Ok(Rotation::R180),
            270 => Ok(Rotation::R270),
            other => Err(LabelDecodeError::InvalidRotation(other.to_string())),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> Self {
        r.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Why a detector label could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LabelDecodeError {
    #[error("label '{0}' is not of the form <TYPE>_<rotation>")]
    Malformed(String),

    #[error("unknown gate type '{0}'")]
    UnknownGateType(String),

    #[error("invalid rotation '{0}' (expected 0, 90, 180 or 270)")]
    InvalidRotation(String),
}

/// Splits a combined detector label into gate type and rotation.
///
/// ```
/// use sketchlogic::ir::{decode_label, GateType, Rotation};
///
/// assert_eq!(decode_label("AND_90").unwrap(), (GateType::And, Rotation::R90));
/// assert!(decode_label("AND_45").is_err());
/// ```
pub fn decode_label(label: &str) -> Result<(GateType, Rotation), LabelDecodeError> {
    let (kind, angle) = label
        .trim()
        .rsplit_once('_')
        .ok_or_else(|| LabelDecodeError::Malformed(label.to_string()))?;

    let gate_type: GateType = kind.parse()?;
    let degrees: u16 = angle
        .parse()
        .map_err(|_| LabelDecodeError::InvalidRotation(angle.to_string()))?;
    let rotation = Rotation::try_from(degrees)?;

    Ok((gate_type, rotation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_all_types() {
        for t in GateType::ALL {
            let label = format!("{}_180", t);
            assert_eq!(decode_label(&label).unwrap(), (t, Rotation::R180));
        }
    }

    #[test]
    fn test_decode_is_case_insensitive_on_type() {
        assert_eq!(
            decode_label("xnor_270").unwrap(),
            (GateType::Xnor, Rotation::R270)
        );
    }

    #[test]
    fn test_decode_rejects_missing_rotation() {
        assert_eq!(
            decode_label("AND"),
            Err(LabelDecodeError::Malformed("AND".into()))
        );
    }

    #[test]
    fn test_decode_rejects_bad_rotation() {
        assert_eq!(
            decode_label("OR_45"),
            Err(LabelDecodeError::InvalidRotation("45".into()))
        );
        assert_eq!(
            decode_label("OR_up"),
            Err(LabelDecodeError::InvalidRotation("up".into()))
        );
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        assert_eq!(
            decode_label("MUX_0"),
            Err(LabelDecodeError::UnknownGateType("MUX".into()))
        );
    }

    #[test]
    fn test_rotation_serializes_as_degrees() {
        assert_eq!(serde_json::to_string(&Rotation::R90).unwrap(), "90");
        let r: Rotation = serde_json::from_str("270").unwrap();
        assert_eq!(r, Rotation::R270);
        assert!(serde_json::from_str::<Rotation>("45").is_err());
    }
}
