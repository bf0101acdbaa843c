use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ColrError, ColrResult};

/// Encoded magnitudes at or above this bound do not fit a 16-bit storage slot.
pub const ENCODED_LIMIT: f64 = 32768.0;

/// Storage encoding of an authored number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Stored as authored (FWORD/UFWORD coordinates).
    #[default]
    Plain,
    /// Signed 2.14 fixed point.
    F2Dot14,
    /// Signed 16.16 fixed point.
    Fixed,
    /// Degrees, stored as f2dot14 multiples of 180°.
    Angle,
}

impl Unit {
    /// Convert an authored value into its storage representation.
    ///
    /// Every unit except [`Unit::Fixed`] rejects encoded magnitudes reaching
    /// [`ENCODED_LIMIT`].
    pub fn encode(self, value: f64) -> ColrResult<f64> {
        let encoded = self.encode_unchecked(value);
        if self.range_checked() && !fits_encoded(encoded) {
            return Err(ColrError::range(format!(
                "{value} does not fit {self} storage (encoded {encoded})"
            )));
        }
        Ok(encoded)
    }

    /// Like [`Unit::encode`], without the range guard.
    pub fn encode_unchecked(self, value: f64) -> f64 {
        match self {
            Self::Plain => value,
            Self::F2Dot14 => float_to_fixed(value, 14),
            Self::Fixed => float_to_fixed(value, 16),
            Self::Angle => float_to_fixed(value / 180.0, 14),
        }
    }

    /// Convert a stored value (or delta) back into authored units.
    pub fn decode(self, stored: f64) -> f64 {
        match self {
            Self::Plain => stored,
            Self::F2Dot14 => fixed_to_float(stored, 14),
            Self::Fixed => fixed_to_float(stored, 16),
            Self::Angle => fixed_to_float(stored, 14) * 180.0,
        }
    }

    /// 16.16 values are exempt from the 16-bit range guard.
    pub fn range_checked(self) -> bool {
        !matches!(self, Self::Fixed)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::F2Dot14 => "f2dot14",
            Self::Fixed => "fixed",
            Self::Angle => "angle",
        })
    }
}

/// True when an encoded value fits a signed 16-bit slot.
pub fn fits_encoded(encoded: f64) -> bool {
    encoded > -ENCODED_LIMIT && encoded < ENCODED_LIMIT
}

/// OpenType rounding: half-way cases round towards positive infinity.
pub fn ot_round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Scale by `2^bits` and round to the fixed-point grid.
pub fn float_to_fixed(value: f64, bits: u8) -> f64 {
    ot_round(value * scale(bits))
}

/// Inverse of [`float_to_fixed`].
pub fn fixed_to_float(value: f64, bits: u8) -> f64 {
    value / scale(bits)
}

/// Snap `value` to the nearest representable `bits`-fraction fixed value.
pub fn float_to_fixed_to_float(value: f64, bits: u8) -> f64 {
    fixed_to_float(float_to_fixed(value, bits), bits)
}

/// Shortest decimal text that reads back to the same `bits`-fraction fixed value.
pub fn float_to_fixed_to_str(value: f64, bits: u8) -> String {
    fixed_to_str(float_to_fixed(value, bits), bits)
}

fn fixed_to_str(fixed: f64, bits: u8) -> String {
    if fixed == 0.0 {
        return "0.0".to_owned();
    }
    let scale = scale(bits);
    let value = fixed / scale;
    let eps = 0.5 / scale;
    let lo = value - eps;
    let hi = value + eps;

    // the acceptance window straddles an integer
    if lo.trunc() != hi.trunc() {
        return format!("{:.1}", value.round());
    }

    let lo_s = format!("{lo:.8}");
    let hi_s = format!("{hi:.8}");
    let (Some(period), Some(first_diff)) = (
        lo_s.find('.'),
        lo_s.bytes().zip(hi_s.bytes()).position(|(a, b)| a != b),
    ) else {
        return format!("{value:.8}");
    };
    if first_diff <= period {
        return format!("{value:.8}");
    }
    format!("{value:.*}", first_diff - period)
}

fn scale(bits: u8) -> f64 {
    f64::from(1u32 << bits)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/units.rs"]
mod tests;
