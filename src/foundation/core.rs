use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ColrError, ColrResult};

/// One variation axis of the design space, in user coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisDef {
    /// Axis tag, e.g. `wght`.
    pub tag: String,
    /// Minimum user coordinate.
    pub min: f64,
    /// Default user coordinate.
    pub default: f64,
    /// Maximum user coordinate.
    pub max: f64,
    /// Human-readable axis name.
    #[serde(default)]
    pub name: String,
}

impl AxisDef {
    /// Build an axis, checking `min <= default <= max`.
    pub fn new(tag: impl Into<String>, min: f64, default: f64, max: f64) -> ColrResult<Self> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(ColrError::validation("axis tag must be non-empty"));
        }
        if !(min <= default && default <= max) {
            return Err(ColrError::validation(format!(
                "axis '{tag}' must satisfy min <= default <= max (got {min}:{default}:{max})"
            )));
        }
        Ok(Self {
            name: tag.clone(),
            tag,
            min,
            default,
            max,
        })
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Map a user coordinate into `[-1, 1]`, clamping to the axis range.
    pub fn normalize(&self, value: f64) -> f64 {
        let v = value.clamp(self.min, self.max);
        if v < self.default {
            -(self.default - v) / (self.default - self.min)
        } else if v > self.default {
            (v - self.default) / (self.max - self.default)
        } else {
            0.0
        }
    }

    /// Inverse of [`AxisDef::normalize`].
    pub fn denormalize(&self, normalized: f64) -> f64 {
        if normalized < 0.0 {
            self.default + normalized * (self.default - self.min)
        } else {
            self.default + normalized * (self.max - self.default)
        }
    }
}

impl FromStr for AxisDef {
    type Err = ColrError;

    /// Parse `tag:min:default:max[:name]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 4 && parts.len() != 5 {
            return Err(ColrError::validation(format!(
                "axis definition '{s}' must look like 'tag:min:default:max:name'"
            )));
        }
        let num = |raw: &str| -> ColrResult<f64> {
            raw.trim().parse::<f64>().map_err(|_| {
                ColrError::validation(format!("axis definition '{s}': '{raw}' is not a number"))
            })
        };
        let axis = AxisDef::new(parts[0].trim(), num(parts[1])?, num(parts[2])?, num(parts[3])?)?;
        Ok(match parts.get(4) {
            Some(name) => axis.with_name(name.trim()),
            None => axis,
        })
    }
}

/// The active axis set of one compile or decompile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisSet(Vec<AxisDef>);

impl AxisSet {
    /// Build an axis set, rejecting duplicate tags.
    pub fn new(axes: Vec<AxisDef>) -> ColrResult<Self> {
        for (i, a) in axes.iter().enumerate() {
            if axes[..i].iter().any(|b| b.tag == a.tag) {
                return Err(ColrError::validation(format!("duplicate axis tag '{}'", a.tag)));
            }
        }
        Ok(Self(axes))
    }

    /// Axis with `tag`, if any.
    pub fn get(&self, tag: &str) -> Option<&AxisDef> {
        self.0.iter().find(|a| a.tag == tag)
    }

    /// Position of `tag` in axis order.
    pub fn index_of(&self, tag: &str) -> Option<usize> {
        self.0.iter().position(|a| a.tag == tag)
    }

    /// Axes in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, AxisDef> {
        self.0.iter()
    }

    /// Number of axes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no axis is declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append an axis; the tag must be new.
    pub fn push(&mut self, axis: AxisDef) -> ColrResult<()> {
        if self.get(&axis.tag).is_some() {
            return Err(ColrError::validation(format!(
                "duplicate axis tag '{}'",
                axis.tag
            )));
        }
        self.0.push(axis);
        Ok(())
    }

    /// The location with every axis at its default.
    pub fn default_location(&self) -> Location {
        Location(self.0.iter().map(|a| (a.tag.clone(), a.default)).collect())
    }
}

/// A possibly partial location as authored: `(tag, user value)` pairs.
pub type UserLocation = Vec<(String, f64)>;

/// A complete location: one user coordinate per axis, in axis order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Location(Vec<(String, f64)>);

impl Location {
    /// Complete a partial location with axis defaults. Unknown tags are lookup errors.
    pub fn complete(partial: &[(String, f64)], axes: &AxisSet) -> ColrResult<Self> {
        for (tag, _) in partial {
            if axes.get(tag).is_none() {
                return Err(ColrError::lookup(format!("unknown axis tag '{tag}'")));
            }
        }
        let coords = axes
            .iter()
            .map(|axis| {
                // later duplicates win
                let value = partial
                    .iter()
                    .rev()
                    .find(|(tag, _)| *tag == axis.tag)
                    .map_or(axis.default, |(_, v)| *v);
                (axis.tag.clone(), value)
            })
            .collect();
        Ok(Self(coords))
    }

    /// `(tag, user value)` pairs in axis order.
    pub fn coords(&self) -> &[(String, f64)] {
        &self.0
    }

    /// User value on `tag`.
    pub fn get(&self, tag: &str) -> Option<f64> {
        self.0.iter().find(|(t, _)| t == tag).map(|(_, v)| *v)
    }
}

/// A straight-alpha RGBA8 palette color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Build a color from channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive, `#` optional).
    pub fn parse_hex(s: &str) -> ColrResult<Self> {
        let t = s.trim();
        let t = t.strip_prefix('#').unwrap_or(t);
        match t.len() {
            6 | 8 => Self::from_hex_digits(t, s),
            _ => Err(ColrError::validation(format!(
                "color \"{s}\" must be #RRGGBB or #RRGGBBAA"
            ))),
        }
    }

    /// Parse exactly `#RRGGBBAA`.
    pub fn parse_strict(s: &str) -> ColrResult<Self> {
        match s.strip_prefix('#') {
            Some(digits) if digits.len() == 8 => Self::from_hex_digits(digits, s),
            _ => Err(ColrError::validation(format!(
                "color \"{s}\" must be #RRGGBBAA"
            ))),
        }
    }

    fn from_hex_digits(digits: &str, original: &str) -> ColrResult<Self> {
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColrError::validation(format!(
                "color \"{original}\" contains non-hex digits"
            )));
        }
        let byte = |i: usize| -> ColrResult<u8> {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| {
                ColrError::validation(format!("color \"{original}\" has an invalid hex byte"))
            })
        };
        let a = if digits.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.r, self.g, self.b, self.a
        )
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
