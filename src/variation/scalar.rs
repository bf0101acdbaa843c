use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::foundation::{
    core::{AxisSet, Location, UserLocation},
    error::{ColrError, ColrResult},
    units::Unit,
};

/// An authored number: a constant, or a value per design-space location.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Same value everywhere.
    Constant(f64),
    /// Partial locations mapped to values, in authoring order.
    Locations(Vec<(UserLocation, f64)>),
    /// Deprecated `"axis=val,axis=val:number ..."` text form.
    Legacy(String),
}

impl Scalar {
    /// True for per-location specifications.
    pub fn is_variable(&self) -> bool {
        !matches!(self, Self::Constant(_))
    }

    /// The constant value, if this is one.
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Self::Constant(v) => Some(*v),
            _ => None,
        }
    }

    /// Build a location mapping from `(pairs, value)` entries.
    pub fn at_locations<I, L, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, f64)>,
        L: IntoIterator<Item = (T, f64)>,
        T: Into<String>,
    {
        Self::Locations(
            entries
                .into_iter()
                .map(|(loc, v)| (loc.into_iter().map(|(t, x)| (t.into(), x)).collect(), v))
                .collect(),
        )
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Constant(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Constant(f64::from(v))
    }
}

// NaN never reaches the pool memo: VariableScalar rejects non-finite values
// before a bundle is stored.
impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Constant(v) => hash_f64(*v, state),
            Self::Locations(entries) => {
                entries.len().hash(state);
                for (loc, v) in entries {
                    for (tag, x) in loc {
                        tag.hash(state);
                        hash_f64(*x, state);
                    }
                    hash_f64(*v, state);
                }
            }
            Self::Legacy(s) => s.hash(state),
        }
    }
}

fn hash_f64<H: Hasher>(v: f64, state: &mut H) {
    // -0.0 == 0.0, so they must hash alike
    let v = if v == 0.0 { 0.0 } else { v };
    v.to_bits().hash(state);
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => write!(f, "{v}"),
            Self::Legacy(s) => write!(f, "{s:?}"),
            Self::Locations(entries) => {
                f.write_str("{")?;
                for (i, (loc, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    let key = loc
                        .iter()
                        .map(|(tag, x)| format!("{tag}={x}"))
                        .collect::<Vec<_>>()
                        .join(",");
                    write!(f, "\"{key}\": {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A value table over complete locations, in storage units.
///
/// Always holds a value at the default location; immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableScalar {
    unit: Unit,
    default: f64,
    values: Vec<(Location, f64)>,
}

impl VariableScalar {
    /// A single value at the default location.
    pub fn from_constant(value: f64, unit: Unit, axes: &AxisSet) -> ColrResult<Self> {
        if !value.is_finite() {
            return Err(ColrError::validation(format!("variable value {value} is not finite")));
        }
        let encoded = unit.encode(value)?;
        Ok(Self {
            unit,
            default: encoded,
            values: vec![(axes.default_location(), encoded)],
        })
    }

    /// Validate and encode an authored location mapping.
    ///
    /// A missing default location is filled from the first entry; an empty
    /// mapping is a consistency error.
    pub fn from_locations(
        entries: &[(UserLocation, f64)],
        unit: Unit,
        axes: &AxisSet,
    ) -> ColrResult<Self> {
        let spec = || Scalar::Locations(entries.to_vec()).to_string();
        let mut values: Vec<(Location, f64)> = Vec::with_capacity(entries.len() + 1);
        for (partial, value) in entries {
            let finite = value.is_finite() && partial.iter().all(|(_, x)| x.is_finite());
            if !finite {
                return Err(ColrError::validation(format!(
                    "non-finite number in '{}'",
                    spec()
                )));
            }
            let location = Location::complete(partial, axes)?;
            let encoded = unit.encode_unchecked(*value);
            if unit.range_checked() && !crate::foundation::units::fits_encoded(encoded) {
                return Err(ColrError::range(format!("value too big in '{}'", spec())));
            }
            match values.iter_mut().find(|(l, _)| *l == location) {
                Some(slot) => slot.1 = encoded,
                None => values.push((location, encoded)),
            }
        }

        let default_location = axes.default_location();
        let default = match values.iter().find(|(l, _)| *l == default_location) {
            Some((_, v)) => *v,
            None => {
                let Some((_, first)) = entries.first() else {
                    return Err(ColrError::consistency(format!(
                        "no default value or first value in '{}'",
                        spec()
                    )));
                };
                let encoded = unit.encode_unchecked(*first);
                values.push((default_location, encoded));
                encoded
            }
        };

        Ok(Self {
            unit,
            default,
            values,
        })
    }

    /// Build from any authored form. Legacy text also yields a deprecation warning.
    pub fn from_scalar(
        scalar: &Scalar,
        unit: Unit,
        axes: &AxisSet,
    ) -> ColrResult<(Self, Option<String>)> {
        match scalar {
            Scalar::Constant(v) => Ok((Self::from_constant(*v, unit, axes)?, None)),
            Scalar::Locations(entries) => Ok((Self::from_locations(entries, unit, axes)?, None)),
            Scalar::Legacy(text) => {
                let entries = parse_legacy(text)?;
                let warning = format!(
                    "consider using a location mapping {} instead of string \"{text}\"",
                    Scalar::Locations(entries.clone())
                );
                Ok((Self::from_locations(&entries, unit, axes)?, Some(warning)))
            }
        }
    }

    /// Storage unit of every value.
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Encoded value at the default location.
    pub fn default_value(&self) -> f64 {
        self.default
    }

    /// Every (complete location, encoded value) pair, default included.
    pub fn values(&self) -> &[(Location, f64)] {
        &self.values
    }
}

/// Parse `"axis=val,axis=val:number axis=val:number"`.
pub fn parse_legacy(text: &str) -> ColrResult<Vec<(UserLocation, f64)>> {
    let bad = || ColrError::validation(format!("could not understand variable parameter '{text}'"));
    let number = |s: &str| s.trim().parse::<f64>().map_err(|_| bad());

    let mut out = Vec::new();
    for item in text.split_whitespace() {
        let (locations, value) = item.split_once(':').ok_or_else(bad)?;
        let mut location = UserLocation::new();
        for pair in locations.split(',').filter(|p| !p.is_empty()) {
            let (axis, at) = pair.split_once('=').ok_or_else(bad)?;
            location.push((axis.trim().to_owned(), number(at)?));
        }
        out.push((location, number(value)?));
    }
    if out.is_empty() {
        return Err(ColrError::consistency(format!(
            "no default value or first value in '{text}'"
        )));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/variation/scalar.rs"]
mod tests;
