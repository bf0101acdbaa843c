use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Color,
    error::{ColrError, ColrResult},
};

/// Palette index reserved for "use the current text color".
pub const FOREGROUND: u16 = 0xFFFF;

/// A color as referenced by a paint, before palette assignment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpec {
    /// The foreground sentinel.
    Foreground,
    /// An index into the palette.
    Index(u32),
    /// A literal color, one value per palette slot (or a single value for all).
    Literal(Vec<Color>),
}

impl ColorSpec {
    /// A single-slot literal.
    pub fn literal(color: Color) -> Self {
        Self::Literal(vec![color])
    }

    /// Parse `"foreground"` or a `#RRGGBB[AA]` literal.
    pub fn parse(s: &str) -> ColrResult<Self> {
        if s == "foreground" {
            return Ok(Self::Foreground);
        }
        Ok(Self::literal(Color::parse_hex(s)?))
    }
}

/// Presentation flag for one palette slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteMode {
    /// Usable on a light background.
    Light = 0x1,
    /// Usable on a dark background.
    Dark = 0x2,
}

impl PaletteMode {
    /// Bit in the CPAL palette-type mask.
    pub fn bits(self) -> u32 {
        self as u32
    }
}

impl FromStr for PaletteMode {
    type Err = ColrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ColrError::validation(format!(
                "unknown palette mode '{s}', must be one of: light, dark"
            ))),
        }
    }
}

impl fmt::Display for PaletteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

/// A finished color table: `palettes[slot][entry]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cpal {
    /// One palette per slot, each holding one color per entry.
    pub palettes: Vec<Vec<Color>>,
    /// Light/dark bitmask per palette.
    #[serde(default)]
    pub palette_types: Vec<u32>,
}

impl Cpal {
    /// Colors of entry `index` across every palette.
    pub fn entry(&self, index: u16) -> ColrResult<Vec<Color>> {
        self.palettes
            .iter()
            .enumerate()
            .map(|(slot, palette)| {
                palette.get(usize::from(index)).copied().ok_or_else(|| {
                    ColrError::lookup(format!(
                        "palette index {index} is beyond palette {slot} ({} entries)",
                        palette.len()
                    ))
                })
            })
            .collect()
    }
}

/// Assigns palette indices to color references.
///
/// Starts in implicit mode, where literal colors are appended on first
/// sight. [`PaletteManager::set_explicit`] switches to a declared palette
/// addressed only by index.
#[derive(Clone, Debug, Default)]
pub struct PaletteManager {
    entries: Vec<Vec<Color>>,
    explicit: bool,
    slot_flags: Vec<u32>,
}

impl PaletteManager {
    /// Empty manager in implicit mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once an explicit palette was declared.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Entries so far, one color list per entry.
    pub fn entries(&self) -> &[Vec<Color>] {
        &self.entries
    }

    /// Number of slots: the widest entry.
    pub fn slot_count(&self) -> usize {
        self.entries.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Resolve a color reference to its palette index.
    pub fn index_of(&mut self, color: &ColorSpec) -> ColrResult<u16> {
        match color {
            ColorSpec::Foreground => Ok(FOREGROUND),
            ColorSpec::Index(i) => {
                let len = self.entries.len();
                match u16::try_from(*i) {
                    Ok(idx) if (*i as usize) < len => Ok(idx),
                    _ => Err(ColrError::consistency(format!(
                        "palette index {i} out of range ({len} entries); \
                         declare the palette with SetPalette first"
                    ))),
                }
            }
            ColorSpec::Literal(_) if self.explicit => Err(ColrError::validation(
                "an explicit palette is declared; reference colors by palette index",
            )),
            ColorSpec::Literal(colors) => {
                if colors.is_empty() {
                    return Err(ColrError::validation("color list must not be empty"));
                }
                if let Some(i) = self.entries.iter().position(|e| e == colors) {
                    return Ok(i as u16);
                }
                if self.entries.len() >= usize::from(FOREGROUND) {
                    return Err(ColrError::range("palette is full"));
                }
                self.entries.push(colors.clone());
                Ok((self.entries.len() - 1) as u16)
            }
        }
    }

    /// Declare the palette: one list of strict `#RRGGBBAA` colors per entry.
    pub fn set_explicit(&mut self, entries: Vec<Vec<String>>) -> ColrResult<()> {
        if self.explicit {
            return Err(ColrError::consistency("palette declared twice"));
        }
        if !self.entries.is_empty() {
            return Err(ColrError::consistency(
                "palette declared after colors were already assigned implicitly",
            ));
        }
        if entries.len() >= usize::from(FOREGROUND) {
            return Err(ColrError::range("palette has too many entries"));
        }
        let mut parsed = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if entry.is_empty() {
                return Err(ColrError::validation(format!("palette entry {i} has no colors")));
            }
            let colors = entry
                .iter()
                .enumerate()
                .map(|(slot, s)| {
                    Color::parse_strict(s).map_err(|_| {
                        ColrError::validation(format!(
                            "palette entry {i}, color {slot}: \"{s}\" is not #RRGGBBAA"
                        ))
                    })
                })
                .collect::<ColrResult<Vec<_>>>()?;
            parsed.push(colors);
        }
        self.entries = parsed;
        self.explicit = true;
        Ok(())
    }

    /// Mark `slot` as usable in `mode`; flags accumulate.
    pub fn set_slot_flags(&mut self, slot: usize, mode: PaletteMode) -> ColrResult<()> {
        let slots = self.slot_count();
        if slots == 0 {
            return Err(ColrError::consistency(
                "palette flags need a palette; declare colors first",
            ));
        }
        if slot >= slots {
            return Err(ColrError::consistency(format!(
                "palette slot {slot} out of range ({slots} slots)"
            )));
        }
        if self.slot_flags.len() <= slot {
            self.slot_flags.resize(slot + 1, 0);
        }
        self.slot_flags[slot] |= mode.bits();
        Ok(())
    }

    /// Check slot counts and transpose entries into per-slot palettes.
    ///
    /// Every entry holds one color or the pool-wide maximum; one-color
    /// entries are repeated in every slot, even beside multi-slot entries.
    pub fn finalize_entries(&self) -> ColrResult<Cpal> {
        let slots = self.slot_count();
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.len() != 1 && entry.len() != slots {
                return Err(ColrError::consistency(format!(
                    "palette entry {i} has {} colors; expected 1 or {slots}",
                    entry.len()
                )));
            }
        }
        let palettes = (0..slots)
            .map(|slot| {
                self.entries
                    .iter()
                    .map(|entry| if entry.len() == 1 { entry[0] } else { entry[slot] })
                    .collect()
            })
            .collect();
        let mut palette_types = self.slot_flags.clone();
        palette_types.resize(slots, 0);
        Ok(Cpal {
            palettes,
            palette_types,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/palette.rs"]
mod tests;
