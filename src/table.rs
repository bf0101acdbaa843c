use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::{
        core::AxisSet,
        error::{ColrError, ColrResult},
    },
    paint::model::GlyphPaints,
    palette::Cpal,
    variation::store::{NO_VARIATION_INDEX, VarIdx, VarStore, split_var_idx},
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// A compiled color table: glyph paints plus their variation data.
pub struct Colr {
    /// Root paint per color glyph.
    pub glyphs: GlyphPaints,
    /// Item variation store, after optimization.
    #[serde(default)]
    pub var_store: VarStore,
    /// Delta-set index map: logical field index to physical store address.
    #[serde(default)]
    pub var_index_map: Vec<VarIdx>,
}

impl Colr {
    /// Check that every mapped address resolves in the store.
    pub fn validate(&self) -> ColrResult<()> {
        for (i, &idx) in self.var_index_map.iter().enumerate() {
            if idx == NO_VARIATION_INDEX {
                continue;
            }
            let (outer, inner) = split_var_idx(idx);
            let ok = self
                .var_store
                .data
                .get(outer)
                .is_some_and(|d| inner < d.items.len());
            if !ok {
                return Err(ColrError::consistency(format!(
                    "var_index_map[{i}] = {idx:#010x} does not resolve in the variation store"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// A font as far as color paints are concerned: its axes and its color tables.
///
/// This JSON document is the boundary object of the command-line tool; both
/// subcommands read one and `compile` writes one back.
pub struct FontDocument {
    /// Variation axes.
    #[serde(default)]
    pub axes: AxisSet,
    /// Color table, once compiled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colr: Option<Colr>,
    /// Palettes, once compiled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpal: Option<Cpal>,
}

impl FontDocument {
    /// Parse a document from JSON text.
    pub fn from_json(text: &str) -> ColrResult<Self> {
        let doc: Self = serde_json::from_str(text)
            .map_err(|e| ColrError::serde(format!("parse font document JSON: {e}")))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ColrResult<Self> {
        let doc: Self = serde_json::from_reader(r)
            .map_err(|e| ColrError::serde(format!("parse font document JSON: {e}")))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ColrResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ColrError::serde(format!("open font document '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> ColrResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ColrError::serde(format!("serialize font document: {e}")))
    }

    /// Check cross-table invariants.
    pub fn validate(&self) -> ColrResult<()> {
        // AxisSet deserializes transparently, so duplicates are caught here
        AxisSet::new(self.axes.iter().cloned().collect())?;
        if let Some(colr) = &self.colr {
            let store = &colr.var_store;
            if !store.regions.is_empty() && store.axis_count != self.axes.len() {
                return Err(ColrError::consistency(format!(
                    "variation store spans {} axes but the font declares {}",
                    store.axis_count,
                    self.axes.len()
                )));
            }
            colr.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/table.rs"]
mod tests;
