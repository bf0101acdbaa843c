use crate::{
    foundation::{
        core::{AxisDef, AxisSet},
        error::ColrResult,
    },
    paint::decompiler::DEFAULT_PRECISION,
};

/// Options controlling how a paint script is compiled into a font document.
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Axes appended to the document's axes before compiling.
    pub add_axes: Vec<AxisDef>,
    /// Discard the document's existing axes first.
    pub drop_axes: bool,
}

impl CompileOptions {
    /// The axis set a compile runs against, starting from the document's.
    pub fn apply(&self, axes: &AxisSet) -> ColrResult<AxisSet> {
        let mut out = if self.drop_axes {
            AxisSet::default()
        } else {
            axes.clone()
        };
        for axis in &self.add_axes {
            out.push(axis.clone())?;
        }
        Ok(out)
    }
}

/// Options controlling decompiled script text.
#[derive(Clone, Debug)]
pub struct DecompileOptions {
    /// Fractional bits numbers are snapped to when printed.
    pub precision: u8,
    /// Re-wrap each statement to this width. `None` leaves one line per glyph.
    pub line_width: Option<usize>,
}

impl Default for DecompileOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            line_width: Some(78),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
