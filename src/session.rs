use tracing::{debug, warn};

use crate::{
    config::{CompileOptions, DecompileOptions},
    foundation::error::{ColrError, ColrResult},
    paint::decompiler::PaintDecompiler,
    palette::{Cpal, PaletteMode},
    script::compile_paints,
    table::FontDocument,
};

/// Compile a paint script into `doc`, replacing its color tables.
///
/// The document's axes are rewritten per `opts` first. Returns the
/// compile's non-fatal warnings, which are also logged.
#[tracing::instrument(skip(doc, source, opts), fields(bytes = source.len()))]
pub fn compile_document(
    doc: &mut FontDocument,
    source: &str,
    opts: &CompileOptions,
) -> ColrResult<Vec<String>> {
    let axes = opts.apply(&doc.axes)?;
    let out = compile_paints(source, &axes)?;
    for w in &out.warnings {
        warn!(warning = %w, "paint script");
    }
    debug!(
        glyphs = out.colr.glyphs.len(),
        palettes = out.cpal.palettes.len(),
        "compiled paints"
    );

    doc.axes = axes;
    doc.colr = Some(out.colr);
    doc.cpal = Some(out.cpal);
    doc.validate()?;
    Ok(out.warnings)
}

/// Script text that recompiles to the color tables of `doc`.
#[tracing::instrument(skip(doc, opts), fields(precision = opts.precision))]
pub fn decompile_document(doc: &FontDocument, opts: &DecompileOptions) -> ColrResult<String> {
    let colr = doc
        .colr
        .as_ref()
        .ok_or_else(|| ColrError::lookup("font document has no color table"))?;
    let empty = Cpal::default();
    let cpal = doc.cpal.as_ref().unwrap_or(&empty);

    let mut text = PaintDecompiler::new(colr, cpal, &doc.axes)
        .with_precision(opts.precision)
        .decompile_glyphs(&colr.glyphs, opts.line_width)?;
    text.push_str(&palette_flags(cpal));
    Ok(text)
}

// Slot flags survive only as statements; the colors come back implicitly.
fn palette_flags(cpal: &Cpal) -> String {
    let mut out = String::new();
    for (slot, &bits) in cpal.palette_types.iter().enumerate() {
        for mode in [PaletteMode::Light, PaletteMode::Dark] {
            if bits & mode.bits() != 0 {
                out.push_str(&format!("SetPaletteFlags({slot}, \"{mode}\")\n"));
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
