//! colrpaint compiles a small paint script into the paint graph of an OpenType
//! `COLR` version 1 table, and decompiles such graphs back into script text.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: script text -> statements, with byte offsets for errors
//! 2. **Interpret**: statements -> calls into [`PaintCompiler`], which picks
//!    static or variable paint formats and assigns palette indices
//! 3. **Finalize**: the [`VariationPool`] builds and optimizes the variation
//!    store; the result is a [`Colr`] and a [`Cpal`]
//! 4. **Decompile**: [`PaintDecompiler`] resolves stored deltas back into
//!    per-location values and prints script text that recompiles to an
//!    equivalent graph
//!
//! Fonts are exchanged as a JSON [`FontDocument`] (axes plus color tables);
//! binary OpenType I/O is left to other tools.
//!
//! # Getting started
//!
//! ```no_run
//! use colrpaint::{CompileOptions, DecompileOptions, FontDocument};
//!
//! let mut doc = FontDocument::from_path("font.json")?;
//! colrpaint::compile_document(
//!     &mut doc,
//!     r##"glyphs["A"] = PaintSolid("#FF0000FF")"##,
//!     &CompileOptions::default(),
//! )?;
//! println!("{}", colrpaint::decompile_document(&doc, &DecompileOptions::default())?);
//! # Ok::<(), colrpaint::ColrError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod config;
mod foundation;
mod paint;
mod palette;
mod script;
mod session;
mod table;
mod variation;

pub use config::{CompileOptions, DecompileOptions};
pub use foundation::core::{AxisDef, AxisSet, Color, Location, UserLocation};
pub use foundation::error::{ColrError, ColrResult};
pub use foundation::units::{
    ENCODED_LIMIT, Unit, fits_encoded, fixed_to_float, float_to_fixed, float_to_fixed_to_float,
    float_to_fixed_to_str, ot_round,
};
pub use paint::compiler::{
    ColorLineSpec, ColorStopSpec, CompileOutput, PaintCompiler, Point, ScaleArgs,
};
pub use paint::decompiler::{DEFAULT_PRECISION, PaintDecompiler, Resolved, quote};
pub use paint::model::{
    Affine2x3, ColorLine, ColorStop, CompositeMode, Extend, GlyphPaints, PaintColrGlyph,
    PaintColrLayers, PaintComposite, PaintGlyph, PaintKind, PaintLinearGradient, PaintNode,
    PaintRadialGradient, PaintRotate, PaintRotateAroundCenter, PaintScale, PaintScaleAroundCenter,
    PaintScaleUniform, PaintScaleUniformAroundCenter, PaintSkew, PaintSkewAroundCenter,
    PaintSolid, PaintSweepGradient, PaintTransform, PaintTranslate, STOP_FIELDS,
};
pub use palette::{ColorSpec, Cpal, FOREGROUND, PaletteManager, PaletteMode};
pub use script::error::ScriptError;
pub use script::{compile_paints, format_source};
pub use session::{compile_document, decompile_document};
pub use table::{Colr, FontDocument};
pub use variation::pool::{VarBundle, VarDescriptor, VariationPool};
pub use variation::scalar::{Scalar, VariableScalar, parse_legacy};
pub use variation::store::{
    NO_VARIATION_INDEX, OnlineVarStoreBuilder, RegionAxis, VarData, VarIdx, VarRegion, VarStore,
    VarStoreBackend, split_var_idx,
};
