//! The paint script language: a restricted, Python-flavoured expression
//! language whose only effects are calls into a fixed operation table and
//! assignments into the pre-seeded `glyphs` mapping.

mod ast;
pub mod error;
mod format;
mod interp;
mod lexer;
mod parser;

pub use format::format_source;

use crate::{
    foundation::{core::AxisSet, error::ColrResult},
    paint::compiler::CompileOutput,
};

/// Run a paint script against `axes` and finalize everything it built.
#[tracing::instrument(skip(source, axes), fields(bytes = source.len(), axes = axes.len()))]
pub fn compile_paints(source: &str, axes: &AxisSet) -> ColrResult<CompileOutput> {
    let program = parser::parse_program(source)?;
    let mut interp = interp::Interpreter::new(axes.clone());
    interp.run(&program)?;
    interp.finish()
}

