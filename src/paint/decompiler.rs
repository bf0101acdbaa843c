use rayon::prelude::*;

use crate::{
    foundation::{
        core::AxisSet,
        error::{ColrError, ColrResult},
        units::{Unit, float_to_fixed_to_str},
    },
    paint::model::{ColorLine, ColorStop, Extend, GlyphPaints, PaintNode, STOP_FIELDS},
    palette::{Cpal, FOREGROUND},
    script::format_source,
    table::Colr,
    variation::store::{NO_VARIATION_INDEX, RegionAxis, VarIdx, VarStore},
};

/// Default number of fractional bits numbers are snapped to when printed.
pub const DEFAULT_PRECISION: u8 = 14;

/// A field after resolving its variation data.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    /// Same value everywhere.
    Plain(f64),
    /// `(region label, value)` pairs, the default first under `""`.
    Varying(Vec<(String, f64)>),
}

/// Turns compiled paint graphs back into script text.
///
/// The output is valid script input: recompiling it against the same axes
/// yields an equivalent graph. Read-only, so one decompiler can serve many
/// glyphs in parallel.
#[derive(Clone, Copy, Debug)]
pub struct PaintDecompiler<'a> {
    palettes: &'a Cpal,
    store: &'a VarStore,
    index_map: &'a [VarIdx],
    axes: &'a AxisSet,
    precision: u8,
}

impl<'a> PaintDecompiler<'a> {
    /// Decompiler over a compiled color table.
    pub fn new(colr: &'a Colr, palettes: &'a Cpal, axes: &'a AxisSet) -> Self {
        Self {
            palettes,
            store: &colr.var_store,
            index_map: &colr.var_index_map,
            axes,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Fractional bits used when printing numbers.
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision.clamp(1, 16);
        self
    }

    /// Resolve field `k` of a bundle starting at `base`.
    pub fn resolve(
        &self,
        base: Option<u32>,
        k: usize,
        default: f64,
        unit: Unit,
    ) -> ColrResult<Resolved> {
        let Some(base) = base else {
            return Ok(Resolved::Plain(default));
        };
        let idx = base as usize + k;
        let mapped = *self.index_map.get(idx).ok_or_else(|| {
            ColrError::lookup(format!(
                "delta-set index {idx} is beyond the index map ({} entries)",
                self.index_map.len()
            ))
        })?;
        if mapped == NO_VARIATION_INDEX {
            return Ok(Resolved::Plain(default));
        }
        let (data, row) = self.store.item(mapped)?;

        let mut regions = Vec::with_capacity(row.len());
        for &ri in &data.region_indices {
            let region = self.store.regions.get(usize::from(ri)).ok_or_else(|| {
                ColrError::lookup(format!("variation region {ri} does not exist"))
            })?;
            regions.push(region);
        }

        let mut entries = vec![(String::new(), default)];
        for (region, &delta) in regions.iter().zip(row) {
            if delta == 0 {
                continue;
            }
            let label = self.region_label(&region.axes);
            if label.is_empty() {
                continue;
            }
            // sum every region active at this peak, not just this one
            let peak = region.peak();
            let value = regions
                .iter()
                .zip(row)
                .map(|(r, &d)| r.scalar_at(&peak) * unit.decode(f64::from(d)))
                .sum::<f64>()
                + default;
            entries.push((label, value));
        }
        if entries.len() == 1 {
            return Ok(Resolved::Plain(default));
        }
        Ok(Resolved::Varying(entries))
    }

    fn region_label(&self, tents: &[RegionAxis]) -> String {
        self.axes
            .iter()
            .zip(tents)
            .filter(|(_, t)| !t.is_degenerate())
            .map(|(axis, t)| format!("{}={}", axis.tag, self.number(axis.denormalize(t.peak))))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn number(&self, v: f64) -> String {
        float_to_fixed_to_str(v, self.precision)
    }

    fn value(&self, r: &Resolved) -> String {
        match r {
            Resolved::Plain(v) => self.number(*v),
            Resolved::Varying(entries) => {
                let items: Vec<String> = entries
                    .iter()
                    .map(|(label, v)| format!("{}: {}", quote(label), self.number(*v)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            }
        }
    }

    fn color(&self, index: u16) -> ColrResult<String> {
        if index == FOREGROUND {
            return Ok(quote("foreground"));
        }
        let colors = self.palettes.entry(index)?;
        match colors.as_slice() {
            [] => Err(ColrError::lookup(format!(
                "palette index {index} used but the font has no palettes"
            ))),
            [one] => Ok(quote(&one.to_string())),
            many => {
                let items: Vec<String> = many.iter().map(|c| quote(&c.to_string())).collect();
                Ok(format!("[{}]", items.join(", ")))
            }
        }
    }

    // Every variable field of the node, rendered, in table order.
    fn fields(&self, node: &PaintNode) -> ColrResult<Vec<String>> {
        let base = node.var_index_base();
        node.kind()
            .variable_fields()
            .iter()
            .zip(node.field_values())
            .enumerate()
            .map(|(k, ((_, unit), default))| {
                Ok(self.value(&self.resolve(base, k, default, *unit)?))
            })
            .collect()
    }

    fn stop(&self, stop: &ColorStop) -> ColrResult<(Resolved, String)> {
        let offset = self.resolve(stop.var_index_base, 0, stop.offset, STOP_FIELDS[0].1)?;
        let alpha = self.resolve(stop.var_index_base, 1, stop.alpha, STOP_FIELDS[1].1)?;
        let color = self.color(stop.palette_index)?;
        let text = if alpha == Resolved::Plain(1.0) {
            color
        } else {
            format!("({color}, {})", self.value(&alpha))
        };
        Ok((offset, text))
    }

    fn color_line(&self, line: &ColorLine) -> ColrResult<String> {
        let stops = line
            .stops
            .iter()
            .map(|s| self.stop(s))
            .collect::<ColrResult<Vec<_>>>()?;
        let mut out = match stops.as_slice() {
            [(Resolved::Plain(a), s0), (Resolved::Plain(b), s1)] if *a == 0.0 && *b == 1.0 => {
                format!("ColorLine({s0}, {s1}")
            }
            _ => {
                let pairs: Vec<String> = stops
                    .iter()
                    .map(|(offset, s)| format!("({}, {s})", self.value(offset)))
                    .collect();
                format!("ColorLine([{}]", pairs.join(", "))
            }
        };
        if line.extend != Extend::Pad {
            out.push_str(&format!(", extend={}", quote(line.extend.as_str())));
        }
        out.push(')');
        Ok(out)
    }

    /// Script text for one paint graph.
    pub fn decompile(&self, node: &PaintNode) -> ColrResult<String> {
        let name = node.kind().name();
        let f = self.fields(node)?;
        let args = match node {
            PaintNode::ColrLayers(p) => {
                let layers = p
                    .layers
                    .iter()
                    .map(|l| self.decompile(l))
                    .collect::<ColrResult<Vec<_>>>()?;
                format!("[{}]", layers.join(", "))
            }
            PaintNode::Solid(p) => {
                let color = self.color(p.palette_index)?;
                if f[0] == self.number(1.0) {
                    color
                } else {
                    format!("{color}, alpha={}", f[0])
                }
            }
            PaintNode::LinearGradient(p) => format!(
                "({}, {}), ({}, {}), ({}, {}), {}",
                f[0],
                f[1],
                f[2],
                f[3],
                f[4],
                f[5],
                self.color_line(&p.color_line)?
            ),
            PaintNode::RadialGradient(p) => format!(
                "({}, {}), {}, ({}, {}), {}, {}",
                f[0],
                f[1],
                f[2],
                f[3],
                f[4],
                f[5],
                self.color_line(&p.color_line)?
            ),
            PaintNode::SweepGradient(p) => format!(
                "({}, {}), {}, {}, {}",
                f[0],
                f[1],
                f[2],
                f[3],
                self.color_line(&p.color_line)?
            ),
            PaintNode::Glyph(p) => format!("{}, {}", quote(&p.glyph), self.decompile(&p.paint)?),
            PaintNode::ColrGlyph(p) => quote(&p.glyph),
            PaintNode::Composite(p) => format!(
                "{}, {}, {}",
                quote(p.mode.as_str()),
                self.decompile(&p.source)?,
                self.decompile(&p.backdrop)?
            ),
            PaintNode::Transform(p) => format!(
                "({}), {}",
                f.join(", "),
                self.decompile(&p.paint)?
            ),
            PaintNode::ScaleAroundCenter(p) => format!(
                "{}, {}, ({}, {}), {}",
                f[0],
                f[1],
                f[2],
                f[3],
                self.decompile(&p.paint)?
            ),
            PaintNode::SkewAroundCenter(p) => format!(
                "{}, {}, ({}, {}), {}",
                f[0],
                f[1],
                f[2],
                f[3],
                self.decompile(&p.paint)?
            ),
            PaintNode::ScaleUniformAroundCenter(p) => format!(
                "{}, ({}, {}), {}",
                f[0],
                f[1],
                f[2],
                self.decompile(&p.paint)?
            ),
            PaintNode::RotateAroundCenter(p) => format!(
                "{}, ({}, {}), {}",
                f[0],
                f[1],
                f[2],
                self.decompile(&p.paint)?
            ),
            PaintNode::Translate(_)
            | PaintNode::Scale(_)
            | PaintNode::ScaleUniform(_)
            | PaintNode::Rotate(_)
            | PaintNode::Skew(_) => {
                let child = node.child().ok_or_else(|| {
                    ColrError::consistency(format!("{name} without a child paint"))
                })?;
                let mut args = f;
                args.push(self.decompile(child)?);
                args.join(", ")
            }
        };
        Ok(format!("{name}({args})"))
    }

    /// One `glyphs["name"] = ...` statement per glyph, in name order.
    ///
    /// Glyphs are decompiled in parallel. With `line_width`, each statement
    /// is re-wrapped to that width; text that cannot be re-wrapped is kept
    /// as is.
    #[tracing::instrument(skip(self, glyphs), fields(glyphs = glyphs.len()))]
    pub fn decompile_glyphs(
        &self,
        glyphs: &GlyphPaints,
        line_width: Option<usize>,
    ) -> ColrResult<String> {
        let entries: Vec<(&String, &PaintNode)> = glyphs.iter().collect();
        let lines = entries
            .par_iter()
            .map(|(name, node)| -> ColrResult<String> {
                let line = format!("glyphs[{}] = {}", quote(name), self.decompile(node)?);
                Ok(match line_width {
                    Some(width) => match format_source(&line, width) {
                        Ok(pretty) => pretty,
                        Err(e) => {
                            tracing::debug!(glyph = %name, error = %e, "keeping unformatted text");
                            line
                        }
                    },
                    None => line,
                })
            })
            .collect::<ColrResult<Vec<_>>>()?;

        let mut out = String::new();
        for line in lines {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        Ok(out)
    }
}

/// Double-quoted script string literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
#[path = "../../tests/unit/paint/decompiler.rs"]
mod tests;
