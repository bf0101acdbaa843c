use crate::{
    foundation::{
        core::AxisSet,
        error::{ColrError, ColrResult},
    },
    paint::model::{
        Affine2x3, ColorLine, ColorStop, CompositeMode, Extend, GlyphPaints, PaintColrGlyph,
        PaintColrLayers, PaintComposite, PaintGlyph, PaintKind, PaintLinearGradient, PaintNode,
        PaintRadialGradient, PaintRotate, PaintRotateAroundCenter, PaintScale,
        PaintScaleAroundCenter, PaintScaleUniform, PaintScaleUniformAroundCenter, PaintSkew,
        PaintSkewAroundCenter, PaintSolid, PaintSweepGradient, PaintTransform, PaintTranslate,
        STOP_FIELDS,
    },
    palette::{ColorSpec, Cpal, PaletteManager, PaletteMode},
    table::Colr,
    variation::{
        pool::{VarDescriptor, VariationPool},
        scalar::Scalar,
        store::{OnlineVarStoreBuilder, VarStoreBackend},
    },
};

/// An authored `(x, y)` pair.
pub type Point = (Scalar, Scalar);

/// One authored color stop.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorStopSpec {
    /// Position along the line.
    pub offset: Scalar,
    /// Stop color.
    pub color: ColorSpec,
    /// Alpha multiplier.
    pub alpha: Scalar,
}

impl ColorStopSpec {
    /// An opaque stop.
    pub fn new(offset: impl Into<Scalar>, color: ColorSpec) -> Self {
        Self {
            offset: offset.into(),
            color,
            alpha: Scalar::Constant(1.0),
        }
    }

    /// Replace the alpha.
    pub fn with_alpha(mut self, alpha: impl Into<Scalar>) -> Self {
        self.alpha = alpha.into();
        self
    }
}

/// An authored color line.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorLineSpec {
    /// Stops in authoring order.
    pub stops: Vec<ColorStopSpec>,
    /// Extend mode.
    pub extend: Extend,
}

impl ColorLineSpec {
    /// A line through `stops`.
    pub fn new(stops: Vec<ColorStopSpec>, extend: Extend) -> Self {
        Self { stops, extend }
    }

    /// `start` at offset 0, `end` at offset 1.
    pub fn two_stop(start: ColorStopSpec, end: ColorStopSpec, extend: Extend) -> Self {
        let start = ColorStopSpec {
            offset: Scalar::Constant(0.0),
            ..start
        };
        let end = ColorStopSpec {
            offset: Scalar::Constant(1.0),
            ..end
        };
        Self::new(vec![start, end], extend)
    }

    /// True when any stop offset or alpha varies.
    pub fn needs_variable(&self) -> bool {
        self.stops
            .iter()
            .any(|s| s.offset.is_variable() || s.alpha.is_variable())
    }
}

/// Argument shape of `PaintScale`.
///
/// The shape selects the kind: a center and a y factor give
/// ScaleAroundCenter, a center alone ScaleUniformAroundCenter, no y factor
/// ScaleUniform, and otherwise Scale.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleArgs {
    /// x factor, or the uniform factor.
    pub scale_x: Scalar,
    /// y factor.
    pub scale_y: Option<Scalar>,
    /// Center of scaling.
    pub center: Option<Point>,
}

impl ScaleArgs {
    /// Uniform scale about the origin.
    pub fn uniform(scale: impl Into<Scalar>) -> Self {
        Self {
            scale_x: scale.into(),
            scale_y: None,
            center: None,
        }
    }

    /// Separate x and y factors.
    pub fn xy(scale_x: impl Into<Scalar>, scale_y: impl Into<Scalar>) -> Self {
        Self {
            scale_x: scale_x.into(),
            scale_y: Some(scale_y.into()),
            center: None,
        }
    }

    /// Scale about `center`.
    pub fn around(mut self, center: Point) -> Self {
        self.center = Some(center);
        self
    }
}

/// Everything a compile produces.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    /// The color table.
    pub colr: Colr,
    /// The palettes.
    pub cpal: Cpal,
    /// Non-fatal diagnostics, e.g. legacy variable syntax.
    pub warnings: Vec<String>,
}

/// Builds paint nodes, choosing static or variable formats from the arguments.
///
/// Owns the palette manager and the variation pool of one compile. Numbers
/// given as [`Scalar::Constant`] stay inline in a static format; any
/// per-location argument moves the whole node to its variable format and
/// registers every field of the node, in [`PaintKind::variable_fields`]
/// order, as one bundle.
#[derive(Debug)]
pub struct PaintCompiler<B: VarStoreBackend = OnlineVarStoreBuilder> {
    palette: PaletteManager,
    pool: VariationPool<B>,
}

impl PaintCompiler {
    /// Compiler over `axes` with the in-memory variation store.
    pub fn new(axes: AxisSet) -> Self {
        Self::with_pool(VariationPool::new(axes))
    }
}

impl<B: VarStoreBackend> PaintCompiler<B> {
    /// Compiler around an existing pool.
    pub fn with_pool(pool: VariationPool<B>) -> Self {
        Self {
            palette: PaletteManager::new(),
            pool,
        }
    }

    /// Active axes.
    pub fn axes(&self) -> &AxisSet {
        self.pool.axes()
    }

    /// The variation pool.
    pub fn pool(&self) -> &VariationPool<B> {
        &self.pool
    }

    /// The palette manager.
    pub fn palette(&self) -> &PaletteManager {
        &self.palette
    }

    /// Declare an explicit palette.
    pub fn set_palette(&mut self, entries: Vec<Vec<String>>) -> ColrResult<()> {
        self.palette.set_explicit(entries)
    }

    /// Flag a palette slot as light or dark.
    pub fn set_palette_flags(&mut self, slot: usize, mode: PaletteMode) -> ColrResult<()> {
        self.palette.set_slot_flags(slot, mode)
    }

    // Constants are range checked and kept inline; otherwise the whole list
    // is registered and the node gets a base offset.
    fn fields(
        &mut self,
        kind: PaintKind,
        values: Vec<Scalar>,
        force_variable: bool,
    ) -> ColrResult<(Vec<f64>, Option<u32>)> {
        let table = kind.variable_fields();
        debug_assert_eq!(table.len(), values.len());
        let constants: Option<Vec<f64>> = values.iter().map(Scalar::as_constant).collect();
        if let (Some(constants), false) = (constants, force_variable) {
            for ((name, unit), v) in table.iter().zip(&constants) {
                unit.encode(*v).map_err(|e| {
                    ColrError::range(format!("{} {name}: {}", kind.name(), range_detail(&e)))
                })?;
            }
            return Ok((constants, None));
        }

        let descriptors = table
            .iter()
            .zip(values)
            .map(|((name, unit), value)| VarDescriptor::new(*name, value, *unit))
            .collect();
        let bundle = self.pool.register(descriptors)?;
        let values = bundle.values.into_iter().map(|(_, v)| v).collect();
        Ok((values, Some(bundle.base)))
    }

    // A variable gradient always carries a variable line, so every stop gets a base.
    fn color_line(&mut self, line: &ColorLineSpec, variable: bool) -> ColrResult<ColorLine> {
        if line.stops.is_empty() {
            return Err(ColrError::validation("a color line needs at least one stop"));
        }
        let variable = variable || line.needs_variable();
        let mut stops = Vec::with_capacity(line.stops.len());
        for stop in &line.stops {
            let (offset, alpha, var_index_base) = if variable {
                let bundle = self.pool.register(vec![
                    VarDescriptor::new(STOP_FIELDS[0].0, stop.offset.clone(), STOP_FIELDS[0].1),
                    VarDescriptor::new(STOP_FIELDS[1].0, stop.alpha.clone(), STOP_FIELDS[1].1),
                ])?;
                (
                    bundle.value(STOP_FIELDS[0].0)?,
                    bundle.value(STOP_FIELDS[1].0)?,
                    Some(bundle.base),
                )
            } else {
                let (offset, alpha) = match (stop.offset.as_constant(), stop.alpha.as_constant()) {
                    (Some(o), Some(a)) => (o, a),
                    _ => return Err(ColrError::validation("static color stop with variable value")),
                };
                for ((name, unit), v) in STOP_FIELDS.iter().zip([offset, alpha]) {
                    unit.encode(v).map_err(|e| {
                        ColrError::range(format!("ColorStop {name}: {}", range_detail(&e)))
                    })?;
                }
                (offset, alpha, None)
            };
            stops.push(ColorStop {
                offset,
                palette_index: self.palette.index_of(&stop.color)?,
                alpha,
                var_index_base,
            });
        }
        Ok(ColorLine {
            extend: line.extend,
            stops,
        })
    }

    /// Format 1.
    pub fn colr_layers(&mut self, layers: Vec<PaintNode>) -> ColrResult<PaintNode> {
        if layers.is_empty() {
            return Err(ColrError::validation("PaintColrLayers needs at least one layer"));
        }
        Ok(PaintNode::ColrLayers(PaintColrLayers { layers }))
    }

    /// Formats 2 and 3.
    pub fn solid(&mut self, color: &ColorSpec, alpha: impl Into<Scalar>) -> ColrResult<PaintNode> {
        let (v, var_index_base) = self.fields(PaintKind::Solid, vec![alpha.into()], false)?;
        Ok(PaintNode::Solid(PaintSolid {
            palette_index: self.palette.index_of(color)?,
            alpha: v[0],
            var_index_base,
        }))
    }

    /// Formats 4 and 5.
    pub fn linear_gradient(
        &mut self,
        p0: Point,
        p1: Point,
        p2: Point,
        line: &ColorLineSpec,
    ) -> ColrResult<PaintNode> {
        let (v, var_index_base) = self.fields(
            PaintKind::LinearGradient,
            vec![p0.0, p0.1, p1.0, p1.1, p2.0, p2.1],
            line.needs_variable(),
        )?;
        Ok(PaintNode::LinearGradient(PaintLinearGradient {
            color_line: self.color_line(line, var_index_base.is_some())?,
            x0: v[0],
            y0: v[1],
            x1: v[2],
            y1: v[3],
            x2: v[4],
            y2: v[5],
            var_index_base,
        }))
    }

    /// Formats 6 and 7.
    pub fn radial_gradient(
        &mut self,
        c0: Point,
        r0: impl Into<Scalar>,
        c1: Point,
        r1: impl Into<Scalar>,
        line: &ColorLineSpec,
    ) -> ColrResult<PaintNode> {
        let (v, var_index_base) = self.fields(
            PaintKind::RadialGradient,
            vec![c0.0, c0.1, r0.into(), c1.0, c1.1, r1.into()],
            line.needs_variable(),
        )?;
        Ok(PaintNode::RadialGradient(PaintRadialGradient {
            color_line: self.color_line(line, var_index_base.is_some())?,
            x0: v[0],
            y0: v[1],
            r0: v[2],
            x1: v[3],
            y1: v[4],
            r1: v[5],
            var_index_base,
        }))
    }

    /// Formats 8 and 9. Angles in degrees.
    pub fn sweep_gradient(
        &mut self,
        center: Point,
        start_angle: impl Into<Scalar>,
        end_angle: impl Into<Scalar>,
        line: &ColorLineSpec,
    ) -> ColrResult<PaintNode> {
        let (v, var_index_base) = self.fields(
            PaintKind::SweepGradient,
            vec![center.0, center.1, start_angle.into(), end_angle.into()],
            line.needs_variable(),
        )?;
        Ok(PaintNode::SweepGradient(PaintSweepGradient {
            color_line: self.color_line(line, var_index_base.is_some())?,
            center_x: v[0],
            center_y: v[1],
            start_angle: v[2],
            end_angle: v[3],
            var_index_base,
        }))
    }

    /// Format 10.
    pub fn glyph(&mut self, glyph: &str, paint: PaintNode) -> ColrResult<PaintNode> {
        Ok(PaintNode::Glyph(PaintGlyph {
            glyph: glyph_name(glyph)?,
            paint: Box::new(paint),
        }))
    }

    /// Format 11.
    pub fn colr_glyph(&mut self, glyph: &str) -> ColrResult<PaintNode> {
        Ok(PaintNode::ColrGlyph(PaintColrGlyph {
            glyph: glyph_name(glyph)?,
        }))
    }

    /// Formats 12 and 13. `matrix` is `[xx, yx, xy, yy, dx, dy]`.
    pub fn transform(&mut self, matrix: [Scalar; 6], paint: PaintNode) -> ColrResult<PaintNode> {
        let (v, var_index_base) = self.fields(PaintKind::Transform, matrix.to_vec(), false)?;
        Ok(PaintNode::Transform(PaintTransform {
            paint: Box::new(paint),
            transform: Affine2x3::from_array([v[0], v[1], v[2], v[3], v[4], v[5]]),
            var_index_base,
        }))
    }

    /// Formats 14 and 15.
    pub fn translate(
        &mut self,
        dx: impl Into<Scalar>,
        dy: impl Into<Scalar>,
        paint: PaintNode,
    ) -> ColrResult<PaintNode> {
        let (v, var_index_base) =
            self.fields(PaintKind::Translate, vec![dx.into(), dy.into()], false)?;
        Ok(PaintNode::Translate(PaintTranslate {
            paint: Box::new(paint),
            dx: v[0],
            dy: v[1],
            var_index_base,
        }))
    }

    /// Any of the four scale kinds, picked from the shape of `args`.
    pub fn scale(&mut self, args: ScaleArgs, paint: PaintNode) -> ColrResult<PaintNode> {
        match (args.scale_y, args.center) {
            (Some(y), Some(center)) => self.scale_around_center(args.scale_x, y, center, paint),
            (None, Some(center)) => self.scale_uniform_around_center(args.scale_x, center, paint),
            (None, None) => self.scale_uniform(args.scale_x, paint),
            (Some(y), None) => {
                let (v, var_index_base) =
                    self.fields(PaintKind::Scale, vec![args.scale_x, y], false)?;
                Ok(PaintNode::Scale(PaintScale {
                    paint: Box::new(paint),
                    scale_x: v[0],
                    scale_y: v[1],
                    var_index_base,
                }))
            }
        }
    }

    /// Formats 18 and 19.
    pub fn scale_around_center(
        &mut self,
        scale_x: impl Into<Scalar>,
        scale_y: impl Into<Scalar>,
        center: Point,
        paint: PaintNode,
    ) -> ColrResult<PaintNode> {
        let (v, var_index_base) = self.fields(
            PaintKind::ScaleAroundCenter,
            vec![scale_x.into(), scale_y.into(), center.0, center.1],
            false,
        )?;
        Ok(PaintNode::ScaleAroundCenter(PaintScaleAroundCenter {
            paint: Box::new(paint),
            scale_x: v[0],
            scale_y: v[1],
            center_x: v[2],
            center_y: v[3],
            var_index_base,
        }))
    }

    /// Formats 20 and 21.
    pub fn scale_uniform(
        &mut self,
        scale: impl Into<Scalar>,
        paint: PaintNode,
    ) -> ColrResult<PaintNode> {
        let (v, var_index_base) = self.fields(PaintKind::ScaleUniform, vec![scale.into()], false)?;
        Ok(PaintNode::ScaleUniform(PaintScaleUniform {
            paint: Box::new(paint),
            scale: v[0],
            var_index_base,
        }))
    }

    /// Formats 22 and 23.
    pub fn scale_uniform_around_center(
        &mut self,
        scale: impl Into<Scalar>,
        center: Point,
        paint: PaintNode,
    ) -> ColrResult<PaintNode> {
        let (v, var_index_base) = self.fields(
            PaintKind::ScaleUniformAroundCenter,
            vec![scale.into(), center.0, center.1],
            false,
        )?;
        Ok(PaintNode::ScaleUniformAroundCenter(
            PaintScaleUniformAroundCenter {
                paint: Box::new(paint),
                scale: v[0],
                center_x: v[1],
                center_y: v[2],
                var_index_base,
            },
        ))
    }

    /// Formats 24 and 25, or 26 and 27 when a center is given.
    pub fn rotate(
        &mut self,
        angle: impl Into<Scalar>,
        center: Option<Point>,
        paint: PaintNode,
    ) -> ColrResult<PaintNode> {
        if let Some(center) = center {
            return self.rotate_around_center(angle, center, paint);
        }
        let (v, var_index_base) = self.fields(PaintKind::Rotate, vec![angle.into()], false)?;
        Ok(PaintNode::Rotate(PaintRotate {
            paint: Box::new(paint),
            angle: v[0],
            var_index_base,
        }))
    }

    /// Formats 26 and 27.
    pub fn rotate_around_center(
        &mut self,
        angle: impl Into<Scalar>,
        center: Point,
        paint: PaintNode,
    ) -> ColrResult<PaintNode> {
        let (v, var_index_base) = self.fields(
            PaintKind::RotateAroundCenter,
            vec![angle.into(), center.0, center.1],
            false,
        )?;
        Ok(PaintNode::RotateAroundCenter(PaintRotateAroundCenter {
            paint: Box::new(paint),
            angle: v[0],
            center_x: v[1],
            center_y: v[2],
            var_index_base,
        }))
    }

    /// Formats 28 and 29, or 30 and 31 when a center is given.
    pub fn skew(
        &mut self,
        x_angle: impl Into<Scalar>,
        y_angle: impl Into<Scalar>,
        center: Option<Point>,
        paint: PaintNode,
    ) -> ColrResult<PaintNode> {
        if let Some(center) = center {
            return self.skew_around_center(x_angle, y_angle, center, paint);
        }
        let (v, var_index_base) =
            self.fields(PaintKind::Skew, vec![x_angle.into(), y_angle.into()], false)?;
        Ok(PaintNode::Skew(PaintSkew {
            paint: Box::new(paint),
            x_skew_angle: v[0],
            y_skew_angle: v[1],
            var_index_base,
        }))
    }

    /// Formats 30 and 31.
    pub fn skew_around_center(
        &mut self,
        x_angle: impl Into<Scalar>,
        y_angle: impl Into<Scalar>,
        center: Point,
        paint: PaintNode,
    ) -> ColrResult<PaintNode> {
        let (v, var_index_base) = self.fields(
            PaintKind::SkewAroundCenter,
            vec![x_angle.into(), y_angle.into(), center.0, center.1],
            false,
        )?;
        Ok(PaintNode::SkewAroundCenter(PaintSkewAroundCenter {
            paint: Box::new(paint),
            x_skew_angle: v[0],
            y_skew_angle: v[1],
            center_x: v[2],
            center_y: v[3],
            var_index_base,
        }))
    }

    /// Format 32.
    pub fn composite(
        &mut self,
        mode: &str,
        source: PaintNode,
        backdrop: PaintNode,
    ) -> ColrResult<PaintNode> {
        Ok(PaintNode::Composite(PaintComposite {
            mode: CompositeMode::parse(mode)?,
            source: Box::new(source),
            backdrop: Box::new(backdrop),
        }))
    }

    /// Finalize the pool and palette around the compiled glyphs.
    pub fn finish(mut self, glyphs: GlyphPaints) -> ColrResult<CompileOutput> {
        let var_store = self.pool.finalize()?;
        let cpal = self.palette.finalize_entries()?;
        let warnings = self.pool.take_warnings();
        Ok(CompileOutput {
            colr: Colr {
                glyphs,
                var_store,
                var_index_map: self.pool.delta_set().to_vec(),
            },
            cpal,
            warnings,
        })
    }
}

fn glyph_name(glyph: &str) -> ColrResult<String> {
    if glyph.is_empty() {
        return Err(ColrError::validation("glyph name must be non-empty"));
    }
    Ok(glyph.to_owned())
}

// "range error: x" -> "x", so re-wrapping does not stutter.
fn range_detail(e: &ColrError) -> String {
    match e {
        ColrError::Range(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/compiler.rs"]
mod tests;
