use std::collections::HashMap;

use tracing::debug;

use crate::{
    foundation::{
        core::{AxisSet, Color, UserLocation},
        error::{ColrError, ColrResult},
    },
    paint::{
        compiler::{ColorLineSpec, ColorStopSpec, CompileOutput, PaintCompiler, Point, ScaleArgs},
        model::{Extend, GlyphPaints, PaintNode},
    },
    palette::{ColorSpec, PaletteMode},
    script::{
        ast::{BinaryOp, Expr, ExprKind, Stmt, UnaryOp},
        error::ScriptError,
    },
    variation::scalar::Scalar,
};

/// Name of the pre-seeded output mapping.
pub(crate) const GLYPHS: &str = "glyphs";

/// A runtime value of the paint script language.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    None,
    Tuple(Vec<Value>),
    List(Vec<Value>),
    /// Insertion-ordered; keys compare by value.
    Dict(Vec<(Value, Value)>),
    Paint(PaintNode),
    ColorLine(ColorLineSpec),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Bool(_) => "boolean",
            Self::None => "None",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Paint(_) => "paint",
            Self::ColorLine(_) => "ColorLine",
        }
    }
}

type Operation = fn(&mut PaintCompiler, Args) -> ColrResult<Value>;

/// Every callable the script can see.
static OPERATIONS: &[(&str, Operation)] = &[
    ("PaintColrLayers", op_colr_layers),
    ("PaintSolid", op_solid),
    ("PaintLinearGradient", op_linear_gradient),
    ("PaintRadialGradient", op_radial_gradient),
    ("PaintSweepGradient", op_sweep_gradient),
    ("PaintGlyph", op_glyph),
    ("PaintColrGlyph", op_colr_glyph),
    ("PaintTransform", op_transform),
    ("PaintTranslate", op_translate),
    ("PaintScale", op_scale),
    ("PaintScaleAroundCenter", op_scale_around_center),
    ("PaintScaleUniform", op_scale_uniform),
    ("PaintScaleUniformAroundCenter", op_scale_uniform_around_center),
    ("PaintRotate", op_rotate),
    ("PaintRotateAroundCenter", op_rotate_around_center),
    ("PaintSkew", op_skew),
    ("PaintSkewAroundCenter", op_skew_around_center),
    ("PaintComposite", op_composite),
    ("ColorLine", op_color_line),
    ("SetPalette", op_set_palette),
    ("SetPaletteFlags", op_set_palette_flags),
];

fn operation(name: &str) -> Option<(&'static str, Operation)> {
    OPERATIONS.iter().find(|(n, _)| *n == name).copied()
}

/// Executes parsed statements against a paint compiler.
pub(crate) struct Interpreter {
    compiler: PaintCompiler,
    env: HashMap<String, Value>,
}

impl Interpreter {
    pub(crate) fn new(axes: AxisSet) -> Self {
        let mut env = HashMap::new();
        env.insert(GLYPHS.to_owned(), Value::Dict(Vec::new()));
        Self {
            compiler: PaintCompiler::new(axes),
            env,
        }
    }

    pub(crate) fn run(&mut self, program: &[Stmt]) -> ColrResult<()> {
        debug!(statements = program.len(), "running paint script");
        for stmt in program {
            self.exec(stmt)?;
        }
        Ok(())
    }

    /// The glyph mapping as the script left it, compiled and finalized.
    pub(crate) fn finish(mut self) -> ColrResult<CompileOutput> {
        let Some(Value::Dict(entries)) = self.env.remove(GLYPHS) else {
            return Err(ColrError::validation(format!(
                "'{GLYPHS}' must remain a dict of glyph name to paint"
            )));
        };
        let mut glyphs = GlyphPaints::new();
        for (name, paint) in entries {
            match (name, paint) {
                (Value::Str(name), Value::Paint(node)) => {
                    glyphs.insert(name, node);
                }
                (Value::Str(name), other) => {
                    return Err(ColrError::validation(format!(
                        "glyphs[\"{name}\"] must be a paint, found {}",
                        other.type_name()
                    )));
                }
                (other, _) => {
                    return Err(ColrError::validation(format!(
                        "glyph names must be strings, found {}",
                        other.type_name()
                    )));
                }
            }
        }
        debug!(glyphs = glyphs.len(), "paint script finished");
        self.compiler.finish(glyphs)
    }

    fn exec(&mut self, stmt: &Stmt) -> ColrResult<()> {
        match stmt {
            Stmt::Assign { name, value } => {
                if operation(name).is_some() {
                    return Err(ScriptError::new(
                        value.span.start,
                        format!("'{name}' is a built-in operation and cannot be reassigned"),
                    )
                    .into());
                }
                let v = self.eval(value)?;
                self.env.insert(name.clone(), v);
            }
            Stmt::SetItem {
                target,
                index,
                value,
            } => {
                let ExprKind::Name(name) = &target.kind else {
                    return Err(ScriptError::new(
                        target.span.start,
                        "item assignment needs a named dict or list",
                    )
                    .into());
                };
                let key = self.eval(index)?;
                let v = self.eval(value)?;
                let slot = self.env.get_mut(name).ok_or_else(|| {
                    ScriptError::new(target.span.start, format!("name '{name}' is not defined"))
                })?;
                match slot {
                    Value::Dict(entries) => match entries.iter_mut().find(|(k, _)| *k == key) {
                        Some(entry) => entry.1 = v,
                        None => entries.push((key, v)),
                    },
                    Value::List(items) => {
                        let i = list_index(&key, items.len())
                            .map_err(|m| ScriptError::new(index.span.start, m))?;
                        items[i] = v;
                    }
                    other => {
                        return Err(ScriptError::new(
                            target.span.start,
                            format!("{} does not support item assignment", other.type_name()),
                        )
                        .into());
                    }
                }
            }
            Stmt::Expr(e) => {
                self.eval(e)?;
            }
        }
        Ok(())
    }

    fn eval(&mut self, e: &Expr) -> ColrResult<Value> {
        let at = e.span.start;
        Ok(match &e.kind {
            ExprKind::Number(v) => Value::Number(*v),
            ExprKind::Str(s) => Value::Str(s.clone()),
            ExprKind::Bool(b) => Value::Bool(*b),
            ExprKind::None => Value::None,
            ExprKind::Name(name) => match self.env.get(name) {
                Some(v) => v.clone(),
                None if operation(name).is_some() => {
                    return Err(ScriptError::new(
                        at,
                        format!("operation '{name}' must be called"),
                    )
                    .into());
                }
                None => {
                    return Err(
                        ScriptError::new(at, format!("name '{name}' is not defined")).into(),
                    );
                }
            },
            ExprKind::Tuple(items) => Value::Tuple(self.eval_all(items)?),
            ExprKind::List(items) => Value::List(self.eval_all(items)?),
            ExprKind::Dict(entries) => {
                let mut out: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    let k = self.eval(k)?;
                    let v = self.eval(v)?;
                    // later duplicates win, keeping the first position
                    match out.iter_mut().find(|(existing, _)| *existing == k) {
                        Some(entry) => entry.1 = v,
                        None => out.push((k, v)),
                    }
                }
                Value::Dict(out)
            }
            ExprKind::Unary { op, expr } => match (op, self.eval(expr)?) {
                (UnaryOp::Neg, Value::Number(v)) => Value::Number(-v),
                (UnaryOp::Pos, Value::Number(v)) => Value::Number(v),
                (_, other) => {
                    return Err(ScriptError::new(
                        at,
                        format!("bad operand type for unary operator: {}", other.type_name()),
                    )
                    .into());
                }
            },
            ExprKind::Binary { op, left, right } => {
                let l = self.eval(left)?;
                let r = self.eval(right)?;
                binary(*op, l, r).map_err(|m| ScriptError::new(at, m))?
            }
            ExprKind::Call { func, args, kwargs } => {
                let Some((name, op)) = operation(func) else {
                    return Err(
                        ScriptError::new(at, format!("unknown operation '{func}'")).into(),
                    );
                };
                let positional = self.eval_all(args)?;
                let mut keywords = Vec::with_capacity(kwargs.len());
                for (k, v) in kwargs {
                    keywords.push((k.clone(), self.eval(v)?));
                }
                op(&mut self.compiler, Args::new(name, positional, keywords))?
            }
            ExprKind::Index { target, index } => {
                let container = self.eval(target)?;
                let key = self.eval(index)?;
                match container {
                    Value::Dict(entries) => entries
                        .into_iter()
                        .find(|(k, _)| *k == key)
                        .map(|(_, v)| v)
                        .ok_or_else(|| ScriptError::new(at, format!("key {key:?} not found")))?,
                    Value::List(items) | Value::Tuple(items) => {
                        let i = list_index(&key, items.len())
                            .map_err(|m| ScriptError::new(index.span.start, m))?;
                        items.into_iter().nth(i).unwrap_or(Value::None)
                    }
                    other => {
                        return Err(ScriptError::new(
                            at,
                            format!("{} is not subscriptable", other.type_name()),
                        )
                        .into());
                    }
                }
            }
        })
    }

    fn eval_all(&mut self, items: &[Expr]) -> ColrResult<Vec<Value>> {
        items.iter().map(|e| self.eval(e)).collect()
    }
}

fn binary(op: BinaryOp, l: Value, r: Value) -> Result<Value, String> {
    Ok(match (op, l, r) {
        (BinaryOp::Add, Value::Number(a), Value::Number(b)) => Value::Number(a + b),
        (BinaryOp::Sub, Value::Number(a), Value::Number(b)) => Value::Number(a - b),
        (BinaryOp::Mul, Value::Number(a), Value::Number(b)) => Value::Number(a * b),
        (BinaryOp::Div, Value::Number(_), Value::Number(b)) if b == 0.0 => {
            return Err("division by zero".to_owned());
        }
        (BinaryOp::Div, Value::Number(a), Value::Number(b)) => Value::Number(a / b),
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => Value::Str(a + &b),
        (BinaryOp::Add, Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Value::List(a)
        }
        (BinaryOp::Add, Value::Tuple(mut a), Value::Tuple(b)) => {
            a.extend(b);
            Value::Tuple(a)
        }
        (op, l, r) => {
            return Err(format!(
                "unsupported operand types for {}: {} and {}",
                op.symbol(),
                l.type_name(),
                r.type_name()
            ));
        }
    })
}

// Python-style index, negatives counting from the end.
fn list_index(key: &Value, len: usize) -> Result<usize, String> {
    let Value::Number(v) = key else {
        return Err(format!("list indices must be integers, not {}", key.type_name()));
    };
    if v.fract() != 0.0 {
        return Err(format!("list index {v} is not an integer"));
    }
    let i = if *v < 0.0 { len as f64 + v } else { *v };
    if i < 0.0 || i >= len as f64 {
        return Err(format!("list index {v} out of range"));
    }
    Ok(i as usize)
}

/// Call arguments, consumed as the operation reads them.
struct Args {
    op: &'static str,
    positional: Vec<Option<Value>>,
    keywords: Vec<(String, Value)>,
}

impl Args {
    fn new(op: &'static str, positional: Vec<Value>, keywords: Vec<(String, Value)>) -> Self {
        Self {
            op,
            positional: positional.into_iter().map(Some).collect(),
            keywords,
        }
    }

    // Positional slot `pos` or keyword `name`. `None` counts as absent.
    fn take(&mut self, pos: Option<usize>, name: &str) -> ColrResult<Option<Value>> {
        let keyword = self
            .keywords
            .iter()
            .position(|(k, _)| k == name)
            .map(|i| self.keywords.remove(i).1);
        let positional = pos
            .and_then(|p| self.positional.get_mut(p))
            .and_then(Option::take);
        let present = |v: Option<Value>| v.filter(|v| *v != Value::None);
        match (present(positional), present(keyword)) {
            (Some(_), Some(_)) => Err(ColrError::validation(format!(
                "{}() got multiple values for argument '{name}'",
                self.op
            ))),
            (v, None) | (None, v) => Ok(v),
        }
    }

    fn required(&mut self, pos: usize, name: &str) -> ColrResult<Value> {
        self.take(Some(pos), name)?.ok_or_else(|| {
            ColrError::validation(format!(
                "{}() missing required argument '{name}'",
                self.op
            ))
        })
    }

    fn take_positional(&mut self) -> Vec<Value> {
        self.positional.drain(..).flatten().collect()
    }

    // Every argument must have been read.
    fn done(&self) -> ColrResult<()> {
        if let Some((k, _)) = self.keywords.first() {
            return Err(ColrError::validation(format!(
                "{}() got an unexpected keyword argument '{k}'",
                self.op
            )));
        }
        let extra = self.positional.iter().filter(|v| v.is_some()).count();
        if extra > 0 {
            return Err(ColrError::validation(format!(
                "{}() got {extra} more positional argument(s) than it takes",
                self.op
            )));
        }
        Ok(())
    }

    fn mismatch(&self, expected: &str, found: &Value) -> ColrError {
        ColrError::validation(format!(
            "{}(): expected {expected}, found {}",
            self.op,
            found.type_name()
        ))
    }

    fn number(&self, v: Value) -> ColrResult<f64> {
        match v {
            Value::Number(n) => Ok(n),
            other => Err(self.mismatch("a number", &other)),
        }
    }

    fn string(&self, v: Value) -> ColrResult<String> {
        match v {
            Value::Str(s) => Ok(s),
            other => Err(self.mismatch("a string", &other)),
        }
    }

    fn paint(&self, v: Value) -> ColrResult<PaintNode> {
        match v {
            Value::Paint(p) => Ok(p),
            other => Err(self.mismatch("a paint", &other)),
        }
    }

    fn scalar(&self, v: Value) -> ColrResult<Scalar> {
        match v {
            Value::Number(n) => Ok(Scalar::Constant(n)),
            Value::Str(s) => Ok(Scalar::Legacy(s)),
            Value::Dict(entries) => {
                let mut out = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    out.push((self.location(k)?, self.number(v)?));
                }
                Ok(Scalar::Locations(out))
            }
            other => Err(self.mismatch("a number or a location dict", &other)),
        }
    }

    // `(("wght", 100), ...)`, a bare `("wght", 100)` pair, or `"wght=100,wdth=50"`.
    fn location(&self, key: Value) -> ColrResult<UserLocation> {
        match key {
            Value::Str(s) => parse_location(&s).ok_or_else(|| {
                ColrError::validation(format!(
                    "{}(): location \"{s}\" must look like \"tag=value,tag=value\"",
                    self.op
                ))
            }),
            Value::Tuple(items) | Value::List(items) => {
                if matches!(items.as_slice(), [Value::Str(_), Value::Number(_)]) {
                    return Ok(vec![self.axis_pair(Value::Tuple(items))?]);
                }
                items.into_iter().map(|p| self.axis_pair(p)).collect()
            }
            other => Err(self.mismatch("a location key", &other)),
        }
    }

    fn axis_pair(&self, pair: Value) -> ColrResult<(String, f64)> {
        match pair {
            Value::Tuple(items) | Value::List(items) => match <[Value; 2]>::try_from(items) {
                Ok([Value::Str(tag), Value::Number(v)]) => Ok((tag, v)),
                Ok([tag, _]) => Err(self.mismatch("a (tag, value) pair", &tag)),
                Err(items) => Err(self.mismatch("a (tag, value) pair", &Value::Tuple(items))),
            },
            other => Err(self.mismatch("a (tag, value) pair", &other)),
        }
    }

    fn point(&self, v: Value) -> ColrResult<Point> {
        match v {
            Value::Tuple(items) | Value::List(items) => match <[Value; 2]>::try_from(items) {
                Ok([x, y]) => Ok((self.scalar(x)?, self.scalar(y)?)),
                Err(items) => Err(self.mismatch("an (x, y) point", &Value::Tuple(items))),
            },
            other => Err(self.mismatch("an (x, y) point", &other)),
        }
    }

    fn color(&self, v: Value) -> ColrResult<ColorSpec> {
        match v {
            Value::Str(s) => ColorSpec::parse(&s),
            Value::Number(n) if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => {
                Ok(ColorSpec::Index(n as u32))
            }
            Value::List(items) | Value::Tuple(items) if !items.is_empty() => {
                let colors = items
                    .into_iter()
                    .map(|c| Color::parse_hex(&self.string(c)?))
                    .collect::<ColrResult<Vec<_>>>()?;
                Ok(ColorSpec::Literal(colors))
            }
            other => Err(self.mismatch("a color", &other)),
        }
    }

    // A stop is a color, or a `(color, alpha)` pair.
    fn stop(&self, offset: Scalar, v: Value) -> ColrResult<ColorStopSpec> {
        let pair = match &v {
            Value::Tuple(items) => items.len() == 2,
            // lists of strings are multi-slot colors
            Value::List(items) => items.len() == 2 && !matches!(items[1], Value::Str(_)),
            _ => false,
        };
        if pair {
            if let Value::Tuple(items) | Value::List(items) = v {
                if let Ok([color, alpha]) = <[Value; 2]>::try_from(items) {
                    return Ok(ColorStopSpec::new(offset, self.color(color)?)
                        .with_alpha(self.scalar(alpha)?));
                }
            }
            return Err(ColrError::validation(format!(
                "{}(): malformed color stop",
                self.op
            )));
        }
        Ok(ColorStopSpec::new(offset, self.color(v)?))
    }

    fn color_line(&self, v: Value) -> ColrResult<ColorLineSpec> {
        match v {
            Value::ColorLine(line) => Ok(line),
            other => Err(self.mismatch("a ColorLine", &other)),
        }
    }
}

fn parse_location(s: &str) -> Option<UserLocation> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|pair| {
            let (tag, v) = pair.split_once('=')?;
            Some((tag.trim().to_owned(), v.trim().parse::<f64>().ok()?))
        })
        .collect()
}

fn op_colr_layers(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let layers = a.required(0, "layers")?;
    a.done()?;
    let layers = match layers {
        Value::List(items) | Value::Tuple(items) => items
            .into_iter()
            .map(|l| a.paint(l))
            .collect::<ColrResult<Vec<_>>>()?,
        other => return Err(a.mismatch("a list of paints", &other)),
    };
    Ok(Value::Paint(c.colr_layers(layers)?))
}

fn op_solid(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let color = a.required(0, "color")?;
    let alpha = a.take(Some(1), "alpha")?;
    a.done()?;
    let alpha = match alpha {
        Some(v) => a.scalar(v)?,
        None => Scalar::Constant(1.0),
    };
    Ok(Value::Paint(c.solid(&a.color(color)?, alpha)?))
}

fn op_linear_gradient(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let p0 = a.required(0, "pt0")?;
    let p1 = a.required(1, "pt1")?;
    let p2 = a.required(2, "pt2")?;
    let line = a.required(3, "colorline")?;
    a.done()?;
    let node = c.linear_gradient(
        a.point(p0)?,
        a.point(p1)?,
        a.point(p2)?,
        &a.color_line(line)?,
    )?;
    Ok(Value::Paint(node))
}

fn op_radial_gradient(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let p0 = a.required(0, "pt0")?;
    let r0 = a.required(1, "rad0")?;
    let p1 = a.required(2, "pt1")?;
    let r1 = a.required(3, "rad1")?;
    let line = a.required(4, "colorline")?;
    a.done()?;
    let node = c.radial_gradient(
        a.point(p0)?,
        a.scalar(r0)?,
        a.point(p1)?,
        a.scalar(r1)?,
        &a.color_line(line)?,
    )?;
    Ok(Value::Paint(node))
}

fn op_sweep_gradient(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let center = a.required(0, "pt")?;
    let start = a.required(1, "startAngle")?;
    let end = a.required(2, "endAngle")?;
    let line = a.required(3, "colorline")?;
    a.done()?;
    let node = c.sweep_gradient(
        a.point(center)?,
        a.scalar(start)?,
        a.scalar(end)?,
        &a.color_line(line)?,
    )?;
    Ok(Value::Paint(node))
}

fn op_glyph(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let glyph = a.required(0, "glyph")?;
    let paint = a.required(1, "paint")?;
    a.done()?;
    Ok(Value::Paint(c.glyph(&a.string(glyph)?, a.paint(paint)?)?))
}

fn op_colr_glyph(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let glyph = a.required(0, "glyph")?;
    a.done()?;
    Ok(Value::Paint(c.colr_glyph(&a.string(glyph)?)?))
}

fn op_transform(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let matrix = a.required(0, "matrix")?;
    let paint = a.required(1, "paint")?;
    a.done()?;
    let matrix = match matrix {
        Value::Tuple(items) | Value::List(items) if items.len() == 6 => {
            let m = items
                .into_iter()
                .map(|v| a.scalar(v))
                .collect::<ColrResult<Vec<_>>>()?;
            <[Scalar; 6]>::try_from(m)
                .map_err(|_| ColrError::validation("PaintTransform(): matrix needs six values"))?
        }
        other => return Err(a.mismatch("a six-value matrix", &other)),
    };
    Ok(Value::Paint(c.transform(matrix, a.paint(paint)?)?))
}

fn op_translate(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let dx = a.required(0, "dx")?;
    let dy = a.required(1, "dy")?;
    let paint = a.required(2, "paint")?;
    a.done()?;
    Ok(Value::Paint(c.translate(
        a.scalar(dx)?,
        a.scalar(dy)?,
        a.paint(paint)?,
    )?))
}

// 1 = paint; 2 = scale, paint; 3 = x, y, paint; 4 = x, y, center, paint.
fn op_scale(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let mut scale_x = a.take(None, "scale_x")?;
    let mut scale_y = a.take(None, "scale_y")?;
    let mut center = a.take(None, "center")?;
    let mut paint = a.take(None, "paint")?;
    let mut pos = a.take_positional().into_iter();
    let understood = match pos.len() {
        0 => true,
        1 if paint.is_none() => {
            paint = pos.next();
            true
        }
        2 if paint.is_none() && scale_x.is_none() => {
            scale_x = pos.next();
            paint = pos.next();
            true
        }
        3 if paint.is_none() && scale_x.is_none() && scale_y.is_none() => {
            scale_x = pos.next();
            scale_y = pos.next();
            paint = pos.next();
            true
        }
        4 if paint.is_none() && scale_x.is_none() && scale_y.is_none() && center.is_none() => {
            scale_x = pos.next();
            scale_y = pos.next();
            center = pos.next();
            paint = pos.next();
            true
        }
        _ => false,
    };
    let (true, Some(scale_x), Some(paint)) = (understood, scale_x, paint) else {
        return Err(ColrError::validation("couldn't understand arguments to PaintScale"));
    };
    a.done()?;
    let args = ScaleArgs {
        scale_x: a.scalar(scale_x)?,
        scale_y: scale_y.map(|v| a.scalar(v)).transpose()?,
        center: center.map(|v| a.point(v)).transpose()?,
    };
    Ok(Value::Paint(c.scale(args, a.paint(paint)?)?))
}

fn op_scale_around_center(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let sx = a.required(0, "scale_x")?;
    let sy = a.required(1, "scale_y")?;
    let center = a.required(2, "center")?;
    let paint = a.required(3, "paint")?;
    a.done()?;
    Ok(Value::Paint(c.scale_around_center(
        a.scalar(sx)?,
        a.scalar(sy)?,
        a.point(center)?,
        a.paint(paint)?,
    )?))
}

fn op_scale_uniform(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let scale = a.required(0, "scale")?;
    let paint = a.required(1, "paint")?;
    a.done()?;
    Ok(Value::Paint(c.scale_uniform(a.scalar(scale)?, a.paint(paint)?)?))
}

fn op_scale_uniform_around_center(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let scale = a.required(0, "scale")?;
    let center = a.required(1, "center")?;
    let paint = a.required(2, "paint")?;
    a.done()?;
    Ok(Value::Paint(c.scale_uniform_around_center(
        a.scalar(scale)?,
        a.point(center)?,
        a.paint(paint)?,
    )?))
}

// 1 = paint; 2 = angle, paint; 3 = angle, center, paint.
fn op_rotate(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let mut angle = a.take(None, "angle")?;
    let mut center = a.take(None, "center")?;
    let mut paint = a.take(None, "paint")?;
    let mut pos = a.take_positional().into_iter();
    let understood = match pos.len() {
        0 => true,
        1 if paint.is_none() => {
            paint = pos.next();
            true
        }
        2 if paint.is_none() && angle.is_none() => {
            angle = pos.next();
            paint = pos.next();
            true
        }
        3 if paint.is_none() && angle.is_none() && center.is_none() => {
            angle = pos.next();
            center = pos.next();
            paint = pos.next();
            true
        }
        _ => false,
    };
    let (true, Some(angle), Some(paint)) = (understood, angle, paint) else {
        return Err(ColrError::validation("couldn't understand arguments to PaintRotate"));
    };
    a.done()?;
    let center = center.map(|v| a.point(v)).transpose()?;
    Ok(Value::Paint(c.rotate(a.scalar(angle)?, center, a.paint(paint)?)?))
}

fn op_rotate_around_center(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let angle = a.required(0, "angle")?;
    let center = a.required(1, "center")?;
    let paint = a.required(2, "paint")?;
    a.done()?;
    Ok(Value::Paint(c.rotate_around_center(
        a.scalar(angle)?,
        a.point(center)?,
        a.paint(paint)?,
    )?))
}

fn op_skew(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let x = a.required(0, "xSkewAngle")?;
    let y = a.required(1, "ySkewAngle")?;
    let paint = a.required(2, "paint")?;
    let center = a.take(Some(3), "center")?;
    a.done()?;
    let center = center.map(|v| a.point(v)).transpose()?;
    Ok(Value::Paint(c.skew(
        a.scalar(x)?,
        a.scalar(y)?,
        center,
        a.paint(paint)?,
    )?))
}

fn op_skew_around_center(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let x = a.required(0, "xSkewAngle")?;
    let y = a.required(1, "ySkewAngle")?;
    let center = a.required(2, "center")?;
    let paint = a.required(3, "paint")?;
    a.done()?;
    Ok(Value::Paint(c.skew_around_center(
        a.scalar(x)?,
        a.scalar(y)?,
        a.point(center)?,
        a.paint(paint)?,
    )?))
}

fn op_composite(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let mode = a.required(0, "mode")?;
    let src = a.required(1, "src")?;
    let dst = a.required(2, "dst")?;
    a.done()?;
    Ok(Value::Paint(c.composite(
        &a.string(mode)?,
        a.paint(src)?,
        a.paint(dst)?,
    )?))
}

// ColorLine({offset: stop, ...}), ColorLine([(offset, stop), ...]) or ColorLine(start, end).
fn op_color_line(_: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let first = a.required(0, "start_or_stops")?;
    let end = a.take(Some(1), "end")?;
    let extend = a.take(Some(2), "extend")?;
    a.done()?;
    let extend = match extend {
        Some(v) => a.string(v)?.parse::<Extend>()?,
        None => Extend::Pad,
    };

    if let Some(end) = end {
        let start = a.stop(Scalar::Constant(0.0), first)?;
        let end = a.stop(Scalar::Constant(1.0), end)?;
        return Ok(Value::ColorLine(ColorLineSpec::two_stop(start, end, extend)));
    }

    let pairs: Vec<(Value, Value)> = match first {
        Value::Dict(entries) => entries,
        Value::List(items) | Value::Tuple(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Tuple(pair) | Value::List(pair) => <[Value; 2]>::try_from(pair)
                    .map(|[o, s]| (o, s))
                    .map_err(|p| a.mismatch("an (offset, stop) pair", &Value::Tuple(p))),
                other => Err(a.mismatch("an (offset, stop) pair", &other)),
            })
            .collect::<ColrResult<_>>()?,
        other => return Err(a.mismatch("a dict or list of color stops", &other)),
    };
    let stops = pairs
        .into_iter()
        .map(|(offset, stop)| a.stop(a.scalar(offset)?, stop))
        .collect::<ColrResult<Vec<_>>>()?;
    Ok(Value::ColorLine(ColorLineSpec::new(stops, extend)))
}

// SetPalette([entry, ...]); each entry is one color or one color per slot.
fn op_set_palette(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let entries = a.required(0, "entries")?;
    a.done()?;
    let entries = match entries {
        Value::List(entries) | Value::Tuple(entries) => entries,
        other => return Err(a.mismatch("a list of palette entries", &other)),
    };
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        out.push(match entry {
            Value::Str(s) => vec![s],
            Value::List(slots) | Value::Tuple(slots) => slots
                .into_iter()
                .map(|s| a.string(s))
                .collect::<ColrResult<Vec<_>>>()?,
            other => return Err(a.mismatch("a color or a list of colors", &other)),
        });
    }
    c.set_palette(out)?;
    Ok(Value::None)
}

fn op_set_palette_flags(c: &mut PaintCompiler, mut a: Args) -> ColrResult<Value> {
    let slot = a.required(0, "slot")?;
    let mode = a.required(1, "mode")?;
    a.done()?;
    let slot = a.number(slot)?;
    if slot < 0.0 || slot.fract() != 0.0 {
        return Err(ColrError::validation(format!(
            "SetPaletteFlags(): slot {slot} is not a palette index"
        )));
    }
    let mode: PaletteMode = a.string(mode)?.parse()?;
    c.set_palette_flags(slot as usize, mode)?;
    Ok(Value::None)
}

#[cfg(test)]
#[path = "../../tests/unit/script/interp.rs"]
mod tests;
