use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::foundation::{
    error::{ColrError, ColrResult},
    units::Unit,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The eighteen paint kinds, independent of their static/variable format.
pub enum PaintKind {
    /// Format 1.
    ColrLayers,
    /// Formats 2 and 3.
    Solid,
    /// Formats 4 and 5.
    LinearGradient,
    /// Formats 6 and 7.
    RadialGradient,
    /// Formats 8 and 9.
    SweepGradient,
    /// Format 10.
    Glyph,
    /// Format 11.
    ColrGlyph,
    /// Formats 12 and 13.
    Transform,
    /// Formats 14 and 15.
    Translate,
    /// Formats 16 and 17.
    Scale,
    /// Formats 18 and 19.
    ScaleAroundCenter,
    /// Formats 20 and 21.
    ScaleUniform,
    /// Formats 22 and 23.
    ScaleUniformAroundCenter,
    /// Formats 24 and 25.
    Rotate,
    /// Formats 26 and 27.
    RotateAroundCenter,
    /// Formats 28 and 29.
    Skew,
    /// Formats 30 and 31.
    SkewAroundCenter,
    /// Format 32.
    Composite,
}

const COORD: Unit = Unit::Plain;

const SOLID_FIELDS: &[(&str, Unit)] = &[("Alpha", Unit::F2Dot14)];
const LINEAR_FIELDS: &[(&str, Unit)] = &[
    ("x0", COORD),
    ("y0", COORD),
    ("x1", COORD),
    ("y1", COORD),
    ("x2", COORD),
    ("y2", COORD),
];
const RADIAL_FIELDS: &[(&str, Unit)] = &[
    ("x0", COORD),
    ("y0", COORD),
    ("r0", COORD),
    ("x1", COORD),
    ("y1", COORD),
    ("r1", COORD),
];
const SWEEP_FIELDS: &[(&str, Unit)] = &[
    ("centerX", COORD),
    ("centerY", COORD),
    ("startAngle", Unit::Angle),
    ("endAngle", Unit::Angle),
];
const TRANSFORM_FIELDS: &[(&str, Unit)] = &[
    ("xx", Unit::Fixed),
    ("yx", Unit::Fixed),
    ("xy", Unit::Fixed),
    ("yy", Unit::Fixed),
    ("dx", Unit::Fixed),
    ("dy", Unit::Fixed),
];
const TRANSLATE_FIELDS: &[(&str, Unit)] = &[("dx", COORD), ("dy", COORD)];
const SCALE_FIELDS: &[(&str, Unit)] = &[("scaleX", Unit::F2Dot14), ("scaleY", Unit::F2Dot14)];
const SCALE_CENTER_FIELDS: &[(&str, Unit)] = &[
    ("scaleX", Unit::F2Dot14),
    ("scaleY", Unit::F2Dot14),
    ("centerX", COORD),
    ("centerY", COORD),
];
const SCALE_UNIFORM_FIELDS: &[(&str, Unit)] = &[("scale", Unit::F2Dot14)];
const SCALE_UNIFORM_CENTER_FIELDS: &[(&str, Unit)] = &[
    ("scale", Unit::F2Dot14),
    ("centerX", COORD),
    ("centerY", COORD),
];
const ROTATE_FIELDS: &[(&str, Unit)] = &[("angle", Unit::Angle)];
const ROTATE_CENTER_FIELDS: &[(&str, Unit)] = &[
    ("angle", Unit::Angle),
    ("centerX", COORD),
    ("centerY", COORD),
];
const SKEW_FIELDS: &[(&str, Unit)] = &[("xSkewAngle", Unit::Angle), ("ySkewAngle", Unit::Angle)];
const SKEW_CENTER_FIELDS: &[(&str, Unit)] = &[
    ("xSkewAngle", Unit::Angle),
    ("ySkewAngle", Unit::Angle),
    ("centerX", COORD),
    ("centerY", COORD),
];

/// Variable fields of one color stop, in delta-set order.
pub const STOP_FIELDS: &[(&str, Unit)] = &[("StopOffset", Unit::F2Dot14), ("Alpha", Unit::F2Dot14)];

impl PaintKind {
    /// Every kind, in format order.
    pub const ALL: [PaintKind; 18] = [
        Self::ColrLayers,
        Self::Solid,
        Self::LinearGradient,
        Self::RadialGradient,
        Self::SweepGradient,
        Self::Glyph,
        Self::ColrGlyph,
        Self::Transform,
        Self::Translate,
        Self::Scale,
        Self::ScaleAroundCenter,
        Self::ScaleUniform,
        Self::ScaleUniformAroundCenter,
        Self::Rotate,
        Self::RotateAroundCenter,
        Self::Skew,
        Self::SkewAroundCenter,
        Self::Composite,
    ];

    /// OpenType format code of the static encoding.
    pub fn static_format(self) -> u8 {
        match self {
            Self::ColrLayers => 1,
            Self::Solid => 2,
            Self::LinearGradient => 4,
            Self::RadialGradient => 6,
            Self::SweepGradient => 8,
            Self::Glyph => 10,
            Self::ColrGlyph => 11,
            Self::Transform => 12,
            Self::Translate => 14,
            Self::Scale => 16,
            Self::ScaleAroundCenter => 18,
            Self::ScaleUniform => 20,
            Self::ScaleUniformAroundCenter => 22,
            Self::Rotate => 24,
            Self::RotateAroundCenter => 26,
            Self::Skew => 28,
            Self::SkewAroundCenter => 30,
            Self::Composite => 32,
        }
    }

    /// Format code of the variable encoding, for kinds that have one.
    pub fn variable_format(self) -> Option<u8> {
        match self {
            Self::ColrLayers | Self::Glyph | Self::ColrGlyph | Self::Composite => None,
            _ => Some(self.static_format() + 1),
        }
    }

    /// Kind and variability of a format code.
    pub fn from_format(format: u8) -> ColrResult<(Self, bool)> {
        Self::ALL
            .into_iter()
            .find_map(|kind| {
                if kind.static_format() == format {
                    Some((kind, false))
                } else if kind.variable_format() == Some(format) {
                    Some((kind, true))
                } else {
                    None
                }
            })
            .ok_or_else(|| ColrError::lookup(format!("unknown paint format {format}")))
    }

    /// Variable fields and their units, in delta-set order.
    ///
    /// Compiler registration and decompiler resolution both walk this table,
    /// so field `k` lives at `var_index_base + k`.
    pub fn variable_fields(self) -> &'static [(&'static str, Unit)] {
        match self {
            Self::ColrLayers | Self::Glyph | Self::ColrGlyph | Self::Composite => &[],
            Self::Solid => SOLID_FIELDS,
            Self::LinearGradient => LINEAR_FIELDS,
            Self::RadialGradient => RADIAL_FIELDS,
            Self::SweepGradient => SWEEP_FIELDS,
            Self::Transform => TRANSFORM_FIELDS,
            Self::Translate => TRANSLATE_FIELDS,
            Self::Scale => SCALE_FIELDS,
            Self::ScaleAroundCenter => SCALE_CENTER_FIELDS,
            Self::ScaleUniform => SCALE_UNIFORM_FIELDS,
            Self::ScaleUniformAroundCenter => SCALE_UNIFORM_CENTER_FIELDS,
            Self::Rotate => ROTATE_FIELDS,
            Self::RotateAroundCenter => ROTATE_CENTER_FIELDS,
            Self::Skew => SKEW_FIELDS,
            Self::SkewAroundCenter => SKEW_CENTER_FIELDS,
        }
    }

    /// Script-level operation name, e.g. `PaintSolid`.
    pub fn name(self) -> &'static str {
        match self {
            Self::ColrLayers => "PaintColrLayers",
            Self::Solid => "PaintSolid",
            Self::LinearGradient => "PaintLinearGradient",
            Self::RadialGradient => "PaintRadialGradient",
            Self::SweepGradient => "PaintSweepGradient",
            Self::Glyph => "PaintGlyph",
            Self::ColrGlyph => "PaintColrGlyph",
            Self::Transform => "PaintTransform",
            Self::Translate => "PaintTranslate",
            Self::Scale => "PaintScale",
            Self::ScaleAroundCenter => "PaintScaleAroundCenter",
            Self::ScaleUniform => "PaintScaleUniform",
            Self::ScaleUniformAroundCenter => "PaintScaleUniformAroundCenter",
            Self::Rotate => "PaintRotate",
            Self::RotateAroundCenter => "PaintRotateAroundCenter",
            Self::Skew => "PaintSkew",
            Self::SkewAroundCenter => "PaintSkewAroundCenter",
            Self::Composite => "PaintComposite",
        }
    }
}

impl fmt::Display for PaintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// How a color line continues outside `[0, 1]`.
pub enum Extend {
    /// Repeat the end colors.
    #[default]
    Pad,
    /// Repeat the whole line.
    Repeat,
    /// Mirror the line.
    Reflect,
}

impl Extend {
    /// Script spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pad => "pad",
            Self::Repeat => "repeat",
            Self::Reflect => "reflect",
        }
    }
}

impl FromStr for Extend {
    type Err = ColrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pad" => Ok(Self::Pad),
            "repeat" => Ok(Self::Repeat),
            "reflect" => Ok(Self::Reflect),
            _ => Err(ColrError::validation(format!(
                "unknown extend mode '{s}', must be one of: pad, repeat, reflect"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// OpenType composite modes. Validated only; never computed.
#[allow(missing_docs)]
pub enum CompositeMode {
    Clear,
    Src,
    Dest,
    SrcOver,
    DestOver,
    SrcIn,
    DestIn,
    SrcOut,
    DestOut,
    SrcAtop,
    DestAtop,
    Xor,
    Plus,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Multiply,
    HslHue,
    HslSaturation,
    HslColor,
    HslLuminosity,
}

impl CompositeMode {
    /// Every mode, in OpenType order.
    pub const ALL: [CompositeMode; 28] = [
        Self::Clear,
        Self::Src,
        Self::Dest,
        Self::SrcOver,
        Self::DestOver,
        Self::SrcIn,
        Self::DestIn,
        Self::SrcOut,
        Self::DestOut,
        Self::SrcAtop,
        Self::DestAtop,
        Self::Xor,
        Self::Plus,
        Self::Screen,
        Self::Overlay,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::HardLight,
        Self::SoftLight,
        Self::Difference,
        Self::Exclusion,
        Self::Multiply,
        Self::HslHue,
        Self::HslSaturation,
        Self::HslColor,
        Self::HslLuminosity,
    ];

    /// Script spelling, e.g. `src_over`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Src => "src",
            Self::Dest => "dest",
            Self::SrcOver => "src_over",
            Self::DestOver => "dest_over",
            Self::SrcIn => "src_in",
            Self::DestIn => "dest_in",
            Self::SrcOut => "src_out",
            Self::DestOut => "dest_out",
            Self::SrcAtop => "src_atop",
            Self::DestAtop => "dest_atop",
            Self::Xor => "xor",
            Self::Plus => "plus",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color_dodge",
            Self::ColorBurn => "color_burn",
            Self::HardLight => "hard_light",
            Self::SoftLight => "soft_light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Multiply => "multiply",
            Self::HslHue => "hsl_hue",
            Self::HslSaturation => "hsl_saturation",
            Self::HslColor => "hsl_color",
            Self::HslLuminosity => "hsl_luminosity",
        }
    }

    /// Parse a mode name, case-insensitively. The HSL modes also answer to
    /// `hue`, `saturation`, `color` and `luminosity`.
    pub fn parse(s: &str) -> ColrResult<Self> {
        let lower = s.to_ascii_lowercase();
        let wanted = match lower.as_str() {
            "hue" => "hsl_hue",
            "saturation" => "hsl_saturation",
            "color" => "hsl_color",
            "luminosity" => "hsl_luminosity",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                ColrError::validation(format!(
                    "unknown composite mode '{s}', must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

impl fmt::Display for CompositeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One stop of a compiled color line.
pub struct ColorStop {
    /// Position along the line.
    pub offset: f64,
    /// Palette entry, or [`crate::palette::FOREGROUND`].
    pub palette_index: u16,
    /// Alpha multiplier.
    pub alpha: f64,
    /// Base of the stop's `(offset, alpha)` delta-set entries, on variable lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// A compiled color line.
pub struct ColorLine {
    /// Behaviour outside the stops.
    #[serde(default)]
    pub extend: Extend,
    /// Stops in authoring order.
    pub stops: Vec<ColorStop>,
}

impl ColorLine {
    /// True when the stops carry variation addresses.
    pub fn is_variable(&self) -> bool {
        self.stops.iter().any(|s| s.var_index_base.is_some())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A 2x3 affine matrix in OpenType field order.
pub struct Affine2x3 {
    /// x part of the x basis vector.
    pub xx: f64,
    /// y part of the x basis vector.
    pub yx: f64,
    /// x part of the y basis vector.
    pub xy: f64,
    /// y part of the y basis vector.
    pub yy: f64,
    /// x translation.
    pub dx: f64,
    /// y translation.
    pub dy: f64,
}

impl Affine2x3 {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        xx: 1.0,
        yx: 0.0,
        xy: 0.0,
        yy: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    /// Build from `[xx, yx, xy, yy, dx, dy]`.
    pub fn from_array(m: [f64; 6]) -> Self {
        Self {
            xx: m[0],
            yx: m[1],
            xy: m[2],
            yy: m[3],
            dx: m[4],
            dy: m[5],
        }
    }

    /// `[xx, yx, xy, yy, dx, dy]`.
    pub fn to_array(self) -> [f64; 6] {
        [self.xx, self.yx, self.xy, self.yy, self.dx, self.dy]
    }
}

impl Default for Affine2x3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Format 1: layers painted bottom to top.
pub struct PaintColrLayers {
    /// Layer paints.
    pub layers: Vec<PaintNode>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 2 and 3.
pub struct PaintSolid {
    /// Palette entry.
    pub palette_index: u16,
    /// Alpha multiplier.
    pub alpha: f64,
    /// Set on the variable format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 4 and 5.
#[allow(missing_docs)]
pub struct PaintLinearGradient {
    pub color_line: ColorLine,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 6 and 7.
#[allow(missing_docs)]
pub struct PaintRadialGradient {
    pub color_line: ColorLine,
    pub x0: f64,
    pub y0: f64,
    pub r0: f64,
    pub x1: f64,
    pub y1: f64,
    pub r1: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 8 and 9. Angles are in degrees.
#[allow(missing_docs)]
pub struct PaintSweepGradient {
    pub color_line: ColorLine,
    pub center_x: f64,
    pub center_y: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Format 10: fill a glyph outline with a paint.
pub struct PaintGlyph {
    /// Glyph name.
    pub glyph: String,
    /// Fill.
    pub paint: Box<PaintNode>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Format 11: reuse another color glyph's paint.
pub struct PaintColrGlyph {
    /// Glyph name.
    pub glyph: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 12 and 13.
pub struct PaintTransform {
    /// Transformed paint.
    pub paint: Box<PaintNode>,
    /// Matrix.
    pub transform: Affine2x3,
    /// Set on the variable format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 14 and 15.
#[allow(missing_docs)]
pub struct PaintTranslate {
    pub paint: Box<PaintNode>,
    pub dx: f64,
    pub dy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 16 and 17.
#[allow(missing_docs)]
pub struct PaintScale {
    pub paint: Box<PaintNode>,
    pub scale_x: f64,
    pub scale_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 18 and 19.
#[allow(missing_docs)]
pub struct PaintScaleAroundCenter {
    pub paint: Box<PaintNode>,
    pub scale_x: f64,
    pub scale_y: f64,
    pub center_x: f64,
    pub center_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 20 and 21.
#[allow(missing_docs)]
pub struct PaintScaleUniform {
    pub paint: Box<PaintNode>,
    pub scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 22 and 23.
#[allow(missing_docs)]
pub struct PaintScaleUniformAroundCenter {
    pub paint: Box<PaintNode>,
    pub scale: f64,
    pub center_x: f64,
    pub center_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 24 and 25. Angles are in degrees.
#[allow(missing_docs)]
pub struct PaintRotate {
    pub paint: Box<PaintNode>,
    pub angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 26 and 27.
#[allow(missing_docs)]
pub struct PaintRotateAroundCenter {
    pub paint: Box<PaintNode>,
    pub angle: f64,
    pub center_x: f64,
    pub center_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 28 and 29.
#[allow(missing_docs)]
pub struct PaintSkew {
    pub paint: Box<PaintNode>,
    pub x_skew_angle: f64,
    pub y_skew_angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Formats 30 and 31.
#[allow(missing_docs)]
pub struct PaintSkewAroundCenter {
    pub paint: Box<PaintNode>,
    pub x_skew_angle: f64,
    pub y_skew_angle: f64,
    pub center_x: f64,
    pub center_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_index_base: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Format 32.
pub struct PaintComposite {
    /// How source and backdrop combine.
    pub mode: CompositeMode,
    /// Paint drawn on top.
    pub source: Box<PaintNode>,
    /// Paint drawn first.
    pub backdrop: Box<PaintNode>,
}

/// Color glyphs by name.
pub type GlyphPaints = BTreeMap<String, PaintNode>;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
/// A node of the paint graph.
///
/// Static and variable formats share one struct per kind; a variable node
/// carries `var_index_base`.
#[allow(missing_docs)]
pub enum PaintNode {
    ColrLayers(PaintColrLayers),
    Solid(PaintSolid),
    LinearGradient(PaintLinearGradient),
    RadialGradient(PaintRadialGradient),
    SweepGradient(PaintSweepGradient),
    Glyph(PaintGlyph),
    ColrGlyph(PaintColrGlyph),
    Transform(PaintTransform),
    Translate(PaintTranslate),
    Scale(PaintScale),
    ScaleAroundCenter(PaintScaleAroundCenter),
    ScaleUniform(PaintScaleUniform),
    ScaleUniformAroundCenter(PaintScaleUniformAroundCenter),
    Rotate(PaintRotate),
    RotateAroundCenter(PaintRotateAroundCenter),
    Skew(PaintSkew),
    SkewAroundCenter(PaintSkewAroundCenter),
    Composite(PaintComposite),
}

impl PaintNode {
    /// Kind of this node.
    pub fn kind(&self) -> PaintKind {
        match self {
            Self::ColrLayers(_) => PaintKind::ColrLayers,
            Self::Solid(_) => PaintKind::Solid,
            Self::LinearGradient(_) => PaintKind::LinearGradient,
            Self::RadialGradient(_) => PaintKind::RadialGradient,
            Self::SweepGradient(_) => PaintKind::SweepGradient,
            Self::Glyph(_) => PaintKind::Glyph,
            Self::ColrGlyph(_) => PaintKind::ColrGlyph,
            Self::Transform(_) => PaintKind::Transform,
            Self::Translate(_) => PaintKind::Translate,
            Self::Scale(_) => PaintKind::Scale,
            Self::ScaleAroundCenter(_) => PaintKind::ScaleAroundCenter,
            Self::ScaleUniform(_) => PaintKind::ScaleUniform,
            Self::ScaleUniformAroundCenter(_) => PaintKind::ScaleUniformAroundCenter,
            Self::Rotate(_) => PaintKind::Rotate,
            Self::RotateAroundCenter(_) => PaintKind::RotateAroundCenter,
            Self::Skew(_) => PaintKind::Skew,
            Self::SkewAroundCenter(_) => PaintKind::SkewAroundCenter,
            Self::Composite(_) => PaintKind::Composite,
        }
    }

    /// Base offset of the node's own fields, on variable formats.
    pub fn var_index_base(&self) -> Option<u32> {
        match self {
            Self::ColrLayers(_) | Self::Glyph(_) | Self::ColrGlyph(_) | Self::Composite(_) => None,
            Self::Solid(p) => p.var_index_base,
            Self::LinearGradient(p) => p.var_index_base,
            Self::RadialGradient(p) => p.var_index_base,
            Self::SweepGradient(p) => p.var_index_base,
            Self::Transform(p) => p.var_index_base,
            Self::Translate(p) => p.var_index_base,
            Self::Scale(p) => p.var_index_base,
            Self::ScaleAroundCenter(p) => p.var_index_base,
            Self::ScaleUniform(p) => p.var_index_base,
            Self::ScaleUniformAroundCenter(p) => p.var_index_base,
            Self::Rotate(p) => p.var_index_base,
            Self::RotateAroundCenter(p) => p.var_index_base,
            Self::Skew(p) => p.var_index_base,
            Self::SkewAroundCenter(p) => p.var_index_base,
        }
    }

    /// True on variable formats.
    pub fn is_variable(&self) -> bool {
        self.var_index_base().is_some()
    }

    /// OpenType format code.
    pub fn format(&self) -> u8 {
        let kind = self.kind();
        match (self.is_variable(), kind.variable_format()) {
            (true, Some(format)) => format,
            _ => kind.static_format(),
        }
    }

    /// Default values of the fields in [`PaintKind::variable_fields`], same order.
    pub fn field_values(&self) -> Vec<f64> {
        match self {
            Self::ColrLayers(_) | Self::Glyph(_) | Self::ColrGlyph(_) | Self::Composite(_) => {
                Vec::new()
            }
            Self::Solid(p) => vec![p.alpha],
            Self::LinearGradient(p) => vec![p.x0, p.y0, p.x1, p.y1, p.x2, p.y2],
            Self::RadialGradient(p) => vec![p.x0, p.y0, p.r0, p.x1, p.y1, p.r1],
            Self::SweepGradient(p) => vec![p.center_x, p.center_y, p.start_angle, p.end_angle],
            Self::Transform(p) => p.transform.to_array().to_vec(),
            Self::Translate(p) => vec![p.dx, p.dy],
            Self::Scale(p) => vec![p.scale_x, p.scale_y],
            Self::ScaleAroundCenter(p) => vec![p.scale_x, p.scale_y, p.center_x, p.center_y],
            Self::ScaleUniform(p) => vec![p.scale],
            Self::ScaleUniformAroundCenter(p) => vec![p.scale, p.center_x, p.center_y],
            Self::Rotate(p) => vec![p.angle],
            Self::RotateAroundCenter(p) => vec![p.angle, p.center_x, p.center_y],
            Self::Skew(p) => vec![p.x_skew_angle, p.y_skew_angle],
            Self::SkewAroundCenter(p) => {
                vec![p.x_skew_angle, p.y_skew_angle, p.center_x, p.center_y]
            }
        }
    }

    /// The single child of wrapper kinds (Glyph and the transforms).
    pub fn child(&self) -> Option<&PaintNode> {
        match self {
            Self::Glyph(p) => Some(&p.paint),
            Self::Transform(p) => Some(&p.paint),
            Self::Translate(p) => Some(&p.paint),
            Self::Scale(p) => Some(&p.paint),
            Self::ScaleAroundCenter(p) => Some(&p.paint),
            Self::ScaleUniform(p) => Some(&p.paint),
            Self::ScaleUniformAroundCenter(p) => Some(&p.paint),
            Self::Rotate(p) => Some(&p.paint),
            Self::RotateAroundCenter(p) => Some(&p.paint),
            Self::Skew(p) => Some(&p.paint),
            Self::SkewAroundCenter(p) => Some(&p.paint),
            _ => None,
        }
    }

    /// The color line of gradient kinds.
    pub fn color_line(&self) -> Option<&ColorLine> {
        match self {
            Self::LinearGradient(p) => Some(&p.color_line),
            Self::RadialGradient(p) => Some(&p.color_line),
            Self::SweepGradient(p) => Some(&p.color_line),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/model.rs"]
mod tests;
