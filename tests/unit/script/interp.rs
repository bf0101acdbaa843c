use super::*;
use crate::{
    foundation::core::AxisDef,
    paint::model::{PaintKind, PaintSolid},
    script::parser::parse_program,
};

fn axes() -> AxisSet {
    AxisSet::new(vec![
        AxisDef::new("AXSA", 0.0, 0.0, 100.0).unwrap(),
        AxisDef::new("ALPH", 0.0, 0.0, 1.0).unwrap(),
    ])
    .unwrap()
}

fn run(src: &str) -> ColrResult<CompileOutput> {
    let program = parse_program(src)?;
    let mut interp = Interpreter::new(axes());
    interp.run(&program)?;
    interp.finish()
}

fn kind_of(src: &str) -> PaintKind {
    let out = run(&format!("P = PaintColrGlyph(\"b\")\nglyphs[\"A\"] = {src}")).unwrap();
    out.colr.glyphs["A"].kind()
}

#[test]
fn a_static_red_solid_lands_in_the_palette() {
    let out = run(r##"glyphs["A"] = PaintGlyph("square", PaintSolid("#FF0000FF"))"##).unwrap();
    let PaintNode::Glyph(glyph) = &out.colr.glyphs["A"] else {
        panic!("expected a glyph paint");
    };
    assert_eq!(glyph.glyph, "square");
    assert_eq!(
        *glyph.paint,
        PaintNode::Solid(PaintSolid {
            palette_index: 0,
            alpha: 1.0,
            var_index_base: None,
        })
    );
    assert_eq!(out.cpal.palettes, vec![vec![Color::rgba(255, 0, 0, 255)]]);
}

#[test]
fn names_and_arithmetic_feed_arguments() {
    let out = run("W = 100\nglyphs['A'] = PaintTranslate(W / 2, -W + 1, PaintColrGlyph('b'))").unwrap();
    assert_eq!(out.colr.glyphs["A"].field_values(), vec![50.0, -99.0]);
}

#[test]
fn location_dicts_select_variable_formats() {
    let out = run(
        r##"
FADE = {(("AXSA", 0),): 1.0, (("AXSA", 100),): 0.5}
glyphs["A"] = PaintSolid("#FF0000FF", alpha=FADE)
glyphs["B"] = PaintSolid("foreground", FADE)
glyphs["C"] = PaintSolid("#FF0000FF", {"": 1.0, "AXSA=100": 0.5})
"##,
    )
    .unwrap();
    let g = &out.colr.glyphs;
    assert_eq!(g["A"].format(), 3);
    assert_eq!(g["A"].var_index_base(), g["B"].var_index_base());
    assert_eq!(g["C"].format(), 3);
    let (_, row) = out.colr.var_store.item(out.colr.var_index_map[0]).unwrap();
    assert_eq!(row, &[-8192]);
}

#[test]
fn paint_scale_shapes() {
    assert_eq!(kind_of("PaintScale(0.5, P)"), PaintKind::ScaleUniform);
    assert_eq!(kind_of("PaintScale(0.5, 1.5, P)"), PaintKind::Scale);
    assert_eq!(kind_of("PaintScale(0.5, 1.5, (0, 0), P)"), PaintKind::ScaleAroundCenter);
    assert_eq!(
        kind_of("PaintScale(P, scale_x=0.5, center=(1, 2))"),
        PaintKind::ScaleUniformAroundCenter
    );

    for bad in ["PaintScale(0.5)", "PaintScale(0.5, P, paint=P)"] {
        let err = run(&format!("P = PaintColrGlyph(\"b\")\nx = {bad}")).unwrap_err();
        assert!(matches!(err, ColrError::Validation(_)), "{bad}: {err}");
        assert!(err.to_string().contains("couldn't understand arguments to PaintScale"));
    }
}

#[test]
fn paint_rotate_shapes() {
    assert_eq!(kind_of("PaintRotate(45, P)"), PaintKind::Rotate);
    assert_eq!(kind_of("PaintRotate(45, (10, 10), P)"), PaintKind::RotateAroundCenter);
    assert_eq!(kind_of("PaintRotate(P, angle=30)"), PaintKind::Rotate);
    assert_eq!(kind_of("PaintSkew(10, 0, P, center=(5, 5))"), PaintKind::SkewAroundCenter);
    let err = run("x = PaintRotate(PaintColrGlyph(\"b\"))").unwrap_err();
    assert!(err.to_string().contains("PaintRotate"));
}

#[test]
fn color_line_forms() {
    let out = run(
        r##"
RED = "#FF0000FF"
BLUE = "#0000FFFF"
glyphs["A"] = PaintLinearGradient((0, 0), (100, 0), (0, 100), ColorLine(RED, BLUE, extend="reflect"))
glyphs["B"] = PaintSweepGradient((0, 0), 0, 90, ColorLine([(0, RED), (0.5, BLUE), (0.5, RED)]))
glyphs["C"] = PaintRadialGradient((0, 0), 10, (0, 0), 50, ColorLine({0: RED, 1: (BLUE, {"": 1.0, "ALPH=1": 0.0})}))
"##,
    )
    .unwrap();
    let g = &out.colr.glyphs;

    let a = g["A"].color_line().unwrap();
    assert_eq!(a.extend, Extend::Reflect);
    let offsets: Vec<f64> = a.stops.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, [0.0, 1.0]);
    assert_eq!(g["A"].format(), 4);

    let b = g["B"].color_line().unwrap();
    assert_eq!(b.stops.len(), 3);
    assert_eq!(b.stops[1].palette_index, 1);

    assert_eq!(g["C"].format(), 7);
    assert!(g["C"].color_line().unwrap().is_variable());
}

#[test]
fn explicit_palettes_and_flags() {
    let out = run(
        r##"
SetPalette([["#FF0000FF", "#00FF00FF"], "#0000FFFF"])
SetPaletteFlags(1, "dark")
glyphs["A"] = PaintSolid(1)
"##,
    )
    .unwrap();
    assert_eq!(out.cpal.palettes.len(), 2);
    assert_eq!(out.cpal.palettes[1][0], Color::rgba(0, 255, 0, 255));
    assert_eq!(out.cpal.palettes[1][1], Color::rgba(0, 0, 255, 255));
    assert_eq!(out.cpal.palette_types, vec![0, 2]);
    assert_eq!(
        out.colr.glyphs["A"],
        PaintNode::Solid(PaintSolid {
            palette_index: 1,
            alpha: 1.0,
            var_index_base: None,
        })
    );
}

#[test]
fn containers_index_and_reassign() {
    let out = run(
        r#"
L = [PaintColrGlyph("a"), PaintColrGlyph("b")]
glyphs["A"] = L[0]
glyphs["A"] = L[-1]
"#,
    )
    .unwrap();
    assert_eq!(out.colr.glyphs.len(), 1);
    assert_eq!(
        out.colr.glyphs["A"],
        PaintNode::ColrGlyph(crate::paint::model::PaintColrGlyph { glyph: "b".into() })
    );
}

#[test]
fn script_errors_carry_offsets() {
    let err = run("x = 1\ny = missing").unwrap_err();
    let ColrError::Script(e) = err else {
        panic!("expected a script error, got {err}");
    };
    assert_eq!(e.offset, 10);
    assert!(e.message.contains("missing"));

    assert!(matches!(run("x = PaintSparkle(1)"), Err(ColrError::Script(_))));
    assert!(matches!(run("PaintSolid = 1"), Err(ColrError::Script(_))));
    assert!(matches!(run("x = 1 / 0"), Err(ColrError::Script(_))));
}

#[test]
fn argument_mistakes_are_validation_errors() {
    let err = run("x = PaintColrGlyph(\"a\", paint=1)").unwrap_err();
    assert!(err.to_string().contains("unexpected keyword argument 'paint'"));
    let err = run("x = PaintSolid(\"#FF0000FF\", 1, alpha=1)").unwrap_err();
    assert!(err.to_string().contains("multiple values"));
    let err = run("glyphs[\"A\"] = 3").unwrap_err();
    assert!(err.to_string().contains("must be a paint"));
    let err = run("x = PaintGlyph(\"a\", \"b\")").unwrap_err();
    assert!(err.to_string().contains("expected a paint"));
}
