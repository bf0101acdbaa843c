use super::*;
use crate::{
    foundation::core::AxisDef,
    paint::compiler::{ColorLineSpec, ColorStopSpec, CompileOutput, PaintCompiler},
    paint::model::{PaintColrGlyph, PaintSolid},
    palette::ColorSpec,
    variation::scalar::Scalar,
};

fn axes() -> AxisSet {
    AxisSet::new(vec![
        AxisDef::new("AXSA", 0.0, 0.0, 100.0).unwrap(),
        AxisDef::new("ALPH", 0.0, 0.0, 1.0).unwrap(),
    ])
    .unwrap()
}

fn red() -> ColorSpec {
    ColorSpec::parse("#FF0000FF").unwrap()
}

fn compile_one(build: impl FnOnce(&mut PaintCompiler) -> PaintNode) -> CompileOutput {
    let mut c = PaintCompiler::new(axes());
    let node = build(&mut c);
    c.finish(GlyphPaints::from([("A".into(), node)])).unwrap()
}

fn text_of(out: &CompileOutput) -> String {
    let axes = axes();
    let d = PaintDecompiler::new(&out.colr, &out.cpal, &axes);
    d.decompile(&out.colr.glyphs["A"]).unwrap()
}

#[test]
fn static_solids_print_their_color() {
    let out = compile_one(|c| c.solid(&red(), 1.0).unwrap());
    assert_eq!(text_of(&out), r##"PaintSolid("#FF0000FF")"##);

    let out = compile_one(|c| c.solid(&red(), 0.5).unwrap());
    assert_eq!(text_of(&out), r##"PaintSolid("#FF0000FF", alpha=0.5)"##);
}

#[test]
fn variable_alpha_prints_a_location_dict() {
    let out = compile_one(|c| {
        c.solid(
            &red(),
            Scalar::at_locations([(vec![], 1.0), (vec![("AXSA", 100.0)], 0.5)]),
        )
        .unwrap()
    });
    assert_eq!(
        text_of(&out),
        r##"PaintSolid("#FF0000FF", alpha={"": 1.0, "AXSA=100.0": 0.5})"##
    );
}

#[test]
fn values_on_both_sides_of_the_default_get_their_own_labels() {
    let axes = AxisSet::new(vec![AxisDef::new("wght", 100.0, 400.0, 900.0).unwrap()]).unwrap();
    let mut c = PaintCompiler::new(axes.clone());
    let node = c
        .translate(
            Scalar::at_locations([
                (vec![("wght", 100.0)], -10.0),
                (vec![], 0.0),
                (vec![("wght", 900.0)], 10.0),
            ]),
            0.0,
            PaintNode::ColrGlyph(PaintColrGlyph { glyph: "b".into() }),
        )
        .unwrap();
    let out = c.finish(GlyphPaints::from([("A".into(), node)])).unwrap();
    let d = PaintDecompiler::new(&out.colr, &out.cpal, &axes);
    assert_eq!(
        d.decompile(&out.colr.glyphs["A"]).unwrap(),
        r#"PaintTranslate({"": 0.0, "wght=100.0": -10.0, "wght=900.0": 10.0}, 0.0, PaintColrGlyph("b"))"#
    );
}

#[test]
fn intermediate_masters_sum_overlapping_regions() {
    let mut c = PaintCompiler::new(axes());
    let node = c
        .translate(
            Scalar::at_locations([
                (vec![], 0.0),
                (vec![("AXSA", 50.0)], 30.0),
                (vec![("AXSA", 100.0)], 40.0),
            ]),
            0.0,
            PaintNode::ColrGlyph(PaintColrGlyph { glyph: "b".into() }),
        )
        .unwrap();
    let out = c.finish(GlyphPaints::from([("A".into(), node)])).unwrap();
    let axes = axes();
    let d = PaintDecompiler::new(&out.colr, &out.cpal, &axes);
    let text = d.decompile(&out.colr.glyphs["A"]).unwrap();
    assert!(text.contains(r#""AXSA=50.0": 30.0"#), "{text}");
    assert!(text.contains(r#""AXSA=100.0": 40.0"#), "{text}");
}

#[test]
fn two_stop_lines_use_the_short_form() {
    let line = ColorLineSpec::two_stop(
        ColorStopSpec::new(0.0, red()),
        ColorStopSpec::new(1.0, ColorSpec::parse("#0000FFFF").unwrap()).with_alpha(0.5),
        Extend::Repeat,
    );
    let out = compile_one(|c| {
        c.linear_gradient(
            (0.0.into(), 0.0.into()),
            (100.0.into(), 0.0.into()),
            (0.0.into(), 100.0.into()),
            &line,
        )
        .unwrap()
    });
    assert_eq!(
        text_of(&out),
        r##"PaintLinearGradient((0.0, 0.0), (100.0, 0.0), (0.0, 100.0), ColorLine("#FF0000FF", ("#0000FFFF", 0.5), extend="repeat"))"##
    );
}

#[test]
fn other_lines_use_offset_pairs() {
    let line = ColorLineSpec::new(
        vec![
            ColorStopSpec::new(0.0, red()),
            ColorStopSpec::new(0.5, ColorSpec::Foreground),
            ColorStopSpec::new(0.5, red()),
        ],
        Extend::Pad,
    );
    let out = compile_one(|c| {
        c.sweep_gradient((10.0.into(), 20.0.into()), 0.0, 90.0, &line)
            .unwrap()
    });
    assert_eq!(
        text_of(&out),
        r##"PaintSweepGradient((10.0, 20.0), 0.0, 90.0, ColorLine([(0.0, "#FF0000FF"), (0.5, "foreground"), (0.5, "#FF0000FF")]))"##
    );
}

#[test]
fn transforms_and_composites_print_in_call_order() {
    let out = compile_one(|c| {
        let leaf = c.colr_glyph("base").unwrap();
        let moved = c
            .transform([1.0, 0.0, 0.0, 1.0, 50.0, 0.0].map(Scalar::from), leaf)
            .unwrap();
        let solid = c.solid(&ColorSpec::Foreground, 1.0).unwrap();
        c.composite("multiply", moved, solid).unwrap()
    });
    assert_eq!(
        text_of(&out),
        r#"PaintComposite("multiply", PaintTransform((1.0, 0.0, 0.0, 1.0, 50.0, 0.0), PaintColrGlyph("base")), PaintSolid("foreground"))"#
    );
}

#[test]
fn multi_palette_colors_print_as_lists() {
    let mut c = PaintCompiler::new(axes());
    // one entry, two palettes
    c.set_palette(vec![vec!["#FF0000FF".into(), "#00FF00FF".into()]])
        .unwrap();
    let node = c.solid(&ColorSpec::Index(0), 1.0).unwrap();
    let out = c.finish(GlyphPaints::from([("A".into(), node)])).unwrap();
    assert_eq!(text_of(&out), r##"PaintSolid(["#FF0000FF", "#00FF00FF"])"##);
}

#[test]
fn missing_tables_are_lookup_errors() {
    let axes = axes();
    let colr = Colr::default();
    let cpal = Cpal::default();
    let d = PaintDecompiler::new(&colr, &cpal, &axes);

    let solid = PaintNode::Solid(PaintSolid {
        palette_index: 0,
        alpha: 1.0,
        var_index_base: None,
    });
    assert!(matches!(d.decompile(&solid), Err(ColrError::Lookup(_))));

    let variable = PaintNode::Solid(PaintSolid {
        palette_index: FOREGROUND,
        alpha: 1.0,
        var_index_base: Some(3),
    });
    let err = d.decompile(&variable).unwrap_err();
    assert!(err.to_string().contains("beyond the index map"));
}

#[test]
fn glyph_statements_come_out_in_name_order() {
    let mut c = PaintCompiler::new(axes());
    let a = c.solid(&red(), 1.0).unwrap();
    let b = c.colr_glyph("A").unwrap();
    let glyphs = GlyphPaints::from([("B".into(), b), ("A".into(), a)]);
    let out = c.finish(glyphs).unwrap();
    let axes = axes();
    let d = PaintDecompiler::new(&out.colr, &out.cpal, &axes);
    let text = d.decompile_glyphs(&out.colr.glyphs, None).unwrap();
    assert_eq!(
        text,
        "glyphs[\"A\"] = PaintSolid(\"#FF0000FF\")\nglyphs[\"B\"] = PaintColrGlyph(\"A\")\n"
    );
    assert_eq!(d.decompile_glyphs(&out.colr.glyphs, Some(78)).unwrap(), text);
}

#[test]
fn quoting_escapes_quotes_and_backslashes() {
    assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
}
