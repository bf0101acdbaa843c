use super::*;
use crate::{
    foundation::core::{AxisDef, Color},
    palette::FOREGROUND,
    variation::store::NO_VARIATION_INDEX,
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

fn fade() -> Scalar {
    Scalar::at_locations([(vec![], 1.0), (vec![("AXSA", 100.0)], 0.5)])
}

fn leaf() -> PaintNode {
    PaintNode::ColrGlyph(PaintColrGlyph { glyph: "base".into() })
}

#[test]
fn constant_solid_is_static() {
    let mut c = PaintCompiler::new(axes());
    let node = c.solid(&red(), 1.0).unwrap();
    assert_eq!(node.format(), 2);
    let PaintNode::Solid(solid) = &node else {
        panic!("expected a solid, got {node:?}");
    };
    assert_eq!(solid.palette_index, 0);
    assert_eq!(solid.alpha, 1.0);
    assert_eq!(solid.var_index_base, None);

    let out = c.finish(GlyphPaints::from([("A".into(), node)])).unwrap();
    assert_eq!(out.cpal.palettes, vec![vec![Color::rgba(255, 0, 0, 255)]]);
    assert!(out.colr.var_index_map.is_empty());
}

#[test]
fn per_location_alpha_selects_the_variable_format() {
    let mut c = PaintCompiler::new(axes());
    let node = c.solid(&red(), fade()).unwrap();
    assert_eq!(node.format(), 3);
    assert_eq!(node.var_index_base(), Some(0));
    let PaintNode::Solid(solid) = &node else {
        panic!("expected a solid");
    };
    assert_eq!(solid.alpha, 1.0);

    let out = c.finish(GlyphPaints::new()).unwrap();
    let (_, row) = out.colr.var_store.item(out.colr.var_index_map[0]).unwrap();
    assert_eq!(row, &[-8192]);
}

#[test]
fn equal_variable_arguments_share_a_base() {
    let mut c = PaintCompiler::new(axes());
    let a = c.solid(&red(), fade()).unwrap();
    let b = c.solid(&ColorSpec::Foreground, fade()).unwrap();
    assert_eq!(a.var_index_base(), b.var_index_base());
    let PaintNode::Solid(b) = b else {
        panic!("expected a solid");
    };
    assert_eq!(b.palette_index, FOREGROUND);

    let other = c
        .solid(&red(), Scalar::at_locations([(vec![], 1.0), (vec![("ALPH", 1.0)], 0.0)]))
        .unwrap();
    assert!(other.var_index_base() > a.var_index_base());
}

#[test]
fn identical_variable_stops_are_registered_once() {
    let mut c = PaintCompiler::new(axes());
    let line = ColorLineSpec::new(
        vec![
            ColorStopSpec::new(0.0, red()),
            ColorStopSpec::new(
                Scalar::at_locations([(vec![], 0.5), (vec![("AXSA", 100.0)], 0.75)]),
                ColorSpec::parse("#00FF00FF").unwrap(),
            )
            .with_alpha(fade()),
            ColorStopSpec::new(1.0, ColorSpec::parse("#0000FFFF").unwrap()),
        ],
        Extend::Pad,
    );
    assert!(line.needs_variable());
    let pt = |x: f64, y: f64| (Scalar::from(x), Scalar::from(y));

    let first = c
        .linear_gradient(pt(0.0, 0.0), pt(100.0, 0.0), pt(0.0, 100.0), &line)
        .unwrap();
    let before = c.pool().delta_set().len();
    // node fields, then two entries per stop
    assert_eq!(before, 6 + 3 * 2);
    let second = c
        .linear_gradient(pt(0.0, 0.0), pt(100.0, 0.0), pt(0.0, 100.0), &line)
        .unwrap();
    assert_eq!(c.pool().delta_set().len(), before);
    assert_eq!(first, second);

    let cl = first.color_line().unwrap();
    assert_eq!(first.format(), 5);
    assert!(cl.is_variable());
    assert_eq!(cl.stops[1].var_index_base, Some(8));
    assert_eq!(cl.stops[1].offset, 0.5);
}

#[test]
fn variable_offsets_alone_make_a_line_variable() {
    let line = ColorLineSpec::new(
        vec![
            ColorStopSpec::new(
                Scalar::at_locations([(vec![], 0.0), (vec![("ALPH", 1.0)], 0.5)]),
                red(),
            ),
            ColorStopSpec::new(1.0, red()),
        ],
        Extend::Reflect,
    );
    assert!(line.needs_variable());
    let mut c = PaintCompiler::new(axes());
    let node = c
        .sweep_gradient((0.0.into(), 0.0.into()), 0.0, 360.0 - 1.0, &line)
        .unwrap();
    assert_eq!(node.format(), 9);
    assert_eq!(node.color_line().unwrap().extend, Extend::Reflect);
}

#[test]
fn scale_shapes_pick_the_kind() {
    let mut c = PaintCompiler::new(axes());
    let center = || (Scalar::from(10.0), Scalar::from(20.0));
    let cases = [
        (ScaleArgs::uniform(0.5), PaintKind::ScaleUniform),
        (ScaleArgs::xy(0.5, 1.5), PaintKind::Scale),
        (ScaleArgs::uniform(0.5).around(center()), PaintKind::ScaleUniformAroundCenter),
        (ScaleArgs::xy(0.5, 1.5).around(center()), PaintKind::ScaleAroundCenter),
    ];
    for (args, kind) in cases {
        let node = c.scale(args, leaf()).unwrap();
        assert_eq!(node.kind(), kind);
        assert!(!node.is_variable());
    }
}

#[test]
fn rotate_and_skew_move_to_center_forms() {
    let mut c = PaintCompiler::new(axes());
    let center = Some((Scalar::from(1.0), Scalar::from(2.0)));
    assert_eq!(c.rotate(45.0, None, leaf()).unwrap().format(), 24);
    assert_eq!(c.rotate(45.0, center.clone(), leaf()).unwrap().format(), 26);
    assert_eq!(c.skew(10.0, 0.0, None, leaf()).unwrap().format(), 28);
    let varying = Scalar::at_locations([(vec![], 0.0), (vec![("ALPH", 1.0)], 30.0)]);
    assert_eq!(c.skew(varying, 0.0, center, leaf()).unwrap().format(), 31);
}

#[test]
fn static_values_are_range_checked_except_fixed() {
    let mut c = PaintCompiler::new(axes());
    let err = c.scale_uniform(2.0, leaf()).unwrap_err();
    assert!(matches!(err, ColrError::Range(_)));
    assert!(err.to_string().contains("PaintScaleUniform scale"));

    let big = [4.0, 0.0, 0.0, 4.0, 70000.0, 0.0].map(Scalar::from);
    let node = c.transform(big, leaf()).unwrap();
    assert_eq!(node.format(), 12);
}

#[test]
fn variable_transforms_register_six_fixed_fields() {
    let mut c = PaintCompiler::new(axes());
    let mut m = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0].map(Scalar::from);
    m[4] = Scalar::at_locations([(vec![], 0.0), (vec![("AXSA", 100.0)], 50.0)]);
    let node = c.transform(m, leaf()).unwrap();
    assert_eq!(node.format(), 13);
    assert_eq!(c.pool().delta_set().len(), 6);

    let out = c.finish(GlyphPaints::new()).unwrap();
    let map = &out.colr.var_index_map;
    assert_eq!(map[0], NO_VARIATION_INDEX);
    let (_, row) = out.colr.var_store.item(map[4]).unwrap();
    assert_eq!(row, &[50 * 65536]);
}

#[test]
fn unknown_composite_modes_list_the_valid_ones() {
    let mut c = PaintCompiler::new(axes());
    let node = c.composite("multiply", leaf(), leaf()).unwrap();
    assert_eq!(node.format(), 32);
    let err = c.composite("burn", leaf(), leaf()).unwrap_err();
    assert!(err.to_string().contains("src_over"));
}

#[test]
fn explicit_palettes_take_indices_only() {
    let mut c = PaintCompiler::new(axes());
    c.set_palette(vec![vec!["#FF0000FF".into(), "#00FF00FF".into()]])
        .unwrap();
    c.set_palette_flags(1, PaletteMode::Dark).unwrap();
    assert!(c.solid(&ColorSpec::Index(0), 1.0).is_ok());
    assert!(matches!(
        c.solid(&red(), 1.0),
        Err(ColrError::Validation(_))
    ));
    let out = c.finish(GlyphPaints::new()).unwrap();
    assert_eq!(out.cpal.palettes.len(), 2);
    assert_eq!(out.cpal.palette_types, vec![0, 2]);
}

#[test]
fn legacy_values_surface_as_warnings() {
    let mut c = PaintCompiler::new(axes());
    c.translate(Scalar::Legacy("AXSA=0:0 AXSA=100:10".into()), 0.0, leaf())
        .unwrap();
    let out = c.finish(GlyphPaints::new()).unwrap();
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn empty_layers_and_glyph_names_are_rejected() {
    let mut c = PaintCompiler::new(axes());
    assert!(c.colr_layers(vec![]).is_err());
    assert!(c.glyph("", leaf()).is_err());
    assert!(c.colr_glyph("").is_err());
}

#[test]
fn variable_gradients_give_every_stop_a_base() {
    let line = ColorLineSpec::two_stop(
        ColorStopSpec::new(0.0, red()),
        ColorStopSpec::new(1.0, ColorSpec::parse("#0000FFFF").unwrap()),
        Extend::Pad,
    );
    assert!(!line.needs_variable());
    let moving = Scalar::at_locations([(vec![], 0.0), (vec![("AXSA", 100.0)], 100.0)]);
    let mut c = PaintCompiler::new(axes());
    let node = c
        .linear_gradient((moving, 0.0.into()), (100.0.into(), 0.0.into()), (0.0.into(), 100.0.into()), &line)
        .unwrap();
    assert_eq!(node.format(), 5);
    assert_eq!(node.var_index_base(), Some(0));
    let bases: Vec<Option<u32>> = node
        .color_line()
        .unwrap()
        .stops
        .iter()
        .map(|s| s.var_index_base)
        .collect();
    assert_eq!(bases, [Some(6), Some(8)]);
    assert_eq!(c.pool().delta_set().len(), 6 + 2 * 2);

    let still = c
        .sweep_gradient((0.0.into(), 0.0.into()), 0.0, 90.0, &line)
        .unwrap();
    assert_eq!(still.format(), 8);
    assert!(!still.color_line().unwrap().is_variable());
}

#[test]
fn oversized_fixed_deltas_name_the_field() {
    let mut c = PaintCompiler::new(axes());
    let mut m = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0].map(Scalar::from);
    m[4] = Scalar::at_locations([(vec![], -30000.0), (vec![("AXSA", 100.0)], 30000.0)]);
    let err = c.transform(m, leaf()).unwrap_err();
    assert!(matches!(err, ColrError::Range(_)));
    assert!(err.to_string().contains("dx"));
}
