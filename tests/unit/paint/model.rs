use super::*;

#[test]
fn format_codes_cover_one_to_thirty_two() {
    let mut codes: Vec<u8> = PaintKind::ALL
        .iter()
        .flat_map(|k| std::iter::once(k.static_format()).chain(k.variable_format()))
        .collect();
    codes.sort_unstable();
    assert_eq!(codes, (1..=32).collect::<Vec<u8>>());

    assert_eq!(PaintKind::from_format(3).unwrap(), (PaintKind::Solid, true));
    assert_eq!(PaintKind::from_format(32).unwrap(), (PaintKind::Composite, false));
    assert!(PaintKind::from_format(33).is_err());
}

#[test]
fn field_tables_match_field_values() {
    let leaf = || Box::new(PaintNode::ColrGlyph(PaintColrGlyph { glyph: "a".into() }));
    let nodes = [
        PaintNode::Solid(PaintSolid {
            palette_index: 0,
            alpha: 0.5,
            var_index_base: Some(0),
        }),
        PaintNode::SweepGradient(PaintSweepGradient {
            color_line: ColorLine::default(),
            center_x: 1.0,
            center_y: 2.0,
            start_angle: 3.0,
            end_angle: 4.0,
            var_index_base: None,
        }),
        PaintNode::Transform(PaintTransform {
            paint: leaf(),
            transform: Affine2x3::IDENTITY,
            var_index_base: None,
        }),
        PaintNode::SkewAroundCenter(PaintSkewAroundCenter {
            paint: leaf(),
            x_skew_angle: 10.0,
            y_skew_angle: 0.0,
            center_x: 5.0,
            center_y: 6.0,
            var_index_base: None,
        }),
    ];
    for node in &nodes {
        assert_eq!(
            node.kind().variable_fields().len(),
            node.field_values().len(),
            "{}",
            node.kind()
        );
    }
    assert_eq!(nodes[0].format(), 3);
    assert_eq!(nodes[1].format(), 8);
    assert_eq!(nodes[2].field_values(), vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    assert!(nodes[3].child().is_some());
}

#[test]
fn transform_fields_use_affine_order() {
    let names: Vec<&str> = PaintKind::Transform
        .variable_fields()
        .iter()
        .map(|(n, _)| *n)
        .collect();
    assert_eq!(names, ["xx", "yx", "xy", "yy", "dx", "dy"]);
    assert!(
        PaintKind::Transform
            .variable_fields()
            .iter()
            .all(|(_, u)| *u == Unit::Fixed)
    );
}

#[test]
fn composite_modes_parse_case_insensitively() {
    assert_eq!(CompositeMode::parse("SRC_OVER").unwrap(), CompositeMode::SrcOver);
    assert_eq!(CompositeMode::parse("hue").unwrap(), CompositeMode::HslHue);
    assert_eq!(CompositeMode::parse("Multiply").unwrap(), CompositeMode::Multiply);

    let err = CompositeMode::parse("burn").unwrap_err();
    assert!(matches!(err, ColrError::Validation(_)));
    let msg = err.to_string();
    assert!(msg.contains("clear"));
    assert!(msg.contains("hsl_luminosity"));
}

#[test]
fn extend_modes_round_trip_through_text() {
    for e in [Extend::Pad, Extend::Repeat, Extend::Reflect] {
        assert_eq!(e.as_str().parse::<Extend>().unwrap(), e);
    }
    assert!("mirror".parse::<Extend>().is_err());
}

#[test]
fn nodes_serialize_with_a_kind_tag() {
    let node = PaintNode::Solid(PaintSolid {
        palette_index: 2,
        alpha: 1.0,
        var_index_base: None,
    });
    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json["kind"], "Solid");
    assert!(json.get("var_index_base").is_none());
    let back: PaintNode = serde_json::from_value(json).unwrap();
    assert_eq!(back, node);
}
