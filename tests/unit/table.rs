use super::*;
use crate::{
    foundation::core::AxisDef,
    paint::model::{PaintNode, PaintSolid},
    variation::store::VarData,
};

fn solid() -> PaintNode {
    PaintNode::Solid(PaintSolid {
        palette_index: 0,
        alpha: 1.0,
        var_index_base: None,
    })
}

#[test]
fn documents_round_trip_through_json() {
    let mut colr = Colr::default();
    colr.glyphs.insert("A".into(), solid());
    let doc = FontDocument {
        axes: AxisSet::new(vec![AxisDef::new("wght", 100.0, 400.0, 900.0).unwrap()]).unwrap(),
        colr: Some(colr),
        cpal: Some(Cpal::default()),
    };
    let text = doc.to_json().unwrap();
    assert_eq!(FontDocument::from_json(&text).unwrap(), doc);
}

#[test]
fn bare_axes_documents_parse() {
    let doc = FontDocument::from_json(
        r#"{"axes": [{"tag": "ALPH", "min": 0, "default": 0, "max": 1}]}"#,
    )
    .unwrap();
    assert_eq!(doc.axes.len(), 1);
    assert!(doc.colr.is_none());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = FontDocument::from_json("{").unwrap_err();
    assert!(matches!(err, ColrError::Serde(_)));
}

#[test]
fn duplicate_axes_are_rejected() {
    let err = FontDocument::from_json(
        r#"{"axes": [
            {"tag": "wght", "min": 0, "default": 0, "max": 1},
            {"tag": "wght", "min": 0, "default": 0, "max": 1}
        ]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ColrError::Validation(_)));
}

#[test]
fn dangling_index_map_entries_are_rejected() {
    let colr = Colr {
        glyphs: Default::default(),
        var_store: VarStore {
            axis_count: 0,
            regions: vec![],
            data: vec![VarData::default()],
        },
        var_index_map: vec![NO_VARIATION_INDEX, 0],
    };
    assert!(matches!(colr.validate(), Err(ColrError::Consistency(_))));
}

#[test]
fn missing_files_are_reported_with_the_path() {
    let err = FontDocument::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.json"));
}
