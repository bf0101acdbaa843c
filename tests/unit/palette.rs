use super::*;

fn red() -> ColorSpec {
    ColorSpec::parse("#FF0000FF").unwrap()
}

fn blue() -> ColorSpec {
    ColorSpec::parse("#0000FFFF").unwrap()
}

#[test]
fn foreground_is_the_sentinel_in_any_mode() {
    let mut pm = PaletteManager::new();
    assert_eq!(pm.index_of(&ColorSpec::Foreground).unwrap(), FOREGROUND);
    pm.index_of(&red()).unwrap();
    assert_eq!(pm.index_of(&ColorSpec::Foreground).unwrap(), 0xFFFF);

    let mut explicit = PaletteManager::new();
    explicit
        .set_explicit(vec![vec!["#FF0000FF".into()]])
        .unwrap();
    assert_eq!(explicit.index_of(&ColorSpec::parse("foreground").unwrap()).unwrap(), 0xFFFF);
}

#[test]
fn implicit_colors_are_deduplicated_by_value() {
    let mut pm = PaletteManager::new();
    assert_eq!(pm.index_of(&red()).unwrap(), 0);
    assert_eq!(pm.index_of(&blue()).unwrap(), 1);
    // same value, different spelling
    assert_eq!(pm.index_of(&ColorSpec::parse("#ff0000").unwrap()).unwrap(), 0);
    assert_eq!(pm.entries().len(), 2);
    assert_eq!(pm.index_of(&ColorSpec::Index(1)).unwrap(), 1);
}

#[test]
fn explicit_mode_requires_indices() {
    let mut pm = PaletteManager::new();
    pm.set_explicit(vec![
        vec!["#FF0000FF".into(), "#880000FF".into()],
        vec!["#0000FFFF".into(), "#000088FF".into()],
    ])
    .unwrap();
    assert_eq!(pm.index_of(&ColorSpec::Index(1)).unwrap(), 1);
    assert!(matches!(pm.index_of(&red()), Err(ColrError::Validation(_))));
    let err = pm.index_of(&ColorSpec::Index(2)).unwrap_err();
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn explicit_colors_must_be_strict() {
    let mut pm = PaletteManager::new();
    let err = pm
        .set_explicit(vec![vec!["#FF0000FF".into()], vec!["#00F".into()]])
        .unwrap_err();
    assert!(matches!(err, ColrError::Validation(_)));
    assert!(err.to_string().contains("entry 1, color 0"));
    assert!(!pm.is_explicit());
}

#[test]
fn explicit_after_implicit_is_a_conflict() {
    let mut pm = PaletteManager::new();
    pm.index_of(&red()).unwrap();
    let err = pm.set_explicit(vec![vec!["#FF0000FF".into()]]).unwrap_err();
    assert!(matches!(err, ColrError::Consistency(_)));
}

#[test]
fn single_color_entries_broadcast_beside_multi_slot_entries() {
    let mut pm = PaletteManager::new();
    pm.index_of(&red()).unwrap();
    let three = ColorSpec::Literal(vec![
        Color::rgba(1, 1, 1, 255),
        Color::rgba(2, 2, 2, 255),
        Color::rgba(3, 3, 3, 255),
    ]);
    pm.index_of(&three).unwrap();

    let cpal = pm.finalize_entries().unwrap();
    assert_eq!(cpal.palettes.len(), 3);
    for (slot, palette) in cpal.palettes.iter().enumerate() {
        assert_eq!(palette[0], Color::rgba(255, 0, 0, 255));
        let v = slot as u8 + 1;
        assert_eq!(palette[1], Color::rgba(v, v, v, 255));
    }
    assert_eq!(cpal.entry(1).unwrap().len(), 3);
    assert!(matches!(cpal.entry(2), Err(ColrError::Lookup(_))));
}

#[test]
fn mismatched_slot_counts_are_rejected() {
    let mut pm = PaletteManager::new();
    pm.index_of(&ColorSpec::Literal(vec![Color::rgba(0, 0, 0, 255); 2]))
        .unwrap();
    pm.index_of(&ColorSpec::Literal(vec![Color::rgba(9, 9, 9, 255); 3]))
        .unwrap();
    let err = pm.finalize_entries().unwrap_err();
    assert!(matches!(err, ColrError::Consistency(_)));
}

#[test]
fn slot_flags_accumulate() {
    let mut pm = PaletteManager::new();
    assert!(pm.set_slot_flags(0, PaletteMode::Light).is_err());

    pm.index_of(&ColorSpec::Literal(vec![
        Color::rgba(0, 0, 0, 255),
        Color::rgba(255, 255, 255, 255),
    ]))
    .unwrap();
    pm.set_slot_flags(1, PaletteMode::Dark).unwrap();
    pm.set_slot_flags(1, "light".parse().unwrap()).unwrap();
    assert!(pm.set_slot_flags(2, PaletteMode::Dark).is_err());

    let cpal = pm.finalize_entries().unwrap();
    assert_eq!(cpal.palette_types, vec![0, 3]);
}
