use super::*;

fn wght() -> AxisDef {
    AxisDef::new("wght", 100.0, 400.0, 900.0).unwrap()
}

#[test]
fn normalize_maps_each_side_of_default() {
    let a = wght();
    assert_eq!(a.normalize(400.0), 0.0);
    assert_eq!(a.normalize(900.0), 1.0);
    assert_eq!(a.normalize(100.0), -1.0);
    assert_eq!(a.normalize(650.0), 0.5);
    assert_eq!(a.normalize(2000.0), 1.0);
    assert_eq!(a.denormalize(0.5), 650.0);
    assert_eq!(a.denormalize(-1.0), 100.0);
}

#[test]
fn axis_definition_parses_from_cli_form() {
    let a: AxisDef = "ALPH:0:0:1:Alpha".parse().unwrap();
    assert_eq!(a.tag, "ALPH");
    assert_eq!(a.max, 1.0);
    assert_eq!(a.name, "Alpha");

    let unnamed: AxisDef = "wdth:50:100:200".parse().unwrap();
    assert_eq!(unnamed.name, "wdth");

    assert!("wght:900:400:100:Weight".parse::<AxisDef>().is_err());
    assert!("wght:a:400:900:Weight".parse::<AxisDef>().is_err());
    assert!("wght".parse::<AxisDef>().is_err());
}

#[test]
fn axis_set_rejects_duplicates() {
    assert!(AxisSet::new(vec![wght(), wght()]).is_err());
    let mut set = AxisSet::new(vec![wght()]).unwrap();
    assert!(set.push(wght()).is_err());
}

#[test]
fn location_completion_fills_defaults_and_rejects_unknown_axes() {
    let axes = AxisSet::new(vec![
        wght(),
        AxisDef::new("wdth", 50.0, 100.0, 200.0).unwrap(),
    ])
    .unwrap();
    let loc = Location::complete(&[("wdth".to_string(), 150.0)], &axes).unwrap();
    assert_eq!(loc.get("wght"), Some(400.0));
    assert_eq!(loc.get("wdth"), Some(150.0));
    assert_eq!(
        Location::complete(&[], &axes).unwrap(),
        axes.default_location()
    );

    let err = Location::complete(&[("XXXX".to_string(), 1.0)], &axes).unwrap_err();
    assert!(matches!(err, ColrError::Lookup(_)));
}

#[test]
fn colors_parse_and_print_as_hex() {
    let c = Color::parse_hex("#ff000080").unwrap();
    assert_eq!(c, Color::rgba(255, 0, 0, 128));
    assert_eq!(c.to_string(), "#FF000080");
    assert_eq!(Color::parse_hex("#00FF00").unwrap().a, 255);
    assert!(Color::parse_hex("#12345").is_err());
    assert!(Color::parse_hex("#GG0000FF").is_err());

    assert!(Color::parse_strict("#FF0000FF").is_ok());
    assert!(Color::parse_strict("#FF0000").is_err());
    assert!(Color::parse_strict("FF0000FF").is_err());
}

#[test]
fn colors_serialize_as_strings() {
    let json = serde_json::to_string(&Color::rgba(1, 2, 3, 4)).unwrap();
    assert_eq!(json, "\"#01020304\"");
    let back: Color = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Color::rgba(1, 2, 3, 4));
}
