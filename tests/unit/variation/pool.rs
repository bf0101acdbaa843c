use super::*;
use crate::{foundation::core::AxisDef, variation::store::NO_VARIATION_INDEX};

fn axes() -> AxisSet {
    AxisSet::new(vec![AxisDef::new("ALPH", 0.0, 0.0, 1.0).unwrap()]).unwrap()
}

fn fading() -> Scalar {
    Scalar::at_locations([(vec![], 1.0), (vec![("ALPH", 1.0)], 0.5)])
}

#[test]
fn bundles_take_consecutive_offsets() {
    let mut pool = VariationPool::new(axes());
    let a = pool
        .register(vec![
            VarDescriptor::new("x", 10.0, Unit::Plain),
            VarDescriptor::new("y", 20.0, Unit::Plain),
        ])
        .unwrap();
    let b = pool
        .register(vec![VarDescriptor::new("Alpha", fading(), Unit::F2Dot14)])
        .unwrap();
    assert_eq!(a.base, 0);
    assert_eq!(b.base, 2);
    assert_eq!(pool.delta_set().len(), 3);
    assert_eq!(a.value("y").unwrap(), 20.0);
    assert_eq!(b.value("Alpha").unwrap(), 1.0);
    assert!(matches!(a.value("z"), Err(ColrError::Lookup(_))));
}

#[test]
fn equal_bundles_are_memoized() {
    let mut pool = VariationPool::new(axes());
    let bundle = || {
        vec![
            VarDescriptor::new("StopOffset", 0.5, Unit::F2Dot14),
            VarDescriptor::new("Alpha", fading(), Unit::F2Dot14),
        ]
    };
    let first = pool.register(bundle()).unwrap();
    let len = pool.delta_set().len();
    let again = pool.register(bundle()).unwrap();
    assert_eq!(first, again);
    assert_eq!(pool.delta_set().len(), len);

    // a different unit is a different bundle
    let other = pool
        .register(vec![
            VarDescriptor::new("StopOffset", 0.5, Unit::Plain),
            VarDescriptor::new("Alpha", fading(), Unit::F2Dot14),
        ])
        .unwrap();
    assert!(other.base > first.base);
}

#[test]
fn legacy_strings_warn_without_failing() {
    let mut pool = VariationPool::new(axes());
    let bundle = pool
        .register(vec![VarDescriptor::new(
            "Alpha",
            Scalar::Legacy("ALPH=0:1 ALPH=1:0.5".into()),
            Unit::F2Dot14,
        )])
        .unwrap();
    assert_eq!(bundle.value("Alpha").unwrap(), 1.0);
    let warnings = pool.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(pool.take_warnings().is_empty());
}

#[test]
fn finalize_remaps_to_physical_addresses() {
    let mut pool = VariationPool::new(axes());
    pool.register(vec![VarDescriptor::new("dx", 3.0, Unit::Plain)])
        .unwrap();
    pool.register(vec![VarDescriptor::new("Alpha", fading(), Unit::F2Dot14)])
        .unwrap();
    let store = pool.finalize().unwrap();

    assert_eq!(pool.delta_set()[0], NO_VARIATION_INDEX);
    let (_, row) = store.item(pool.delta_set()[1]).unwrap();
    assert_eq!(row, &[-8192]);
}

#[test]
fn registering_after_finalize_is_rejected() {
    let mut pool = VariationPool::new(axes());
    pool.finalize().unwrap();
    let err = pool
        .register(vec![VarDescriptor::new("dx", 1.0, Unit::Plain)])
        .unwrap_err();
    assert!(matches!(err, ColrError::Consistency(_)));
    assert!(pool.finalize().is_err());
}

#[test]
fn bad_values_abort_the_registration() {
    let mut pool = VariationPool::new(axes());
    let err = pool
        .register(vec![VarDescriptor::new("scale", 4.0, Unit::F2Dot14)])
        .unwrap_err();
    assert!(matches!(err, ColrError::Range(_)));
}
