use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ColrError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ColrError::range("x").to_string().contains("range error:"));
    assert!(
        ColrError::consistency("x")
            .to_string()
            .contains("consistency error:")
    );
    assert!(ColrError::lookup("x").to_string().contains("lookup error:"));
    assert!(
        ColrError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn script_errors_keep_their_offset() {
    let err = ColrError::from(ScriptError::new(7, "unexpected token"));
    let text = err.to_string();
    assert!(text.contains("script error:"));
    assert!(text.contains("byte 7"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ColrError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
