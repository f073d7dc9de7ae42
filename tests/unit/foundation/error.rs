use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TypebannerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TypebannerError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        TypebannerError::empty_sequence("x")
            .to_string()
            .contains("empty sequence:")
    );
    assert!(
        TypebannerError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        TypebannerError::delivery("x")
            .to_string()
            .contains("delivery error:")
    );
    assert!(
        TypebannerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TypebannerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_render_failures_are_recoverable() {
    assert!(!TypebannerError::render("bad glyph").is_fatal());
    assert!(TypebannerError::empty_sequence("none").is_fatal());
    assert!(TypebannerError::encode("ffmpeg").is_fatal());
}
