use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QrStyleError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        QrStyleError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        QrStyleError::asset_decode("x")
            .to_string()
            .contains("asset decode error:")
    );
    assert!(
        QrStyleError::font_resource("x")
            .to_string()
            .contains("font resource error:")
    );
}

#[test]
fn empty_content_message_is_user_facing() {
    assert_eq!(
        QrStyleError::EmptyContent.to_string(),
        "content must not be empty"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QrStyleError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
