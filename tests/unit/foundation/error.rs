use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(LedSignError::format("x").to_string().contains("format error:"));
    assert!(
        LedSignError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(LedSignError::render("x").to_string().contains("render error:"));
    assert!(
        LedSignError::file_not_found("fonts/a.fnt")
            .to_string()
            .contains("file not found: fonts/a.fnt")
    );
}

#[test]
fn size_limit_reports_both_sizes() {
    let err = LedSignError::SizeLimitExceeded {
        path: PathBuf::from("big.json"),
        size: 11,
        limit: 10,
    };
    let msg = err.to_string();
    assert!(msg.contains("big.json"));
    assert!(msg.contains("11 bytes"));
    assert!(msg.contains("limit 10"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LedSignError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
