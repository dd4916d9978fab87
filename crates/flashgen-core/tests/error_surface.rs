use flashgen_core::{ErrorInfo, GenError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("path", "cache.memorySizeMB")
        .with_hint("check the template")
}

#[test]
fn structure_error_surface() {
    let err = GenError::Structure(sample_info("root-leaf", "leaf on root"));
    assert_eq!(err.info().code, "root-leaf");
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn parse_error_surface() {
    let err = GenError::Parse(sample_info("bad-literal", "unreadable literal"));
    assert_eq!(err.info().code, "bad-literal");
    assert!(err.to_string().starts_with("parse error:"));
}

#[test]
fn errors_serialize_with_their_family_tag() {
    let err = GenError::Missing(sample_info("absent-key", "key not present"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Missing\""));
    let decoded: GenError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
