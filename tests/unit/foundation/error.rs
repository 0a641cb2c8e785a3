use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        OpafError::structure("x")
            .to_string()
            .contains("structure error:")
    );
    assert!(
        OpafError::reference("x")
            .to_string()
            .contains("reference error:")
    );
    assert!(
        OpafError::parameter("x")
            .to_string()
            .contains("parameter error:")
    );
    assert!(
        OpafError::expression("x")
            .to_string()
            .contains("expression error:")
    );
    assert!(
        OpafError::stitch("x")
            .to_string()
            .contains("stitch count error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = OpafError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn xml_reader_errors_convert() {
    let err: OpafError = roxmltree::Document::parse("<a>").unwrap_err().into();
    assert!(err.to_string().starts_with("xml error:"));
}
