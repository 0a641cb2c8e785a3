use super::*;

#[test]
fn resolves_relative_to_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("lib")).unwrap();
    std::fs::write(dir.path().join("lib/stitches.opaf"), "<pattern/>").unwrap();

    let p = resolve_uri("file://lib/stitches.opaf", dir.path()).unwrap();
    assert!(p.is_absolute());
    assert!(p.ends_with("lib/stitches.opaf"));
}

#[test]
fn rejects_missing_files_and_other_schemes() {
    let dir = tempfile::tempdir().unwrap();
    let err = resolve_uri("file://missing.opaf", dir.path()).unwrap_err();
    assert!(err.to_string().contains("file not found"));
    assert!(resolve_uri("https://example.com/a.opaf", dir.path()).is_err());
    assert!(resolve_uri("a.opaf", dir.path()).is_err());
}
