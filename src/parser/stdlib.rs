/// Bundled standard library, merged in this order before unpackaged input.
pub(crate) const SOURCES: &[(&str, &str)] = &[
    ("stitches", include_str!("stdlib/stitches.opaf")),
    ("blocks", include_str!("stdlib/blocks.opaf")),
];
