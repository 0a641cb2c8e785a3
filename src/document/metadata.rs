use crate::foundation::error::{OpafError, OpafResult};
use crate::markup::Element;

/// Tags allowed anywhere inside `opaf:metadata`.
pub const METADATA_TAGS: &[&str] = &[
    "color",
    "description",
    "designer",
    "element",
    "gauge",
    "image",
    "link",
    "measurement",
    "needles",
    "published",
    "title",
    "schematic",
    "section",
    "size",
    "table",
    "tag",
    "technique",
    "text",
    "yarn",
];

/// Free-text tags whose content is not inspected.
pub const TEXT_TAGS: &[&str] = &["description", "published", "tag", "title"];

/// Check every descendant of a metadata element against the vocabulary.
pub fn check_metadata(el: &Element) -> OpafResult<()> {
    for child in el.elements() {
        let local = child.local_name();
        if !METADATA_TAGS.contains(&local) {
            return Err(OpafError::structure(format!(
                "metadata node with name '{}' not recognized",
                child.name
            )));
        }
        if TEXT_TAGS.contains(&local) {
            continue;
        }
        check_metadata(child)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/document/metadata.rs"]
mod tests;
