use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::error::{OpafError, OpafResult};

/// Reserved colour value meaning "no colour".
pub const NO_COLOR: &str = "none";

const NAMED: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("silver", "#c0c0c0"),
    ("white", "#ffffff"),
    ("red", "#ff0000"),
    ("purple", "#800080"),
    ("green", "#008000"),
    ("yellow", "#ffff00"),
    ("blue", "#0000ff"),
];

static HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[a-fA-F0-9]{6}$").expect("hex pattern is valid"));

/// Normalize a colour to lowercase `#rrggbb`.
///
/// Accepts the small named table or strict six-digit hex; anything else is
/// a parameter error.
pub fn to_hex(value: &str) -> OpafResult<String> {
    let v = value.trim().to_lowercase();
    if let Some((_, hex)) = NAMED.iter().find(|(name, _)| *name == v) {
        return Ok((*hex).to_owned());
    }
    if HEX.is_match(&v) {
        return Ok(v);
    }
    Err(OpafError::parameter(format!(
        "'{value}' is not a valid hex rgb color string"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/document/color.rs"]
mod tests;
