use std::path::{Path, PathBuf};

use crate::foundation::error::{OpafError, OpafResult};

/// Resolve a `scheme://path` reference to an existing file.
///
/// Only `file` is supported; relative paths are taken against `base_dir`
/// (the directory of the referencing file).
pub fn resolve_uri(uri: &str, base_dir: &Path) -> OpafResult<PathBuf> {
    let Some((scheme, rest)) = uri.trim().split_once("://") else {
        return Err(OpafError::structure(format!("invalid uri '{uri}'")));
    };
    if scheme != "file" {
        return Err(OpafError::structure(format!(
            "unsupported uri scheme '{scheme}' in '{uri}'"
        )));
    }

    let path = Path::new(rest);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    if !path.is_file() {
        return Err(OpafError::structure(format!(
            "file not found with uri '{uri}'"
        )));
    }
    Ok(std::fs::canonicalize(&path)?)
}

#[cfg(test)]
#[path = "../../tests/unit/parser/include.rs"]
mod tests;
