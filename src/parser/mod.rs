//! Source reader and include resolver.
//!
//! Builds a [`PatternDocument`] from a source or packaged file. Unpackaged
//! input first receives the bundled standard library, then every include is
//! resolved depth-first and merged before the including file's own
//! definitions.

pub mod defs;
pub mod include;
mod stdlib;

use std::path::{Path, PathBuf};

use crate::document::{DEFAULT_IMAGE_MAX_DIM, ImageCodec, PatternDocument, ThumbnailCodec};
use crate::foundation::error::{OpafError, OpafResult};
use crate::markup::{Element, read_document};

pub use include::resolve_uri;

/// Elements allowed directly under the `pattern` root.
pub const TOP_LEVEL_NODES: &[&str] = &[
    "include",
    "metadata",
    "define_config",
    "define_value",
    "define_color",
    "define_image",
    "define_action",
    "define_chart",
    "define_block",
    "component",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserOptions {
    /// Deepest include chain accepted before giving up.
    pub max_include_depth: usize,
    /// Longest image edge used when no `size` attribute is given.
    pub image_max_dim: u32,
    /// Merge the bundled standard library into unpackaged documents.
    pub load_stdlib: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_include_depth: 32,
            image_max_dim: DEFAULT_IMAGE_MAX_DIM,
            load_stdlib: true,
        }
    }
}

pub struct Parser {
    options: ParserOptions,
    codec: Box<dyn ImageCodec>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

/// One parsed source file.
struct Source {
    root: Element,
    namespace: String,
    dir: PathBuf,
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            codec: Box::new(ThumbnailCodec::default()),
        }
    }

    pub fn with_codec(mut self, codec: impl ImageCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Parse the file at `path` and everything it includes.
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    pub fn parse(&self, path: &Path) -> OpafResult<PatternDocument> {
        let path = std::fs::canonicalize(path)?;
        let text = std::fs::read_to_string(&path)?;
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.parse_source(&text, &dir, vec![path])
    }

    /// Parse in-memory source text; relative includes resolve against `dir`.
    pub fn parse_str(&self, text: &str, dir: &Path) -> OpafResult<PatternDocument> {
        self.parse_source(text, dir, Vec::new())
    }

    fn parse_source(
        &self,
        text: &str,
        dir: &Path,
        mut stack: Vec<PathBuf>,
    ) -> OpafResult<PatternDocument> {
        let main = load(text, dir)?;
        let root = &main.root;

        let mut doc = PatternDocument::new(main.namespace.clone());
        doc.name = root.attr("name").unwrap_or_default().trim().to_owned();
        doc.version = root.attr("version").map(str::to_owned);
        doc.unique_id = root.attr("unique_id").map(str::to_owned);
        doc.pkg_version = root.attr("pkg_version").map(str::to_owned);

        if !doc.is_packaged() && self.options.load_stdlib {
            for (name, source) in stdlib::SOURCES {
                tracing::debug!(library = *name, "loading standard library");
                let lib = load(source, dir)?;
                self.merge(&mut doc, &lib)?;
            }
        }

        self.resolve_includes(&mut doc, &main, &mut stack, 0)?;
        self.merge(&mut doc, &main)?;
        for el in root.elements().filter(|e| e.is("component")) {
            doc.add_component(defs::component(el)?);
        }
        Ok(doc)
    }

    /// Merge the includes of `source`, which sits `depth` includes below the
    /// main document. `stack` holds the files currently being included.
    fn resolve_includes(
        &self,
        doc: &mut PatternDocument,
        source: &Source,
        stack: &mut Vec<PathBuf>,
        depth: usize,
    ) -> OpafResult<()> {
        for el in source.root.elements().filter(|e| e.is("include")) {
            let uri = defs::required_attr(el, "uri")?;
            let path = resolve_uri(uri, &source.dir)?;
            if stack.contains(&path) {
                return Err(OpafError::structure(format!(
                    "include cycle detected at '{}'",
                    path.display()
                )));
            }
            if depth >= self.options.max_include_depth {
                return Err(OpafError::structure(format!(
                    "includes nested deeper than {} levels at '{}'",
                    self.options.max_include_depth,
                    path.display()
                )));
            }

            tracing::debug!(path = %path.display(), "resolving include");
            let text = std::fs::read_to_string(&path)?;
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            let included = load(&text, &dir)?;

            stack.push(path);
            self.resolve_includes(doc, &included, stack, depth + 1)?;
            stack.pop();
            self.merge(doc, &included)?;
        }
        Ok(())
    }

    /// Merge one file's definitions into `doc`, category by category.
    fn merge(&self, doc: &mut PatternDocument, source: &Source) -> OpafResult<()> {
        let root = &source.root;
        for el in opaf_children(root, "define_color") {
            doc.add_color(defs::color(el)?)?;
        }
        for el in opaf_children(root, "define_config") {
            doc.add_config(defs::config(el)?)?;
        }
        for el in opaf_children(root, "define_value") {
            doc.add_value(defs::value(el)?)?;
        }
        for el in opaf_children(root, "define_image") {
            doc.add_image(defs::image(
                el,
                &source.dir,
                self.codec.as_ref(),
                self.options.image_max_dim,
            )?)?;
        }
        for el in opaf_children(root, "metadata") {
            doc.add_metadata(defs::metadata(el)?);
        }
        for el in opaf_children(root, "define_action") {
            doc.add_action(defs::action(el)?)?;
        }
        for el in opaf_children(root, "define_chart") {
            doc.add_chart(defs::chart(el)?)?;
        }
        for el in opaf_children(root, "define_block") {
            doc.add_block(defs::block(el)?)?;
        }
        Ok(())
    }
}

fn opaf_children<'a>(root: &'a Element, local: &'a str) -> impl Iterator<Item = &'a Element> {
    root.elements().filter(move |e| e.is(local))
}

/// Read and validate one file: `pattern` root, declared `opaf` namespace,
/// and only known top-level elements.
fn load(text: &str, dir: &Path) -> OpafResult<Source> {
    let parsed = read_document(text)?;
    let root = parsed.root;
    if root.name != "pattern" {
        return Err(OpafError::structure(format!(
            "'pattern' root node not found (found '{}')",
            root.name
        )));
    }
    let Some(namespace) = parsed.opaf_namespace else {
        return Err(OpafError::structure(
            "OPAF namespace is not declared in pattern attributes",
        ));
    };
    for el in root.elements() {
        if !el.is_opaf() || !TOP_LEVEL_NODES.contains(&el.local_name()) {
            return Err(OpafError::structure(format!(
                "node with name '{}' not recognized",
                el.name
            )));
        }
    }
    Ok(Source {
        root,
        namespace,
        dir: dir.to_path_buf(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/parser/mod.rs"]
mod tests;
