use crate::document::defs::{
    ActionDef, BlockDef, ChartDef, ColorDef, ComponentDef, ConfigDef, ImageDef, Metadata,
    ValueDef,
};
use crate::foundation::error::{OpafError, OpafResult};

/// Fully resolved pattern.
///
/// Collections are append-only while parsing; every named collection except
/// components rejects a second definition of the same name on insertion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatternDocument {
    pub name: String,
    pub version: Option<String>,
    pub unique_id: Option<String>,
    pub namespace: String,
    /// Set once the document has been packaged.
    pub pkg_version: Option<String>,
    pub configs: Vec<ConfigDef>,
    pub values: Vec<ValueDef>,
    pub colors: Vec<ColorDef>,
    pub images: Vec<ImageDef>,
    pub actions: Vec<ActionDef>,
    pub blocks: Vec<BlockDef>,
    pub charts: Vec<ChartDef>,
    pub components: Vec<ComponentDef>,
    pub metadata: Option<Metadata>,
}

fn insert_unique<T>(
    items: &mut Vec<T>,
    item: T,
    kind: &str,
    name_of: impl Fn(&T) -> &str,
) -> OpafResult<()> {
    let name = name_of(&item);
    if items.iter().any(|existing| name_of(existing) == name) {
        return Err(OpafError::structure(format!(
            "{kind} with name '{name}' already exists"
        )));
    }
    items.push(item);
    Ok(())
}

fn find<'a, T>(
    items: &'a [T],
    name: &str,
    kind: &str,
    name_of: impl Fn(&T) -> &str,
) -> OpafResult<&'a T> {
    items
        .iter()
        .find(|item| name_of(item) == name)
        .ok_or_else(|| OpafError::reference(format!("{kind} with name '{name}' not found")))
}

impl PatternDocument {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn is_packaged(&self) -> bool {
        self.pkg_version.is_some()
    }

    pub fn add_config(&mut self, def: ConfigDef) -> OpafResult<()> {
        insert_unique(&mut self.configs, def, "config", |d| d.name.as_str())
    }

    pub fn add_value(&mut self, def: ValueDef) -> OpafResult<()> {
        insert_unique(&mut self.values, def, "value", |d| d.name.as_str())
    }

    pub fn add_color(&mut self, def: ColorDef) -> OpafResult<()> {
        insert_unique(&mut self.colors, def, "color", |d| d.name.as_str())
    }

    pub fn add_image(&mut self, def: ImageDef) -> OpafResult<()> {
        insert_unique(&mut self.images, def, "image", |d| d.name.as_str())
    }

    pub fn add_action(&mut self, def: ActionDef) -> OpafResult<()> {
        insert_unique(&mut self.actions, def, "action", |d| d.name.as_str())
    }

    pub fn add_block(&mut self, def: BlockDef) -> OpafResult<()> {
        insert_unique(&mut self.blocks, def, "block", |d| d.name.as_str())
    }

    pub fn add_chart(&mut self, def: ChartDef) -> OpafResult<()> {
        insert_unique(&mut self.charts, def, "chart", |d| d.name.as_str())
    }

    pub fn add_component(&mut self, def: ComponentDef) {
        self.components.push(def);
    }

    /// Metadata blocks accumulate in merge order.
    pub fn add_metadata(&mut self, metadata: Metadata) {
        match &mut self.metadata {
            Some(existing) => existing.elements.extend(metadata.elements),
            None => self.metadata = Some(metadata),
        }
    }

    pub fn config(&self, name: &str) -> OpafResult<&ConfigDef> {
        find(&self.configs, name, "config", |d| d.name.as_str())
    }

    pub fn color(&self, name: &str) -> OpafResult<&ColorDef> {
        find(&self.colors, name, "color", |d| d.name.as_str())
    }

    pub fn image(&self, name: &str) -> OpafResult<&ImageDef> {
        find(&self.images, name, "image", |d| d.name.as_str())
    }

    pub fn action(&self, name: &str) -> OpafResult<&ActionDef> {
        find(&self.actions, name, "action", |d| d.name.as_str())
    }

    pub fn block(&self, name: &str) -> OpafResult<&BlockDef> {
        find(&self.blocks, name, "block", |d| d.name.as_str())
    }

    pub fn chart(&self, name: &str) -> OpafResult<&ChartDef> {
        find(&self.charts, name, "chart", |d| d.name.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/pattern.rs"]
mod tests;
