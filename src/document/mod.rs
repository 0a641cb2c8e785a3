//! In-memory model of a resolved pattern.

pub mod color;
pub mod defs;
pub mod image;
pub mod metadata;
pub mod pattern;

pub use defs::{
    ActionDef, BlockDef, ChartDef, ColorDef, ComponentDef, ConfigDef, ImageDef, Metadata, Params,
    ValueDef,
};
pub use image::{DEFAULT_IMAGE_MAX_DIM, ImageCodec, ThumbnailCodec};
pub use pattern::PatternDocument;
