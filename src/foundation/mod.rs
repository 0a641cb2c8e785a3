//! Error taxonomy and scalar values shared by every stage.

pub mod error;
pub mod value;

pub use error::{OpafError, OpafResult};
pub use value::{Scope, Value};
