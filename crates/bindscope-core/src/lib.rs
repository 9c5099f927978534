//! Source description and binding model for bindscope
//!
//! `source`, `types` and `docs` describe what the type-checker and the
//! documentation extractor hand over; `model` is what the analysis produces.

pub mod capability;
pub mod docs;
pub mod error;
pub mod format;
mod method_set;
pub mod model;
pub mod source;
pub mod types;

pub use capability::{Capabilities, Capability};
pub use docs::DocPackage;
pub use error::CoreError;
pub use model::Package;
pub use source::{ModuleScope, Object, SourceModule};
pub use types::Type;
