//! Interface analysis for binding generators
//!
//! Walks the exported declarations of a type-checked module, attaches their
//! documentation, turns matching free functions into constructors and
//! collects the method sets of struct types. The result is a
//! [`Package`](bindscope_core::Package) model ready for code emission.

pub mod callable;
pub mod config;
pub mod docs;
pub mod error;
pub mod observer;
pub mod package;
mod reclassify;
pub mod symtab;

pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use observer::{AnalysisObserver, AnalysisTrace, RecordingObserver, TracingObserver};
pub use package::{analyze, Analyzer};
pub use symtab::{Symbol, SymbolTable};
