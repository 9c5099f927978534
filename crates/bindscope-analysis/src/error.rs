use bindscope_core::model::Unsupported;
use bindscope_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("second result value must be of type error: {decl}")]
    InvalidDualReturn { decl: String },

    #[error("too many results to return ({count}): {decl}")]
    TooManyResults { decl: String, count: usize },

    #[error("id {id} is shared by {first} and {second}")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },

    #[error("{} unsupported declarations: {}", .0.len(), summarize(.0))]
    Unsupported(Vec<Unsupported>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Errors caused by the analyzed module rather than by this crate
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AnalysisError::Internal(_))
    }
}

fn summarize(entries: &[Unsupported]) -> String {
    entries
        .iter()
        .map(|u| format!("{} ({}: {})", u.name, u.kind, u.reason))
        .collect::<Vec<_>>()
        .join(", ")
}
