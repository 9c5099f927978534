//! Documentation tree produced by the doc-comment extractor
//!
//! Comments are grouped the way a documentation tool presents a package:
//! package-level constant and variable groups, free functions, and types
//! with their own constructors, methods and typed constant/variable groups.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocPackage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub consts: Vec<ValueDoc>,
    #[serde(default)]
    pub vars: Vec<ValueDoc>,
    #[serde(default)]
    pub types: Vec<TypeDoc>,
    #[serde(default)]
    pub funcs: Vec<FuncDoc>,
}

/// One declaration group, possibly naming several identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDoc {
    pub names: Vec<String>,
    #[serde(default)]
    pub doc: String,
}

impl ValueDoc {
    pub fn covers(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDoc {
    pub name: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub consts: Vec<ValueDoc>,
    #[serde(default)]
    pub vars: Vec<ValueDoc>,
    /// Constructors associated with the type
    #[serde(default)]
    pub funcs: Vec<FuncDoc>,
    #[serde(default)]
    pub methods: Vec<FuncDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncDoc {
    pub name: String,
    #[serde(default)]
    pub doc: String,
}

impl DocPackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn find_type(&self, name: &str) -> Option<&TypeDoc> {
        self.types.iter().find(|t| t.name == name)
    }
}

impl FuncDoc {
    pub fn new(name: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
        }
    }
}

impl ValueDoc {
    pub fn new<I, S>(names: I, doc: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            doc: doc.into(),
        }
    }
}
