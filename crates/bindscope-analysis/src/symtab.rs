//! Registry of the exported declarations seen during analysis

use bindscope_core::source::{ModuleScope, Object, ObjectKind};
use bindscope_core::Type;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: ObjectKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,
}

/// Exported symbols keyed by name. Registering a name again replaces the
/// earlier entry.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    syms: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every exported declaration of `scope`
    pub fn from_scope<S: ModuleScope + ?Sized>(scope: &S) -> Self {
        let mut table = Self::new();
        for name in scope.names() {
            if let Some(obj) = scope.lookup(name).filter(|o| o.is_exported()) {
                table.add_symbol(scope.name(), obj);
            }
        }
        table
    }

    /// Register `obj`, returning the symbol it replaced
    pub fn add_symbol(&mut self, module: &str, obj: &Object) -> Option<Symbol> {
        let symbol = Symbol {
            name: obj.name().to_string(),
            kind: obj.kind(),
            ty: obj.ty(module),
        };
        self.syms.insert(symbol.name.clone(), symbol)
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.syms.get(name)
    }

    pub fn len(&self) -> usize {
        self.syms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syms.is_empty()
    }

    /// Symbols in name order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.syms.values()
    }
}
