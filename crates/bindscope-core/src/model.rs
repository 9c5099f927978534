//! Resolved binding model handed to code generators
//!
//! Every item is addressable by an id string unique within its [`Package`].

use crate::capability::{Capabilities, Capability};
use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed slot: package variable, parameter, result, receiver or field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default)]
    pub name: String,
    pub ty: Type,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: Type, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            doc: doc.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recv: Option<Variable>,
    pub params: Vec<Variable>,
    pub results: Vec<Variable>,
    #[serde(default)]
    pub variadic: bool,
}

/// A function, method, constructor or generated accessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Func {
    pub id: String,
    pub name: String,
    pub doc: String,
    pub signature: Signature,
    /// Declared non-error return type
    pub ret: Option<Type>,
    /// Declared with a trailing error result
    pub has_error: bool,
    /// Claimed as a constructor of an aggregate type
    pub is_ctor: bool,
}

/// Exported struct type with its constructors and full method set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    pub id: String,
    pub name: String,
    pub doc: String,
    pub ty: Type,
    /// Exported fields of the struct, embedded ones included
    pub fields: Vec<Variable>,
    pub ctors: Vec<Func>,
    pub methods: Vec<Func>,
    pub capabilities: Capabilities,
}

impl Struct {
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn method(&self, name: &str) -> Option<&Func> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn ctor(&self, name: &str) -> Option<&Func> {
        self.ctors.iter().find(|c| c.name == name)
    }
}

/// Exported constant, exposed through a zero-argument getter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Const {
    pub id: String,
    pub name: String,
    pub doc: String,
    pub ty: Type,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    pub getter: Func,
}

/// Exported package variable with generated accessors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Var {
    pub id: String,
    #[serde(flatten)]
    pub variable: Variable,
    pub getter: Func,
    pub setter: Func,
}

impl Var {
    pub fn name(&self) -> &str {
        &self.variable.name
    }
}

/// Declaration left out of the model because it has no host mapping yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unsupported {
    pub name: String,
    pub kind: String,
    pub reason: String,
}

/// Position of a named item inside a [`Package`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum ModelRef {
    Const(usize),
    Var(usize),
    Struct(usize),
    Func(usize),
    /// Constructor at `(struct, ctor)`
    Ctor(usize, usize),
}

/// Borrowed view of a model item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'a> {
    Const(&'a Const),
    Var(&'a Var),
    Struct(&'a Struct),
    Func(&'a Func),
}

impl Item<'_> {
    pub fn id(&self) -> &str {
        match self {
            Item::Const(c) => &c.id,
            Item::Var(v) => &v.id,
            Item::Struct(s) => &s.id,
            Item::Func(f) => &f.id,
        }
    }
}

/// Resolved public interface of one module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    name: String,
    doc: String,
    consts: Vec<Const>,
    vars: Vec<Var>,
    structs: Vec<Struct>,
    funcs: Vec<Func>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    unsupported: Vec<Unsupported>,
    objects: BTreeMap<String, ModelRef>,
}

/// Parts a [`Package`] is assembled from
#[derive(Debug, Clone, Default)]
pub struct PackageParts {
    pub name: String,
    pub doc: String,
    pub consts: Vec<Const>,
    pub vars: Vec<Var>,
    pub structs: Vec<Struct>,
    pub funcs: Vec<Func>,
    pub unsupported: Vec<Unsupported>,
}

impl Package {
    /// Assemble a package and index its items by declared name
    pub fn new(parts: PackageParts) -> Self {
        let mut objects = BTreeMap::new();
        for (i, c) in parts.consts.iter().enumerate() {
            objects.insert(c.name.clone(), ModelRef::Const(i));
        }
        for (i, v) in parts.vars.iter().enumerate() {
            objects.insert(v.name().to_string(), ModelRef::Var(i));
        }
        for (i, s) in parts.structs.iter().enumerate() {
            objects.insert(s.name.clone(), ModelRef::Struct(i));
            for (j, ctor) in s.ctors.iter().enumerate() {
                objects.insert(ctor.name.clone(), ModelRef::Ctor(i, j));
            }
        }
        for (i, f) in parts.funcs.iter().enumerate() {
            objects.insert(f.name.clone(), ModelRef::Func(i));
        }

        Self {
            name: parts.name,
            doc: parts.doc,
            consts: parts.consts,
            vars: parts.vars,
            structs: parts.structs,
            funcs: parts.funcs,
            unsupported: parts.unsupported,
            objects,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn consts(&self) -> &[Const] {
        &self.consts
    }

    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    pub fn structs(&self) -> &[Struct] {
        &self.structs
    }

    pub fn funcs(&self) -> &[Func] {
        &self.funcs
    }

    pub fn unsupported(&self) -> &[Unsupported] {
        &self.unsupported
    }

    /// Model item for a declared name
    pub fn lookup(&self, name: &str) -> Option<Item<'_>> {
        let item = match *self.objects.get(name)? {
            ModelRef::Const(i) => Item::Const(&self.consts[i]),
            ModelRef::Var(i) => Item::Var(&self.vars[i]),
            ModelRef::Struct(i) => Item::Struct(&self.structs[i]),
            ModelRef::Func(i) => Item::Func(&self.funcs[i]),
            ModelRef::Ctor(s, c) => Item::Func(&self.structs[s].ctors[c]),
        };
        Some(item)
    }

    pub fn find_struct(&self, name: &str) -> Option<&Struct> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_func(&self, name: &str) -> Option<&Func> {
        self.funcs.iter().find(|f| f.name == name)
    }

    /// Every id in the package, accessors and members included
    pub fn ids(&self) -> Vec<&str> {
        self.id_owners().into_iter().map(|(id, _)| id).collect()
    }

    /// Every id paired with a readable name of the item it belongs to
    pub fn id_owners(&self) -> Vec<(&str, String)> {
        let mut ids = Vec::new();
        for c in &self.consts {
            ids.push((c.id.as_str(), format!("const {}", c.name)));
            ids.push((c.getter.id.as_str(), format!("getter of {}", c.name)));
        }
        for v in &self.vars {
            ids.push((v.id.as_str(), format!("var {}", v.name())));
            ids.push((v.getter.id.as_str(), format!("getter of {}", v.name())));
            ids.push((v.setter.id.as_str(), format!("setter of {}", v.name())));
        }
        for s in &self.structs {
            ids.push((s.id.as_str(), format!("struct {}", s.name)));
            for f in &s.ctors {
                ids.push((f.id.as_str(), format!("constructor {}.{}", s.name, f.name)));
            }
            for f in &s.methods {
                ids.push((f.id.as_str(), format!("method {}.{}", s.name, f.name)));
            }
        }
        for f in &self.funcs {
            ids.push((f.id.as_str(), format!("func {}", f.name)));
        }
        ids
    }

    /// Find a constant, variable, struct or callable by id
    pub fn by_id(&self, id: &str) -> Option<Item<'_>> {
        self.consts
            .iter()
            .map(Item::Const)
            .chain(self.vars.iter().map(Item::Var))
            .chain(self.structs.iter().map(Item::Struct))
            .chain(self.funcs.iter().map(Item::Func))
            .chain(
                self.structs
                    .iter()
                    .flat_map(|s| s.ctors.iter().chain(s.methods.iter()))
                    .map(Item::Func),
            )
            .chain(self.consts.iter().map(|c| Item::Func(&c.getter)))
            .chain(
                self.vars
                    .iter()
                    .flat_map(|v| [&v.getter, &v.setter])
                    .map(Item::Func),
            )
            .find(|item| item.id() == id)
    }
}
