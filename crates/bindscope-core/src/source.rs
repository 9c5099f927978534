//! Declarations of a type-checked module and the scope interface over them

use crate::capability::Capability;
use crate::error::CoreError;
use crate::method_set;
use crate::types::{is_exported, Signature, Type, ERROR_TYPE_NAME};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A top-level declaration object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Object {
    Const {
        name: String,
        ty: Type,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<serde_json::Value>,
    },
    Var {
        name: String,
        ty: Type,
    },
    Func {
        name: String,
        signature: Signature,
    },
    TypeName(TypeDecl),
    Builtin {
        name: String,
    },
    PkgName {
        name: String,
        #[serde(default)]
        path: String,
    },
}

/// Kind tag of an [`Object`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Const,
    Var,
    Func,
    TypeName,
    Builtin,
    PkgName,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Const => "const",
            ObjectKind::Var => "var",
            ObjectKind::Func => "func",
            ObjectKind::TypeName => "type",
            ObjectKind::Builtin => "builtin",
            ObjectKind::PkgName => "package",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Object {
    pub fn name(&self) -> &str {
        match self {
            Object::Const { name, .. }
            | Object::Var { name, .. }
            | Object::Func { name, .. }
            | Object::Builtin { name }
            | Object::PkgName { name, .. } => name,
            Object::TypeName(decl) => &decl.name,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Const { .. } => ObjectKind::Const,
            Object::Var { .. } => ObjectKind::Var,
            Object::Func { .. } => ObjectKind::Func,
            Object::TypeName(_) => ObjectKind::TypeName,
            Object::Builtin { .. } => ObjectKind::Builtin,
            Object::PkgName { .. } => ObjectKind::PkgName,
        }
    }

    pub fn is_exported(&self) -> bool {
        is_exported(self.name())
    }

    /// Semantic type of the object, if it has one
    pub fn ty(&self, module: &str) -> Option<Type> {
        match self {
            Object::Const { ty, .. } | Object::Var { ty, .. } => Some(ty.clone()),
            Object::Func { signature, .. } => Some(Type::Func(Box::new(signature.clone()))),
            Object::TypeName(decl) => Some(decl.ty(module)),
            Object::Builtin { .. } | Object::PkgName { .. } => None,
        }
    }
}

/// A named type declaration with its declared methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub underlying: Type,
    /// `type A = B` rather than a new defined type
    #[serde(default)]
    pub alias: bool,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    /// The named type this declaration introduces
    pub fn ty(&self, module: &str) -> Type {
        Type::named(module, &self.name)
    }

    pub fn is_struct(&self) -> bool {
        !self.alias && matches!(self.underlying, Type::Struct(_))
    }
}

/// A method declared directly on a named type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    /// Receiver declared as `*T` rather than `T`
    #[serde(default)]
    pub pointer_receiver: bool,
    /// Receiver variable name
    #[serde(default)]
    pub receiver: String,
    /// Parameters and results; the receiver is filled in from the fields above
    pub signature: Signature,
}

/// One entry of a method set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    /// Signature including the receiver of the declaring type
    pub signature: Signature,
    /// Type that declares the method
    pub origin: String,
    /// Embedding depth; 0 for methods declared on the queried type itself
    pub depth: usize,
}

impl Method {
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }

    pub fn is_promoted(&self) -> bool {
        self.depth > 0
    }
}

/// Embedded field whose type's methods could not be enumerated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedEmbed {
    /// Type declaring the embedded field
    pub owner: String,
    pub field: String,
    pub ty: Type,
    pub reason: String,
}

/// Result of a method-set query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodSet {
    /// Unambiguous methods in name order
    pub methods: Vec<Method>,
    /// Embedded types skipped during the walk; the set may be incomplete
    pub unresolved: Vec<UnresolvedEmbed>,
}

/// Read access to a resolved module scope
pub trait ModuleScope {
    /// Module (package) name
    fn name(&self) -> &str;

    /// Every top-level name, in no particular order
    fn names(&self) -> Vec<&str>;

    fn lookup(&self, name: &str) -> Option<&Object>;

    /// Methods reachable from `ty`, including those promoted through
    /// embedded fields. A pointer type yields both value and pointer
    /// receiver methods.
    fn method_set(&self, ty: &Type) -> MethodSet;

    /// Whether `method`, found in the method set of `ty`, gives the type
    /// the given capability
    fn implements(&self, ty: &Type, method: &Method, capability: Capability) -> bool {
        let _ = ty;
        capability.matches(&method.name, &method.signature)
    }
}

/// Serializable module description implementing [`ModuleScope`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceModule {
    pub name: String,
    /// Import path of the module
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub objects: Vec<Object>,
}

impl SourceModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_object(mut self, object: Object) -> Self {
        self.objects.push(object);
        self
    }

    /// Load a module description from a JSON or YAML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let module: Self = crate::format::load(path.as_ref())?;
        module.validate()?;
        Ok(module)
    }

    /// Check that every declaration is named and that module-less named
    /// types are the predeclared `error`
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.is_empty() {
            return Err(CoreError::InvalidSource("module has no name".to_string()));
        }
        for obj in &self.objects {
            if obj.name().is_empty() {
                return Err(CoreError::InvalidSource(format!(
                    "{} declaration without a name in {}",
                    obj.kind(),
                    self.name
                )));
            }

            let mut bad = None;
            let mut check = |name: &str, module: Option<&str>| {
                let valid = match module {
                    Some(m) => !m.is_empty() && !name.is_empty(),
                    None => name == ERROR_TYPE_NAME,
                };
                if !valid && bad.is_none() {
                    bad = Some(match module {
                        Some(m) => format!("{}.{}", m, name),
                        None => name.to_string(),
                    });
                }
            };
            match obj {
                Object::TypeName(decl) => {
                    decl.underlying.for_each_named(&mut check);
                    for m in &decl.methods {
                        m.signature.for_each_named(&mut check);
                    }
                }
                other => {
                    if let Some(ty) = other.ty(&self.name) {
                        ty.for_each_named(&mut check);
                    }
                }
            }
            if let Some(bad) = bad {
                return Err(CoreError::InvalidSource(format!(
                    "{}.{} refers to unresolved type {}",
                    self.name,
                    obj.name(),
                    bad
                )));
            }
        }
        Ok(())
    }

    pub fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        match self.lookup(name)? {
            Object::TypeName(decl) => Some(decl),
            _ => None,
        }
    }
}

impl ModuleScope for SourceModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn names(&self) -> Vec<&str> {
        self.objects.iter().map(Object::name).collect()
    }

    fn lookup(&self, name: &str) -> Option<&Object> {
        // later declarations shadow earlier ones
        self.objects.iter().rev().find(|o| o.name() == name)
    }

    fn method_set(&self, ty: &Type) -> MethodSet {
        method_set::collect(self, ty)
    }
}
