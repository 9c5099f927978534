//! Semantic types of the analyzed source module
//!
//! These mirror what a type-checker hands back after resolution: every
//! reference to a named type carries the module that declares it, so two
//! `Type` values compare equal exactly when they denote the same type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the predeclared error-capability type.
pub const ERROR_TYPE_NAME: &str = "error";

/// Predeclared scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
}

impl BasicKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
        }
    }
}

/// Resolved type graph node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Basic(BasicKind),

    /// Reference to a declared type. `module` is `None` for predeclared
    /// types such as `error`.
    Named {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        module: Option<String>,
    },

    Pointer(Box<Type>),
    Slice(Box<Type>),
    Array {
        len: u64,
        elem: Box<Type>,
    },
    Map {
        key: Box<Type>,
        value: Box<Type>,
    },
    Func(Box<Signature>),

    /// Interface literal with its method signatures
    Interface {
        #[serde(default)]
        methods: Vec<InterfaceMethod>,
    },

    /// Anonymous or underlying struct shape
    Struct(StructType),
}

impl Type {
    pub fn basic(kind: BasicKind) -> Self {
        Type::Basic(kind)
    }

    pub fn named(module: impl Into<String>, name: impl Into<String>) -> Self {
        Type::Named {
            name: name.into(),
            module: Some(module.into()),
        }
    }

    /// The predeclared `error` type
    pub fn error() -> Self {
        Type::Named {
            name: ERROR_TYPE_NAME.to_string(),
            module: None,
        }
    }

    pub fn pointer_to(ty: Type) -> Self {
        Type::Pointer(Box::new(ty))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Named { name, module: None } if name == ERROR_TYPE_NAME)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::Basic(BasicKind::String))
    }

    /// Strip a single level of pointer indirection
    pub fn deref(&self) -> &Type {
        match self {
            Type::Pointer(inner) => inner,
            other => other,
        }
    }

    /// Name and declaring module when this is a (possibly pointer-to) named type
    pub fn named_parts(&self) -> Option<(&str, Option<&str>)> {
        match self.deref() {
            Type::Named { name, module } => Some((name.as_str(), module.as_deref())),
            _ => None,
        }
    }

    /// Call `f` with the name and module of every named type reachable
    /// from this one
    pub fn for_each_named<'a>(&'a self, f: &mut dyn FnMut(&'a str, Option<&'a str>)) {
        match self {
            Type::Basic(_) => {}
            Type::Named { name, module } => f(name, module.as_deref()),
            Type::Pointer(inner) | Type::Slice(inner) => inner.for_each_named(f),
            Type::Array { elem, .. } => elem.for_each_named(f),
            Type::Map { key, value } => {
                key.for_each_named(f);
                value.for_each_named(f);
            }
            Type::Func(sig) => sig.for_each_named(f),
            Type::Interface { methods } => {
                for m in methods {
                    m.signature.for_each_named(f);
                }
            }
            Type::Struct(s) => {
                for field in &s.fields {
                    field.ty.for_each_named(f);
                }
            }
        }
    }

    /// Render the type with names declared in `module` left unqualified
    pub fn display_in<'a>(&'a self, module: &'a str) -> TypeDisplay<'a> {
        TypeDisplay {
            ty: self,
            module: Some(module),
        }
    }
}

/// `Display` adapter that renders a type relative to a module
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    module: Option<&'a str>,
}

impl TypeDisplay<'_> {
    fn nested<'b>(&'b self, ty: &'b Type) -> TypeDisplay<'b> {
        TypeDisplay {
            ty,
            module: self.module,
        }
    }

    fn write_tuple(&self, f: &mut fmt::Formatter<'_>, vars: &[Var]) -> fmt::Result {
        for (i, var) in vars.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.nested(&var.ty))?;
        }
        Ok(())
    }

    /// `(params) results` as in a func type
    fn write_signature(&self, f: &mut fmt::Formatter<'_>, sig: &Signature) -> fmt::Result {
        write!(f, "(")?;
        self.write_tuple(f, &sig.params)?;
        write!(f, ")")?;
        match sig.results.len() {
            0 => Ok(()),
            1 => write!(f, " {}", self.nested(&sig.results[0].ty)),
            _ => {
                write!(f, " (")?;
                self.write_tuple(f, &sig.results)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Basic(kind) => write!(f, "{}", kind.as_str()),
            Type::Named { name, module } => match module {
                Some(m) if Some(m.as_str()) != self.module => write!(f, "{}.{}", m, name),
                _ => write!(f, "{}", name),
            },
            Type::Pointer(inner) => write!(f, "*{}", self.nested(inner)),
            Type::Slice(elem) => write!(f, "[]{}", self.nested(elem)),
            Type::Array { len, elem } => write!(f, "[{}]{}", len, self.nested(elem)),
            Type::Map { key, value } => {
                write!(f, "map[{}]{}", self.nested(key), self.nested(value))
            }
            Type::Func(sig) => {
                write!(f, "func")?;
                self.write_signature(f, sig)
            }
            Type::Interface { methods } => {
                write!(f, "interface{{")?;
                for (i, m) in methods.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", m.name)?;
                    self.write_signature(f, &m.signature)?;
                }
                write!(f, "}}")
            }
            Type::Struct(s) => {
                write!(f, "struct{{")?;
                for (i, field) in s.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    if field.embedded {
                        write!(f, "{}", self.nested(&field.ty))?;
                    } else {
                        write!(f, "{} {}", field.name, self.nested(&field.ty))?;
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TypeDisplay {
            ty: self,
            module: None,
        }
        .fmt(f)
    }
}

/// Ordered set of named fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructType {
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
    /// Field declared by type only, promoting the embedded type's members
    #[serde(default)]
    pub embedded: bool,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            embedded: false,
        }
    }

    /// Embedded field; its name is the embedded type's name
    pub fn embedded(ty: Type) -> Self {
        let name = ty
            .named_parts()
            .map(|(name, _)| name.to_string())
            .unwrap_or_default();
        Self {
            name,
            ty,
            embedded: true,
        }
    }

    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

/// Parameter, result or receiver slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Var {
    #[serde(default)]
    pub name: String,
    pub ty: Type,
}

impl Var {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn unnamed(ty: Type) -> Self {
        Self {
            name: String::new(),
            ty,
        }
    }
}

/// Function or method type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recv: Option<Var>,
    #[serde(default)]
    pub params: Vec<Var>,
    #[serde(default)]
    pub results: Vec<Var>,
    #[serde(default)]
    pub variadic: bool,
}

impl Signature {
    pub fn new(params: Vec<Var>, results: Vec<Var>) -> Self {
        Self {
            recv: None,
            params,
            results,
            variadic: false,
        }
    }

    pub fn with_recv(mut self, recv: Var) -> Self {
        self.recv = Some(recv);
        self
    }

    pub fn for_each_named<'a>(&'a self, f: &mut dyn FnMut(&'a str, Option<&'a str>)) {
        for var in self.recv.iter().chain(&self.params).chain(&self.results) {
            var.ty.for_each_named(f);
        }
    }
}

/// Method declared by an interface type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceMethod {
    pub name: String,
    #[serde(default)]
    pub signature: Signature,
}

impl InterfaceMethod {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }
}

/// Exported identifiers start with an upper-case letter
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
