//! Matches declarations to their doc comments
//!
//! The resolver is a pure lookup over a [`DocPackage`]. For callables it also
//! synthesizes a one-line signature that is always part of the result.

use crate::error::AnalysisError;
use bindscope_core::docs::{DocPackage, FuncDoc, ValueDoc};
use bindscope_core::source::{Method, Object, ObjectKind};
use bindscope_core::types::{Signature, Type, Var};

/// What the resolver needs to know about a declaration
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    Const(&'a str),
    Var(&'a str),
    TypeName(&'a str),
    Func {
        name: &'a str,
        signature: &'a Signature,
    },
    Other {
        name: &'a str,
        kind: ObjectKind,
    },
}

impl<'a> From<&'a Object> for Declaration<'a> {
    fn from(obj: &'a Object) -> Self {
        match obj {
            Object::Const { name, .. } => Declaration::Const(name),
            Object::Var { name, .. } => Declaration::Var(name),
            Object::TypeName(decl) => Declaration::TypeName(&decl.name),
            Object::Func { name, signature } => Declaration::Func { name, signature },
            other => Declaration::Other {
                name: other.name(),
                kind: other.kind(),
            },
        }
    }
}

impl<'a> From<&'a Method> for Declaration<'a> {
    fn from(method: &'a Method) -> Self {
        Declaration::Func {
            name: &method.name,
            signature: &method.signature,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DocResolver<'a> {
    docs: &'a DocPackage,
    module: &'a str,
}

impl<'a> DocResolver<'a> {
    pub fn new(docs: &'a DocPackage, module: &'a str) -> Self {
        Self { docs, module }
    }

    /// Doc text for `decl`; `parent` names the enclosing type of methods
    /// and constructors
    pub fn resolve(&self, parent: Option<&str>, decl: Declaration<'_>) -> Result<String, AnalysisError> {
        match decl {
            Declaration::Const(name) => Ok(self.value_doc(name, &self.docs.consts, |t| &t.consts)),
            Declaration::Var(name) => Ok(self.value_doc(name, &self.docs.vars, |t| &t.vars)),
            Declaration::TypeName(name) => Ok(self
                .docs
                .find_type(name)
                .map(|t| t.doc.clone())
                .unwrap_or_default()),
            Declaration::Func { name, signature } => {
                let doc = self.func_doc(parent, name, signature);
                let sig = self.signature_line(name, signature);
                Ok(if doc.is_empty() {
                    sig
                } else {
                    format!("{}\n\n{}", sig, doc)
                })
            }
            Declaration::Other { name, kind } => Err(AnalysisError::Internal(format!(
                "no documentation lookup for {} {}.{}",
                kind, self.module, name
            ))),
        }
    }

    /// Flat package groups first, then the groups filed under a type
    fn value_doc(
        &self,
        name: &str,
        groups: &[ValueDoc],
        typed: impl Fn(&bindscope_core::docs::TypeDoc) -> &Vec<ValueDoc>,
    ) -> String {
        groups
            .iter()
            .chain(self.docs.types.iter().flat_map(typed))
            .find(|g| g.covers(name))
            .map(|g| g.doc.clone())
            .unwrap_or_default()
    }

    fn func_doc(&self, parent: Option<&str>, name: &str, signature: &Signature) -> String {
        let found = match (&signature.recv, parent) {
            (None, None) => find_func(&self.docs.funcs, name),
            (None, Some(parent)) => self
                .docs
                .find_type(parent)
                .and_then(|t| find_func(&t.funcs, name))
                // constructors the extractor did not attach to their type
                .or_else(|| find_func(&self.docs.funcs, name)),
            (Some(recv), parent) => {
                let declaring = receiver_type_name(recv);
                parent
                    .into_iter()
                    .chain(declaring)
                    .filter_map(|t| self.docs.find_type(t))
                    .find_map(|t| find_func(&t.methods, name))
            }
        };
        found.map(|f| f.doc.clone()).unwrap_or_default()
    }

    /// `name(type name, ...) result, ...` with types rendered relative to
    /// the analyzed module
    pub fn signature_line(&self, name: &str, signature: &Signature) -> String {
        let last = signature.params.len().saturating_sub(1);
        let params: Vec<String> = signature
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| self.slot(p, signature.variadic && i == last))
            .collect();
        let results: Vec<String> = signature.results.iter().map(|r| self.slot(r, false)).collect();

        let line = format!("{}({}) {}", name, params.join(", "), results.join(", "));
        line.trim_end().to_string()
    }

    fn slot(&self, var: &Var, variadic: bool) -> String {
        let ty = match (&var.ty, variadic) {
            (Type::Slice(elem), true) => format!("...{}", elem.display_in(self.module)),
            (ty, _) => ty.display_in(self.module).to_string(),
        };
        if var.name.is_empty() {
            ty
        } else {
            format!("{} {}", ty, var.name)
        }
    }
}

fn find_func<'d>(funcs: &'d [FuncDoc], name: &str) -> Option<&'d FuncDoc> {
    funcs.iter().find(|f| f.name == name)
}

fn receiver_type_name(recv: &Var) -> Option<&str> {
    recv.ty.named_parts().map(|(name, _)| name)
}
