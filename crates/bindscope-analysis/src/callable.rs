//! Builds callable models, and the accessors of constants and variables

use crate::config::AnalysisConfig;
use crate::docs::{Declaration, DocResolver};
use crate::error::AnalysisError;
use bindscope_core::model::{self, Const, Func, Var, Variable};
use bindscope_core::types::{self, Type};

/// Return value and error flag of a declaration's result list
#[derive(Debug, Clone, PartialEq)]
pub struct ResultShape {
    pub ret: Option<Type>,
    pub has_error: bool,
}

/// Apply the result-arity policy: no results, a value or an error alone,
/// or a value followed by an error.
pub fn classify_results(decl: &str, results: &[types::Var]) -> Result<ResultShape, AnalysisError> {
    match results {
        [] => Ok(ResultShape {
            ret: None,
            has_error: false,
        }),
        [only] if only.ty.is_error() => Ok(ResultShape {
            ret: None,
            has_error: true,
        }),
        [only] => Ok(ResultShape {
            ret: Some(only.ty.clone()),
            has_error: false,
        }),
        [value, err] => {
            if !err.ty.is_error() {
                return Err(AnalysisError::InvalidDualReturn {
                    decl: decl.to_string(),
                });
            }
            Ok(ResultShape {
                ret: Some(value.ty.clone()),
                has_error: true,
            })
        }
        _ => Err(AnalysisError::TooManyResults {
            decl: decl.to_string(),
            count: results.len(),
        }),
    }
}

pub struct CallableBuilder<'a> {
    module: &'a str,
    config: &'a AnalysisConfig,
    docs: DocResolver<'a>,
}

impl<'a> CallableBuilder<'a> {
    pub fn new(module: &'a str, config: &'a AnalysisConfig, docs: DocResolver<'a>) -> Self {
        Self {
            module,
            config,
            docs,
        }
    }

    pub fn docs(&self) -> &DocResolver<'a> {
        &self.docs
    }

    /// `module[_parent]_name` with the configured separator
    pub fn id(&self, parent: Option<&str>, name: &str) -> String {
        let sep = &self.config.id_separator;
        match parent {
            Some(parent) => format!("{}{sep}{}{sep}{}", self.module, parent, name),
            None => format!("{}{sep}{}", self.module, name),
        }
    }

    /// Qualified name used in error messages
    fn qualified(&self, parent: Option<&str>, name: &str) -> String {
        match parent {
            Some(parent) => format!("{}.{}.{}", self.module, parent, name),
            None => format!("{}.{}", self.module, name),
        }
    }

    /// Function or method; `parent` is the enclosing aggregate type
    pub fn build(
        &self,
        parent: Option<&str>,
        name: &str,
        sig: &types::Signature,
    ) -> Result<Func, AnalysisError> {
        let shape = classify_results(&self.qualified(parent, name), &sig.results)?;
        let doc = self.docs.resolve(
            parent,
            Declaration::Func {
                name,
                signature: sig,
            },
        )?;

        Ok(Func {
            id: self.id(parent, name),
            name: name.to_string(),
            doc,
            signature: convert_signature(sig),
            ret: shape.ret,
            has_error: shape.has_error,
            is_ctor: false,
        })
    }

    pub fn constant(
        &self,
        name: &str,
        ty: &Type,
        value: Option<serde_json::Value>,
    ) -> Result<Const, AnalysisError> {
        let doc = self.docs.resolve(None, Declaration::Const(name))?;
        let id = self.id(None, name);
        Ok(Const {
            getter: self.getter(&id, name, ty, &doc),
            id,
            name: name.to_string(),
            doc,
            ty: ty.clone(),
            value,
        })
    }

    pub fn variable(&self, name: &str, ty: &Type) -> Result<Var, AnalysisError> {
        let doc = self.docs.resolve(None, Declaration::Var(name))?;
        let id = self.id(None, name);
        let setter = Func {
            id: format!("{}{}", self.config.setter_prefix, id),
            name: name.to_string(),
            doc: doc.clone(),
            signature: model::Signature {
                params: vec![Variable::new("v", ty.clone(), "")],
                ..Default::default()
            },
            ret: None,
            has_error: false,
            is_ctor: false,
        };
        Ok(Var {
            getter: self.getter(&id, name, ty, &doc),
            setter,
            id,
            variable: Variable::new(name, ty.clone(), doc),
        })
    }

    /// Zero-argument callable returning `ty`
    fn getter(&self, id: &str, name: &str, ty: &Type, doc: &str) -> Func {
        Func {
            id: format!("{}{}", self.config.getter_prefix, id),
            name: name.to_string(),
            doc: doc.to_string(),
            signature: model::Signature {
                results: vec![Variable::new("ret", ty.clone(), doc)],
                ..Default::default()
            },
            ret: Some(ty.clone()),
            has_error: false,
            is_ctor: false,
        }
    }
}

fn convert_signature(sig: &types::Signature) -> model::Signature {
    let slot = |v: &types::Var| Variable::new(v.name.clone(), v.ty.clone(), "");
    model::Signature {
        recv: sig.recv.as_ref().map(slot),
        params: sig.params.iter().map(slot).collect(),
        results: sig.results.iter().map(slot).collect(),
        variadic: sig.variadic,
    }
}
