//! Top-level walk over a module scope producing a [`Package`]

use crate::callable::CallableBuilder;
use crate::config::AnalysisConfig;
use crate::docs::{Declaration, DocResolver};
use crate::error::AnalysisError;
use crate::observer::{AnalysisObserver, TracingObserver};
use crate::reclassify::reclassify;
use crate::symtab::SymbolTable;
use bindscope_core::docs::DocPackage;
use bindscope_core::model::{Package, PackageParts, Struct, Unsupported, Variable};
use bindscope_core::source::{ModuleScope, Object, TypeDecl};
use bindscope_core::{Capabilities, Type};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument, trace};

/// Runs the analysis pass with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze `scope`, reporting diagnostics through `tracing`
    pub fn analyze<S: ModuleScope + ?Sized>(
        &self,
        scope: &S,
        docs: &DocPackage,
    ) -> Result<Package, AnalysisError> {
        self.analyze_with(scope, docs, &mut TracingObserver)
    }

    #[instrument(skip_all, fields(module = %scope.name()), level = "debug")]
    pub fn analyze_with<S: ModuleScope + ?Sized>(
        &self,
        scope: &S,
        docs: &DocPackage,
        observer: &mut dyn AnalysisObserver,
    ) -> Result<Package, AnalysisError> {
        self.config.validate()?;

        let module = scope.name();
        let builder = CallableBuilder::new(module, &self.config, DocResolver::new(docs, module));

        let mut syms = SymbolTable::new();
        let mut consts = Vec::new();
        let mut vars = Vec::new();
        let mut funcs = BTreeMap::new();
        let mut structs = BTreeMap::new();
        let mut unsupported = Vec::new();

        // the scope enumerates names in no particular order
        let mut names = scope.names();
        names.sort_unstable();
        names.dedup();

        for name in names {
            let Some(obj) = scope.lookup(name) else {
                trace!("{} listed but not found in scope", name);
                continue;
            };
            if !obj.is_exported() {
                continue;
            }

            syms.add_symbol(module, obj);

            match obj {
                Object::Const { name, ty, value } => {
                    consts.push(builder.constant(name, ty, value.clone())?);
                }
                Object::Var { name, ty } => {
                    vars.push(builder.variable(name, ty)?);
                }
                Object::Func { name, signature } => {
                    funcs.insert(name.clone(), builder.build(None, name, signature)?);
                }
                Object::TypeName(decl) if decl.is_struct() => {
                    structs.insert(decl.name.clone(), new_struct(&builder, module, decl)?);
                }
                Object::TypeName(decl) => unsupported.push(Unsupported {
                    name: decl.name.clone(),
                    kind: obj.kind().to_string(),
                    reason: unsupported_type_reason(module, decl),
                }),
                other => unsupported.push(Unsupported {
                    name: other.name().to_string(),
                    kind: other.kind().to_string(),
                    reason: "declaration kind has no binding mapping".to_string(),
                }),
            }
        }

        for sym in syms.iter() {
            observer.symbol(sym);
        }

        debug!(
            "classified {} symbols: {} structs, {} funcs before reclassification",
            syms.len(),
            structs.len(),
            funcs.len()
        );
        let (structs, funcs) = reclassify(
            scope,
            &builder,
            &self.config,
            observer,
            funcs,
            structs,
            &mut unsupported,
        )?;

        for entry in &unsupported {
            observer.unsupported(entry);
        }
        if self.config.strict && !unsupported.is_empty() {
            return Err(AnalysisError::Unsupported(unsupported));
        }

        let package = Package::new(PackageParts {
            name: module.to_string(),
            doc: docs.doc.clone(),
            consts,
            vars,
            structs,
            funcs,
            unsupported,
        });
        check_unique_ids(&package)?;
        observer.finished(&package);
        Ok(package)
    }
}

/// Analyze with the default configuration
pub fn analyze<S: ModuleScope + ?Sized>(scope: &S, docs: &DocPackage) -> Result<Package, AnalysisError> {
    Analyzer::default().analyze(scope, docs)
}

fn new_struct(
    builder: &CallableBuilder<'_>,
    module: &str,
    decl: &TypeDecl,
) -> Result<Struct, AnalysisError> {
    let Type::Struct(shape) = &decl.underlying else {
        return Err(AnalysisError::Internal(format!(
            "{}.{} is not a struct",
            module, decl.name
        )));
    };
    let fields = shape
        .fields
        .iter()
        .filter(|f| f.is_exported())
        .map(|f| Variable::new(f.name.clone(), f.ty.clone(), ""))
        .collect();

    Ok(Struct {
        id: builder.id(None, &decl.name),
        name: decl.name.clone(),
        doc: builder.docs().resolve(None, Declaration::TypeName(&decl.name))?,
        ty: decl.ty(module),
        fields,
        ctors: Vec::new(),
        methods: Vec::new(),
        capabilities: Capabilities::new(),
    })
}

/// Names that differ only around the separator can map to the same id
fn check_unique_ids(package: &Package) -> Result<(), AnalysisError> {
    let mut seen: HashMap<&str, String> = HashMap::new();
    for (id, owner) in package.id_owners() {
        if let Some(first) = seen.insert(id, owner.clone()) {
            return Err(AnalysisError::DuplicateId {
                id: id.to_string(),
                first,
                second: owner,
            });
        }
    }
    Ok(())
}

fn unsupported_type_reason(module: &str, decl: &TypeDecl) -> String {
    if decl.alias {
        return format!("type alias of {}", decl.underlying.display_in(module));
    }
    match &decl.underlying {
        Type::Interface { .. } => "interface types are not modeled".to_string(),
        other => format!("underlying type {} is not a struct", other.display_in(module)),
    }
}
