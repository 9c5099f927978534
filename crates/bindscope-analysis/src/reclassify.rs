//! Second pass: constructors and method sets of aggregate types

use crate::callable::CallableBuilder;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::observer::AnalysisObserver;
use bindscope_core::model::{Func, Struct, Unsupported};
use bindscope_core::source::ModuleScope;
use bindscope_core::{Capability, Type};
use std::collections::BTreeMap;
use tracing::instrument;

/// Move constructors out of `funcs` onto their structs and attach each
/// struct's exported method set. Returns the finished structs and the
/// functions left over, both in name order. Structs whose method set could
/// not be fully enumerated are added to `unsupported`.
#[instrument(skip_all, fields(structs = structs.len(), funcs = funcs.len()), level = "debug")]
pub(crate) fn reclassify<S: ModuleScope + ?Sized>(
    scope: &S,
    builder: &CallableBuilder<'_>,
    config: &AnalysisConfig,
    observer: &mut dyn AnalysisObserver,
    mut funcs: BTreeMap<String, Func>,
    structs: BTreeMap<String, Struct>,
    unsupported: &mut Vec<Unsupported>,
) -> Result<(Vec<Struct>, Vec<Func>), AnalysisError> {
    let mut finished = Vec::with_capacity(structs.len());

    for (sname, mut strukt) in structs {
        let claimed: Vec<String> = funcs
            .iter()
            .filter(|(_, f)| constructs(config, &strukt.ty, f))
            .map(|(name, _)| name.clone())
            .collect();

        for name in claimed {
            let Some(mut ctor) = funcs.remove(&name) else {
                continue;
            };
            let obj = scope.lookup(&name).ok_or_else(|| {
                AnalysisError::Internal(format!("constructor {} missing from scope", name))
            })?;
            ctor.doc = builder.docs().resolve(Some(&sname), obj.into())?;
            ctor.id = builder.id(Some(&sname), &name);
            ctor.is_ctor = true;
            observer.constructor(&sname, &ctor);
            strukt.ctors.push(ctor);
        }

        let ptr = Type::pointer_to(strukt.ty.clone());
        let set = scope.method_set(&ptr);
        for embed in set.unresolved {
            unsupported.push(Unsupported {
                name: sname.clone(),
                kind: "embedded".to_string(),
                reason: format!(
                    "methods promoted through {}.{} are missing: {}",
                    embed.owner, embed.field, embed.reason
                ),
            });
        }
        for method in set.methods {
            if !method.is_exported() {
                continue;
            }
            let func = builder.build(Some(&sname), &method.name, &method.signature)?;
            for capability in Capability::ALL {
                if scope.implements(&strukt.ty, &method, capability)
                    && strukt.capabilities.insert(capability)
                {
                    observer.capability(&sname, capability);
                }
            }
            observer.method(&sname, &method);
            strukt.methods.push(func);
        }

        finished.push(strukt);
    }

    Ok((finished, funcs.into_values().collect()))
}

/// Whether `func` returns exactly the struct type (or a pointer to it when
/// pointer constructors are enabled)
fn constructs(config: &AnalysisConfig, ty: &Type, func: &Func) -> bool {
    match &func.ret {
        Some(ret) if ret == ty => true,
        Some(Type::Pointer(inner)) => config.pointer_constructors && **inner == *ty,
        _ => false,
    }
}
