//! Method-set computation for named types of a [`SourceModule`]
//!
//! Methods are collected breadth-first through embedded fields. A name found
//! at a shallower depth hides every deeper occurrence; two occurrences at the
//! same depth (or a method colliding with a field) make the name ambiguous
//! and it is left out of the set. Embedded interfaces contribute their
//! declared methods; embedded types without a local declaration are
//! reported as unresolved.

use crate::source::{Method, MethodDecl, MethodSet, SourceModule, TypeDecl, UnresolvedEmbed};
use crate::types::{InterfaceMethod, Type, Var};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A type to visit at the current depth
struct Embedded {
    name: String,
    /// Reached through a pointer, so pointer-receiver methods are included
    addressable: bool,
    /// Embedding type and field, `None` for the queried type
    via: Option<(String, String)>,
}

pub(crate) fn collect(module: &SourceModule, ty: &Type) -> MethodSet {
    let Some((root, owner)) = ty.named_parts() else {
        return MethodSet::default();
    };
    if owner != Some(module.name.as_str()) {
        tracing::trace!("method set of foreign type {} not available in {}", ty, module.name);
        return MethodSet::default();
    }

    let mut resolved: BTreeMap<String, Option<Method>> = BTreeMap::new();
    let mut unresolved = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut level = vec![Embedded {
        name: root.to_string(),
        addressable: matches!(ty, Type::Pointer(_)),
        via: None,
    }];
    let mut depth = 0;

    while !level.is_empty() {
        let mut methods: BTreeMap<String, Vec<Method>> = BTreeMap::new();
        let mut fields: BTreeSet<String> = BTreeSet::new();
        let mut next = Vec::new();

        for entry in level.iter().filter(|e| !visited.contains(&e.name)) {
            let Some(decl) = module.type_decl(&entry.name) else {
                if let Some((owner, field)) = &entry.via {
                    unresolved.push(UnresolvedEmbed {
                        owner: owner.clone(),
                        field: field.clone(),
                        ty: Type::named(module.name.as_str(), entry.name.as_str()),
                        reason: format!("embedded type {} has no declaration", entry.name),
                    });
                }
                continue;
            };

            for method in &decl.methods {
                if method.pointer_receiver && !entry.addressable {
                    continue;
                }
                methods
                    .entry(method.name.clone())
                    .or_default()
                    .push(promote(module, decl, method, depth));
            }

            match &decl.underlying {
                // interface methods belong to every method set of the type
                Type::Interface { methods: declared } => {
                    for method in declared {
                        methods
                            .entry(method.name.clone())
                            .or_default()
                            .push(promote_interface(module, decl, method, depth));
                    }
                }
                Type::Struct(st) => {
                    for field in st.fields.iter() {
                        fields.insert(field.name.clone());
                        if !field.embedded {
                            continue;
                        }
                        match field.ty.named_parts() {
                            Some((name, Some(owner))) if owner == module.name => next.push(Embedded {
                                name: name.to_string(),
                                addressable: entry.addressable || matches!(field.ty, Type::Pointer(_)),
                                via: Some((decl.name.clone(), field.name.clone())),
                            }),
                            _ => {
                                tracing::trace!(
                                    "embedded field {} of {}: type not declared in {}",
                                    field.ty,
                                    decl.name,
                                    module.name
                                );
                                unresolved.push(UnresolvedEmbed {
                                    owner: decl.name.clone(),
                                    field: field.name.clone(),
                                    ty: field.ty.clone(),
                                    reason: format!(
                                        "method set of {} is not available in {}",
                                        field.ty.display_in(&module.name),
                                        module.name
                                    ),
                                });
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        visited.extend(level.into_iter().map(|e| e.name));

        for (name, mut found) in methods {
            if resolved.contains_key(&name) {
                continue;
            }
            let unique = found.len() == 1 && !fields.contains(&name);
            resolved.insert(name, if unique { found.pop() } else { None });
        }
        for name in fields {
            resolved.entry(name).or_insert(None);
        }

        level = next;
        depth += 1;
    }

    MethodSet {
        methods: resolved.into_values().flatten().collect(),
        unresolved,
    }
}

fn promote(module: &SourceModule, decl: &TypeDecl, method: &MethodDecl, depth: usize) -> Method {
    let owner = decl.ty(&module.name);
    let recv_ty = if method.pointer_receiver {
        Type::pointer_to(owner)
    } else {
        owner
    };
    Method {
        name: method.name.clone(),
        signature: method
            .signature
            .clone()
            .with_recv(Var::new(method.receiver.clone(), recv_ty)),
        origin: decl.name.clone(),
        depth,
    }
}

fn promote_interface(
    module: &SourceModule,
    decl: &TypeDecl,
    method: &InterfaceMethod,
    depth: usize,
) -> Method {
    Method {
        name: method.name.clone(),
        signature: method
            .signature
            .clone()
            .with_recv(Var::unnamed(decl.ty(&module.name))),
        origin: decl.name.clone(),
        depth,
    }
}
