//! Per-run hooks for diagnostics emitted during analysis

use crate::symtab::Symbol;
use bindscope_core::model::{Func, Package, Unsupported};
use bindscope_core::source::{Method, ObjectKind};
use bindscope_core::Capability;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Receives analysis events. Every method has a no-op default.
pub trait AnalysisObserver {
    /// Called for every registered symbol once the top-level walk is done
    fn symbol(&mut self, symbol: &Symbol) {
        let _ = symbol;
    }

    fn unsupported(&mut self, entry: &Unsupported) {
        let _ = entry;
    }

    fn constructor(&mut self, strukt: &str, ctor: &Func) {
        let _ = (strukt, ctor);
    }

    fn method(&mut self, strukt: &str, method: &Method) {
        let _ = (strukt, method);
    }

    fn capability(&mut self, strukt: &str, capability: Capability) {
        let _ = (strukt, capability);
    }

    fn finished(&mut self, package: &Package) {
        let _ = package;
    }
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn symbol(&mut self, symbol: &Symbol) {
        match &symbol.ty {
            Some(ty) => debug!("--> [{}]: {} {}", symbol.name, symbol.kind, ty),
            None => debug!("--> [{}]: {}", symbol.name, symbol.kind),
        }
    }

    fn unsupported(&mut self, entry: &Unsupported) {
        warn!("skipping {} {}: {}", entry.kind, entry.name, entry.reason);
    }

    fn constructor(&mut self, strukt: &str, ctor: &Func) {
        debug!("{} claimed as constructor of {}", ctor.name, strukt);
    }

    fn method(&mut self, strukt: &str, method: &Method) {
        if method.is_promoted() {
            trace!("{}.{} promoted from {}", strukt, method.name, method.origin);
        } else {
            trace!("{}.{}", strukt, method.name);
        }
    }

    fn capability(&mut self, strukt: &str, capability: Capability) {
        debug!("{} has capability {}", strukt, capability);
    }

    fn finished(&mut self, package: &Package) {
        debug!(
            "package {}: {} consts, {} vars, {} structs, {} funcs",
            package.name(),
            package.consts().len(),
            package.vars().len(),
            package.structs().len(),
            package.funcs().len()
        );
    }
}

/// Complete record of one analysis run
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTrace {
    pub symbols: Vec<SymbolTrace>,
    pub unsupported: Vec<Unsupported>,
    pub constructors: Vec<MemberTrace>,
    pub methods: Vec<MemberTrace>,
    pub capabilities: Vec<CapabilityTrace>,
    pub result: Option<ResultTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolTrace {
    pub name: String,
    pub kind: ObjectKind,
}

/// A constructor or method attached to a struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberTrace {
    pub strukt: String,
    pub name: String,
    /// Declaring type, when promoted through embedding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityTrace {
    pub strukt: String,
    pub capability: Capability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTrace {
    pub consts: usize,
    pub vars: usize,
    pub structs: usize,
    pub funcs: usize,
}

/// Keeps every event in an [`AnalysisTrace`]
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub trace: AnalysisTrace,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_trace(self) -> AnalysisTrace {
        self.trace
    }
}

impl AnalysisObserver for RecordingObserver {
    fn symbol(&mut self, symbol: &Symbol) {
        self.trace.symbols.push(SymbolTrace {
            name: symbol.name.clone(),
            kind: symbol.kind,
        });
    }

    fn unsupported(&mut self, entry: &Unsupported) {
        self.trace.unsupported.push(entry.clone());
    }

    fn constructor(&mut self, strukt: &str, ctor: &Func) {
        self.trace.constructors.push(MemberTrace {
            strukt: strukt.to_string(),
            name: ctor.name.clone(),
            promoted_from: None,
        });
    }

    fn method(&mut self, strukt: &str, method: &Method) {
        self.trace.methods.push(MemberTrace {
            strukt: strukt.to_string(),
            name: method.name.clone(),
            promoted_from: method.is_promoted().then(|| method.origin.clone()),
        });
    }

    fn capability(&mut self, strukt: &str, capability: Capability) {
        self.trace.capabilities.push(CapabilityTrace {
            strukt: strukt.to_string(),
            capability,
        });
    }

    fn finished(&mut self, package: &Package) {
        self.trace.result = Some(ResultTrace {
            consts: package.consts().len(),
            vars: package.vars().len(),
            structs: package.structs().len(),
            funcs: package.funcs().len(),
        });
    }
}

/// Forwards every event to two observers
pub struct Tee<'a, A: ?Sized, B: ?Sized>(pub &'a mut A, pub &'a mut B);

impl<A, B> AnalysisObserver for Tee<'_, A, B>
where
    A: AnalysisObserver + ?Sized,
    B: AnalysisObserver + ?Sized,
{
    fn symbol(&mut self, symbol: &Symbol) {
        self.0.symbol(symbol);
        self.1.symbol(symbol);
    }

    fn unsupported(&mut self, entry: &Unsupported) {
        self.0.unsupported(entry);
        self.1.unsupported(entry);
    }

    fn constructor(&mut self, strukt: &str, ctor: &Func) {
        self.0.constructor(strukt, ctor);
        self.1.constructor(strukt, ctor);
    }

    fn method(&mut self, strukt: &str, method: &Method) {
        self.0.method(strukt, method);
        self.1.method(strukt, method);
    }

    fn capability(&mut self, strukt: &str, capability: Capability) {
        self.0.capability(strukt, capability);
        self.1.capability(strukt, capability);
    }

    fn finished(&mut self, package: &Package) {
        self.0.finished(package);
        self.1.finished(package);
    }
}
