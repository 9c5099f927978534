//! Whole-module analysis over the shared fixtures

use bindscope_analysis::observer::MemberTrace;
use bindscope_analysis::{analyze, AnalysisConfig, AnalysisError, Analyzer, RecordingObserver};
use bindscope_core::docs::DocPackage;
use bindscope_core::model::Item;
use bindscope_core::source::{MethodDecl, Object, SourceModule, TypeDecl};
use bindscope_core::types::{BasicKind, FieldDecl, InterfaceMethod, Signature, StructType, Var};
use bindscope_core::{Capability, Type};
use bindscope_test_fixtures::{
    calc_module, geo_docs, geo_module, shapes_docs, shapes_module, too_many_results_module,
    FixtureType, TestFixtures,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn names<'a, T>(items: &'a [T], name: impl Fn(&'a T) -> &'a str) -> Vec<&'a str> {
    items.iter().map(name).collect()
}

#[test]
fn test_geo_point_with_constructor_and_stringer() {
    let pkg = analyze(&geo_module(), &geo_docs()).unwrap();

    assert_eq!(pkg.name(), "geo");
    assert!(pkg.funcs().is_empty());
    assert_eq!(pkg.structs().len(), 1);

    let point = &pkg.structs()[0];
    assert_eq!(point.id, "geo_Point");
    assert_eq!(point.ty, Type::named("geo", "Point"));
    assert_eq!(names(&point.fields, |f| f.name.as_str()), vec!["X", "Y"]);

    assert_eq!(point.ctors.len(), 1);
    let ctor = &point.ctors[0];
    assert_eq!(ctor.id, "geo_Point_NewPoint");
    assert!(ctor.is_ctor);
    assert_eq!(ctor.ret, Some(Type::named("geo", "Point")));
    assert!(!ctor.has_error);

    let string = point.method("String").unwrap();
    assert_eq!(string.id, "geo_Point_String");
    assert_eq!(string.doc, "String() string\n\nString formats the point.");
    assert!(point.has_capability(Capability::Stringer));
    assert!(!point.has_capability(Capability::Error));

    // the constructor is still found by its declared name
    assert!(matches!(pkg.lookup("NewPoint"), Some(Item::Func(f)) if f.is_ctor));
}

#[test]
fn test_shapes_values_and_accessors() {
    let pkg = analyze(&shapes_module(), &shapes_docs()).unwrap();

    assert_eq!(names(pkg.consts(), |c| c.name.as_str()), vec!["Sides", "Unit"]);
    let sides = &pkg.consts()[0];
    assert_eq!(sides.doc, "Sides of a square.");
    assert_eq!(sides.value, Some(serde_json::json!(4)));
    assert_eq!(sides.getter.id, "get_shapes_Sides");
    // constant documented in the group filed under its type
    assert_eq!(pkg.consts()[1].doc, "Unit is the unit square.");

    assert_eq!(names(pkg.vars(), |v| v.name()), vec!["DefaultSide"]);
    let side = &pkg.vars()[0];
    assert_eq!(side.variable.doc, "DefaultSide is used by UnitSquare.");
    assert_eq!(side.getter.ret, Some(Type::basic(BasicKind::Float64)));
    assert_eq!(side.setter.id, "set_shapes_DefaultSide");
    assert!(pkg.lookup("registry").is_none());
}

#[test]
fn test_shapes_embedding_and_constructors() {
    let pkg = analyze(&shapes_module(), &shapes_docs()).unwrap();

    assert_eq!(names(pkg.structs(), |s| s.name.as_str()), vec!["Base", "Square"]);
    let base = pkg.find_struct("Base").unwrap();
    assert_eq!(names(&base.fields, |f| f.name.as_str()), vec!["ID"]);
    assert!(base.ctors.is_empty());
    assert_eq!(names(&base.methods, |m| m.name.as_str()), vec!["Describe", "SetID"]);
    assert!(base.capabilities.is_empty());

    let square = pkg.find_struct("Square").unwrap();
    assert_eq!(names(&square.fields, |f| f.name.as_str()), vec!["Base", "Side"]);
    assert_eq!(names(&square.ctors, |c| c.name.as_str()), vec!["FromBase", "NewSquare"]);
    assert!(square.ctor("FromBase").unwrap().has_error);
    assert_eq!(
        square.ctor("NewSquare").unwrap().doc,
        "NewSquare(float64 side) Square\n\nNewSquare makes a square."
    );

    assert_eq!(
        names(&square.methods, |m| m.name.as_str()),
        vec!["Area", "Describe", "Scale", "SetID", "String"]
    );
    let describe = square.method("Describe").unwrap();
    assert_eq!(describe.id, "shapes_Square_Describe");
    assert_eq!(describe.doc, "Describe() string\n\nDescribe names the shape.");
    let scale = square.method("Scale").unwrap();
    assert_eq!(scale.ret, None);
    assert!(scale.has_error);
    assert!(square.has_capability(Capability::Stringer));

    // pointer-returning functions stay free by default
    assert_eq!(names(pkg.funcs(), |f| f.name.as_str()), vec!["Perimeter", "UnitSquare"]);
    assert_eq!(
        pkg.find_func("UnitSquare").unwrap().ret,
        Some(Type::pointer_to(Type::named("shapes", "Square")))
    );

    assert_eq!(pkg.unsupported().len(), 1);
    assert_eq!(pkg.unsupported()[0].name, "Shape");
    assert_eq!(pkg.unsupported()[0].reason, "interface types are not modeled");
}

#[test]
fn test_pointer_constructors_from_config() {
    let analyzer = Analyzer::new(AnalysisConfig::from_toml_str("pointer_constructors = true").unwrap());
    let pkg = analyzer.analyze(&shapes_module(), &shapes_docs()).unwrap();

    let square = pkg.find_struct("Square").unwrap();
    assert_eq!(
        names(&square.ctors, |c| c.name.as_str()),
        vec!["FromBase", "NewSquare", "UnitSquare"]
    );
    assert_eq!(
        square.ctor("UnitSquare").unwrap().doc,
        "UnitSquare() *Square\n\nUnitSquare returns a shared square."
    );
    assert_eq!(names(pkg.funcs(), |f| f.name.as_str()), vec!["Perimeter"]);
}

#[test]
fn test_calc_result_shapes() {
    let pkg = analyze(&calc_module(), &bindscope_core::DocPackage::new("calc")).unwrap();

    assert_eq!(names(pkg.funcs(), |f| f.name.as_str()), vec!["Divide", "Reset", "Validate"]);
    let divide = pkg.find_func("Divide").unwrap();
    assert_eq!(divide.ret, Some(Type::basic(BasicKind::Int)));
    assert!(divide.has_error);
    assert_eq!(divide.doc, "Divide(int a, int b) int, error");

    let reset = pkg.find_func("Reset").unwrap();
    assert_eq!(reset.ret, None);
    assert!(!reset.has_error);
    assert_eq!(reset.doc, "Reset()");

    let validate = pkg.find_func("Validate").unwrap();
    assert_eq!(validate.ret, None);
    assert!(validate.has_error);
}

#[test]
fn test_too_many_results_aborts() {
    let err = analyze(&too_many_results_module(), &Default::default()).unwrap_err();
    match err {
        AnalysisError::TooManyResults { ref decl, count } => {
            assert_eq!(decl, "calc.Sum");
            assert_eq!(count, 3);
        }
        ref other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_recoverable());
}

#[test]
fn test_ids_unique_across_package() {
    let config = AnalysisConfig {
        pointer_constructors: true,
        ..Default::default()
    };
    let pkg = Analyzer::new(config)
        .analyze(&shapes_module(), &shapes_docs())
        .unwrap();

    let ids = pkg.ids();
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    for id in ids {
        assert!(pkg.by_id(id).is_some(), "{id} not found by id");
    }
}

#[test]
fn test_observer_records_run() {
    let mut observer = RecordingObserver::new();
    Analyzer::default()
        .analyze_with(&shapes_module(), &shapes_docs(), &mut observer)
        .unwrap();
    let trace = observer.into_trace();

    assert_eq!(trace.symbols.len(), 10);
    assert_eq!(trace.unsupported.len(), 1);
    assert_eq!(trace.constructors.len(), 2);
    assert!(trace.methods.contains(&MemberTrace {
        strukt: "Square".to_string(),
        name: "Describe".to_string(),
        promoted_from: Some("Base".to_string()),
    }));
    assert_eq!(trace.capabilities.len(), 1);
    let result = trace.result.unwrap();
    assert_eq!((result.consts, result.vars, result.structs, result.funcs), (2, 1, 2, 2));
}

#[test]
fn test_analysis_is_deterministic() {
    let first = analyze(&shapes_module(), &shapes_docs()).unwrap();

    // declaration order in the source must not matter
    let mut reversed = shapes_module();
    reversed.objects.reverse();
    let second = analyze(&reversed, &shapes_docs()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_loaded_from_disk() {
    let mut fixtures = TestFixtures::new();
    let paths = fixtures.setup(FixtureType::Geo);

    let module = bindscope_core::SourceModule::from_path(&paths.module).unwrap();
    let docs: bindscope_core::DocPackage = bindscope_core::format::load(&paths.docs).unwrap();
    assert_eq!(
        analyze(&module, &docs).unwrap(),
        analyze(&geo_module(), &geo_docs()).unwrap()
    );
}

fn struct_decl(name: &str, fields: Vec<FieldDecl>, methods: Vec<MethodDecl>) -> Object {
    Object::TypeName(TypeDecl {
        name: name.to_string(),
        underlying: Type::Struct(StructType { fields }),
        alias: false,
        methods,
    })
}

fn string_method(name: &str) -> MethodDecl {
    MethodDecl {
        name: name.to_string(),
        pointer_receiver: false,
        receiver: "r".to_string(),
        signature: Signature::new(vec![], vec![Var::unnamed(Type::basic(BasicKind::String))]),
    }
}

#[test]
fn test_underscore_name_colliding_with_method_id() {
    let module = SourceModule::new("geo")
        .with_object(struct_decl("Point", vec![], vec![string_method("String")]))
        .with_object(Object::Func {
            name: "Point_String".to_string(),
            signature: Signature::default(),
        });

    let err = analyze(&module, &DocPackage::new("geo")).unwrap_err();
    match &err {
        AnalysisError::DuplicateId { id, first, second } => {
            assert_eq!(id, "geo_Point_String");
            assert_eq!(first, "method Point.String");
            assert_eq!(second, "func Point_String");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_recoverable());

    // a different separator keeps both
    let analyzer = Analyzer::new(AnalysisConfig {
        id_separator: "__".to_string(),
        ..Default::default()
    });
    let pkg = analyzer.analyze(&module, &DocPackage::new("geo")).unwrap();
    assert_eq!(pkg.find_func("Point_String").unwrap().id, "geo__Point_String");
    assert_eq!(pkg.structs()[0].methods[0].id, "geo__Point__String");
}

#[test]
fn test_embedded_interface_methods_are_promoted() {
    let module = SourceModule::new("box")
        .with_object(Object::TypeName(TypeDecl {
            name: "Namer".to_string(),
            underlying: Type::Interface {
                methods: vec![InterfaceMethod::new(
                    "Name",
                    Signature::new(vec![], vec![Var::unnamed(Type::basic(BasicKind::String))]),
                )],
            },
            alias: false,
            methods: vec![],
        }))
        .with_object(struct_decl(
            "Box",
            vec![FieldDecl::embedded(Type::named("box", "Namer"))],
            vec![],
        ));

    let pkg = analyze(&module, &DocPackage::new("box")).unwrap();
    let boxed = pkg.find_struct("Box").unwrap();
    assert_eq!(names(&boxed.methods, |m| m.name.as_str()), vec!["Name"]);
    assert_eq!(boxed.methods[0].id, "box_Box_Name");
    assert_eq!(boxed.methods[0].ret, Some(Type::basic(BasicKind::String)));
    assert_eq!(names(pkg.unsupported(), |u| u.name.as_str()), vec!["Namer"]);
}

#[test]
fn test_foreign_embedding_reported_as_unsupported() {
    let module = SourceModule::new("store").with_object(struct_decl(
        "File",
        vec![FieldDecl::embedded(Type::pointer_to(Type::named("sync", "Mutex")))],
        vec![string_method("Path")],
    ));

    let mut observer = RecordingObserver::new();
    let pkg = Analyzer::default()
        .analyze_with(&module, &DocPackage::new("store"), &mut observer)
        .unwrap();
    assert_eq!(names(&pkg.structs()[0].methods, |m| m.name.as_str()), vec!["Path"]);
    assert_eq!(pkg.unsupported().len(), 1);
    let entry = &pkg.unsupported()[0];
    assert_eq!(entry.name, "File");
    assert_eq!(entry.kind, "embedded");
    assert_eq!(
        entry.reason,
        "methods promoted through File.Mutex are missing: method set of *sync.Mutex is not available in store"
    );
    assert_eq!(observer.trace.unsupported, pkg.unsupported().to_vec());

    let strict = Analyzer::new(AnalysisConfig {
        strict: true,
        ..Default::default()
    });
    match strict.analyze(&module, &DocPackage::new("store")) {
        Err(AnalysisError::Unsupported(entries)) => assert_eq!(entries, vec![entry.clone()]),
        other => panic!("expected unsupported error, got {other:?}"),
    }
}

mod properties {
    use bindscope_analysis::{analyze, AnalysisError};
    use bindscope_core::docs::DocPackage;
    use bindscope_core::source::{MethodDecl, Object, SourceModule, TypeDecl};
    use bindscope_core::types::{BasicKind, Signature, StructType, Var};
    use bindscope_core::Type;
    use proptest::prelude::*;
    use std::collections::{BTreeMap, HashSet};

    /// Structs get a `Len` method; functions return the first struct, if any
    fn module(decls: &BTreeMap<String, bool>) -> SourceModule {
        let first_struct = decls.iter().find(|(_, s)| **s).map(|(n, _)| n.clone());
        decls
            .iter()
            .fold(SourceModule::new("gen"), |module, (name, is_struct)| {
                let obj = if *is_struct {
                    Object::TypeName(TypeDecl {
                        name: name.clone(),
                        underlying: Type::Struct(StructType::default()),
                        alias: false,
                        methods: vec![MethodDecl {
                            name: "Len".to_string(),
                            pointer_receiver: false,
                            receiver: "r".to_string(),
                            signature: Signature::new(
                                vec![],
                                vec![Var::unnamed(Type::basic(BasicKind::Int))],
                            ),
                        }],
                    })
                } else {
                    let results = first_struct
                        .iter()
                        .map(|s| Var::unnamed(Type::named("gen", s)))
                        .collect();
                    Object::Func {
                        name: name.clone(),
                        signature: Signature::new(vec![], results),
                    }
                };
                module.with_object(obj)
            })
    }

    proptest! {
        #[test]
        fn prop_ids_unique(decls in prop::collection::btree_map("[A-Z][a-z_]{0,5}", any::<bool>(), 1..12)) {
            let pkg = match analyze(&module(&decls), &DocPackage::new("gen")) {
                Ok(pkg) => pkg,
                Err(AnalysisError::DuplicateId { first, second, .. }) => {
                    // only names containing the separator can collide
                    prop_assert_ne!(first, second);
                    prop_assert!(decls.keys().any(|n| n.contains('_')));
                    return Ok(());
                }
                Err(other) => return Err(TestCaseError::fail(other.to_string())),
            };

            let ids = pkg.ids();
            let unique: HashSet<_> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len());

            // every function lands either among the free functions or the constructors
            let ctors: usize = pkg.structs().iter().map(|s| s.ctors.len()).sum();
            let funcs = decls.values().filter(|s| !**s).count();
            prop_assert_eq!(ctors + pkg.funcs().len(), funcs);
        }
    }
}
