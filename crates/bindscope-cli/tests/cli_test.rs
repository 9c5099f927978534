//! End-to-end tests of the CLI entry points over on-disk fixtures

use bindscope::{run_analyze, run_symbols, AnalyzeOptions};
use bindscope_core::format::Format;
use bindscope_core::Package;
use bindscope_test_fixtures::{FixtureType, TestFixtures};
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn test_analyze_geo_to_json() {
    let mut fixtures = TestFixtures::new();
    let paths = fixtures.setup(FixtureType::Geo);

    let mut opts = AnalyzeOptions::new(&paths.module);
    opts.docs = Some(paths.docs.clone());
    let rendered = run_analyze(&opts).unwrap();

    let package: Package = serde_json::from_str(&rendered).unwrap();
    assert_eq!(package.name(), "geo");
    assert_eq!(package.doc(), "Package geo has points.");
    assert!(package.funcs().is_empty());

    let point = package.find_struct("Point").unwrap();
    assert_eq!(point.doc, "Point is a location on the plane.");
    let ctor = point.ctor("NewPoint").unwrap();
    assert_eq!(ctor.id, "geo_Point_NewPoint");
    assert_eq!(
        ctor.doc,
        "NewPoint(int x, int y) Point\n\nNewPoint returns the point at x, y."
    );
    assert_eq!(point.method("String").unwrap().id, "geo_Point_String");
}

#[test]
fn test_analyze_yaml_with_trace() {
    let mut fixtures = TestFixtures::new();
    let paths = fixtures.setup(FixtureType::Geo);

    let opts = AnalyzeOptions {
        docs: Some(paths.docs.clone()),
        format: Format::Yaml,
        trace: true,
        ..AnalyzeOptions::new(&paths.module)
    };
    let rendered = run_analyze(&opts).unwrap();

    let report: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
    assert_eq!(report["package"]["name"].as_str(), Some("geo"));
    assert_eq!(
        report["trace"]["constructors"][0]["name"].as_str(),
        Some("NewPoint")
    );
    assert_eq!(
        report["trace"]["capabilities"][0]["capability"].as_str(),
        Some("stringer")
    );
    assert_eq!(report["trace"]["result"]["structs"].as_u64(), Some(1));
}

#[test]
fn test_config_file_enables_pointer_constructors() {
    let mut fixtures = TestFixtures::new();
    let paths = fixtures.setup(FixtureType::Shapes);
    let config = fixtures.path().unwrap().join("bindscope.toml");
    fs::write(&config, "pointer_constructors = true\n").unwrap();

    let opts = AnalyzeOptions {
        docs: Some(paths.docs.clone()),
        config: Some(config),
        ..AnalyzeOptions::new(&paths.module)
    };
    let package: Package = serde_json::from_str(&run_analyze(&opts).unwrap()).unwrap();

    let square = package.find_struct("Square").unwrap();
    assert!(square.ctor("UnitSquare").is_some());
    let free: Vec<_> = package.funcs().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(free, vec!["Perimeter"]);
}

#[test]
fn test_unknown_config_key_rejected() {
    let mut fixtures = TestFixtures::new();
    let paths = fixtures.setup(FixtureType::Geo);
    let config = fixtures.path().unwrap().join("bindscope.toml");
    fs::write(&config, "pointer_ctors = true\n").unwrap();

    let opts = AnalyzeOptions {
        config: Some(config),
        ..AnalyzeOptions::new(&paths.module)
    };
    let err = run_analyze(&opts).unwrap_err();
    assert!(err.to_string().contains("Failed to load config"));
}

#[test]
fn test_analyze_reports_too_many_results() {
    let mut fixtures = TestFixtures::new();
    let paths = fixtures.setup(FixtureType::TooManyResults);

    let err = run_analyze(&AnalyzeOptions::new(&paths.module)).unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.contains("Failed to analyze module calc"));
    assert!(chain.contains("calc.Sum"));
}

#[test]
fn test_missing_module_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_analyze(&AnalyzeOptions::new(dir.path().join("absent.json"))).unwrap_err();
    assert!(err.to_string().contains("Failed to load module"));
}

#[test]
fn test_symbols_listing() {
    let mut fixtures = TestFixtures::new();
    let paths = fixtures.setup(FixtureType::Shapes);

    let listing = run_symbols(&paths.module).unwrap();
    let names: Vec<_> = listing
        .lines()
        .map(|l| l.split('\t').next().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "Base",
            "DefaultSide",
            "FromBase",
            "NewSquare",
            "Perimeter",
            "Shape",
            "Sides",
            "Square",
            "Unit",
            "UnitSquare"
        ]
    );
    assert!(listing.contains("Perimeter\tfunc\tfunc(Square) float64"));
    assert!(!listing.contains("registry"));
}
