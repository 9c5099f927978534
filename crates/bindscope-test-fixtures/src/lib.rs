//! Test fixtures for bindscope analysis testing
//!
//! Module descriptions and documentation trees for a handful of small
//! modules, available in memory or written to a temporary directory.

use bindscope_core::{DocPackage, SourceModule};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Test fixture categories
pub enum FixtureType {
    /// `geo`: one struct, its constructor and a `String` method
    Geo,
    /// `shapes`: embedding, pointer receivers, typed constants, an interface
    Shapes,
    /// `calc`: free functions covering every result shape
    Calc,
    /// `calc` plus a function with three results
    TooManyResults,
}

/// Files written for one fixture
#[derive(Debug, Clone)]
pub struct FixturePaths {
    pub module: PathBuf,
    pub docs: PathBuf,
}

/// Main test fixtures provider
pub struct TestFixtures {
    temp_dir: Option<tempfile::TempDir>,
}

impl Default for TestFixtures {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixtures {
    pub fn new() -> Self {
        Self { temp_dir: None }
    }

    /// Write the module as JSON and its docs as YAML into a fresh temporary
    /// directory that lives as long as `self`
    pub fn setup(&mut self, fixture_type: FixtureType) -> FixturePaths {
        let dir = tempfile::tempdir().unwrap();
        let paths = FixturePaths {
            module: dir.path().join("module.json"),
            docs: dir.path().join("docs.yaml"),
        };

        let (module, docs) = match fixture_type {
            FixtureType::Geo => (geo_module_json(), GEO_DOCS_YAML),
            FixtureType::Shapes => (shapes_module_json(), SHAPES_DOCS_YAML),
            FixtureType::Calc | FixtureType::TooManyResults => {
                let module = match fixture_type {
                    FixtureType::Calc => calc_module_json(),
                    _ => too_many_results_json(),
                };
                (module, "name: calc\n")
            }
        };
        write(&paths.module, &serde_json::to_string_pretty(&module).unwrap());
        write(&paths.docs, docs);

        self.temp_dir = Some(dir);
        paths
    }

    /// Directory of the most recent `setup`
    pub fn path(&self) -> Option<&Path> {
        self.temp_dir.as_ref().map(|d| d.path())
    }
}

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn basic(kind: &str) -> serde_json::Value {
    json!({ "basic": kind })
}

fn named(module: &str, name: &str) -> serde_json::Value {
    json!({ "named": { "name": name, "module": module } })
}

fn pointer(inner: serde_json::Value) -> serde_json::Value {
    json!({ "pointer": inner })
}

fn error() -> serde_json::Value {
    json!({ "named": { "name": "error" } })
}

fn geo_module_json() -> serde_json::Value {
    json!({
        "name": "geo",
        "path": "example.com/geo",
        "objects": [
            {
                "kind": "type_name",
                "name": "Point",
                "underlying": { "struct": { "fields": [
                    { "name": "X", "ty": basic("int") },
                    { "name": "Y", "ty": basic("int") }
                ]}},
                "methods": [{
                    "name": "String",
                    "receiver": "p",
                    "signature": { "results": [{ "ty": basic("string") }] }
                }]
            },
            {
                "kind": "func",
                "name": "NewPoint",
                "signature": {
                    "params": [
                        { "name": "x", "ty": basic("int") },
                        { "name": "y", "ty": basic("int") }
                    ],
                    "results": [{ "ty": named("geo", "Point") }]
                }
            }
        ]
    })
}

const GEO_DOCS_YAML: &str = r#"name: geo
doc: Package geo has points.
types:
  - name: Point
    doc: Point is a location on the plane.
    funcs:
      - name: NewPoint
        doc: NewPoint returns the point at x, y.
    methods:
      - name: String
        doc: String formats the point.
"#;

fn shapes_module_json() -> serde_json::Value {
    let string_result = json!({ "results": [{ "ty": basic("string") }] });
    json!({
        "name": "shapes",
        "objects": [
            { "kind": "const", "name": "Sides", "ty": basic("int"), "value": 4 },
            { "kind": "const", "name": "Unit", "ty": basic("float64"), "value": 1.0 },
            { "kind": "var", "name": "DefaultSide", "ty": basic("float64") },
            { "kind": "var", "name": "registry", "ty": basic("int") },
            {
                "kind": "type_name",
                "name": "Base",
                "underlying": { "struct": { "fields": [
                    { "name": "ID", "ty": basic("int") },
                    { "name": "tag", "ty": basic("string") }
                ]}},
                "methods": [
                    { "name": "Describe", "receiver": "b", "signature": string_result },
                    {
                        "name": "SetID",
                        "pointer_receiver": true,
                        "receiver": "b",
                        "signature": { "params": [{ "name": "id", "ty": basic("int") }] }
                    },
                    { "name": "touch", "pointer_receiver": true, "receiver": "b", "signature": {} }
                ]
            },
            {
                "kind": "type_name",
                "name": "Square",
                "underlying": { "struct": { "fields": [
                    { "name": "Base", "ty": named("shapes", "Base"), "embedded": true },
                    { "name": "Side", "ty": basic("float64") }
                ]}},
                "methods": [
                    {
                        "name": "Area",
                        "receiver": "s",
                        "signature": { "results": [{ "ty": basic("float64") }] }
                    },
                    { "name": "String", "receiver": "s", "signature": string_result },
                    {
                        "name": "Scale",
                        "pointer_receiver": true,
                        "receiver": "s",
                        "signature": {
                            "params": [{ "name": "f", "ty": basic("float64") }],
                            "results": [{ "ty": error() }]
                        }
                    }
                ]
            },
            {
                "kind": "type_name",
                "name": "Shape",
                "underlying": { "interface": { "methods": [
                    { "name": "Area", "signature": { "results": [{ "ty": basic("float64") }] } }
                ]}}
            },
            {
                "kind": "func",
                "name": "NewSquare",
                "signature": {
                    "params": [{ "name": "side", "ty": basic("float64") }],
                    "results": [{ "ty": named("shapes", "Square") }]
                }
            },
            {
                "kind": "func",
                "name": "FromBase",
                "signature": {
                    "params": [
                        { "name": "b", "ty": named("shapes", "Base") },
                        { "name": "side", "ty": basic("float64") }
                    ],
                    "results": [{ "ty": named("shapes", "Square") }, { "ty": error() }]
                }
            },
            {
                "kind": "func",
                "name": "UnitSquare",
                "signature": { "results": [{ "ty": pointer(named("shapes", "Square")) }] }
            },
            {
                "kind": "func",
                "name": "Perimeter",
                "signature": {
                    "params": [{ "name": "s", "ty": named("shapes", "Square") }],
                    "results": [{ "ty": basic("float64") }]
                }
            }
        ]
    })
}

const SHAPES_DOCS_YAML: &str = r#"name: shapes
doc: Package shapes models polygons.
consts:
  - names: [Sides]
    doc: Sides of a square.
vars:
  - names: [DefaultSide]
    doc: DefaultSide is used by UnitSquare.
types:
  - name: Base
    doc: Base carries an identifier.
    methods:
      - name: Describe
        doc: Describe names the shape.
  - name: Square
    doc: Square is a regular quadrilateral.
    consts:
      - names: [Unit]
        doc: Unit is the unit square.
    funcs:
      - name: NewSquare
        doc: NewSquare makes a square.
    methods:
      - name: Area
        doc: Area of the square.
funcs:
  - name: Perimeter
    doc: Perimeter of a square.
  - name: UnitSquare
    doc: UnitSquare returns a shared square.
"#;

fn calc_module_json() -> serde_json::Value {
    json!({
        "name": "calc",
        "objects": [
            {
                "kind": "func",
                "name": "Divide",
                "signature": {
                    "params": [
                        { "name": "a", "ty": basic("int") },
                        { "name": "b", "ty": basic("int") }
                    ],
                    "results": [{ "ty": basic("int") }, { "ty": error() }]
                }
            },
            {
                "kind": "func",
                "name": "Validate",
                "signature": {
                    "params": [{ "name": "s", "ty": basic("string") }],
                    "results": [{ "ty": error() }]
                }
            },
            { "kind": "func", "name": "Reset", "signature": {} }
        ]
    })
}

fn too_many_results_json() -> serde_json::Value {
    let mut module = calc_module_json();
    module["objects"].as_array_mut().unwrap().push(json!({
        "kind": "func",
        "name": "Sum",
        "signature": {
            "params": [
                { "name": "a", "ty": basic("int") },
                { "name": "b", "ty": basic("int") }
            ],
            "results": [{ "ty": basic("int") }, { "ty": basic("int") }, { "ty": error() }]
        }
    }));
    module
}

pub fn geo_module() -> SourceModule {
    serde_json::from_value(geo_module_json()).unwrap()
}

pub fn geo_docs() -> DocPackage {
    serde_yaml::from_str(GEO_DOCS_YAML).unwrap()
}

pub fn shapes_module() -> SourceModule {
    serde_json::from_value(shapes_module_json()).unwrap()
}

pub fn shapes_docs() -> DocPackage {
    serde_yaml::from_str(SHAPES_DOCS_YAML).unwrap()
}

pub fn calc_module() -> SourceModule {
    serde_json::from_value(calc_module_json()).unwrap()
}

pub fn too_many_results_module() -> SourceModule {
    serde_json::from_value(too_many_results_json()).unwrap()
}
