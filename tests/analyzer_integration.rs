//! Integration tests for the full analysis pipeline.
//!
//! These tests load the Java fixtures under `testdata/java`, run the
//! analyzer over them and check the assembled model.

use std::path::PathBuf;

use classmap::config::Config;
use classmap::error::ScanError;
use classmap::source::SourceLoader;
use classmap::{Analysis, Analyzer, SourceFile, Visibility};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("java")
}

fn load_fixtures(config: &Config) -> Vec<SourceFile> {
    let loaded = SourceLoader::new(config)
        .expect("should build loader")
        .load(&testdata_path())
        .expect("should load testdata");
    assert!(loaded.warnings.is_empty(), "fixtures should all decode");
    loaded.files
}

fn run_analysis() -> Analysis {
    let config = Config::default();
    Analyzer::from_config(&config).analyze(&load_fixtures(&config))
}

#[test]
fn test_model_contains_every_declared_type() {
    let analysis = run_analysis();
    assert_eq!(analysis.files_scanned, 9);

    let fqns: Vec<_> = analysis.model.types.keys().map(String::as_str).collect();
    assert_eq!(
        fqns,
        vec![
            "cad.cli.CommandManager",
            "cad.cli.CommandRegistry",
            "cad.core.Entity",
            "cad.core.Sketch",
            "cad.geometry.curves.Curve",
            "cad.geometry.curves.LineCurve",
            "cad.math.Vector3d",
        ]
    );
}

#[test]
fn test_broken_file_is_skipped_with_warning() {
    let analysis = run_analysis();
    assert_eq!(analysis.warnings.len(), 1);

    let warning = &analysis.warnings[0];
    assert_eq!(warning.path, "broken/Broken.java");
    assert!(matches!(warning.error, ScanError::UnterminatedBody { line: 3 }));
    assert!(analysis.model.get("broken.Broken").is_none());
}

#[test]
fn test_declaration_details() {
    let analysis = run_analysis();

    let sketch = analysis.model.get("cad.core.Sketch").unwrap();
    assert_eq!(sketch.package, "cad.core");
    assert_eq!(sketch.class_name, "Sketch");
    assert_eq!(sketch.file, "cad/core/Sketch.java");
    assert_eq!(sketch.line, 10);
    assert_eq!(sketch.extends.as_deref(), Some("Entity"));
    assert_eq!(
        sketch.imports,
        vec!["cad.geometry.curves.*", "java.util.ArrayList", "java.util.List"]
    );
    assert_eq!(sketch.summary, "Ordered collection of curves edited together.");

    let registry = analysis.model.get("cad.cli.CommandRegistry").unwrap();
    assert_eq!(registry.summary, "Core component CommandRegistry.");

    let line = analysis.model.get("cad.geometry.curves.LineCurve").unwrap();
    assert_eq!(line.implements, vec!["Curve"]);
    assert!(line.extends.is_none());

    let entity = analysis.model.get("cad.core.Entity").unwrap();
    assert_eq!(
        entity.documentation,
        "Base type for everything stored in a document."
    );
}

#[test]
fn test_members_and_tagging() {
    let analysis = run_analysis();
    let sketch = analysis.model.get("cad.core.Sketch").unwrap();

    assert_eq!(sketch.constructors.len(), 1);
    assert_eq!(
        sketch.constructors[0].description,
        "Initializes Sketch. Updates internal state properties."
    );
    assert_eq!(sketch.constructors[0].signature, "public Sketch(String name)");

    let names: Vec<_> = sketch.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "addCurve",
            "removeCurve",
            "notifyListeners",
            "getCurves",
            "setName",
            "empty",
            "render"
        ]
    );

    let add = &sketch.methods[0];
    assert_eq!(add.description, "Adds item to internal collection.");
    assert_eq!(add.documentation, "Adds a curve.");
    assert_eq!(add.parameters[0].description, "the curve to add");

    let notify = &sketch.methods[2];
    assert_eq!(notify.visibility, Visibility::Protected);
    assert_eq!(
        notify.description,
        "Logs status to console. Notifies registered listeners."
    );

    let empty = &sketch.methods[5];
    assert!(empty.is_static);
    assert_eq!(empty.signature, "public static Sketch empty()");

    let render = &sketch.methods[6];
    assert_eq!(render.visibility, Visibility::PackagePrivate);
    assert_eq!(render.description, "Executes custom logic.");

    let registry = analysis.model.get("cad.cli.CommandRegistry").unwrap();
    let run = registry.methods.iter().find(|m| m.name == "run").unwrap();
    assert_eq!(run.description, "Dispatches a command for execution.");
    assert_eq!(run.connections, vec!["CommandManager", "SketchCommand"]);
}

#[test]
fn test_comment_braces_do_not_break_bodies() {
    let analysis = run_analysis();
    let line = analysis.model.get("cad.geometry.curves.LineCurve").unwrap();

    let names: Vec<_> = line.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["pointAt", "length", "getEndpoints"]);

    let length = &line.methods[1];
    assert_eq!(length.description, "Computes and returns the result.");
    assert_eq!(length.returns, "the length of the segment");
    assert_eq!(line.methods[0].description, "Returns the requested value.");
}

#[test]
fn test_usage_graph() {
    let analysis = run_analysis();
    let model = &analysis.model;

    assert_eq!(
        model.get("cad.core.Sketch").unwrap().uses,
        vec!["cad.core.Entity", "cad.geometry.curves.Curve"]
    );
    assert_eq!(
        model.get("cad.geometry.curves.Curve").unwrap().used_by,
        vec!["cad.core.Sketch", "cad.geometry.curves.LineCurve"]
    );
    assert_eq!(
        model.get("cad.geometry.curves.Curve").unwrap().extended_by,
        vec!["cad.geometry.curves.LineCurve"]
    );
    assert_eq!(
        model.get("cad.core.Entity").unwrap().extended_by,
        vec!["cad.core.Sketch"]
    );
    assert_eq!(
        model.get("cad.math.Vector3d").unwrap().used_by,
        vec!["cad.geometry.curves.LineCurve"]
    );
    assert_eq!(
        model.get("cad.cli.CommandRegistry").unwrap().uses,
        vec!["cad.cli.CommandManager", "cad.core.Sketch"]
    );

    // Self references and built-in types never become edges.
    let vector = model.get("cad.math.Vector3d").unwrap();
    assert!(vector.uses.is_empty());
    assert!(!vector.used_by.contains(&"cad.math.Vector3d".to_string()));

    assert_eq!(model.stats().edges, 6);
}

#[test]
fn test_analysis_is_deterministic() {
    let config = Config::default();
    let files = load_fixtures(&config);

    let first = Analyzer::from_config(&config).analyze(&files);
    let second = Analyzer::from_config(&config).parallel(false).analyze(&files);

    assert_eq!(
        serde_json::to_string_pretty(&first.model).unwrap(),
        serde_json::to_string_pretty(&second.model).unwrap()
    );
}

#[test]
fn test_snippets_from_config() {
    let config = Config {
        snippets: true,
        snippet_length: 12,
        ..Default::default()
    };
    let analysis = Analyzer::from_config(&config).analyze(&load_fixtures(&config));
    let vector = analysis.model.get("cad.math.Vector3d").unwrap();

    let get_x = vector.methods.iter().find(|m| m.name == "getX").unwrap();
    assert_eq!(get_x.code_snippet.as_deref(), Some("return x;"));

    let add = vector.methods.iter().find(|m| m.name == "add").unwrap();
    assert_eq!(add.code_snippet.as_deref(), Some("return new V..."));
}

#[test]
fn test_extra_builtin_types_suppress_edges() {
    let config = Config {
        extra_builtin_types: vec!["Vector3d".to_string()],
        ..Default::default()
    };
    let analysis = Analyzer::from_config(&config).analyze(&load_fixtures(&config));
    let vector = analysis.model.get("cad.math.Vector3d").unwrap();
    assert!(vector.used_by.is_empty());
}

#[test]
fn test_excluded_paths_config() {
    let config = Config {
        excluded_paths: vec!["broken/**".to_string()],
        ..Default::default()
    };
    let analysis = Analyzer::from_config(&config).analyze(&load_fixtures(&config));
    assert!(analysis.warnings.is_empty());
    assert_eq!(analysis.files_scanned, 8);
}
