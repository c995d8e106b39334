//! Registry and driver behaviour seen from outside the crate

use std::sync::Arc;

use num_bigint::BigUint;
use torture_patterns::format::FormatKind;
use torture_patterns::patterns::{OneSidedAndTree, OneSidedAndTreeFactory};
use torture_patterns::{
    generate, generate_examples, instantiate, registry, DriverConfig, Error, Pattern, PatternFactory,
    PatternRegistry, Result, RunOptions, Selection,
};

/// A factory that wraps the AND tree under another name
struct Renamed {
    name: &'static str,
    width: usize,
}

impl PatternFactory for Renamed {
    fn name(&self) -> &'static str {
        self.name
    }

    fn create(&self) -> Box<dyn Pattern> {
        Box::new(OneSidedAndTree::new(self.width, 0).unwrap())
    }

    fn create_with(&self, args: &str) -> Result<Box<dyn Pattern>> {
        OneSidedAndTreeFactory.create_with(args)
    }

    fn examples(&self) -> &'static [&'static str] {
        &["2-0"]
    }
}

#[test]
fn registry_round_trip() {
    let names = ["first", "second", "third", "fourth"];
    let mut registry = PatternRegistry::new();
    for (i, &name) in names.iter().enumerate() {
        registry.link(Arc::new(Renamed { name, width: i + 1 }));
    }

    assert_eq!(registry.list().len(), names.len());
    for (factory, name) in registry.list().iter().zip(names) {
        assert_eq!(factory.name(), name);
    }
    let third = instantiate(&registry, &Selection::Name("third".into()), None).unwrap();
    assert_eq!(third.compute()[0].width().get(), 3);
}

#[test]
fn builtin_registry_default_pattern() {
    let registry = registry::global();
    assert_eq!(registry.names(), vec!["one_sided_and_tree"]);

    let factory = registry.find("one_sided_and_tree").unwrap();
    let p = factory.create();
    assert_eq!(p.inputs().len(), 129);
    assert_eq!(p.compute().len(), 129);
    assert_eq!(p.outputs().len(), 1);
    assert!(p.compute().iter().all(|op| op.width().get() == 32));
}

#[test]
fn every_example_builds_and_steps() {
    let registry = PatternRegistry::builtin();
    for factory in registry.list() {
        for args in factory.examples() {
            let mut p = factory.create_with(args).unwrap();
            for i in 0..p.inputs().len() {
                p.poke(i, &BigUint::from(u64::MAX)).unwrap();
            }
            p.step().unwrap();
            let out = p.circuit().output_value(0).unwrap();
            let width = p.compute()[0].width().get();
            assert_eq!(out.bits(), width as u64, "{} {}", factory.name(), args);
        }
    }
}

#[test]
fn malformed_args_name_the_string() {
    let registry = PatternRegistry::builtin();
    let err = instantiate(&registry, &Selection::Index(0), Some("32x128")).err().unwrap();
    assert!(matches!(&err, Error::InvalidArgs { .. }));
    assert!(err.to_string().contains("'32x128'"));
}

#[test]
fn generate_each_format() {
    let registry = PatternRegistry::builtin();
    for format in FormatKind::ALL {
        let config = DriverConfig {
            selection: Selection::Name("one_sided_and_tree".into()),
            args: Some("8-2".into()),
            format,
            run: RunOptions { cycles: 4, seed: 1 },
        };
        let mut buf = Vec::new();
        generate(&registry, &config, &mut buf).unwrap();
        assert!(!buf.is_empty(), "{} produced nothing", format);
    }
}

#[test]
fn examples_written_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = DriverConfig {
        format: FormatKind::Json,
        run: RunOptions { cycles: 2, seed: 9 },
        ..DriverConfig::default()
    };
    let written = generate_examples(&PatternRegistry::builtin(), &config, dir.path()).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "one_sided_and_tree-64-4.json",
            "one_sided_and_tree-64-8.json",
            "one_sided_and_tree-32-128.json",
            "one_sided_and_tree-64-128.json",
        ]
    );
    for path in &written {
        let text = std::fs::read_to_string(path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["vectors"].as_array().unwrap().len(), 2);
    }
}
