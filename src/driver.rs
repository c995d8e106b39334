//! Pattern selection and output generation
//!
//! The driver resolves one factory from a registry, builds a pattern (default
//! or from an argument string) and hands it to the configured writer.
//! Failures are returned, never papered over: an unknown name or a malformed
//! argument string is an error, not a fallback to the first pattern.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::format::{FormatKind, RunOptions};
use crate::pattern::Pattern;
use crate::registry::PatternRegistry;

/// Which registered factory to use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    Index(usize),
    Name(String),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Index(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub selection: Selection,
    /// Family-specific argument string; `None` builds the default configuration
    pub args: Option<String>,
    pub format: FormatKind,
    pub run: RunOptions,
}

/// Build one pattern from the selected factory
pub fn instantiate(registry: &PatternRegistry, selection: &Selection, args: Option<&str>) -> Result<Box<dyn Pattern>> {
    let factory = match selection {
        Selection::Index(index) => registry.get(*index)?,
        Selection::Name(name) => registry.find(name)?,
    };

    let pattern = match args {
        Some(args) => factory.create_with(args)?,
        None => factory.create(),
    };
    info!(
        pattern = factory.name(),
        args = args.unwrap_or("<default>"),
        inputs = pattern.inputs().len(),
        operations = pattern.compute().len(),
        outputs = pattern.outputs().len(),
        "instantiated pattern"
    );
    Ok(pattern)
}

/// Instantiate the configured pattern and write it to `out`
pub fn generate(registry: &PatternRegistry, config: &DriverConfig, out: &mut dyn Write) -> Result<()> {
    let mut pattern = instantiate(registry, &config.selection, config.args.as_deref())?;
    config.format.formatter().write(out, pattern.as_mut(), &config.run)?;
    out.flush()?;
    Ok(())
}

/// Write every example of every registered family into `dir`.
///
/// Files are named `<family>-<args>.<ext>`. The selection and args of
/// `config` are ignored; format and run options apply to every file.
pub fn generate_examples(registry: &PatternRegistry, config: &DriverConfig, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let formatter = config.format.formatter();
    let mut written = Vec::new();

    for factory in registry.list() {
        for &args in factory.examples() {
            let mut pattern = factory.create_with(args)?;
            let path = dir.join(format!("{}-{}.{}", factory.name(), args, formatter.extension()));
            let mut out = BufWriter::new(File::create(&path)?);
            formatter.write(&mut out, pattern.as_mut(), &config.run)?;
            out.flush()?;
            info!(path = %path.display(), "wrote example");
            written.push(path);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.selection, Selection::Index(0));
        assert_eq!(config.args, None);
        assert_eq!(config.format, FormatKind::Flo);
        assert_eq!(config.run, RunOptions::default());
    }

    #[test]
    fn test_config_from_json() {
        let config: DriverConfig = serde_json::from_str(
            r#"{"selection": {"name": "one_sided_and_tree"}, "args": "64-4", "format": "vcd", "run": {"cycles": 3}}"#,
        )
        .unwrap();
        assert_eq!(config.selection, Selection::Name("one_sided_and_tree".into()));
        assert_eq!(config.format, FormatKind::Vcd);
        assert_eq!(config.run.cycles, 3);
        assert_eq!(config.run.seed, RunOptions::default().seed);
    }

    #[test]
    fn test_instantiate_by_name_and_index() {
        let registry = PatternRegistry::builtin();
        let by_name = instantiate(&registry, &Selection::Name("one_sided_and_tree".into()), Some("64-8")).unwrap();
        assert_eq!(by_name.inputs().len(), 9);
        let by_index = instantiate(&registry, &Selection::Index(0), None).unwrap();
        assert_eq!(by_index.inputs().len(), 129);
    }

    #[test]
    fn test_instantiate_failures() {
        let registry = PatternRegistry::builtin();
        let err = instantiate(&registry, &Selection::Name("nope".into()), None).err().unwrap();
        assert!(matches!(err, Error::UnknownPattern(_)));
        let err = instantiate(&registry, &Selection::Index(99), None).err().unwrap();
        assert!(matches!(err, Error::PatternIndexOutOfRange { index: 99, .. }));
        let err = instantiate(&registry, &Selection::Index(0), Some("bogus")).err().unwrap();
        assert!(matches!(err, Error::InvalidArgs { .. }));
    }

    #[test]
    fn test_generate_flo() {
        let registry = PatternRegistry::builtin();
        let config = DriverConfig {
            args: Some("4-1".into()),
            ..DriverConfig::default()
        };
        let mut buf = Vec::new();
        generate(&registry, &config, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "in0 = in'4\nin1 = in'4\nT0 = and'4 in0 in0\nT1 = and'4 T0 in1\nout0 = out'4 T1\n"
        );
    }
}
