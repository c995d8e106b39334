//! Output writers for constructed patterns
//!
//! A writer serializes the static graph of a pattern and, where the target
//! format carries expected values, drives a golden run through
//! [`golden_run`] to embed them.
//!
//! - [`flo`]: Flo netlist text
//! - [`chisel`]: Chisel module plus a tester checking the golden vectors
//! - [`vcd`]: value change dump of a golden run
//! - [`json`]: module IR JSON with golden vectors attached

pub mod chisel;
pub mod flo;
pub mod json;
pub mod vcd;

use std::fmt;
use std::io::Write;
use std::num::NonZeroUsize;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::pattern::Pattern;
use crate::stimulus::{Stimulus, DEFAULT_SEED};

pub use chisel::ChiselFormat;
pub use flo::FloFormat;
pub use json::JsonFormat;
pub use vcd::VcdFormat;

/// How many cycles of reference data to produce, and from which seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    pub cycles: usize,
    pub seed: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            cycles: 16,
            seed: DEFAULT_SEED,
        }
    }
}

/// Inputs driven and outputs produced in one reference cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleVector {
    pub cycle: usize,
    pub inputs: Vec<BigUint>,
    pub outputs: Vec<BigUint>,
}

/// Drive seeded stimulus and step the pattern `opts.cycles` times
pub fn golden_run(pattern: &mut dyn Pattern, opts: &RunOptions) -> Result<Vec<CycleVector>> {
    let mut stimulus = Stimulus::new(opts.seed);
    let mut vectors = Vec::with_capacity(opts.cycles);

    for _ in 0..opts.cycles {
        stimulus.drive(pattern)?;
        let cycle = pattern.cycle();
        let inputs = pattern
            .circuit()
            .input_values()?
            .into_iter()
            .cloned()
            .collect();

        pattern.step()?;

        let circuit = pattern.circuit();
        let outputs = (0..circuit.outputs().len())
            .map(|i| circuit.output_value(i).cloned())
            .collect::<Result<Vec<_>>>()?;
        vectors.push(CycleVector { cycle, inputs, outputs });
    }

    debug!(pattern = pattern.name(), cycles = opts.cycles, seed = opts.seed, "golden run complete");
    Ok(vectors)
}

/// Serializes a pattern into one output format
pub trait Format {
    fn name(&self) -> &'static str;

    /// File extension, without the dot
    fn extension(&self) -> &'static str;

    fn write(&self, out: &mut dyn Write, pattern: &mut dyn Pattern, opts: &RunOptions) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    #[default]
    Flo,
    Chisel,
    Vcd,
    Json,
}

impl FormatKind {
    pub const ALL: [FormatKind; 4] = [FormatKind::Flo, FormatKind::Chisel, FormatKind::Vcd, FormatKind::Json];

    pub fn name(self) -> &'static str {
        match self {
            FormatKind::Flo => "flo",
            FormatKind::Chisel => "chisel",
            FormatKind::Vcd => "vcd",
            FormatKind::Json => "json",
        }
    }

    pub fn formatter(self) -> Box<dyn Format> {
        match self {
            FormatKind::Flo => Box::new(FloFormat),
            FormatKind::Chisel => Box::new(ChiselFormat),
            FormatKind::Vcd => Box::new(VcdFormat::default()),
            FormatKind::Json => Box::new(JsonFormat),
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FormatKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}

/// Port name of output `index`
pub(crate) fn output_port(index: usize) -> String {
    format!("out{}", index)
}

/// Width of a node for printing; unconstrained nodes print as one bit
pub(crate) fn width_of(graph: &Graph, id: NodeId) -> usize {
    graph.width(id).map_or(1, NonZeroUsize::get)
}
