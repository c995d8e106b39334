//! Pattern capability: a circuit graph plus its reference simulation
//!
//! A [`Circuit`] holds everything a formatter needs to serialize the static
//! graph (`inputs`, `compute`, `outputs`) and the cycle counter of the
//! reference run. Pattern families wrap a circuit and implement
//! [`Pattern::step`], which recomputes every output from the current input
//! values and records it at the current cycle.

use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, Operation};

/// Graph and simulation state shared by every pattern family
#[derive(Debug, Clone)]
pub struct Circuit {
    graph: Graph,
    inputs: Vec<NodeId>,
    compute: Vec<Operation>,
    outputs: Vec<NodeId>,
    cycle: usize,
}

impl Circuit {
    pub fn new(graph: Graph, inputs: Vec<NodeId>, compute: Vec<Operation>, outputs: Vec<NodeId>) -> Self {
        Self {
            graph,
            inputs,
            compute,
            outputs,
            cycle: 0,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Nodes driven from outside each cycle
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Operations in construction (topological) order
    pub fn compute(&self) -> &[Operation] {
        &self.compute
    }

    /// Nodes computed by the reference simulation
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    /// Index of the next cycle `step()` will record
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Drive input `index` for the current cycle
    pub fn poke(&mut self, index: usize, value: &BigUint) -> Result<()> {
        let id = *self.inputs.get(index).ok_or(Error::InputOutOfRange {
            index,
            count: self.inputs.len(),
        })?;
        self.graph.update(id, value, self.cycle)
    }

    pub fn input_value(&self, index: usize) -> Result<&BigUint> {
        let id = *self.inputs.get(index).ok_or(Error::InputOutOfRange {
            index,
            count: self.inputs.len(),
        })?;
        self.graph.value(id)
    }

    pub fn output_value(&self, index: usize) -> Result<&BigUint> {
        let id = self.output_id(index)?;
        self.graph.value(id)
    }

    /// Current values of all inputs, in order
    pub fn input_values(&self) -> Result<Vec<&BigUint>> {
        self.inputs.iter().map(|&id| self.graph.value(id)).collect()
    }

    pub(crate) fn record_output(&mut self, index: usize, value: &BigUint) -> Result<()> {
        let id = self.output_id(index)?;
        self.graph.update(id, value, self.cycle)
    }

    pub(crate) fn advance(&mut self) {
        self.cycle += 1;
    }

    fn output_id(&self, index: usize) -> Result<NodeId> {
        self.outputs.get(index).copied().ok_or(Error::OutputOutOfRange {
            index,
            count: self.outputs.len(),
        })
    }
}

/// One generated torture circuit
pub trait Pattern {
    /// Family name, used to label generated output
    fn name(&self) -> &str;

    fn circuit(&self) -> &Circuit;

    fn circuit_mut(&mut self) -> &mut Circuit;

    /// Advance the reference simulation by one cycle.
    ///
    /// Reads the current input values, writes every output at the current
    /// cycle and then increments the cycle. On error nothing advances.
    fn step(&mut self) -> Result<()>;

    fn inputs(&self) -> &[NodeId] {
        self.circuit().inputs()
    }

    fn compute(&self) -> &[Operation] {
        self.circuit().compute()
    }

    fn outputs(&self) -> &[NodeId] {
        self.circuit().outputs()
    }

    fn cycle(&self) -> usize {
        self.circuit().cycle()
    }

    fn poke(&mut self, index: usize, value: &BigUint) -> Result<()> {
        self.circuit_mut().poke(index, value)
    }
}
