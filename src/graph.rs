//! Bitvector dataflow graph primitives
//!
//! Nodes live in a flat arena owned by a [`Graph`] and are referenced by
//! [`NodeId`]. Operations hold ids, never nodes, so the same signal can be
//! listed as several operands of one operation without any aliasing issues.
//! Every operation is built from nodes that already exist, which keeps the
//! graph acyclic by construction.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;

use num_bigint::BigUint;

use crate::bits;
use crate::error::{Error, Result};

/// Stable index of a node inside its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A signal: name, width and per-cycle value history
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    width: Option<NonZeroUsize>,
    /// `(cycle, value)` pairs in increasing cycle order
    history: Vec<(usize, BigUint)>,
}

impl Node {
    fn new(name: String, width: Option<NonZeroUsize>) -> Self {
        Self {
            name,
            width,
            history: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared or inferred width, `None` until some operation fixes it
    pub fn width(&self) -> Option<NonZeroUsize> {
        self.width
    }

    /// Record `value` for `cycle`, truncated to the node width.
    ///
    /// Writing the most recent cycle again replaces that entry.
    pub fn update(&mut self, value: &BigUint, cycle: usize) -> Result<()> {
        let value = match self.width {
            Some(width) => bits::truncate(value, width),
            None => value.clone(),
        };

        if let Some(&(last, _)) = self.history.last() {
            if last > cycle {
                return Err(Error::CycleRegression {
                    name: self.name.clone(),
                    cycle,
                    last,
                });
            }
            if last == cycle {
                self.history.pop();
            }
        }
        self.history.push((cycle, value));
        Ok(())
    }

    /// Most recently written value
    pub fn value(&self) -> Result<&BigUint> {
        self.history
            .last()
            .map(|(_, v)| v)
            .ok_or_else(|| Error::UninitializedSignal(self.name.clone()))
    }

    /// Value held at `cycle` (the last write at or before it)
    pub fn value_at(&self, cycle: usize) -> Result<&BigUint> {
        let idx = self.history.partition_point(|(c, _)| *c <= cycle);
        if idx == 0 {
            return Err(Error::UninitializedSignal(self.name.clone()));
        }
        Ok(&self.history[idx - 1].1)
    }

    pub fn history(&self) -> &[(usize, BigUint)] {
        &self.history
    }
}

/// Bitwise operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    And,
    Or,
    Xor,
}

impl Opcode {
    /// Flo opcode mnemonic
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
        }
    }

    /// Infix operator used by Chisel and the module IR
    pub fn symbol(self) -> &'static str {
        match self {
            Opcode::And => "&",
            Opcode::Or => "|",
            Opcode::Xor => "^",
        }
    }

    pub fn apply(self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        match self {
            Opcode::And => lhs & rhs,
            Opcode::Or => lhs | rhs,
            Opcode::Xor => lhs ^ rhs,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A fixed-width computation reducing its sources into `dest`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    name: String,
    dest: NodeId,
    width: NonZeroUsize,
    opcode: Opcode,
    sources: Vec<NodeId>,
}

impl Operation {
    /// Same as the destination node's name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dest(&self) -> NodeId {
        self.dest
    }

    pub fn width(&self) -> NonZeroUsize {
        self.width
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Operands in order; the same id may appear more than once
    pub fn sources(&self) -> &[NodeId] {
        &self.sources
    }
}

/// Arena of nodes shared by all operations of one pattern
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    name_to_idx: HashMap<String, NodeId>,
    temp_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node whose width will be inferred from its first operation.
    ///
    /// Names need not be unique; [`Graph::find`] resolves a repeated name to
    /// the node created first.
    pub fn node(&mut self, name: impl Into<String>) -> NodeId {
        self.push(name.into(), None)
    }

    pub fn node_with_width(&mut self, name: impl Into<String>, width: NonZeroUsize) -> NodeId {
        self.push(name.into(), Some(width))
    }

    /// Fresh auto-named node (`T0`, `T1`, ...)
    pub fn temp(&mut self) -> NodeId {
        loop {
            let name = format!("T{}", self.temp_count);
            self.temp_count += 1;
            if !self.name_to_idx.contains_key(&name) {
                return self.push(name, None);
            }
        }
    }

    fn push(&mut self, name: String, width: Option<NonZeroUsize>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.name_to_idx.entry(name.clone()).or_insert(id);
        self.nodes.push(Node::new(name, width));
        id
    }

    /// Two-operand operation writing a fresh temp.
    ///
    /// `lhs` and `rhs` may be the same node. Nodes without a width take
    /// `width`.
    pub fn binary(&mut self, opcode: Opcode, width: NonZeroUsize, lhs: NodeId, rhs: NodeId) -> Operation {
        let dest = self.temp();
        for id in [lhs, rhs, dest] {
            self.infer_width(id, width);
        }
        Operation {
            name: self.nodes[dest.0].name.clone(),
            dest,
            width,
            opcode,
            sources: vec![lhs, rhs],
        }
    }

    /// Chain `node` onto `op`: same opcode and width, sources `[op.dest, node]`
    pub fn extend(&mut self, op: &Operation, node: NodeId) -> Operation {
        self.binary(op.opcode, op.width, op.dest, node)
    }

    fn infer_width(&mut self, id: NodeId, width: NonZeroUsize) {
        let node = &mut self.nodes[id.0];
        if node.width.is_none() {
            node.width = Some(width);
        }
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.name_to_idx.get(name).copied()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn width(&self, id: NodeId) -> Option<NonZeroUsize> {
        self.nodes[id.0].width
    }

    pub fn update(&mut self, id: NodeId, value: &BigUint, cycle: usize) -> Result<()> {
        self.nodes[id.0].update(value, cycle)
    }

    pub fn value(&self, id: NodeId) -> Result<&BigUint> {
        self.nodes[id.0].value()
    }

    pub fn value_at(&self, id: NodeId, cycle: usize) -> Result<&BigUint> {
        self.nodes[id.0].value_at(cycle)
    }

    /// Fold the opcode over the sources' current values
    pub fn evaluate(&self, op: &Operation) -> Result<BigUint> {
        let mut sources = op.sources.iter();
        let first = match sources.next() {
            Some(&id) => self.value(id)?.clone(),
            None => return Err(Error::UninitializedSignal(op.name.clone())),
        };
        let result = sources.try_fold(first, |acc, &id| {
            self.value(id).map(|v| op.opcode.apply(&acc, v))
        })?;
        Ok(bits::truncate(&result, op.width))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_node_uninitialized() {
        let mut g = Graph::new();
        let a = g.node("a");
        assert!(matches!(g.value(a), Err(Error::UninitializedSignal(name)) if name == "a"));
    }

    #[test]
    fn test_node_history() {
        let mut g = Graph::new();
        let a = g.node_with_width("a", w(4));
        g.update(a, &BigUint::from(0x1Fu32), 0).unwrap();
        g.update(a, &BigUint::from(3u32), 2).unwrap();
        assert_eq!(g.value(a).unwrap(), &BigUint::from(3u32));
        assert_eq!(g.value_at(a, 0).unwrap(), &BigUint::from(0xFu32));
        assert_eq!(g.value_at(a, 1).unwrap(), &BigUint::from(0xFu32));
        assert_eq!(g.value_at(a, 5).unwrap(), &BigUint::from(3u32));
        assert_eq!(g.get(a).history().len(), 2);

        // Same cycle replaces
        g.update(a, &BigUint::from(5u32), 2).unwrap();
        assert_eq!(g.get(a).history().len(), 2);
        assert_eq!(g.value(a).unwrap(), &BigUint::from(5u32));
    }

    #[test]
    fn test_cycle_regression() {
        let mut g = Graph::new();
        let a = g.node("a");
        g.update(a, &BigUint::from(1u32), 3).unwrap();
        let err = g.update(a, &BigUint::from(1u32), 2).unwrap_err();
        assert!(matches!(err, Error::CycleRegression { cycle: 2, last: 3, .. }));
    }

    #[test]
    fn test_binary_infers_width() {
        let mut g = Graph::new();
        let a = g.node("a");
        let op = g.binary(Opcode::And, w(8), a, a);
        assert_eq!(op.sources(), &[a, a]);
        assert_eq!(g.width(a), Some(w(8)));
        assert_eq!(g.width(op.dest()), Some(w(8)));
        assert_eq!(op.name(), "T0");
    }

    #[test]
    fn test_extend_chains_previous_output() {
        let mut g = Graph::new();
        let a = g.node("a");
        let b = g.node("b");
        let first = g.binary(Opcode::And, w(16), a, a);
        let second = g.extend(&first, b);
        assert_eq!(second.sources(), &[first.dest(), b]);
        assert_eq!(second.opcode(), Opcode::And);
        assert_eq!(second.width(), w(16));
        assert_eq!(second.name(), "T1");
    }

    #[test]
    fn test_temp_skips_taken_names() {
        let mut g = Graph::new();
        g.node("T0");
        let t = g.temp();
        assert_eq!(g.name(t), "T1");
        assert_eq!(g.find("T1"), Some(t));
    }

    #[test]
    fn test_find_keeps_first_of_repeated_name() {
        let mut g = Graph::new();
        let first = g.node("in0");
        let second = g.node_with_width("in0", w(4));
        assert_ne!(first, second);
        assert_eq!(g.find("in0"), Some(first));
        assert_eq!(g.name(second), "in0");
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_evaluate() {
        let mut g = Graph::new();
        let a = g.node("a");
        let b = g.node("b");
        let and = g.binary(Opcode::And, w(4), a, b);
        let xor = g.binary(Opcode::Xor, w(4), a, b);
        let or = g.binary(Opcode::Or, w(4), a, b);
        g.update(a, &BigUint::from(0b1100u32), 0).unwrap();
        g.update(b, &BigUint::from(0b1010u32), 0).unwrap();
        assert_eq!(g.evaluate(&and).unwrap(), BigUint::from(0b1000u32));
        assert_eq!(g.evaluate(&xor).unwrap(), BigUint::from(0b0110u32));
        assert_eq!(g.evaluate(&or).unwrap(), BigUint::from(0b1110u32));
    }
}
