//! One-sided AND tree
//!
//! A right-leaning chain of AND gates: every new input gates the accumulated
//! result of the previous stage. With `depth` extra stages the circuit has
//! `depth + 1` inputs, `depth + 1` operations and one output.
//!
//! ```text
//! in0 ─┬─ & ─ T0 ─ & ─ T1 ─ ... ─ & ─ T{depth} ─ out
//! in0 ─┘          │              │
//!                in1         in{depth}
//! ```

use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::bits;
use crate::error::{Error, Result};
use crate::factory::PatternFactory;
use crate::graph::{Graph, Opcode};
use crate::pattern::{Circuit, Pattern};
use crate::registry::PatternRegistry;

pub const NAME: &str = "one_sided_and_tree";

pub const DEFAULT_WIDTH: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(width) => width,
    None => panic!("default width must be positive"),
};
pub const DEFAULT_DEPTH: usize = 128;

/// Widest accepted gate, in bits
pub const MAX_WIDTH: usize = 1 << 16;
/// Longest accepted chain, in stages after the first gate
pub const MAX_DEPTH: usize = 1 << 20;

const ARGS_SHAPE: &str = "<width>-<depth>";

const EXAMPLES: &[&str] = &["64-4", "64-8", "32-128", "64-128"];

#[derive(Debug, Clone)]
pub struct OneSidedAndTree {
    circuit: Circuit,
    width: NonZeroUsize,
    depth: usize,
}

impl OneSidedAndTree {
    /// Fails with `InvalidParameter` unless `1 <= width <= MAX_WIDTH` and
    /// `depth <= MAX_DEPTH`.
    pub fn new(width: usize, depth: usize) -> Result<Self> {
        let width = NonZeroUsize::new(width).ok_or_else(|| Error::InvalidParameter {
            pattern: NAME,
            reason: "width must be positive".to_string(),
        })?;
        if width.get() > MAX_WIDTH {
            return Err(Error::InvalidParameter {
                pattern: NAME,
                reason: format!("width {} exceeds {}", width, MAX_WIDTH),
            });
        }
        if depth > MAX_DEPTH {
            return Err(Error::InvalidParameter {
                pattern: NAME,
                reason: format!("depth {} exceeds {}", depth, MAX_DEPTH),
            });
        }
        Ok(Self::build(width, depth))
    }

    /// The `32-128` configuration
    pub fn with_defaults() -> Self {
        Self::build(DEFAULT_WIDTH, DEFAULT_DEPTH)
    }

    fn build(width: NonZeroUsize, depth: usize) -> Self {
        let mut graph = Graph::new();
        let mut inputs = Vec::with_capacity(depth + 1);
        let mut compute = Vec::with_capacity(depth + 1);

        let in0 = graph.node("in0");
        let mut op = graph.binary(Opcode::And, width, in0, in0);
        inputs.push(in0);
        compute.push(op.clone());

        for i in 1..=depth {
            let node = graph.node(format!("in{}", i));
            op = graph.extend(&op, node);
            compute.push(op.clone());
            inputs.push(node);
        }

        let outputs = vec![op.dest()];
        debug!(width = width.get(), depth, nodes = graph.len(), "built {}", NAME);

        Self {
            circuit: Circuit::new(graph, inputs, compute, outputs),
            width,
            depth,
        }
    }

    /// Parse `"<width>-<depth>"`, both unsigned decimal
    pub fn parse_args(args: &str) -> Result<(usize, usize)> {
        let invalid = || Error::InvalidArgs {
            pattern: NAME,
            args: args.to_string(),
            expected: ARGS_SHAPE,
        };
        let field = |text: &str| {
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            text.parse::<usize>().map_err(|_| invalid())
        };
        let (width, depth) = args.trim().split_once('-').ok_or_else(invalid)?;
        Ok((field(width)?, field(depth)?))
    }

    pub fn width(&self) -> NonZeroUsize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Pattern for OneSidedAndTree {
    fn name(&self) -> &str {
        NAME
    }

    fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    fn step(&mut self) -> Result<()> {
        // The chain shape does not matter numerically: the output is the AND
        // of every input.
        let mut value = bits::mask(self.width);
        for input in self.circuit.input_values()? {
            value &= input;
        }

        self.circuit.record_output(0, &value)?;
        trace!(cycle = self.circuit.cycle(), value = %value, "{} step", NAME);
        self.circuit.advance();
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OneSidedAndTreeFactory;

impl PatternFactory for OneSidedAndTreeFactory {
    fn name(&self) -> &'static str {
        NAME
    }

    fn create(&self) -> Box<dyn Pattern> {
        Box::new(OneSidedAndTree::with_defaults())
    }

    fn create_with(&self, args: &str) -> Result<Box<dyn Pattern>> {
        let (width, depth) = OneSidedAndTree::parse_args(args)?;
        Ok(Box::new(OneSidedAndTree::new(width, depth)?))
    }

    fn examples(&self) -> &'static [&'static str] {
        EXAMPLES
    }
}

pub fn register(registry: &mut PatternRegistry) {
    registry.link(Arc::new(OneSidedAndTreeFactory));
}
