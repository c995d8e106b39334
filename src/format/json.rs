//! Module IR JSON writer
//!
//! Emits the same module schema the IR simulators load (ports, nets, regs,
//! assigns, processes, memories) so a pattern can be fed straight into them.
//! Golden vectors ride along in an extra `vectors` field; readers that do not
//! know it ignore it. Vector values are hex strings because widths are
//! unbounded.

use std::collections::BTreeMap;
use std::io::Write;

use num_bigint::BigUint;
use serde::Serialize;

use crate::error::Result;
use crate::format::{golden_run, output_port, width_of, Format, RunOptions};
use crate::graph::{Graph, NodeId};
use crate::pattern::Pattern;

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// Port definition
#[derive(Debug, Clone, Serialize)]
pub struct PortDef {
    pub name: String,
    pub direction: Direction,
    pub width: usize,
}

/// Wire/net definition
#[derive(Debug, Clone, Serialize)]
pub struct NetDef {
    pub name: String,
    pub width: usize,
}

/// Expression types
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExprDef {
    Signal { name: String, width: usize },
    BinaryOp { op: String, left: Box<ExprDef>, right: Box<ExprDef>, width: usize },
}

/// Assignment (combinational)
#[derive(Debug, Clone, Serialize)]
pub struct AssignDef {
    pub target: String,
    pub expr: ExprDef,
}

/// One golden cycle, values keyed by port name
#[derive(Debug, Clone, Serialize)]
pub struct VectorDef {
    pub cycle: usize,
    pub inputs: BTreeMap<String, String>,
    pub outputs: BTreeMap<String, String>,
}

/// Complete module IR
#[derive(Debug, Clone, Serialize)]
pub struct ModuleIR {
    pub name: String,
    pub ports: Vec<PortDef>,
    pub nets: Vec<NetDef>,
    pub regs: Vec<NetDef>,
    pub assigns: Vec<AssignDef>,
    pub processes: Vec<serde_json::Value>,
    pub memories: Vec<serde_json::Value>,
    pub vectors: Vec<VectorDef>,
}

fn signal(graph: &Graph, id: NodeId) -> ExprDef {
    ExprDef::Signal {
        name: graph.name(id).to_string(),
        width: width_of(graph, id),
    }
}

fn hex(value: &BigUint) -> String {
    format!("0x{:x}", value)
}

impl ModuleIR {
    /// Static structure of a pattern, without vectors
    pub fn from_pattern(pattern: &dyn Pattern) -> Self {
        let circuit = pattern.circuit();
        let graph = circuit.graph();

        let mut ports: Vec<PortDef> = circuit
            .inputs()
            .iter()
            .map(|&id| PortDef {
                name: graph.name(id).to_string(),
                direction: Direction::In,
                width: width_of(graph, id),
            })
            .collect();
        ports.extend(circuit.outputs().iter().enumerate().map(|(i, &id)| PortDef {
            name: output_port(i),
            direction: Direction::Out,
            width: width_of(graph, id),
        }));

        let nets = circuit
            .compute()
            .iter()
            .map(|op| NetDef {
                name: op.name().to_string(),
                width: op.width().get(),
            })
            .collect();

        let mut assigns: Vec<AssignDef> = Vec::with_capacity(circuit.compute().len() + circuit.outputs().len());
        for op in circuit.compute() {
            let mut sources = op.sources().iter().map(|&id| signal(graph, id));
            let Some(first) = sources.next() else {
                continue;
            };
            let expr = sources.fold(first, |left, right| ExprDef::BinaryOp {
                op: op.opcode().symbol().to_string(),
                left: Box::new(left),
                right: Box::new(right),
                width: op.width().get(),
            });
            assigns.push(AssignDef {
                target: op.name().to_string(),
                expr,
            });
        }
        for (i, &id) in circuit.outputs().iter().enumerate() {
            assigns.push(AssignDef {
                target: output_port(i),
                expr: signal(graph, id),
            });
        }

        Self {
            name: pattern.name().to_string(),
            ports,
            nets,
            regs: Vec::new(),
            assigns,
            processes: Vec::new(),
            memories: Vec::new(),
            vectors: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, out: &mut dyn Write, pattern: &mut dyn Pattern, opts: &RunOptions) -> Result<()> {
        let mut ir = ModuleIR::from_pattern(pattern);

        let input_names: Vec<String> = {
            let graph = pattern.circuit().graph();
            pattern.inputs().iter().map(|&id| graph.name(id).to_string()).collect()
        };
        ir.vectors = golden_run(pattern, opts)?
            .into_iter()
            .map(|v| VectorDef {
                cycle: v.cycle,
                inputs: input_names.iter().cloned().zip(v.inputs.iter().map(hex)).collect(),
                outputs: v
                    .outputs
                    .iter()
                    .enumerate()
                    .map(|(i, value)| (output_port(i), hex(value)))
                    .collect(),
            })
            .collect();

        serde_json::to_writer_pretty(&mut *out, &ir)?;
        writeln!(out)?;
        Ok(())
    }
}
