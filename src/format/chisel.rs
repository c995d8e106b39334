//! Chisel source writer
//!
//! Emits the circuit as a Chisel module together with a `Tester` that pokes
//! the golden input vectors and expects the reference outputs, so the
//! generated file checks itself when run through `chiselMainTest`.

use std::io::Write;

use num_bigint::BigUint;

use crate::error::Result;
use crate::format::{golden_run, output_port, width_of, Format, RunOptions};
use crate::graph::{Graph, NodeId};
use crate::pattern::Pattern;

#[derive(Debug, Default, Clone, Copy)]
pub struct ChiselFormat;

impl ChiselFormat {
    fn literal(value: &BigUint) -> String {
        format!("BigInt(\"{:x}\", 16)", value)
    }

    /// Inputs are read through the io bundle, temps by name
    fn reference(graph: &Graph, inputs: &[NodeId], id: NodeId) -> String {
        if inputs.contains(&id) {
            format!("io.{}", graph.name(id))
        } else {
            graph.name(id).to_string()
        }
    }
}

impl Format for ChiselFormat {
    fn name(&self) -> &'static str {
        "chisel"
    }

    fn extension(&self) -> &'static str {
        "scala"
    }

    fn write(&self, out: &mut dyn Write, pattern: &mut dyn Pattern, opts: &RunOptions) -> Result<()> {
        let module = pattern.name().to_string();
        write_module(out, &module, pattern)?;

        let vectors = golden_run(pattern, opts)?;
        writeln!(out)?;
        writeln!(out, "class {}Tests(c: {}) extends Tester(c) {{", module, module)?;
        let circuit = pattern.circuit();
        let graph = circuit.graph();
        for vector in &vectors {
            for (&id, value) in circuit.inputs().iter().zip(&vector.inputs) {
                writeln!(out, "  poke(c.io.{}, {})", graph.name(id), Self::literal(value))?;
            }
            for (i, value) in vector.outputs.iter().enumerate() {
                writeln!(out, "  expect(c.io.{}, {})", output_port(i), Self::literal(value))?;
            }
            writeln!(out, "  step(1)")?;
        }
        writeln!(out, "}}")?;

        writeln!(out)?;
        writeln!(out, "object {} {{", module)?;
        writeln!(out, "  def main(args: Array[String]): Unit = {{")?;
        writeln!(
            out,
            "    chiselMainTest(args, () => Module(new {}())) {{ c => new {}Tests(c) }}",
            module, module
        )?;
        writeln!(out, "  }}")?;
        writeln!(out, "}}")?;
        Ok(())
    }
}

fn write_module(out: &mut dyn Write, module: &str, pattern: &dyn Pattern) -> Result<()> {
    let circuit = pattern.circuit();
    let graph = circuit.graph();
    let inputs = circuit.inputs();

    writeln!(out, "import Chisel._")?;
    writeln!(out)?;
    writeln!(out, "class {} extends Module {{", module)?;
    writeln!(out, "  val io = new Bundle {{")?;
    for &id in inputs {
        writeln!(out, "    val {} = UInt(INPUT, {})", graph.name(id), width_of(graph, id))?;
    }
    for (i, &id) in circuit.outputs().iter().enumerate() {
        writeln!(out, "    val {} = UInt(OUTPUT, {})", output_port(i), width_of(graph, id))?;
    }
    writeln!(out, "  }}")?;

    for op in circuit.compute() {
        let operands: Vec<String> = op
            .sources()
            .iter()
            .map(|&src| ChiselFormat::reference(graph, inputs, src))
            .collect();
        let sep = format!(" {} ", op.opcode().symbol());
        writeln!(out, "  val {} = {}", op.name(), operands.join(&sep))?;
    }

    for (i, &id) in circuit.outputs().iter().enumerate() {
        writeln!(
            out,
            "  io.{} := {}",
            output_port(i),
            ChiselFormat::reference(graph, inputs, id)
        )?;
    }
    writeln!(out, "}}")?;
    Ok(())
}
