//! Flo netlist writer
//!
//! One statement per line, `<dest> = <op>'<width> <args...>`: input
//! declarations first, then the operations in construction order, then one
//! `out` per output.

use std::io::Write;

use crate::error::Result;
use crate::format::{output_port, width_of, Format, RunOptions};
use crate::pattern::Pattern;

#[derive(Debug, Default, Clone, Copy)]
pub struct FloFormat;

impl Format for FloFormat {
    fn name(&self) -> &'static str {
        "flo"
    }

    fn extension(&self) -> &'static str {
        "flo"
    }

    fn write(&self, out: &mut dyn Write, pattern: &mut dyn Pattern, _opts: &RunOptions) -> Result<()> {
        let circuit = pattern.circuit();
        let graph = circuit.graph();

        for &id in circuit.inputs() {
            writeln!(out, "{} = in'{}", graph.name(id), width_of(graph, id))?;
        }

        for op in circuit.compute() {
            write!(out, "{} = {}'{}", op.name(), op.opcode().mnemonic(), op.width())?;
            for &src in op.sources() {
                write!(out, " {}", graph.name(src))?;
            }
            writeln!(out)?;
        }

        for (i, &id) in circuit.outputs().iter().enumerate() {
            writeln!(out, "{} = out'{} {}", output_port(i), width_of(graph, id), graph.name(id))?;
        }

        Ok(())
    }
}
