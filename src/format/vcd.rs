//! VCD (Value Change Dump) writer
//!
//! Records every input and output of a golden run, one time unit per cycle.
//! Signals start as `x` and only changed values are emitted after that.

use std::io::Write;

use num_bigint::BigUint;

use crate::error::Result;
use crate::format::{golden_run, output_port, width_of, Format, RunOptions};
use crate::pattern::Pattern;

/// Signal change event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalChange {
    pub time: u64,
    pub signal_idx: usize,
    pub value: BigUint,
}

/// Buffered VCD tracer
#[derive(Debug, Clone)]
pub struct VcdTracer {
    /// Current simulation time (in time units)
    time: u64,

    /// Previous signal values for change detection
    prev_values: Vec<Option<BigUint>>,

    signal_names: Vec<String>,
    signal_widths: Vec<usize>,

    /// VCD identifier for each signal (indexed by signal index)
    vcd_ids: Vec<String>,

    changes: Vec<SignalChange>,

    timescale: String,
    module_name: String,
}

impl VcdTracer {
    pub fn new(module_name: &str, timescale: &str) -> Self {
        Self {
            time: 0,
            prev_values: Vec::new(),
            signal_names: Vec::new(),
            signal_widths: Vec::new(),
            vcd_ids: Vec::new(),
            changes: Vec::new(),
            timescale: timescale.to_string(),
            module_name: module_name.to_string(),
        }
    }

    /// Initialize the tracer with signal metadata
    pub fn init(&mut self, signal_names: Vec<String>, signal_widths: Vec<usize>) {
        let n = signal_names.len();
        self.signal_names = signal_names;
        self.signal_widths = signal_widths;
        self.prev_values = vec![None; n];
        self.vcd_ids = (0..n).map(Self::idx_to_vcd_id).collect();
    }

    /// Convert an index to a VCD identifier (printable ASCII 33-126)
    fn idx_to_vcd_id(idx: usize) -> String {
        let base = 94;
        let offset = 33u8; // '!'

        if idx < base {
            return ((offset + idx as u8) as char).to_string();
        }

        // Multi-character: bijective base-94
        let mut result = String::new();
        let mut n = idx;
        loop {
            result.insert(0, (offset + (n % base) as u8) as char);
            n /= base;
            if n == 0 {
                break;
            }
            n -= 1;
        }
        result
    }

    /// Record the values of all signals at the current time, then advance it
    pub fn capture(&mut self, values: &[BigUint]) {
        let time = self.time;
        for (idx, value) in values.iter().enumerate().take(self.prev_values.len()) {
            if self.prev_values[idx].as_ref() != Some(value) {
                self.prev_values[idx] = Some(value.clone());
                self.changes.push(SignalChange {
                    time,
                    signal_idx: idx,
                    value: value.clone(),
                });
            }
        }
        self.time += 1;
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn changes(&self) -> &[SignalChange] {
        &self.changes
    }

    /// Format a signal value for VCD output
    fn format_value(value: &BigUint, width: usize, vcd_id: &str) -> String {
        if width == 1 {
            format!("{}{}", if value.bit(0) { 1 } else { 0 }, vcd_id)
        } else {
            format!("b{:0width$b} {}", value, vcd_id, width = width)
        }
    }

    fn format_unknown(width: usize, vcd_id: &str) -> String {
        if width == 1 {
            format!("x{}", vcd_id)
        } else {
            format!("bx {}", vcd_id)
        }
    }

    /// Export buffered traces as VCD text
    pub fn to_vcd(&self) -> String {
        let mut vcd = String::new();

        vcd.push_str(&format!("$timescale {} $end\n", self.timescale));
        vcd.push_str(&format!("$scope module {} $end\n", self.module_name));
        for (idx, name) in self.signal_names.iter().enumerate() {
            let width = self.signal_widths.get(idx).copied().unwrap_or(1);
            vcd.push_str(&format!("$var wire {} {} {} $end\n", width, self.vcd_ids[idx], name));
        }
        vcd.push_str("$upscope $end\n");
        vcd.push_str("$enddefinitions $end\n");

        vcd.push_str("$dumpvars\n");
        for idx in 0..self.signal_names.len() {
            let width = self.signal_widths.get(idx).copied().unwrap_or(1);
            vcd.push_str(&Self::format_unknown(width, &self.vcd_ids[idx]));
            vcd.push('\n');
        }
        vcd.push_str("$end\n");

        // Changes are recorded in time order
        let mut last_time: Option<u64> = None;
        for change in &self.changes {
            if last_time != Some(change.time) {
                vcd.push_str(&format!("#{}\n", change.time));
                last_time = Some(change.time);
            }
            let width = self.signal_widths.get(change.signal_idx).copied().unwrap_or(1);
            vcd.push_str(&Self::format_value(&change.value, width, &self.vcd_ids[change.signal_idx]));
            vcd.push('\n');
        }
        vcd.push_str(&format!("#{}\n", self.time));

        vcd
    }
}

/// Writes a golden run as VCD
#[derive(Debug, Clone)]
pub struct VcdFormat {
    pub timescale: String,
}

impl Default for VcdFormat {
    fn default() -> Self {
        Self {
            timescale: "1ns".to_string(),
        }
    }
}

impl Format for VcdFormat {
    fn name(&self) -> &'static str {
        "vcd"
    }

    fn extension(&self) -> &'static str {
        "vcd"
    }

    fn write(&self, out: &mut dyn Write, pattern: &mut dyn Pattern, opts: &RunOptions) -> Result<()> {
        let mut tracer = VcdTracer::new(pattern.name(), &self.timescale);
        {
            let circuit = pattern.circuit();
            let graph = circuit.graph();
            let mut names = Vec::new();
            let mut widths = Vec::new();
            for &id in circuit.inputs() {
                names.push(graph.name(id).to_string());
                widths.push(width_of(graph, id));
            }
            for (i, &id) in circuit.outputs().iter().enumerate() {
                names.push(output_port(i));
                widths.push(width_of(graph, id));
            }
            tracer.init(names, widths);
        }

        for vector in golden_run(pattern, opts)? {
            let mut values = vector.inputs;
            values.extend(vector.outputs);
            tracer.capture(&values);
        }

        out.write_all(tracer.to_vcd().as_bytes())?;
        Ok(())
    }
}
