//! Torture patterns - synthetic circuits for stress-testing HDL toolchains
//!
//! Each pattern is a deliberately oversized dataflow graph of bitvector
//! operations together with a cycle-by-cycle reference simulation that
//! produces the expected output values.
//!
//! The crate is organized as:
//! - graph.rs: node arena, operations and opcodes
//! - pattern.rs: the `Pattern` capability and the `Circuit` it wraps
//! - patterns/: built-in pattern families
//! - factory.rs / registry.rs: named constructors and their ordered registry
//! - stimulus.rs: seeded input values for golden runs
//! - format/: Flo, Chisel, VCD and module IR JSON writers
//! - driver.rs: factory selection and output generation

pub mod bits;
pub mod driver;
pub mod error;
pub mod factory;
pub mod format;
pub mod graph;
pub mod logging;
pub mod pattern;
pub mod patterns;
pub mod registry;
pub mod stimulus;

pub use driver::{generate, generate_examples, instantiate, DriverConfig, Selection};
pub use error::{Error, Result};
pub use factory::PatternFactory;
pub use format::{golden_run, CycleVector, Format, FormatKind, RunOptions};
pub use graph::{Graph, Node, NodeId, Opcode, Operation};
pub use pattern::{Circuit, Pattern};
pub use registry::PatternRegistry;
pub use stimulus::Stimulus;
