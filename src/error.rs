//! Error types for pattern construction, simulation and output

/// Result type for torture pattern operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, stepping or writing patterns
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Argument string does not match the family's encoding
    #[error("Unable to parse args '{args}' for pattern {pattern} (expected {expected})")]
    InvalidArgs {
        pattern: &'static str,
        args: String,
        expected: &'static str,
    },

    /// Parameters parsed but describe an invalid circuit
    #[error("Invalid parameter for pattern {pattern}: {reason}")]
    InvalidParameter {
        pattern: &'static str,
        reason: String,
    },

    /// No factory registered under this name
    #[error("Unknown pattern: {0}")]
    UnknownPattern(String),

    /// Registry position past the end of the list
    #[error("Pattern index {index} out of range ({count} registered)")]
    PatternIndexOutOfRange { index: usize, count: usize },

    /// Signal read before any value was written
    #[error("Uninitialized signal: {0}")]
    UninitializedSignal(String),

    /// Input position past the end of the pattern's inputs
    #[error("Input index {index} out of range ({count} inputs)")]
    InputOutOfRange { index: usize, count: usize },

    /// Output position past the end of the pattern's outputs
    #[error("Output index {index} out of range ({count} outputs)")]
    OutputOutOfRange { index: usize, count: usize },

    /// Value written for a cycle earlier than one already recorded
    #[error("Signal {name} written at cycle {cycle} after cycle {last}")]
    CycleRegression {
        name: String,
        cycle: usize,
        last: usize,
    },

    /// Output format name not recognised
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
