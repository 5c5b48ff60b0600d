//! Error types for the Gatepath netlist analyzer.
//!
//! This module provides a unified error type [`GatepathError`] that covers
//! all error conditions that can occur during netlist parsing, circuit
//! construction, and analysis.

use thiserror::Error;

/// Result type alias using [`GatepathError`].
pub type Result<T> = std::result::Result<T, GatepathError>;

/// Unified error type for all Gatepath operations.
#[derive(Error, Debug)]
pub enum GatepathError {
    // ============ Netlist Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Instantiation of something that is not a supported primitive gate
    #[error("Unknown gate kind '{kind}' at line {line}")]
    UnknownGateKind { kind: String, line: usize },

    /// Syntax that is valid Verilog but outside the flat combinational subset
    #[error("Unsupported construct at line {line}: {construct}")]
    Unsupported { construct: String, line: usize },

    // ============ Circuit Construction Errors ============
    /// Gate name already declared
    #[error("Duplicate gate name '{name}'")]
    DuplicateGate { name: String },

    /// A gate and a net were given the same name
    #[error("Name '{name}' is already used by another gate or net")]
    NameCollision { name: String },

    /// Reference to an undeclared gate
    #[error("Gate '{name}' not found in circuit")]
    UnknownGate { name: String },

    /// Reference to an undeclared net
    #[error("Net '{name}' not found in circuit")]
    UnknownNet { name: String },

    /// Reference to a node absent from a graph
    #[error("Node '{node}' not found in graph")]
    UnknownNode { node: String },

    /// Edge insertion would close a feedback loop
    #[error("Edge {from} -> {to} would create a cycle; the circuit is not combinational")]
    Cycle { from: String, to: String },

    /// A second gate tried to drive an already driven net
    #[error("Net '{net}' is already driven by '{existing}'; cannot also be driven by '{driver}'")]
    MultipleDriver {
        net: String,
        existing: String,
        driver: String,
    },

    /// Structural problem found by validation
    #[error("Invalid circuit topology: {message}")]
    InvalidTopology { message: String },

    // ============ Analysis Errors ============
    /// A graph handed to the analyzer was not acyclic.
    ///
    /// Construction through [`crate::Circuit`] rejects cycles eagerly, so this
    /// only happens when a graph was assembled without those checks.
    #[error("Analysis invariant violated: graph contains a cycle through {}", .nodes.join(", "))]
    CyclicGraph { nodes: Vec<String> },

    // ============ I/O Errors ============
    /// Error reading netlist file
    #[error("Failed to read netlist file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl GatepathError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an unsupported-construct error
    pub fn unsupported(line: usize, construct: impl Into<String>) -> Self {
        Self::Unsupported {
            construct: construct.into(),
            line,
        }
    }

    /// Create a construction-time cycle error for the rejected edge
    pub fn cycle(from: impl ToString, to: impl ToString) -> Self {
        Self::Cycle {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Whether this error reports a feedback loop, at construction or analysis time.
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle { .. } | Self::CyclicGraph { .. })
    }
}
