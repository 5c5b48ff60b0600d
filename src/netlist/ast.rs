//! Abstract Syntax Tree types for structural netlists.

use crate::circuit::GateKind;

/// A parsed flat module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetlistAst {
    /// Module name
    pub module_name: String,
    /// Port names in header order
    pub ports: Vec<String>,
    /// Nets declared `input`
    pub inputs: Vec<String>,
    /// Nets declared `output`
    pub outputs: Vec<String>,
    /// Nets declared `wire` (excluding ports)
    pub wires: Vec<String>,
    /// Gate instantiations in source order
    pub instances: Vec<GateInstance>,
}

impl NetlistAst {
    /// Create a new empty netlist AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// One primitive gate instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateInstance {
    /// Primitive kind
    pub kind: GateKind,
    /// Instance name (synthesized for unnamed instances)
    pub name: String,
    /// Output net (first terminal)
    pub output: String,
    /// Input nets in terminal order
    pub inputs: Vec<String>,
    /// Source line number for error reporting
    pub line: usize,
}
