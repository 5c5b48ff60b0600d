//! # Gatepath Core
//!
//! Topology and critical-path analysis for gate-level combinational netlists.
//!
//! This library provides:
//! - A reader for flat structural Verilog built from primitive gates
//! - A circuit model of gates and nets backed by a directed acyclic graph
//! - Fanout extraction, logic depths and longest-path search
//! - Text reports for the command line and the browser
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`netlist`] - Lexer and parser for the structural Verilog subset
//! - [`graph`] - Generic DAG with eager cycle rejection and topological sort
//! - [`circuit`] - Gates, nets and referential integrity between them
//! - [`analysis`] - Read-only queries over a frozen circuit graph
//! - [`report`] - Text rendering of analysis results
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! gatepath c17.v --fanout --depths
//! ```
//!
//! ### Library
//!
//! ```
//! use gatepath_core::{netlist, Analyzer, Circuit, Strategy};
//!
//! let ast = netlist::parse(
//!     "module top (a, b, out);
//!        input a, b; output out; wire w1;
//!        nand n1 (w1, a, b);
//!        not  n2 (out, w1);
//!      endmodule",
//! )?;
//! let circuit = Circuit::from_ast(ast)?;
//! let longest = Analyzer::new(&circuit).longest_path(Strategy::DynamicProgramming)?;
//! assert_eq!(longest.path, ["a", "n1", "n2"]);
//! assert_eq!(longest.logic_depth(), 2);
//! # Ok::<(), gatepath_core::GatepathError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmNetlistAnalyzer } from 'gatepath_core';
//!
//! const analyzer = new WasmNetlistAnalyzer(verilogSource);
//! console.log(analyzer.longest_path_report(false));
//! ```
//!
//! ## Path Length
//!
//! Paths run from a primary input net (or a gate without predecessors) to a
//! gate without successors. Length counts nodes; logic depth counts the edges
//! between them, i.e. the number of gates a signal crosses after leaving the
//! primary input.

pub mod analysis;
pub mod circuit;
pub mod error;
pub mod graph;
pub mod netlist;
pub mod report;

// Re-export main types for convenience
pub use analysis::{Analyzer, Strategy};
pub use circuit::Circuit;
pub use error::{GatepathError, Result};
pub use graph::Dag;
pub use report::{render_report, AnalysisOptions};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmNetlistAnalyzer;
