//! Circuit model and validation.
//!
//! This module provides the in-memory representation of a netlist after
//! parsing. The [`Circuit`] struct owns every gate and net and keeps the
//! gate-level connectivity graph acyclic while it is being built.

mod model;
mod types;
mod validate;

pub use model::{Circuit, Gate, Net};
pub use types::*;
pub use validate::validate_circuit;
