//! WASM bindings for Gatepath Core.
//!
//! This module provides JavaScript-friendly bindings for analyzing netlists
//! in a browser, e.g. behind a paste-your-Verilog text area.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmNetlistAnalyzer } from 'gatepath_core';
//!
//! await init();
//!
//! const source = `
//!   module top (a, b, out);
//!     input a, b;
//!     output out;
//!     wire w1;
//!     nand n1 (w1, a, b);
//!     not  n2 (out, w1);
//!   endmodule
//! `;
//!
//! const analyzer = new WasmNetlistAnalyzer(source);
//! console.log(analyzer.longest_path_report(false));
//! console.log(analyzer.fanout_report());
//! ```

use wasm_bindgen::prelude::*;

use crate::analysis::{Analyzer, Strategy};
use crate::circuit::{validate_circuit, Circuit};
use crate::error::GatepathError;
use crate::netlist;
use crate::report::{self, AnalysisOptions, CircuitStats};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: GatepathError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible netlist analyzer.
///
/// Owns the built circuit; every report method freezes a fresh analysis view,
/// so calls are independent and repeatable.
#[wasm_bindgen]
pub struct WasmNetlistAnalyzer {
    circuit: Circuit,
}

#[wasm_bindgen]
impl WasmNetlistAnalyzer {
    /// Parse, build and validate a structural Verilog netlist.
    ///
    /// # Example
    /// ```javascript
    /// const analyzer = new WasmNetlistAnalyzer(source);
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(source: &str) -> Result<WasmNetlistAnalyzer, JsValue> {
        let ast = netlist::parse(source).map_err(to_js)?;
        let circuit = Circuit::from_ast(ast).map_err(to_js)?;
        validate_circuit(&circuit).map_err(to_js)?;
        Ok(WasmNetlistAnalyzer { circuit })
    }

    /// Number of gates in the circuit.
    #[wasm_bindgen(getter)]
    pub fn gate_count(&self) -> usize {
        self.circuit.gate_count()
    }

    /// Logic depth of the critical path.
    #[wasm_bindgen]
    pub fn logic_depth(&self) -> Result<usize, JsValue> {
        let longest = Analyzer::new(&self.circuit)
            .longest_path(Strategy::DynamicProgramming)
            .map_err(to_js)?;
        Ok(longest.logic_depth())
    }

    /// Critical path report.
    ///
    /// # Arguments
    /// * `exhaustive` - Enumerate all paths instead of the linear-time search
    #[wasm_bindgen]
    pub fn longest_path_report(&self, exhaustive: bool) -> Result<String, JsValue> {
        let strategy = if exhaustive {
            Strategy::Exhaustive
        } else {
            Strategy::DynamicProgramming
        };
        let options = AnalysisOptions {
            strategy,
            ..AnalysisOptions::default()
        };
        report::render_report(&self.circuit, &options).map_err(to_js)
    }

    /// Fanout table.
    #[wasm_bindgen]
    pub fn fanout_report(&self) -> String {
        report::format_fanout(&Analyzer::new(&self.circuit).fanout())
    }

    /// Logic depth table.
    #[wasm_bindgen]
    pub fn depth_report(&self) -> Result<String, JsValue> {
        let depths = Analyzer::new(&self.circuit).logic_depths().map_err(to_js)?;
        Ok(report::format_depths(&depths))
    }

    /// Circuit statistics.
    #[wasm_bindgen]
    pub fn stats_report(&self) -> String {
        let fanout = Analyzer::new(&self.circuit).fanout();
        CircuitStats::collect(&self.circuit, &fanout).to_string()
    }

    /// Statistics, critical path, fanout and depths.
    ///
    /// Only one critical path is reported; maximal paths are not enumerated.
    #[wasm_bindgen]
    pub fn full_report(&self) -> Result<String, JsValue> {
        report::render_report(&self.circuit, &AnalysisOptions::full()).map_err(to_js)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
