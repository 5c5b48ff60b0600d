//! Reader for gate-level structural Verilog.
//!
//! Only the flat, purely combinational subset is accepted: a single module
//! whose body declares scalar ports and wires and instantiates built-in
//! primitives. Everything else is rejected with an error naming the
//! offending construct and line.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = module
//! module      = "module" ident [ "(" [ port { "," port } ] ")" ] ";" { item } "endmodule"
//! port        = [ ("input" | "output") [ "wire" ] ] ident
//! item        = declaration | gate_stmt
//! declaration = ("input" | "output") [ "wire" ] names ";" | "wire" names ";"
//! names       = ident { "," ident }
//! gate_stmt   = primitive instance { "," instance } ";"
//! instance    = [ ident ] "(" ident { "," ident } ")"
//! primitive   = "not" | "nand" | "nor" | "and" | "or" | "xor" | "xnor"
//! ```
//!
//! The first terminal of an instance is its output; the rest are inputs.
//! `//` and `/* */` comments are skipped.
//!
//! # Example
//!
//! ```text
//! module top (a, b, out);
//!   input a, b;
//!   output out;
//!   wire w1;
//!   nand n1 (w1, a, b);
//!   not  n2 (out, w1);
//! endmodule
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse netlist source into an AST.
pub fn parse(input: &str) -> Result<NetlistAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a netlist file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<NetlistAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::GatepathError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
