//! Parser for structural Verilog netlists.

use std::collections::HashSet;

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::circuit::GateKind;
use crate::error::{GatepathError, Result};

/// Port direction in a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Input,
    Output,
}

/// Parser for the flat, single-module netlist subset.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    header_line: usize,
    /// Indices of instances written without a name
    unnamed: Vec<usize>,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            header_line: 1,
            unnamed: Vec::new(),
        })
    }

    /// Parse one module.
    pub fn parse(&mut self) -> Result<NetlistAst> {
        let mut ast = NetlistAst::new();

        self.header_line = self.current.line;
        self.expect_keyword("module")?;
        ast.module_name = self.expect(TokenKind::Identifier)?.text;
        if self.current.kind == TokenKind::OpenParen {
            self.parse_port_list(&mut ast)?;
        }
        self.expect(TokenKind::Semicolon)?;

        loop {
            let line = self.current.line;
            match self.current.kind {
                TokenKind::Eof => {
                    return Err(GatepathError::parse(line, "missing 'endmodule'"));
                }
                TokenKind::Identifier => {}
                _ => {
                    return Err(GatepathError::parse(
                        line,
                        format!("unexpected token '{}'", self.current.text),
                    ));
                }
            }

            let word = self.current.text.clone();
            match word.as_str() {
                "endmodule" => {
                    self.advance()?;
                    break;
                }
                "input" => self.parse_declaration(&mut ast, Some(Direction::Input))?,
                "output" => self.parse_declaration(&mut ast, Some(Direction::Output))?,
                "wire" => self.parse_declaration(&mut ast, None)?,
                "reg" | "always" | "initial" => {
                    return Err(GatepathError::unsupported(line, format!("'{}' (sequential logic)", word)));
                }
                "assign" => {
                    return Err(GatepathError::unsupported(line, "continuous assignment"));
                }
                "parameter" | "localparam" | "module" => {
                    return Err(GatepathError::unsupported(line, format!("'{}'", word)));
                }
                _ => match primitive(&word) {
                    Some(kind) => self.parse_gate_statement(&mut ast, kind)?,
                    None => {
                        return Err(GatepathError::UnknownGateKind {
                            kind: self.current.text.clone(),
                            line,
                        });
                    }
                },
            }
        }

        match self.current.kind {
            TokenKind::Eof => {}
            TokenKind::Identifier if self.current.text == "module" => {
                return Err(GatepathError::unsupported(
                    self.current.line,
                    "multiple modules (hierarchical designs)",
                ));
            }
            _ => {
                return Err(GatepathError::parse(
                    self.current.line,
                    format!("unexpected token '{}' after 'endmodule'", self.current.text),
                ));
            }
        }

        self.check_ports(&mut ast)?;
        self.name_unnamed(&mut ast);
        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(GatepathError::parse(
                self.current.line,
                format!("expected {:?}, got {:?} '{}'", kind, self.current.kind, self.current.text),
            ))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.current.kind == TokenKind::Identifier && self.current.text == keyword {
            self.advance()
        } else {
            Err(GatepathError::parse(
                self.current.line,
                format!("expected '{}', got '{}'", keyword, self.current.text),
            ))
        }
    }

    fn reject_range(&self) -> Result<()> {
        if self.current.kind == TokenKind::OpenBracket {
            return Err(GatepathError::unsupported(self.current.line, "bit-vector range"));
        }
        Ok(())
    }

    /// `( [dir] name {, [dir] name} )`, either plain names or ANSI declarations.
    fn parse_port_list(&mut self, ast: &mut NetlistAst) -> Result<()> {
        self.expect(TokenKind::OpenParen)?;
        if self.current.kind == TokenKind::CloseParen {
            return self.advance();
        }

        let mut direction = None;
        loop {
            let word = self.current.text.clone();
            match word.as_str() {
                "input" => {
                    direction = Some(Direction::Input);
                    self.advance()?;
                }
                "output" => {
                    direction = Some(Direction::Output);
                    self.advance()?;
                }
                "reg" => {
                    return Err(GatepathError::unsupported(self.current.line, "'reg' (sequential logic)"));
                }
                _ => {}
            }
            if direction.is_some() && self.current.text == "wire" {
                self.advance()?;
            }
            self.reject_range()?;

            let tok = self.expect(TokenKind::Identifier)?;
            if let Some(dir) = direction {
                declare(ast, dir, tok.text.clone(), tok.line)?;
            }
            if !ast.ports.contains(&tok.text) {
                ast.ports.push(tok.text);
            }

            if self.current.kind == TokenKind::Comma {
                self.advance()?;
            } else {
                self.expect(TokenKind::CloseParen)?;
                return Ok(());
            }
        }
    }

    /// `input|output|wire [wire] name {, name} ;`
    fn parse_declaration(&mut self, ast: &mut NetlistAst, direction: Option<Direction>) -> Result<()> {
        self.advance()?;
        if direction.is_some() && self.current.text == "wire" {
            self.advance()?;
        }
        self.reject_range()?;

        loop {
            let tok = self.expect(TokenKind::Identifier)?;
            match direction {
                Some(dir) => declare(ast, dir, tok.text, tok.line)?,
                None => {
                    if !ast.wires.contains(&tok.text) {
                        ast.wires.push(tok.text);
                    }
                }
            }

            match self.current.kind {
                TokenKind::Comma => self.advance()?,
                TokenKind::Semicolon => return self.advance(),
                TokenKind::Equals => {
                    return Err(GatepathError::unsupported(self.current.line, "net declaration assignment"));
                }
                TokenKind::OpenBracket => {
                    return Err(GatepathError::unsupported(self.current.line, "memory or array declaration"));
                }
                _ => {
                    return Err(GatepathError::parse(
                        self.current.line,
                        format!("expected ',' or ';', got '{}'", self.current.text),
                    ));
                }
            }
        }
    }

    /// `kind [name] (out, in, ...) {, [name] (out, in, ...)} ;`
    fn parse_gate_statement(&mut self, ast: &mut NetlistAst, kind: GateKind) -> Result<()> {
        self.advance()?;
        if self.current.kind == TokenKind::Hash {
            return Err(GatepathError::unsupported(self.current.line, "gate delay"));
        }

        loop {
            let line = self.current.line;
            // Unnamed instances stay empty until every declared name is known.
            let name = if self.current.kind == TokenKind::Identifier {
                let name = self.current.text.clone();
                self.advance()?;
                if self.current.kind == TokenKind::OpenBracket {
                    return Err(GatepathError::unsupported(line, "instance array"));
                }
                name
            } else {
                self.unnamed.push(ast.instances.len());
                String::new()
            };

            self.expect(TokenKind::OpenParen)?;
            let mut terminals = vec![self.parse_terminal()?];
            while self.current.kind == TokenKind::Comma {
                self.advance()?;
                terminals.push(self.parse_terminal()?);
            }
            self.expect(TokenKind::CloseParen)?;

            let inputs = terminals.split_off(1);
            let shown = if name.is_empty() {
                format!("unnamed {}", kind.keyword())
            } else {
                name.clone()
            };
            check_pin_count(kind, &shown, inputs.len(), line)?;
            ast.instances.push(GateInstance {
                kind,
                name,
                output: terminals.remove(0),
                inputs,
                line,
            });

            if self.current.kind == TokenKind::Comma {
                self.advance()?;
            } else {
                self.expect(TokenKind::Semicolon)?;
                return Ok(());
            }
        }
    }

    fn parse_terminal(&mut self) -> Result<String> {
        let line = self.current.line;
        match self.current.kind {
            TokenKind::Identifier => {
                let name = self.current.text.clone();
                self.advance()?;
                if self.current.kind == TokenKind::OpenBracket {
                    return Err(GatepathError::unsupported(line, "bit-select on gate terminal"));
                }
                Ok(name)
            }
            TokenKind::Number => Err(GatepathError::unsupported(
                line,
                format!("constant terminal '{}'", self.current.text),
            )),
            TokenKind::Dot => Err(GatepathError::unsupported(line, "named port connection")),
            _ => Err(GatepathError::parse(
                line,
                format!("expected net name, got '{}'", self.current.text),
            )),
        }
    }

    /// Name unnamed instances `<kind>_<n>`, skipping every name the module
    /// already uses for an instance, port, wire or terminal net.
    fn name_unnamed(&mut self, ast: &mut NetlistAst) {
        let unnamed = std::mem::take(&mut self.unnamed);
        if unnamed.is_empty() {
            return;
        }

        let mut taken: HashSet<String> = ast
            .ports
            .iter()
            .chain(&ast.inputs)
            .chain(&ast.outputs)
            .chain(&ast.wires)
            .cloned()
            .collect();
        for inst in &ast.instances {
            if !inst.name.is_empty() {
                taken.insert(inst.name.clone());
            }
            taken.insert(inst.output.clone());
            taken.extend(inst.inputs.iter().cloned());
        }

        let mut counter = 0;
        for idx in unnamed {
            let inst = &mut ast.instances[idx];
            let name = loop {
                counter += 1;
                let candidate = format!("{}_{}", inst.kind.keyword(), counter);
                if !taken.contains(&candidate) {
                    break candidate;
                }
            };
            taken.insert(name.clone());
            inst.name = name;
        }
    }

    fn check_ports(&self, ast: &mut NetlistAst) -> Result<()> {
        for port in &ast.ports {
            if !ast.inputs.contains(port) && !ast.outputs.contains(port) {
                return Err(GatepathError::parse(
                    self.header_line,
                    format!("port '{}' has no input or output declaration", port),
                ));
            }
        }
        let NetlistAst {
            inputs,
            outputs,
            wires,
            ..
        } = ast;
        wires.retain(|w| !inputs.contains(w) && !outputs.contains(w));
        Ok(())
    }
}

/// Primitive keywords are case-sensitive in Verilog.
fn primitive(word: &str) -> Option<GateKind> {
    GateKind::ALL.into_iter().find(|kind| kind.keyword() == word)
}

fn declare(ast: &mut NetlistAst, direction: Direction, name: String, line: usize) -> Result<()> {
    let (list, other) = match direction {
        Direction::Input => (&mut ast.inputs, &ast.outputs),
        Direction::Output => (&mut ast.outputs, &ast.inputs),
    };
    if other.contains(&name) {
        return Err(GatepathError::parse(
            line,
            format!("'{}' declared as both input and output", name),
        ));
    }
    if !list.contains(&name) {
        list.push(name);
    }
    Ok(())
}

fn check_pin_count(kind: GateKind, name: &str, inputs: usize, line: usize) -> Result<()> {
    let too_few = inputs < kind.min_inputs();
    let too_many = kind.max_inputs().is_some_and(|max| inputs > max);
    if too_few || too_many {
        let expected = match kind.max_inputs() {
            Some(max) if max == kind.min_inputs() => format!("{}", max),
            _ => format!("at least {}", kind.min_inputs()),
        };
        return Err(GatepathError::parse(
            line,
            format!("gate '{}' ({}) expects {} input(s), got {}", name, kind, expected, inputs),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::parse;

    const NAND_NOT: &str = "
// two-gate example
module top (a, b, out);
  input a, b;
  output out;
  wire w1;

  nand n1 (w1, a, b);
  not n2 (out, w1);
endmodule
";

    #[test]
    fn test_parse_simple_module() {
        let ast = parse(NAND_NOT).unwrap();
        assert_eq!(ast.module_name, "top");
        assert_eq!(ast.ports, vec!["a", "b", "out"]);
        assert_eq!(ast.inputs, vec!["a", "b"]);
        assert_eq!(ast.outputs, vec!["out"]);
        assert_eq!(ast.wires, vec!["w1"]);
        assert_eq!(ast.instances.len(), 2);
        let n1 = &ast.instances[0];
        assert_eq!(n1.kind, GateKind::Nand);
        assert_eq!(n1.name, "n1");
        assert_eq!(n1.output, "w1");
        assert_eq!(n1.inputs, vec!["a", "b"]);
        assert_eq!(n1.line, 8);
    }

    #[test]
    fn test_parse_ansi_ports_and_unnamed_instances() {
        let src = "module m(input wire a, b, output y, z);\n  nand (y, a, b), (z, a, y);\nendmodule";
        let ast = parse(src).unwrap();
        assert_eq!(ast.inputs, vec!["a", "b"]);
        assert_eq!(ast.outputs, vec!["y", "z"]);
        let names: Vec<&str> = ast.instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["nand_1", "nand_2"]);
    }

    #[test]
    fn test_generated_names_skip_declared_names() {
        let src = "module m(a, b, y, z);
  input a, b;
  output y, z;
  wire not_1;
  nand (y, a, b);
  nand nand_1 (z, a, y);
  not (not_1, a), (b_unused, not_1);
endmodule";
        let ast = parse(src).unwrap();
        let names: Vec<&str> = ast.instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["nand_2", "nand_1", "not_3", "not_4"]);

        let circuit = crate::circuit::Circuit::from_ast(ast).unwrap();
        assert_eq!(circuit.gate_count(), 4);
        assert!(circuit.gate("nand_2").is_some());
        assert!(circuit.net("not_1").is_some());
    }

    #[test]
    fn test_wire_redeclaring_port_is_dropped() {
        let src = "module m(a, y); input a; output y; wire y; not g (y, a); endmodule";
        let ast = parse(src).unwrap();
        assert!(ast.wires.is_empty());
    }

    #[test]
    fn test_bus_rejected() {
        let src = "module m(a, y); input [3:0] a; output y; endmodule";
        assert!(matches!(
            parse(src),
            Err(GatepathError::Unsupported { line: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_primitive_and_module_instance() {
        let src = "module m(a, y);\ninput a; output y;\nbuf b1 (y, a);\nendmodule";
        assert!(matches!(
            parse(src),
            Err(GatepathError::UnknownGateKind { ref kind, line: 3 }) if kind == "buf"
        ));
        let src = "module m(a, y);\ninput a; output y;\nsub u1 (y, a);\nendmodule";
        assert!(matches!(
            parse(src),
            Err(GatepathError::UnknownGateKind { ref kind, .. }) if kind == "sub"
        ));
    }

    #[test]
    fn test_sequential_and_hierarchy_rejected() {
        let src = "module m(a, y); input a; output y; reg q; endmodule";
        assert!(matches!(parse(src), Err(GatepathError::Unsupported { .. })));
        let src = "module m(a, y); input a; output y; not g(y, a); endmodule\nmodule n; endmodule";
        assert!(matches!(
            parse(src),
            Err(GatepathError::Unsupported { line: 2, .. })
        ));
    }

    #[test]
    fn test_pin_count_checked() {
        let src = "module m(a, b, y); input a, b; output y; not g (y, a, b); endmodule";
        let err = parse(src).unwrap_err();
        assert!(err.to_string().contains("gate 'g' (NOT) expects 1 input(s), got 2"));
        let src = "module m(a, y); input a; output y; and g (y, a); endmodule";
        let err = parse(src).unwrap_err();
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn test_missing_endmodule() {
        let src = "module m(a); input a;";
        assert!(matches!(parse(src), Err(GatepathError::ParseError { .. })));
    }

    #[test]
    fn test_input_and_output_conflict() {
        let src = "module m(a); input a; output a; endmodule";
        let err = parse(src).unwrap_err();
        assert!(err.to_string().contains("both input and output"));
    }

    #[test]
    fn test_constant_terminal_rejected() {
        let src = "module m(a, y); input a; output y; nand g (y, a, 1'b1); endmodule";
        assert!(matches!(parse(src), Err(GatepathError::Unsupported { .. })));
    }
}
