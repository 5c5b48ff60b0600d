//! Lexer (tokenizer) for structural Verilog.

use crate::error::{GatepathError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the netlist subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier or keyword (escaped identifiers lose their backslash)
    Identifier,
    /// A number or sized constant such as `1'b0`
    Number,
    /// Open parenthesis '('
    OpenParen,
    /// Close parenthesis ')'
    CloseParen,
    /// Open bracket '['
    OpenBracket,
    /// Close bracket ']'
    CloseBracket,
    /// Comma ','
    Comma,
    /// Semicolon ';'
    Semicolon,
    /// Colon ':'
    Colon,
    /// Dot '.' (named port connection)
    Dot,
    /// Hash '#' (delay or parameter override)
    Hash,
    /// Equals sign '='
    Equals,
    /// End of file
    Eof,
}

/// Lexer for tokenizing netlist source.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments()?;

        let start_line = self.line;
        let start_column = self.column;

        let Some(&ch) = self.chars.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                line: start_line,
                column: start_column,
            });
        };

        let punct = match ch {
            '(' => Some(TokenKind::OpenParen),
            ')' => Some(TokenKind::CloseParen),
            '[' => Some(TokenKind::OpenBracket),
            ']' => Some(TokenKind::CloseBracket),
            ',' => Some(TokenKind::Comma),
            ';' => Some(TokenKind::Semicolon),
            ':' => Some(TokenKind::Colon),
            '.' => Some(TokenKind::Dot),
            '#' => Some(TokenKind::Hash),
            '=' => Some(TokenKind::Equals),
            _ => None,
        };

        let (kind, text) = if let Some(kind) = punct {
            self.advance();
            (kind, ch.to_string())
        } else if ch.is_ascii_digit() || ch == '\'' {
            (TokenKind::Number, self.read_while(|c| c.is_ascii_alphanumeric() || c == '\'' || c == '_'))
        } else if ch.is_alphabetic() || ch == '_' {
            (TokenKind::Identifier, self.read_while(|c| c.is_alphanumeric() || c == '_' || c == '$'))
        } else if ch == '\\' {
            self.advance();
            let text = self.read_while(|c| !c.is_whitespace());
            if text.is_empty() {
                return Err(GatepathError::lexer(start_line, start_column, "empty escaped identifier"));
            }
            (TokenKind::Identifier, text)
        } else {
            return Err(GatepathError::lexer(
                start_line,
                start_column,
                format!("unexpected character '{}'", ch),
            ));
        };

        Ok(Token {
            kind,
            text,
            line: start_line,
            column: start_column,
        })
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn read_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if !keep(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
                continue;
            }
            if ch != '/' {
                break;
            }
            let mut ahead = self.chars.clone();
            ahead.next();
            match ahead.next() {
                Some('/') => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('*') => self.skip_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let (line, column) = (self.line, self.column);
        self.advance();
        self.advance();
        let mut prev = '\0';
        while let Some(c) = self.advance() {
            if prev == '*' && c == '/' {
                return Ok(());
            }
            prev = c;
        }
        Err(GatepathError::lexer(line, column, "unterminated block comment"))
    }
}
