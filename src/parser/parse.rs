//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: Parsing function definitions and prototypes
//! - `statements`: Parsing blocks, `var` declarations, shapes and `return`
//! - `expressions`: Parsing expressions with precedence climbing
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! The parser pulls tokens one at a time from a [`Scanner`]. The first
//! mismatch aborts the whole parse: there is no recovery and no partial
//! [`Module`].

use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Scanner, Token};
use thiserror::Error;

/// Parser error type
///
/// Raised when the parser expected one construct and found another.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "parse error ({}, {}): expected '{expected}' {context} but has token {}{}",
    .location.line,
    .location.column,
    .token.code(),
    printable_suffix(.token)
)]
pub struct SyntaxError {
    /// What the parser was looking for
    pub expected: String,
    /// The production being parsed, e.g. "in prototype"
    pub context: String,
    /// Where the offending token starts
    pub location: Location,
    /// The offending token
    pub token: Token,
}

fn printable_suffix(token: &Token) -> String {
    token
        .printable()
        .map(|c| format!(" '{}'", c))
        .unwrap_or_default()
}

/// Maximum number of open parentheses, literal brackets and argument lists
/// before the parser bails out.
///
/// Each level costs several stack frames, so unbounded input like
/// `[[[[...]]]]` would otherwise overflow the stack.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Recursive descent parser for Toy
pub struct Parser<S: Scanner> {
    pub(crate) scanner: S,
    /// Currently open nesting levels
    depth: usize,
}

impl<S: Scanner> Parser<S> {
    pub fn new(scanner: S) -> Self {
        Self { scanner, depth: 0 }
    }

    /// Give back the scanner, e.g. to inspect where parsing stopped
    pub fn into_scanner(self) -> S {
        self.scanner
    }

    /// Parse the entire module (a sequence of function definitions)
    pub fn parse_module(&mut self) -> Result<Module, SyntaxError> {
        // Prime the scanner
        self.advance();

        let mut functions = Vec::new();
        while self.current() != Token::Eof {
            functions.push(self.parse_definition()?);
        }

        Ok(Module::new(functions))
    }

    // ===== Helper methods =====

    pub(crate) fn current(&self) -> Token {
        self.scanner.current()
    }

    pub(crate) fn advance(&mut self) -> Token {
        self.scanner.advance()
    }

    pub(crate) fn location(&self) -> Location {
        self.scanner.location()
    }

    /// Whether the current token is the punctuation character `c`
    pub(crate) fn check(&self, c: char) -> bool {
        self.current() == Token::Char(c)
    }

    pub(crate) fn skip_semicolons(&mut self) {
        while self.check(';') {
            self.advance();
        }
    }

    /// Consume `token`, returning its location
    pub(crate) fn consume(
        &mut self,
        token: Token,
        expected: &str,
        context: &str,
    ) -> Result<Location, SyntaxError> {
        if self.current() != token {
            return self.error(expected, context);
        }
        let loc = self.location();
        self.advance();
        Ok(loc)
    }

    pub(crate) fn expect_char(&mut self, c: char, context: &str) -> Result<Location, SyntaxError> {
        self.consume(Token::Char(c), &c.to_string(), context)
    }

    /// Consume an identifier, returning its name and location
    pub(crate) fn expect_identifier(
        &mut self,
        expected: &str,
        context: &str,
    ) -> Result<(String, Location), SyntaxError> {
        if self.current() != Token::Identifier {
            return self.error(expected, context);
        }
        let loc = self.location();
        let name = self.scanner.take_literal();
        self.advance();
        Ok((name, loc))
    }

    /// Run `parse` one nesting level deeper, failing once more than
    /// [`MAX_NESTING_DEPTH`] levels are open.
    pub(crate) fn nested<T>(
        &mut self,
        context: &str,
        parse: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return self.error("shallower nesting", context);
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Build the error for the current token
    pub(crate) fn error<T>(
        &self,
        expected: &str,
        context: impl Into<String>,
    ) -> Result<T, SyntaxError> {
        Err(SyntaxError {
            expected: expected.to_string(),
            context: context.into(),
            location: self.location(),
            token: self.current(),
        })
    }
}

/// Parse an in-memory source string into a [`Module`]
pub fn parse_source(source: &str) -> Result<Module, SyntaxError> {
    Parser::new(Lexer::new(source)).parse_module()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexeme;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Replays a fixed list of lexemes, one per column of line 1.
    struct FakeScanner {
        lexemes: VecDeque<Lexeme>,
        current: Lexeme,
        column: usize,
        file: Rc<str>,
    }

    impl FakeScanner {
        fn new(lexemes: Vec<Lexeme>) -> Self {
            Self {
                lexemes: lexemes.into(),
                current: Lexeme::bare(Token::Sof),
                column: 0,
                file: Rc::from("fake"),
            }
        }
    }

    impl Scanner for FakeScanner {
        fn current(&self) -> Token {
            self.current.token()
        }

        fn advance(&mut self) -> Token {
            self.column += 1;
            self.current = self
                .lexemes
                .pop_front()
                .unwrap_or(Lexeme::bare(Token::Eof));
            self.current.token()
        }

        fn take_literal(&mut self) -> String {
            self.current.take_literal()
        }

        fn location(&self) -> Location {
            Location::new(Rc::clone(&self.file), 1, self.column)
        }
    }

    fn parse_lexemes(lexemes: Vec<Lexeme>) -> Result<Module, SyntaxError> {
        Parser::new(FakeScanner::new(lexemes)).parse_module()
    }

    fn def_main(body: Vec<Lexeme>) -> Vec<Lexeme> {
        let mut lexemes = vec![
            Lexeme::bare(Token::Def),
            Lexeme::ident("main"),
            Lexeme::punct('('),
            Lexeme::punct(')'),
            Lexeme::punct('{'),
        ];
        lexemes.extend(body);
        lexemes.push(Lexeme::punct('}'));
        lexemes
    }

    #[test]
    fn test_parse_simple_function() {
        let module = parse_source("def main() { return; }").unwrap();

        assert_eq!(module.functions().len(), 1);
        let function = &module.functions()[0];
        assert_eq!(function.proto().name(), "main");
        assert!(function.proto().params().is_empty());
        assert_eq!(function.body().len(), 1);
        assert!(matches!(&function.body()[0], Expr::Return(ret) if ret.expr().is_none()));
    }

    #[test]
    fn test_parse_empty_module() {
        let module = parse_source("  # nothing here\n").unwrap();
        assert!(module.is_empty());
    }

    #[test]
    fn test_fake_scanner_drives_parser() {
        let module = parse_lexemes(def_main(vec![
            Lexeme::bare(Token::Return),
            Lexeme::ident("x"),
            Lexeme::punct(';'),
        ]))
        .unwrap();

        let function = &module.functions()[0];
        match &function.body()[0] {
            Expr::Return(ret) => match ret.expr() {
                Some(Expr::Var(var)) => {
                    assert_eq!(var.name(), "x");
                    assert_eq!(var.location().column, 7);
                }
                other => panic!("Expected variable, got {:?}", other),
            },
            other => panic!("Expected return, got {:?}", other),
        }
    }

    #[test]
    fn test_print_identifier_from_foreign_scanner() {
        // A scanner that does not treat `print` as a keyword still gets a
        // PrintExpr.
        let module = parse_lexemes(def_main(vec![
            Lexeme::ident("print"),
            Lexeme::punct('('),
            Lexeme::number("1"),
            Lexeme::punct(')'),
            Lexeme::punct(';'),
        ]))
        .unwrap();

        assert!(matches!(module.functions()[0].body()[0], Expr::Print(_)));
    }

    #[test]
    fn test_error_reports_token_and_location() {
        let err = parse_lexemes(vec![Lexeme::bare(Token::Var)]).unwrap_err();

        assert_eq!(err.expected, "def");
        assert_eq!(err.context, "in prototype");
        assert_eq!(err.token, Token::Var);
        assert_eq!(err.location.column, 1);
        assert_eq!(
            err.to_string(),
            "parse error (1, 1): expected 'def' in prototype but has token -3"
        );
    }

    #[test]
    fn test_error_shows_printable_character() {
        let err = parse_source("def main() { x }").unwrap_err();

        assert_eq!(err.expected, ";");
        assert_eq!(err.context, "after expression");
        assert_eq!(
            err.to_string(),
            "parse error (1, 16): expected ';' after expression but has token 125 '}'"
        );
    }

    #[test]
    fn test_trailing_garbage_fails() {
        let err = parse_source("def main() { } }").unwrap_err();
        assert_eq!(err.expected, "def");
        assert_eq!(err.token, Token::Char('}'));
    }

    #[test]
    fn test_into_scanner_stops_at_error() {
        let mut parser = Parser::new(Lexer::new("def main( { }"));
        assert!(parser.parse_module().is_err());

        let lexer = parser.into_scanner();
        assert_eq!(lexer.current(), Token::Char('{'));
    }
}
