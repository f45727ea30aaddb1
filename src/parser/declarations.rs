//! Function definition parsing
//!
//! # Grammar
//!
//! ```text
//! definition ::= prototype block
//! prototype  ::= "def" identifier "(" (identifier ("," identifier)*)? ")"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Scanner, Token};
use crate::parser::parse::{Parser, SyntaxError};
use tracing::debug;

impl<S: Scanner> Parser<S> {
    /// Parse a function definition: prototype followed by its body
    pub(crate) fn parse_definition(&mut self) -> Result<Function, SyntaxError> {
        let proto = self.parse_prototype()?;
        let body = self.parse_block()?;

        debug!(
            name = proto.name(),
            params = proto.params().len(),
            statements = body.len(),
            "parsed function"
        );

        Ok(Function::new(proto, body))
    }

    /// Parse prototype: def name(a, b, ...)
    pub(crate) fn parse_prototype(&mut self) -> Result<Prototype, SyntaxError> {
        let loc = self.consume(Token::Def, "def", "in prototype")?;
        let (name, _) = self.expect_identifier("function name", "in prototype")?;

        self.expect_char('(', "in prototype")?;

        let mut params = Vec::new();
        if !self.check(')') {
            loop {
                let (param, param_loc) = self.expect_identifier("identifier", "in argument list")?;
                params.push(VarExpr::new(param, param_loc));

                if !self.check(',') {
                    break;
                }
                self.advance();
            }
        }

        self.expect_char(')', "to end function prototype")?;

        Ok(Prototype::new(name, params, loc))
    }
}
