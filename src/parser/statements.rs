//! Statement parsing implementation
//!
//! Toy statements are expressions terminated by `;`. Besides plain
//! expressions a block may contain `var` declarations (with an optional
//! shape) and `return`.
//!
//! # Grammar
//!
//! ```text
//! block ::= "{" ";"* (stmt ";" ";"*)* "}"
//! stmt  ::= decl | "return" expr? | expr
//! decl  ::= "var" identifier type? "=" expr
//! type  ::= "<" (number ","?)* ">"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Scanner, Token};
use crate::parser::parse::{Parser, SyntaxError};

impl<S: Scanner> Parser<S> {
    /// Parse a block: { stmt; stmt; ... }
    pub(crate) fn parse_block(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        self.expect_char('{', "to begin block")?;

        // Ignore empty statements
        self.skip_semicolons();

        let mut statements = Vec::new();
        while !self.check('}') && self.current() != Token::Eof {
            statements.push(self.parse_statement()?);

            if !self.check(';') {
                return self.error(";", "after expression");
            }
            self.skip_semicolons();
        }

        self.expect_char('}', "to close block")?;

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Expr, SyntaxError> {
        match self.current() {
            Token::Var => Ok(Expr::VarDecl(self.parse_declaration()?)),
            Token::Return => Ok(Expr::Return(self.parse_return()?)),
            _ => self.parse_expression(),
        }
    }

    /// Parse return statement: `return` or `return expr`
    pub(crate) fn parse_return(&mut self) -> Result<ReturnExpr, SyntaxError> {
        let loc = self.consume(Token::Return, "return", "to begin return statement")?;

        let expr = if self.check(';') {
            None
        } else {
            Some(self.parse_expression()?)
        };

        Ok(ReturnExpr::new(expr, loc))
    }

    /// Parse variable declaration: var name<shape> = expr
    pub(crate) fn parse_declaration(&mut self) -> Result<VarDeclExpr, SyntaxError> {
        let loc = self.consume(Token::Var, "var", "to begin declaration")?;
        let (name, _) = self.expect_identifier("identifier", "after 'var' declaration")?;

        // Shape is optional, an empty one is inferred later
        let shape = if self.check('<') {
            self.parse_type()?
        } else {
            Shape::new()
        };

        self.expect_char('=', "in variable declaration")?;
        let init = self.parse_expression()?;

        Ok(VarDeclExpr::new(name, shape, init, loc))
    }

    /// Parse shape: <2, 3>
    pub(crate) fn parse_type(&mut self) -> Result<Shape, SyntaxError> {
        self.expect_char('<', "to begin type")?;

        let mut shape = Shape::new();
        while self.current() == Token::Number {
            let text = self.scanner.take_literal();
            let dim = match text.parse::<usize>() {
                Ok(dim) => dim,
                Err(_) => return self.error("dimension", format!("in type, found '{}'", text)),
            };
            shape.push(dim);
            self.advance();

            if self.check(',') {
                self.advance();
            }
        }

        self.expect_char('>', "to end type")?;

        Ok(shape)
    }
}
