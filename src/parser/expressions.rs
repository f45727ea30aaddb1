//! Expression parsing implementation
//!
//! This module handles parsing of Toy expressions using precedence climbing
//! for binary operators and recursive descent for everything else.
//!
//! # Supported Expressions
//!
//! - Numbers: `1`, `2.5`
//! - Tensor literals: `[1, 2]`, `[[1, 2], [3, 4]]`
//! - Variables and calls: `a`, `f(a, b)`
//! - The `print(expr)` builtin
//! - Parenthesized expressions
//! - Binary operators: `*` binds tighter than `+` and `-`, all left-associative
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Scanner, Token};
use crate::parser::parse::{Parser, SyntaxError};

/// Precedence of a token in binary position, -1 if it is not an operator
fn precedence(token: Token) -> i32 {
    match token {
        Token::Char('*') => 40,
        Token::Char('+') | Token::Char('-') => 20,
        _ => -1,
    }
}

impl<S: Scanner> Parser<S> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        let lhs = self.parse_primary()?;
        self.parse_bin_op_rhs(0, lhs)
    }

    /// Fold `(op primary)*` into `lhs` while operators bind at least as
    /// tightly as `min_prec`.
    fn parse_bin_op_rhs(&mut self, min_prec: i32, mut lhs: Expr) -> Result<Expr, SyntaxError> {
        loop {
            let prec = precedence(self.current());
            let op = match self.current() {
                Token::Char(op) if prec >= min_prec => op,
                _ => return Ok(lhs),
            };

            let loc = self.location();
            self.advance();

            let mut rhs = self.parse_primary()?;

            // A tighter operator after rhs takes rhs as its left operand
            if prec < precedence(self.current()) {
                rhs = self.parse_bin_op_rhs(prec + 1, rhs)?;
            }

            lhs = Expr::Binary(BinaryExpr::new(op, lhs, rhs, loc));
        }
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.current() {
            Token::Identifier => self.parse_identifier_expr(),
            Token::Print => self.parse_print(),
            Token::Number => Ok(Expr::Number(self.parse_number()?)),
            Token::Char('(') => self.nested("in parenthesized expression", Self::parse_paren_expr),
            Token::Char('[') => self
                .nested("in literal expression", Self::parse_literal_expr)
                .map(Expr::Literal),
            _ => self.error("expression", "when parsing primary"),
        }
    }

    /// Parse a variable reference or a call
    fn parse_identifier_expr(&mut self) -> Result<Expr, SyntaxError> {
        let loc = self.location();
        let name = self.scanner.take_literal();
        self.advance();

        if !self.check('(') {
            return Ok(Expr::Var(VarExpr::new(name, loc)));
        }

        self.nested("in argument list", |parser| parser.parse_call(name, loc))
    }

    /// Parse the `print` keyword, which must be used as a call
    fn parse_print(&mut self) -> Result<Expr, SyntaxError> {
        let loc = self.location();
        self.advance();

        if !self.check('(') {
            return self.error("(", "after print");
        }

        self.nested("in argument list", |parser| parser.parse_call("print".to_string(), loc))
    }

    /// Parse the argument list of a call to `name`; `print` becomes a
    /// [`PrintExpr`].
    fn parse_call(&mut self, name: String, loc: Location) -> Result<Expr, SyntaxError> {
        self.expect_char('(', "to begin argument list")?;

        let mut args = Vec::new();
        if !self.check(')') {
            loop {
                args.push(self.parse_expression()?);

                if self.check(')') {
                    break;
                }
                if !self.check(',') {
                    return self.error(", or )", "in argument list");
                }
                self.advance();
            }
        }
        self.advance(); // ')'

        if name == "print" {
            let Ok([arg]) = <[Expr; 1]>::try_from(args) else {
                return self.error("<single arg>", "as argument to print()");
            };
            return Ok(Expr::Print(PrintExpr::new(arg, loc)));
        }

        Ok(Expr::Call(CallExpr::new(name, args, loc)))
    }

    /// Parse and convert a number literal
    fn parse_number(&mut self) -> Result<NumberExpr, SyntaxError> {
        let loc = self.location();
        let text = self.scanner.take_literal();

        let value = match text.parse::<f64>() {
            Ok(value) => value,
            Err(_) => return self.error("number", format!("in numeric literal '{}'", text)),
        };
        self.advance();

        Ok(NumberExpr::new(value, loc))
    }

    /// Parse parenthesized expression
    fn parse_paren_expr(&mut self) -> Result<Expr, SyntaxError> {
        self.expect_char('(', "to begin parenthesized expression")?;
        let expr = self.parse_expression()?;
        self.expect_char(')', "to close expression with parentheses")?;
        Ok(expr)
    }

    /// Parse tensor literal: [1, 2] or [[1, 2], [3, 4]]
    ///
    /// Nested literals must all have the same dims, which are appended to
    /// this literal's own element count.
    fn parse_literal_expr(&mut self) -> Result<LiteralExpr, SyntaxError> {
        let loc = self.expect_char('[', "to begin literal expression")?;

        let mut values = Vec::new();
        loop {
            match self.current() {
                Token::Char('[') => {
                    let nested = self.nested("in literal expression", Self::parse_literal_expr)?;
                    values.push(LiteralElement::Literal(nested));
                }
                Token::Number => values.push(LiteralElement::Number(self.parse_number()?)),
                _ => return self.error("<num> or [", "in literal expression"),
            }

            if self.check(']') {
                break;
            }
            if !self.check(',') {
                return self.error("] or ,", "in literal expression");
            }
            self.advance();
        }

        let mut dims = vec![values.len()];
        if values
            .iter()
            .any(|value| matches!(value, LiteralElement::Literal(_)))
        {
            let mut nested = values.iter().map(|value| match value {
                LiteralElement::Literal(literal) => Some(literal.dims()),
                LiteralElement::Number(_) => None,
            });

            match nested.next().flatten() {
                Some(first) if nested.all(|dims| dims == Some(first)) => {
                    dims.extend_from_slice(first);
                }
                _ => {
                    return self.error("uniform well-nested dimensions", "inside literal expression")
                }
            }
        }

        self.advance(); // ']'

        Ok(LiteralExpr::new(values, dims, loc))
    }
}
