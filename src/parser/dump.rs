//! AST dumper
//!
//! Renders a [`Module`] as indented text, one node per line with its source
//! location. Used for debugging the parser and for golden-file tests.
//!
//! ```text
//!   Module:
//!     Function
//!       Proto 'main' @input.toy:1:1
//!       Params: []
//!       Block {
//!         VarDecl a<> @input.toy:2:3
//!           Literal: <3>[ 1, 2, 3 ] @input.toy:2:11
//!         Print [ @input.toy:3:3
//!           var: a @input.toy:3:9
//!         ]
//!       } // Block
//! ```

use crate::parser::ast::*;
use std::cell::Cell;
use std::fmt::{self, Display, Write};

/// Render `module` as text
pub fn dump(module: &Module) -> String {
    module.to_string()
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        AstDumper::default().module(f, self)
    }
}

/// Raises the indentation level while alive
struct Indent<'a> {
    level: &'a Cell<usize>,
}

impl<'a> Indent<'a> {
    fn new(level: &'a Cell<usize>) -> Self {
        level.set(level.get() + 1);
        Self { level }
    }
}

impl Drop for Indent<'_> {
    fn drop(&mut self) {
        self.level.set(self.level.get() - 1);
    }
}

#[derive(Default)]
struct AstDumper {
    level: Cell<usize>,
}

fn join<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&item.to_string());
    }
    out
}

impl AstDumper {
    fn indent<W: Write>(&self, out: &mut W) -> fmt::Result {
        for _ in 0..self.level.get() {
            out.write_str("  ")?;
        }
        Ok(())
    }

    /// Enter a nested scope and write the indentation for its first line
    fn enter<W: Write>(&self, out: &mut W) -> Result<Indent<'_>, fmt::Error> {
        let indent = Indent::new(&self.level);
        self.indent(out)?;
        Ok(indent)
    }

    fn module<W: Write>(&self, out: &mut W, module: &Module) -> fmt::Result {
        let _indent = self.enter(out)?;
        writeln!(out, "Module:")?;
        for function in module {
            self.function(out, function)?;
        }
        Ok(())
    }

    fn function<W: Write>(&self, out: &mut W, function: &Function) -> fmt::Result {
        let _indent = self.enter(out)?;
        writeln!(out, "Function")?;
        self.prototype(out, function.proto())?;
        self.block(out, function.body())
    }

    fn prototype<W: Write>(&self, out: &mut W, proto: &Prototype) -> fmt::Result {
        let _indent = self.enter(out)?;
        writeln!(out, "Proto '{}' @{}", proto.name(), proto.location())?;
        self.indent(out)?;
        writeln!(out, "Params: [{}]", join(proto.params().iter().map(VarExpr::name)))
    }

    fn block<W: Write>(&self, out: &mut W, body: &[Expr]) -> fmt::Result {
        let _indent = self.enter(out)?;
        writeln!(out, "Block {{")?;
        for expr in body {
            self.expr(out, expr)?;
        }
        self.indent(out)?;
        writeln!(out, "}} // Block")
    }

    fn expr<W: Write>(&self, out: &mut W, expr: &Expr) -> fmt::Result {
        match expr {
            Expr::Number(number) => self.number(out, number),
            Expr::Literal(literal) => self.literal(out, literal),
            Expr::Var(var) => self.var(out, var),
            Expr::VarDecl(decl) => self.var_decl(out, decl),
            Expr::Return(ret) => self.return_expr(out, ret),
            Expr::Binary(binary) => self.binary(out, binary),
            Expr::Call(call) => self.call(out, call),
            Expr::Print(print) => self.print(out, print),
        }
    }

    fn number<W: Write>(&self, out: &mut W, number: &NumberExpr) -> fmt::Result {
        let _indent = self.enter(out)?;
        writeln!(out, "{} @{}", number.value(), number.location())
    }

    fn literal<W: Write>(&self, out: &mut W, literal: &LiteralExpr) -> fmt::Result {
        let _indent = self.enter(out)?;
        write!(out, "Literal: ")?;
        Self::literal_values(out, literal)?;
        writeln!(out, " @{}", literal.location())
    }

    /// `<2, 3>[ <3>[ 1, 2, 3 ], <3>[ 4, 5, 6 ] ]`
    fn literal_values<W: Write>(out: &mut W, literal: &LiteralExpr) -> fmt::Result {
        write!(out, "<{}>[ ", join(literal.dims()))?;
        for (i, value) in literal.values().iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            match value {
                LiteralElement::Number(number) => write!(out, "{}", number.value())?,
                LiteralElement::Literal(nested) => Self::literal_values(out, nested)?,
            }
        }
        write!(out, " ]")
    }

    fn var<W: Write>(&self, out: &mut W, var: &VarExpr) -> fmt::Result {
        let _indent = self.enter(out)?;
        writeln!(out, "var: {} @{}", var.name(), var.location())
    }

    fn var_decl<W: Write>(&self, out: &mut W, decl: &VarDeclExpr) -> fmt::Result {
        let _indent = self.enter(out)?;
        writeln!(
            out,
            "VarDecl {}<{}> @{}",
            decl.name(),
            join(decl.shape()),
            decl.location()
        )?;
        self.expr(out, decl.init())
    }

    fn return_expr<W: Write>(&self, out: &mut W, ret: &ReturnExpr) -> fmt::Result {
        let _indent = self.enter(out)?;
        writeln!(out, "Return")?;
        match ret.expr() {
            Some(expr) => self.expr(out, expr),
            None => {
                let _indent = self.enter(out)?;
                writeln!(out, "(void)")
            }
        }
    }

    fn binary<W: Write>(&self, out: &mut W, binary: &BinaryExpr) -> fmt::Result {
        let _indent = self.enter(out)?;
        writeln!(out, "BinOp: {} @{}", binary.op(), binary.location())?;
        self.expr(out, binary.lhs())?;
        self.expr(out, binary.rhs())
    }

    fn call<W: Write>(&self, out: &mut W, call: &CallExpr) -> fmt::Result {
        let _indent = self.enter(out)?;
        writeln!(out, "Call '{}' [ @{}", call.callee(), call.location())?;
        for arg in call.args() {
            self.expr(out, arg)?;
        }
        self.indent(out)?;
        writeln!(out, "]")
    }

    fn print<W: Write>(&self, out: &mut W, print: &PrintExpr) -> fmt::Result {
        let _indent = self.enter(out)?;
        writeln!(out, "Print [ @{}", print.location())?;
        self.expr(out, print.arg())?;
        self.indent(out)?;
        writeln!(out, "]")
    }
}
