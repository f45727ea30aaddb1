//! Toy source code front end
//!
//! This module transforms Toy source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens), pulled on demand
//! - [`parse`]: Parsing (tokens → AST), with the grammar split across
//!   `declarations`, `statements` and `expressions`
//! - [`ast`]: AST node definitions
//! - [`dump`]: AST → indented text, for debugging and golden tests
//!
//! # The Toy language
//!
//! A module is a list of functions. Function bodies are `;`-terminated
//! statements: `var` declarations with an optional shape, `return`, and
//! expressions over tensors (`+`, `-`, `*`, calls, `print`, literals).
//!
//! ```text
//! def multiply_transpose(a, b) {
//!   return a * b;
//! }
//!
//! def main() {
//!   var a<2, 3> = [[1, 2, 3], [4, 5, 6]];
//!   print(multiply_transpose(a, a));
//! }
//! ```
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
pub mod dump;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use ast::Module;
pub use lexer::{Lexer, Scanner, Token};
pub use parse::{parse_source, Parser, SyntaxError};
