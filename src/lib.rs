//! # Introduction
//!
//! toyc is the front end for Toy, a small tensor language with functions,
//! shaped variable declarations and elementwise arithmetic.  It scans and
//! parses source into an AST and can render that AST as text.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Dumper
//! ```
//!
//! 1. [`parser::lexer`]: pulls tokens from the source one at a time.
//! 2. [`parser::parse`]: recursive descent over the [`parser::lexer::Scanner`]
//!    trait, producing a [`parser::ast::Module`] or the first
//!    [`parser::parse::SyntaxError`].
//! 3. [`parser::dump`]: indented textual form of the AST.
//!
//! ```
//! use toyc::parser::{dump::dump, parse_source};
//!
//! let module = parse_source("def main() { print([1, 2]); }").unwrap();
//! assert!(dump(&module).contains("Print ["));
//! ```

pub mod parser;
