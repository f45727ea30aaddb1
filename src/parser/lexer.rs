//! Lexer (tokenizer) for Toy source code
//!
//! Converts raw source text into tokens on demand. The parser pulls one token
//! at a time through the [`Scanner`] trait; [`Lexer`] is the implementation
//! used for real source, and tests substitute their own.
//!
//! Input is buffered line by line. `#` starts a comment that runs to the end
//! of the line.

use super::ast::Location;
use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::{trace, warn};

/// Token categories produced by the lexer.
///
/// Punctuation is carried as the character itself, so the parser compares
/// against `Token::Char('(')` and friends directly. Identifier and number
/// tokens have a literal, which is fetched separately with
/// [`Scanner::take_literal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Any single character that does not start a longer token: `;`, `(`,
    /// `)`, `{`, `}`, `[`, `]`, `+`, `-`, `*`, `=`, `,`, `<`, `>`, ...
    Char(char),

    Eof,

    // Keywords
    Return,
    Var,
    Def,
    Print,

    Identifier,
    Number,

    /// Current token of a scanner that has not been advanced yet
    Sof,

    /// Reserved; never produced by [`Lexer`]
    Transpose,
}

impl Token {
    /// Raw integer tag: the code point for punctuation, a fixed negative
    /// value for every named category.
    pub fn code(self) -> i32 {
        match self {
            Token::Char(c) => c as u32 as i32,
            Token::Eof => -1,
            Token::Return => -2,
            Token::Var => -3,
            Token::Def => -4,
            Token::Identifier => -5,
            Token::Number => -6,
            Token::Sof => -10,
            Token::Print => -11,
            Token::Transpose => -12,
        }
    }

    /// Whether tokens of this category carry a literal
    pub fn has_literal(self) -> bool {
        matches!(self, Token::Identifier | Token::Number)
    }

    /// The punctuation character, if it is printable
    pub fn printable(self) -> Option<char> {
        match self {
            Token::Char(c) if c.is_ascii_graphic() => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Char(c) => write!(f, "'{}'", c),
            Token::Eof => write!(f, "end of file"),
            Token::Return => write!(f, "'return'"),
            Token::Var => write!(f, "'var'"),
            Token::Def => write!(f, "'def'"),
            Token::Print => write!(f, "'print'"),
            Token::Identifier => write!(f, "identifier"),
            Token::Number => write!(f, "number"),
            Token::Sof => write!(f, "start of file"),
            Token::Transpose => write!(f, "'transpose'"),
        }
    }
}

/// A token together with its literal, as collected by [`Lexer::tokenize`].
///
/// The literal is present exactly when the token is an identifier or a
/// number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    token: Token,
    literal: Option<String>,
}

impl Lexeme {
    /// A token without a literal, such as a keyword or punctuation
    ///
    /// Identifier and number tokens must be built with [`Lexeme::ident`] and
    /// [`Lexeme::number`]; passed here they get an empty literal.
    pub fn bare(token: Token) -> Self {
        debug_assert!(
            !token.has_literal(),
            "{} needs a literal, use Lexeme::ident or Lexeme::number",
            token
        );
        Self {
            token,
            literal: token.has_literal().then(String::new),
        }
    }

    pub fn ident(name: &str) -> Self {
        Self {
            token: Token::Identifier,
            literal: Some(name.to_string()),
        }
    }

    pub fn number(text: &str) -> Self {
        Self {
            token: Token::Number,
            literal: Some(text.to_string()),
        }
    }

    pub fn punct(c: char) -> Self {
        Self::bare(Token::Char(c))
    }

    pub fn token(&self) -> Token {
        self.token
    }

    pub fn literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    /// Move the literal out, leaving an empty one in its place
    pub fn take_literal(&mut self) -> String {
        self.literal.as_mut().map(std::mem::take).unwrap_or_default()
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.literal() {
            None => write!(f, "{}", self.token),
            Some(literal) => write!(f, "{} '{}'", self.token, literal),
        }
    }
}

/// The interface the parser is written against.
pub trait Scanner {
    /// The current token in the stream
    fn current(&self) -> Token;

    /// Move to the next token in the stream and return it
    fn advance(&mut self) -> Token;

    /// The literal of the current identifier or number token, leaving it
    /// empty. Returns an empty string for every other token.
    fn take_literal(&mut self) -> String;

    /// Start location of the current token
    fn location(&self) -> Location;
}

/// Raised when a source file cannot be read. Not fatal: the lexer carries on
/// with an empty buffer.
#[derive(Debug, Error)]
#[error("cannot open {}: {source}", .path.display())]
pub struct ScanWarning {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Lexer for Toy source code
pub struct Lexer {
    file: Rc<str>,
    pending_lines: VecDeque<String>,
    line_buf: Vec<char>,
    line_pos: usize,
    line: usize,
    column: usize,
    last_char: Option<char>,
    current: Token,
    literal: String,
    token_location: Location,
    warning: Option<ScanWarning>,
}

impl Lexer {
    /// Create a new lexer over an in-memory string.
    pub fn new(source: &str) -> Self {
        Self::with_name("<string>", source)
    }

    /// Create a new lexer over an in-memory string, reporting locations
    /// against `file`.
    pub fn with_name(file: impl Into<Rc<str>>, source: &str) -> Self {
        let file = file.into();
        Self {
            token_location: Location::new(Rc::clone(&file), 0, 0),
            file,
            pending_lines: source.split_inclusive('\n').map(str::to_string).collect(),
            // A lone line ending, so the first read moves onto line 1.
            line_buf: vec!['\n'],
            line_pos: 0,
            line: 0,
            column: 0,
            last_char: Some(' '),
            current: Token::Sof,
            literal: String::new(),
            warning: None,
        }
    }

    /// Create a lexer over the contents of `path`.
    ///
    /// If the file cannot be read the failure is logged and kept as a
    /// [`ScanWarning`]; the lexer then behaves as if the file were empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path.display().to_string();

        match fs::read_to_string(path) {
            Ok(source) => Self::with_name(name, &source),
            Err(source) => {
                let warning = ScanWarning {
                    path: path.to_path_buf(),
                    source,
                };
                warn!("{}", warning);
                let mut lexer = Self::with_name(name, "");
                lexer.warning = Some(warning);
                lexer
            }
        }
    }

    /// The warning recorded when the input file could not be opened
    pub fn warning(&self) -> Option<&ScanWarning> {
        self.warning.as_ref()
    }

    /// Scan the remaining input into lexemes, stopping before end of file.
    pub fn tokenize(&mut self) -> Vec<Lexeme> {
        let mut lexemes = Vec::new();

        loop {
            let token = self.advance();
            if token == Token::Eof {
                break;
            }
            lexemes.push(Lexeme {
                token,
                literal: token.has_literal().then(|| self.take_literal()),
            });
        }

        lexemes
    }

    /// Scan the next token starting at the lookahead character
    fn next_token(&mut self) -> Token {
        loop {
            while self.last_char.is_some_and(|c| c.is_ascii_whitespace()) {
                self.last_char = self.next_char();
            }

            self.token_location = Location::new(Rc::clone(&self.file), self.line, self.column);

            let Some(ch) = self.last_char else {
                return Token::Eof;
            };

            if ch.is_ascii_alphabetic() {
                return self.identifier_or_keyword();
            }

            if ch.is_ascii_digit() || ch == '.' {
                return self.number_literal();
            }

            if ch == '#' {
                self.skip_comment();
                continue;
            }

            self.last_char = self.next_char();
            return Token::Char(ch);
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self) -> Token {
        let mut ident = String::new();

        while let Some(ch) = self.last_char {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.last_char = self.next_char();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "return" => Token::Return,
            "def" => Token::Def,
            "var" => Token::Var,
            "print" => Token::Print,
            _ => {
                self.literal = ident;
                Token::Identifier
            }
        }
    }

    /// Parse numeric literal. The text is kept verbatim; conversion to a
    /// value happens in the parser.
    fn number_literal(&mut self) -> Token {
        let mut num_str = String::new();

        while let Some(ch) = self.last_char {
            if ch.is_ascii_digit() || ch == '.' {
                num_str.push(ch);
                self.last_char = self.next_char();
            } else {
                break;
            }
        }

        self.literal = num_str;
        Token::Number
    }

    /// Skip `# ...` up to the end of the current line
    fn skip_comment(&mut self) {
        loop {
            self.last_char = self.next_char();
            match self.last_char {
                None | Some('\n') | Some('\r') => break,
                Some(_) => {}
            }
        }
    }

    /// Read the next character, loading the next line once the current one
    /// is exhausted. `None` only at the true end of input.
    fn next_char(&mut self) -> Option<char> {
        let ch = *self.line_buf.get(self.line_pos)?;
        self.line_pos += 1;
        self.column += 1;

        if self.line_pos == self.line_buf.len() {
            self.line_buf = self
                .pending_lines
                .pop_front()
                .map(|line| line.chars().collect())
                .unwrap_or_default();
            self.line_pos = 0;
        }

        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        }

        Some(ch)
    }
}

impl Scanner for Lexer {
    fn current(&self) -> Token {
        self.current
    }

    fn advance(&mut self) -> Token {
        self.literal.clear();
        self.current = self.next_token();
        trace!(token = %self.current, location = %self.token_location, "scanned token");
        self.current
    }

    fn take_literal(&mut self) -> String {
        if self.current.has_literal() {
            std::mem::take(&mut self.literal)
        } else {
            String::new()
        }
    }

    fn location(&self) -> Location {
        self.token_location.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Lexeme> {
        Lexer::new(source).tokenize()
    }

    #[test]
    fn test_simple_main() {
        let tokens = lex("def main() {\n  var a = [1, 2, 3];\n  print(a);\n}\n");

        assert_eq!(
            tokens,
            vec![
                Lexeme::bare(Token::Def),
                Lexeme::ident("main"),
                Lexeme::punct('('),
                Lexeme::punct(')'),
                Lexeme::punct('{'),
                Lexeme::bare(Token::Var),
                Lexeme::ident("a"),
                Lexeme::punct('='),
                Lexeme::punct('['),
                Lexeme::number("1"),
                Lexeme::punct(','),
                Lexeme::number("2"),
                Lexeme::punct(','),
                Lexeme::number("3"),
                Lexeme::punct(']'),
                Lexeme::punct(';'),
                Lexeme::bare(Token::Print),
                Lexeme::punct('('),
                Lexeme::ident("a"),
                Lexeme::punct(')'),
                Lexeme::punct(';'),
                Lexeme::punct('}'),
            ]
        );
    }

    #[test]
    fn test_keywords_are_exact() {
        let tokens = lex("return returned Def def_ var print printer transpose");

        assert_eq!(
            tokens,
            vec![
                Lexeme::bare(Token::Return),
                Lexeme::ident("returned"),
                Lexeme::ident("Def"),
                Lexeme::ident("def_"),
                Lexeme::bare(Token::Var),
                Lexeme::bare(Token::Print),
                Lexeme::ident("printer"),
                Lexeme::ident("transpose"),
            ]
        );
    }

    #[test]
    fn test_comments() {
        let tokens = lex("var x; # comment ; var\n# whole line\nvar y;");

        assert_eq!(
            tokens,
            vec![
                Lexeme::bare(Token::Var),
                Lexeme::ident("x"),
                Lexeme::punct(';'),
                Lexeme::bare(Token::Var),
                Lexeme::ident("y"),
                Lexeme::punct(';'),
            ]
        );
    }

    #[test]
    fn test_comment_at_end_of_input() {
        assert_eq!(lex("x # trailing"), vec![Lexeme::ident("x")]);
    }

    #[test]
    fn test_numbers_are_not_validated() {
        let tokens = lex("1 2.5 .5 1.2.3 ..");

        assert_eq!(
            tokens,
            vec![
                Lexeme::number("1"),
                Lexeme::number("2.5"),
                Lexeme::number(".5"),
                Lexeme::number("1.2.3"),
                Lexeme::number(".."),
            ]
        );
    }

    #[test]
    fn test_identifier_with_digits_and_underscore() {
        let tokens = lex("user_fn2(in)");
        assert_eq!(tokens[0], Lexeme::ident("user_fn2"));

        // identifiers must start with a letter
        let tokens = lex("_x");
        assert_eq!(tokens, vec![Lexeme::punct('_'), Lexeme::ident("x")]);
    }

    #[test]
    fn test_locations() {
        let mut lexer = Lexer::with_name("t.toy", "def f()\n  {\n\n   return;\n}");

        assert_eq!(lexer.current(), Token::Sof);

        let expected = [
            (Token::Def, 1, 1),
            (Token::Identifier, 1, 5),
            (Token::Char('('), 1, 6),
            (Token::Char(')'), 1, 7),
            (Token::Char('{'), 2, 3),
            (Token::Return, 4, 4),
            (Token::Char(';'), 4, 10),
            (Token::Char('}'), 5, 1),
        ];

        for (token, line, column) in expected {
            assert_eq!(lexer.advance(), token);
            let loc = lexer.location();
            assert_eq!((loc.line, loc.column), (line, column), "location of {}", token);
            assert_eq!(&*loc.file, "t.toy");
        }

        assert_eq!(lexer.advance(), Token::Eof);
    }

    #[test]
    fn test_take_literal_clears() {
        let mut lexer = Lexer::new("abc ;");

        assert_eq!(lexer.advance(), Token::Identifier);
        assert_eq!(lexer.take_literal(), "abc");
        assert_eq!(lexer.take_literal(), "");

        assert_eq!(lexer.advance(), Token::Char(';'));
        assert_eq!(lexer.take_literal(), "");
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("  \n\t ");
        assert_eq!(lexer.advance(), Token::Eof);
        assert_eq!(lexer.advance(), Token::Eof);
        assert_eq!(lexer.current(), Token::Eof);
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut lexer = Lexer::new("var\r\nx");
        assert_eq!(lexer.advance(), Token::Var);
        assert_eq!(lexer.advance(), Token::Identifier);
        assert_eq!(lexer.location().line, 2);
        assert_eq!(lexer.location().column, 1);
    }

    #[test]
    fn test_source_is_copied() {
        let mut source = String::from("var");
        let mut lexer = Lexer::new(&source);
        source.push_str(" x");
        drop(source);

        assert_eq!(lexer.tokenize(), vec![Lexeme::bare(Token::Var)]);
    }

    #[test]
    fn test_missing_file_is_a_warning() {
        let mut lexer = Lexer::open("/definitely/not/here.toy");

        let warning = lexer.warning().expect("warning should be recorded");
        assert_eq!(warning.source.kind(), io::ErrorKind::NotFound);
        assert!(warning.to_string().contains("here.toy"));
        assert_eq!(lexer.advance(), Token::Eof);
    }

    #[test]
    fn test_token_codes() {
        assert_eq!(Token::Char(';').code(), ';' as i32);
        assert_eq!(Token::Eof.code(), -1);
        assert_eq!(Token::Number.code(), -6);
        assert_eq!(Token::Sof.code(), -10);
        assert_eq!(Token::Char('(').printable(), Some('('));
        assert_eq!(Token::Char('\u{7}').printable(), None);
        assert_eq!(Token::Def.printable(), None);
    }

    #[test]
    fn test_literal_only_on_identifiers_and_numbers() {
        let tokens = lex("var x = 4;");

        let literals: Vec<_> = tokens.iter().map(Lexeme::literal).collect();
        assert_eq!(literals, [None, Some("x"), None, Some("4"), None]);
        assert_eq!(tokens[1].to_string(), "identifier 'x'");
        assert_eq!(tokens[0].to_string(), "'var'");
    }

    #[test]
    fn test_lexeme_take_literal() {
        let mut number = Lexeme::number("2.5");
        assert_eq!(number.take_literal(), "2.5");
        assert_eq!(number.literal(), Some(""));

        assert_eq!(Lexeme::punct(';').take_literal(), "");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "needs a literal")]
    fn test_bare_identifier_is_rejected() {
        Lexeme::bare(Token::Identifier);
    }
}
