use std::fmt;

use crate::error::SyntaxError;

/// Represents the smallest meaningful units (atoms) of the query language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- Keywords ---
    Load,
    As,
    Select,
    From,
    Where,
    Count,
    /// The `NULL` literal.
    Null,

    // --- Identifiers & Literals ---
    /// A name representing a table or a column (e.g., `staff`, `age`).
    Ident(String),
    /// A bare file path such as `data/staff.csv`. Only meaningful after `LOAD`.
    Path(String),
    /// A 64-bit integer literal (e.g., `42`, `-7`).
    Number(i64),
    /// A 64-bit floating-point literal (e.g., `3.14`).
    FloatNumber(f64),
    /// A string literal between single or double quotes, quotes stripped.
    String(String),

    // --- Symbols ---
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Comma `,`
    Comma,
    /// Semicolon `;`
    Semicolon,
    /// Wildcard symbol `*`
    Star,
    /// `=`
    Equal,
    /// `!=` or `<>`
    NotEqual,
    /// `>`
    Greater,
    /// `<`
    Lower,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LowerEqual,

    // --- Special ---
    /// Represents the end of the input.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Load => f.write_str("keyword LOAD"),
            Token::As => f.write_str("keyword AS"),
            Token::Select => f.write_str("keyword SELECT"),
            Token::From => f.write_str("keyword FROM"),
            Token::Where => f.write_str("keyword WHERE"),
            Token::Count => f.write_str("keyword COUNT"),
            Token::Null => f.write_str("keyword NULL"),
            Token::Ident(s) => write!(f, "identifier {s:?}"),
            Token::Path(s) => write!(f, "path {s:?}"),
            Token::Number(n) => write!(f, "number {n}"),
            Token::FloatNumber(n) => write!(f, "number {n:?}"),
            Token::String(s) => write!(f, "string '{s}'"),
            Token::LeftParen => f.write_str("'('"),
            Token::RightParen => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
            Token::Semicolon => f.write_str("';'"),
            Token::Star => f.write_str("'*'"),
            Token::Equal => f.write_str("'='"),
            Token::NotEqual => f.write_str("'!='"),
            Token::Greater => f.write_str("'>'"),
            Token::Lower => f.write_str("'<'"),
            Token::GreaterEqual => f.write_str("'>='"),
            Token::LowerEqual => f.write_str("'<='"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// A [Token] together with the character offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// A lexical scanner (lexer) that converts a raw query string into a
/// sequence of [Token]s.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Processes the entire input and returns a vector of tokens, always
    /// terminated by [Token::Eof].
    ///
    /// # Errors
    /// Returns a [SyntaxError] if an unsupported character is encountered or
    /// a string literal is not closed.
    ///
    /// # Example
    /// ```
    /// # use memql::tokenizer::{Tokenizer, Token};
    /// let tokens = Tokenizer::new("SELECT *").tokenize().unwrap();
    /// assert_eq!(tokens[0].token, Token::Select);
    /// assert_eq!(tokens[1].offset, 7);
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<Spanned>, SyntaxError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let offset = self.position;

            if self.is_at_end() {
                tokens.push(Spanned {
                    token: Token::Eof,
                    offset,
                });
                return Ok(tokens);
            }

            let token = self.next_token()?;
            tokens.push(Spanned { token, offset });
        }
    }

    /// Identifies the next token based on the character at the current position.
    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let ch = self.current_char();

        match ch {
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            ',' => self.single(Token::Comma),
            ';' => self.single(Token::Semicolon),
            '*' => self.single(Token::Star),
            '=' => self.single(Token::Equal),
            '>' => {
                self.advance();
                Ok(self.with_equal(Token::Greater, Token::GreaterEqual))
            }
            '<' => {
                self.advance();
                if self.peek_is('>') {
                    self.advance();
                    return Ok(Token::NotEqual);
                }
                Ok(self.with_equal(Token::Lower, Token::LowerEqual))
            }
            '!' => {
                self.advance();
                if self.peek_is('=') {
                    self.advance();
                    Ok(Token::NotEqual)
                } else {
                    Err(self.error("'=' after '!'", self.describe_current()))
                }
            }
            '\'' | '"' => self.read_string(ch),
            '-' | '+' if self.next_is_digit() => self.read_number(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => self.read_word(),
            c if is_path_char(c) => self.read_path(String::new()),
            _ => Err(self.error("a token", format!("character {ch:?}"))),
        }
    }

    // --- Navigation Helpers ---

    /// Returns the character at the current position.
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Moves the cursor forward by one character.
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Checks if the cursor has reached the end of the input.
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek_is(&self, expected: char) -> bool {
        !self.is_at_end() && self.current_char() == expected
    }

    fn next_is_digit(&self) -> bool {
        self.input
            .get(self.position + 1)
            .is_some_and(|c| c.is_ascii_digit())
    }

    /// `e`/`E` followed by digits, with an optional sign in between.
    fn at_exponent(&self) -> bool {
        let is_digit = |offset: usize| {
            self.input
                .get(self.position + offset)
                .is_some_and(|c| c.is_ascii_digit())
        };
        match self.input.get(self.position) {
            Some('e' | 'E') => match self.input.get(self.position + 1) {
                Some('-' | '+') => is_digit(2),
                _ => is_digit(1),
            },
            _ => false,
        }
    }

    /// Consumes any whitespace characters (spaces, tabs, newlines).
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn single(&mut self, token: Token) -> Result<Token, SyntaxError> {
        self.advance();
        Ok(token)
    }

    /// Returns `with` and consumes a `=` if one follows, otherwise `without`.
    fn with_equal(&mut self, without: Token, with: Token) -> Token {
        if self.peek_is('=') {
            self.advance();
            with
        } else {
            without
        }
    }

    fn describe_current(&self) -> String {
        if self.is_at_end() {
            "end of input".into()
        } else {
            format!("character {:?}", self.current_char())
        }
    }

    fn error(&self, expected: &str, found: String) -> SyntaxError {
        SyntaxError {
            expected: expected.into(),
            found,
            fragment: self.input[self.position.min(self.input.len())..]
                .iter()
                .collect(),
            position: self.position,
        }
    }

    // --- Extraction Logic ---

    /// Reads a word and determines if it's a reserved keyword, an identifier,
    /// or the start of a file path.
    ///
    /// Keywords are matched case-insensitively.
    fn read_word(&mut self) -> Result<Token, SyntaxError> {
        let mut ident = String::new();

        while !self.is_at_end()
            && (self.current_char().is_alphanumeric() || self.current_char() == '_')
        {
            ident.push(self.current_char());
            self.advance();
        }

        if !self.is_at_end() && is_path_char(self.current_char()) {
            return self.read_path(ident);
        }

        match ident.to_uppercase().as_str() {
            "LOAD" => Ok(Token::Load),
            "AS" => Ok(Token::As),
            "SELECT" => Ok(Token::Select),
            "FROM" => Ok(Token::From),
            "WHERE" => Ok(Token::Where),
            "COUNT" => Ok(Token::Count),
            "NULL" => Ok(Token::Null),
            _ => Ok(Token::Ident(ident)),
        }
    }

    /// Reads the rest of a bare path, starting from an already consumed prefix.
    fn read_path(&mut self, mut path: String) -> Result<Token, SyntaxError> {
        while !self.is_at_end() {
            let c = self.current_char();
            if !(c.is_alphanumeric() || c == '_' || is_path_char(c)) {
                break;
            }
            path.push(c);
            self.advance();
        }
        Ok(Token::Path(path))
    }

    /// Reads a numeric literal with an optional sign. If a dot `.` or an
    /// exponent (`1e3`, `2.5E-2`) is encountered, it returns a
    /// [Token::FloatNumber], otherwise a [Token::Number]. Integers too large
    /// for `i64` become floats.
    fn read_number(&mut self) -> Result<Token, SyntaxError> {
        let start = self.position;
        let mut number = String::new();
        let mut has_dot = false;
        let mut has_exponent = false;

        if matches!(self.current_char(), '-' | '+') {
            number.push(self.current_char());
            self.advance();
        }

        while !self.is_at_end()
            && (self.current_char().is_ascii_digit() || (self.current_char() == '.' && !has_dot))
        {
            if self.current_char() == '.' {
                has_dot = true;
            }
            number.push(self.current_char());
            self.advance();
        }

        if self.at_exponent() {
            has_exponent = true;
            number.push(self.current_char());
            self.advance();
            if matches!(self.current_char(), '-' | '+') {
                number.push(self.current_char());
                self.advance();
            }
            while !self.is_at_end() && self.current_char().is_ascii_digit() {
                number.push(self.current_char());
                self.advance();
            }
        }

        // things like `2024_sales.csv` are paths, not numbers
        if !self.is_at_end() {
            let c = self.current_char();
            if c.is_alphabetic() || c == '_' || is_path_char(c) {
                return self.read_path(number);
            }
        }

        if !has_dot && !has_exponent {
            if let Ok(n) = number.parse::<i64>() {
                return Ok(Token::Number(n));
            }
        }

        match number.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Token::FloatNumber(f)),
            _ => {
                self.position = start;
                Err(self.error("a number", format!("{number:?}")))
            }
        }
    }

    /// Reads a string literal enclosed in `quote`. There are no escape
    /// sequences: the first matching quote ends the literal.
    fn read_string(&mut self, quote: char) -> Result<Token, SyntaxError> {
        let start = self.position;
        self.advance(); // Skip the opening quote

        let mut string = String::new();
        while !self.is_at_end() && self.current_char() != quote {
            string.push(self.current_char());
            self.advance();
        }

        if self.is_at_end() {
            self.position = start;
            return Err(self.error(
                &format!("closing {quote} for string literal"),
                "end of input".into(),
            ));
        }

        // Skip the closing quote
        self.advance();

        Ok(Token::String(string))
    }
}

fn is_path_char(c: char) -> bool {
    matches!(c, '.' | '/' | '\\' | '-' | '~' | ':')
}
