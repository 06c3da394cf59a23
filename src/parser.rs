use crate::Value;
use crate::ast::*;
use crate::error::SyntaxError;
use crate::tokenizer::{Spanned, Token, Tokenizer};

/// Turns a query string into a [Statement].
///
/// This is a pure syntax transform: table and column existence are checked
/// at execution time. Identifiers are lowercased here.
///
/// # Example
/// ```
/// use memql::ast::{Projection, Statement};
///
/// let statement = memql::parse("SELECT Name FROM Staff").unwrap();
/// let Statement::Select(select) = statement else { panic!() };
/// assert_eq!(select.table, "staff");
/// assert_eq!(select.projection, Projection::Columns(vec!["name".into()]));
/// ```
pub fn parse(sql: &str) -> Result<Statement, SyntaxError> {
    let tokens = Tokenizer::new(sql).tokenize()?;
    Parser::new(sql, tokens).parse()
}

pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Spanned>,
    position: usize,
}

impl<'a> Parser<'a> {
    /// `tokens` must come from tokenizing `input` and end with [Token::Eof].
    pub fn new(input: &'a str, tokens: Vec<Spanned>) -> Self {
        Self {
            input,
            tokens,
            position: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Statement, SyntaxError> {
        let statement = match self.current_token() {
            Token::Load => self.parse_load(),
            Token::Select => self.parse_select(),
            _ => Err(self.error("LOAD or SELECT")),
        }?;

        // semicolon is optional so skip it
        if matches!(self.current_token(), Token::Semicolon) {
            self.advance();
        }

        // Check we are at the end of the statement
        if !self.is_at_end() {
            return Err(self.error("end of statement"));
        }

        Ok(statement)
    }

    //helpers
    fn current(&self) -> &Spanned {
        &self.tokens[self.position]
    }

    fn current_token(&self) -> &Token {
        &self.current().token
    }

    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    /// Builds a [SyntaxError] pointing at the current token.
    fn error(&self, expected: &str) -> SyntaxError {
        let offset = self.current().offset;
        SyntaxError {
            expected: expected.into(),
            found: self.current_token().to_string(),
            fragment: self.input.chars().skip(offset).collect(),
            position: offset,
        }
    }

    fn consume(&mut self, expected: Token, name: &str) -> Result<(), SyntaxError> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(name))
        }
    }

    fn peek_token(&self) -> &Token {
        let next = (self.position + 1).min(self.tokens.len() - 1);
        &self.tokens[next].token
    }

    /// Consumes an identifier and returns it lowercased.
    ///
    /// Keywords that never start or separate a clause (`COUNT`, `NULL`,
    /// `AS`, `LOAD`) are accepted as names too, so any header can be queried.
    fn consume_ident(&mut self, what: &str) -> Result<String, SyntaxError> {
        let name = match self.current_token() {
            Token::Ident(name) => name.to_lowercase(),
            Token::Count => "count".to_string(),
            Token::Null => "null".to_string(),
            Token::As => "as".to_string(),
            Token::Load => "load".to_string(),
            _ => return Err(self.error(what)),
        };
        self.advance();
        Ok(name)
    }

    // LOAD <filename> AS <identifier>
    fn parse_load(&mut self) -> Result<Statement, SyntaxError> {
        self.consume(Token::Load, "LOAD")?;

        let source = match self.current_token() {
            Token::Path(path) | Token::String(path) => path.clone(),
            // a bare file name without extension, kept as typed
            Token::Ident(name) => name.clone(),
            _ => return Err(self.error("file name")),
        };
        self.advance();

        self.consume(Token::As, "AS")?;
        let table = self.consume_ident("table name")?;

        Ok(Statement::Load(Load { source, table }))
    }

    // SELECT <projection> FROM <identifier> [WHERE <predicate>]
    fn parse_select(&mut self) -> Result<Statement, SyntaxError> {
        self.consume(Token::Select, "SELECT")?;
        let projection = self.parse_projection()?;
        self.consume(Token::From, "FROM")?;
        let table = self.consume_ident("table name")?;

        let predicate = if matches!(self.current_token(), Token::Where) {
            self.advance();
            Some(self.parse_predicate()?)
        } else {
            None
        };

        Ok(Statement::Select(Select {
            projection,
            table,
            predicate,
        }))
    }

    fn parse_projection(&mut self) -> Result<Projection, SyntaxError> {
        match self.current_token() {
            Token::Star => {
                self.advance();
                Ok(Projection::Star)
            }
            Token::Count if matches!(self.peek_token(), Token::LeftParen) => {
                self.advance();
                self.consume(Token::LeftParen, "'(' after COUNT")?;
                let target = if matches!(self.current_token(), Token::Star) {
                    self.advance();
                    CountTarget::Star
                } else {
                    CountTarget::Column(self.consume_ident("'*' or column name")?)
                };
                self.consume(Token::RightParen, "')'")?;
                Ok(Projection::Count(target))
            }
            Token::Ident(_) | Token::Count | Token::Null | Token::As | Token::Load => {
                let mut columns = vec![self.consume_ident("column name")?];
                while matches!(self.current_token(), Token::Comma) {
                    self.advance();
                    columns.push(self.consume_ident("column name")?);
                }
                Ok(Projection::Columns(columns))
            }
            _ => Err(self.error("'*', COUNT(...) or column name")),
        }
    }

    fn parse_predicate(&mut self) -> Result<Predicate, SyntaxError> {
        let column = self.consume_ident("column name")?;

        let op = match self.current_token() {
            Token::Equal => ComparisonOp::Eq,
            Token::NotEqual => ComparisonOp::NotEq,
            Token::Greater => ComparisonOp::Gt,
            Token::Lower => ComparisonOp::Lt,
            Token::GreaterEqual => ComparisonOp::GtEq,
            Token::LowerEqual => ComparisonOp::LtEq,
            _ => return Err(self.error("comparison operator (=, !=, >, <, >=, <=)")),
        };
        self.advance();

        let literal = match self.current_token() {
            Token::Number(n) => Value::Int(*n),
            Token::FloatNumber(f) => Value::Float(*f),
            Token::String(s) => Value::Text(s.as_str().into()),
            Token::Null => Value::Null,
            _ => return Err(self.error("quoted string or number")),
        };
        self.advance();

        Ok(Predicate {
            column,
            op,
            literal,
        })
    }
}
