//! AMM text parser implementation.
//!
//! A hand-written recursive-descent parser over the source text. It builds
//! the [`Program`] tree and nothing else: names are not resolved and types
//! are kept as the labels written in the source.

use super::*;
use thiserror::Error;

/// Parse failure with the position it was detected at (1-based).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

pub fn parse_program(text: &str) -> Result<Program, ParseError> {
    let parser = Parser::new(text);
    parser.parse()
}

type PResult<T> = Result<T, ParseError>;

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    program: Program,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            program: Program::new(),
        }
    }

    fn parse(mut self) -> PResult<Program> {
        self.skip_whitespace(true);

        while !self.is_eof() {
            let keyword = self.read_identifier()?;
            match keyword {
                "const" => {
                    let (name, type_name, value) = self.parse_binding()?;
                    log::trace!("parsed global constant {}", name);
                    self.program.constants.push(ConstDecl {
                        name,
                        type_name,
                        value,
                    });
                }
                "event" => {
                    let name = self.read_identifier()?.to_string();
                    self.expect(':')?;
                    let type_name = self.read_type()?;
                    self.program.events.push(EventDecl { name, type_name });
                }
                "on" => {
                    let event = self.read_identifier()?.to_string();
                    let closure = self.parse_closure()?;
                    log::trace!("parsed handler for {}", event);
                    self.program.handlers.push(Handler { event, closure });
                }
                other => {
                    return Err(self.error_before(
                        other,
                        format!("Expected 'const', 'event' or 'on' but found '{}'", other),
                    ));
                }
            }
            self.skip_whitespace(true);
        }

        Ok(self.program)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        self.error_at(self.pos, message)
    }

    /// Error pointing at a token that was already consumed.
    fn error_before(&self, token: &str, message: impl Into<String>) -> ParseError {
        self.error_at(self.pos.saturating_sub(token.len()), message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> ParseError {
        let consumed = &self.text[..pos];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map_or(0, |idx| idx + 1);
        let column = consumed[line_start..].chars().count() + 1;
        ParseError {
            line,
            column,
            message: message.into(),
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    /// Skip whitespace and `//` comments. With `skip_newlines` unset, stops at
    /// the end of the current line.
    fn skip_whitespace(&mut self, skip_newlines: bool) {
        while let Some(ch) = self.current_char() {
            if ch == '/' && self.peek_char(1) == Some('/') {
                while let Some(ch) = self.current_char() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if ch.is_whitespace() {
                if ch == '\n' && !skip_newlines {
                    break;
                }
                self.advance();
            } else {
                break;
            }
        }
    }

    fn try_read(&mut self, ch: char) -> bool {
        self.skip_whitespace(true);
        if self.current_char() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> PResult<()> {
        if !self.try_read(ch) {
            return Err(self.error(format!(
                "Expected '{}' but found {}",
                ch,
                self.describe_current()
            )));
        }
        Ok(())
    }

    fn describe_current(&self) -> String {
        match self.current_char() {
            Some(ch) => format!("'{}'", ch),
            None => "end of input".to_string(),
        }
    }

    fn at_identifier_start(&self) -> bool {
        matches!(self.current_char(), Some(ch) if ch.is_ascii_alphabetic() || ch == '_')
    }

    fn read_identifier(&mut self) -> PResult<&'a str> {
        self.skip_whitespace(true);
        if !self.at_identifier_start() {
            return Err(self.error(format!(
                "Expected identifier but found {}",
                self.describe_current()
            )));
        }

        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        Ok(&self.text[start..self.pos])
    }

    fn expect_keyword(&mut self, keyword: &str) -> PResult<()> {
        let found = self.read_identifier()?;
        if found != keyword {
            return Err(self.error_before(
                found,
                format!("Expected '{}' but found '{}'", keyword, found),
            ));
        }
        Ok(())
    }

    /// Full type name such as `int64` or `Either<Array<string>, Error>`,
    /// returned exactly as written.
    fn read_type(&mut self) -> PResult<String> {
        self.skip_whitespace(true);
        let start = self.pos;
        let end = self.read_type_inner()?;
        Ok(self.text[start..end].to_string())
    }

    /// Returns the end of the type. A failed '<' lookahead moves `pos` past
    /// trailing whitespace and comments, which are not part of it.
    fn read_type_inner(&mut self) -> PResult<usize> {
        self.read_identifier()?;
        let end = self.pos;
        if self.try_read('<') {
            loop {
                self.read_type_inner()?;
                if !self.try_read(',') {
                    break;
                }
            }
            self.expect('>')?;
            return Ok(self.pos);
        }
        Ok(end)
    }

    /// `name: type = assignable`, shared by constants and `const`/`let`.
    fn parse_binding(&mut self) -> PResult<(String, String, Assignable)> {
        let name = self.read_identifier()?.to_string();
        self.expect(':')?;
        let type_name = self.read_type()?;
        self.expect('=')?;
        let value = self.parse_assignable()?;
        Ok((name, type_name, value))
    }

    fn parse_closure(&mut self) -> PResult<Closure> {
        self.expect_keyword("fn")?;
        self.expect('(')?;

        let mut args = Args::default();
        loop {
            if self.try_read(')') {
                break;
            }
            let name = self.read_identifier()?.to_string();
            self.expect(':')?;
            let type_name = self.read_type()?;
            let param = Param { name, type_name };

            if self.try_read(',') {
                args.ordinary.push(param);
            } else {
                self.expect(')')?;
                args.trailing = Some(param);
                break;
            }
        }

        self.expect(':')?;
        let return_type = self.read_type()?;
        self.expect('{')?;

        let mut body = Vec::new();
        while !self.try_read('}') {
            if self.is_eof() {
                return Err(self.error("Expected '}' but found end of input"));
            }
            body.push(self.parse_statement()?);
        }

        Ok(Closure {
            args,
            return_type,
            body,
        })
    }

    fn parse_statement(&mut self) -> PResult<Statement> {
        self.skip_whitespace(true);
        let start = self.pos;
        let word = self.read_identifier()?;

        match word {
            "const" | "let" => {
                let kind = if word == "const" {
                    DeclKind::Const
                } else {
                    DeclKind::Let
                };
                let (name, type_name, value) = self.parse_binding()?;
                Ok(Statement::Declaration {
                    kind,
                    name,
                    type_name,
                    value,
                })
            }
            "emit" => {
                let event = self.read_identifier()?.to_string();
                // The payload must sit on the same line as the event name.
                self.skip_whitespace(false);
                let value = if self.at_identifier_start() {
                    Some(self.read_identifier()?.to_string())
                } else {
                    None
                };
                Ok(Statement::Emit { event, value })
            }
            "return" | "break" => {
                // Runs to the end of the line or the closing brace; string
                // contents never end it.
                while let Some(ch) = self.current_char() {
                    match ch {
                        '\n' | '}' => break,
                        '/' if self.peek_char(1) == Some('/') => break,
                        '"' => {
                            self.read_string()?;
                        }
                        _ => self.advance(),
                    }
                }
                Ok(Statement::Exit(self.text[start..self.pos].trim().to_string()))
            }
            name => {
                let name = name.to_string();
                self.skip_whitespace(true);
                match self.current_char() {
                    Some('(') => {
                        let args = self.parse_call_args()?;
                        Ok(Statement::Call(Call { op: name, args }))
                    }
                    Some(':') | Some('=') => {
                        let type_name = if self.try_read(':') {
                            self.read_type()?
                        } else {
                            String::new()
                        };
                        self.expect('=')?;
                        let value = self.parse_assignable()?;
                        Ok(Statement::Assignment {
                            name,
                            type_name,
                            value,
                        })
                    }
                    _ => Err(self.error(format!(
                        "Expected '(' or '=' after '{}' but found {}",
                        name,
                        self.describe_current()
                    ))),
                }
            }
        }
    }

    fn parse_call_args(&mut self) -> PResult<Vec<String>> {
        self.expect('(')?;
        let mut args = Vec::new();
        if self.try_read(')') {
            return Ok(args);
        }
        loop {
            args.push(self.read_identifier()?.to_string());
            if !self.try_read(',') {
                self.expect(')')?;
                return Ok(args);
            }
        }
    }

    fn parse_assignable(&mut self) -> PResult<Assignable> {
        self.skip_whitespace(true);
        match self.current_char() {
            Some('"') => Ok(Assignable::Literal(self.read_string()?.to_string())),
            Some(ch) if ch.is_ascii_digit() || ch == '-' => {
                Ok(Assignable::Literal(self.read_number()?.to_string()))
            }
            Some(_) if self.at_identifier_start() => {
                let saved_pos = self.pos;
                let word = self.read_identifier()?;
                self.skip_whitespace(false);
                let next = self.current_char();

                match word {
                    "fn" if next == Some('(') => {
                        self.pos = saved_pos;
                        Ok(Assignable::Closure(self.parse_closure()?))
                    }
                    "true" | "false" => Ok(Assignable::Literal(word.to_string())),
                    op if next == Some('(') => {
                        let op = op.to_string();
                        let args = self.parse_call_args()?;
                        Ok(Assignable::Call(Call { op, args }))
                    }
                    name => Ok(Assignable::Variable(name.to_string())),
                }
            }
            _ => Err(self.error(format!(
                "Expected a value but found {}",
                self.describe_current()
            ))),
        }
    }

    /// String literal including its quotes. Escapes are kept as written.
    fn read_string(&mut self) -> PResult<&'a str> {
        let start = self.pos;
        self.advance(); // opening quote

        loop {
            match self.current_char() {
                None => {
                    return Err(self.error_at(start, "Unterminated string literal"));
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }

        Ok(&self.text[start..self.pos])
    }

    /// Numeric literal token: optional `-`, digits, optional fraction.
    fn read_number(&mut self) -> PResult<&'a str> {
        let start = self.pos;
        if self.current_char() == Some('-') {
            self.advance();
        }

        let digits_start = self.pos;
        self.skip_digits();
        if self.pos == digits_start {
            return Err(self.error("Expected digits in number literal"));
        }

        if self.current_char() == Some('.')
            && matches!(self.peek_char(1), Some(ch) if ch.is_ascii_digit())
        {
            self.advance();
            self.skip_digits();
        }

        Ok(&self.text[start..self.pos])
    }

    fn skip_digits(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
    }
}
