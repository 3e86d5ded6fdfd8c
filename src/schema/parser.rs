//! Recursive-descent recognizer for `CREATE TABLE` statements.
//!
//! The recognizer is best-effort: anything it does not understand is skipped
//! and never reported as an error.

use std::ops::Range;

use super::lexer::{Spanned, Token};
use super::{Column, Relationship, Schema, Table};

/// Words that may precede `TABLE` in a `CREATE` statement.
const TABLE_MODIFIERS: &[&str] = &["TEMP", "TEMPORARY", "UNLOGGED", "GLOBAL", "LOCAL", "OR", "REPLACE"];

/// Words that continue a multi-word type such as `DOUBLE PRECISION`.
const TYPE_CONTINUATIONS: &[&str] =
    &["PRECISION", "VARYING", "WITH", "WITHOUT", "TIME", "ZONE", "UNSIGNED", "ZEROFILL"];

/// Words that start a column constraint and therefore cannot be a type.
const COLUMN_CONSTRAINTS: &[&str] = &[
    "PRIMARY",
    "NOT",
    "NULL",
    "UNIQUE",
    "DEFAULT",
    "REFERENCES",
    "CHECK",
    "CONSTRAINT",
    "COLLATE",
    "GENERATED",
];

static EOF: Token = Token::Eof;

fn is_any_keyword(token: &Token, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| token.is_keyword(kw))
}

/// Statement-level parser over the full token stream.
pub(super) struct Parser<'a> {
    tokens: Vec<Spanned>,
    pos: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    pub(super) fn new(tokens: Vec<Spanned>, source: &'a str) -> Self {
        Self { tokens, pos: 0, source }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).map_or(&EOF, |s| &s.token)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    pub(super) fn parse(mut self) -> Schema {
        let mut tables = Vec::new();

        while self.current() != &Token::Eof {
            if self.current().is_keyword("CREATE") {
                self.advance();
                if let Some(table) = self.parse_create() {
                    tables.push(table);
                }
            } else {
                self.advance();
            }
        }

        Schema { tables }
    }

    /// Parses what follows `CREATE`. Returns `None` for anything that is not
    /// a complete table definition.
    fn parse_create(&mut self) -> Option<Table> {
        while is_any_keyword(self.current(), TABLE_MODIFIERS) {
            self.advance();
        }
        if !self.current().is_keyword("TABLE") {
            return None;
        }
        self.advance();

        if self.current().is_keyword("IF") {
            self.advance();
            if self.current().is_keyword("NOT") {
                self.advance();
            }
            if self.current().is_keyword("EXISTS") {
                self.advance();
            }
        }

        let name = self.qualified_name()?;
        if self.current() != &Token::LParen {
            return None;
        }
        self.advance();

        let elements = self.split_body()?;
        let mut table = Table::new(name);
        for range in elements {
            let mut element = ElementParser::new(&self.tokens[range], self.source);
            element.apply(&mut table);
        }
        Some(table)
    }

    fn qualified_name(&mut self) -> Option<String> {
        let mut name = self.current().ident()?.to_string();
        self.advance();
        while self.current() == &Token::Dot {
            self.advance();
            let Some(part) = self.current().ident() else { break };
            name = part.to_string();
            self.advance();
        }
        Some(name)
    }

    /// Splits the table body into element token ranges at top-level commas,
    /// consuming the closing parenthesis. Returns `None` if the body never
    /// closes.
    fn split_body(&mut self) -> Option<Vec<Range<usize>>> {
        let mut depth = 0usize;
        let mut start = self.pos;
        let mut elements = Vec::new();

        loop {
            match self.current() {
                Token::LParen => depth += 1,
                Token::RParen if depth == 0 => {
                    if start < self.pos {
                        elements.push(start..self.pos);
                    }
                    self.advance();
                    return Some(elements);
                }
                Token::RParen => depth -= 1,
                Token::Comma if depth == 0 => {
                    elements.push(start..self.pos);
                    start = self.pos + 1;
                }
                Token::Semicolon if depth == 0 => return None,
                Token::Eof => return None,
                _ => {}
            }
            self.advance();
        }
    }
}

/// Parser for a single comma-separated element of a table body.
struct ElementParser<'t> {
    tokens: &'t [Spanned],
    pos: usize,
    source: &'t str,
}

impl<'t> ElementParser<'t> {
    fn new(tokens: &'t [Spanned], source: &'t str) -> Self {
        Self { tokens, pos: 0, source }
    }

    fn current(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).map_or(&EOF, |s| &s.token)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn apply(&mut self, table: &mut Table) {
        if self.current().is_keyword("CONSTRAINT") {
            self.advance();
            if self.current().ident().is_some() && !self.starts_table_constraint() {
                self.advance();
            }
            self.parse_table_constraint(table);
        } else if self.starts_table_constraint() {
            self.parse_table_constraint(table);
        } else {
            self.parse_column(table);
        }
    }

    fn starts_table_constraint(&self) -> bool {
        let first = self.current();
        let second = self.peek_at(1);

        if first.is_keyword("PRIMARY") || first.is_keyword("FOREIGN") {
            return second.is_keyword("KEY");
        }
        if first.is_keyword("UNIQUE") {
            return second == &Token::LParen || second.is_keyword("KEY") || second.is_keyword("INDEX");
        }
        if first.is_keyword("CHECK") || first.is_keyword("EXCLUDE") {
            return second == &Token::LParen;
        }
        if first.is_keyword("LIKE") {
            return true;
        }
        if is_any_keyword(first, &["INDEX", "KEY", "FULLTEXT", "SPATIAL"]) {
            // `KEY idx (col)` defines an index, `key VARCHAR(10)` is a column
            return second == &Token::LParen
                || (second.ident().is_some()
                    && self.peek_at(2) == &Token::LParen
                    && self.peek_at(3).ident().is_some());
        }
        false
    }

    fn parse_table_constraint(&mut self, table: &mut Table) {
        if self.current().is_keyword("PRIMARY") {
            self.advance();
            self.advance(); // KEY
            for name in self.column_list() {
                table.mark_column(&name, |c| c.is_primary = true);
            }
        } else if self.current().is_keyword("UNIQUE") {
            self.advance();
            if self.current().is_keyword("KEY") || self.current().is_keyword("INDEX") {
                self.advance();
            }
            if self.current() != &Token::LParen {
                self.advance(); // index name
            }
            for name in self.column_list() {
                table.mark_column(&name, |c| c.is_unique = true);
            }
        } else if self.current().is_keyword("FOREIGN") {
            self.advance();
            self.advance(); // KEY
            if self.current() != &Token::LParen {
                self.advance(); // MySQL index name
            }
            let from = self.column_list();
            if !self.current().is_keyword("REFERENCES") {
                return;
            }
            self.advance();
            let Some((to_table, to)) = self.reference() else { return };
            for (from_column, to_column) in from.into_iter().zip(to) {
                table.relationships.push(Relationship {
                    from_column,
                    to_table: to_table.clone(),
                    to_column,
                });
            }
        }
    }

    fn parse_column(&mut self, table: &mut Table) {
        if self.tokens.len() < 2 {
            return;
        }
        let Some(name) = self.current().ident().map(str::to_string) else { return };
        self.advance();

        let data_type = self.type_text();
        let mut column = Column::new(name, data_type);

        while self.current() != &Token::Eof {
            let token = self.current();
            if token.is_keyword("PRIMARY") {
                self.advance();
                if self.current().is_keyword("KEY") {
                    self.advance();
                }
                column.is_primary = true;
            } else if token.is_keyword("NOT") {
                self.advance();
                if self.current().is_keyword("NULL") {
                    self.advance();
                    column.is_not_null = true;
                }
            } else if token.is_keyword("UNIQUE") {
                self.advance();
                if self.current().is_keyword("KEY") {
                    self.advance();
                }
                column.is_unique = true;
            } else if token.is_keyword("DEFAULT") {
                self.advance();
                self.skip_default_value();
                column.has_default = true;
            } else if token.is_keyword("REFERENCES") {
                self.advance();
                if let Some((to_table, to)) = self.reference() {
                    if let Some(to_column) = to.into_iter().next() {
                        table.relationships.push(Relationship {
                            from_column: column.name.clone(),
                            to_table,
                            to_column,
                        });
                    }
                }
            } else if token == &Token::LParen {
                self.skip_group();
            } else {
                self.advance();
            }
        }

        table.columns.push(column);
    }

    /// Reads the raw type text: type word, optional arguments, multi-word
    /// continuations and an optional array suffix.
    fn type_text(&mut self) -> String {
        let Some(first) = self.tokens.get(self.pos) else { return String::new() };
        if first.token.ident().is_none() || is_any_keyword(&first.token, COLUMN_CONSTRAINTS) {
            return String::new();
        }
        let start = first.start;
        let mut end = first.end;
        self.advance();

        loop {
            match self.current() {
                Token::LParen => end = self.skip_group(),
                Token::Symbol('[') if self.peek_at(1) == &Token::Symbol(']') => {
                    self.advance();
                    end = self.tokens[self.pos].end;
                    self.advance();
                }
                token if is_any_keyword(token, TYPE_CONTINUATIONS) => {
                    end = self.tokens[self.pos].end;
                    self.advance();
                }
                _ => break,
            }
        }

        self.source[start..end].to_string()
    }

    fn skip_default_value(&mut self) {
        if self.current() == &Token::LParen {
            self.skip_group();
            return;
        }
        self.advance();
        // function call such as NOW() or nextval('seq')
        if self.current() == &Token::LParen {
            self.skip_group();
        }
    }

    /// Skips a parenthesized group starting at the current `(` and returns
    /// the end offset of its closing parenthesis.
    fn skip_group(&mut self) -> usize {
        let mut depth = 0usize;
        let mut end = self.tokens.get(self.pos).map_or(0, |s| s.end);

        while let Some(spanned) = self.tokens.get(self.pos) {
            end = spanned.end;
            match spanned.token {
                Token::LParen => depth += 1,
                Token::RParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
            if depth == 0 {
                break;
            }
        }
        end
    }

    /// Parses `(a, b, …)` and returns the identifiers at the top level.
    fn column_list(&mut self) -> Vec<String> {
        let mut columns = Vec::new();
        if self.current() != &Token::LParen {
            return columns;
        }
        self.advance();

        loop {
            match self.current() {
                Token::RParen | Token::Eof => {
                    self.advance();
                    break;
                }
                Token::LParen => {
                    self.skip_group();
                }
                token => {
                    if let Some(name) = token.ident() {
                        columns.push(name.to_string());
                    }
                    self.advance();
                }
            }
        }
        columns
    }

    /// Parses `<table> (<cols>)` after `REFERENCES`. The column list is
    /// required.
    fn reference(&mut self) -> Option<(String, Vec<String>)> {
        let mut table = self.current().ident()?.to_string();
        self.advance();
        while self.current() == &Token::Dot {
            self.advance();
            let Some(part) = self.current().ident() else { break };
            table = part.to_string();
            self.advance();
        }

        let columns = self.column_list();
        if columns.is_empty() {
            return None;
        }
        Some((table, columns))
    }
}
