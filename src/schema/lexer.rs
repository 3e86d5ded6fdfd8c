//! Tokenizer for the `CREATE TABLE` subset of SQL.

use std::iter::Peekable;
use std::str::CharIndices;

/// SQL token kinds.
///
/// Keywords are not distinguished from identifiers at this level: a bare
/// word is a [`Token::Word`] and callers match keywords case-insensitively
/// with [`Token::is_keyword`]. Quoted identifiers never match a keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare identifier or keyword.
    Word(String),
    /// Identifier written in `"…"`, `` `…` `` or `[…]`.
    Quoted(String),
    /// String literal in single quotes.
    Str(String),
    /// Numeric literal.
    Num(String),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// Any other punctuation character.
    Symbol(char),
    /// End of input.
    Eof,
}

impl Token {
    /// Returns `true` if this is a bare word equal to `keyword` ignoring case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }

    /// Returns the identifier text for bare or quoted identifiers.
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Word(w) | Token::Quoted(w) => Some(w),
            _ => None,
        }
    }
}

/// A token together with its byte range in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

/// SQL lexer.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    current: Option<(usize, char)>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `input`.
    pub fn new(input: &'a str) -> Self {
        let mut chars = input.char_indices().peekable();
        let current = chars.next();
        Self { input, chars, current }
    }

    fn advance(&mut self) {
        self.current = self.chars.next();
    }

    fn current_char(&self) -> Option<char> {
        self.current.map(|(_, c)| c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Byte offset of the current character, or the input length at the end.
    fn offset(&self) -> usize {
        self.current.map_or(self.input.len(), |(i, _)| i)
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.current_char() {
            self.advance();
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) {
        // positioned on the '*' of "/*"
        self.advance();
        while let Some(c) = self.current_char() {
            self.advance();
            if c == '*' && self.current_char() == Some('/') {
                self.advance();
                break;
            }
        }
    }

    /// Reads a bare word. A `-` between two word characters stays in the
    /// word, so copybook-style names such as `CUST-ID` are one identifier.
    fn read_word(&mut self) -> String {
        let is_word_char = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
        let mut word = String::new();
        while let Some(c) = self.current_char() {
            if is_word_char(c) || (c == '-' && self.peek().is_some_and(is_word_char)) {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }
        word
    }

    /// Reads a quoted identifier or string; a doubled closing quote is an escape.
    fn read_quoted(&mut self, close: char) -> String {
        self.advance(); // opening quote
        let mut text = String::new();
        while let Some(c) = self.current_char() {
            if c == close {
                if self.peek() == Some(close) {
                    text.push(c);
                    self.advance();
                    self.advance();
                } else {
                    self.advance();
                    break;
                }
            } else if c == '\\' && close == '\'' {
                self.advance();
                if let Some(escaped) = self.current_char() {
                    text.push(escaped);
                    self.advance();
                }
            } else {
                text.push(c);
                self.advance();
            }
        }
        text
    }

    fn read_number(&mut self) -> String {
        let mut num = String::new();
        let mut has_dot = false;

        if self.current_char() == Some('-') {
            num.push('-');
            self.advance();
        }

        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() {
                num.push(c);
                self.advance();
            } else if c == '.' && !has_dot {
                has_dot = true;
                num.push(c);
                self.advance();
            } else {
                break;
            }
        }
        num
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    /// Returns the next token with its byte span.
    pub fn next_token(&mut self) -> Spanned {
        loop {
            self.skip_whitespace();
            let start = self.offset();

            let token = match self.current_char() {
                None => Token::Eof,
                Some('-') if self.peek() == Some('-') => {
                    self.skip_line_comment();
                    continue;
                }
                Some('-') if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                    Token::Num(self.read_number())
                }
                Some('/') if self.peek() == Some('*') => {
                    self.advance();
                    self.skip_block_comment();
                    continue;
                }
                Some('#') => {
                    self.skip_line_comment();
                    continue;
                }
                Some('(') => self.single(Token::LParen),
                Some(')') => self.single(Token::RParen),
                Some(',') => self.single(Token::Comma),
                Some(';') => self.single(Token::Semicolon),
                Some('.') => self.single(Token::Dot),
                Some('"') => Token::Quoted(self.read_quoted('"')),
                Some('`') => Token::Quoted(self.read_quoted('`')),
                // `[]` is an array suffix, anything else is a bracketed identifier
                Some('[') if self.peek() == Some(']') => self.single(Token::Symbol('[')),
                Some('[') => Token::Quoted(self.read_quoted(']')),
                Some('\'') => Token::Str(self.read_quoted('\'')),
                Some(c) if c.is_ascii_digit() => Token::Num(self.read_number()),
                Some(c) if c.is_alphabetic() || c == '_' => Token::Word(self.read_word()),
                Some(c) => self.single(Token::Symbol(c)),
            };

            return Spanned { token, start, end: self.offset() };
        }
    }

    /// Collects all tokens, ending with [`Token::Eof`].
    pub fn tokenize(&mut self) -> Vec<Spanned> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token();
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sql: &str) -> Vec<Token> {
        Lexer::new(sql).tokenize().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn tokenizes_simple_create_table() {
        let tokens = kinds("CREATE TABLE users (id INT);");

        assert!(tokens[0].is_keyword("create"));
        assert!(tokens[1].is_keyword("TABLE"));
        assert_eq!(tokens[2], Token::Word("users".to_string()));
        assert_eq!(tokens[3], Token::LParen);
        assert_eq!(tokens[4], Token::Word("id".to_string()));
        assert_eq!(tokens[5], Token::Word("INT".to_string()));
        assert_eq!(tokens[6], Token::RParen);
        assert_eq!(tokens[7], Token::Semicolon);
        assert_eq!(tokens[8], Token::Eof);
    }

    #[test]
    fn quoted_identifiers_are_not_keywords() {
        let tokens = kinds(r#"CREATE TABLE "table" (`column name` INT, [order] INT);"#);

        assert_eq!(tokens[2], Token::Quoted("table".to_string()));
        assert!(!tokens[2].is_keyword("table"));
        assert_eq!(tokens[4], Token::Quoted("column name".to_string()));
        assert_eq!(tokens[7], Token::Quoted("order".to_string()));
    }

    #[test]
    fn skips_comments() {
        let tokens = kinds("-- comment\nCREATE /* block */ TABLE # mysql\n t (id INT);");

        assert!(tokens[0].is_keyword("CREATE"));
        assert!(tokens[1].is_keyword("TABLE"));
        assert_eq!(tokens[2], Token::Word("t".to_string()));
    }

    #[test]
    fn spans_cover_source_text() {
        let sql = "amount DECIMAL(10, 2)";
        let tokens = Lexer::new(sql).tokenize();

        assert_eq!(&sql[tokens[1].start..tokens[1].end], "DECIMAL");
        let close = tokens.iter().find(|t| t.token == Token::RParen).unwrap();
        assert_eq!(&sql[tokens[1].start..close.end], "DECIMAL(10, 2)");
    }

    #[test]
    fn strings_keep_escaped_quotes() {
        let tokens = kinds("DEFAULT 'it''s'");
        assert_eq!(tokens[1], Token::Str("it's".to_string()));
    }

    #[test]
    fn array_suffix_is_two_symbols() {
        let tokens = kinds("tags TEXT[]");
        assert_eq!(tokens[2], Token::Symbol('['));
        assert_eq!(tokens[3], Token::Symbol(']'));
    }

    #[test]
    fn negative_numbers() {
        let tokens = kinds("DEFAULT -1.5");
        assert_eq!(tokens[1], Token::Num("-1.5".to_string()));
    }

    #[test]
    fn hyphen_inside_a_word_joins_it() {
        let tokens = kinds("CUST-ID CHAR(4), a - b, x--note\n");
        assert_eq!(tokens[0], Token::Word("CUST-ID".to_string()));
        assert_eq!(tokens[6], Token::Word("a".to_string()));
        assert_eq!(tokens[7], Token::Symbol('-'));
        assert_eq!(tokens[10], Token::Word("x".to_string()));
        assert_eq!(tokens[11], Token::Eof);
    }
}
