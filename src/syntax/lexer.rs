//! A hand-written lexer for ByteLog source text.
//!
//! Line-oriented, case-insensitive keywords, comments to end-of-line
//! introduced by `;` or `//`. Small enough not to warrant a lexer-generator
//! crate.

use crate::error::ByteLogError;
use crate::syntax::token::{keyword, Token, TokenKind};

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, ByteLogError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let at_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if at_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.advance();
                }
                Some(b';') => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some(b'/') if self.source.get(self.pos + 1) == Some(&b'/') => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ByteLogError> {
        self.skip_whitespace_and_comments();

        let (line, column) = (self.line, self.column);

        let ch = match self.peek() {
            None => return Ok(Token::new(TokenKind::Eof, line, column)),
            Some(c) => c,
        };

        match ch {
            b':' => {
                self.advance();
                Ok(Token::new(TokenKind::Colon, line, column))
            }
            b',' => {
                self.advance();
                Ok(Token::new(TokenKind::Comma, line, column))
            }
            b'?' => {
                self.advance();
                Ok(Token::new(TokenKind::Wildcard, line, column))
            }
            b'$' => {
                self.advance();
                let digits = self.take_while(|c| c.is_ascii_digit());
                if digits.is_empty() {
                    return Err(ByteLogError::Parse {
                        line,
                        column,
                        message: "expected digits after '$'".to_string(),
                    });
                }
                let index: usize = digits.parse().map_err(|_| ByteLogError::Parse {
                    line,
                    column,
                    message: format!("register index '{digits}' is out of range"),
                })?;
                Ok(Token::new(TokenKind::Var(index), line, column))
            }
            b'-' | b'0'..=b'9' => {
                let start = self.pos;
                if ch == b'-' {
                    self.advance();
                }
                let digits = self.take_while(|c| c.is_ascii_digit());
                if digits.is_empty() {
                    return Err(ByteLogError::Parse {
                        line,
                        column,
                        message: "expected digits in integer literal".to_string(),
                    });
                }
                let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap();
                let value: i64 = text.parse().map_err(|_| ByteLogError::Parse {
                    line,
                    column,
                    message: format!("'{text}' is not a valid integer literal"),
                })?;
                Ok(Token::new(TokenKind::Int(value), line, column))
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let ident = self.take_while(|c| c.is_ascii_alphanumeric() || c == b'_');
                let kind = keyword(&ident).unwrap_or(TokenKind::Ident(ident));
                Ok(Token::new(kind, line, column))
            }
            other => Err(ByteLogError::Parse {
                line,
                column,
                message: format!("unexpected character '{}'", other as char),
            }),
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
        String::from_utf8_lossy(&self.source[start..self.pos]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_a_fact_statement() {
        assert_eq!(
            kinds("FACT parent alice -17"),
            vec![
                TokenKind::Fact,
                TokenKind::Ident("parent".to_string()),
                TokenKind::Ident("alice".to_string()),
                TokenKind::Int(-17),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            kinds("rel Parent"),
            vec![
                TokenKind::Rel,
                TokenKind::Ident("Parent".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_both_comment_styles() {
        assert_eq!(
            kinds("SOLVE ; a trailing remark\n// another\nQUERY"),
            vec![TokenKind::Solve, TokenKind::Query, TokenKind::Eof]
        );
    }

    #[test]
    fn variables_and_wildcards() {
        assert_eq!(
            kinds("$0 $12 ?"),
            vec![
                TokenKind::Var(0),
                TokenKind::Var(12),
                TokenKind::Wildcard,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn rejects_bare_dollar() {
        assert!(Lexer::new("$").tokenize().is_err());
    }

    #[test]
    fn reports_line_and_column() {
        let tokens = Lexer::new("REL a\nFACT a 1 2").tokenize().unwrap();
        let fact = &tokens[2];
        assert_eq!(fact.line, 2);
        assert_eq!(fact.column, 1);
    }
}
