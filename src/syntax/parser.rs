//! A recursive-descent parser over the token stream from [`crate::syntax::lexer`].
//!
//! The language surface is fixed by the grammar; the shape of the parser
//! itself is a routine exercise, not the interesting part of this crate.

use crate::error::ByteLogError;
use crate::syntax::ast::{BodyOpAst, EmitAst, QueryArgAst, RuleAst, Statement, TermAst};
use crate::syntax::lexer::Lexer;
use crate::syntax::token::{Token, TokenKind};

pub fn parse_program(source: &str) -> Result<Vec<Statement>, ByteLogError> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: impl Into<String>) -> ByteLogError {
        let tok = self.peek();
        ByteLogError::Parse {
            line: tok.line,
            column: tok.column,
            message: message.into(),
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ByteLogError> {
        if &self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error(format!(
                "expected {:?}, found {:?}",
                kind,
                self.peek().kind
            )))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ByteLogError> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.error(format!("expected an identifier, found {other:?}"))),
        }
    }

    fn expect_var(&mut self) -> Result<usize, ByteLogError> {
        match self.peek().kind.clone() {
            TokenKind::Var(index) => {
                self.advance();
                Ok(index)
            }
            other => Err(self.error(format!("expected a '$' register, found {other:?}"))),
        }
    }

    fn expect_term(&mut self) -> Result<TermAst, ByteLogError> {
        match self.peek().kind.clone() {
            TokenKind::Int(value) => {
                self.advance();
                Ok(TermAst::Int(value))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(TermAst::Atom(name))
            }
            other => Err(self.error(format!(
                "expected an integer or bareword atom, found {other:?}"
            ))),
        }
    }

    fn parse_program(&mut self) -> Result<Vec<Statement>, ByteLogError> {
        let mut statements = Vec::new();
        while self.peek().kind != TokenKind::Eof {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement, ByteLogError> {
        match self.peek().kind.clone() {
            TokenKind::Rel => self.parse_rel_decl(),
            TokenKind::Fact => self.parse_fact(),
            TokenKind::Rule => self.parse_rule(),
            TokenKind::Solve => {
                self.advance();
                Ok(Statement::Solve)
            }
            TokenKind::Query => self.parse_query(),
            other => Err(self.error(format!(
                "expected a statement keyword (REL, FACT, RULE, SOLVE, QUERY), found {other:?}"
            ))),
        }
    }

    fn parse_rel_decl(&mut self) -> Result<Statement, ByteLogError> {
        self.expect(&TokenKind::Rel)?;
        let name = self.expect_ident()?;
        Ok(Statement::RelDecl { name })
    }

    fn parse_fact(&mut self) -> Result<Statement, ByteLogError> {
        self.expect(&TokenKind::Fact)?;
        let relation = self.expect_ident()?;
        let a = self.expect_term()?;
        let b = self.expect_term()?;
        Ok(Statement::Fact { relation, a, b })
    }

    fn parse_query(&mut self) -> Result<Statement, ByteLogError> {
        self.expect(&TokenKind::Query)?;
        let relation = self.expect_ident()?;
        let arg_a = self.parse_query_arg()?;
        let arg_b = self.parse_query_arg()?;
        Ok(Statement::Query {
            relation,
            arg_a,
            arg_b,
        })
    }

    fn parse_query_arg(&mut self) -> Result<QueryArgAst, ByteLogError> {
        if self.peek().kind == TokenKind::Wildcard {
            self.advance();
            Ok(QueryArgAst::Wildcard)
        } else {
            Ok(QueryArgAst::Concrete(self.expect_term()?))
        }
    }

    fn parse_rule(&mut self) -> Result<Statement, ByteLogError> {
        let head = self.expect(&TokenKind::Rule)?;
        let target = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;

        let mut body = Vec::new();
        let emit = loop {
            match self.peek().kind.clone() {
                TokenKind::Scan => {
                    body.push(self.parse_scan_op()?);
                    self.expect(&TokenKind::Comma)?;
                }
                TokenKind::Join => {
                    body.push(self.parse_join_op()?);
                    self.expect(&TokenKind::Comma)?;
                }
                TokenKind::Emit => {
                    break self.parse_emit()?;
                }
                other => {
                    return Err(self.error(format!(
                        "expected SCAN, JOIN, or EMIT in rule body, found {other:?}"
                    )))
                }
            }
        };

        Ok(Statement::Rule(RuleAst {
            target,
            body,
            emit,
            line: head.line,
            column: head.column,
        }))
    }

    fn parse_scan_op(&mut self) -> Result<BodyOpAst, ByteLogError> {
        self.expect(&TokenKind::Scan)?;
        let relation = self.expect_ident()?;
        let match_var = if self.peek().kind == TokenKind::Match {
            self.advance();
            Some(self.expect_var()?)
        } else {
            None
        };
        Ok(BodyOpAst::Scan {
            relation,
            match_var,
        })
    }

    fn parse_join_op(&mut self) -> Result<BodyOpAst, ByteLogError> {
        self.expect(&TokenKind::Join)?;
        let relation = self.expect_ident()?;
        let var = self.expect_var()?;
        Ok(BodyOpAst::Join { relation, var })
    }

    fn parse_emit(&mut self) -> Result<EmitAst, ByteLogError> {
        self.expect(&TokenKind::Emit)?;
        let relation = self.expect_ident()?;
        let var_a = self.expect_var()?;
        let var_b = self.expect_var()?;
        Ok(EmitAst {
            relation,
            var_a,
            var_b,
        })
    }
}
