//! # Tag Expression Module / 标签表达式模块
//!
//! Parses a textual tag-filter expression into a [`Condition`] AST before a
//! run starts. The grammar is:
//!
//! ```text
//! expr    := or
//! or      := and ( "or" and )*
//! and     := not ( "and" not )*
//! not     := "not" not | primary
//! primary := "(" expr ")" | TAG
//! ```
//!
//! Blank input parses to [`Condition::EMPTY`], which matches everything.
//!
//! 在运行开始前将文本标签过滤表达式解析为 [`Condition`] AST。
//! 空白输入解析为 [`Condition::EMPTY`]，匹配所有内容。

use crate::core::condition::Condition;
use anyhow::{Result, bail};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    Word(String),
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in input.chars() {
        match c {
            '(' | ')' => {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
                tokens.push(if c == '(' { Token::LParen } else { Token::RParen });
            }
            c if c.is_whitespace() => {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
            }
            c => word.push(c),
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(Token::Word(w)) if w == keyword) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expr(&mut self) -> Result<Condition> {
        self.or()
    }

    fn or(&mut self) -> Result<Condition> {
        let mut terms = vec![self.and()?];
        while self.eat_keyword("or") {
            terms.push(self.and()?);
        }
        if terms.len() == 1 {
            return Ok(terms.remove(0));
        }
        // Build the combinator through the generic rebuild operation.
        Ok(Condition::Or(Vec::new()).with_children(terms))
    }

    fn and(&mut self) -> Result<Condition> {
        let mut terms = vec![self.not()?];
        while self.eat_keyword("and") {
            terms.push(self.not()?);
        }
        if terms.len() == 1 {
            return Ok(terms.remove(0));
        }
        Ok(Condition::And(Vec::new()).with_children(terms))
    }

    fn not(&mut self) -> Result<Condition> {
        if self.eat_keyword("not") {
            return Ok(Condition::Not(Box::new(self.not()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Condition> {
        match self.next() {
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => bail!("expected ')' at token {}", self.pos),
                }
            }
            Some(Token::Word(w)) if w != "and" && w != "or" && w != "not" => {
                Ok(Condition::Contains(w))
            }
            Some(token) => bail!("unexpected token {:?} at position {}", token, self.pos),
            None => bail!("unexpected end of tag expression"),
        }
    }
}

/// Parses a tag-filter expression into a [`Condition`].
///
/// # Example
/// ```rust
/// # use spec_runner::core::expression::parse;
/// let condition = parse("integration and not slow").unwrap();
/// ```
pub fn parse(input: &str) -> Result<Condition> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Ok(Condition::EMPTY);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let condition = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        bail!(
            "trailing input in tag expression at token {} of {}",
            parser.pos + 1,
            parser.tokens.len()
        );
    }
    Ok(condition)
}
