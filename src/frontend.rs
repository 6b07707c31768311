// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! A minimal hand-written reader for the textual labelled-BNF grammar
//! dialect this generator accepts, producing [`crate::ast::Grammar`] values
//! for the core to normalize.
//!
//! The grammar-text syntax and any full-blown lexer generator are out of
//! this crate's scope (spec.md §1 treats them as external collaborators);
//! this module is the minimal adapter needed to drive the core end to end.
//! It also owns one convenience the core deliberately does not provide: an
//! inline string literal used in a rule's right-hand side that was never
//! declared with `token` is auto-registered as a keyword, named after its
//! own spelling (see [`crate::normalize`] module doc for why the core
//! itself treats that as a fatal `UndefinedSymbol`).
//!
//! Surface syntax, by example:
//!
//! ```text
//! token Integer int ;
//! token Ident string ;
//!
//! EInt.  Exp1 ::= Integer ;
//! ESub.  Exp  ::= Exp "-" Exp ;
//! _.     Exp  ::= Exp1 ;
//!
//! separator Exp "," ;
//! terminator nonempty Stm ";" ;
//! coercions Exp 2 ;
//! ```

use std::collections::HashSet;

use crate::ast::{self, Cat, Definition, Item, Label, MinSize, Span, TokenDecl};
use crate::error::GenError;

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Str(String),
    Int(u32),
    ColonColonEq,
    Dot,
    Semi,
    Comma,
    LBracket,
    RBracket,
    Colon,
    Underscore,
    Eof,
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(b)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_byte() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.advance();
                }
                Some(b'-') if self.bytes.get(self.pos + 1) == Some(&b'-') => {
                    while let Some(b) = self.peek_byte() {
                        if b == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn next(&mut self) -> Result<(Tok, Span), GenError> {
        self.skip_trivia();
        let span = Span::new(self.line, self.column);
        let b = match self.peek_byte() {
            None => return Ok((Tok::Eof, span)),
            Some(b) => b,
        };
        match b {
            b'.' => {
                self.advance();
                Ok((Tok::Dot, span))
            }
            b';' => {
                self.advance();
                Ok((Tok::Semi, span))
            }
            b',' => {
                self.advance();
                Ok((Tok::Comma, span))
            }
            b'[' => {
                self.advance();
                Ok((Tok::LBracket, span))
            }
            b']' => {
                self.advance();
                Ok((Tok::RBracket, span))
            }
            b'_' if !self.bytes.get(self.pos + 1).map(|c| c.is_ascii_alphanumeric()).unwrap_or(false) => {
                self.advance();
                Ok((Tok::Underscore, span))
            }
            b':' => {
                self.advance();
                if self.peek_byte() == Some(b':') {
                    self.advance();
                    if self.peek_byte() == Some(b'=') {
                        self.advance();
                        return Ok((Tok::ColonColonEq, span));
                    }
                    return Err(GenError::GrammarParseFailure(format!(
                        "{}: expected '::=' ",
                        span
                    )));
                }
                Ok((Tok::Colon, span))
            }
            b'"' => {
                self.advance();
                let mut s = String::new();
                loop {
                    match self.advance() {
                        None => {
                            return Err(GenError::GrammarParseFailure(format!(
                                "{}: unterminated string literal",
                                span
                            )))
                        }
                        Some(b'"') => break,
                        Some(b'\\') => {
                            if let Some(escaped) = self.advance() {
                                s.push(escaped as char);
                            }
                        }
                        Some(c) => s.push(c as char),
                    }
                }
                Ok((Tok::Str(s), span))
            }
            b if b.is_ascii_digit() => {
                let start = self.pos;
                while self.peek_byte().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    self.advance();
                }
                let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap();
                let n: u32 = text
                    .parse()
                    .map_err(|_| GenError::GrammarParseFailure(format!("{}: bad integer literal", span)))?;
                Ok((Tok::Int(n), span))
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let start = self.pos;
                while self
                    .peek_byte()
                    .map(|c| c.is_ascii_alphanumeric() || c == b'_' || c == b'\'')
                    .unwrap_or(false)
                {
                    self.advance();
                }
                let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap().to_string();
                Ok((Tok::Ident(text), span))
            }
            other => Err(GenError::GrammarParseFailure(format!(
                "{}: unexpected character {:?}",
                span, other as char
            ))),
        }
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: (Tok, Span),
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Result<Self, GenError> {
        let mut lexer = Lexer::new(text);
        let lookahead = lexer.next()?;
        Ok(Self { lexer, lookahead })
    }

    fn bump(&mut self) -> Result<(Tok, Span), GenError> {
        let next = self.lexer.next()?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    fn expect(&mut self, expected: &Tok) -> Result<Span, GenError> {
        if &self.lookahead.0 == expected {
            let (_, span) = self.bump()?;
            Ok(span)
        } else {
            Err(GenError::GrammarParseFailure(format!(
                "{}: expected {:?}, found {:?}",
                self.lookahead.1, expected, self.lookahead.0
            )))
        }
    }

    fn expect_ident(&mut self, word: &str) -> Result<Span, GenError> {
        match &self.lookahead.0 {
            Tok::Ident(s) if s == word => {
                let (_, span) = self.bump()?;
                Ok(span)
            }
            other => Err(GenError::GrammarParseFailure(format!(
                "{}: expected {:?}, found {:?}",
                self.lookahead.1, word, other
            ))),
        }
    }

    fn at_ident(&self, word: &str) -> bool {
        matches!(&self.lookahead.0, Tok::Ident(s) if s == word)
    }

    fn parse_grammar(mut self) -> Result<ast::Grammar, GenError> {
        let span = self.lookahead.1;
        let mut token_decls = Vec::new();
        let mut definitions = Vec::new();
        while self.lookahead.0 != Tok::Eof {
            if self.at_ident("token") {
                token_decls.push(self.parse_token_decl()?);
            } else {
                definitions.push(self.parse_definition()?);
            }
        }
        Ok(ast::Grammar {
            span,
            token_decls,
            definitions,
        })
    }

    fn parse_token_decl(&mut self) -> Result<TokenDecl, GenError> {
        let span = self.expect_ident("token")?;
        let name = self.parse_plain_ident()?;
        let decl = match &self.lookahead.0 {
            Tok::Ident(attr) if matches!(attr.as_str(), "int" | "string" | "char" | "real") => {
                let attr = attr.clone();
                self.bump()?;
                TokenDecl::AttrToken { span, name, attr }
            }
            Tok::Str(literal) => {
                let literal = literal.clone();
                self.bump()?;
                TokenDecl::Keyword { span, name, literal }
            }
            _ => TokenDecl::NoAttrToken { span, name },
        };
        self.expect(&Tok::Semi)?;
        Ok(decl)
    }

    fn parse_plain_ident(&mut self) -> Result<String, GenError> {
        match self.bump()? {
            (Tok::Ident(s), _) => Ok(s),
            (other, span) => Err(GenError::GrammarParseFailure(format!(
                "{}: expected identifier, found {:?}",
                span, other
            ))),
        }
    }

    fn parse_string(&mut self) -> Result<String, GenError> {
        match self.bump()? {
            (Tok::Str(s), _) => Ok(s),
            (other, span) => Err(GenError::GrammarParseFailure(format!(
                "{}: expected string literal, found {:?}",
                span, other
            ))),
        }
    }

    fn parse_minsize(&mut self) -> MinSize {
        if self.at_ident("nonempty") {
            self.bump().ok();
            MinSize::Nonempty
        } else {
            if self.at_ident("empty") {
                self.bump().ok();
            }
            MinSize::Empty
        }
    }

    fn parse_cat(&mut self) -> Result<Cat, GenError> {
        let span = self.lookahead.1;
        if self.lookahead.0 == Tok::LBracket {
            self.bump()?;
            let inner = self.parse_cat()?;
            self.expect(&Tok::RBracket)?;
            Ok(Cat::ListCat(span, Box::new(inner)))
        } else {
            let name = self.parse_plain_ident()?;
            Ok(Cat::IdCat(span, name))
        }
    }

    fn parse_label(&mut self) -> Result<Label, GenError> {
        let span = self.lookahead.1;
        match &self.lookahead.0 {
            Tok::Underscore => {
                self.bump()?;
                Ok(Label::Wild(span))
            }
            Tok::LBracket => {
                self.bump()?;
                self.expect(&Tok::RBracket)?;
                Ok(Label::ListE(span))
            }
            Tok::Colon => {
                self.bump()?;
                if self.lookahead.0 == Tok::LBracket {
                    self.bump()?;
                    self.expect(&Tok::RBracket)?;
                    Ok(Label::ListOne(span))
                } else {
                    Ok(Label::ListCons(span))
                }
            }
            Tok::Ident(_) => {
                let name = self.parse_plain_ident()?;
                Ok(Label::Id(span, name))
            }
            other => Err(GenError::GrammarParseFailure(format!(
                "{}: expected a rule label, found {:?}",
                span, other
            ))),
        }
    }

    fn parse_item(&mut self) -> Result<Item, GenError> {
        let span = self.lookahead.1;
        if let Tok::Str(_) = &self.lookahead.0 {
            let literal = self.parse_string()?;
            Ok(Item::Terminal(span, literal))
        } else {
            let cat = self.parse_cat()?;
            Ok(Item::NTerminal(span, cat))
        }
    }

    fn parse_definition(&mut self) -> Result<Definition, GenError> {
        let span = self.lookahead.1;
        if self.at_ident("separator") {
            self.bump()?;
            let minsize = self.parse_minsize();
            let cat = self.parse_cat()?;
            let sep = self.parse_string()?;
            self.expect(&Tok::Semi)?;
            return Ok(Definition::Separator { span, minsize, cat, sep });
        }
        if self.at_ident("terminator") {
            self.bump()?;
            let minsize = self.parse_minsize();
            let cat = self.parse_cat()?;
            let term = self.parse_string()?;
            self.expect(&Tok::Semi)?;
            return Ok(Definition::Terminator { span, minsize, cat, term });
        }
        if self.at_ident("coercions") {
            self.bump()?;
            let ident = self.parse_plain_ident()?;
            let level = match self.bump()? {
                (Tok::Int(n), _) => n,
                (other, s) => {
                    return Err(GenError::GrammarParseFailure(format!(
                        "{}: expected coercion level, found {:?}",
                        s, other
                    )))
                }
            };
            self.expect(&Tok::Semi)?;
            return Ok(Definition::Coercions { span, ident, level });
        }
        let label = self.parse_label()?;
        self.expect(&Tok::Dot)?;
        let cat = self.parse_cat()?;
        self.expect(&Tok::ColonColonEq)?;
        let mut items = Vec::new();
        while self.lookahead.0 != Tok::Semi {
            items.push(self.parse_item()?);
        }
        self.expect(&Tok::Semi)?;
        Ok(Definition::Rule { span, label, cat, items })
    }
}

/// Parses grammar-specification text into an [`ast::Grammar`], then appends
/// one synthesized [`TokenDecl::Keyword`] for every literal used in an item
/// position that was never declared with an explicit `token` line.
pub fn parse(text: &str) -> Result<ast::Grammar, GenError> {
    let parser = Parser::new(text)?;
    let mut grammar = parser.parse_grammar()?;
    auto_register_literals(&mut grammar);
    Ok(grammar)
}

fn auto_register_literals(grammar: &mut ast::Grammar) {
    let mut declared: HashSet<String> = grammar
        .token_decls
        .iter()
        .filter_map(|d| match d {
            TokenDecl::Keyword { literal, .. } => Some(literal.clone()),
            _ => None,
        })
        .collect();
    let mut to_add = Vec::new();
    for def in &grammar.definitions {
        if let Definition::Rule { items, .. } = def {
            for item in items {
                if let Item::Terminal(span, literal) = item {
                    if declared.insert(literal.clone()) {
                        to_add.push(TokenDecl::Keyword {
                            span: *span,
                            name: literal.clone(),
                            literal: literal.clone(),
                        });
                    }
                }
            }
        }
    }
    for def in &grammar.definitions {
        let (span, literal) = match def {
            Definition::Separator { span, sep, .. } => (*span, sep.clone()),
            Definition::Terminator { span, term, .. } => (*span, term.clone()),
            _ => continue,
        };
        if declared.insert(literal.clone()) {
            to_add.push(TokenDecl::Keyword {
                span,
                name: literal.clone(),
                literal,
            });
        }
    }
    grammar.token_decls.extend(to_add);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn parses_simple_arithmetic_grammar() {
        let text = r#"
            token Integer int ;

            EInt. Exp ::= Integer ;
            ESub. Exp ::= Exp "-" Exp ;
        "#;
        let grammar = parse(text).unwrap();
        assert_eq!(grammar.definitions.len(), 2);
        // "-" was never declared with `token`, frontend auto-registers it.
        assert!(grammar
            .token_decls
            .iter()
            .any(|d| matches!(d, TokenDecl::Keyword { literal, .. } if literal == "-")));
        let normalized = normalize(&grammar).unwrap();
        assert_eq!(normalized.rules.len(), 2);
    }

    #[test]
    fn parses_separator_and_coercions() {
        let text = r#"
            token Integer int ;

            EInt. Exp1 ::= Integer ;
            coercions Exp 1 ;
            separator Exp "," ;
        "#;
        let grammar = parse(text).unwrap();
        let normalized = normalize(&grammar).unwrap();
        assert!(normalized
            .nonterms
            .iter()
            .any(|s| s.name() == "Exp" && s.level() == 1));
    }

    #[test]
    fn parses_wild_and_list_labels() {
        let text = r#"
            token Integer int ;

            EInt.  Exp1 ::= Integer ;
            _.     Exp  ::= Exp1 ;
            [].    [Exp] ::= ;
            :.     [Exp] ::= Exp "," [Exp] ;
        "#;
        let grammar = parse(text).unwrap();
        assert_eq!(grammar.definitions.len(), 4);
    }

    #[test]
    fn rejects_malformed_input() {
        let text = "EInt Exp ::= Integer ;";
        assert!(parse(text).is_err());
    }
}
