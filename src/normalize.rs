// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C2: grammar normalizer (spec.md §4.2).
//!
//! Lowers the surface grammar AST (`crate::ast`) into the flat, canonical
//! `(label, lhs, rhs)` rule list of spec.md §3, expanding `separator`,
//! `terminator` and `coercions` macros along the way.

use std::collections::BTreeSet;

use crate::ast;
use crate::error::GenError;
use crate::symbol::{self, Kind, Symbol, SymbolTable};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Constructor {
    Named(String),
    Wild,
    ListEmpty,
    ListCons,
    ListOne,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rule {
    pub constructor: Constructor,
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl Rule {
    pub fn new(constructor: Constructor, lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { constructor, lhs, rhs }
    }
}

#[derive(Debug)]
pub struct Grammar {
    pub symbol_table: SymbolTable,
    pub terms: BTreeSet<Symbol>,
    pub nonterms: BTreeSet<Symbol>,
    pub rules: Vec<Rule>,
    pub start: Symbol,
}

/// Resolves (or registers) the nonterminal a `Cat` denotes, treating an
/// already-declared terminal of the same base name as *the terminal*, never
/// shadowing it with a nonterminal of the same name — token declarations are
/// ingested before this runs precisely so this check is meaningful (spec.md
/// §4.1).
fn resolve_cat(table: &mut SymbolTable, cat: &ast::Cat) -> Symbol {
    match cat {
        ast::Cat::IdCat(_, name) => {
            if let Some(term) = table.lookup_terminal_by_name(name) {
                term
            } else {
                table.nonterminal(name, 0)
            }
        }
        ast::Cat::ListCat(_, inner) => {
            let inner_sym = resolve_cat(table, inner);
            table.nonterminal(inner_sym.name(), inner_sym.level() + 1)
        }
    }
}

/// As [`resolve_cat`], but a category that turns out to name an existing
/// terminal is a fatal `NonterminalRequired` — used where `cat` is about to
/// become the left-hand side of a rule (spec.md §7).
fn resolve_cat_as_lhs(table: &mut SymbolTable, cat: &ast::Cat, span: ast::Span) -> Result<Symbol, GenError> {
    let base_name = cat.base_name();
    if let Some(term) = table.lookup_terminal_by_name(base_name) {
        let _ = term;
        return Err(GenError::NonterminalRequired(span, base_name.to_string()));
    }
    Ok(resolve_cat(table, cat))
}

fn resolve_rhs_terminal(table: &SymbolTable, span: ast::Span, literal: &str) -> Result<Symbol, GenError> {
    table
        .resolve_literal(literal)
        .ok_or_else(|| GenError::UndefinedSymbol(span, literal.to_string()))
}

fn ingest_token_decls(table: &mut SymbolTable, decls: &[ast::TokenDecl]) -> Result<(), GenError> {
    for decl in decls {
        match decl {
            ast::TokenDecl::Keyword { span, name, literal } => {
                table.declare_keyword(name, literal, *span)?;
            }
            ast::TokenDecl::AttrToken { span, name, attr } => {
                table.declare_attr_token(name, attr, *span)?;
            }
            ast::TokenDecl::NoAttrToken { span, name } => {
                table.declare_noattr_token(name, *span)?;
            }
        }
    }
    Ok(())
}

fn category_pass(table: &mut SymbolTable, grammar: &ast::Grammar) -> Result<(), GenError> {
    for def in &grammar.definitions {
        match def {
            ast::Definition::Rule { span, cat, items, .. } => {
                resolve_cat_as_lhs(table, cat, *span)?;
                for item in items {
                    if let ast::Item::NTerminal(_, c) = item {
                        resolve_cat(table, c);
                    }
                }
            }
            ast::Definition::Separator { span, cat, .. } | ast::Definition::Terminator { span, cat, .. } => {
                let elem = resolve_cat_as_lhs(table, cat, *span)?;
                table.nonterminal(elem.name(), elem.level() + 1);
            }
            ast::Definition::Coercions { ident, level, .. } => {
                table.nonterminal(ident, 0);
                for i in 1..=*level {
                    table.nonterminal(&format!("{}{}", ident, i), 0);
                }
            }
        }
    }
    Ok(())
}

fn expand_rule(table: &mut SymbolTable, rules: &mut Vec<Rule>, def: &ast::Definition) -> Result<(), GenError> {
    match def {
        ast::Definition::Rule { span, label, cat, items } => {
            let lhs = resolve_cat_as_lhs(table, cat, *span)?;
            let mut rhs = Vec::with_capacity(items.len());
            for item in items {
                let sym = match item {
                    ast::Item::Terminal(s, literal) => resolve_rhs_terminal(table, *s, literal)?,
                    ast::Item::NTerminal(_, c) => resolve_cat(table, c),
                };
                rhs.push(sym);
            }
            let constructor = match label {
                ast::Label::Id(_, name) => Constructor::Named(name.clone()),
                ast::Label::Wild(_) => Constructor::Wild,
                ast::Label::ListE(_) => Constructor::ListEmpty,
                ast::Label::ListCons(_) => Constructor::ListCons,
                ast::Label::ListOne(_) => Constructor::ListOne,
            };
            rules.push(Rule::new(constructor, lhs, rhs));
        }
        ast::Definition::Separator { span, minsize, cat, sep } => {
            let elem = resolve_cat_as_lhs(table, cat, *span)?;
            let list = table.nonterminal(elem.name(), elem.level() + 1);
            if *minsize == ast::MinSize::Empty {
                rules.push(Rule::new(Constructor::ListEmpty, list.clone(), vec![]));
            }
            rules.push(Rule::new(Constructor::ListOne, list.clone(), vec![elem.clone()]));
            let sep_sym = resolve_rhs_terminal(table, *span, sep)?;
            rules.push(Rule::new(
                Constructor::ListCons,
                list.clone(),
                vec![elem, sep_sym, list],
            ));
        }
        ast::Definition::Terminator { span, minsize, cat, term } => {
            let elem = resolve_cat_as_lhs(table, cat, *span)?;
            let list = table.nonterminal(elem.name(), elem.level() + 1);
            let term_sym = resolve_rhs_terminal(table, *span, term)?;
            if *minsize == ast::MinSize::Empty {
                rules.push(Rule::new(Constructor::ListEmpty, list.clone(), vec![]));
            }
            rules.push(Rule::new(
                Constructor::ListOne,
                list.clone(),
                vec![elem.clone(), term_sym.clone()],
            ));
            rules.push(Rule::new(
                Constructor::ListCons,
                list.clone(),
                vec![elem, term_sym, list],
            ));
        }
        ast::Definition::Coercions { ident, level, .. } => {
            let n0 = table.nonterminal(ident, 0);
            let mut levels = vec![n0.clone()];
            for i in 1..=*level {
                levels.push(table.nonterminal(&format!("{}{}", ident, i), 0));
            }
            for i in 1..=(*level as usize) {
                rules.push(Rule::new(
                    Constructor::Wild,
                    levels[i - 1].clone(),
                    vec![levels[i].clone()],
                ));
            }
            let lparen = table.literal_terminal_synth("(");
            let rparen = table.literal_terminal_synth(")");
            let nk = levels[*level as usize].clone();
            rules.push(Rule::new(Constructor::Wild, nk, vec![lparen, n0, rparen]));
        }
    }
    Ok(())
}

/// Runs the three passes of spec.md §4.2 and returns the canonical grammar.
/// `start` is the lhs of the first rule this pass emits (spec.md §4.2,
/// "Rule ordering").
pub fn normalize(ast_grammar: &ast::Grammar) -> Result<Grammar, GenError> {
    let mut table = SymbolTable::new();
    ingest_token_decls(&mut table, &ast_grammar.token_decls)?;
    category_pass(&mut table, ast_grammar)?;

    let mut rules = Vec::new();
    for def in &ast_grammar.definitions {
        expand_rule(&mut table, &mut rules, def)?;
    }

    let start = rules
        .first()
        .map(|r| r.lhs.clone())
        .unwrap_or_else(symbol::s_prime);

    let mut terms: BTreeSet<Symbol> = table.all_terminals().cloned().collect();
    let mut nonterms: BTreeSet<Symbol> = table.all_nonterminals().cloned().collect();
    terms.insert(symbol::eof());
    nonterms.insert(symbol::s_prime());

    debug_assert!(
        rules.iter().all(|r| r.lhs.kind() == Kind::Nonterminal),
        "every rule's lhs must be a nonterminal"
    );

    Ok(Grammar {
        symbol_table: table,
        terms,
        nonterms,
        rules,
        start,
    })
}
