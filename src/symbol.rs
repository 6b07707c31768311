// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C1: symbol table & kinds (spec.md §3, §4.1).
//!
//! A [`Symbol`] is the triple `(name, level, kind)` from spec.md §3; equality
//! is structural. `(name, level)` determines `kind` within one grammar — the
//! [`SymbolTable`] is the only place that invariant is enforced.

use std::fmt;
use std::rc::Rc;

use crate::ast::Span;
use crate::error::GenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Nonterminal,
    UnitTerminal,
    IntTerminal,
    StringTerminal,
    CharTerminal,
    RealTerminal,
}

impl Kind {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Kind::Nonterminal)
    }

    /// The target-language atomic type carried by a terminal's attribute,
    /// `None` for `UnitTerminal` (no payload) and for `Nonterminal`.
    pub fn attr_type(self) -> Option<&'static str> {
        match self {
            Kind::IntTerminal => Some("i64"),
            Kind::StringTerminal => Some("String"),
            Kind::CharTerminal => Some("char"),
            Kind::RealTerminal => Some("f64"),
            Kind::UnitTerminal | Kind::Nonterminal => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Kind::Nonterminal => "Nonterminal",
            Kind::UnitTerminal => "UnitTerminal",
            Kind::IntTerminal => "IntTerminal",
            Kind::StringTerminal => "StringTerminal",
            Kind::CharTerminal => "CharTerminal",
            Kind::RealTerminal => "RealTerminal",
        };
        write!(f, "{}", s)
    }
}

/// `(name, level, kind)`. `level >= 1` always denotes "list of the same-name
/// symbol at level `level - 1`"; such a symbol is always `Nonterminal`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    name: Rc<str>,
    level: u32,
    kind: Kind,
}

impl Symbol {
    fn new(name: &str, level: u32, kind: Kind) -> Self {
        Self {
            name: Rc::from(name),
            level,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_nonterminal(&self) -> bool {
        self.kind == Kind::Nonterminal
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// The nonterminal one list-level down (`[X]` -> `X`). Only valid when
    /// `level() > 0`.
    pub fn delisted(&self) -> Symbol {
        debug_assert!(self.level > 0);
        Symbol::new(&self.name, self.level - 1, Kind::Nonterminal)
    }

    /// The nonterminal one list-level up (`X` -> `[X]`).
    pub fn listed(&self) -> Symbol {
        Symbol::new(&self.name, self.level + 1, Kind::Nonterminal)
    }

    /// A display name mirroring the surface syntax: `Exp`, `[Exp]`, `[[Exp]]`.
    pub fn surface_name(&self) -> String {
        let mut s = self.name.to_string();
        for _ in 0..self.level {
            s = format!("[{}]", s);
        }
        s
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.surface_name())
    }
}

/// Canonicalizes grammatical symbols. Token declarations are ingested first
/// (C1 "terminal pass") so that a terminal's `kind` is fixed before the
/// normalizer's category pass can discover nonterminals of the same name.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// `(name, level) -> Symbol`, covering both terminals (always level 0)
    /// and nonterminals.
    symbols: std::collections::BTreeMap<(String, u32), Symbol>,
    /// Keyword literal spelling (e.g. `"+"`) -> canonical token name, so rule
    /// right-hand sides may reference either spelling. First declaration
    /// wins on collision (spec.md §9, open question).
    literal_aliases: std::collections::BTreeMap<String, String>,
    defined_at: std::collections::BTreeMap<String, Span>,
}

/// Special symbols, always present (spec.md §3).
pub fn s_prime() -> Symbol {
    Symbol::new("S'", 0, Kind::Nonterminal)
}

pub fn eof() -> Symbol {
    Symbol::new("EOF", 0, Kind::UnitTerminal)
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn existing_kind(&self, name: &str) -> Option<Kind> {
        self.symbols.get(&(name.to_string(), 0)).map(|s| s.kind())
    }

    /// Declares a keyword token, also registering its literal spelling as an
    /// alias. Fatal on kind clash with a prior declaration of the same name.
    pub fn declare_keyword(
        &mut self,
        name: &str,
        literal: &str,
        span: Span,
    ) -> Result<Symbol, GenError> {
        let sym = self.declare_terminal(name, Kind::UnitTerminal, span)?;
        self.literal_aliases
            .entry(literal.to_string())
            .or_insert_with(|| name.to_string());
        Ok(sym)
    }

    /// Declares a token with an explicit attribute type string (spec.md §4.1).
    /// `UnknownTokenType` is fatal if `attr` is not recognized.
    pub fn declare_attr_token(
        &mut self,
        name: &str,
        attr: &str,
        span: Span,
    ) -> Result<Symbol, GenError> {
        let kind = match attr {
            "string" => Kind::StringTerminal,
            "int" => Kind::IntTerminal,
            "char" => Kind::CharTerminal,
            "real" => Kind::RealTerminal,
            other => return Err(GenError::UnknownTokenType(span, other.to_string())),
        };
        self.declare_terminal(name, kind, span)
    }

    pub fn declare_noattr_token(&mut self, name: &str, span: Span) -> Result<Symbol, GenError> {
        self.declare_terminal(name, Kind::UnitTerminal, span)
    }

    fn declare_terminal(&mut self, name: &str, kind: Kind, span: Span) -> Result<Symbol, GenError> {
        if let Some(existing) = self.existing_kind(name) {
            if existing != kind {
                let first = *self.defined_at.get(name).unwrap_or(&Span::dummy());
                return Err(GenError::IncompatibleTokenKind(name.to_string(), first));
            }
            return Ok(self.symbols[&(name.to_string(), 0)].clone());
        }
        let symbol = Symbol::new(name, 0, kind);
        self.symbols.insert((name.to_string(), 0), symbol.clone());
        self.defined_at.insert(name.to_string(), span);
        Ok(symbol)
    }

    /// Returns (and creates if absent) the nonterminal `(name, level)`. Used
    /// by the normalizer's category pass for every category reference,
    /// including the `level-1` base of any `[X]` it meets.
    pub fn nonterminal(&mut self, name: &str, level: u32) -> Symbol {
        if let Some(existing) = self.symbols.get(&(name.to_string(), level)) {
            return existing.clone();
        }
        let symbol = Symbol::new(name, level, Kind::Nonterminal);
        self.symbols
            .insert((name.to_string(), level), symbol.clone());
        symbol
    }

    /// Resolves an rhs `Item::Terminal` literal: either a previously
    /// registered keyword alias, or a bare registered token name.
    pub fn resolve_literal(&self, literal: &str) -> Option<Symbol> {
        if let Some(name) = self.literal_aliases.get(literal) {
            return self.symbols.get(&(name.clone(), 0)).cloned();
        }
        self.symbols.get(&(literal.to_string(), 0)).cloned()
    }

    pub fn lookup_terminal_by_name(&self, name: &str) -> Option<Symbol> {
        self.symbols
            .get(&(name.to_string(), 0))
            .filter(|s| s.is_terminal())
            .cloned()
    }

    pub fn all_terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values().filter(|s| s.is_terminal())
    }

    pub fn all_nonterminals(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values().filter(|s| s.is_nonterminal())
    }

    /// Registers (or reuses) a core-synthesized literal terminal, such as the
    /// parentheses a `coercions` macro introduces around its atomic case.
    /// Unlike user right-hand-side items, these never fail to resolve: the
    /// core is the one introducing them.
    pub fn literal_terminal_synth(&mut self, literal: &str) -> Symbol {
        if let Some(existing) = self.resolve_literal(literal) {
            return existing;
        }
        self.declare_keyword(literal, literal, Span::dummy())
            .expect("synthesized literal terminal never clashes kind")
    }
}
