// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! The input grammar AST (spec.md §6). This is the interface the external
//! front-end parser hands to the core; the core never constructs these
//! values except in `frontend.rs` and in tests.

use std::fmt;

/// A source location, used only for diagnostics. `Span::dummy()` is used by
/// internally-synthesized nodes (`S'`, list-macro expansions) that have no
/// textual origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub fn dummy() -> Self {
        Self::default()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// `attr ∈ {"string", "int", "char", "real"}`, or no attribute at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    String,
    Int,
    Char,
    Real,
}

impl Attr {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Attr::String),
            "int" => Some(Attr::Int),
            "char" => Some(Attr::Char),
            "real" => Some(Attr::Real),
            _ => None,
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Attr::String => "string",
            Attr::Int => "int",
            Attr::Char => "char",
            Attr::Real => "real",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub enum TokenDecl {
    Keyword { span: Span, name: String, literal: String },
    AttrToken { span: Span, name: String, attr: String },
    NoAttrToken { span: Span, name: String },
}

impl TokenDecl {
    pub fn span(&self) -> Span {
        match self {
            TokenDecl::Keyword { span, .. }
            | TokenDecl::AttrToken { span, .. }
            | TokenDecl::NoAttrToken { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinSize {
    Empty,
    Nonempty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Id(Span, String),
    Wild(Span),
    ListE(Span),
    ListCons(Span),
    ListOne(Span),
}

impl Label {
    pub fn span(&self) -> Span {
        match self {
            Label::Id(s, _) | Label::Wild(s) | Label::ListE(s) | Label::ListCons(s) | Label::ListOne(s) => *s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cat {
    IdCat(Span, String),
    ListCat(Span, Box<Cat>),
}

impl Cat {
    pub fn span(&self) -> Span {
        match self {
            Cat::IdCat(s, _) => *s,
            Cat::ListCat(s, _) => *s,
        }
    }

    /// Base identifier with list-brackets stripped, e.g. `[[Exp]]` -> `"Exp"`.
    pub fn base_name(&self) -> &str {
        match self {
            Cat::IdCat(_, name) => name,
            Cat::ListCat(_, inner) => inner.base_name(),
        }
    }

    /// Nesting depth: `Exp` -> 0, `[Exp]` -> 1, `[[Exp]]` -> 2.
    pub fn level(&self) -> u32 {
        match self {
            Cat::IdCat(..) => 0,
            Cat::ListCat(_, inner) => 1 + inner.level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Terminal(Span, String),
    NTerminal(Span, Cat),
}

impl Item {
    pub fn span(&self) -> Span {
        match self {
            Item::Terminal(s, _) => *s,
            Item::NTerminal(s, _) => *s,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Definition {
    Rule { span: Span, label: Label, cat: Cat, items: Vec<Item> },
    Separator { span: Span, minsize: MinSize, cat: Cat, sep: String },
    Terminator { span: Span, minsize: MinSize, cat: Cat, term: String },
    Coercions { span: Span, ident: String, level: u32 },
}

impl Definition {
    pub fn span(&self) -> Span {
        match self {
            Definition::Rule { span, .. }
            | Definition::Separator { span, .. }
            | Definition::Terminator { span, .. }
            | Definition::Coercions { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub span: Span,
    pub token_decls: Vec<TokenDecl>,
    pub definitions: Vec<Definition>,
}
