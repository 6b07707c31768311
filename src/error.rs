// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
use std::path::PathBuf;

use thiserror::Error;

use crate::ast::Span;

/// The fatal conditions a generation run can end in (spec.md §7). Every
/// variant here is surfaced once, on the error stream, and terminates
/// generation; there is no partial-output guarantee.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("{0}: unknown token attribute type {1:?}")]
    UnknownTokenType(Span, String),

    #[error("{0}: undefined symbol {1:?}")]
    UndefinedSymbol(Span, String),

    #[error("{0}: {1:?} is a terminal and cannot appear on the left-hand side of a rule")]
    NonterminalRequired(Span, String),

    #[error("incompatible redeclaration of token {0:?} (first declared {1})")]
    IncompatibleTokenKind(String, Span),

    #[error("grammar parse failure: {0}")]
    GrammarParseFailure(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported emission target {0:?}")]
    UnsupportedTarget(String),

    #[error("output file {0:?} already exists (use --force to overwrite)")]
    OutputExists(PathBuf),
}

pub type GenResult<T> = Result<T, GenError>;
