// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Generalized LR (GLR) parser generator for labelled BNF grammars.
//!
//! The pipeline (spec.md §2): a textual grammar is read by [`frontend`] into
//! an [`ast::Grammar`], lowered by [`normalize`] (C1+C2) into a flat rule
//! list over a canonical symbol table, lifted to LR(0) item sets by [`item`]
//! (C4) and built into a state/transition automaton by [`automaton`] (C5,
//! interning through [`intern`], C3). [`schema`] (C6) derives the AST shape
//! implied by the grammar's labeled productions, and [`emit`] (C7/C8) walks
//! the automaton and schema to write a self-contained GLR parser module.

pub mod ast;
pub mod automaton;
pub mod config;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod frontend;
pub mod intern;
pub mod item;
pub mod normalize;
pub mod schema;
pub mod symbol;

/// A direct interpreter of the §4.7 GLR semantics over the in-memory
/// automaton, used by the scenario tests as a stand-in for "compile the
/// emitted code and run it" (this workspace is built without invoking the
/// Rust toolchain). Not `cfg(test)`-gated so `tests/scenarios.rs` can reach
/// it as an ordinary dependency of the library.
pub mod glrsim;

pub use error::{GenError, GenResult};

/// Runs the full pipeline over grammar specification text and returns the
/// emitted Rust source. This is the one entry point `main.rs` and the
/// end-to-end tests both call; it performs no I/O itself.
pub fn generate(specification_text: &str) -> GenResult<String> {
    let ast_grammar = frontend::parse(specification_text)?;
    let grammar = normalize::normalize(&ast_grammar)?;
    let automaton = automaton::build(&grammar);
    let schema = schema::derive(&grammar);
    let emitter = emit::codegen::Emitter::new(&grammar, &automaton, &schema);
    let mut out = Vec::new();
    emitter
        .write(&mut out)
        .map_err(|source| GenError::Io {
            path: "<memory>".into(),
            source,
        })?;
    Ok(String::from_utf8(out).expect("emitted source is always valid UTF-8"))
}

/// Dumps the LR(0) automaton's states and transitions as plain text, for the
/// optional `--dump-automaton` diagnostic output (spec.md §6 "CLI surface").
pub fn dump_automaton(automaton: &automaton::Automaton) -> String {
    use std::fmt::Write as _;
    let mut out = String::new();
    for state in automaton.states() {
        let (reduce_items, shift_items) = automaton.partition(state);
        writeln!(out, "state {}:", state).unwrap();
        for item in &shift_items {
            let rule = item.rule(&automaton.rules);
            writeln!(out, "    {} -> ... . ...  ({:?})", rule.lhs, rule.constructor).unwrap();
        }
        for item in &reduce_items {
            let rule = item.rule(&automaton.rules);
            writeln!(out, "    reduce {} ({:?})", rule.lhs, rule.constructor).unwrap();
        }
        for t in automaton.transitions_from(state) {
            writeln!(out, "    on {} -> {}", t.symbol, t.to).unwrap();
        }
    }
    out
}
