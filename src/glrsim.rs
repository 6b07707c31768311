// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! A direct simulation of the GLR semantics specified in spec.md §4.7,
//! executed against the in-memory [`automaton::Automaton`] rather than
//! against compiled output. It shares no code with [`emit::codegen`]; it
//! re-derives shift/reduce/go/loop from the automaton and normalized rules
//! the same way `emit::codegen::Emitter` does, so a passing scenario test
//! here is evidence the automaton itself realizes the grammar's ambiguity
//! correctly, independent of any code-generation bug.
//!
//! Values are a generic sum-of-products tree (constructor name + children)
//! standing in for the AST schema (C6) `emit::codegen` would otherwise
//! generate typed Rust for; this is enough to assert parse counts, list
//! shapes and constructor identities (spec.md §8 scenarios).

use crate::automaton::Automaton;
use crate::item::Item;
use crate::normalize::{Constructor, Grammar};
use crate::symbol::{Kind, Symbol};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A shifted terminal; carries no attribute (the oracle does not model
    /// lexical attribute values, only tree shape).
    Terminal,
    /// A `Named` reduction: constructor name plus the values of its
    /// value-carrying rhs symbols, in order.
    Node(String, Vec<Value>),
    List(Vec<Value>),
}

impl Value {
    pub fn as_list(&self) -> &[Value] {
        match self {
            Value::List(items) => items,
            _ => panic!("not a list value: {:?}", self),
        }
    }

    pub fn constructor(&self) -> &str {
        match self {
            Value::Node(name, _) => name,
            _ => panic!("not a node value: {:?}", self),
        }
    }
}

type StackItem = (Value, u32);
/// `-1` is the accept sentinel (spec.md §4.7); any other negative number is
/// never produced.
type Config = (i64, Vec<StackItem>);

fn shift(automaton: &Automaton, state: u32, stack: &[StackItem], symbol: &Symbol, value: Value) -> Vec<Config> {
    if !automaton.has_shift(state) {
        return Vec::new();
    }
    let target = automaton
        .transitions_from(state)
        .into_iter()
        .find(|t| &t.symbol == symbol);
    let t = match target {
        Some(t) => t,
        None => return Vec::new(),
    };
    let mut new_stack = stack.to_vec();
    // The stack item records the state the shift happened *from* (spec.md
    // §4.7 "Build a new stack item (category, from_pos, n)" — `n` is
    // `shift_n`'s own state, not the transition's destination).
    new_stack.push((value, state));

    let mut results = Vec::new();
    if automaton.has_shift(t.to) {
        results.push((t.to as i64, new_stack.clone()));
    }
    let (reduce_items, _) = automaton.partition(t.to);
    for item in reduce_items {
        results.extend(reduce(automaton, &new_stack, &item));
    }
    results
}

fn reduce(automaton: &Automaton, stack: &[StackItem], item: &Item) -> Vec<Config> {
    let rule = item.rule(&automaton.rules);
    let rhs_len = rule.rhs.len();
    debug_assert!(stack.len() >= rhs_len);
    let split_at = stack.len() - rhs_len;
    let popped = &stack[split_at..];
    let base = &stack[..split_at];

    let st_num0 = if rhs_len == 0 {
        base.last().map(|(_, s)| *s).unwrap_or(0)
    } else {
        popped[0].1
    };

    let mut children = Vec::new();
    for (sym, (value, _)) in rule.rhs.iter().zip(popped.iter()) {
        if sym.kind() != Kind::UnitTerminal {
            children.push(value.clone());
        }
    }

    let value = match &rule.constructor {
        Constructor::Named(name) => Value::Node(name.clone(), children),
        Constructor::Wild => children.into_iter().next().unwrap_or(Value::List(Vec::new())),
        Constructor::ListEmpty => Value::List(Vec::new()),
        Constructor::ListOne => Value::List(vec![children.into_iter().next().expect("ListOne has one child")]),
        Constructor::ListCons => {
            let mut it = children.into_iter();
            let head = it.next().expect("ListCons has a head");
            let tail = it.next().expect("ListCons has a tail list");
            let mut items = vec![head];
            items.extend(tail.as_list().iter().cloned());
            Value::List(items)
        }
    };

    let mut new_stack = base.to_vec();
    if rule.lhs.name() == "S'" {
        new_stack.push((value, u32::MAX));
        return vec![(-1, new_stack)];
    }
    shift(automaton, st_num0, &new_stack, &rule.lhs, value)
}

/// Runs the §4.7 driver to completion over a terminal token sequence (no
/// attributes; lexical values are not modeled) and returns one [`Value`] per
/// accepted parse, in the order the driver produced them. An empty result
/// means the input was rejected by every stack (spec.md §7: not itself an
/// error condition, the generator still succeeds).
pub fn parse(automaton: &Automaton, tokens: &[Symbol]) -> Vec<Value> {
    let mut stacks: Vec<Config> = vec![(0, Vec::new())];
    let (reduce_items, _) = automaton.partition(0);
    for item in reduce_items {
        stacks.extend(reduce(automaton, &[], &item));
    }

    for token in tokens {
        let mut next = Vec::new();
        for (state, stack) in &stacks {
            if *state < 0 {
                continue;
            }
            next.extend(shift(automaton, *state as u32, stack, token, Value::Terminal));
        }
        stacks = next;
    }

    stacks
        .into_iter()
        .filter(|(state, _)| *state == -1)
        .filter_map(|(_, stack)| stack.last().map(|(v, _)| v.clone()))
        .collect()
}

/// Convenience for callers that only want the accepted value the start
/// symbol reduced to, peeling off the top-level accept wrapper `Value`
/// (the `S' -> start` rule is `Wild`, so its value *is* the start symbol's
/// value directly — `parse` already returns that, this just documents it).
pub fn accepted_values(automaton: &Automaton, tokens: &[Symbol]) -> Vec<Value> {
    parse(automaton, tokens)
}
