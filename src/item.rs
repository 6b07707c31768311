// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C4: LR(0) items (spec.md §3 "LR item", §4.4).
//!
//! An item is a rule with a dot marking a position in its right-hand side.
//! Rules are referenced by index into the normalized grammar's rule slice
//! rather than cloned, so an [`Item`] is a cheap `(rule_id, dot)` pair;
//! equality/ordering over that pair is exactly the structural equality
//! spec.md asks for, since `rule_id` identifies a unique `(constructor, lhs,
//! rhs)` triple.

use std::collections::BTreeSet;

use crate::normalize::Rule;
use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub rule_id: u32,
    pub dot: usize,
}

impl Item {
    pub fn from_rule(rule_id: u32) -> Self {
        Self { rule_id, dot: 0 }
    }

    pub fn rule<'a>(&self, rules: &'a [Rule]) -> &'a Rule {
        &rules[self.rule_id as usize]
    }

    pub fn before_dot<'a>(&self, rules: &'a [Rule]) -> &'a [Symbol] {
        &self.rule(rules).rhs[..self.dot]
    }

    pub fn after_dot<'a>(&self, rules: &'a [Rule]) -> &'a [Symbol] {
        &self.rule(rules).rhs[self.dot..]
    }

    pub fn next_symbol<'a>(&self, rules: &'a [Rule]) -> Option<&'a Symbol> {
        self.rule(rules).rhs.get(self.dot)
    }

    pub fn is_reduce(&self, rules: &[Rule]) -> bool {
        self.next_symbol(rules).is_none()
    }

    pub fn advanced(&self) -> Self {
        Self {
            rule_id: self.rule_id,
            dot: self.dot + 1,
        }
    }
}

pub type ItemSet = BTreeSet<Item>;

/// Fixed-point expansion: for every item whose dot precedes a nonterminal
/// `N`, add `from_rule(r)` for every rule with `lhs = N` not yet in the set.
/// Terminates because the item universe (rule, dot) pairs is finite.
pub fn closure(mut items: ItemSet, rules: &[Rule]) -> ItemSet {
    loop {
        let mut additions = Vec::new();
        for item in &items {
            if let Some(symbol) = item.next_symbol(rules) {
                if symbol.is_nonterminal() {
                    for (rule_id, rule) in rules.iter().enumerate() {
                        if &rule.lhs == symbol {
                            let candidate = Item::from_rule(rule_id as u32);
                            if !items.contains(&candidate) {
                                additions.push(candidate);
                            }
                        }
                    }
                }
            }
        }
        if additions.is_empty() {
            return items;
        }
        items.extend(additions);
    }
}

/// For each item with dot immediately before `x`, the item with dot advanced
/// over `x`, closed.
pub fn goto(items: &ItemSet, x: &Symbol, rules: &[Rule]) -> ItemSet {
    let advanced: ItemSet = items
        .iter()
        .filter(|item| item.next_symbol(rules) == Some(x))
        .map(Item::advanced)
        .collect();
    closure(advanced, rules)
}

/// Symbols immediately following a dot in any item of the set.
pub fn next_symbols(items: &ItemSet, rules: &[Rule]) -> BTreeSet<Symbol> {
    items
        .iter()
        .filter_map(|item| item.next_symbol(rules).cloned())
        .collect()
}

/// `(reduce_items, shift_items)`, each in ascending `(rule_id, dot)` order —
/// which is textual rule order for `reduce_items`, since every reduce item
/// of a given rule is unique and `rule_id` was assigned in expansion order
/// (spec.md §9 "pool-vs-new test" sibling note on ordering).
pub fn partition(items: &ItemSet, rules: &[Rule]) -> (Vec<Item>, Vec<Item>) {
    let mut reduce_items = Vec::new();
    let mut shift_items = Vec::new();
    for item in items {
        if item.is_reduce(rules) {
            reduce_items.push(*item);
        } else {
            shift_items.push(*item);
        }
    }
    (reduce_items, shift_items)
}
