// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C5: automaton builder (spec.md §4.5).
//!
//! Augments the normalized grammar with a virtual rule `S' -> start`, then
//! runs the worklist driver that interns LR(0) item-sets to state numbers
//! and records the transition graph.

use std::collections::{BTreeMap, VecDeque};

use crate::intern::Pool;
use crate::item::{self, Item, ItemSet};
use crate::normalize::{Constructor, Grammar, Rule};
use crate::symbol::{self, Symbol};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Transition {
    pub from: u32,
    pub symbol: Symbol,
    pub to: u32,
}

#[derive(Debug)]
pub struct Automaton {
    /// Grammar rules augmented with the virtual `S' -> start` rule appended
    /// last, so every rule id the normalizer handed out is unchanged.
    pub rules: Vec<Rule>,
    pub s_prime_rule_id: u32,
    pub pool: Pool<ItemSet>,
    pub transitions: Vec<Transition>,
}

impl Automaton {
    /// State 0 is always the start closure (spec.md §4.5 invariant).
    pub const START_STATE: u32 = 0;

    pub fn state_items(&self, state: u32) -> &ItemSet {
        self.pool
            .value_of(state)
            .expect("state id must have been interned by build()")
    }

    pub fn partition(&self, state: u32) -> (Vec<Item>, Vec<Item>) {
        item::partition(self.state_items(state), &self.rules)
    }

    pub fn has_shift(&self, state: u32) -> bool {
        !self.partition(state).1.is_empty()
    }

    pub fn has_reduce(&self, state: u32) -> bool {
        !self.partition(state).0.is_empty()
    }

    /// Outgoing transitions from `state`, in symbol order.
    pub fn transitions_from(&self, state: u32) -> Vec<&Transition> {
        let mut ts: Vec<&Transition> = self.transitions.iter().filter(|t| t.from == state).collect();
        ts.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        ts
    }

    pub fn states(&self) -> impl Iterator<Item = u32> {
        self.pool.ids()
    }

    pub fn state_count(&self) -> usize {
        self.pool.len()
    }
}

/// Runs the worklist driver of spec.md §4.5 steps 1–4. The "was this id new
/// to the pool at the moment of interning" test (step 4) uses the
/// [`crate::intern::InternResult::was_new`] flag returned by `intern` itself,
/// not a later `present` query against the post-intern pool — see spec.md §9
/// "pool-vs-new test".
pub fn build(grammar: &Grammar) -> Automaton {
    let mut rules = grammar.rules.clone();
    let s_prime_rule_id = rules.len() as u32;
    rules.push(Rule::new(Constructor::Wild, symbol::s_prime(), vec![grammar.start.clone()]));

    let mut pool: Pool<ItemSet> = Pool::new();
    let mut transitions = Vec::new();

    let initial: ItemSet = item::closure([Item::from_rule(s_prime_rule_id)].into_iter().collect(), &rules);
    let start = pool.intern(initial);
    debug_assert_eq!(start.id, Automaton::START_STATE);

    let mut worklist: VecDeque<u32> = VecDeque::new();
    worklist.push_back(start.id);

    while let Some(n) = worklist.pop_front() {
        let items = pool.value_of(n).expect("worklist only holds interned ids").clone();
        for x in item::next_symbols(&items, &rules) {
            let j = item::goto(&items, &x, &rules);
            let result = pool.intern(j);
            transitions.push(Transition {
                from: n,
                symbol: x,
                to: result.id,
            });
            if result.was_new {
                worklist.push_back(result.id);
            }
        }
    }

    Automaton {
        rules,
        s_prime_rule_id,
        pool,
        transitions,
    }
}

/// Groups outgoing transitions by origin state, symbol-sorted; a convenience
/// the code emitter (C7) uses to build each state's shift dispatch.
pub fn transitions_by_state(automaton: &Automaton) -> BTreeMap<u32, Vec<&Transition>> {
    let mut map: BTreeMap<u32, Vec<&Transition>> = BTreeMap::new();
    for t in &automaton.transitions {
        map.entry(t.from).or_default().push(t);
    }
    for ts in map.values_mut() {
        ts.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::normalize::normalize;

    fn span() -> Span {
        Span::dummy()
    }

    fn arithmetic_grammar() -> Grammar {
        let g = ast::Grammar {
            span: span(),
            token_decls: vec![
                TokenDecl::AttrToken {
                    span: span(),
                    name: "Integer".into(),
                    attr: "int".into(),
                },
                TokenDecl::Keyword {
                    span: span(),
                    name: "-".into(),
                    literal: "-".into(),
                },
            ],
            definitions: vec![
                Definition::Rule {
                    span: span(),
                    label: Label::Id(span(), "EInt".into()),
                    cat: Cat::IdCat(span(), "Exp".into()),
                    items: vec![Item::NTerminal(span(), Cat::IdCat(span(), "Integer".into()))],
                },
                Definition::Rule {
                    span: span(),
                    label: Label::Id(span(), "ESub".into()),
                    cat: Cat::IdCat(span(), "Exp".into()),
                    items: vec![
                        Item::NTerminal(span(), Cat::IdCat(span(), "Exp".into())),
                        Item::Terminal(span(), "-".into()),
                        Item::NTerminal(span(), Cat::IdCat(span(), "Exp".into())),
                    ],
                },
            ],
        };
        normalize(&g).unwrap()
    }

    #[test]
    fn start_state_is_zero_and_closed() {
        let grammar = arithmetic_grammar();
        let automaton = build(&grammar);
        let items = automaton.state_items(Automaton::START_STATE);
        assert_eq!(item::closure(items.clone(), &automaton.rules), items.clone());
    }

    #[test]
    fn every_to_state_was_interned() {
        let grammar = arithmetic_grammar();
        let automaton = build(&grammar);
        for t in &automaton.transitions {
            assert!(automaton.pool.present(t.to));
        }
    }

    #[test]
    fn transition_totality_matches_shift_items() {
        let grammar = arithmetic_grammar();
        let automaton = build(&grammar);
        for state in automaton.states() {
            let items = automaton.state_items(state).clone();
            let expected = item::next_symbols(&items, &automaton.rules);
            let got: std::collections::BTreeSet<_> =
                automaton.transitions_from(state).into_iter().map(|t| t.symbol.clone()).collect();
            assert_eq!(expected, got);
        }
    }

    #[test]
    fn each_from_symbol_pair_is_unique() {
        let grammar = arithmetic_grammar();
        let automaton = build(&grammar);
        let mut seen = std::collections::BTreeSet::new();
        for t in &automaton.transitions {
            assert!(seen.insert((t.from, t.symbol.clone())), "duplicate (from, symbol) pair");
        }
    }

    #[test]
    fn reduce_items_reference_normalized_rules() {
        let grammar = arithmetic_grammar();
        let automaton = build(&grammar);
        for state in automaton.states() {
            let (reduce_items, _) = automaton.partition(state);
            for it in reduce_items {
                assert!((it.rule_id as usize) < automaton.rules.len());
            }
        }
    }

    #[test]
    fn ambiguous_grammar_yields_multiple_reduce_items_in_one_state() {
        // The "-" is left-associative AND right-associative in the grammar
        // (no precedence declared) so some state should carry two distinct
        // reduce items once the full "1-2-3" input is modeled (tested at the
        // simulation level in tests/scenarios.rs); here we just assert the
        // automaton doesn't collapse reduce items for ESub/EInt in the same
        // state when both are viable.
        let grammar = arithmetic_grammar();
        let automaton = build(&grammar);
        let any_state_with_reduce = automaton.states().any(|s| automaton.has_reduce(s));
        assert!(any_state_with_reduce);
    }
}
