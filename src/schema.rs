// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C6: AST schema deriver (spec.md §4.6).
//!
//! Derives the sum-of-products schema implied by the grammar's labeled
//! rules: for every base nonterminal name (coercion levels merged by
//! stripping trailing decimal digits), the set of `Named` constructors whose
//! left-hand side has that base name at level 0.

use std::collections::BTreeMap;

use crate::normalize::{Constructor, Grammar, Rule};
use crate::symbol::{Kind, Symbol};

/// A payload symbol's target-language shape: an atomic terminal attribute
/// type, or a nonterminal's sum type wrapped in `list_depth` list
/// constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Atom(&'static str),
    Node { base_name: String, list_depth: u32 },
}

#[derive(Debug, Clone)]
pub struct Case {
    pub constructor_name: String,
    pub rule_id: u32,
    pub fields: Vec<FieldType>,
}

#[derive(Debug, Clone, Default)]
pub struct NodeSchema {
    pub base_name: String,
    pub cases: Vec<Case>,
}

#[derive(Debug, Default)]
pub struct Schema {
    /// Base name -> schema, in first-seen (i.e. textual) order preserved by
    /// a `BTreeMap` only incidentally — callers that care about emission
    /// order should use [`Schema::nodes_in_order`].
    nodes: BTreeMap<String, NodeSchema>,
    order: Vec<String>,
}

impl Schema {
    pub fn nodes_in_order(&self) -> impl Iterator<Item = &NodeSchema> {
        self.order.iter().map(move |name| &self.nodes[name])
    }

    pub fn get(&self, base_name: &str) -> Option<&NodeSchema> {
        self.nodes.get(base_name)
    }
}

/// Strips trailing ASCII decimal digits: `"Exp2" -> "Exp"`, `"Exp" -> "Exp"`.
pub fn base_name(name: &str) -> &str {
    name.trim_end_matches(|c: char| c.is_ascii_digit())
}

fn field_type_of(symbol: &Symbol) -> Option<FieldType> {
    match symbol.kind() {
        Kind::Nonterminal => Some(FieldType::Node {
            base_name: base_name(symbol.name()).to_string(),
            list_depth: symbol.level(),
        }),
        Kind::UnitTerminal => None,
        _ => Some(FieldType::Atom(
            symbol.kind().attr_type().expect("non-unit terminal always has an attr type"),
        )),
    }
}

/// Builds the schema from a grammar's `Named` rules, in textual (rule_id)
/// order. Rules with no value-carrying rhs symbol still yield a case (with
/// an empty field list — the emitter always prepends a source span).
pub fn derive(grammar: &Grammar) -> Schema {
    derive_from_rules(&grammar.rules)
}

pub fn derive_from_rules(rules: &[Rule]) -> Schema {
    let mut schema = Schema::default();
    for (rule_id, rule) in rules.iter().enumerate() {
        let name = match &rule.constructor {
            Constructor::Named(name) => name,
            _ => continue,
        };
        let base = base_name(rule.lhs.name()).to_string();
        if rule.lhs.level() != 0 {
            // List-level nonterminals are never the lhs of a `Named` rule in
            // a well-formed grammar (only macro expansions produce them),
            // but guard rather than silently merge schemas across levels.
            continue;
        }
        let fields = rule.rhs.iter().filter_map(field_type_of).collect();
        let entry = schema.nodes.entry(base.clone()).or_insert_with(|| {
            schema.order.push(base.clone());
            NodeSchema {
                base_name: base.clone(),
                cases: Vec::new(),
            }
        });
        entry.cases.push(Case {
            constructor_name: name.clone(),
            rule_id: rule_id as u32,
            fields,
        });
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::normalize::normalize;

    fn span() -> Span {
        Span::dummy()
    }

    #[test]
    fn base_name_strips_trailing_digits() {
        assert_eq!(base_name("Exp2"), "Exp");
        assert_eq!(base_name("Exp"), "Exp");
        assert_eq!(base_name("Exp10"), "Exp");
    }

    #[test]
    fn coercion_levels_merge_into_one_schema_node() {
        let g = ast::Grammar {
            span: span(),
            token_decls: vec![TokenDecl::AttrToken {
                span: span(),
                name: "Integer".into(),
                attr: "int".into(),
            }],
            definitions: vec![
                Definition::Rule {
                    span: span(),
                    label: Label::Id(span(), "EInt".into()),
                    cat: Cat::IdCat(span(), "Exp1".into()),
                    items: vec![Item::NTerminal(span(), Cat::IdCat(span(), "Integer".into()))],
                },
                Definition::Coercions {
                    span: span(),
                    ident: "Exp".into(),
                    level: 1,
                },
            ],
        };
        let grammar = normalize(&g).unwrap();
        let schema = derive(&grammar);
        let node = schema.get("Exp").unwrap();
        assert_eq!(node.cases.len(), 1);
        assert_eq!(node.cases[0].constructor_name, "EInt");
        assert_eq!(node.cases[0].fields, vec![FieldType::Atom("i64")]);
    }

    #[test]
    fn list_payload_wraps_in_list_depth() {
        let g = ast::Grammar {
            span: span(),
            token_decls: vec![TokenDecl::AttrToken {
                span: span(),
                name: "Integer".into(),
                attr: "int".into(),
            }],
            definitions: vec![
                Definition::Rule {
                    span: span(),
                    label: Label::Id(span(), "EInt".into()),
                    cat: Cat::IdCat(span(), "Exp".into()),
                    items: vec![Item::NTerminal(span(), Cat::IdCat(span(), "Integer".into()))],
                },
                Definition::Rule {
                    span: span(),
                    label: Label::Id(span(), "Start".into()),
                    cat: Cat::IdCat(span(), "S".into()),
                    items: vec![Item::NTerminal(span(), Cat::ListCat(span(), Box::new(Cat::IdCat(span(), "Exp".into()))))],
                },
            ],
        };
        let grammar = normalize(&g).unwrap();
        let schema = derive(&grammar);
        let node = schema.get("S").unwrap();
        assert_eq!(
            node.cases[0].fields,
            vec![FieldType::Node {
                base_name: "Exp".to_string(),
                list_depth: 1
            }]
        );
    }

    #[test]
    fn case_with_no_payload_still_recorded() {
        let g = ast::Grammar {
            span: span(),
            token_decls: vec![],
            definitions: vec![Definition::Rule {
                span: span(),
                label: Label::Id(span(), "Nil".into()),
                cat: Cat::IdCat(span(), "Opt".into()),
                items: vec![],
            }],
        };
        let grammar = normalize(&g).unwrap();
        let schema = derive(&grammar);
        let node = schema.get("Opt").unwrap();
        assert_eq!(node.cases[0].fields.len(), 0);
    }
}
