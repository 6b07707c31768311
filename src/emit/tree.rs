// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C8: abstract emission tree (spec.md §4.8).
//!
//! A small, closed algebraic vocabulary for declarations, expressions and
//! module structure, target-language-neutral at the type level even though
//! the only renderer implemented here prints Rust. Pattern-matched
//! pretty-printing, not an open class hierarchy — new node kinds are added
//! to the enums below, never by downstream trait objects.

use std::fmt::Write as _;

pub const WRAP_WIDTH: usize = 70;

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone)]
pub struct VariantCase {
    pub name: String,
    /// Positional payload types; empty for a unit case.
    pub payload: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Clause {
    pub pattern: String,
    pub body: Expr,
}

#[derive(Debug, Clone)]
pub enum Decl {
    /// A tagged union: `enum Name { Case(T1, T2), ... }`
    SumType { name: String, derives: Vec<String>, cases: Vec<VariantCase> },
    /// A plain struct with named fields.
    Struct { name: String, derives: Vec<String>, fields: Vec<Field> },
    /// A function built from one or more match-style clauses, here always
    /// rendered as a single function with a `match` over its first
    /// parameter (the shape every C7 dispatcher needs).
    FnClauseGroup {
        name: String,
        params: Vec<(String, String)>,
        ret: String,
        scrutinee: String,
        clauses: Vec<Clause>,
        default: Option<Expr>,
    },
    /// A single-expression function body (no internal match).
    Fn {
        name: String,
        params: Vec<(String, String)>,
        ret: String,
        body: Expr,
    },
    ValueBinding { name: String, ty: Option<String>, expr: Expr },
    /// An escape hatch for fragments not worth modeling structurally
    /// (e.g. `use` statements, doc comments).
    Opaque(String),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Atom(String),
    Let { bindings: Vec<(String, Expr)>, body: Box<Expr> },
    Case { scrutinee: Box<Expr>, arms: Vec<(String, Expr)> },
    Tuple(Vec<Expr>),
    App { func: String, args: Vec<Expr> },
}

impl Expr {
    pub fn atom<S: Into<String>>(s: S) -> Self {
        Expr::Atom(s.into())
    }

    pub fn app<S: Into<String>>(func: S, args: Vec<Expr>) -> Self {
        Expr::App { func: func.into(), args }
    }

    /// A one-line rendering used only to decide whether this expression fits
    /// within [`WRAP_WIDTH`] when inlined in a clause; not itself emitted.
    fn inline_width(&self) -> usize {
        render_expr_inline(self).len()
    }
}

fn render_expr_inline(expr: &Expr) -> String {
    match expr {
        Expr::Atom(s) => s.clone(),
        Expr::Tuple(items) => format!(
            "({})",
            items.iter().map(render_expr_inline).collect::<Vec<_>>().join(", ")
        ),
        Expr::App { func, args } => format!(
            "{}({})",
            func,
            args.iter().map(render_expr_inline).collect::<Vec<_>>().join(", ")
        ),
        Expr::Let { bindings, body } => {
            let binds = bindings
                .iter()
                .map(|(n, e)| format!("let {} = {};", n, render_expr_inline(e)))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{{ {} {} }}", binds, render_expr_inline(body))
        }
        Expr::Case { scrutinee, arms } => {
            let arm_strs = arms
                .iter()
                .map(|(p, e)| format!("{} => {}", p, render_expr_inline(e)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("match {} {{ {} }}", render_expr_inline(scrutinee), arm_strs)
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

fn render_expr(out: &mut String, expr: &Expr, depth: usize) {
    if expr.inline_width() <= WRAP_WIDTH && !matches!(expr, Expr::Case { .. } | Expr::Let { .. }) {
        indent(out, depth);
        out.push_str(&render_expr_inline(expr));
        return;
    }
    match expr {
        Expr::Atom(s) => {
            indent(out, depth);
            out.push_str(s);
        }
        Expr::Tuple(items) => {
            indent(out, depth);
            out.push('(');
            out.push('\n');
            for item in items {
                render_expr(out, item, depth + 1);
                out.push_str(",\n");
            }
            indent(out, depth);
            out.push(')');
        }
        Expr::App { func, args } => {
            if expr.inline_width() <= WRAP_WIDTH {
                indent(out, depth);
                out.push_str(&render_expr_inline(expr));
                return;
            }
            indent(out, depth);
            writeln!(out, "{}(", func).unwrap();
            for (i, arg) in args.iter().enumerate() {
                render_expr(out, arg, depth + 1);
                if i + 1 < args.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            indent(out, depth);
            out.push(')');
        }
        Expr::Let { bindings, body } => {
            indent(out, depth);
            out.push_str("{\n");
            for (name, value) in bindings {
                indent(out, depth + 1);
                write!(out, "let {} = ", name).unwrap();
                out.push_str(render_expr_inline(value).trim_start());
                out.push_str(";\n");
            }
            render_expr(out, body, depth + 1);
            out.push('\n');
            indent(out, depth);
            out.push('}');
        }
        Expr::Case { scrutinee, arms } => {
            indent(out, depth);
            writeln!(out, "match {} {{", render_expr_inline(scrutinee)).unwrap();
            for (pattern, body) in arms {
                indent(out, depth + 1);
                write!(out, "{} => ", pattern).unwrap();
                let inline = render_expr_inline(body);
                if inline.len() <= WRAP_WIDTH {
                    writeln!(out, "{},", inline).unwrap();
                } else {
                    out.push_str("{\n");
                    render_expr(out, body, depth + 2);
                    out.push('\n');
                    indent(out, depth + 1);
                    out.push_str("}\n");
                }
            }
            indent(out, depth);
            out.push('}');
        }
    }
}

pub fn render_decl(out: &mut String, decl: &Decl) {
    match decl {
        Decl::SumType { name, derives, cases } => {
            if !derives.is_empty() {
                writeln!(out, "#[derive({})]", derives.join(", ")).unwrap();
            }
            writeln!(out, "pub enum {} {{", name).unwrap();
            for case in cases {
                if case.payload.is_empty() {
                    writeln!(out, "    {},", case.name).unwrap();
                } else {
                    writeln!(out, "    {}({}),", case.name, case.payload.join(", ")).unwrap();
                }
            }
            out.push_str("}\n");
        }
        Decl::Struct { name, derives, fields } => {
            if !derives.is_empty() {
                writeln!(out, "#[derive({})]", derives.join(", ")).unwrap();
            }
            writeln!(out, "pub struct {} {{", name).unwrap();
            for field in fields {
                writeln!(out, "    pub {}: {},", field.name, field.ty).unwrap();
            }
            out.push_str("}\n");
        }
        Decl::FnClauseGroup {
            name,
            params,
            ret,
            scrutinee,
            clauses,
            default,
        } => {
            let param_str = params
                .iter()
                .map(|(n, t)| format!("{}: {}", n, t))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "pub fn {}({}) -> {} {{", name, param_str, ret).unwrap();
            writeln!(out, "    match {} {{", scrutinee).unwrap();
            for clause in clauses {
                write!(out, "        {} => ", clause.pattern).unwrap();
                let inline = render_expr_inline(&clause.body);
                if inline.len() <= WRAP_WIDTH {
                    writeln!(out, "{},", inline).unwrap();
                } else {
                    out.push_str("{\n");
                    render_expr(out, &clause.body, 3);
                    out.push('\n');
                    out.push_str("        }\n");
                }
            }
            if let Some(default) = default {
                write!(out, "        _ => ").unwrap();
                writeln!(out, "{},", render_expr_inline(default)).unwrap();
            }
            out.push_str("    }\n");
            out.push_str("}\n");
        }
        Decl::Fn { name, params, ret, body } => {
            let param_str = params
                .iter()
                .map(|(n, t)| format!("{}: {}", n, t))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "pub fn {}({}) -> {} {{", name, param_str, ret).unwrap();
            render_expr(out, body, 1);
            out.push('\n');
            out.push_str("}\n");
        }
        Decl::ValueBinding { name, ty, expr } => {
            let ty_str = ty.as_ref().map(|t| format!(": {}", t)).unwrap_or_default();
            write!(out, "pub const {}{} = ", name, ty_str).unwrap();
            out.push_str(render_expr_inline(expr).trim_start());
            out.push_str(";\n");
        }
        Decl::Opaque(text) => {
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }
    }
}

/// A generic "functor"-style module: a namespace of declarations optionally
/// parameterized over a trait-bounded type (the lexer interface), mirroring
/// the signature/functor vocabulary of spec.md §4.8 in Rust terms (a
/// `mod` containing an impl generic over a `Lexer` trait bound).
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub name: String,
    pub generic_params: Vec<(String, String)>,
    pub decls: Vec<Decl>,
}

impl Module {
    pub fn render(&self) -> String {
        let mut out = String::new();
        writeln!(out, "pub mod {} {{", self.name).unwrap();
        if !self.generic_params.is_empty() {
            let params = self
                .generic_params
                .iter()
                .map(|(n, bound)| format!("{}: {}", n, bound))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "    // generic over: {}", params).unwrap();
        }
        for decl in &self.decls {
            let mut body = String::new();
            render_decl(&mut body, decl);
            for line in body.lines() {
                if line.is_empty() {
                    out.push('\n');
                } else {
                    writeln!(out, "    {}", line).unwrap();
                }
            }
        }
        out.push_str("}\n");
        out
    }
}
