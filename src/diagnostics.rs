// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Fatal/warning reporting, generalizing the teacher's direct-to-stderr
//! `report_error`/`report_warning` helpers into structured `log` records so
//! output can be filtered and captured the way any other `log`-based binary
//! is (spec.md §7: "diagnostics carry a source span and a human message").

use crate::ast::Span;
use crate::error::GenError;

/// Logs a fatal error at the `error` level with its source span, then
/// returns it unchanged so callers can still propagate it with `?`.
pub fn report_fatal(path: &str, error: GenError) -> GenError {
    log::error!("{}: {}", path, error);
    error
}

pub fn report_warning(path: &str, span: Span, message: &str) {
    log::warn!("{}:{}: {}", path, span, message);
}
