// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C7 and C8: the code emitter and the abstract tree it is built on.

pub mod codegen;
pub mod tree;

pub use codegen::Emitter;
