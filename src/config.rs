// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! Command line surface (spec.md §6).

use std::path::PathBuf;

use clap::crate_authors;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "glrgen",
    about = "Generalized LR (GLR) parser generator for labelled BNF grammars",
    author = crate_authors!(),
)]
pub struct CLOptions {
    /// Overwrite the output file if it already exists.
    #[structopt(short, long)]
    pub force: bool,

    /// Write the generated parser to this path instead of the
    /// specification's path with its extension changed to `.rs`.
    #[structopt(short, long, parse(from_os_str))]
    pub output: Option<PathBuf>,

    /// Dump the LR(0) automaton (states and transitions) to this path, for
    /// inspecting shift/reduce and reduce/reduce ambiguity by hand.
    #[structopt(long, parse(from_os_str))]
    pub dump_automaton: Option<PathBuf>,

    /// Emission flavor. Only `rust` is implemented; the flag exists so a
    /// future flavor can be added without changing the CLI surface.
    #[structopt(long, default_value = "rust")]
    pub target: String,

    /// The path of the file containing the grammar specification.
    #[structopt(parse(from_os_str))]
    pub specification: PathBuf,
}

impl CLOptions {
    pub fn output_path(&self) -> PathBuf {
        if let Some(path) = &self.output {
            return path.clone();
        }
        with_changed_extension(&self.specification, "rs")
    }

    pub fn check_target(&self) -> Result<(), crate::error::GenError> {
        if self.target == "rust" {
            Ok(())
        } else {
            Err(crate::error::GenError::UnsupportedTarget(self.target.clone()))
        }
    }
}

fn with_changed_extension(path: &std::path::Path, new_extension: &str) -> PathBuf {
    let mut new_path = PathBuf::new();
    if let Some(dir) = path.parent() {
        new_path.push(dir);
    }
    new_path.push(path.file_stem().unwrap_or_default());
    new_path.set_extension(new_extension);
    new_path
}
