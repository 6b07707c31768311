// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
use std::fs;
use std::io::Write;

use structopt::StructOpt;

use glrgen::config::CLOptions;
use glrgen::error::GenError;
use glrgen::{automaton, diagnostics, dump_automaton, emit, frontend, normalize, schema};

fn run(cl_options: &CLOptions) -> Result<(), GenError> {
    cl_options.check_target()?;

    let output_path = cl_options.output_path();
    if output_path.exists() && !cl_options.force {
        return Err(GenError::OutputExists(output_path));
    }

    let specification_text = fs::read_to_string(&cl_options.specification).map_err(|source| GenError::Io {
        path: cl_options.specification.clone(),
        source,
    })?;

    let ast_grammar = frontend::parse(&specification_text)?;
    let grammar = normalize::normalize(&ast_grammar)?;
    let automaton = automaton::build(&grammar);
    let schema = schema::derive(&grammar);

    let mut output_file = fs::File::create(&output_path).map_err(|source| GenError::Io {
        path: output_path.clone(),
        source,
    })?;
    let emitter = emit::codegen::Emitter::new(&grammar, &automaton, &schema);
    emitter
        .write(&mut output_file)
        .map_err(|source| GenError::Io { path: output_path.clone(), source })?;

    if let Some(dump_path) = &cl_options.dump_automaton {
        let mut dump_file = fs::File::create(dump_path).map_err(|source| GenError::Io {
            path: dump_path.clone(),
            source,
        })?;
        dump_file
            .write_all(dump_automaton(&automaton).as_bytes())
            .map_err(|source| GenError::Io { path: dump_path.clone(), source })?;
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cl_options = CLOptions::from_args();
    let specification = cl_options.specification.to_string_lossy().to_string();
    if let Err(error) = run(&cl_options) {
        diagnostics::report_fatal(&specification, error);
        std::process::exit(1);
    }
}
