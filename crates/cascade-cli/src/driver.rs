//! The driver: sequences lexing, parsing, and type checking.
//!
//! Stages run strictly in order across all input files. Diagnostics from a
//! stage are rendered when the stage finishes; any diagnostic fails the
//! stage and stops the pipeline with that stage's exit code: `-2` for lex
//! and parse failures, `-3` for type-check failures, `-1` for everything
//! that happens before the front-end runs.

use crate::options::Options;
use crate::output;
use crate::reader;
use crate::render::Renderer;
use cascade_checker::TypeChecker;
use cascade_parser::ast::Program;
use cascade_parser::{Diagnostic, Lexer, Parser, Token};
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Owns the options and runs one compilation.
pub struct Driver {
    options: Options,
}

impl Driver {
    pub fn new(options: Options) -> Self {
        Driver { options }
    }

    /// Run the front-end pipeline and return the process exit code.
    pub fn run(&self) -> i32 {
        let sources = match reader::read_sources(&self.options.files) {
            Ok(sources) => sources,
            Err(err) => {
                output::error(&err.to_string());
                return -1;
            }
        };

        let renderer = Renderer::new(output::color_choice());

        // lex every file
        let mut failed = false;
        let mut token_lists = Vec::new();

        for file in &sources {
            let mut diagnostics: Vec<Diagnostic> = Vec::new();
            let tokens = Lexer::new(&file.source, file.path.clone()).lex(&mut diagnostics);

            if self.options.debug {
                debug_print(&tokens);
            }

            failed |= !diagnostics.is_empty();
            for diagnostic in &diagnostics {
                renderer.emit(diagnostic, &file.source);
            }

            token_lists.push(tokens);
        }

        if failed {
            return -2;
        }

        // parse every file
        let mut programs: Vec<Program> = Vec::new();

        for (file, tokens) in sources.iter().zip(token_lists) {
            let mut diagnostics: Vec<Diagnostic> = Vec::new();
            let path = tokens
                .first()
                .map(|token| token.span().path_arc())
                .unwrap_or_else(|| Arc::new(file.path.clone()));

            let program = Parser::new(tokens, path, &mut diagnostics).parse();

            failed |= !diagnostics.is_empty();
            for diagnostic in &diagnostics {
                renderer.emit(diagnostic, &file.source);
            }

            programs.push(program);
        }

        if failed {
            return -2;
        }

        // type check everything
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        if !TypeChecker::new(&mut diagnostics).check(&mut programs) {
            let by_path: FxHashMap<PathBuf, &str> = sources
                .iter()
                .map(|file| (file.path.clone(), file.source.as_str()))
                .collect();

            for diagnostic in &diagnostics {
                let source = by_path
                    .get(diagnostic.span().path())
                    .copied()
                    .unwrap_or("");
                renderer.emit(diagnostic, source);
            }

            return -3;
        }

        if self.options.debug {
            println!(
                "front-end ok: emit {} at {:?}, target {}, output {}",
                self.options.emit,
                self.options.opt_level(),
                self.options.target,
                self.options.output,
            );
        }

        0
    }
}

/// Pretty-print a token list, aligned on the widest kind name.
fn debug_print(tokens: &[Token]) {
    let width = tokens
        .iter()
        .map(|token| token.kind().description().len())
        .max()
        .unwrap_or(0);

    for token in tokens {
        println!(
            "{{ kind: {:<width$}, p/l/c: {:04}:{:04}:{:03}, raw: '{}' }}",
            token.kind().description(),
            token.span().position(),
            token.span().line(),
            token.span().column(),
            token.raw(),
        );
    }
}
