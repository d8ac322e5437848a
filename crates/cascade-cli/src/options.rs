//! Command-line options for `cascadec`.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// The form of output the compiler generates. Consumed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// LLVM IR text
    LlvmIr,
    /// LLVM bitcode
    LlvmBc,
    /// Assembly
    Asm,
    /// An object file
    Obj,
    /// A linked executable
    Exe,
}

impl fmt::Display for Emit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Emit::LlvmIr => "llvm-ir",
            Emit::LlvmBc => "llvm-bc",
            Emit::Asm => "asm",
            Emit::Obj => "obj",
            Emit::Exe => "exe",
        };

        f.write_str(name)
    }
}

/// Optimization levels, numbered 0-3 on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptLevel {
    /// Optimizations disabled
    Disabled,
    /// Standard optimizations
    Enabled,
    /// Aggressive optimizations
    Aggressive,
    /// Aggressive plus unsafe optimizations
    Unsafe,
}

/// The options passed to the compiler.
#[derive(Debug, Parser)]
#[command(name = "cascadec", about = "Compiler for the Cascade language", version)]
pub struct Options {
    /// Include debug symbols
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Optimization level: 0 disabled, 1 on, 2 aggressive, 3 unsafe
    #[arg(
        short = 'O',
        long = "optimize",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=3)
    )]
    pub optimize: u8,

    /// The form of output to generate
    #[arg(short = 'e', long = "emit", value_enum, default_value_t = Emit::LlvmIr)]
    pub emit: Emit,

    /// Output path
    #[arg(short = 'o', long = "output", default_value_t = default_output())]
    pub output: String,

    /// Target triple to generate code for
    #[arg(short = 't', long = "target", default_value_t = host_triple())]
    pub target: String,

    /// Input files; source is read from standard input when none are given
    pub files: Vec<PathBuf>,
}

impl Options {
    /// The optimization level as an enum.
    pub fn opt_level(&self) -> OptLevel {
        match self.optimize {
            0 => OptLevel::Disabled,
            1 => OptLevel::Enabled,
            2 => OptLevel::Aggressive,
            _ => OptLevel::Unsafe,
        }
    }
}

fn default_output() -> String {
    if cfg!(windows) {
        "main.exe".to_string()
    } else {
        "main".to_string()
    }
}

fn host_triple() -> String {
    let arch = std::env::consts::ARCH;

    match std::env::consts::OS {
        "linux" => format!("{arch}-unknown-linux-gnu"),
        "macos" => format!("{arch}-apple-darwin"),
        "windows" => format!("{arch}-pc-windows-msvc"),
        os => format!("{arch}-unknown-{os}"),
    }
}
