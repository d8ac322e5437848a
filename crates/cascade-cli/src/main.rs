//! Entry point for `cascadec`, the Cascade compiler.

mod driver;
mod options;
mod output;
mod reader;
mod render;

use clap::Parser as _;

fn main() {
    let options = options::Options::parse();

    let code = match std::panic::catch_unwind(|| driver::Driver::new(options).run()) {
        Ok(code) => code,
        Err(_) => {
            output::error(
                "internal compiler error. If you see this, please make a bug report with the \
                 input that caused it.",
            );
            -1
        }
    };

    std::process::exit(code);
}
