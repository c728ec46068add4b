use anyhow::Context;

use super::{Input, load_input};
use crate::ParseArgs;

/// The ESTree JSON for `input`, or the rendered error.
pub fn render(input: &Input) -> anyhow::Result<Result<String, String>> {
    match jsonast::parse(&input.source, &input.options) {
        Ok(ast) => {
            let json = serde_json::to_string_pretty(&ast).context("failed to serialize AST")?;
            Ok(Ok(json))
        }
        Err(error) => Ok(Err(input.render(&error))),
    }
}

/// Run the `parse` command: print the syntax tree of one file.
pub fn run(args: &ParseArgs) -> anyhow::Result<bool> {
    let input = load_input(&args.file, &args.dialect)?;
    match render(&input)? {
        Ok(json) => {
            println!("{json}");
            Ok(false)
        }
        Err(report) => {
            eprintln!("{report}");
            Ok(true)
        }
    }
}
