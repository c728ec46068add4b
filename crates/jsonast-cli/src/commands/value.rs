use anyhow::Context;

use super::{Input, load_input};
use crate::ValueArgs;

/// The data `input` denotes, as JSON, or the rendered parse error.
pub fn render(input: &Input) -> anyhow::Result<Result<String, String>> {
    let ast = match jsonast::parse(&input.source, &input.options) {
        Ok(ast) => ast,
        Err(error) => return Ok(Err(input.render(&error))),
    };
    let value = jsonast::static_value(&ast)
        .with_context(|| format!("failed to evaluate {}", input.path.display()))?;
    let json =
        serde_json::to_string_pretty(&value.to_json()).context("failed to serialize value")?;
    Ok(Ok(json))
}

/// Run the `value` command: print what one file evaluates to.
pub fn run(args: &ValueArgs) -> anyhow::Result<bool> {
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
