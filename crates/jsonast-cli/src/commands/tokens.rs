use anyhow::Context;
use jsonast::TokenizeOptions;

use super::{Input, load_input};
use crate::TokensArgs;

/// The token stream of `input` as JSON, or the rendered error.
pub fn render(input: &Input, include_comments: bool) -> anyhow::Result<Result<String, String>> {
    let options = TokenizeOptions {
        parse: input.options.clone(),
        include_comments,
    };
    match jsonast::tokenize(&input.source, &options) {
        Ok(tokens) => {
            let json =
                serde_json::to_string_pretty(&tokens).context("failed to serialize tokens")?;
            Ok(Ok(json))
        }
        Err(error) => Ok(Err(input.render(&error))),
    }
}

/// Run the `tokens` command: print the tokens of one file.
pub fn run(args: &TokensArgs) -> anyhow::Result<bool> {
    let input = load_input(&args.file, &args.dialect)?;
    match render(&input, args.comments)? {
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
