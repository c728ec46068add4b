#![doc = include_str!("../README.md")]

use std::process::ExitCode;

use bpaf::Bpaf;
use jsonast::{Dialect, EcmaVersion};
use tracing_subscriber::prelude::*;

mod commands;
mod config;

/// Options choosing how a file is parsed. Unset values fall back to `jsonast.toml`, then to the
/// file extension.
#[derive(Debug, Clone, Default, Bpaf)]
pub struct DialectArgs {
    /// Dialect to accept: json, jsonc, json5 or default
    #[bpaf(long("dialect"), argument("DIALECT"))]
    pub dialect: Option<Dialect>,

    /// ECMAScript version used to lex values, as a year, an edition number or "latest"
    #[bpaf(long("ecma-version"), argument("VERSION"))]
    pub ecma_version: Option<EcmaVersion>,
}

#[derive(Debug, Clone, Bpaf)]
pub struct ParseArgs {
    #[bpaf(external(dialect_args))]
    pub dialect: DialectArgs,

    /// File to parse
    #[bpaf(positional("FILE"))]
    pub file: String,
}

#[derive(Debug, Clone, Bpaf)]
pub struct TokensArgs {
    /// Interleave comments with the tokens
    #[bpaf(long("comments"), switch)]
    pub comments: bool,

    #[bpaf(external(dialect_args))]
    pub dialect: DialectArgs,

    /// File to tokenize
    #[bpaf(positional("FILE"))]
    pub file: String,
}

#[derive(Debug, Clone, Bpaf)]
pub struct ValueArgs {
    #[bpaf(external(dialect_args))]
    pub dialect: DialectArgs,

    /// File to evaluate
    #[bpaf(positional("FILE"))]
    pub file: String,
}

#[derive(Debug, Clone, Bpaf)]
pub struct CheckArgs {
    /// List every file checked
    #[bpaf(short('v'), long("verbose"), switch)]
    pub verbose: bool,

    #[bpaf(external(dialect_args))]
    pub dialect: DialectArgs,

    /// Files to check
    #[bpaf(positional("FILE"), some("at least one file is required"))]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version, fallback_to_usage, generate(cli))]
/// Parse JSON, JSONC and JSON5 into an ESTree syntax tree
struct Cli {
    #[bpaf(external(commands))]
    command: Commands,
}

#[derive(Debug, Clone, Bpaf)]
enum Commands {
    #[bpaf(command("parse"))]
    /// Print the syntax tree of a file as ESTree JSON
    Parse(#[bpaf(external(parse_args))] ParseArgs),

    #[bpaf(command("tokens"))]
    /// Print the tokens of a file
    Tokens(#[bpaf(external(tokens_args))] TokensArgs),

    #[bpaf(command("value"))]
    /// Print the value a file evaluates to
    Value(#[bpaf(external(value_args))] ValueArgs),

    #[bpaf(command("check"))]
    /// Check that files parse in their dialect
    Check(#[bpaf(external(check_args))] CheckArgs),

    #[bpaf(command("version"))]
    /// Print version information
    Version,
}

fn init_tracing() {
    // Verbose entry/exit is only enabled when JSONAST_LOG is explicitly set.
    let (filter, explicit) = match tracing_subscriber::EnvFilter::try_from_env("JSONAST_LOG") {
        Ok(f) => (f, true),
        Err(_) => (tracing_subscriber::EnvFilter::new("warn"), false),
    };
    tracing_subscriber::registry()
        .with(
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
                .with_indent_lines(true)
                .with_verbose_exit(explicit)
                .with_verbose_entry(explicit)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = cli().run();

    let result = match cli.command {
        Commands::Parse(args) => commands::parse::run(&args),
        Commands::Tokens(args) => commands::tokens::run(&args),
        Commands::Value(args) => commands::value::run(&args),
        Commands::Check(args) => commands::check::run(&args),
        Commands::Version => {
            println!("jsonast {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(had_errors) => {
            if had_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_parse_with_flags() -> anyhow::Result<()> {
        let cli = cli()
            .run_inner(&["parse", "--dialect", "JSON5", "--ecma-version", "2019", "a.json"])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.file, "a.json");
                assert_eq!(args.dialect.dialect, Some(Dialect::Json5));
                assert_eq!(args.dialect.ecma_version, Some(EcmaVersion::Year(2019)));
            }
            _ => panic!("expected Parse"),
        }
        Ok(())
    }

    #[test]
    fn cli_parses_tokens_with_comments() -> anyhow::Result<()> {
        let cli = cli()
            .run_inner(&["tokens", "--comments", "a.jsonc"])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        match cli.command {
            Commands::Tokens(args) => {
                assert!(args.comments);
                assert_eq!(args.dialect.dialect, None);
            }
            _ => panic!("expected Tokens"),
        }
        Ok(())
    }

    #[test]
    fn cli_parses_check_many_files() -> anyhow::Result<()> {
        let cli = cli()
            .run_inner(&["check", "-v", "a.json", "b.json5"])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        match cli.command {
            Commands::Check(args) => {
                assert!(args.verbose);
                assert_eq!(args.files, vec!["a.json", "b.json5"]);
            }
            _ => panic!("expected Check"),
        }
        Ok(())
    }

    #[test]
    fn cli_check_requires_a_file() {
        assert!(cli().run_inner(&["check"]).is_err());
    }

    #[test]
    fn cli_rejects_unknown_dialects() {
        assert!(cli().run_inner(&["value", "--dialect", "yaml", "a.json"]).is_err());
    }

    #[test]
    fn cli_parses_latest_ecma_version() -> anyhow::Result<()> {
        let cli = cli()
            .run_inner(&["value", "--ecma-version", "latest", "a.json"])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        match cli.command {
            Commands::Value(args) => {
                assert_eq!(args.dialect.ecma_version, Some(EcmaVersion::Latest));
            }
            _ => panic!("expected Value"),
        }
        Ok(())
    }
}
