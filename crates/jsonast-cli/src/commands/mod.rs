pub mod check;
pub mod parse;
pub mod tokens;
pub mod value;

use std::path::{Path, PathBuf};

use anyhow::Context;
use jsonast::{ParseError, ParseOptions};

use crate::DialectArgs;
use crate::config::{self, Config};

/// A file read from disk together with the options to parse it with.
#[derive(Debug)]
pub struct Input {
    pub path: PathBuf,
    pub source: String,
    pub options: ParseOptions,
}

impl Input {
    /// Renders `error` as a labelled snippet of this file.
    pub fn render(&self, error: &ParseError) -> String {
        let diagnostic = error.with_source(self.path.display().to_string(), &self.source);
        format!("{:?}", miette::Report::new(diagnostic))
    }
}

/// Options for `path`. Precedence: command line, config override, config default, extension.
pub fn resolve_options(args: &DialectArgs, config: &Config, path: &Path) -> ParseOptions {
    let dialect = args
        .dialect
        .or_else(|| config.dialect_for(path))
        .unwrap_or_else(|| config::dialect_from_extension(path));
    ParseOptions {
        dialect: Some(dialect),
        ecma_version: args.ecma_version.or(config.ecma_version).unwrap_or_default(),
        file_path: Some(path.display().to_string()),
    }
}

/// Reads `file` and works out how to parse it.
///
/// # Errors
///
/// Returns an error if the file or its config cannot be read.
pub fn load_input(file: &str, args: &DialectArgs) -> anyhow::Result<Input> {
    let path = PathBuf::from(file);
    let config = config::load_for(&path)?;
    let source =
        std::fs::read_to_string(&path).with_context(|| format!("failed to read {file}"))?;
    let options = resolve_options(args, &config, &path);
    tracing::debug!(file, dialect = ?options.dialect, "resolved options");
    Ok(Input {
        path,
        source,
        options,
    })
}
