use std::path::{Path, PathBuf};

use anyhow::Context;
use jsonast::{Dialect, EcmaVersion};
use serde::Deserialize;

const CONFIG_FILENAME: &str = "jsonast.toml";

/// Per-file settings for files matching `files`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Override {
    /// Glob patterns matched against the file path relative to the config directory, and against
    /// the bare file name.
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub dialect: Option<Dialect>,
}

/// Contents of `jsonast.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub dialect: Option<Dialect>,

    #[serde(default)]
    pub ecma_version: Option<EcmaVersion>,

    /// Earlier entries win.
    #[serde(default)]
    pub overrides: Vec<Override>,

    /// Directory the config was loaded from.
    #[serde(skip)]
    pub dir: PathBuf,
}

impl Config {
    /// The dialect configured for `path`: the first matching override, then the top-level
    /// setting.
    pub fn dialect_for(&self, path: &Path) -> Option<Dialect> {
        let relative = path.strip_prefix(&self.dir).unwrap_or(path);
        let relative = relative.to_string_lossy().replace('\\', "/");
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.overrides
            .iter()
            .filter(|ov| {
                ov.files.iter().any(|pattern| {
                    glob_match::glob_match(pattern, &relative)
                        || glob_match::glob_match(pattern, &file_name)
                })
            })
            .find_map(|ov| ov.dialect)
            .or(self.dialect)
    }
}

/// Dialect implied by the file extension.
pub fn dialect_from_extension(path: &Path) -> Dialect {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Dialect::Json,
        Some(ext) if ext.eq_ignore_ascii_case("jsonc") => Dialect::Jsonc,
        Some(ext) if ext.eq_ignore_ascii_case("json5") => Dialect::Json5,
        _ => Dialect::Default,
    }
}

/// Walks up from `start_dir` and loads the nearest `jsonast.toml`.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn find_and_load(start_dir: &Path) -> anyhow::Result<Option<Config>> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            let content = std::fs::read_to_string(&candidate)
                .with_context(|| format!("failed to read {}", candidate.display()))?;
            let mut config: Config = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", candidate.display()))?;
            config.dir = dir;
            tracing::debug!(path = %candidate.display(), "loaded config");
            return Ok(Some(config));
        }
        if !dir.pop() {
            return Ok(None);
        }
    }
}

/// Loads the config that applies to `file`, searching from its directory.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_for(file: &Path) -> anyhow::Result<Config> {
    let absolute = std::path::absolute(file)
        .with_context(|| format!("failed to resolve {}", file.display()))?;
    let start = absolute.parent().map_or_else(|| absolute.clone(), Path::to_path_buf);
    Ok(find_and_load(&start)?.unwrap_or_default())
}
