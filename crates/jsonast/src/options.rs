use core::fmt;
use core::str::FromStr;

use ecma_expr::LATEST_ECMA_VERSION;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::syntax_context::{Dialect, SyntaxContext};

/// Language edition used to lex the input, as an edition number (`6`), a year (`2015`) or
/// `"latest"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "EcmaVersionRepr", into = "EcmaVersionRepr")]
pub enum EcmaVersion {
    #[default]
    Latest,
    Year(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ECMAScript version '{0}', expected a number or \"latest\"")]
pub struct InvalidEcmaVersion(pub String);

impl EcmaVersion {
    /// The year the lexer should target. Edition numbers 6 through 14 map to 2015 through 2023,
    /// and anything newer than the lexer supports is clamped.
    pub fn normalize(self) -> u32 {
        match self {
            Self::Latest => LATEST_ECMA_VERSION,
            Self::Year(version) => {
                let year = if version > 5 && version < 2015 {
                    version + 2009
                } else {
                    version
                };
                year.min(LATEST_ECMA_VERSION)
            }
        }
    }
}

impl fmt::Display for EcmaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}

impl FromStr for EcmaVersion {
    type Err = InvalidEcmaVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        s.parse()
            .map(Self::Year)
            .map_err(|_| InvalidEcmaVersion(s.to_string()))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum EcmaVersionRepr {
    Number(u32),
    Text(String),
}

impl TryFrom<EcmaVersionRepr> for EcmaVersion {
    type Error = InvalidEcmaVersion;

    fn try_from(repr: EcmaVersionRepr) -> Result<Self, Self::Error> {
        match repr {
            EcmaVersionRepr::Number(year) => Ok(Self::Year(year)),
            EcmaVersionRepr::Text(text) => text.parse(),
        }
    }
}

impl From<EcmaVersion> for EcmaVersionRepr {
    fn from(version: EcmaVersion) -> Self {
        match version {
            EcmaVersion::Latest => Self::Text("latest".to_string()),
            EcmaVersion::Year(year) => Self::Number(year),
        }
    }
}

/// Options accepted by [`parse`](crate::parse).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    /// Dialect to accept. Unset selects the permissive default, and so does an unrecognized name.
    #[serde(alias = "jsonSyntax", deserialize_with = "deserialize_dialect")]
    pub dialect: Option<Dialect>,
    pub ecma_version: EcmaVersion,
    /// Name of the parsed file, only used in diagnostics.
    pub file_path: Option<String>,
}

impl ParseOptions {
    pub fn syntax_context(&self) -> SyntaxContext {
        SyntaxContext::for_dialect(self.dialect.unwrap_or_default())
    }

    pub fn file_path(&self) -> &str {
        self.file_path.as_deref().unwrap_or("<input>")
    }
}

fn deserialize_dialect<'de, D>(deserializer: D) -> Result<Option<Dialect>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.map(|name| Dialect::resolve(Some(&name))))
}

/// Options accepted by [`tokenize`](crate::tokenize).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenizeOptions {
    #[serde(flatten)]
    pub parse: ParseOptions,
    /// Interleave comments with the tokens in source order.
    pub include_comments: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn edition_numbers_map_to_years() {
        assert_eq!(EcmaVersion::Year(6).normalize(), 2015);
        assert_eq!(EcmaVersion::Year(11).normalize(), 2020);
        assert_eq!(EcmaVersion::Year(2019).normalize(), 2019);
        assert_eq!(EcmaVersion::Year(5).normalize(), 5);
    }

    #[test]
    fn future_years_clamp_to_latest() {
        assert_eq!(EcmaVersion::Year(2099).normalize(), LATEST_ECMA_VERSION);
        assert_eq!(EcmaVersion::Latest.normalize(), LATEST_ECMA_VERSION);
    }

    #[test]
    fn versions_parse_from_text() {
        assert_eq!("latest".parse::<EcmaVersion>().unwrap(), EcmaVersion::Latest);
        assert_eq!("2021".parse::<EcmaVersion>().unwrap(), EcmaVersion::Year(2021));
        assert!("next".parse::<EcmaVersion>().is_err());
    }

    #[test]
    fn options_deserialize_from_camel_case() -> anyhow::Result<()> {
        let options: TokenizeOptions = serde_json::from_str(
            r#"{"jsonSyntax": "jsonc", "ecmaVersion": 2018, "includeComments": true}"#,
        )?;
        assert_eq!(options.parse.dialect, Some(Dialect::Jsonc));
        assert_eq!(options.parse.ecma_version, EcmaVersion::Year(2018));
        assert!(options.include_comments);

        let options: ParseOptions = serde_json::from_str(r#"{"ecmaVersion": "latest"}"#)?;
        assert_eq!(options, ParseOptions::default());
        assert_eq!(options.file_path(), "<input>");
        Ok(())
    }

    #[test]
    fn unknown_dialect_names_fall_back_to_default() -> anyhow::Result<()> {
        let options: ParseOptions = serde_json::from_str(r#"{"jsonSyntax": "yaml"}"#)?;
        assert_eq!(options.dialect, Some(Dialect::Default));
        assert_eq!(options.syntax_context(), SyntaxContext::PERMISSIVE);

        let options: ParseOptions = serde_json::from_str(r#"{"dialect": null}"#)?;
        assert_eq!(options.dialect, None);
        Ok(())
    }
}
