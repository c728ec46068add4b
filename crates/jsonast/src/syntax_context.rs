use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named preset of [`SyntaxContext`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dialect {
    /// Strict JSON.
    Json,
    /// JSON with comments and trailing commas.
    Jsonc,
    Json5,
    /// Every construct any dialect allows, plus regexes, bigints, templates and more.
    #[default]
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dialect '{0}', expected one of JSON, JSONC, JSON5 or default")]
pub struct UnknownDialect(pub String);

impl Dialect {
    pub const ALL: [Self; 4] = [Self::Json, Self::Jsonc, Self::Json5, Self::Default];

    /// Resolves an optional dialect name. Unset and unrecognized names both select
    /// [`Dialect::Default`].
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(|name| name.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Jsonc => "JSONC",
            Self::Json5 => "JSON5",
            Self::Default => "default",
        }
    }

    pub fn syntax_context(self) -> SyntaxContext {
        SyntaxContext::for_dialect(self)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDialect(s.to_string()))
    }
}

impl TryFrom<String> for Dialect {
    type Error = UnknownDialect;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dialect> for String {
    fn from(dialect: Dialect) -> Self {
        dialect.as_str().to_string()
    }
}

/// Which constructs beyond strict JSON a parse accepts. Every flag only ever relaxes the grammar.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxContext {
    pub trailing_commas: bool,
    pub comments: bool,
    // numbers
    pub plus_signs: bool,
    pub spaced_signs: bool,
    pub leading_or_trailing_decimal_points: bool,
    pub infinities: bool,
    pub nans: bool,
    pub numeric_separators: bool,
    pub binary_numeric_literals: bool,
    pub octal_numeric_literals: bool,
    pub legacy_octal_numeric_literals: bool,
    pub invalid_json_numbers: bool,
    // strings, keys and other values
    pub multiline_strings: bool,
    pub unquote_properties: bool,
    pub single_quotes: bool,
    pub number_properties: bool,
    pub undefined_keywords: bool,
    pub sparse_arrays: bool,
    pub reg_exp_literals: bool,
    pub template_literals: bool,
    pub bigint_literals: bool,
    pub unicode_codepoint_escapes: bool,
    pub escape_sequence_in_identifier: bool,
}

impl SyntaxContext {
    pub const JSON: Self = Self {
        trailing_commas: false,
        comments: false,
        plus_signs: false,
        spaced_signs: false,
        leading_or_trailing_decimal_points: false,
        infinities: false,
        nans: false,
        numeric_separators: false,
        binary_numeric_literals: false,
        octal_numeric_literals: false,
        legacy_octal_numeric_literals: false,
        invalid_json_numbers: false,
        multiline_strings: false,
        unquote_properties: false,
        single_quotes: false,
        number_properties: false,
        undefined_keywords: false,
        sparse_arrays: false,
        reg_exp_literals: false,
        template_literals: false,
        bigint_literals: false,
        unicode_codepoint_escapes: false,
        escape_sequence_in_identifier: false,
    };

    pub const JSONC: Self = Self {
        trailing_commas: true,
        comments: true,
        ..Self::JSON
    };

    pub const JSON5: Self = Self {
        plus_signs: true,
        spaced_signs: true,
        leading_or_trailing_decimal_points: true,
        infinities: true,
        nans: true,
        invalid_json_numbers: true,
        multiline_strings: true,
        unquote_properties: true,
        single_quotes: true,
        ..Self::JSONC
    };

    pub const PERMISSIVE: Self = Self {
        trailing_commas: true,
        comments: true,
        plus_signs: true,
        spaced_signs: true,
        leading_or_trailing_decimal_points: true,
        infinities: true,
        nans: true,
        numeric_separators: true,
        binary_numeric_literals: true,
        octal_numeric_literals: true,
        legacy_octal_numeric_literals: true,
        invalid_json_numbers: true,
        multiline_strings: true,
        unquote_properties: true,
        single_quotes: true,
        number_properties: true,
        undefined_keywords: true,
        sparse_arrays: true,
        reg_exp_literals: true,
        template_literals: true,
        bigint_literals: true,
        unicode_codepoint_escapes: true,
        escape_sequence_in_identifier: true,
    };

    pub const fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Json => Self::JSON,
            Dialect::Jsonc => Self::JSONC,
            Dialect::Json5 => Self::JSON5,
            Dialect::Default => Self::PERMISSIVE,
        }
    }

    /// Whether every construct `other` accepts is also accepted here.
    pub fn includes(&self, other: &Self) -> bool {
        let mine = self.flags();
        let theirs = other.flags();
        mine.iter().zip(theirs).all(|(&mine, theirs)| mine || !theirs)
    }

    fn flags(&self) -> [bool; 23] {
        [
            self.trailing_commas,
            self.comments,
            self.plus_signs,
            self.spaced_signs,
            self.leading_or_trailing_decimal_points,
            self.infinities,
            self.nans,
            self.numeric_separators,
            self.binary_numeric_literals,
            self.octal_numeric_literals,
            self.legacy_octal_numeric_literals,
            self.invalid_json_numbers,
            self.multiline_strings,
            self.unquote_properties,
            self.single_quotes,
            self.number_properties,
            self.undefined_keywords,
            self.sparse_arrays,
            self.reg_exp_literals,
            self.template_literals,
            self.bigint_literals,
            self.unicode_codepoint_escapes,
            self.escape_sequence_in_identifier,
        ]
    }
}

impl Default for SyntaxContext {
    fn default() -> Self {
        Self::PERMISSIVE
    }
}

impl From<Dialect> for SyntaxContext {
    fn from(dialect: Dialect) -> Self {
        Self::for_dialect(dialect)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dialect_names_are_case_insensitive() {
        assert_eq!("json".parse::<Dialect>().unwrap(), Dialect::Json);
        assert_eq!("JsonC".parse::<Dialect>().unwrap(), Dialect::Jsonc);
        assert_eq!("JSON5".parse::<Dialect>().unwrap(), Dialect::Json5);
        assert_eq!("Default".parse::<Dialect>().unwrap(), Dialect::Default);
    }

    #[test]
    fn unknown_names_fail_to_parse_but_resolve_to_default() {
        let error = "yaml".parse::<Dialect>().unwrap_err();
        assert_eq!(error, UnknownDialect("yaml".to_string()));
        assert_eq!(Dialect::resolve(Some("yaml")), Dialect::Default);
        assert_eq!(Dialect::resolve(None), Dialect::Default);
        assert_eq!(Dialect::resolve(Some("jsonc")), Dialect::Jsonc);
    }

    #[test]
    fn presets_only_ever_relax() {
        let chain = [
            SyntaxContext::JSON,
            SyntaxContext::JSONC,
            SyntaxContext::JSON5,
            SyntaxContext::PERMISSIVE,
        ];
        for pair in chain.windows(2) {
            assert!(pair[1].includes(&pair[0]));
            assert!(!pair[0].includes(&pair[1]));
        }
    }

    #[test]
    fn only_the_default_enables_everything() {
        assert!(SyntaxContext::PERMISSIVE.flags().iter().all(|&flag| flag));
        assert!(SyntaxContext::JSON.flags().iter().all(|&flag| !flag));
        assert!(!SyntaxContext::JSON5.numeric_separators);
        assert!(!SyntaxContext::JSON5.number_properties);
        assert!(SyntaxContext::JSON5.single_quotes);
    }

    #[test]
    fn serde_uses_camel_case_and_dialect_names() -> anyhow::Result<()> {
        let json = serde_json::to_value(SyntaxContext::JSONC)?;
        assert_eq!(json["trailingCommas"], true);
        assert_eq!(json["regExpLiterals"], false);
        let dialect: Dialect = serde_json::from_str("\"json5\"")?;
        assert_eq!(dialect, Dialect::Json5);
        assert_eq!(serde_json::to_string(&Dialect::Jsonc)?, "\"JSONC\"");
        Ok(())
    }
}
