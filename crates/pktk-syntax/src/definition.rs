use crate::token::TokenType;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
/// Raw language definition, as written in a YAML file.
///
/// Nothing is validated here; [`LanguageDefinition`](crate::LanguageDefinition) compiles and
/// checks it.
pub struct LanguageSource {
    /// Language name (e.g. `XML`).
    pub name: String,

    #[serde(default)]
    /// File extensions, with their leading dot.
    pub extensions: Vec<String>,

    #[serde(default)]
    /// Theme used when a style lookup misses (defaults to `dark`).
    pub default_theme: Option<String>,

    /// Rules, in precedence order.
    pub rules: Vec<RuleDefinition>,

    #[serde(default)]
    /// Styles keyed by theme id, then by token type id.
    pub styles: BTreeMap<String, BTreeMap<TokenType, StyleDefinition>>,
}

#[derive(Debug, Clone, Deserialize)]
/// One lexical rule before compilation.
pub struct RuleDefinition {
    #[serde(rename = "type")]
    /// Token type produced by the rule.
    pub token_type: TokenType,

    /// Pattern matched at the current offset (Oniguruma syntax).
    pub pattern: String,

    #[serde(default)]
    /// Compile every pattern of the rule case-insensitively.
    pub case_insensitive: bool,

    #[serde(default)]
    /// Start/end delimiter pairs for constructs that may span lines.
    pub multi_line: Vec<MultiLineDefinition>,

    #[serde(default)]
    /// Sub-types refining the token type from the matched text, first hit wins.
    pub sub_types: Vec<SubTypeDefinition>,

    #[serde(default)]
    /// Autocompletion entries contributed by the rule.
    pub auto_completion: Vec<AutoCompletionDefinition>,

    #[serde(default)]
    /// Trigger character for entries that don't set their own.
    pub auto_completion_char: Option<char>,
}

impl RuleDefinition {
    /// Rule producing `token_type` for `pattern`.
    pub fn new(token_type: TokenType, pattern: impl Into<String>) -> Self {
        Self {
            token_type,
            pattern: pattern.into(),
            case_insensitive: false,
            multi_line: Vec::new(),
            sub_types: Vec::new(),
            auto_completion: Vec::new(),
            auto_completion_char: None,
        }
    }

    /// Match every pattern of the rule case-insensitively.
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Add a multi-line start/end delimiter pair.
    pub fn multi_line(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.multi_line.push(MultiLineDefinition {
            start: start.into(),
            end: end.into(),
        });
        self
    }

    /// Add a sub-type, tried after the ones already added.
    pub fn sub_type(mut self, token_type: TokenType, pattern: impl Into<String>) -> Self {
        self.sub_types.push(SubTypeDefinition {
            token_type,
            pattern: pattern.into(),
        });
        self
    }

    /// Add an autocompletion entry. An empty description means none.
    pub fn auto_completion(
        mut self,
        text: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let description = description.into();
        self.auto_completion.push(AutoCompletionDefinition {
            text: text.into(),
            description: (!description.is_empty()).then_some(description),
            trigger: None,
        });
        self
    }

    /// Trigger character for entries that do not set their own.
    pub fn auto_completion_char(mut self, trigger: char) -> Self {
        self.auto_completion_char = Some(trigger);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Start/end delimiters of a multi-line construct.
pub struct MultiLineDefinition {
    /// Start delimiter pattern.
    pub start: String,
    /// End delimiter pattern.
    pub end: String,
}

#[derive(Debug, Clone, Deserialize)]
/// A `(tag, pattern)` disambiguator.
pub struct SubTypeDefinition {
    #[serde(rename = "type")]
    /// Token type used when `pattern` is found in the matched text.
    pub token_type: TokenType,
    /// Pattern searched in the matched text.
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
/// One autocompletion entry.
pub struct AutoCompletionDefinition {
    /// Completion text, optionally carrying the completion markers.
    pub text: String,

    #[serde(default)]
    /// Help text shown next to the entry.
    pub description: Option<String>,

    #[serde(default)]
    /// Trigger character, overriding the rule's.
    pub trigger: Option<char>,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Style of one token type in one theme, before color validation.
pub struct StyleDefinition {
    #[serde(default)]
    /// Foreground color, `#rgb`, `#rrggbb` or `#aarrggbb`.
    pub fg: Option<String>,

    #[serde(default)]
    /// Background color, same forms as `fg`.
    pub bg: Option<String>,

    #[serde(default)]
    /// Bold text.
    pub bold: bool,

    #[serde(default)]
    /// Italic text.
    pub italic: bool,
}

impl StyleDefinition {
    /// Foreground-only style.
    pub fn fg(color: impl Into<String>) -> Self {
        Self {
            fg: Some(color.into()),
            ..Self::default()
        }
    }

    /// Set the background color.
    pub fn bg(mut self, color: impl Into<String>) -> Self {
        self.bg = Some(color.into());
        self
    }

    /// Bold text.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Italic text.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}
