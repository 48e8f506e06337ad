use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while building a [`LanguageDefinition`](crate::LanguageDefinition).
///
/// Every variant is a configuration error: a definition that fails to build is never handed out
/// half-constructed.
pub enum SyntaxError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("regex compile error for pattern '{pattern}': {message}")]
    /// A rule, sub-type or delimiter pattern failed to compile.
    RegexCompile {
        /// The regex pattern string.
        pattern: String,
        /// The compiler error message.
        message: String,
    },

    #[error("empty pattern for rule of type '{0}'")]
    /// A rule or delimiter pattern was empty.
    EmptyPattern(&'static str),

    #[error("invalid color '{value}' for '{token_type}' in theme '{theme}' (expected #rgb, #rrggbb or #aarrggbb)")]
    /// A style color is not a hex color.
    InvalidColor {
        /// Theme the style belongs to.
        theme: String,
        /// Token type id the style belongs to.
        token_type: &'static str,
        /// The rejected color string.
        value: String,
    },

    #[error("multi-line delimiters '{start}' .. '{end}' are declared more than once")]
    /// The same multi-line start/end pair would occupy two state ids.
    DuplicateMultiLine {
        /// Start delimiter pattern.
        start: String,
        /// End delimiter pattern.
        end: String,
    },

    #[error("unknown token type '{0}'")]
    /// A configuration file referenced a token type id that does not exist.
    UnknownTokenType(String),
}
