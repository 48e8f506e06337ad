#![warn(missing_docs)]
//! `pktk-syntax-lang` - built-in language definitions for `pktk-syntax`.
//!
//! Every language ships with a `dark` and a `light` theme. Definitions are plain
//! [`LanguageDefinition`]s built through the public builder, so hosts can use them as templates
//! for their own languages.

use pktk_syntax::{LanguageBuilder, LanguageDefinition, StyleDefinition, SyntaxError, TokenType};

mod json;
mod xml;

pub use json::json;
pub use xml::xml;

/// One style entry: token type, color, bold, italic.
type StyleEntry = (TokenType, &'static str, bool, bool);

fn with_styles(builder: LanguageBuilder, theme: &str, entries: &[StyleEntry]) -> LanguageBuilder {
    entries
        .iter()
        .fold(builder, |builder, &(token_type, color, bold, italic)| {
            let mut style = StyleDefinition::fg(color);
            style.bold = bold;
            style.italic = italic;
            builder.style(theme, token_type, style)
        })
}

/// Every built-in language.
pub fn builtin() -> Result<Vec<LanguageDefinition>, SyntaxError> {
    Ok(vec![xml()?, json()?])
}

/// The built-in language handling files with `extension` (leading dot optional, any case).
pub fn for_extension(extension: &str) -> Result<Option<LanguageDefinition>, SyntaxError> {
    let wanted = format!(".{}", extension.trim_start_matches('.')).to_lowercase();
    Ok(builtin()?
        .into_iter()
        .find(|language| language.extensions().iter().any(|e| *e == wanted)))
}
