use crate::{StyleEntry, with_styles};
use pktk_syntax::{
    DARK_THEME, LIGHT_THEME, LanguageDefinition, RuleDefinition, SyntaxError, TokenType,
};

const DARK: &[StyleEntry] = &[
    (TokenType::String, "#98c379", false, false),
    (TokenType::Markup, "#c678dd", true, false),
    (TokenType::Attribute, "#80bfff", false, false),
    (TokenType::SetAttribute, "#ff66d9", false, false),
    (TokenType::CData, "#ffe066", false, true),
    (TokenType::Value, "#cccccc", false, false),
    (TokenType::SpecialCharacter, "#ddc066", false, false),
    (TokenType::Comment, "#5c6370", false, true),
];

const LIGHT: &[StyleEntry] = &[
    (TokenType::String, "#238800", false, false),
    (TokenType::Markup, "#9b0f83", true, false),
    (TokenType::Attribute, "#e18890", false, false),
    (TokenType::SetAttribute, "#df0bea", false, false),
    (TokenType::CData, "#78dac2", false, false),
    (TokenType::Value, "#82dde5", false, false),
    (TokenType::SpecialCharacter, "#ddc066", false, false),
    (TokenType::Comment, "#5c6370", false, true),
];

/// XML (`.xml`, `.svg`).
///
/// Comments and CDATA sections may span lines.
pub fn xml() -> Result<LanguageDefinition, SyntaxError> {
    let builder = LanguageDefinition::builder("XML")
        .extension(".xml")
        .extension(".svg")
        .rule(RuleDefinition::new(TokenType::Comment, r"<!--.*?-->").multi_line("<!--", "-->"))
        .rule(
            RuleDefinition::new(TokenType::CData, r"<!\[CDATA\[.*?\]\]>")
                .multi_line(r"<!\[CDATA\[", r"\]\]>"),
        )
        .rule(RuleDefinition::new(TokenType::String, r#""[^"\\]*(?:\\.[^"\\]*)*""#))
        .rule(RuleDefinition::new(TokenType::String, r"'[^'\\]*(?:\\.[^'\\]*)*'"))
        .rule(RuleDefinition::new(
            TokenType::Markup,
            r"<(?:\?xml|!DOCTYPE|!ELEMENT|\w[\w:-]*\b)",
        ))
        .rule(RuleDefinition::new(TokenType::Markup, r"</\w[\w:-]*>"))
        .rule(RuleDefinition::new(TokenType::Markup, r"/?>|\?>"))
        // Names between a tag opening and its closing `>` on the same line.
        .rule(RuleDefinition::new(
            TokenType::Attribute,
            r"(?<=\s)\b\w[\w:-]*(?=[^<>]*>)",
        ))
        .rule(RuleDefinition::new(TokenType::Attribute, r"\b\w[\w:-]*(?=\s*=)"))
        .rule(RuleDefinition::new(
            TokenType::SpecialCharacter,
            r"&(?:amp|gt|lt|quot|apos|#\d+|#x[a-fA-F0-9]+);",
        ))
        .rule(RuleDefinition::new(TokenType::SetAttribute, "="))
        .rule(RuleDefinition::new(TokenType::Space, r"\s+"))
        .rule(RuleDefinition::new(TokenType::Value, r#"[^<>'"&]*"#));

    let builder = with_styles(builder, DARK_THEME, DARK);
    with_styles(builder, LIGHT_THEME, LIGHT).build()
}
