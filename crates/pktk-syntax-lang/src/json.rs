use crate::{StyleEntry, with_styles};
use pktk_syntax::{
    DARK_THEME, LIGHT_THEME, LanguageDefinition, RuleDefinition, SyntaxError, TokenType,
};

const STRING: &str = r#""[^"\\]*(?:\\.[^"\\]*)*""#;

const DARK: &[StyleEntry] = &[
    (TokenType::ObjectId, "#79c3cc", true, false),
    (TokenType::ValueString, "#98c379", false, false),
    (TokenType::ValueNumber, "#ffe066", false, true),
    (TokenType::ObjectDefinition, "#ff66d9", true, false),
    (TokenType::ObjectSeparator, "#ff66d9", false, false),
    (TokenType::ObjectMarkerStart, "#ff66d9", false, false),
    (TokenType::ObjectMarkerEnd, "#ff66d9", false, false),
    (TokenType::ArrayMarkerStart, "#ff66d9", false, false),
    (TokenType::ArrayMarkerEnd, "#ff66d9", false, false),
    (TokenType::ValueSpecial, "#c678dd", false, false),
];

const LIGHT: &[StyleEntry] = &[
    (TokenType::ObjectId, "#00019c", true, false),
    (TokenType::ValueString, "#238800", false, false),
    (TokenType::ValueNumber, "#d97814", false, true),
    (TokenType::ObjectDefinition, "#ff66d9", true, false),
    (TokenType::ObjectSeparator, "#ff66d9", false, false),
    (TokenType::ObjectMarkerStart, "#ff66d9", false, false),
    (TokenType::ObjectMarkerEnd, "#ff66d9", false, false),
    (TokenType::ArrayMarkerStart, "#ff66d9", false, false),
    (TokenType::ArrayMarkerEnd, "#ff66d9", false, false),
    (TokenType::ValueSpecial, "#c678dd", false, false),
];

/// JSON (`.json`).
pub fn json() -> Result<LanguageDefinition, SyntaxError> {
    let builder = LanguageDefinition::builder("JSON")
        .extension(".json")
        .rule(RuleDefinition::new(TokenType::ObjectId, format!(r"{STRING}(?=\s*:)")))
        .rule(RuleDefinition::new(TokenType::ValueString, STRING))
        .rule(
            RuleDefinition::new(
                TokenType::ValueNumber,
                r"-?(?:0|[1-9]\d*)\.\d+(?:e[+-]?\d+)?",
            )
            .case_insensitive(),
        )
        .rule(
            RuleDefinition::new(TokenType::ValueNumber, r"-?(?:0|[1-9]\d*)(?:e[+-]?\d+)?")
                .case_insensitive(),
        )
        .rule(RuleDefinition::new(TokenType::ObjectDefinition, ":"))
        .rule(RuleDefinition::new(TokenType::ObjectSeparator, ","))
        .rule(RuleDefinition::new(TokenType::ValueSpecial, r"\b(?:true|false|null)\b"))
        .rule(RuleDefinition::new(TokenType::ObjectMarkerStart, r"\{"))
        .rule(RuleDefinition::new(TokenType::ObjectMarkerEnd, r"\}"))
        .rule(RuleDefinition::new(TokenType::ArrayMarkerStart, r"\["))
        .rule(RuleDefinition::new(TokenType::ArrayMarkerEnd, r"\]"))
        .rule(RuleDefinition::new(TokenType::Space, r"\s+"));

    let builder = with_styles(builder, DARK_THEME, DARK);
    with_styles(builder, LIGHT_THEME, LIGHT).build()
}
