use pktk_syntax::{Color, Highlighter, LIGHT_THEME, NO_STATE, TokenSequence, TokenType};
use pktk_syntax_lang::{builtin, for_extension, json, xml};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn summary(tokens: &TokenSequence) -> Vec<(TokenType, &str)> {
    tokens.iter().map(|t| (t.token_type(), t.text())).collect()
}

#[test]
fn test_builtin_languages_build() {
    let languages = builtin().expect("built-in languages");
    let names: Vec<&str> = languages.iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["XML", "JSON"]);
    for language in &languages {
        assert_eq!(language.themes(), &["dark".to_string(), "light".to_string()]);
    }
}

#[test]
fn test_lookup_by_extension() {
    let svg = for_extension("SVG").expect("lookup").expect("svg is XML");
    assert_eq!(svg.name(), "XML");
    let json = for_extension(".json").expect("lookup").expect("json");
    assert_eq!(json.name(), "JSON");
    assert!(for_extension("txt").expect("lookup").is_none());
}

#[test]
fn test_xml_tag_with_attributes() {
    let language = xml().expect("xml");
    let tokens = language.tokenize(r#"<node name="x" id='1'>"#);
    assert_eq!(
        summary(&tokens),
        vec![
            (TokenType::Markup, "<node"),
            (TokenType::Space, " "),
            (TokenType::Attribute, "name"),
            (TokenType::SetAttribute, "="),
            (TokenType::String, "\"x\""),
            (TokenType::Space, " "),
            (TokenType::Attribute, "id"),
            (TokenType::SetAttribute, "="),
            (TokenType::String, "'1'"),
            (TokenType::Markup, ">"),
        ]
    );
}

#[test]
fn test_xml_text_and_entities() {
    let language = xml().expect("xml");
    let tokens = language.tokenize("<a>x &amp; y</a>");
    assert_eq!(
        summary(&tokens),
        vec![
            (TokenType::Markup, "<a"),
            (TokenType::Markup, ">"),
            (TokenType::Value, "x "),
            (TokenType::SpecialCharacter, "&amp;"),
            (TokenType::Space, " "),
            (TokenType::Value, "y"),
            (TokenType::Markup, "</a>"),
        ]
    );
}

#[test]
fn test_xml_multi_line_comment_and_cdata() {
    let mut highlighter = Highlighter::new(Arc::new(xml().expect("xml")));
    highlighter.set_lines([
        "<root>",
        "  <!-- first",
        "  still comment -->",
        "  <![CDATA[ raw <data>",
        "  ]]><leaf/>",
        "</root>",
    ]);

    let states: Vec<_> = (0..highlighter.line_count())
        .map(|line| highlighter.line(line).expect("line").state)
        .collect();
    assert_eq!(states, vec![NO_STATE, 1, NO_STATE, 2, NO_STATE, NO_STATE]);

    let comment_end = highlighter.line(2).expect("line");
    assert_eq!(
        summary(&comment_end.tokens),
        vec![(TokenType::Comment, "  still comment -->")]
    );

    let cdata_end = highlighter.line(4).expect("line");
    assert_eq!(
        summary(&cdata_end.tokens),
        vec![
            (TokenType::CData, "  ]]>"),
            (TokenType::Markup, "<leaf"),
            (TokenType::Markup, "/>"),
        ]
    );
}

#[test]
fn test_xml_light_theme() {
    let mut highlighter = Highlighter::new(Arc::new(xml().expect("xml")));
    highlighter.set_theme(LIGHT_THEME);
    highlighter.set_lines(["<a/>"]);
    let line = highlighter.line(0).expect("line");
    assert_eq!(line.spans[0].style.foreground, Some(Color::rgb(0x9b, 0x0f, 0x83)));
    assert!(line.spans[0].style.bold);
}

#[test]
fn test_json_values() {
    let language = json().expect("json");
    let tokens = language.tokenize(r#"{"key": [0, -2.5E3, true, null, "v"]}"#);
    assert_eq!(
        summary(&tokens),
        vec![
            (TokenType::ObjectMarkerStart, "{"),
            (TokenType::ObjectId, "\"key\""),
            (TokenType::ObjectDefinition, ":"),
            (TokenType::Space, " "),
            (TokenType::ArrayMarkerStart, "["),
            (TokenType::ValueNumber, "0"),
            (TokenType::ObjectSeparator, ","),
            (TokenType::Space, " "),
            (TokenType::ValueNumber, "-2.5E3"),
            (TokenType::ObjectSeparator, ","),
            (TokenType::Space, " "),
            (TokenType::ValueSpecial, "true"),
            (TokenType::ObjectSeparator, ","),
            (TokenType::Space, " "),
            (TokenType::ValueSpecial, "null"),
            (TokenType::ObjectSeparator, ","),
            (TokenType::Space, " "),
            (TokenType::ValueString, "\"v\""),
            (TokenType::ArrayMarkerEnd, "]"),
            (TokenType::ObjectMarkerEnd, "}"),
        ]
    );
}

#[test]
fn test_json_unknown_text_degrades() {
    let language = json().expect("json");
    let tokens = language.tokenize("{ oops }");
    assert_eq!(
        summary(&tokens),
        vec![
            (TokenType::ObjectMarkerStart, "{"),
            (TokenType::Space, " "),
            (TokenType::Unknown, "oops"),
            (TokenType::Space, " "),
            (TokenType::ObjectMarkerEnd, "}"),
        ]
    );
}
