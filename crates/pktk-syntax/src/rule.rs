use crate::definition::RuleDefinition;
use crate::error::SyntaxError;
use crate::token::TokenType;
use onig::{Regex, RegexOptions, Region, SearchOptions, Syntax};
use std::sync::Arc;

#[derive(Debug, Clone)]
/// A compiled Oniguruma pattern together with its source.
pub struct Pattern {
    source: String,
    regex: Arc<Regex>,
}

impl Pattern {
    pub(crate) fn compile(
        source: &str,
        case_insensitive: bool,
        owner: TokenType,
    ) -> Result<Self, SyntaxError> {
        if source.is_empty() {
            return Err(SyntaxError::EmptyPattern(owner.id()));
        }

        let options = if case_insensitive {
            RegexOptions::REGEX_OPTION_IGNORECASE
        } else {
            RegexOptions::REGEX_OPTION_NONE
        };
        let regex = Regex::with_options(source, options, Syntax::default()).map_err(|e| {
            SyntaxError::RegexCompile {
                pattern: source.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            source: source.to_string(),
            regex: Arc::new(regex),
        })
    }

    /// Original pattern source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Byte length of a non-empty match anchored at `at`.
    pub(crate) fn match_at(&self, text: &str, at: usize) -> Option<usize> {
        self.regex
            .match_with_options(text, at, SearchOptions::SEARCH_OPTION_NONE, None)
            .filter(|&len| len > 0)
    }

    /// Like [`match_at`](Self::match_at), but the match must end at or before byte `end`.
    ///
    /// Assertions see the whole of `text`. A match running past `end` is retried on the text cut
    /// at `end`.
    pub(crate) fn match_within(&self, text: &str, at: usize, end: usize) -> Option<usize> {
        match self.match_at(text, at)? {
            len if at + len <= end => Some(len),
            _ => self.match_at(&text[..end], at),
        }
    }

    /// First match (possibly empty) starting at or after `from`, as a byte range.
    pub(crate) fn find_from(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        if from > text.len() {
            return None;
        }
        let mut region = Region::new();
        self.regex.search_with_options(
            text,
            from,
            text.len(),
            SearchOptions::SEARCH_OPTION_NONE,
            Some(&mut region),
        )?;
        region.pos(0)
    }

    /// First non-empty match starting at or after `from`.
    pub(crate) fn find_non_empty_from(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        let mut from = from;
        loop {
            let (start, end) = self.find_from(text, from)?;
            if end > start {
                return Some((start, end));
            }
            // Step over the empty match to the next char boundary.
            from = start + text[start..].chars().next()?.len_utf8();
        }
    }

    /// Returns `true` if the pattern occurs anywhere in `text`.
    pub(crate) fn is_found_in(&self, text: &str) -> bool {
        self.find_from(text, 0).is_some()
    }
}

#[derive(Debug, Clone)]
/// Start/end delimiters of one multi-line construct.
pub struct Delimiters {
    /// Opening delimiter.
    pub start: Pattern,
    /// Closing delimiter.
    pub end: Pattern,
}

#[derive(Debug, Clone)]
/// A token type chosen when its pattern is found in a rule's matched text.
pub struct SubType {
    /// Refined token type.
    pub token_type: TokenType,
    /// Disambiguating pattern.
    pub pattern: Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An autocompletion entry contributed by a rule.
pub struct AutoCompletionEntry {
    /// Completion text; may carry [`CARET_MARKER`](crate::CARET_MARKER) and
    /// [`SECONDARY_MARKER`](crate::SECONDARY_MARKER).
    pub text: String,
    /// Help text.
    pub description: Option<String>,
    /// Trigger character the entry is grouped under.
    pub trigger: Option<char>,
}

/// One compiled lexical rule.
///
/// Rules are immutable once their [`LanguageDefinition`](crate::LanguageDefinition) is built,
/// and their order in it is their precedence.
#[derive(Debug, Clone)]
pub struct Rule {
    token_type: TokenType,
    pattern: Pattern,
    multi_line: Vec<Delimiters>,
    sub_types: Vec<SubType>,
    auto_completion: Vec<AutoCompletionEntry>,
    auto_completion_char: Option<char>,
}

impl Rule {
    pub(crate) fn compile(definition: &RuleDefinition) -> Result<Self, SyntaxError> {
        let token_type = definition.token_type;
        let ci = definition.case_insensitive;

        let pattern = Pattern::compile(&definition.pattern, ci, token_type)?;

        let multi_line = definition
            .multi_line
            .iter()
            .map(|pair| {
                Ok(Delimiters {
                    start: Pattern::compile(&pair.start, ci, token_type)?,
                    end: Pattern::compile(&pair.end, ci, token_type)?,
                })
            })
            .collect::<Result<Vec<_>, SyntaxError>>()?;

        let sub_types = definition
            .sub_types
            .iter()
            .map(|sub| {
                Ok(SubType {
                    token_type: sub.token_type,
                    pattern: Pattern::compile(&sub.pattern, ci, sub.token_type)?,
                })
            })
            .collect::<Result<Vec<_>, SyntaxError>>()?;

        let auto_completion = definition
            .auto_completion
            .iter()
            .map(|entry| AutoCompletionEntry {
                text: entry.text.clone(),
                description: entry.description.clone(),
                trigger: entry.trigger.or(definition.auto_completion_char),
            })
            .collect();

        Ok(Self {
            token_type,
            pattern,
            multi_line,
            sub_types,
            auto_completion,
            auto_completion_char: definition.auto_completion_char,
        })
    }

    /// Token type produced when no sub-type applies.
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Single-line pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Multi-line delimiter pairs, in declaration order.
    pub fn multi_line(&self) -> &[Delimiters] {
        &self.multi_line
    }

    /// Returns `true` if the rule declares at least one multi-line pair.
    pub fn is_multi_line(&self) -> bool {
        !self.multi_line.is_empty()
    }

    /// Sub-types, in the order they are tried.
    pub fn sub_types(&self) -> &[SubType] {
        &self.sub_types
    }

    /// Autocompletion entries contributed by this rule.
    pub fn auto_completion(&self) -> &[AutoCompletionEntry] {
        &self.auto_completion
    }

    /// Default trigger character of the entries.
    pub fn auto_completion_char(&self) -> Option<char> {
        self.auto_completion_char
    }

    /// Token type for `matched`: the first sub-type whose pattern is found in it, else the
    /// rule's own type.
    pub fn resolve_type(&self, matched: &str) -> TokenType {
        self.sub_types
            .iter()
            .find(|sub| sub.pattern.is_found_in(matched))
            .map_or(self.token_type, |sub| sub.token_type)
    }

    /// Byte length of a non-empty match of the rule's pattern anchored at `at`, ending at or
    /// before `end`.
    pub(crate) fn match_at(&self, text: &str, at: usize, end: usize) -> Option<usize> {
        self.pattern.match_within(text, at, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_at_is_anchored_and_sees_context() {
        let rule = Rule::compile(&RuleDefinition::new(TokenType::Attribute, r"(?<=\s)\w+")).unwrap();
        let text = "<node name>";
        assert_eq!(rule.match_at(text, 1, text.len()), None);
        assert_eq!(rule.match_at(text, 6, text.len()), Some(4));
        assert_eq!(rule.match_at(text, 6, 8), Some(2));
    }

    #[test]
    fn test_match_within_keeps_look_ahead_past_end() {
        let pattern = Pattern::compile(r"\w+(?=/\*)", false, TokenType::Function).unwrap();
        let text = "foo/*x*/";
        assert_eq!(pattern.match_within(text, 0, 3), Some(3));
        assert_eq!(pattern.match_at(&text[..3], 0), None);

        let pattern = Pattern::compile(r"\w+$", false, TokenType::Identifier).unwrap();
        assert_eq!(pattern.match_within("foo/*", 0, 3), None);
    }

    #[test]
    fn test_empty_match_is_no_match() {
        let rule = Rule::compile(&RuleDefinition::new(TokenType::Value, r"[a-z]*")).unwrap();
        assert_eq!(rule.match_at("123", 0, 3), None);
        assert_eq!(rule.match_at("abc", 0, 3), Some(3));
    }

    #[test]
    fn test_sub_type_resolution_first_hit_wins() {
        let rule = Rule::compile(
            &RuleDefinition::new(TokenType::String, r#"'''.*|""".*"#)
                .sub_type(TokenType::Comment, r#"^""""#)
                .sub_type(TokenType::Value, r"'"),
        )
        .unwrap();
        assert_eq!(rule.resolve_type(r#""""doc"#), TokenType::Comment);
        assert_eq!(rule.resolve_type("'''raw"), TokenType::Value);
        assert_eq!(rule.resolve_type("plain"), TokenType::String);
    }

    #[test]
    fn test_case_insensitive_applies_to_all_patterns() {
        let rule = Rule::compile(
            &RuleDefinition::new(TokenType::Keyword, r"select")
                .case_insensitive()
                .multi_line("begin", "end"),
        )
        .unwrap();
        assert_eq!(rule.match_at("SELECT *", 0, 8), Some(6));
        assert_eq!(rule.multi_line()[0].start.find_from("x BEGIN", 0), Some((2, 7)));
    }

    #[test]
    fn test_compile_errors() {
        let err = Rule::compile(&RuleDefinition::new(TokenType::Keyword, "(unclosed")).unwrap_err();
        assert!(matches!(err, SyntaxError::RegexCompile { .. }));

        let err = Rule::compile(&RuleDefinition::new(TokenType::Keyword, "")).unwrap_err();
        assert!(matches!(err, SyntaxError::EmptyPattern("keyword")));

        let err = Rule::compile(&RuleDefinition::new(TokenType::Comment, "#.*").multi_line("", "x"))
            .unwrap_err();
        assert!(matches!(err, SyntaxError::EmptyPattern(_)));
    }

    #[test]
    fn test_find_non_empty_skips_empty_matches() {
        let pattern = Pattern::compile(r"x*", false, TokenType::Unknown).unwrap();
        assert_eq!(pattern.find_from("abxx", 0), Some((0, 0)));
        assert_eq!(pattern.find_non_empty_from("abxx", 0), Some((2, 4)));
        assert_eq!(pattern.find_non_empty_from("abé", 0), None);
    }

    #[test]
    fn test_entries_inherit_rule_trigger_char() {
        let definition = RuleDefinition::new(TokenType::Keyword, r"\bfor\b")
            .auto_completion_char('k')
            .auto_completion("for", "loop");
        let rule = Rule::compile(&definition).unwrap();
        assert_eq!(rule.auto_completion()[0].trigger, Some('k'));
        assert_eq!(rule.auto_completion()[0].description.as_deref(), Some("loop"));
    }
}
