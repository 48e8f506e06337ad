use crate::caret::CaretTokenTracker;
use crate::definition::{LanguageSource, RuleDefinition, StyleDefinition};
use crate::error::SyntaxError;
use crate::highlighter::StateId;
use crate::proposals::{Completion, ProposalEntry, ProposalIndex};
use crate::rule::{Delimiters, Rule};
use crate::theme::{Color, DARK_THEME, StyleRecord, ThemeStyleTable};
use crate::token::{TokenSequence, TokenType};
use crate::tokenizer::Tokenizer;
use std::collections::BTreeMap;
use std::path::Path;

/// A multi-line construct with its state id.
///
/// Ids are assigned by walking the rules in declaration order, then each rule's delimiter pairs
/// in order, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiLineState {
    /// State id carried from line to line while the construct is open.
    pub id: StateId,
    /// Index of the owning rule.
    pub rule: usize,
    /// Index of the delimiter pair within the rule.
    pub pair: usize,
}

/// A compiled, immutable language: rules, themes and autocompletion entries.
///
/// Build one with [`LanguageDefinition::builder`] or load it from YAML, then share it between
/// highlighters through an `Arc`.
#[derive(Debug, Clone)]
pub struct LanguageDefinition {
    name: String,
    extensions: Vec<String>,
    rules: Vec<Rule>,
    multi_line_states: Vec<MultiLineState>,
    styles: ThemeStyleTable,
    proposals: ProposalIndex,
}

impl LanguageDefinition {
    /// Start building a language named `name`.
    pub fn builder(name: impl Into<String>) -> LanguageBuilder {
        LanguageBuilder::new(name)
    }

    /// Compile and validate a raw definition.
    pub fn from_source(source: LanguageSource) -> Result<Self, SyntaxError> {
        let rules = source
            .rules
            .iter()
            .map(Rule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let multi_line_states = flatten_multi_line(&source.rules)?;
        let styles = compile_styles(
            source.default_theme.as_deref().unwrap_or(DARK_THEME),
            &source.styles,
        )?;
        let proposals = ProposalIndex::build(&rules);

        log::debug!(
            "built language '{}': {} rules, {} multi-line states, {} themes, {} proposals",
            source.name,
            rules.len(),
            multi_line_states.len(),
            styles.themes().len(),
            proposals.len()
        );

        Ok(Self {
            name: source.name,
            extensions: source.extensions,
            rules,
            multi_line_states,
            styles,
            proposals,
        })
    }

    /// Load a language from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SyntaxError> {
        let source: LanguageSource = serde_yaml::from_str(yaml)?;
        Self::from_source(source)
    }

    /// Load a language from a YAML file.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SyntaxError> {
        let path = path.as_ref();
        log::debug!("loading language definition from {}", path.display());
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File extensions, with their leading dot.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Rules in precedence order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Every multi-line construct, ordered by state id.
    pub fn multi_line_states(&self) -> &[MultiLineState] {
        &self.multi_line_states
    }

    /// Rule and delimiters of the construct with state `id`.
    pub fn multi_line_state(&self, id: StateId) -> Option<(&Rule, &Delimiters)> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        let state = self.multi_line_states.get(index)?;
        let rule = self.rules.get(state.rule)?;
        Some((rule, rule.multi_line().get(state.pair)?))
    }

    /// Tokenize one line, ignoring multi-line constructs.
    pub fn tokenize(&self, line: &str) -> TokenSequence {
        self.tokenizer().tokenize(line)
    }

    /// Tokenizer over this language's rules.
    pub fn tokenizer(&self) -> Tokenizer<'_> {
        Tokenizer::new(&self.rules)
    }

    /// Theme × token type style table.
    pub fn style_table(&self) -> &ThemeStyleTable {
        &self.styles
    }

    /// Style of `token_type` in `theme`, falling back to the default theme.
    pub fn style(&self, theme: &str, token_type: TokenType) -> StyleRecord {
        self.styles.style(theme, token_type)
    }

    /// Style of `rule`'s token type in `theme`.
    pub fn style_for_rule(&self, theme: &str, rule: &Rule) -> StyleRecord {
        self.style(theme, rule.token_type())
    }

    /// Theme ids with at least one style.
    pub fn themes(&self) -> &[String] {
        self.styles.themes()
    }

    /// Theme used when no other is selected, and as the lookup fallback.
    pub fn default_theme(&self) -> &str {
        self.styles.default_theme()
    }

    /// Autocompletion entries of every rule.
    pub fn proposal_index(&self) -> &ProposalIndex {
        &self.proposals
    }

    /// Completion strings starting with `partial`; see [`ProposalIndex::proposals`].
    pub fn proposals(&self, partial: &str) -> Vec<String> {
        self.proposals.proposals(partial)
    }

    /// Entries starting with `partial`, with their descriptions.
    pub fn proposal_entries(&self, partial: &str) -> Vec<&ProposalEntry> {
        self.proposals.entries(partial)
    }

    /// Proposals for the text around the caret.
    ///
    /// The merged prefix is searched first. When it yields nothing the caret token's own text is
    /// searched instead. Returns `None` when nothing matches or when the only match is the
    /// searched text itself.
    pub fn complete(&self, tracker: &CaretTokenTracker) -> Option<Completion> {
        let prefix = tracker.completion_prefix()?;

        let mut search = prefix.merged;
        let mut proposals = self.proposals(&search);
        if proposals.is_empty() {
            search = prefix.token;
            proposals = self.proposals(&search);
        }

        match proposals.as_slice() {
            [] => None,
            [only] if *only == search => None,
            _ => Some(Completion {
                prefix: search,
                proposals,
            }),
        }
    }
}

fn flatten_multi_line(rules: &[RuleDefinition]) -> Result<Vec<MultiLineState>, SyntaxError> {
    let mut states: Vec<MultiLineState> = Vec::new();
    let mut seen: Vec<(&str, &str)> = Vec::new();

    for (rule_index, rule) in rules.iter().enumerate() {
        for (pair_index, pair) in rule.multi_line.iter().enumerate() {
            let key = (pair.start.as_str(), pair.end.as_str());
            if seen.contains(&key) {
                return Err(SyntaxError::DuplicateMultiLine {
                    start: pair.start.clone(),
                    end: pair.end.clone(),
                });
            }
            seen.push(key);

            states.push(MultiLineState {
                id: states.len() as StateId + 1,
                rule: rule_index,
                pair: pair_index,
            });
        }
    }
    Ok(states)
}

fn compile_styles(
    default_theme: &str,
    styles: &BTreeMap<String, BTreeMap<TokenType, StyleDefinition>>,
) -> Result<ThemeStyleTable, SyntaxError> {
    let mut table = ThemeStyleTable::new(default_theme);

    // The default theme is registered first so it leads `themes()`.
    let ordered = styles
        .get_key_value(default_theme)
        .into_iter()
        .chain(styles.iter().filter(|(theme, _)| theme.as_str() != default_theme));

    for (theme, entries) in ordered {
        for (&token_type, style) in entries {
            let parse = |value: &Option<String>| -> Result<Option<Color>, SyntaxError> {
                value
                    .as_deref()
                    .map(|v| {
                        v.parse::<Color>().map_err(|_| SyntaxError::InvalidColor {
                            theme: theme.clone(),
                            token_type: token_type.id(),
                            value: v.to_string(),
                        })
                    })
                    .transpose()
            };
            let record = StyleRecord {
                foreground: parse(&style.fg)?,
                background: parse(&style.bg)?,
                bold: style.bold,
                italic: style.italic,
            };
            table.set_style(theme, token_type, record);
        }
    }
    Ok(table)
}

/// Builder for [`LanguageDefinition`].
#[derive(Debug, Clone)]
pub struct LanguageBuilder {
    source: LanguageSource,
}

impl LanguageBuilder {
    /// Empty language named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            source: LanguageSource {
                name: name.into(),
                extensions: Vec::new(),
                default_theme: None,
                rules: Vec::new(),
                styles: BTreeMap::new(),
            },
        }
    }

    /// Add a file extension (e.g. `.xml`).
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.source.extensions.push(extension.into());
        self
    }

    /// Theme used by default and as the style fallback (`dark` if unset).
    pub fn default_theme(mut self, theme: impl Into<String>) -> Self {
        self.source.default_theme = Some(theme.into());
        self
    }

    /// Append a rule; earlier rules take precedence.
    pub fn rule(mut self, rule: RuleDefinition) -> Self {
        self.source.rules.push(rule);
        self
    }

    /// Style `token_type` in `theme`. Colors are validated by [`build`](Self::build).
    pub fn style(mut self, theme: &str, token_type: TokenType, style: StyleDefinition) -> Self {
        self.source
            .styles
            .entry(theme.to_string())
            .or_default()
            .insert(token_type, style);
        self
    }

    /// Compile the rules and validate the styles.
    pub fn build(self) -> Result<LanguageDefinition, SyntaxError> {
        LanguageDefinition::from_source(self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caret::TextPosition;
    use crate::theme::LIGHT_THEME;
    use pretty_assertions::assert_eq;

    fn language() -> LanguageDefinition {
        LanguageDefinition::builder("Test")
            .extension(".tst")
            .rule(
                RuleDefinition::new(TokenType::Comment, r"/\*.*?\*/")
                    .multi_line(r"/\*", r"\*/"),
            )
            .rule(
                RuleDefinition::new(TokenType::String, r#""""[\s\S]*?""""#)
                    .multi_line(r#"""""#, r#"""""#)
                    .multi_line(r"'''", r"'''"),
            )
            .rule(
                RuleDefinition::new(TokenType::Keyword, r"\b(?:for|foreach|format)\b")
                    .auto_completion("for", "")
                    .auto_completion("foreach", "")
                    .auto_completion("format", ""),
            )
            .rule(RuleDefinition::new(TokenType::Identifier, r"\w+"))
            .rule(RuleDefinition::new(TokenType::Space, r"\s+"))
            .style(LIGHT_THEME, TokenType::Keyword, StyleDefinition::fg("#0000ff").bold())
            .style(DARK_THEME, TokenType::Keyword, StyleDefinition::fg("#c678dd"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_multi_line_states_are_flattened_in_declaration_order() {
        let language = language();
        assert_eq!(
            language.multi_line_states(),
            &[
                MultiLineState { id: 1, rule: 0, pair: 0 },
                MultiLineState { id: 2, rule: 1, pair: 0 },
                MultiLineState { id: 3, rule: 1, pair: 1 },
            ]
        );
        let (rule, delimiters) = language.multi_line_state(3).unwrap();
        assert_eq!(rule.token_type(), TokenType::String);
        assert_eq!(delimiters.start.source(), "'''");
        assert!(language.multi_line_state(0).is_none());
        assert!(language.multi_line_state(4).is_none());
    }

    #[test]
    fn test_default_theme_is_listed_first() {
        let language = language();
        assert_eq!(language.themes(), &["dark".to_string(), "light".to_string()]);
        assert_eq!(language.default_theme(), DARK_THEME);
        assert!(language.style(LIGHT_THEME, TokenType::Keyword).bold);
    }

    #[test]
    fn test_invalid_color_fails_build() {
        let err = LanguageDefinition::builder("Broken")
            .rule(RuleDefinition::new(TokenType::Keyword, "x"))
            .style(LIGHT_THEME, TokenType::Keyword, StyleDefinition::fg("blue"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::InvalidColor { ref theme, token_type: "keyword", ref value }
                if theme == "light" && value == "blue"
        ));
    }

    #[test]
    fn test_duplicate_multi_line_pair_fails_build() {
        let err = LanguageDefinition::builder("Broken")
            .rule(RuleDefinition::new(TokenType::Comment, "#.*").multi_line("<<", ">>"))
            .rule(RuleDefinition::new(TokenType::String, "'.*'").multi_line("<<", ">>"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SyntaxError::DuplicateMultiLine { .. }));
    }

    #[test]
    fn test_complete_from_caret() {
        let language = language();
        let mut tracker = CaretTokenTracker::new();

        tracker.update(TextPosition::new(0, 2), language.tokenize("fo"));
        let completion = language.complete(&tracker).unwrap();
        assert_eq!(completion.prefix, "fo");
        assert_eq!(completion.proposals, vec!["for", "foreach", "format"]);

        // Exactly the typed text: nothing to propose.
        tracker.update(TextPosition::new(0, 7), language.tokenize("foreach"));
        assert_eq!(language.complete(&tracker), None);

        tracker.update(TextPosition::new(0, 3), language.tokenize("xyz"));
        assert_eq!(language.complete(&tracker), None);

        tracker.update(TextPosition::new(0, 0), language.tokenize(""));
        assert_eq!(language.complete(&tracker), None);
    }

    #[test]
    fn test_complete_falls_back_to_caret_token() {
        let language = LanguageDefinition::builder("Test")
            .rule(RuleDefinition::new(TokenType::Identifier, r"[a-z]+").auto_completion(".len", ""))
            .build()
            .unwrap();

        // The trailing "." is unknown, so it merges with "ab" into "ab." which matches nothing.
        let mut tracker = CaretTokenTracker::new();
        tracker.update(TextPosition::new(0, 3), language.tokenize("ab."));
        let completion = language.complete(&tracker).unwrap();
        assert_eq!(completion.prefix, ".");
        assert_eq!(completion.proposals, vec![".len"]);
    }

    #[test]
    fn test_language_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LanguageDefinition>();
    }
}
