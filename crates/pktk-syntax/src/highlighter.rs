use crate::caret::CaretTokenTracker;
use crate::language::LanguageDefinition;
use crate::proposals::Completion;
use crate::rule::{Pattern, Rule};
use crate::theme::{DARK_THEME, StyleRecord};
use crate::token::{Token, TokenSequence, TokenType};
use crate::tokenizer::push_token;
use std::ops::Range;
use std::sync::Arc;

/// Identifier of the multi-line construct left open at the end of a line.
pub type StateId = u32;

/// No open multi-line construct.
pub const NO_STATE: StateId = 0;

/// Per-line memo of the last highlighting pass.
///
/// A memo is reused only when both the raw text and the incoming state are identical to the ones
/// it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHighlightState {
    raw_text: String,
    tokens: TokenSequence,
    previous_state: StateId,
    current_state: StateId,
}

impl BlockHighlightState {
    /// Text the tokens were computed from.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Tokens computed for [`raw_text`](Self::raw_text).
    pub fn tokens(&self) -> &TokenSequence {
        &self.tokens
    }

    /// State carried in from the previous line.
    pub fn previous_state(&self) -> StateId {
        self.previous_state
    }

    /// State carried out to the next line.
    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    fn is_fresh(&self, text: &str, previous_state: StateId) -> bool {
        self.previous_state == previous_state && self.raw_text == text
    }
}

/// A styled region of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSpan {
    /// 1-based column.
    pub column: usize,
    /// Length in characters.
    pub length: usize,
    /// Kind of the underlying token.
    pub token_type: TokenType,
    /// Style in the active theme.
    pub style: StyleRecord,
}

/// Highlighting result for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHighlight {
    /// Tokens of the line, cursor reset.
    pub tokens: TokenSequence,
    /// State carried out to the next line.
    pub state: StateId,
    /// One span per token, styled for the active theme.
    pub spans: Vec<RenderSpan>,
}

#[derive(Debug, Clone, Default)]
struct LineSlot {
    text: String,
    block: Option<BlockHighlightState>,
}

impl LineSlot {
    fn new(text: String) -> Self {
        Self { text, block: None }
    }

    fn is_fresh(&self, previous_state: StateId) -> bool {
        self.block
            .as_ref()
            .is_some_and(|block| block.is_fresh(&self.text, previous_state))
    }
}

/// Incremental, multi-line aware highlighter for one document.
///
/// The highlighter keeps the document lines and one [`BlockHighlightState`] per line. Lines
/// `0..valid` always form a consistent chain: every memo matches its line text and its incoming
/// state is the previous line's outgoing state. Edits shrink that prefix and either cascade
/// immediately or, in mass-update mode, wait for [`Highlighter::set_mass_update`] to be turned off.
/// Anything past the prefix is derived on demand by [`Highlighter::line`].
#[derive(Debug, Clone)]
pub struct Highlighter {
    language: Option<Arc<LanguageDefinition>>,
    theme: String,
    lines: Vec<LineSlot>,
    valid: usize,
    mass_update: bool,
    dirty_from: Option<usize>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self {
            language: None,
            theme: DARK_THEME.to_string(),
            lines: Vec::new(),
            valid: 0,
            mass_update: false,
            dirty_from: None,
        }
    }
}

impl Highlighter {
    /// Create a highlighter for `language`, using its default theme.
    pub fn new(language: Arc<LanguageDefinition>) -> Self {
        Self {
            theme: language.default_theme().to_string(),
            language: Some(language),
            ..Self::default()
        }
    }

    /// Current language, if any.
    pub fn language(&self) -> Option<&Arc<LanguageDefinition>> {
        self.language.as_ref()
    }

    /// Swap the language (or drop it) and rehighlight the whole document.
    pub fn set_language(&mut self, language: Option<Arc<LanguageDefinition>>) {
        log::debug!(
            "switching language to {}",
            language.as_ref().map_or("<none>", |l| l.name())
        );
        self.language = language;
        for slot in &mut self.lines {
            slot.block = None;
        }
        self.valid = 0;
        self.rehighlight();
    }

    /// Active theme id.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Select the active theme. Tokens are kept; only the styles of later spans change.
    pub fn set_theme(&mut self, theme: impl Into<String>) {
        let theme = theme.into();
        if let Some(language) = &self.language
            && !language.style_table().has_theme(&theme)
        {
            log::warn!(
                "theme '{theme}' is not defined for '{}', using '{}' styles",
                language.name(),
                language.default_theme()
            );
        }
        self.theme = theme;
    }

    /// Themes available for the current language.
    pub fn themes(&self) -> &[String] {
        match &self.language {
            Some(language) => language.themes(),
            None => &[],
        }
    }

    /// Style of `token_type` in the active theme.
    pub fn style(&self, token_type: TokenType) -> StyleRecord {
        self.language
            .as_ref()
            .map_or_else(StyleRecord::default, |l| l.style(&self.theme, token_type))
    }

    /// Style of `rule`'s token type in the active theme.
    pub fn style_for_rule(&self, rule: &Rule) -> StyleRecord {
        self.style(rule.token_type())
    }

    /// Completion strings starting with `partial`; empty without a language.
    pub fn proposals(&self, partial: &str) -> Vec<String> {
        self.language
            .as_ref()
            .map_or_else(Vec::new, |language| language.proposals(partial))
    }

    /// Proposals for the caret position; `None` without a language.
    ///
    /// See [`LanguageDefinition::complete`].
    pub fn complete(&self, tracker: &CaretTokenTracker) -> Option<Completion> {
        self.language.as_ref()?.complete(tracker)
    }

    /// Number of document lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of `line`.
    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(|slot| slot.text.as_str())
    }

    /// Memo of `line`, as left by the last pass (possibly stale).
    pub fn block(&self, line: usize) -> Option<&BlockHighlightState> {
        self.lines.get(line).and_then(|slot| slot.block.as_ref())
    }

    /// Returns `true` while mass-update mode is on.
    pub fn is_mass_update(&self) -> bool {
        self.mass_update
    }

    /// Highlight `text` as line `line`, given the state the previous line ended with.
    ///
    /// This is the host-driven entry point: the host owns the line order and feeds the returned
    /// state to the next line itself. The line's memo is reused when text and state are unchanged.
    pub fn highlight_line(
        &mut self,
        line: usize,
        text: &str,
        previous_state: StateId,
    ) -> LineHighlight {
        if line >= self.lines.len() {
            self.lines.resize_with(line + 1, LineSlot::default);
        }

        let slot = &mut self.lines[line];
        if slot.text != text {
            slot.text = text.to_string();
        }
        let was_fresh = slot.is_fresh(previous_state);
        let chained = line <= self.valid && previous_state == self.incoming_state(line);

        self.compute_line(line, previous_state);

        if !chained {
            self.valid = self.valid.min(line);
        } else if line == self.valid || !was_fresh {
            self.valid = line + 1;
        }

        self.render(line)
    }

    /// Highlight of `line`, deriving any stale part of the chain before it first.
    pub fn line(&mut self, line: usize) -> Option<LineHighlight> {
        if line >= self.lines.len() {
            return None;
        }
        self.derive_through(line + 1);
        Some(self.render(line))
    }

    /// Replace the document with `text`, split on line breaks.
    pub fn set_text(&mut self, text: &str) {
        self.set_lines(
            text.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string()),
        );
    }

    /// Replace the document with `lines` and rehighlight it.
    pub fn set_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines
            .into_iter()
            .map(|line| LineSlot::new(line.into()))
            .collect();
        self.valid = 0;
        self.rehighlight();
    }

    /// Replace the text of `line` and cascade to the following lines.
    ///
    /// Returns the lines whose highlighting was recomputed. Nothing is recomputed in mass-update
    /// mode, or when the lines before `line` have not been derived yet.
    pub fn text_changed(&mut self, line: usize, text: &str) -> Range<usize> {
        let Some(slot) = self.lines.get_mut(line) else {
            log::warn!("text change on line {line}, document has {} lines", self.lines.len());
            return line..line;
        };
        slot.text = text.to_string();
        self.edited(line)
    }

    /// Insert `lines` before line `at` (`at == line_count()` appends).
    pub fn insert_lines<I, S>(&mut self, at: usize, lines: I) -> Range<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let at = at.min(self.lines.len());
        let inserted: Vec<LineSlot> = lines
            .into_iter()
            .map(|line| LineSlot::new(line.into()))
            .collect();
        let count = inserted.len();
        if count == 0 {
            return at..at;
        }

        self.lines.splice(at..at, inserted);
        self.relocate_from(at + count);
        if self.valid > at {
            self.valid += count;
        }
        self.edited(at)
    }

    /// Remove the lines in `range` (clamped to the document).
    pub fn remove_lines(&mut self, range: Range<usize>) -> Range<usize> {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        if start == end {
            return start..start;
        }

        self.lines.drain(start..end);
        self.relocate_from(start);
        if self.valid >= end {
            self.valid -= end - start;
        } else {
            self.valid = self.valid.min(start);
        }

        if start < self.lines.len() {
            self.edited(start)
        } else {
            start..start
        }
    }

    /// Rehighlight the whole document in one mass-update pass.
    pub fn rehighlight(&mut self) {
        let nested = self.mass_update;
        self.mass_update = true;
        self.mark_dirty(0);
        if !nested {
            self.set_mass_update(false);
        }
    }

    /// Enter or leave mass-update mode.
    ///
    /// While the mode is on, edits only record the first dirty line; leaving it derives the whole
    /// document once from there. Results are the same as with per-edit cascades.
    pub fn set_mass_update(&mut self, enabled: bool) {
        if enabled {
            self.mass_update = true;
            return;
        }
        self.mass_update = false;
        if let Some(from) = self.dirty_from.take() {
            self.valid = self.valid.min(from);
            let start = self.valid;
            self.derive_through(self.lines.len());
            log::debug!("mass update: highlighted lines {start}..{}", self.lines.len());
        }
    }

    fn edited(&mut self, line: usize) -> Range<usize> {
        if self.mass_update {
            self.mark_dirty(line);
            return line..line;
        }
        if self.valid < line {
            // Earlier lines are not derived yet; `line()` will get here.
            return line..line;
        }
        self.cascade(line)
    }

    fn mark_dirty(&mut self, line: usize) {
        self.dirty_from = Some(self.dirty_from.map_or(line, |from| from.min(line)));
        self.valid = self.valid.min(line);
    }

    /// Recompute `from`, then every following line until one is already up to date with its
    /// incoming state. Requires `from <= valid`.
    fn cascade(&mut self, from: usize) -> Range<usize> {
        let len = self.lines.len();
        let mut previous = self.incoming_state(from);
        let mut line = from;
        let mut consistent_to = len;

        while line < len {
            if line > from && self.lines[line].is_fresh(previous) {
                consistent_to = line + 1;
                break;
            }
            previous = self.compute_line(line, previous);
            line += 1;
        }

        self.valid = self.valid.max(consistent_to);
        log::trace!("cascade: recomputed lines {from}..{line}");
        from..line
    }

    fn derive_through(&mut self, end: usize) {
        let end = end.min(self.lines.len());
        while self.valid < end {
            let line = self.valid;
            let previous = self.incoming_state(line);
            self.compute_line(line, previous);
            self.valid += 1;
        }
    }

    fn incoming_state(&self, line: usize) -> StateId {
        line.checked_sub(1)
            .and_then(|previous| self.block(previous))
            .map_or(NO_STATE, BlockHighlightState::current_state)
    }

    fn relocate_from(&mut self, from: usize) {
        for (line, slot) in self.lines.iter_mut().enumerate().skip(from) {
            if let Some(block) = &mut slot.block {
                block.tokens.relocate(line);
            }
        }
    }

    /// Bring the memo of `line` up to date and return its outgoing state.
    fn compute_line(&mut self, line: usize, previous_state: StateId) -> StateId {
        let slot = &mut self.lines[line];
        if let Some(block) = &mut slot.block
            && block.is_fresh(&slot.text, previous_state)
        {
            log::trace!("line {line}: memo reused");
            block.tokens.reset();
            return block.current_state;
        }

        let (tokens, current_state) = match &self.language {
            Some(language) => highlight_text(language, &slot.text, line, previous_state),
            None => plain_text(&slot.text, line, previous_state),
        };
        slot.block = Some(BlockHighlightState {
            raw_text: slot.text.clone(),
            tokens: TokenSequence::new(tokens),
            previous_state,
            current_state,
        });
        current_state
    }

    fn render(&self, line: usize) -> LineHighlight {
        let Some(block) = self.block(line) else {
            return LineHighlight {
                tokens: TokenSequence::default(),
                state: NO_STATE,
                spans: Vec::new(),
            };
        };

        let mut tokens = block.tokens.clone();
        tokens.reset();
        let spans = tokens
            .iter()
            .map(|token| RenderSpan {
                column: token.column(),
                length: token.length(),
                token_type: token.token_type(),
                style: self.style(token.token_type()),
            })
            .collect();

        LineHighlight {
            tokens,
            state: block.current_state,
            spans,
        }
    }
}

struct OpenMatch<'a> {
    start: usize,
    start_end: usize,
    id: StateId,
    rule: &'a Rule,
    end: &'a Pattern,
}

/// Tokenize one line, resolving multi-line constructs, given the incoming state.
///
/// Returns the tokens and the outgoing state.
pub fn highlight_text(
    language: &LanguageDefinition,
    text: &str,
    line: usize,
    previous_state: StateId,
) -> (Vec<Token>, StateId) {
    if text.is_empty() {
        return (Vec::new(), previous_state);
    }

    let tokenizer = language.tokenizer();
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut column = 1usize;

    if previous_state != NO_STATE {
        match language.multi_line_state(previous_state) {
            Some((rule, delimiters)) => match delimiters.end.find_from(text, 0) {
                Some((_, end)) => {
                    if end > 0 {
                        let span = &text[..end];
                        column = push_token(&mut tokens, rule.resolve_type(span), span, column, line);
                    }
                    pos = end;
                }
                None => {
                    push_token(&mut tokens, rule.resolve_type(text), text, column, line);
                    return (tokens, previous_state);
                }
            },
            None => log::warn!("line {line}: unknown incoming state {previous_state}, ignored"),
        }
    }

    while pos < text.len() {
        let mut best: Option<OpenMatch<'_>> = None;
        for state in language.multi_line_states() {
            let Some((rule, delimiters)) = language.multi_line_state(state.id) else {
                continue;
            };
            let Some((start, start_end)) = delimiters.start.find_non_empty_from(text, pos) else {
                continue;
            };
            // Strictly earlier only: ties keep the first declared construct.
            if best.as_ref().is_none_or(|b| start < b.start) {
                best = Some(OpenMatch {
                    start,
                    start_end,
                    id: state.id,
                    rule,
                    end: &delimiters.end,
                });
            }
        }

        let Some(open) = best else {
            break;
        };

        column = tokenizer.tokenize_span(text, pos, open.start, line, column, &mut tokens);
        match open.end.find_from(text, open.start_end) {
            Some((_, end)) => {
                let span = &text[open.start..end];
                column = push_token(&mut tokens, open.rule.resolve_type(span), span, column, line);
                pos = end;
            }
            None => {
                let span = &text[open.start..];
                push_token(&mut tokens, open.rule.resolve_type(span), span, column, line);
                return (tokens, open.id);
            }
        }
    }

    if pos < text.len() {
        tokenizer.tokenize_span(text, pos, text.len(), line, column, &mut tokens);
    }
    (tokens, NO_STATE)
}

fn plain_text(text: &str, line: usize, previous_state: StateId) -> (Vec<Token>, StateId) {
    if text.is_empty() {
        return (Vec::new(), previous_state);
    }
    (
        vec![Token::new(TokenType::Unknown, 1, line, text)],
        NO_STATE,
    )
}
