//! Autocompletion proposals.
//!
//! Completion strings may embed two reserved markers:
//!
//! - [`CARET_MARKER`]: the caret lands on its first occurrence once the completion is inserted.
//!   A pair of caret markers brackets a placeholder value, and everything from the first caret
//!   marker on is an *optional suffix* that is only inserted when nothing but whitespace follows
//!   the insertion point.
//! - [`SECONDARY_MARKER`]: brackets informational segments. It is dropped on insertion and only
//!   used to render the completion list (see [`display_segments`]).

use crate::rule::Rule;
use crate::token::TokenType;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// Caret position / placeholder bounds inside a completion string.
pub const CARET_MARKER: char = '\u{1}';
/// Bounds of informational segments inside a completion string.
pub const SECONDARY_MARKER: char = '\u{2}';

/// One autocompletion entry, as listed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalEntry {
    /// Completion string, markers included.
    pub text: String,
    /// Help text.
    pub description: Option<String>,
    /// Token type of the rule that contributed the entry.
    pub token_type: TokenType,
    /// Trigger character the entry is grouped under.
    pub trigger: Option<char>,
}

/// Prefix-searchable table of every autocompletion entry of a language.
///
/// Entries are kept sorted by trigger character, then case-insensitively by text.
#[derive(Debug, Clone, Default)]
pub struct ProposalIndex {
    entries: Vec<ProposalEntry>,
}

impl ProposalIndex {
    /// Collect and sort the entries of `rules`.
    pub fn build(rules: &[Rule]) -> Self {
        let mut entries: Vec<ProposalEntry> = rules
            .iter()
            .flat_map(|rule| {
                rule.auto_completion().iter().map(|entry| ProposalEntry {
                    text: entry.text.clone(),
                    description: entry.description.clone(),
                    token_type: rule.token_type(),
                    trigger: entry.trigger,
                })
            })
            .collect();

        entries.sort_by_cached_key(|entry| (entry.trigger, entry.text.to_lowercase()));
        Self { entries }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no rule contributes an entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry, in index order.
    pub fn all(&self) -> &[ProposalEntry] {
        &self.entries
    }

    /// Entries whose text starts with `partial`.
    ///
    /// Matching is case-insensitive and any whitespace run in `partial` matches one or more
    /// whitespace characters. An empty `partial` matches nothing.
    pub fn entries(&self, partial: &str) -> Vec<&ProposalEntry> {
        let Some(regex) = prefix_regex(partial) else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|entry| regex.is_match(&entry.text))
            .collect()
    }

    /// Completion strings starting with `partial`, in index order and without duplicates.
    pub fn proposals(&self, partial: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries(partial)
            .into_iter()
            .filter(|entry| seen.insert(entry.text.as_str()))
            .map(|entry| entry.text.clone())
            .collect()
    }
}

fn prefix_regex(partial: &str) -> Option<Regex> {
    if partial.is_empty() {
        return None;
    }

    let mut pattern = String::from("^");
    let mut in_space = false;
    let mut buf = [0u8; 4];
    for ch in partial.chars() {
        if ch.is_whitespace() {
            if !in_space {
                pattern.push_str(r"\s+");
            }
            in_space = true;
        } else {
            pattern.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
            in_space = false;
        }
    }

    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(err) => {
            log::warn!("cannot build proposal pattern for {partial:?}: {err}");
            None
        }
    }
}

/// Result of a caret-driven completion query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Text the proposals were searched with.
    pub prefix: String,
    /// Matching completion strings.
    pub proposals: Vec<String>,
}

/// Text to insert for an accepted completion, and where the caret goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionInsertion {
    /// Text to insert at the caret.
    pub text: String,
    /// Caret offset inside `text`, in characters.
    pub caret: usize,
}

/// Turn a completion string into the text to insert.
///
/// `typed` is the number of characters of the completion already present before the caret;
/// they are not inserted again. The optional suffix is only added when `next_char_is_blank`
/// (the insertion point is followed by whitespace or the end of the line).
pub fn materialize(completion: &str, typed: usize, next_char_is_blank: bool) -> CompletionInsertion {
    let stripped: String = completion
        .chars()
        .filter(|&c| c != SECONDARY_MARKER)
        .collect();
    let mut parts = stripped.split(CARET_MARKER);
    let head = parts.next().unwrap_or_default();
    let suffix: Vec<&str> = parts.collect();

    let mut text: String = head.chars().skip(typed).collect();
    let caret = text.chars().count();

    if next_char_is_blank && let Some((placeholder, rest)) = suffix.split_first() {
        text.push_str(placeholder);
        // Odd parts sit between a closing and an opening marker.
        for part in rest.iter().step_by(2) {
            text.push_str(part);
        }
    }

    CompletionInsertion { text, caret }
}

/// One rendered piece of a completion string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySegment<'a> {
    /// Segment text, markers removed.
    pub text: &'a str,
    /// Informational text, usually rendered dimmed.
    pub secondary: bool,
}

/// Split a completion string into primary and secondary segments for display.
///
/// Both markers delimit segments; segments alternate primary / secondary. Empty segments are
/// skipped.
pub fn display_segments(completion: &str) -> Vec<DisplaySegment<'_>> {
    completion
        .split([CARET_MARKER, SECONDARY_MARKER])
        .enumerate()
        .filter(|(_, text)| !text.is_empty())
        .map(|(i, text)| DisplaySegment {
            text,
            secondary: i % 2 == 1,
        })
        .collect()
}
