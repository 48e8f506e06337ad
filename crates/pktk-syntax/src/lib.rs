#![warn(missing_docs)]
//! `pktk-syntax` - incremental, multi-line aware syntax highlighting for embedded code editors.
//!
//! A [`LanguageDefinition`] is an ordered list of regex [`Rule`]s plus per-theme styles and
//! autocompletion entries. The [`Highlighter`] tokenizes a document line by line, carrying open
//! multi-line constructs (block comments, CDATA sections, ...) from one line to the next and
//! reusing per-line memos when nothing changed. The [`CaretTokenTracker`] resolves the token
//! under the caret and feeds [`LanguageDefinition::complete`].
//!
//! Languages are built in code through [`LanguageDefinition::builder`] or loaded from YAML with
//! [`LanguageDefinition::from_yaml_str`].

mod caret;
mod definition;
mod error;
mod highlighter;
mod language;
mod proposals;
mod rule;
mod theme;
mod token;
mod tokenizer;

pub use caret::{
    BoundaryPolicy, CaretReport, CaretTokenTracker, CompletionPrefix, ReportPosition,
    TextPosition, resolve_offset, token_at,
};
pub use definition::{
    AutoCompletionDefinition, LanguageSource, MultiLineDefinition, RuleDefinition,
    StyleDefinition, SubTypeDefinition,
};
pub use error::SyntaxError;
pub use highlighter::{
    BlockHighlightState, Highlighter, LineHighlight, NO_STATE, RenderSpan, StateId,
    highlight_text,
};
pub use language::{LanguageBuilder, LanguageDefinition, MultiLineState};
pub use proposals::{
    CARET_MARKER, Completion, CompletionInsertion, DisplaySegment, ProposalEntry, ProposalIndex,
    SECONDARY_MARKER, display_segments, materialize,
};
pub use rule::{AutoCompletionEntry, Delimiters, Pattern, Rule, SubType};
pub use theme::{Color, DARK_THEME, InvalidColor, LIGHT_THEME, StyleRecord, ThemeStyleTable};
pub use token::{Token, TokenSequence, TokenType};
pub use tokenizer::Tokenizer;
