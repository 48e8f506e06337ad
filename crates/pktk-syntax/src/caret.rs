use crate::token::{Token, TokenSequence, TokenType};

/// Which token wins when the caret sits on the boundary between two tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// The token ending at the caret (what was just typed).
    PreferPrevious,
    /// The token starting at the caret.
    #[default]
    PreferNext,
}

/// A 0-based (line, column) position; columns count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TextPosition {
    /// 0-based line.
    pub line: usize,
    /// 0-based column, in characters.
    pub column: usize,
}

impl TextPosition {
    /// Position at `line`, `column`.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// 1-based form, for reporting to the host.
    pub fn to_report(self) -> ReportPosition {
        ReportPosition {
            row: self.line + 1,
            column: self.column + 1,
        }
    }
}

/// A 1-based (row, column) position as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportPosition {
    /// 1-based row.
    pub row: usize,
    /// 1-based column.
    pub column: usize,
}

/// Caret and selection summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretReport {
    /// Caret position.
    pub caret: ReportPosition,
    /// First selected position.
    pub selection_start: ReportPosition,
    /// Position after the last selected character.
    pub selection_end: ReportPosition,
    /// Selected characters, line breaks included.
    pub selection_length: usize,
}

/// Token under a caret placed before the 1-based `column`.
///
/// With [`BoundaryPolicy::PreferPrevious`] the token holding the character left of the caret is
/// returned, so a caret on a token's first column (or at the end of the line) resolves to the
/// preceding token. [`BoundaryPolicy::PreferNext`] returns the token holding the character right
/// of the caret.
pub fn token_at(tokens: &TokenSequence, column: usize, policy: BoundaryPolicy) -> Option<&Token> {
    match policy {
        BoundaryPolicy::PreferNext => tokens.token_at(column),
        BoundaryPolicy::PreferPrevious => column.checked_sub(1).and_then(|c| tokens.token_at(c)),
    }
}

/// Resolve a document character offset to a 0-based position.
///
/// `line_lengths` are the line lengths in characters, line breaks excluded; every line break
/// counts as one character. Offsets past the end clamp to the end of the last line.
pub fn resolve_offset(offset: usize, line_lengths: &[usize]) -> TextPosition {
    let mut remaining = offset;
    for (line, &len) in line_lengths.iter().enumerate() {
        if remaining <= len {
            return TextPosition::new(line, remaining);
        }
        remaining -= len + 1;
    }
    match line_lengths.len().checked_sub(1) {
        Some(last) => TextPosition::new(last, line_lengths[last]),
        None => TextPosition::default(),
    }
}

/// Text searched for completion proposals around the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPrefix {
    /// Caret token merged with the preceding tokens it belongs with.
    pub merged: String,
    /// Text of the caret token alone.
    pub token: String,
}

/// Tracks the caret, the selection and the tokens of the caret line.
#[derive(Debug, Clone, Default)]
pub struct CaretTokenTracker {
    caret: TextPosition,
    tokens: TokenSequence,
    selection: Option<(TextPosition, TextPosition)>,
    selection_length: usize,
}

impl CaretTokenTracker {
    /// Tracker at the document start, without tokens or selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh after a caret move or after the caret line was re-highlighted.
    pub fn update(&mut self, caret: TextPosition, line_tokens: TokenSequence) {
        self.caret = caret;
        self.tokens = line_tokens;
    }

    /// Caret position, 0-based.
    pub fn caret(&self) -> TextPosition {
        self.caret
    }

    /// Tokens of the caret line.
    pub fn tokens(&self) -> &TokenSequence {
        &self.tokens
    }

    /// Token under the caret.
    pub fn current_token(&self, policy: BoundaryPolicy) -> Option<&Token> {
        token_at(&self.tokens, self.caret.column + 1, policy)
    }

    /// Record the selection between two document offsets (in any order).
    ///
    /// Both ends are resolved independently against `line_lengths`; see [`resolve_offset`].
    /// Equal offsets clear the selection.
    pub fn set_selection(&mut self, start_offset: usize, end_offset: usize, line_lengths: &[usize]) {
        if start_offset == end_offset {
            self.clear_selection();
            return;
        }
        let (from, to) = if start_offset <= end_offset {
            (start_offset, end_offset)
        } else {
            (end_offset, start_offset)
        };
        self.selection = Some((
            resolve_offset(from, line_lengths),
            resolve_offset(to, line_lengths),
        ));
        self.selection_length = to - from;
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.selection_length = 0;
    }

    /// Selection bounds, 0-based.
    pub fn selection(&self) -> Option<(TextPosition, TextPosition)> {
        self.selection
    }

    /// Caret and selection in 1-based coordinates. Without a selection both selection ends are
    /// the caret.
    pub fn report(&self) -> CaretReport {
        let (start, end) = self.selection.unwrap_or((self.caret, self.caret));
        CaretReport {
            caret: self.caret.to_report(),
            selection_start: start.to_report(),
            selection_end: end.to_report(),
            selection_length: self.selection_length,
        }
    }

    /// Build the completion prefix from the caret token.
    ///
    /// Walking backward, the previous token is merged while the current one is filler
    /// (`Space`/`Unknown`) or both share a type. Merged spaces count as a single space.
    pub fn completion_prefix(&self) -> Option<CompletionPrefix> {
        let tokens = self.tokens.tokens();
        let column = self.caret.column + 1;
        let mut index = column
            .checked_sub(1)
            .and_then(|c| self.tokens.index_at(c))
            .or_else(|| self.tokens.index_at(column))?;

        let token = tokens[index].text().to_string();
        if token.is_empty() {
            return None;
        }

        let mut merged = token.clone();
        while index > 0 {
            let current = tokens[index].token_type();
            let previous = &tokens[index - 1];
            if !current.is_filler() && previous.token_type() != current {
                break;
            }
            index -= 1;
            if previous.token_type() == TokenType::Space {
                merged.insert(0, ' ');
            } else {
                merged.insert_str(0, previous.text());
            }
        }

        Some(CompletionPrefix { merged, token })
    }
}
