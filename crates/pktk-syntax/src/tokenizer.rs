use crate::rule::Rule;
use crate::token::{Token, TokenSequence, TokenType};

/// Stateless, first-match tokenizer over an ordered rule list.
///
/// At every offset the rules are tried in declaration order and the first one matching *at*
/// that offset wins, even if a later rule would match more text. Characters no rule accepts are
/// grouped into maximal `Unknown` runs, so the produced tokens always cover the input.
///
/// Multi-line delimiters are not looked at here; see [`Highlighter`](crate::Highlighter).
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    rules: &'a [Rule],
}

impl<'a> Tokenizer<'a> {
    /// Tokenizer over `rules`, in precedence order.
    pub fn new(rules: &'a [Rule]) -> Self {
        Self { rules }
    }

    /// Rules in precedence order.
    pub fn rules(&self) -> &'a [Rule] {
        self.rules
    }

    /// Tokenize a single line (reported as line 0).
    pub fn tokenize(&self, text: &str) -> TokenSequence {
        self.tokenize_line(text, 0)
    }

    /// Tokenize a single line, tagging tokens with `line`.
    pub fn tokenize_line(&self, text: &str, line: usize) -> TokenSequence {
        let mut tokens = Vec::new();
        self.tokenize_span(text, 0, text.len(), line, 1, &mut tokens);
        TokenSequence::new(tokens)
    }

    /// Tokenize the byte range `start..end` of `text`, appending to `out`.
    ///
    /// `column` is the 1-based column of `start`. Patterns see the whole line, so look-ahead and
    /// look-behind reach past the span, but no match extends beyond `end`. Returns the column
    /// following the last token.
    pub fn tokenize_span(
        &self,
        text: &str,
        start: usize,
        end: usize,
        line: usize,
        column: usize,
        out: &mut Vec<Token>,
    ) -> usize {
        let mut pos = start;
        let mut column = column;
        let mut unknown_from: Option<usize> = None;

        while pos < end {
            let found = self
                .rules
                .iter()
                .find_map(|rule| rule.match_at(text, pos, end).map(|len| (rule, len)));

            match found {
                Some((rule, len)) => {
                    if let Some(from) = unknown_from.take() {
                        column = push_token(out, TokenType::Unknown, &text[from..pos], column, line);
                    }
                    let matched = &text[pos..pos + len];
                    column = push_token(out, rule.resolve_type(matched), matched, column, line);
                    pos += len;
                }
                None => {
                    unknown_from.get_or_insert(pos);
                    pos += text[pos..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        if let Some(from) = unknown_from {
            column = push_token(out, TokenType::Unknown, &text[from..end], column, line);
        }
        column
    }
}

/// Append a token for `text` at `column`; returns the column right after it.
pub(crate) fn push_token(
    out: &mut Vec<Token>,
    token_type: TokenType,
    text: &str,
    column: usize,
    line: usize,
) -> usize {
    let token = Token::new(token_type, column, line, text);
    let next = token.end_column();
    out.push(token);
    next
}
