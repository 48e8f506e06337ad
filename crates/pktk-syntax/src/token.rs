use crate::error::SyntaxError;
use std::fmt;

macro_rules! token_types {
    ($($variant:ident => ($id:literal, $description:literal),)+) => {
        /// Kind of a lexical token.
        ///
        /// The set is closed: every language built on this crate picks its token kinds from here,
        /// and configuration files refer to them by [`TokenType::id`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
        #[serde(try_from = "String")]
        pub enum TokenType {
            $(
                #[doc = $description]
                $variant,
            )+
        }

        impl TokenType {
            const TABLE: &'static [(TokenType, &'static str, &'static str)] = &[
                $((TokenType::$variant, $id, $description),)+
            ];

            /// Stable identifier used by configuration files.
            pub fn id(self) -> &'static str {
                match self {
                    $(TokenType::$variant => $id,)+
                }
            }

            /// Human readable description.
            pub fn description(self) -> &'static str {
                match self {
                    $(TokenType::$variant => $description,)+
                }
            }
        }
    };
}

token_types! {
    Unknown => ("unknown", "Unknown value"),
    Space => ("space", "Space"),
    Newline => ("newline", "New line"),
    Comment => ("comment", "A comment"),
    String => ("str", "A STRING value"),
    Number => ("number", "A NUMBER value"),
    Keyword => ("keyword", "A keyword"),
    Operator => ("operator", "An operator"),
    Identifier => ("identifier", "An identifier"),
    Delimiter => ("delimiter", "A delimiter"),
    Function => ("function", "A function name"),
    Variable => ("variable", "A variable name"),
    Markup => ("markup", "A XML Markup"),
    Attribute => ("attribute", "A node attribute"),
    SetAttribute => ("set_attribute", "Set attribute"),
    CData => ("cdata", "A CDATA value"),
    Value => ("value", "A VALUE value"),
    SpecialCharacter => ("special_character", "A SPECIAL CHARACTER value"),
    ObjectId => ("object_id", "Object identifier"),
    ObjectDefinition => ("object_definition", "Object definition"),
    ObjectSeparator => ("object_separator", "Separator"),
    ObjectMarkerStart => ("object_marker_start", "Start of Object"),
    ObjectMarkerEnd => ("object_marker_end", "End of Object"),
    ArrayMarkerStart => ("array_marker_start", "Start of Array"),
    ArrayMarkerEnd => ("array_marker_end", "End of Array"),
    ValueString => ("value_string", "A STRING value"),
    ValueNumber => ("value_number", "A NUMBER value"),
    ValueSpecial => ("value_special", "A special value"),
}

impl TokenType {
    /// Look up a token type by its [`id`](Self::id).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, candidate, _)| *candidate == id)
            .map(|(token_type, _, _)| *token_type)
    }

    /// Every token type, in declaration order.
    pub fn all() -> impl Iterator<Item = TokenType> {
        Self::TABLE.iter().map(|(token_type, _, _)| *token_type)
    }

    /// `true` for the kinds the completion prefix walk steps over.
    pub fn is_filler(self) -> bool {
        matches!(self, TokenType::Space | TokenType::Unknown)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl TryFrom<String> for TokenType {
    type Error = SyntaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_id(&value).ok_or(SyntaxError::UnknownTokenType(value))
    }
}

/// A typed span of one line.
///
/// Columns and lengths are counted in characters; `column` is 1-based and line-relative, `line`
/// is the 0-based document line the token was produced for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    column: usize,
    length: usize,
    line: usize,
    text: String,
}

impl Token {
    /// Create a token.
    pub fn new(
        token_type: TokenType,
        column: usize,
        line: usize,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        Self {
            token_type,
            column,
            length: text.chars().count(),
            line,
            text,
        }
    }

    /// Token kind.
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// 1-based column of the first character.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Length in characters.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Column just past the last character (exclusive end).
    pub fn end_column(&self) -> usize {
        self.column + self.length
    }

    /// 0-based document line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Matched text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the 1-based `column` falls inside this token.
    pub fn contains_column(&self, column: usize) -> bool {
        self.column <= column && column < self.end_column()
    }

    /// Returns `true` for text no rule matched.
    pub fn is_unknown(&self) -> bool {
        self.token_type == TokenType::Unknown
    }
}

/// Ordered tokens of one line, with a restartable cursor.
///
/// Equality compares the tokens only, never the cursor position.
#[derive(Debug, Clone, Default)]
pub struct TokenSequence {
    tokens: Vec<Token>,
    // Index of the token last returned by the cursor; `None` before the first call.
    cursor: Option<usize>,
}

impl TokenSequence {
    /// Wrap already ordered, contiguous tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: None,
        }
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` for an empty line.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All tokens, in column order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token at `index`, ignoring the cursor.
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Iterate the tokens without moving the cursor.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Rewind the cursor so the next [`next_token`](Self::next_token) returns the first token.
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Index of the token under the cursor.
    pub fn position(&self) -> Option<usize> {
        self.cursor.filter(|&i| i < self.tokens.len())
    }

    /// Token under the cursor.
    pub fn current(&self) -> Option<&Token> {
        self.position().and_then(|i| self.tokens.get(i))
    }

    /// Advance the cursor and return the token it lands on.
    pub fn next_token(&mut self) -> Option<&Token> {
        let next = self.cursor.map_or(0, |i| i + 1).min(self.tokens.len());
        self.cursor = Some(next);
        self.tokens.get(next)
    }

    /// Move the cursor back and return the token it lands on.
    ///
    /// Moving back from the first token leaves the cursor before the start.
    pub fn previous_token(&mut self) -> Option<&Token> {
        match self.cursor {
            None | Some(0) => {
                self.cursor = None;
                None
            }
            Some(i) => {
                let prev = i.min(self.tokens.len()) - 1;
                self.cursor = Some(prev);
                self.tokens.get(prev)
            }
        }
    }

    /// Index of the token covering the 1-based `column`.
    pub fn index_at(&self, column: usize) -> Option<usize> {
        let idx = self.tokens.partition_point(|t| t.end_column() <= column);
        self.tokens
            .get(idx)
            .filter(|t| t.contains_column(column))
            .map(|_| idx)
    }

    /// Token covering the 1-based `column`.
    pub fn token_at(&self, column: usize) -> Option<&Token> {
        self.index_at(column).and_then(|i| self.tokens.get(i))
    }

    /// Total length in characters covered by the tokens.
    pub fn char_len(&self) -> usize {
        self.tokens.last().map_or(0, |t| t.end_column() - 1)
    }

    /// Move every token to document line `line`.
    pub(crate) fn relocate(&mut self, line: usize) {
        for token in &mut self.tokens {
            token.line = line;
        }
    }
}

impl PartialEq for TokenSequence {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for TokenSequence {}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
