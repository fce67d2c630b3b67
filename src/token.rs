//! Token model produced by the lexer (spec §3).

/// Tag of a [`Token`]. Kept as a plain enum (rather than the source
/// project's string-tagged records) per §9's re-architecting note: the
/// `Display` impl below is the "kind -> &'static str" pretty-printer used
/// only in error messages and log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A span of raw JavaScript text between/around elements.
    Js,
    /// The opening tag text up to the first whitespace or `>`, including the
    /// leading `<` and the name.
    EStart,
    /// Closing text: either `</name>` or the self-closing `/>`.
    EEnd,
    /// An attribute name, or a spread expression `{...x}` used in name
    /// position.
    EProp,
    /// An attribute value: a JSON-encoded string literal, a JS expression,
    /// or a nested-element result.
    EValue,
    /// Literal child text (non-whitespace).
    EChildText,
    /// A run of whitespace between children.
    EChildWhitespace,
    /// A complete `{…}` expression used as a child.
    EChildJs,
    /// The JS fragment leading into a nested element used inside a `{…}`
    /// expression.
    EChildJsStart,
    /// The JS fragment trailing a nested element used inside a `{…}`
    /// expression.
    EChildJsEnd,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Js => "JS",
            Self::EStart => "E_START",
            Self::EEnd => "E_END",
            Self::EProp => "E_PROP",
            Self::EValue => "E_VALUE",
            Self::EChildText => "E_CHILD_TEXT",
            Self::EChildWhitespace => "E_CHILD_WHITESPACE",
            Self::EChildJs => "E_CHILD_JS",
            Self::EChildJsStart => "E_CHILD_JS_START",
            Self::EChildJsEnd => "E_CHILD_JS_END",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexer token: `{ kind, value, pos }`. `pos` is the byte offset into the
/// original source at which the token ends (used only for error messages);
/// `E_END` tokens produced for a self-closing element that never had an
/// opening byte of its own to point at carry `pos = None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub pos: Option<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            pos: Some(pos),
        }
    }

    pub fn without_pos(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            pos: None,
        }
    }
}
