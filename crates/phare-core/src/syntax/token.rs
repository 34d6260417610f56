/// Token kinds the class scanner cares about. Everything else in a PHP
/// source file is consumed by the lexer without producing a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Namespace,
    Class,
    Interface,
    Trait,
    Extends,
    Implements,

    // Names
    Ident,

    // Punctuation
    NsSep,       // \
    DoubleColon, // ::
    Semicolon,   // ;
    OpenBrace,   // {
    CloseBrace,  // }

    /// `{$` or `${` inside an interpolated string. Opens a brace scope
    /// closed by a regular `}` token.
    InterpOpen,
}

impl TokenKind {
    pub fn is_type_keyword(self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Trait)
    }

    /// Kinds that increase brace depth. The string-interpolation opener
    /// counts even though it is not written as a plain `{`.
    pub fn opens_scope(self) -> bool {
        matches!(self, Self::OpenBrace | Self::InterpOpen)
    }
}

/// Maps a bare word to its keyword kind, or `Ident`.
/// PHP keywords are case-insensitive.
pub fn keyword_or_ident(word: &str) -> TokenKind {
    match word.to_ascii_lowercase().as_str() {
        "namespace"  => TokenKind::Namespace,
        "class"      => TokenKind::Class,
        "interface"  => TokenKind::Interface,
        "trait"      => TokenKind::Trait,
        "extends"    => TokenKind::Extends,
        "implements" => TokenKind::Implements,
        _            => TokenKind::Ident,
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Literal text. Populated for `Ident` tokens only.
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, text: String::new(), line, column }
    }

    pub fn ident(text: String, line: usize, column: usize) -> Self {
        Self { kind: TokenKind::Ident, text, line, column }
    }
}
