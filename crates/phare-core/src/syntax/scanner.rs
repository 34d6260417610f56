use crate::syntax::token::{Token, TokenKind};

/// Cursor over a flat token stream with the two lookahead operations the
/// class extractor needs: "advance until one of these kinds" and "skip a
/// balanced brace-delimited body".
pub struct TokenScanner {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenScanner {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Next token whose kind is in `wanted`; scanning resumes after it.
    /// `None` once the stream is exhausted.
    pub fn advance_to(&mut self, wanted: &[TokenKind]) -> Option<&Token> {
        while self.pos < self.tokens.len() {
            let idx = self.pos;
            self.pos += 1;
            if wanted.contains(&self.tokens[idx].kind) {
                return Some(&self.tokens[idx]);
            }
        }
        None
    }

    /// The token under the cursor, advancing past it.
    pub fn next_token(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Skips a brace-delimited body whose opener was just consumed.
    /// Scope-opening kinds increment the depth, `}` decrements it;
    /// returns once the depth is balanced or the tokens run out.
    pub fn skip_balanced_body(&mut self) {
        let mut depth = 1usize;
        while depth > 0 && self.pos < self.tokens.len() {
            let kind = self.tokens[self.pos].kind;
            self.pos += 1;
            if kind.opens_scope() {
                depth += 1;
            } else if kind == TokenKind::CloseBrace {
                depth -= 1;
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::token::TokenKind as K;

    fn scanner(kinds: &[K]) -> TokenScanner {
        TokenScanner::new(kinds.iter().map(|&k| Token::new(k, 1, 1)).collect())
    }

    #[test]
    fn advance_to_finds_in_order() {
        let mut s = scanner(&[K::Ident, K::OpenBrace, K::Semicolon, K::CloseBrace]);
        assert_eq!(s.advance_to(&[K::Semicolon, K::CloseBrace]).map(|t| t.kind), Some(K::Semicolon));
        assert_eq!(s.advance_to(&[K::Semicolon, K::CloseBrace]).map(|t| t.kind), Some(K::CloseBrace));
        assert!(s.advance_to(&[K::Semicolon]).is_none());
    }

    #[test]
    fn advance_to_on_empty_stream() {
        let mut s = scanner(&[]);
        assert!(s.advance_to(&[K::Class]).is_none());
    }

    #[test]
    fn skip_balanced_nested() {
        // { { } { } } ;
        let mut s = scanner(&[
            K::OpenBrace, K::CloseBrace, K::OpenBrace, K::CloseBrace, K::CloseBrace, K::Semicolon,
        ]);
        // opener already consumed by the caller
        s.skip_balanced_body();
        assert_eq!(s.next_token().map(|t| t.kind), Some(K::Semicolon));
    }

    #[test]
    fn interpolation_opener_counts_as_scope() {
        // body: InterpOpen } } ; where the first } closes the interpolation
        let mut s = scanner(&[K::InterpOpen, K::CloseBrace, K::CloseBrace, K::Semicolon]);
        s.skip_balanced_body();
        assert_eq!(s.next_token().map(|t| t.kind), Some(K::Semicolon));
    }

    #[test]
    fn unbalanced_body_stops_at_end() {
        let mut s = scanner(&[K::OpenBrace, K::CloseBrace]);
        s.skip_balanced_body();
        assert!(s.next_token().is_none());
    }
}
