use crate::syntax::token::{Token, TokenKind, keyword_or_ident};

/// What terminates a code region: the `?>` close tag for top-level code,
/// or the `}` balancing an interpolation opener inside a string.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CodeEnd {
    CloseTag,
    Brace,
}

/// How a string body ends: a one-byte delimiter, or a heredoc label at
/// the start of a line.
enum StrEnd {
    Delim(u8),
    Label(Vec<u8>),
}

/// Tokenizer for the slice of PHP the class extractor needs.
///
/// Deliberately approximate: it only has to be right for well-formed
/// source, and anything it does not recognise is consumed silently.
/// It never fails; malformed input produces a shorter token stream,
/// not an error.
pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source: source.as_bytes(), pos: 0, line: 1, column: 1, tokens: Vec::new() }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.skip_html();
            self.lex_code(CodeEnd::CloseTag);
        }
        self.tokens
    }

    // ─── Code mode ───────────────────────────────────────────────────────────

    fn lex_code(&mut self, end: CodeEnd) {
        // Brace depth of the embedded expression when `end == Brace`.
        let mut depth = 0usize;

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                return;
            }

            let line = self.line;
            let column = self.column;
            let ch = self.advance();

            match ch {
                b'?' if end == CodeEnd::CloseTag && self.peek() == b'>' => {
                    self.advance();
                    return;
                }
                b'/' if self.peek() == b'/' => self.skip_line_comment(),
                b'/' if self.peek() == b'*' => self.skip_block_comment(),
                b'#' if self.peek() == b'[' => self.skip_attribute(),
                b'#' => self.skip_line_comment(),

                b'\'' => self.lex_string_body(StrEnd::Delim(b'\''), false),
                b'"' => self.lex_string_body(StrEnd::Delim(b'"'), true),
                b'`' => self.lex_string_body(StrEnd::Delim(b'`'), true),
                b'<' if self.peek() == b'<' && self.peek_next() == b'<' => {
                    self.advance();
                    self.advance();
                    self.lex_heredoc();
                }

                // `$name`: variables never become tokens; consuming the
                // name keeps `$class` from lexing as a keyword.
                b'$' => {
                    while !self.is_at_end() && is_word_byte(self.peek()) {
                        self.advance();
                    }
                }
                // `->member`: the member name is a plain identifier even
                // when it spells a keyword.
                b'-' if self.peek() == b'>' => {
                    self.advance();
                    self.lex_member_name();
                }

                b'\\' => self.push(TokenKind::NsSep, line, column),
                b':' if self.peek() == b':' => {
                    self.advance();
                    self.push(TokenKind::DoubleColon, line, column);
                }
                b';' => self.push(TokenKind::Semicolon, line, column),
                b'{' => {
                    if end == CodeEnd::Brace {
                        depth += 1;
                    }
                    self.push(TokenKind::OpenBrace, line, column);
                }
                b'}' => {
                    self.push(TokenKind::CloseBrace, line, column);
                    if end == CodeEnd::Brace {
                        if depth == 0 {
                            return;
                        }
                        depth -= 1;
                    }
                }

                b'a'..=b'z' | b'A'..=b'Z' | b'_' | 0x80.. => {
                    let word = self.read_word(self.pos - 1);
                    match keyword_or_ident(&word) {
                        TokenKind::Ident => self.tokens.push(Token::ident(word, line, column)),
                        kind => self.push(kind, line, column),
                    }
                }
                b'0'..=b'9' => {
                    while !self.is_at_end()
                        && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_')
                    {
                        self.advance();
                    }
                }

                _ => {}
            }
        }
    }

    fn lex_member_name(&mut self) {
        self.skip_whitespace();
        if self.is_at_end() || !is_word_start(self.peek()) {
            return;
        }
        let line = self.line;
        let column = self.column;
        let start = self.pos;
        self.advance();
        let word = self.read_word(start);
        self.tokens.push(Token::ident(word, line, column));
    }

    // ─── Strings ─────────────────────────────────────────────────────────────

    fn lex_string_body(&mut self, end: StrEnd, interpolating: bool) {
        while !self.is_at_end() {
            if let StrEnd::Label(label) = &end {
                if self.column == 1 && self.at_heredoc_end(label) {
                    while matches!(self.peek(), b' ' | b'\t') {
                        self.advance();
                    }
                    for _ in 0..label.len() {
                        self.advance();
                    }
                    return;
                }
            }

            let line = self.line;
            let column = self.column;
            let ch = self.advance();

            match ch {
                b'\\' if !self.is_at_end() => {
                    self.advance();
                }
                _ if matches!(end, StrEnd::Delim(delim) if delim == ch) => return,
                b'{' if interpolating && self.peek() == b'$' => {
                    self.push(TokenKind::InterpOpen, line, column);
                    self.lex_code(CodeEnd::Brace);
                }
                b'$' if interpolating && self.peek() == b'{' => {
                    self.advance();
                    self.push(TokenKind::InterpOpen, line, column);
                    self.lex_code(CodeEnd::Brace);
                }
                _ => {}
            }
        }
    }

    /// `<<<` has just been consumed. Reads the opener label, then the body:
    /// `<<<ID` and `<<<"ID"` interpolate, `<<<'ID'` (nowdoc) is opaque.
    fn lex_heredoc(&mut self) {
        while matches!(self.peek(), b' ' | b'\t') {
            self.advance();
        }
        let (quote, interpolating) = match self.peek() {
            b'\'' => {
                self.advance();
                (Some(b'\''), false)
            }
            b'"' => {
                self.advance();
                (Some(b'"'), true)
            }
            _ => (None, true),
        };

        let start = self.pos;
        while !self.is_at_end() && is_word_byte(self.peek()) {
            self.advance();
        }
        let label = self.source[start..self.pos].to_vec();
        if let Some(quote) = quote {
            if self.peek() == quote {
                self.advance();
            }
        }
        // rest of the opener line
        while !self.is_at_end() && self.peek() != b'\n' {
            self.advance();
        }
        if label.is_empty() {
            return;
        }

        self.lex_string_body(StrEnd::Label(label), interpolating);
    }

    /// True when the current line (allowing leading indentation) is the
    /// closing label of a heredoc.
    fn at_heredoc_end(&self, label: &[u8]) -> bool {
        let mut idx = self.pos;
        while idx < self.source.len() && matches!(self.source[idx], b' ' | b'\t') {
            idx += 1;
        }
        if self.source.len() < idx + label.len() || &self.source[idx..idx + label.len()] != label {
            return false;
        }
        let after = self.source.get(idx + label.len()).copied().unwrap_or(b'\n');
        !is_word_byte(after)
    }

    // ─── Skippers ────────────────────────────────────────────────────────────

    /// Consume HTML up to and including the next open tag.
    fn skip_html(&mut self) {
        while !self.is_at_end() {
            if self.peek() == b'<' && self.peek_next() == b'?' {
                self.advance();
                self.advance();
                // `<?php`, `<?=` and the bare short tag all start code
                if self.matches_ignore_case(b"php") {
                    for _ in 0..3 {
                        self.advance();
                    }
                } else if self.peek() == b'=' {
                    self.advance();
                }
                return;
            }
            self.advance();
        }
    }

    /// Stops before the newline, and before `?>`, since a close tag ends
    /// a line comment as well as the script section.
    fn skip_line_comment(&mut self) {
        while !self.is_at_end() {
            if self.peek() == b'\n' {
                return;
            }
            if self.peek() == b'?' && self.peek_next() == b'>' {
                return;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance(); // consume *
        while !self.is_at_end() {
            if self.peek() == b'*' && self.peek_next() == b'/' {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    /// `#[` attribute: skip with bracket balancing so `]` inside nested
    /// groups or string arguments does not end it early.
    fn skip_attribute(&mut self) {
        self.advance(); // consume [
        let mut depth = 1usize;
        while depth > 0 && !self.is_at_end() {
            match self.advance() {
                b'[' => depth += 1,
                b']' => depth -= 1,
                quote @ (b'\'' | b'"') => self.lex_string_body(StrEnd::Delim(quote), false),
                _ => {}
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.advance();
                }
                _ => break,
            }
        }
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn push(&mut self, kind: TokenKind, line: usize, column: usize) {
        self.tokens.push(Token::new(kind, line, column));
    }

    /// The first byte at `start` is already consumed; consumes the rest
    /// of the word and returns the whole of it.
    fn read_word(&mut self, start: usize) -> String {
        while !self.is_at_end() && is_word_byte(self.peek()) {
            self.advance();
        }
        String::from_utf8_lossy(&self.source[start..self.pos]).into_owned()
    }

    fn matches_ignore_case(&self, word: &[u8]) -> bool {
        self.source.len() >= self.pos + word.len()
            && self.source[self.pos..self.pos + word.len()].eq_ignore_ascii_case(word)
    }

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() { 0 } else { self.source[self.pos] }
    }

    fn peek_next(&self) -> u8 {
        if self.pos + 1 >= self.source.len() { 0 } else { self.source[self.pos + 1] }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn is_word_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte >= 0x80
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte >= 0x80
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::token::TokenKind as K;

    fn kinds(src: &str) -> Vec<K> {
        Lexer::new(src).tokenize().into_iter().map(|t| t.kind).collect()
    }

    fn idents(src: &str) -> Vec<String> {
        Lexer::new(src)
            .tokenize()
            .into_iter()
            .filter(|t| t.kind == K::Ident)
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn empty() {
        assert_eq!(kinds(""), vec![]);
    }

    #[test]
    fn html_only_produces_nothing() {
        assert_eq!(kinds("<html><body>class Foo</body></html>"), vec![]);
    }

    #[test]
    fn class_declaration() {
        assert_eq!(
            kinds("<?php class Foo {}"),
            vec![K::Class, K::Ident, K::OpenBrace, K::CloseBrace]
        );
        assert_eq!(idents("<?php class Foo {}"), vec!["Foo"]);
    }

    #[test]
    fn keywords_case_insensitive() {
        assert_eq!(kinds("<?php CLASS Foo {}")[0], K::Class);
        assert_eq!(kinds("<?php Interface I {}")[0], K::Interface);
        assert_eq!(kinds("<?php NAMESPACE A;")[0], K::Namespace);
    }

    #[test]
    fn namespace_with_separators() {
        assert_eq!(
            kinds("<?php namespace App\\Models;"),
            vec![K::Namespace, K::Ident, K::NsSep, K::Ident, K::Semicolon]
        );
    }

    #[test]
    fn variable_named_class_is_not_a_keyword() {
        assert_eq!(kinds("<?php $class = 1;"), vec![K::Semicolon]);
    }

    #[test]
    fn member_access_is_not_a_keyword() {
        assert_eq!(kinds("<?php $x->class;"), vec![K::Ident, K::Semicolon]);
        assert_eq!(idents("<?php $x -> class;"), vec!["class"]);
    }

    #[test]
    fn double_colon() {
        assert_eq!(
            kinds("<?php Foo::class;"),
            vec![K::Ident, K::DoubleColon, K::Class, K::Semicolon]
        );
    }

    #[test]
    fn comments_skipped() {
        assert_eq!(kinds("<?php // class Foo\ninterface I {}")[0], K::Interface);
        assert_eq!(kinds("<?php /* class Foo */ trait T {}")[0], K::Trait);
        assert_eq!(kinds("<?php # class Foo\n;"), vec![K::Semicolon]);
    }

    #[test]
    fn attribute_skipped() {
        assert_eq!(
            kinds("<?php #[Attr(Foo::class, \"]\")] class Bar {}"),
            vec![K::Class, K::Ident, K::OpenBrace, K::CloseBrace]
        );
        assert_eq!(idents("<?php #[Attr] class Bar {}"), vec!["Bar"]);
    }

    #[test]
    fn single_quoted_opaque() {
        assert_eq!(kinds("<?php 'class Foo {';"), vec![K::Semicolon]);
        assert_eq!(kinds("<?php 'it\\'s {a} brace';"), vec![K::Semicolon]);
    }

    #[test]
    fn double_quoted_without_interpolation() {
        assert_eq!(kinds("<?php \"class Foo {}\";"), vec![K::Semicolon]);
    }

    #[test]
    fn curly_interpolation() {
        assert_eq!(
            kinds("<?php \"a {$x} b\";"),
            vec![K::InterpOpen, K::CloseBrace, K::Semicolon]
        );
    }

    #[test]
    fn dollar_curly_interpolation() {
        assert_eq!(
            kinds("<?php \"a ${x} b\";"),
            vec![K::InterpOpen, K::Ident, K::CloseBrace, K::Semicolon]
        );
    }

    #[test]
    fn escaped_dollar_does_not_interpolate() {
        assert_eq!(kinds("<?php \"{\\$x}\";"), vec![K::Semicolon]);
    }

    #[test]
    fn interpolated_expression_with_nested_braces() {
        // the inner braces balance inside the embedded expression
        assert_eq!(
            kinds("<?php \"{$a['k']} end\";"),
            vec![K::InterpOpen, K::CloseBrace, K::Semicolon]
        );
    }

    #[test]
    fn heredoc_interpolates() {
        let src = "<?php $s = <<<EOT\nclass Foo {$x}\nEOT;\n";
        assert_eq!(kinds(src), vec![K::InterpOpen, K::CloseBrace, K::Semicolon]);
    }

    #[test]
    fn heredoc_indented_close() {
        let src = "<?php $s = <<<EOT\n  class A {$x}\n  EOT;\n";
        assert_eq!(kinds(src), vec![K::InterpOpen, K::CloseBrace, K::Semicolon]);
    }

    #[test]
    fn nowdoc_opaque() {
        let src = "<?php $s = <<<'EOT'\nclass Foo {$x}\nEOT;\n";
        assert_eq!(kinds(src), vec![K::Semicolon]);
    }

    #[test]
    fn close_tag_ends_code() {
        let src = "<?php class A {} ?> class B <?php class C {}";
        assert_eq!(idents(src), vec!["A", "C"]);
    }

    #[test]
    fn close_tag_ends_line_comment() {
        let src = "<?php // hidden ?> html <?php class C {}";
        assert_eq!(idents(src), vec!["C"]);
    }

    #[test]
    fn short_echo_tag() {
        assert_eq!(kinds("<?= $x; ?>"), vec![K::Semicolon]);
    }

    #[test]
    fn line_and_column_tracking() {
        let tokens = Lexer::new("<?php\nclass Foo {}").tokenize();
        assert_eq!((tokens[0].line, tokens[0].column), (2, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 7));
    }
}
