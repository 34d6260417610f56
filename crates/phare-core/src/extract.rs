//! Finds the fully-qualified names of the classes, interfaces and traits
//! a token stream declares, without building a syntax tree.

use crate::syntax::scanner::TokenScanner;
use crate::syntax::token::{Token, TokenKind};

/// Tokens the main loop reacts to; everything between them is skipped.
const INTEREST: &[TokenKind] = &[
    TokenKind::Namespace,
    TokenKind::OpenBrace,
    TokenKind::InterpOpen,
    TokenKind::CloseBrace,
    TokenKind::DoubleColon,
    TokenKind::Class,
    TokenKind::Interface,
    TokenKind::Trait,
];

/// Candidates for the token following a type keyword: the declared name,
/// or evidence there is none (anonymous class, malformed input).
const AFTER_TYPE_KEYWORD: &[TokenKind] = &[
    TokenKind::Ident,
    TokenKind::Extends,
    TokenKind::Implements,
    TokenKind::OpenBrace,
];

const OPEN_BRACE: &[TokenKind] = &[TokenKind::OpenBrace];
const SEMICOLON: &[TokenKind] = &[TokenKind::Semicolon];

/// Extracts declared type names in declaration order, each prefixed by
/// the enclosing namespace. Declarations nested inside another
/// declaration's body are skipped along with the body.
pub fn declared_classes(tokens: Vec<Token>) -> Vec<String> {
    let mut scanner = TokenScanner::new(tokens);
    let mut classes = Vec::new();
    let mut namespace = String::new();
    let mut depth = 0usize;

    while let Some(kind) = scanner.advance_to(INTEREST).map(|t| t.kind) {
        match kind {
            TokenKind::Namespace if depth == 0 => {
                namespace = read_namespace(&mut scanner);
                // counts as an open scope whether or not the declaration
                // used a block; the statement form never closes
                depth += 1;
            }

            TokenKind::Class | TokenKind::Interface | TokenKind::Trait => {
                match scanner.advance_to(AFTER_TYPE_KEYWORD).map(|t| (t.kind, t.text.clone())) {
                    Some((TokenKind::Ident, name)) => {
                        classes.push(format!("{namespace}{name}"));
                        if scanner.advance_to(OPEN_BRACE).is_some() {
                            scanner.skip_balanced_body();
                        }
                    }
                    // anonymous class: the body still has to be skipped
                    // so nothing inside it is taken for a declaration
                    Some((TokenKind::OpenBrace, _)) => scanner.skip_balanced_body(),
                    Some(_) => {
                        if scanner.advance_to(OPEN_BRACE).is_some() {
                            scanner.skip_balanced_body();
                        }
                    }
                    None => {}
                }
            }

            TokenKind::OpenBrace | TokenKind::InterpOpen => depth += 1,

            TokenKind::CloseBrace if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    // block-scoped namespace ended
                    namespace.clear();
                }
            }

            // `Foo::BAR` or `Foo::class` in a top-level expression must
            // not be misread as a declaration
            TokenKind::DoubleColon => {
                let _ = scanner.advance_to(SEMICOLON);
            }

            _ => {}
        }
    }

    classes
}

/// Reads the dotted name after a `namespace` keyword, up to the `;` or
/// `{` that ends it. Non-empty names get a trailing separator so a
/// simple name can be appended directly.
fn read_namespace(scanner: &mut TokenScanner) -> String {
    let mut name = String::new();
    while let Some((kind, text)) = scanner.next_token().map(|t| (t.kind, t.text.clone())) {
        match kind {
            TokenKind::Ident => name.push_str(&text),
            TokenKind::NsSep => name.push('\\'),
            TokenKind::Semicolon | TokenKind::OpenBrace => break,
            _ => {}
        }
    }
    if !name.is_empty() {
        name.push('\\');
    }
    name
}

// ─── Tests ───────────────────────────────────────────────────────────────────
