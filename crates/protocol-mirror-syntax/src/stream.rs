//! Token cursor for the recursive-descent parser.

use protocol_mirror::Span;

use crate::error::ParseError;
use crate::lexer::{Spanned, Token};

/// Words that begin a declaration.
pub(crate) const DECL_KEYWORDS: &[&str] = &[
    "struct",
    "enum",
    "class",
    "actor",
    "protocol",
    "extension",
    "var",
    "let",
    "func",
    "init",
    "deinit",
    "subscript",
    "typealias",
    "associatedtype",
    "case",
    "import",
    "operator",
    "precedencegroup",
    "macro",
];

/// Declaration modifiers other than visibility.
pub(crate) const MODIFIERS: &[&str] = &[
    "static",
    "final",
    "lazy",
    "weak",
    "unowned",
    "nonisolated",
    "override",
    "mutating",
    "nonmutating",
    "dynamic",
    "required",
    "convenience",
    "indirect",
    "optional",
    "prefix",
    "postfix",
    "infix",
    "distributed",
];

pub(crate) const VISIBILITIES: &[&str] = &[
    "open",
    "public",
    "package",
    "internal",
    "fileprivate",
    "private",
];

/// Token stream with lookahead and byte-span tracking.
pub(crate) struct TokenStream<'src> {
    source: &'src str,
    tokens: Vec<Spanned<Token<'src>>>,
    pos: usize,
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str, tokens: Vec<Spanned<Token<'src>>>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    pub fn peek(&self) -> Option<Token<'src>> {
        self.peek_nth(0)
    }

    pub fn peek_nth(&self, n: usize) -> Option<Token<'src>> {
        self.tokens.get(self.pos + n).map(|t| t.token)
    }

    pub fn peek_ident(&self) -> Option<&'src str> {
        match self.peek() {
            Some(Token::Ident(name)) => Some(name),
            _ => None,
        }
    }

    pub fn advance(&mut self) -> Option<Spanned<Token<'src>>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub fn check(&self, expected: &Token<'_>) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(&t) == std::mem::discriminant(expected))
    }

    /// Consumes the current token if it has the same kind as `expected`.
    pub fn eat(&mut self, expected: &Token<'_>) -> bool {
        let matched = self.check(expected);
        if matched {
            self.pos += 1;
        }
        matched
    }

    pub fn eat_ident(&mut self, text: &str) -> bool {
        let matched = self.peek().is_some_and(|t| t.is_ident(text));
        if matched {
            self.pos += 1;
        }
        matched
    }

    pub fn expect(&mut self, expected: Token<'_>, what: &str) -> Result<Span, ParseError> {
        if self.check(&expected) {
            let span = self.current_span();
            self.pos += 1;
            Ok(span)
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Error for "wanted `what` here".
    pub fn unexpected(&self, what: &str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(found) => ParseError::UnexpectedToken {
                expected: what.to_string(),
                found: found.token.describe(),
                span: found.span,
            },
            None => ParseError::UnexpectedEof {
                expected: what.to_string(),
                span: self.current_span(),
            },
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Span of the current token; an empty span at the end of input at EOF.
    pub fn current_span(&self) -> Span {
        match self.tokens.get(self.pos) {
            Some(token) => token.span,
            None => Span::new(self.source.len(), self.source.len()),
        }
    }

    /// End offset of the last consumed token.
    pub fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
            .map_or(0, |t| t.span.end)
    }

    /// Whether the previous token ends exactly where the current one starts.
    pub fn is_adjacent(&self) -> bool {
        self.pos > 0 && !self.at_end() && self.prev_end() == self.current_span().start
    }

    /// Source text from byte `start` to the end of the last consumed token.
    pub fn slice_from(&self, start: usize) -> &'src str {
        let end = self.prev_end().max(start);
        self.source.get(start..end).unwrap_or_default().trim()
    }

    /// Whether the token at `pos + n` starts a new member or closes a body.
    ///
    /// Keywords after a `.` are member references (`.init`, `.static`), not
    /// declarations.
    pub fn is_boundary_at(&self, n: usize) -> bool {
        let idx = self.pos + n;
        let Some(token) = self.tokens.get(idx) else {
            return true;
        };
        match token.token {
            Token::Semi | Token::RBrace | Token::Attribute(_) | Token::Directive(_) => true,
            Token::Ident(_) => {
                let after_dot = idx > 0 && matches!(self.tokens[idx - 1].token, Token::Dot);
                !after_dot && self.starts_declaration(idx)
            }
            _ => false,
        }
    }

    /// A declaration keyword, possibly behind modifiers. Modifier words are
    /// contextual (`prefix`, `optional`), so on their own they are plain
    /// identifiers.
    fn starts_declaration(&self, mut idx: usize) -> bool {
        while let Some(Token::Ident(word)) = self.tokens.get(idx).map(|t| t.token) {
            if DECL_KEYWORDS.contains(&word) {
                return true;
            }
            if !MODIFIERS.contains(&word) && !VISIBILITIES.contains(&word) {
                return false;
            }
            idx += 1;
            // `private(set)`, `nonisolated(unsafe)`
            if let (Some(Token::LParen), Some(Token::Ident(_)), Some(Token::RParen)) = (
                self.tokens.get(idx).map(|t| t.token),
                self.tokens.get(idx + 1).map(|t| t.token),
                self.tokens.get(idx + 2).map(|t| t.token),
            ) {
                idx += 3;
            }
        }
        false
    }

    pub fn is_boundary(&self) -> bool {
        self.is_boundary_at(0)
    }

    /// Consumes a bracketed group starting at the current opener, nested
    /// groups included.
    pub fn skip_group(&mut self) -> Result<(), ParseError> {
        let Some(open) = self.advance() else {
            return Err(self.unexpected("`(`, `[` or `{`"));
        };
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance().map(|t| t.token) {
                Some(Token::LParen | Token::LBracket | Token::LBrace) => depth += 1,
                Some(Token::RParen | Token::RBracket | Token::RBrace) => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(ParseError::Unclosed {
                        delimiter: open.token.describe(),
                        span: open.span,
                    });
                }
            }
        }
        Ok(())
    }

    /// Skips tokens up to the next member boundary, always consuming at least
    /// one token.
    pub fn skip_to_boundary(&mut self) -> Result<(), ParseError> {
        self.skip_one()?;
        while !self.is_boundary() {
            self.skip_one()?;
        }
        Ok(())
    }

    /// Consumes one token, or a whole group if it is an opener.
    pub fn skip_one(&mut self) -> Result<(), ParseError> {
        if is_opener(self.peek()) {
            self.skip_group()
        } else {
            self.advance();
            Ok(())
        }
    }
}

pub(crate) fn is_opener(token: Option<Token<'_>>) -> bool {
    matches!(
        token,
        Some(Token::LParen | Token::LBracket | Token::LBrace)
    )
}
