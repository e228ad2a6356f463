//! Type annotation parsing.
//!
//! Every type keeps the exact source text it was written with. Function types
//! are also broken down structurally; everything else stays opaque.

use protocol_mirror::{Effects, FunctionParam, FunctionType, TypeExpr};

use crate::error::ParseError;
use crate::lexer::Token;
use crate::parser::Parser;

/// Prefix words that qualify the type that follows them.
const TYPE_SPECIFIERS: &[&str] = &[
    "inout",
    "some",
    "any",
    "borrowing",
    "consuming",
    "sending",
    "__owned",
    "__shared",
];

impl<'src> Parser<'src> {
    /// Parses one type annotation.
    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.stream.current_span().start;
        self.skip_type_attributes()?;
        while self
            .stream
            .peek_ident()
            .is_some_and(|word| TYPE_SPECIFIERS.contains(&word))
        {
            self.stream.advance();
        }

        let mut function = self.parse_type_primary()?;
        while self.stream.eat(&Token::Amp) {
            self.parse_type_primary()?;
            function = None;
        }

        let text = self.stream.slice_from(start);
        Ok(match function {
            Some(function) => TypeExpr::function_with_text(text, function),
            None => TypeExpr::named(text),
        })
    }

    /// `@escaping`, `@Sendable`, `@convention(c)`.
    fn skip_type_attributes(&mut self) -> Result<(), ParseError> {
        while matches!(self.stream.peek(), Some(Token::Attribute(_))) {
            self.stream.advance();
            if self.stream.check(&Token::LParen) && self.stream.is_adjacent() {
                self.stream.skip_group()?;
            }
        }
        Ok(())
    }

    /// Returns the function structure when the type is a bare function type.
    fn parse_type_primary(&mut self) -> Result<Option<FunctionType>, ParseError> {
        match self.stream.peek() {
            Some(Token::LParen) => {
                let params = self.parse_tuple_elements()?;
                let effects = self.parse_effects()?;
                if self.stream.eat(&Token::Arrow) {
                    let returns = self.parse_type()?;
                    return Ok(Some(FunctionType::new(params, effects, returns)));
                }
                if !effects.is_empty() {
                    return Err(self.stream.unexpected("`->`"));
                }
                self.parse_type_postfix();
                Ok(None)
            }
            Some(Token::LBracket) => {
                self.stream.advance();
                self.parse_type()?;
                if self.stream.eat(&Token::Colon) {
                    self.parse_type()?;
                }
                self.stream.expect(Token::RBracket, "`]`")?;
                self.parse_type_postfix();
                Ok(None)
            }
            Some(Token::Ident(_)) => {
                self.stream.advance();
                self.parse_generic_arguments()?;
                while self.stream.check(&Token::Dot)
                    && matches!(self.stream.peek_nth(1), Some(Token::Ident(_)))
                {
                    self.stream.advance();
                    self.stream.advance();
                    self.parse_generic_arguments()?;
                }
                self.parse_type_postfix();
                Ok(None)
            }
            _ => Err(self.stream.unexpected("a type")),
        }
    }

    /// `(a: A, _ b: B, C)`
    fn parse_tuple_elements(&mut self) -> Result<Vec<FunctionParam>, ParseError> {
        self.stream.expect(Token::LParen, "`(`")?;
        let mut params = Vec::new();
        while !self.stream.check(&Token::RParen) {
            let (first_name, second_name) = match (
                self.stream.peek(),
                self.stream.peek_nth(1),
                self.stream.peek_nth(2),
            ) {
                (Some(Token::Ident(first)), Some(Token::Colon), _) => {
                    self.stream.advance();
                    self.stream.advance();
                    (Some(first.to_string()), None)
                }
                (Some(Token::Ident(first)), Some(Token::Ident(second)), Some(Token::Colon)) => {
                    self.stream.advance();
                    self.stream.advance();
                    self.stream.advance();
                    (Some(first.to_string()), Some(second.to_string()))
                }
                _ => (None, None),
            };
            let ty = self.parse_type()?;
            // Variadic `T...`
            while self.stream.eat(&Token::Dot) {}
            params.push(FunctionParam {
                first_name,
                second_name,
                ty,
            });
            if !self.stream.eat(&Token::Comma) {
                break;
            }
        }
        self.stream.expect(Token::RParen, "`)`")?;
        Ok(params)
    }

    /// `async`, `throws`, `throws(E)` and `rethrows`, in any order.
    fn parse_effects(&mut self) -> Result<Effects, ParseError> {
        let mut effects = Effects::none();
        loop {
            match self.stream.peek_ident() {
                Some("async") => {
                    self.stream.advance();
                    effects.is_async = true;
                }
                Some("throws" | "rethrows") => {
                    self.stream.advance();
                    effects.throws = true;
                    if self.stream.check(&Token::LParen) && self.stream.is_adjacent() {
                        self.stream.advance();
                        effects.thrown_type = Some(self.parse_type()?.text().to_string());
                        self.stream.expect(Token::RParen, "`)`")?;
                    }
                }
                _ => return Ok(effects),
            }
        }
    }

    fn parse_generic_arguments(&mut self) -> Result<(), ParseError> {
        if !self.stream.eat(&Token::Lt) {
            return Ok(());
        }
        loop {
            self.parse_type()?;
            if !self.stream.eat(&Token::Comma) {
                break;
            }
        }
        self.stream.expect(Token::Gt, "`>`")?;
        Ok(())
    }

    /// `?`, `!`, `.Type`, `.Protocol`
    fn parse_type_postfix(&mut self) {
        loop {
            match (self.stream.peek(), self.stream.peek_nth(1)) {
                (Some(Token::Question | Token::Bang), _) => {
                    self.stream.advance();
                }
                (Some(Token::Dot), Some(Token::Ident("Type" | "Protocol"))) => {
                    self.stream.advance();
                    self.stream.advance();
                }
                _ => return,
            }
        }
    }
}
