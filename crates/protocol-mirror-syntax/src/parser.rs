//! Recursive-descent declaration parser.
//!
//! The parser only understands as much of the language as it needs to find
//! annotated type declarations and describe their stored and computed
//! properties. Function bodies, initializer expressions and everything else
//! are skipped by bracket matching up to the next member boundary.

use protocol_mirror::{
    ATTRIBUTE_NAME, Accessor, AccessorBlock, DeclKind, Initializer, InputDeclaration,
    LiteralKind, RawMember, Span, Storage, TypeExpr, Visibility,
};
use tracing::{debug, trace};

use crate::error::ParseError;
use crate::lexer::{Directive, Token, lex};
use crate::stream::{MODIFIERS, TokenStream, VISIBILITIES, is_opener};

const TYPE_KEYWORDS: &[&str] = &["struct", "enum", "class", "actor", "protocol", "extension"];

const FUNCTION_KEYWORDS: &[&str] = &["func", "init", "deinit", "subscript"];

const ACCESSOR_KEYWORDS: &[&str] = &[
    "get",
    "set",
    "willSet",
    "didSet",
    "_modify",
    "_read",
    "init",
    "unsafeAddress",
    "unsafeMutableAddress",
];

/// Modifiers collected in front of a declaration.
#[derive(Debug, Clone, Default)]
struct Modifiers {
    visibility: Visibility,
    setter_visibility: Option<Visibility>,
    is_static: bool,
}

/// One `name: Type = value { ... }` entry of a `var`/`let` list.
struct Binding {
    name: Option<String>,
    annotation: Option<TypeExpr>,
    initializer: Option<Initializer>,
    accessors: Option<AccessorBlock>,
    span: Span,
}

pub(crate) struct Parser<'src> {
    pub(crate) stream: TokenStream<'src>,
    found: Vec<InputDeclaration>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(source: &'src str) -> Result<Self, ParseError> {
        let tokens = lex(source)?;
        Ok(Self {
            stream: TokenStream::new(source, tokens),
            found: Vec::new(),
        })
    }

    /// Parses the whole input and returns the annotated declarations in
    /// source order.
    pub(crate) fn parse_file(mut self) -> Result<Vec<InputDeclaration>, ParseError> {
        self.parse_items(None)?;
        if !self.stream.at_end() {
            return Err(self.stream.unexpected("a declaration"));
        }
        let mut found = self.found;
        found.sort_by_key(|decl| decl.span.start);
        Ok(found)
    }

    /// Parses items up to a closing `}`, a `#else`-like directive or the end
    /// of input, returning the properties declared directly at this level.
    fn parse_items(&mut self, scope: Option<&str>) -> Result<Vec<RawMember>, ParseError> {
        let mut members = Vec::new();
        loop {
            match self.stream.peek() {
                None | Some(Token::RBrace) => return Ok(members),
                Some(Token::Directive(Directive::If)) => self.parse_conditional(scope)?,
                Some(Token::Directive(_)) => return Ok(members),
                Some(Token::Semi) => {
                    self.stream.advance();
                }
                Some(_) => self.parse_item(scope, &mut members)?,
            }
        }
    }

    /// `#if ... #elseif ... #else ... #endif`. Every branch is parsed so that
    /// annotated types inside are still found, but properties declared under
    /// a condition are not mirrored.
    fn parse_conditional(&mut self, scope: Option<&str>) -> Result<(), ParseError> {
        let open = self.stream.current_span();
        self.stream.advance();
        loop {
            let skipped = self.parse_items(scope)?;
            if !skipped.is_empty() {
                debug!(count = skipped.len(), "not mirroring conditionally compiled members");
            }
            match self.stream.peek() {
                Some(Token::Directive(Directive::EndIf)) => {
                    self.stream.advance();
                    return Ok(());
                }
                Some(Token::Directive(_)) => {
                    self.stream.advance();
                }
                _ => {
                    return Err(ParseError::Unclosed {
                        delimiter: Directive::If.to_string(),
                        span: open,
                    });
                }
            }
        }
    }

    fn parse_item(
        &mut self,
        scope: Option<&str>,
        members: &mut Vec<RawMember>,
    ) -> Result<(), ParseError> {
        let start = self.stream.current_span().start;
        let attributes = self.parse_attributes()?;
        let modifiers = self.parse_modifiers()?;

        match self.stream.peek_ident() {
            Some(keyword) if TYPE_KEYWORDS.contains(&keyword) => {
                self.parse_type_decl(start, scope, &attributes, &modifiers)
            }
            Some(keyword @ ("var" | "let")) => {
                let parsed = self.parse_bindings(start, &modifiers)?;
                trace!(keyword, count = parsed.len(), "parsed bindings");
                members.extend(parsed);
                Ok(())
            }
            Some(keyword) if FUNCTION_KEYWORDS.contains(&keyword) => {
                trace!(keyword, "skipping function-like member");
                self.skip_function()
            }
            // Attributes or modifiers in front of something else; the next
            // item picks it up.
            _ if self.stream.current_span().start != start => Ok(()),
            _ => self.stream.skip_to_boundary(),
        }
    }

    /// `@name`, `@name(args)`, `@Module.name`; returns the last path segment
    /// of each.
    fn parse_attributes(&mut self) -> Result<Vec<&'src str>, ParseError> {
        let mut attributes = Vec::new();
        while let Some(Token::Attribute(name)) = self.stream.peek() {
            self.stream.advance();
            let mut last = name;
            while self.stream.check(&Token::Dot) && self.stream.is_adjacent() {
                let Some(Token::Ident(segment)) = self.stream.peek_nth(1) else {
                    break;
                };
                self.stream.advance();
                self.stream.advance();
                last = segment;
            }
            if self.stream.check(&Token::LParen) && self.stream.is_adjacent() {
                self.stream.skip_group()?;
            }
            attributes.push(last);
        }
        Ok(attributes)
    }

    fn parse_modifiers(&mut self) -> Result<Modifiers, ParseError> {
        let mut modifiers = Modifiers::default();
        while let Some(word) = self.stream.peek_ident() {
            if VISIBILITIES.contains(&word) {
                let Ok(visibility) = word.parse::<Visibility>() else {
                    break;
                };
                self.stream.advance();
                let setter_only = self.stream.check(&Token::LParen)
                    && self.stream.peek_nth(1).is_some_and(|t| t.is_ident("set"))
                    && matches!(self.stream.peek_nth(2), Some(Token::RParen));
                if setter_only {
                    self.stream.advance();
                    self.stream.advance();
                    self.stream.advance();
                    modifiers.setter_visibility = Some(visibility);
                } else {
                    modifiers.visibility = visibility;
                }
            } else if word == "class" {
                // `class var` and `class func` are type members; `class Foo` is a
                // declaration.
                let is_modifier = self.stream.peek_nth(1).is_some_and(|next| match next {
                    Token::Ident(next) => {
                        matches!(next, "var" | "let" | "func" | "subscript")
                            || MODIFIERS.contains(&next)
                            || VISIBILITIES.contains(&next)
                    }
                    _ => false,
                });
                if !is_modifier {
                    break;
                }
                self.stream.advance();
                modifiers.is_static = true;
            } else if MODIFIERS.contains(&word) {
                self.stream.advance();
                if word == "static" {
                    modifiers.is_static = true;
                }
                // `unowned(safe)`, `nonisolated(unsafe)`
                if self.stream.check(&Token::LParen) && self.stream.is_adjacent() {
                    self.stream.skip_group()?;
                }
            } else {
                break;
            }
        }
        Ok(modifiers)
    }

    fn parse_type_decl(
        &mut self,
        start: usize,
        scope: Option<&str>,
        attributes: &[&str],
        modifiers: &Modifiers,
    ) -> Result<(), ParseError> {
        let Some(keyword) = self.stream.peek_ident() else {
            return Err(self.stream.unexpected("a type declaration"));
        };
        self.stream.advance();

        let name = self.parse_type_name()?;
        let qualified = match scope {
            Some(scope) => format!("{scope}.{name}"),
            None => name,
        };

        // Generic parameters, inheritance and `where` clauses.
        while !self.stream.check(&Token::LBrace) {
            if self.stream.at_end() || self.stream.check(&Token::RBrace) {
                return Err(self.stream.unexpected("`{`"));
            }
            self.stream.skip_one()?;
        }
        let open = self.stream.expect(Token::LBrace, "`{`")?;
        let members = self.parse_items(Some(&qualified))?;
        if self.stream.at_end() {
            return Err(ParseError::Unclosed {
                delimiter: "{".to_string(),
                span: open,
            });
        }
        let close = self.stream.expect(Token::RBrace, "`}`")?;

        if attributes.contains(&ATTRIBUTE_NAME) {
            debug!(name = %qualified, keyword, members = members.len(), "found annotated declaration");
            self.found.push(
                InputDeclaration::new(qualified, DeclKind::from_keyword(keyword))
                    .with_visibility(modifiers.visibility)
                    .with_members(members)
                    .with_span(Span::new(start, close.end)),
            );
        }
        Ok(())
    }

    /// `Name` or `Outer.Name`, as written.
    fn parse_type_name(&mut self) -> Result<String, ParseError> {
        let mut name = match self.stream.peek() {
            Some(Token::Ident(first)) => first.to_string(),
            _ => return Err(self.stream.unexpected("a type name")),
        };
        self.stream.advance();
        while self.stream.check(&Token::Dot) {
            let Some(Token::Ident(segment)) = self.stream.peek_nth(1) else {
                break;
            };
            self.stream.advance();
            self.stream.advance();
            name.push('.');
            name.push_str(segment);
        }
        Ok(name)
    }

    /// `var`/`let` followed by one or more comma-separated bindings.
    fn parse_bindings(
        &mut self,
        start: usize,
        modifiers: &Modifiers,
    ) -> Result<Vec<RawMember>, ParseError> {
        let is_let = self.stream.eat_ident("let");
        if !is_let {
            self.stream.eat_ident("var");
        }

        let mut bindings = Vec::new();
        let mut binding_start = start;
        loop {
            bindings.push(self.parse_binding(binding_start)?);
            if !self.stream.eat(&Token::Comma) {
                break;
            }
            binding_start = self.stream.current_span().start;
        }
        fill_shared_annotations(&mut bindings);

        let members = bindings
            .into_iter()
            .filter_map(|binding| {
                let Some(name) = binding.name else {
                    trace!("skipping destructuring pattern");
                    return None;
                };
                let storage = match (is_let, binding.accessors) {
                    (true, _) => Storage::Let,
                    (false, None) => Storage::Var,
                    (false, Some(block)) if is_observer_block(&block) => Storage::Var,
                    (false, Some(block)) => Storage::Computed(block),
                };
                Some(RawMember {
                    name,
                    annotation: binding.annotation,
                    initializer: binding.initializer,
                    storage,
                    visibility: modifiers.visibility,
                    setter_visibility: modifiers.setter_visibility,
                    is_static: modifiers.is_static,
                    span: binding.span,
                })
            })
            .collect();
        Ok(members)
    }

    fn parse_binding(&mut self, start: usize) -> Result<Binding, ParseError> {
        let name = match self.stream.peek() {
            Some(Token::Ident(name)) => {
                self.stream.advance();
                Some(name.to_string())
            }
            Some(Token::LParen) => {
                self.stream.skip_group()?;
                None
            }
            _ => return Err(self.stream.unexpected("a binding name")),
        };

        let annotation = if self.stream.eat(&Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let initializer = if self.stream.eat(&Token::Eq) {
            Some(self.parse_initializer()?)
        } else {
            None
        };

        let accessors = if self.stream.check(&Token::LBrace)
            && (initializer.is_none() || self.is_observer_block_at(0))
        {
            Some(self.parse_accessor_block()?)
        } else {
            None
        };

        Ok(Binding {
            name,
            annotation,
            initializer,
            accessors,
            span: Span::new(start, self.stream.prev_end()),
        })
    }

    /// A literal when the value is a single literal token, otherwise the
    /// expression text up to the end of the binding.
    fn parse_initializer(&mut self) -> Result<Initializer, ParseError> {
        let start = self.stream.current_span().start;

        let literal = match (self.stream.peek(), self.stream.peek_nth(1)) {
            (Some(Token::Ident("true" | "false")), _) => Some((LiteralKind::Boolean, 1)),
            (Some(Token::Integer(_)), _) => Some((LiteralKind::Integer, 1)),
            (Some(Token::Float(_)), _) => Some((LiteralKind::Float, 1)),
            (Some(Token::String(_)), _) => Some((LiteralKind::String, 1)),
            (Some(Token::Minus), Some(Token::Integer(_))) => Some((LiteralKind::Integer, 2)),
            (Some(Token::Minus), Some(Token::Float(_))) => Some((LiteralKind::Float, 2)),
            _ => None,
        };
        if let Some((kind, len)) = literal
            && self.ends_initializer_at(len)
        {
            for _ in 0..len {
                self.stream.advance();
            }
            return Ok(Initializer::literal(kind, self.stream.slice_from(start)));
        }

        let mut consumed = false;
        while !self.ends_initializer_at(0) {
            self.stream.skip_one()?;
            consumed = true;
        }
        if !consumed {
            return Err(self.stream.unexpected("an expression"));
        }
        Ok(Initializer::expression(self.stream.slice_from(start)))
    }

    fn ends_initializer_at(&self, n: usize) -> bool {
        self.stream.is_boundary_at(n)
            || matches!(self.stream.peek_nth(n), Some(Token::Comma))
            || self.is_observer_block_at(n)
    }

    /// `{ willSet ... }` or `{ didSet ... }` after an initializer.
    fn is_observer_block_at(&self, n: usize) -> bool {
        matches!(self.stream.peek_nth(n), Some(Token::LBrace))
            && self
                .stream
                .peek_nth(n + 1)
                .is_some_and(|t| t.is_ident("willSet") || t.is_ident("didSet"))
    }

    /// `{ get set }`, `{ get { ... } set { ... } }` or an implicit getter body.
    fn parse_accessor_block(&mut self) -> Result<AccessorBlock, ParseError> {
        if !self.starts_accessor_list() {
            self.stream.skip_group()?;
            return Ok(AccessorBlock::Getter);
        }

        let open = self.stream.expect(Token::LBrace, "`{`")?;
        let mut accessors = Vec::new();
        loop {
            match self.stream.peek() {
                Some(Token::RBrace) => break,
                None => {
                    return Err(ParseError::Unclosed {
                        delimiter: "{".to_string(),
                        span: open,
                    });
                }
                _ => {}
            }
            self.parse_attributes()?;
            while self
                .stream
                .peek_ident()
                .is_some_and(|word| matches!(word, "mutating" | "nonmutating" | "__consuming"))
            {
                self.stream.advance();
            }
            let Some(keyword) = self.stream.peek_ident() else {
                return Err(self.stream.unexpected("an accessor"));
            };
            self.stream.advance();
            accessors.push(Accessor::from_keyword(keyword));

            // `set(newValue)`
            if self.stream.check(&Token::LParen) {
                self.stream.skip_group()?;
            }
            while self
                .stream
                .peek_ident()
                .is_some_and(|word| matches!(word, "async" | "throws"))
            {
                self.stream.advance();
                if self.stream.check(&Token::LParen) && self.stream.is_adjacent() {
                    self.stream.skip_group()?;
                }
            }
            if self.stream.check(&Token::LBrace) {
                self.stream.skip_group()?;
            }
        }
        self.stream.expect(Token::RBrace, "`}`")?;
        Ok(AccessorBlock::Accessors(accessors))
    }

    /// Whether the `{` at the cursor opens an explicit accessor list.
    fn starts_accessor_list(&self) -> bool {
        let mut n = 1;
        while let Some(token) = self.stream.peek_nth(n) {
            match token {
                Token::Attribute(_) => n += 1,
                Token::Ident("mutating" | "nonmutating" | "__consuming") => n += 1,
                Token::Ident(word) => return ACCESSOR_KEYWORDS.contains(&word),
                _ => return false,
            }
        }
        false
    }

    /// `func`, `init`, `deinit` and `subscript`, with or without a body.
    fn skip_function(&mut self) -> Result<(), ParseError> {
        self.stream.advance();
        loop {
            if self.stream.check(&Token::LBrace) {
                return self.stream.skip_group();
            }
            if self.stream.is_boundary() {
                return Ok(());
            }
            if is_opener(self.stream.peek()) {
                self.stream.skip_group()?;
            } else {
                self.stream.advance();
            }
        }
    }
}

/// In `var a, b: Int`, `a` takes the type annotated on `b`.
fn fill_shared_annotations(bindings: &mut [Binding]) {
    let mut next: Option<TypeExpr> = None;
    for binding in bindings.iter_mut().rev() {
        match &binding.annotation {
            Some(annotation) => next = Some(annotation.clone()),
            None if binding.initializer.is_none() && binding.accessors.is_none() => {
                binding.annotation = next.clone();
            }
            None => next = None,
        }
    }
}

fn is_observer_block(block: &AccessorBlock) -> bool {
    match block {
        AccessorBlock::Getter => false,
        AccessorBlock::Accessors(list) => {
            !list.is_empty()
                && list
                    .iter()
                    .all(|a| matches!(a, Accessor::WillSet | Accessor::DidSet))
        }
    }
}
