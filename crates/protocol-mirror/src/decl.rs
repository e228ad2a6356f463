//! Input declaration model.
//!
//! These types describe the declaration the host hands to the pass: the type's
//! name, kind and visibility, and its members in declaration order. The host
//! front end (or a test) builds them; the pass only reads them.

use serde::Serialize;
use strum::{Display, EnumString};

use crate::span::Span;
use crate::types::TypeExpr;

/// Exposure scope of a declaration, ordered from most to least permissive.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Open,
    Public,
    Package,
    #[default]
    Internal,
    FilePrivate,
    Private,
}

impl Visibility {
    /// `private` and `fileprivate` hide a member from every other file, so such
    /// members cannot be part of an interface other files conform to.
    pub fn is_most_restrictive(self) -> bool {
        matches!(self, Visibility::FilePrivate | Visibility::Private)
    }
}

/// What kind of type declaration the attribute was attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// `struct`
    Record,
    /// `enum`
    SumType,
    /// `class`
    ReferenceType,
    /// `actor`
    IsolationUnit,
    /// Anything else, carrying the host keyword (`protocol`, `extension`, ...).
    Other(String),
}

impl DeclKind {
    /// Kebab-case kind name used in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            DeclKind::Record => "record",
            DeclKind::SumType => "sum-type",
            DeclKind::ReferenceType => "reference-type",
            DeclKind::IsolationUnit => "isolation-unit",
            DeclKind::Other(_) => "other",
        }
    }

    /// The host keyword that introduces a declaration of this kind.
    pub fn keyword(&self) -> &str {
        match self {
            DeclKind::Record => "struct",
            DeclKind::SumType => "enum",
            DeclKind::ReferenceType => "class",
            DeclKind::IsolationUnit => "actor",
            DeclKind::Other(keyword) => keyword,
        }
    }

    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "struct" => DeclKind::Record,
            "enum" => DeclKind::SumType,
            "class" => DeclKind::ReferenceType,
            "actor" => DeclKind::IsolationUnit,
            other => DeclKind::Other(other.to_string()),
        }
    }
}

/// A single accessor inside an explicit accessor block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Accessor {
    Get,
    Set,
    WillSet,
    DidSet,
    Modify,
    Read,
    Init,
    Other(String),
}

impl Accessor {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "get" => Accessor::Get,
            "set" => Accessor::Set,
            "willSet" => Accessor::WillSet,
            "didSet" => Accessor::DidSet,
            "_modify" => Accessor::Modify,
            "_read" => Accessor::Read,
            "init" => Accessor::Init,
            other => Accessor::Other(other.to_string()),
        }
    }
}

/// Body attached to a `var` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccessorBlock {
    /// `var x: T { expr }` - a bare body is an implicit getter.
    Getter,
    /// `var x: T { get {..} set {..} }`
    Accessors(Vec<Accessor>),
}

impl AccessorBlock {
    pub fn is_getter_only(&self) -> bool {
        match self {
            AccessorBlock::Getter => true,
            AccessorBlock::Accessors(list) => list.iter().all(|a| *a == Accessor::Get),
        }
    }
}

/// How a member stores its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Storage {
    /// `let`
    Let,
    /// `var` without an accessor block
    Var,
    /// `var` with an accessor block
    Computed(AccessorBlock),
}

/// Literal shapes the type resolver knows how to type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Boolean,
    Float,
    Integer,
    String,
}

/// Right-hand side of `= ...` in a member declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Initializer {
    Literal { kind: LiteralKind, text: String },
    Expression(String),
}

impl Initializer {
    pub fn literal(kind: LiteralKind, text: impl Into<String>) -> Self {
        Initializer::Literal {
            kind,
            text: text.into(),
        }
    }

    pub fn expression(text: impl Into<String>) -> Self {
        Initializer::Expression(text.into())
    }
}

/// One declared member of the input type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawMember {
    pub name: String,
    pub annotation: Option<TypeExpr>,
    pub initializer: Option<Initializer>,
    pub storage: Storage,
    pub visibility: Visibility,
    /// Narrower setter visibility, as in `private(set) var`.
    pub setter_visibility: Option<Visibility>,
    pub is_static: bool,
    pub span: Span,
}

impl RawMember {
    pub fn new(name: impl Into<String>, storage: Storage) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            initializer: None,
            storage,
            visibility: Visibility::Internal,
            setter_visibility: None,
            is_static: false,
            span: Span::DUMMY,
        }
    }

    /// `let name`
    pub fn constant(name: impl Into<String>) -> Self {
        Self::new(name, Storage::Let)
    }

    /// `var name`
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(name, Storage::Var)
    }

    pub fn with_type(mut self, ty: TypeExpr) -> Self {
        self.annotation = Some(ty);
        self
    }

    pub fn with_initializer(mut self, initializer: Initializer) -> Self {
        self.initializer = Some(initializer);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_setter_visibility(mut self, visibility: Visibility) -> Self {
        self.setter_visibility = Some(visibility);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// The declaration the mirror attribute is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputDeclaration {
    pub name: String,
    pub kind: DeclKind,
    pub visibility: Visibility,
    pub members: Vec<RawMember>,
    /// Location of the whole declaration, attributes included.
    pub span: Span,
}

impl InputDeclaration {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Internal,
            members: Vec::new(),
            span: Span::DUMMY,
        }
    }

    pub fn record(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::Record)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_member(mut self, member: RawMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = RawMember>) -> Self {
        self.members.extend(members);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}
