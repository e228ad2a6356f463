//! Semantic type descriptors.
//!
//! A [`TypeExpr`] keeps the exact text the host wrote for a type, because the
//! mirrored property requirement reproduces it verbatim. Function types are
//! additionally broken down into parameters, effects and a return type so that
//! the method synonym generator can project them into a callable signature.

use std::fmt;

use serde::{Serialize, Serializer};

/// Placeholder spelling the host uses for "no name".
pub const WILDCARD: &str = "_";

/// A type as written at the member's declaration site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeExpr {
    text: String,
    kind: TypeKind,
}

/// Structural view of a [`TypeExpr`].
///
/// Only function types are inspected; everything else is opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Named,
    Function(FunctionType),
}

impl TypeExpr {
    /// An opaque type such as `Config`, `[String: Int]` or `Int?`.
    pub fn named(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: TypeKind::Named,
        }
    }

    /// A function type with canonical text synthesized from its structure.
    pub fn function(function: FunctionType) -> Self {
        Self {
            text: function.to_string(),
            kind: TypeKind::Function(function),
        }
    }

    /// A function type that keeps the host's original spelling.
    pub fn function_with_text(text: impl Into<String>, function: FunctionType) -> Self {
        Self {
            text: text.into(),
            kind: TypeKind::Function(function),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match &self.kind {
            TypeKind::Function(function) => Some(function),
            TypeKind::Named => None,
        }
    }

    pub fn is_function(&self) -> bool {
        self.as_function().is_some()
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Serialized as its source text.
impl Serialize for TypeExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// Asynchronous / fallible markers on a callable signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Effects {
    pub is_async: bool,
    pub throws: bool,
    /// Error type of a typed throw, `throws(E)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thrown_type: Option<String>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn async_throws() -> Self {
        Self {
            is_async: true,
            throws: true,
            thrown_type: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.is_async && !self.throws
    }
}

/// Writes ` async`, ` throws` / ` throws(E)` with a leading space per marker.
impl fmt::Display for Effects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_async {
            f.write_str(" async")?;
        }
        if self.throws {
            match &self.thrown_type {
                Some(error) => write!(f, " throws({error})")?,
                None => f.write_str(" throws")?,
            }
        }
        Ok(())
    }
}

/// One element of a function type's parameter list.
///
/// `(_ id: Int)` has first name `_` and second name `id`; `(id: Int)` has only a
/// first name; `(Int)` has neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionParam {
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub ty: TypeExpr,
}

impl FunctionParam {
    pub fn unnamed(ty: TypeExpr) -> Self {
        Self {
            first_name: None,
            second_name: None,
            ty,
        }
    }

    pub fn labeled(label: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            first_name: Some(label.into()),
            second_name: None,
            ty,
        }
    }

    /// `first second: Type`, e.g. `_ id: Int`.
    pub fn with_names(first: impl Into<String>, second: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            first_name: Some(first.into()),
            second_name: Some(second.into()),
            ty,
        }
    }
}

impl fmt::Display for FunctionParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.first_name, &self.second_name) {
            (Some(first), Some(second)) => write!(f, "{first} {second}: {}", self.ty),
            (Some(first), None) => write!(f, "{first}: {}", self.ty),
            (None, _) => write!(f, "{}", self.ty),
        }
    }
}

/// `(params) effects -> returns`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub params: Vec<FunctionParam>,
    pub effects: Effects,
    pub returns: Box<TypeExpr>,
}

impl FunctionType {
    pub fn new(params: Vec<FunctionParam>, effects: Effects, returns: TypeExpr) -> Self {
        Self {
            params,
            effects,
            returns: Box::new(returns),
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, "){} -> {}", self.effects, self.returns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_text_is_canonical() {
        let function = FunctionType::new(
            vec![
                FunctionParam::with_names("_", "id", TypeExpr::named("Int")),
                FunctionParam::unnamed(TypeExpr::named("Bool")),
            ],
            Effects::async_throws(),
            TypeExpr::named("User"),
        );
        let ty = TypeExpr::function(function);
        assert_eq!(ty.text(), "(_ id: Int, Bool) async throws -> User");
        assert!(ty.is_function());
    }

    #[test]
    fn test_typed_throw_display() {
        let effects = Effects {
            is_async: false,
            throws: true,
            thrown_type: Some("NetworkError".to_string()),
        };
        assert_eq!(effects.to_string(), " throws(NetworkError)");
        assert!(Effects::none().to_string().is_empty());
    }

    #[test]
    fn test_named_type_is_opaque() {
        let ty = TypeExpr::named("[String: Int]");
        assert!(ty.as_function().is_none());
        assert_eq!(ty.to_string(), "[String: Int]");
    }
}
