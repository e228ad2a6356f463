//! Read-only / read-write classification of property requirements.

use std::fmt;

use serde::Serialize;

use crate::decl::{RawMember, Storage};
use crate::types::TypeExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

impl AccessMode {
    /// Accessor clause as written in an interface requirement.
    pub fn accessor_clause(self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "{ get }",
            AccessMode::ReadWrite => "{ get set }",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.accessor_clause())
    }
}

/// Classifies a member whose type has already been resolved to `ty`.
///
/// Function-valued members are injected behavior and never settable through
/// the interface, whatever their storage.
pub fn classify(member: &RawMember, ty: &TypeExpr) -> AccessMode {
    if ty.is_function() {
        return AccessMode::ReadOnly;
    }
    if member
        .setter_visibility
        .is_some_and(|setter| setter.is_most_restrictive())
    {
        return AccessMode::ReadOnly;
    }
    match &member.storage {
        Storage::Let => AccessMode::ReadOnly,
        Storage::Var => AccessMode::ReadWrite,
        Storage::Computed(block) if block.is_getter_only() => AccessMode::ReadOnly,
        Storage::Computed(_) => AccessMode::ReadWrite,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::decl::{Accessor, AccessorBlock, Visibility};
    use crate::types::{Effects, FunctionType};

    fn string_ty() -> TypeExpr {
        TypeExpr::named("String")
    }

    fn closure_ty() -> TypeExpr {
        TypeExpr::function(FunctionType::new(
            Vec::new(),
            Effects::none(),
            TypeExpr::named("Void"),
        ))
    }

    #[rstest]
    #[case(Storage::Let, AccessMode::ReadOnly)]
    #[case(Storage::Var, AccessMode::ReadWrite)]
    #[case(Storage::Computed(AccessorBlock::Getter), AccessMode::ReadOnly)]
    #[case(Storage::Computed(AccessorBlock::Accessors(vec![Accessor::Get])), AccessMode::ReadOnly)]
    #[case(
        Storage::Computed(AccessorBlock::Accessors(vec![Accessor::Get, Accessor::Set])),
        AccessMode::ReadWrite
    )]
    #[case(
        Storage::Computed(AccessorBlock::Accessors(vec![Accessor::DidSet])),
        AccessMode::ReadWrite
    )]
    fn test_storage_classification(#[case] storage: Storage, #[case] expected: AccessMode) {
        let member = RawMember::new("value", storage);
        assert_eq!(classify(&member, &string_ty()), expected);
    }

    #[rstest]
    #[case(Storage::Let)]
    #[case(Storage::Var)]
    #[case(Storage::Computed(AccessorBlock::Accessors(vec![Accessor::Get, Accessor::Set])))]
    fn test_function_values_are_read_only(#[case] storage: Storage) {
        let member = RawMember::new("handler", storage);
        assert_eq!(classify(&member, &closure_ty()), AccessMode::ReadOnly);
    }

    #[test]
    fn test_private_setter_is_read_only() {
        let member = RawMember::variable("count")
            .with_visibility(Visibility::Public)
            .with_setter_visibility(Visibility::Private);
        assert_eq!(classify(&member, &string_ty()), AccessMode::ReadOnly);

        let internal_setter = RawMember::variable("count")
            .with_visibility(Visibility::Public)
            .with_setter_visibility(Visibility::Internal);
        assert_eq!(classify(&internal_setter, &string_ty()), AccessMode::ReadWrite);
    }

    #[test]
    fn test_accessor_clause() {
        assert_eq!(AccessMode::ReadOnly.to_string(), "{ get }");
        assert_eq!(AccessMode::ReadWrite.to_string(), "{ get set }");
    }
}
