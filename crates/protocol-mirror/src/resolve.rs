//! Member type resolution.
//!
//! An explicit annotation always wins and is used as written. Without one, the
//! type is guessed from the initializer, but only when the initializer is a bare
//! literal. This is a shallow heuristic for fields like `var retries = 3`, not
//! type inference: `Service()`, `[1, 2]` or `nil` resolve to nothing and the
//! member is left out of the interface.

use crate::decl::{Initializer, LiteralKind, RawMember};
use crate::types::TypeExpr;

/// Literal shape to type name, checked in order.
pub const LITERAL_RULES: &[(LiteralKind, &str)] = &[
    (LiteralKind::Boolean, "Bool"),
    (LiteralKind::Float, "Double"),
    (LiteralKind::Integer, "Int"),
    (LiteralKind::String, "String"),
];

/// Type name for a literal shape, if the rule table covers it.
pub fn literal_type(kind: LiteralKind) -> Option<&'static str> {
    LITERAL_RULES
        .iter()
        .find(|(shape, _)| *shape == kind)
        .map(|(_, name)| *name)
}

/// Resolves the member's type, or `None` when it cannot be determined.
pub fn resolve_type(member: &RawMember) -> Option<TypeExpr> {
    if let Some(annotation) = &member.annotation {
        return Some(annotation.clone());
    }
    match member.initializer.as_ref()? {
        Initializer::Literal { kind, .. } => literal_type(*kind).map(TypeExpr::named),
        Initializer::Expression(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::types::{Effects, FunctionParam, FunctionType};

    #[rstest]
    #[case(LiteralKind::Boolean, "true", "Bool")]
    #[case(LiteralKind::Float, "3.14", "Double")]
    #[case(LiteralKind::Integer, "42", "Int")]
    #[case(LiteralKind::String, "\"default\"", "String")]
    fn test_literal_inference(#[case] kind: LiteralKind, #[case] text: &str, #[case] expected: &str) {
        let member = RawMember::variable("value").with_initializer(Initializer::literal(kind, text));
        assert_eq!(resolve_type(&member).unwrap().text(), expected);
    }

    #[test]
    fn test_annotation_wins_over_initializer() {
        let member = RawMember::variable("ratio")
            .with_type(TypeExpr::named("Float"))
            .with_initializer(Initializer::literal(LiteralKind::Float, "0.5"));
        assert_eq!(resolve_type(&member).unwrap().text(), "Float");
    }

    #[test]
    fn test_annotation_is_used_verbatim() {
        let function = FunctionType::new(
            vec![FunctionParam::unnamed(TypeExpr::named("Int"))],
            Effects::none(),
            TypeExpr::named("Void"),
        );
        let ty = TypeExpr::function_with_text("(Int)->Void", function);
        let member = RawMember::variable("callback").with_type(ty.clone());
        assert_eq!(resolve_type(&member), Some(ty));
    }

    #[test]
    fn test_unresolvable_members() {
        let constructed =
            RawMember::constant("shared").with_initializer(Initializer::expression("Service()"));
        assert_eq!(resolve_type(&constructed), None);
        assert_eq!(resolve_type(&RawMember::variable("bare")), None);
    }
}
