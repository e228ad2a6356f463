//! Member scanning and eligibility filtering.

use tracing::trace;

use crate::decl::{InputDeclaration, RawMember};

/// Why a member was left out of the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Static,
    Restricted,
}

/// Checks a single member against the eligibility rules.
pub fn exclusion(member: &RawMember) -> Option<Exclusion> {
    if member.is_static {
        Some(Exclusion::Static)
    } else if member.visibility.is_most_restrictive() {
        Some(Exclusion::Restricted)
    } else {
        None
    }
}

/// Instance members visible outside their file, in declaration order.
pub fn eligible_members(decl: &InputDeclaration) -> impl Iterator<Item = &RawMember> {
    decl.members.iter().filter(|member| match exclusion(member) {
        Some(reason) => {
            trace!(member = %member.name, ?reason, "member excluded");
            false
        }
        None => true,
    })
}
