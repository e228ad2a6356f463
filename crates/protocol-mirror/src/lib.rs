//! Protocol Mirror - interface synthesis for record types.
//!
//! Given a record declaration, the pass builds an interface (`Protocol`) nested
//! under the record that mirrors its public members:
//!
//! - one property requirement per eligible member, read-only or read-write
//! - a method requirement for every function-valued member whose parameters
//!   carry external labels
//!
//! # Example
//!
//! ```
//! use protocol_mirror::{InputDeclaration, RawMember, RenderOptions, TypeExpr, expand};
//!
//! let decl = InputDeclaration::record("APIClient")
//!     .with_member(RawMember::variable("config").with_type(TypeExpr::named("Config")));
//!
//! let expansion = expand(&decl);
//! let spec = expansion.interface.expect("one eligible member");
//! assert_eq!(
//!     protocol_mirror::render_interface(&spec, &RenderOptions::default()),
//!     "extension APIClient {\n    protocol `Protocol` {\n        var config: Config { get set }\n    }\n}\n",
//! );
//! ```
//!
//! # Conformance is the caller's job
//!
//! The record does not conform to the generated interface automatically.
//! Once the interface has been spliced into the host's compilation unit, the
//! caller adds [`InterfaceSpec::conformance`] as a second, separate step.

pub mod access;
pub mod decl;
pub mod diagnostics;
pub mod interface;
pub mod method;
pub mod render;
pub mod resolve;
pub mod scan;
pub mod span;
pub mod types;

use serde::Serialize;
use tracing::{debug, instrument};

pub use access::AccessMode;
pub use decl::{
    Accessor, AccessorBlock, DeclKind, Initializer, InputDeclaration, LiteralKind, RawMember,
    Storage, Visibility,
};
pub use diagnostics::{ATTRIBUTE_NAME, Diagnostic, DiagnosticId, NotARecord, Severity};
pub use interface::{
    Conformance, INTERFACE_NAME, InterfaceSpec, MemberRequirements, MethodParam,
    MethodRequirement, PropertyRequirement, Requirement,
};
pub use render::{RenderOptions, render_interface};
pub use span::Span;
pub use types::{Effects, FunctionParam, FunctionType, TypeExpr, TypeKind};

/// Result of running the pass over one declaration.
///
/// Either an interface (possibly none, for a record without eligible members)
/// or diagnostics, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Expansion {
    pub interface: Option<InterfaceSpec>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Runs the pass over `decl`.
#[instrument(level = "debug", skip_all, fields(decl = %decl.name))]
pub fn expand(decl: &InputDeclaration) -> Expansion {
    if let Err(err) = diagnostics::check_record(decl) {
        debug!(kind = %err.kind, "declaration is not a record");
        return Expansion {
            interface: None,
            diagnostics: vec![err.into()],
        };
    }

    let members = scan::eligible_members(decl).filter_map(member_requirements);
    let interface = interface::emit(decl, members);
    if interface.is_none() {
        debug!("no eligible members, nothing emitted");
    }

    Expansion {
        interface,
        diagnostics: Vec::new(),
    }
}

/// Resolves, classifies and projects one eligible member.
///
/// `None` when the member's type cannot be resolved.
pub fn member_requirements(member: &RawMember) -> Option<MemberRequirements> {
    let Some(ty) = resolve::resolve_type(member) else {
        debug!(member = %member.name, "type not resolvable, member dropped");
        return None;
    };

    let access = access::classify(member, &ty);
    let method = ty
        .as_function()
        .and_then(|function| method::derive_method(&member.name, function));

    Some(MemberRequirements {
        property: PropertyRequirement {
            name: member.name.clone(),
            ty,
            access,
        },
        method,
    })
}
