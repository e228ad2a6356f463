//! The synthesized interface and its requirements.

use std::fmt;

use serde::Serialize;

use crate::access::AccessMode;
use crate::decl::{InputDeclaration, Visibility};
use crate::types::{Effects, TypeExpr};

/// Name of the generated interface, scoped under the origin type.
pub const INTERFACE_NAME: &str = "Protocol";

/// `Protocol` is a reserved word in the host language and must be escaped.
pub fn escaped_interface_name() -> String {
    format!("`{INTERFACE_NAME}`")
}

/// `var name: Type { get }` / `var name: Type { get set }`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PropertyRequirement {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    pub access: AccessMode,
}

impl fmt::Display for PropertyRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var {}: {} {}", self.name, self.ty, self.access)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MethodParam {
    pub label: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
}

/// `func name(label: Type, ...) async throws -> Return`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MethodRequirement {
    pub name: String,
    pub params: Vec<MethodParam>,
    pub effects: Effects,
    pub returns: TypeExpr,
}

impl fmt::Display for MethodRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func {}(", self.name)?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", param.label, param.ty)?;
        }
        write!(f, "){} -> {}", self.effects, self.returns)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "requirement", rename_all = "lowercase")]
pub enum Requirement {
    Property(PropertyRequirement),
    Method(MethodRequirement),
}

impl Requirement {
    pub fn name(&self) -> &str {
        match self {
            Requirement::Property(property) => &property.name,
            Requirement::Method(method) => &method.name,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Property(property) => property.fmt(f),
            Requirement::Method(method) => method.fmt(f),
        }
    }
}

/// Requirements contributed by one eligible member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRequirements {
    pub property: PropertyRequirement,
    pub method: Option<MethodRequirement>,
}

/// The mirrored interface, nested under the origin type.
///
/// Emitting it does not make the origin conform to it; see
/// [`InterfaceSpec::conformance`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InterfaceSpec {
    pub origin: String,
    pub name: &'static str,
    pub visibility: Visibility,
    pub requirements: Vec<Requirement>,
}

impl InterfaceSpec {
    /// Fully qualified reference, e.g. ``APIClient.`Protocol` ``.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.origin, escaped_interface_name())
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyRequirement> {
        self.requirements.iter().filter_map(|req| match req {
            Requirement::Property(property) => Some(property),
            Requirement::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodRequirement> {
        self.requirements.iter().filter_map(|req| match req {
            Requirement::Method(method) => Some(method),
            Requirement::Property(_) => None,
        })
    }

    pub fn property(&self, name: &str) -> Option<&PropertyRequirement> {
        self.properties().find(|property| property.name == name)
    }

    /// The declaration asserting that the origin satisfies this interface.
    ///
    /// The pass never emits this on its own: the interface is nested inside the
    /// origin type, so the origin cannot name it while it is still being
    /// expanded. The caller adds it once the interface exists.
    pub fn conformance(&self) -> Conformance {
        Conformance {
            origin: self.origin.clone(),
            interface: self.qualified_name(),
        }
    }
}

/// `extension Origin: Origin.`Protocol` {}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Conformance {
    pub origin: String,
    pub interface: String,
}

impl fmt::Display for Conformance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "extension {}: {} {{}}", self.origin, self.interface)
    }
}

/// Assembles the interface, or nothing when no member survived.
pub fn emit(
    decl: &InputDeclaration,
    members: impl IntoIterator<Item = MemberRequirements>,
) -> Option<InterfaceSpec> {
    let mut requirements = Vec::new();
    for member in members {
        requirements.push(Requirement::Property(member.property));
        if let Some(method) = member.method {
            requirements.push(Requirement::Method(method));
        }
    }

    if requirements.is_empty() {
        return None;
    }

    Some(InterfaceSpec {
        origin: decl.name.clone(),
        name: INTERFACE_NAME,
        visibility: decl.visibility,
        requirements,
    })
}
