//! Source text for emitted declarations.

use crate::decl::Visibility;
use crate::interface::{InterfaceSpec, escaped_interface_name};

/// Options for [`render_interface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Append the conformance extension after the interface.
    pub conformance: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            conformance: false,
        }
    }
}

impl RenderOptions {
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_conformance(mut self, conformance: bool) -> Self {
        self.conformance = conformance;
        self
    }
}

/// Keyword prefix (with trailing space) for the emitted declarations.
///
/// Interfaces cannot be `open`, and both file-scoped levels render as `private`.
pub fn visibility_prefix(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Open | Visibility::Public => "public ",
        Visibility::Package => "package ",
        Visibility::Internal => "",
        Visibility::FilePrivate | Visibility::Private => "private ",
    }
}

/// Renders the interface nested in an extension of its origin type.
pub fn render_interface(spec: &InterfaceSpec, options: &RenderOptions) -> String {
    let prefix = visibility_prefix(spec.visibility);
    let one = " ".repeat(options.indent);
    let two = one.repeat(2);

    let mut out = String::new();
    out.push_str(&format!("{prefix}extension {} {{\n", spec.origin));
    out.push_str(&format!(
        "{one}{prefix}protocol {} {{\n",
        escaped_interface_name()
    ));
    for requirement in &spec.requirements {
        out.push_str(&format!("{two}{requirement}\n"));
    }
    out.push_str(&format!("{one}}}\n}}\n"));

    if options.conformance {
        out.push('\n');
        out.push_str(&spec.conformance().to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;
    use crate::access::AccessMode;
    use crate::interface::{INTERFACE_NAME, PropertyRequirement, Requirement};
    use crate::types::TypeExpr;

    fn spec(visibility: Visibility) -> InterfaceSpec {
        InterfaceSpec {
            origin: "PublicClient".to_string(),
            name: INTERFACE_NAME,
            visibility,
            requirements: vec![Requirement::Property(PropertyRequirement {
                name: "endpoint".to_string(),
                ty: TypeExpr::named("String"),
                access: AccessMode::ReadWrite,
            })],
        }
    }

    #[test]
    fn test_public_interface() {
        let rendered = render_interface(&spec(Visibility::Public), &RenderOptions::default());
        expect![[r#"
            public extension PublicClient {
                public protocol `Protocol` {
                    var endpoint: String { get set }
                }
            }
        "#]]
        .assert_eq(&rendered);
    }

    #[test]
    fn test_internal_with_conformance_and_indent() {
        let options = RenderOptions::default().with_indent(2).with_conformance(true);
        let rendered = render_interface(&spec(Visibility::Internal), &options);
        expect![[r#"
            extension PublicClient {
              protocol `Protocol` {
                var endpoint: String { get set }
              }
            }

            extension PublicClient: PublicClient.`Protocol` {}
        "#]]
        .assert_eq(&rendered);
    }

    #[test]
    fn test_visibility_prefixes() {
        assert_eq!(visibility_prefix(Visibility::Open), "public ");
        assert_eq!(visibility_prefix(Visibility::Package), "package ");
        assert_eq!(visibility_prefix(Visibility::FilePrivate), "private ");
    }
}
