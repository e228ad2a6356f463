//! Method synonyms for function-valued members.
//!
//! A stored closure such as
//!
//! ```text
//! var fetch: (_ id: Int, _ includeDetails: Bool) async throws -> User
//! ```
//!
//! can only be called positionally: `client.fetch(1, true)`. When its parameters
//! carry names, the interface also gets a method requirement spelling them as
//! argument labels:
//!
//! ```text
//! func fetch(id: Int, includeDetails: Bool) async throws -> User
//! ```
//!
//! # Label detection
//!
//! A parameter's external label is its first name unless that is the `_`
//! wildcard, in which case its second name is used (again unless it is `_`).
//! So `(_ id: Int)` and `(id: Int)` are labeled `id`, while `(Int)` and
//! `(_: Int)` are unlabeled.
//!
//! When only some parameters are labeled, the unlabeled ones are omitted from
//! the synthesized method. The method is emitted if at least one label exists.

use tracing::trace;

use crate::interface::{MethodParam, MethodRequirement};
use crate::types::{FunctionParam, FunctionType, WILDCARD};

/// Caller-facing name of a function type parameter, if it has one.
pub fn external_label(param: &FunctionParam) -> Option<&str> {
    named(&param.first_name).or_else(|| named(&param.second_name))
}

fn named(name: &Option<String>) -> Option<&str> {
    name.as_deref()
        .filter(|name| !name.is_empty() && *name != WILDCARD)
}

/// Projects a function-valued member into a method requirement named `name`.
///
/// Returns `None` when no parameter carries a label.
pub fn derive_method(name: &str, function: &FunctionType) -> Option<MethodRequirement> {
    let params: Vec<MethodParam> = function
        .params
        .iter()
        .filter_map(|param| {
            external_label(param).map(|label| MethodParam {
                label: label.to_string(),
                ty: param.ty.clone(),
            })
        })
        .collect();

    if params.is_empty() {
        trace!(member = name, "no labeled parameters, skipping method synonym");
        return None;
    }

    let dropped = function.params.len() - params.len();
    if dropped > 0 {
        trace!(member = name, dropped, "unlabeled parameters omitted from method synonym");
    }

    Some(MethodRequirement {
        name: name.to_string(),
        params,
        effects: function.effects.clone(),
        returns: (*function.returns).clone(),
    })
}
