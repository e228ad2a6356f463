//! Swift-style source front end for `protocol-mirror`.
//!
//! Finds every type declaration annotated with `@ProtocolMirror` (at the top
//! level or nested in another type body) and turns it into an
//! [`InputDeclaration`] the pass can consume.
//!
//! ```
//! let decls = protocol_mirror_syntax::parse_source(
//!     "@ProtocolMirror\nstruct Client {\n    let id: Int\n}\n",
//! )
//! .unwrap();
//! assert_eq!(decls[0].name, "Client");
//! assert_eq!(decls[0].members[0].name, "id");
//! ```

pub mod error;
pub mod lexer;
mod parser;
pub mod source;
mod stream;
mod types;

use protocol_mirror::{Expansion, InputDeclaration, expand};
use serde::Serialize;
use tracing::instrument;

pub use error::ParseError;
pub use lexer::{LexError, Spanned, Token, lex};
pub use source::{LineCol, SourceMap};

/// Parses `source` and returns the annotated declarations in source order.
#[instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_source(source: &str) -> Result<Vec<InputDeclaration>, ParseError> {
    parser::Parser::new(source)?.parse_file()
}

/// One annotated declaration together with the pass's result for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceExpansion {
    pub declaration: String,
    #[serde(skip)]
    pub input: InputDeclaration,
    #[serde(flatten)]
    pub expansion: Expansion,
}

/// Parses `source` and runs the pass over every annotated declaration.
pub fn expand_source(source: &str) -> Result<Vec<SourceExpansion>, ParseError> {
    let expansions = parse_source(source)?
        .into_iter()
        .map(|input| SourceExpansion {
            declaration: input.name.clone(),
            expansion: expand(&input),
            input,
        })
        .collect();
    Ok(expansions)
}
