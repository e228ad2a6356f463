//! Precondition gate and diagnostic records.
//!
//! The only fatal condition for the pass is being attached to something other
//! than a record type. [`check_record`] reports it as a [`NotARecord`] error,
//! which converts into the [`Diagnostic`] handed back to the host.

use std::fmt;

use serde::Serialize;

use crate::decl::{DeclKind, InputDeclaration};
use crate::span::Span;

/// Name of the attribute as users spell it.
pub const ATTRIBUTE_NAME: &str = "ProtocolMirror";

/// Severity level of a diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
        })
    }
}

/// Stable identifier for each diagnostic the pass can raise.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum DiagnosticId {
    #[serde(rename = "protocol-mirror.not-a-record")]
    NotARecord,
}

impl DiagnosticId {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticId::NotARecord => "protocol-mirror.not-a-record",
        }
    }
}

/// A message tied to a location in the host's source.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Diagnostic {
    pub id: DiagnosticId,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(id: DiagnosticId, message: impl Into<String>, span: Span) -> Self {
        Self {
            id,
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// The attribute was attached to a declaration that is not a record type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "'@ProtocolMirror' can only be applied to struct types, but was applied to {keyword} ({kind}). Protocol mirroring requires a struct."
)]
pub struct NotARecord {
    pub keyword: String,
    pub kind: String,
    pub span: Span,
}

impl From<NotARecord> for Diagnostic {
    fn from(err: NotARecord) -> Self {
        let span = err.span;
        Diagnostic::error(DiagnosticId::NotARecord, err.to_string(), span)
    }
}

/// Succeeds for record declarations, names the actual kind otherwise.
pub fn check_record(decl: &InputDeclaration) -> Result<(), NotARecord> {
    match &decl.kind {
        DeclKind::Record => Ok(()),
        kind @ (DeclKind::SumType
        | DeclKind::ReferenceType
        | DeclKind::IsolationUnit
        | DeclKind::Other(_)) => Err(NotARecord {
            keyword: kind.keyword().to_string(),
            kind: kind.name().to_string(),
            span: decl.span,
        }),
    }
}
