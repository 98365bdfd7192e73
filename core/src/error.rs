//! Error types for avatar stack construction

use thiserror::Error;

use crate::source::SourceKind;

/// Caller misconfiguration detected while building an avatar stack.
///
/// Composition itself never fails; every error surfaces at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StackError {
    #[error("more than one content source is populated: {}", join_kinds(.active))]
    MultipleSources { active: Vec<SourceKind> },

    #[error("invalid {field} for {kind} source: {reason}")]
    InvalidItemConfig {
        kind: SourceKind,
        field: &'static str,
        reason: String,
    },
}

fn join_kinds(kinds: &[SourceKind]) -> String {
    kinds
        .iter()
        .map(SourceKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
