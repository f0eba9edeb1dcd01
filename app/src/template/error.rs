// ==============================================================================
// template/error.rs - Template Errors
// ==============================================================================
// Description: Compile-time and apply-time error types for line templates
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use thiserror::Error;

use crate::cache::CacheError;

/// Errors that can occur while compiling a template
///
/// Compilation is all-or-nothing: any of these means no template was built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Unknown directive '${0}'")]
    UnknownDirective(String),

    #[error("Malformed arguments for directive '${directive}': {details}")]
    MalformedDirectiveArguments { directive: String, details: String },

    #[error("Unbalanced conditional: {open} '$if' without a matching '$fi'")]
    UnbalancedConditional { open: usize },

    #[error("'${0}' used outside of any '$if'")]
    ElseOrEndifWithoutIf(String),

    #[error("More than one '$else' inside a single '$if'")]
    DuplicateElse,
}

impl CompileError {
    pub(crate) fn malformed(directive: &str, details: impl Into<String>) -> Self {
        CompileError::MalformedDirectiveArguments {
            directive: directive.to_string(),
            details: details.into(),
        }
    }
}

/// Errors propagated from external collaborators while applying a template
///
/// An apply error aborts the current record only; the template stays usable.
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("Cannot read field {index} as a flag: {details}")]
    InvalidFlag { index: usize, details: String },

    #[error("Cross-reference lookup failed: {0}")]
    Cache(#[from] CacheError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CompileError::UnknownField("nosuch".into()).to_string(),
            "Unknown field 'nosuch'"
        );
        assert_eq!(
            CompileError::ElseOrEndifWithoutIf("fi".into()).to_string(),
            "'$fi' used outside of any '$if'"
        );
        assert_eq!(
            CompileError::malformed("list", "expected 3 arguments").to_string(),
            "Malformed arguments for directive '$list': expected 3 arguments"
        );
    }
}
