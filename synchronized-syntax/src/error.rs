use proc_macro2::Span;
use thiserror::Error;

/// Why a `#[locked]` property could not be transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The lock kind argument did not name a known lock kind.
    #[error(
        "invalid lock kind, expected one of `Checked`, `Unchecked`, `CheckedOptional`, `UncheckedOptional`"
    )]
    InvalidLockType,

    /// The lock kind argument was required but absent.
    #[error("#[locked] requires a lock kind argument, e.g. #[locked(Checked)]")]
    NoArguments,

    /// Arguments were passed that the configured calling convention does not accept.
    #[error("unexpected #[locked] arguments for the configured calling convention")]
    UnexpectedArguments,

    /// The attribute was applied to something other than a property declaration.
    #[error("#[locked] can only be applied to `let` property declarations")]
    NotAProperty,

    /// The property was declared without `mut`.
    #[error("#[locked] property must be declared with `let mut`")]
    MustBeMutableBinding,

    /// The declaration binds more than one property.
    #[error("#[locked] property declaration must have exactly one binding")]
    MustHaveExactlyOneBinding,

    /// The binding destructures instead of naming a single property.
    #[error("#[locked] property binding pattern must be an identifier")]
    MustBeIdentifierPattern,

    /// No annotation and no initializer shape the type could be read from.
    #[error(
        "#[locked] property must have a type annotation, a `Type::member` value, or a `Type(..)` call value"
    )]
    CannotDetermineType,

    /// A non-blocking lock kind was requested for a property that is not an `Option`.
    #[error("`CheckedOptional` and `UncheckedOptional` locks require an `Option<_>` property type")]
    OptionalTypeRequiredForIfAvailable,
}

/// A transform failure anchored at the offending source location.
#[derive(Debug, Clone, Copy)]
pub struct TransformError {
    kind: ErrorKind,
    span: Span,
}

impl TransformError {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for TransformError {}

impl From<TransformError> for syn::Error {
    fn from(error: TransformError) -> Self {
        syn::Error::new(error.span, error.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syn_error_carries_the_kind_message() {
        let error = TransformError::new(ErrorKind::MustBeMutableBinding, Span::call_site());
        let error: syn::Error = error.into();
        assert_eq!(
            error.to_string(),
            "#[locked] property must be declared with `let mut`"
        );
    }

    #[test]
    fn display_matches_kind() {
        let error = TransformError::new(ErrorKind::NoArguments, Span::call_site());
        assert_eq!(error.to_string(), ErrorKind::NoArguments.to_string());
        assert_eq!(error.kind(), ErrorKind::NoArguments);
    }
}
