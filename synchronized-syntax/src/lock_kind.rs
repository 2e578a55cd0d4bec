use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, VariantNames};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Meta, Token};

use crate::config::Convention;
use crate::error::{ErrorKind, TransformError};

/// The locking strategy requested for a property.
///
/// Names match exactly and case-sensitively; `checked` does not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, VariantNames)]
pub enum LockKind {
    /// Blocking, reentrant acquisition is fatal.
    Checked,
    /// Blocking, reentrancy is not checked.
    Unchecked,
    /// Non-blocking with reentrancy checks. Requires an `Option<_>` property.
    CheckedOptional,
    /// Non-blocking without reentrancy checks. Requires an `Option<_>` property.
    UncheckedOptional,
}

impl LockKind {
    /// Whether acquisition gives up instead of waiting when the lock is held.
    pub fn is_if_available(self) -> bool {
        matches!(self, Self::CheckedOptional | Self::UncheckedOptional)
    }

    /// Whether acquisition detects reentrancy.
    pub fn is_checked(self) -> bool {
        matches!(self, Self::Checked | Self::CheckedOptional)
    }
}

/// Resolve a lock kind from its textual token.
///
/// Whitespace and path qualification are stripped, so `LockKind::Checked`
/// and ` Checked ` both resolve to [`LockKind::Checked`].
pub fn resolve(token: &str) -> Result<LockKind, ErrorKind> {
    let name = token.rsplit("::").next().unwrap_or(token).trim();
    LockKind::from_str(name).map_err(|_| ErrorKind::InvalidLockType)
}

/// Resolve a lock kind from an argument expression such as `Checked` or
/// `LockKind::Checked`.
pub fn resolve_expr(argument: &Expr) -> Result<LockKind, TransformError> {
    let invalid = || TransformError::new(ErrorKind::InvalidLockType, argument.span());
    let Expr::Path(path) = argument else {
        return Err(invalid());
    };
    if path.qself.is_some() {
        return Err(invalid());
    }
    let segment = path.path.segments.last().ok_or_else(invalid)?;
    if !segment.arguments.is_none() {
        return Err(invalid());
    }
    resolve(&segment.ident.to_string()).map_err(|kind| TransformError::new(kind, argument.span()))
}

/// Read the lock kind from a `#[locked(..)]` attribute under `convention`.
pub fn from_attribute(
    attr: &Attribute,
    convention: Convention,
) -> Result<LockKind, TransformError> {
    let arguments = match &attr.meta {
        Meta::Path(_) => Punctuated::new(),
        Meta::List(list) => list
            .parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)
            .map_err(|e| TransformError::new(ErrorKind::InvalidLockType, e.span()))?,
        Meta::NameValue(name_value) => {
            return Err(TransformError::new(
                ErrorKind::InvalidLockType,
                name_value.value.span(),
            ));
        }
    };

    match convention {
        Convention::Implicit => match arguments.first() {
            None => Ok(LockKind::Checked),
            Some(first) => Err(TransformError::new(
                ErrorKind::UnexpectedArguments,
                first.span(),
            )),
        },
        Convention::Explicit => {
            let mut arguments = arguments.iter();
            let first = arguments
                .next()
                .ok_or_else(|| TransformError::new(ErrorKind::NoArguments, attr.span()))?;
            if let Some(extra) = arguments.next() {
                return Err(TransformError::new(
                    ErrorKind::UnexpectedArguments,
                    extra.span(),
                ));
            }
            resolve_expr(first)
        }
    }
}
