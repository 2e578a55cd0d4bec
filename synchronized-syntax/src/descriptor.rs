use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Ident, Pat, Path, Type, TypePath, Visibility};

use crate::declaration::{Binding, Declaration, Mutability};
use crate::error::{ErrorKind, TransformError};
use crate::lock_kind::LockKind;

/// The validated shape of a `#[locked]` property.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: Ident,
    pub ty: Type,
    /// `None` when the value is supplied to the constructor instead.
    pub initializer: Option<Expr>,
    pub vis: Visibility,
    /// Doc comments, forwarded to the getter.
    pub docs: Vec<Attribute>,
    /// `#[cfg]` and `#[cfg_attr]`, applied to every generated item of the property.
    pub cfgs: Vec<Attribute>,
    /// Any other attribute except `#[locked]`, applied to every accessor method.
    pub attrs: Vec<Attribute>,
    /// The declaration; generated items that stand for the property point here.
    pub span: Span,
}

/// Validate `declaration` and extract its name, type and initializer.
///
/// Checks run in a fixed order and stop at the first failure.
pub fn parse(declaration: &Declaration, kind: LockKind) -> Result<FieldDescriptor, TransformError> {
    let variable = match declaration {
        Declaration::Variable(variable) => variable,
        Declaration::Other(other) => {
            return Err(TransformError::new(ErrorKind::NotAProperty, other.span));
        }
    };

    if variable.mutability != Mutability::Mutable {
        return Err(TransformError::new(
            ErrorKind::MustBeMutableBinding,
            variable.span,
        ));
    }

    let binding = match variable.bindings.as_slice() {
        [binding] => binding,
        [_, extra, ..] => {
            return Err(TransformError::new(
                ErrorKind::MustHaveExactlyOneBinding,
                extra.pattern.span(),
            ));
        }
        [] => {
            return Err(TransformError::new(
                ErrorKind::MustHaveExactlyOneBinding,
                variable.span,
            ));
        }
    };

    let name = match &binding.pattern {
        Pat::Ident(ident)
            if ident.by_ref.is_none() && ident.mutability.is_none() && ident.subpat.is_none() =>
        {
            ident.ident.clone()
        }
        other => {
            return Err(TransformError::new(
                ErrorKind::MustBeIdentifierPattern,
                other.span(),
            ));
        }
    };

    let ty = property_type(binding)
        .ok_or_else(|| TransformError::new(ErrorKind::CannotDetermineType, name.span()))?;

    if kind.is_if_available() && !is_optional(&ty) {
        return Err(TransformError::new(
            ErrorKind::OptionalTypeRequiredForIfAvailable,
            ty.span(),
        ));
    }

    let mut docs = Vec::new();
    let mut cfgs = Vec::new();
    let mut attrs = Vec::new();
    for attr in &variable.attrs {
        let path = attr.path();
        if path.is_ident("locked") {
            continue;
        } else if path.is_ident("doc") {
            docs.push(attr.clone());
        } else if path.is_ident("cfg") || path.is_ident("cfg_attr") {
            cfgs.push(attr.clone());
        } else {
            attrs.push(attr.clone());
        }
    }

    Ok(FieldDescriptor {
        name,
        ty,
        initializer: binding.initializer.clone(),
        vis: variable.vis.clone(),
        docs,
        cfgs,
        attrs,
        span: variable.span,
    })
}

/// The annotated type, or one inferred from the initializer's shape.
fn property_type(binding: &Binding) -> Option<Type> {
    if let Some(ty) = &binding.ty {
        return Some(ty.clone());
    }
    match binding.initializer.as_ref()? {
        // `u64::MAX`, `Ordering::Relaxed`
        Expr::Path(path) if path.qself.is_none() => qualifier(&path.path),
        // `Wrapper(1)`, or `String::new()` through its qualifier
        Expr::Call(call) => match &*call.func {
            Expr::Path(callee) if callee.qself.is_none() => {
                if is_associated_fn(&callee.path) {
                    qualifier(&callee.path)
                } else {
                    Some(path_type(callee.path.clone()))
                }
            }
            _ => None,
        },
        // `Point { x: 0, y: 0 }`
        Expr::Struct(literal) if literal.qself.is_none() => Some(path_type(literal.path.clone())),
        _ => None,
    }
}

/// `a::b::c` → `a::b`. `None` for a single segment.
fn qualifier(path: &Path) -> Option<Type> {
    if path.segments.len() < 2 {
        return None;
    }
    let kept = path.segments.len() - 1;
    Some(path_type(Path {
        leading_colon: path.leading_colon,
        segments: path.segments.iter().take(kept).cloned().collect(),
    }))
}

fn is_associated_fn(path: &Path) -> bool {
    path.segments.len() >= 2
        && path
            .segments
            .last()
            .and_then(|segment| segment.ident.to_string().chars().next())
            .is_some_and(|c| c.is_lowercase() || c == '_')
}

fn path_type(path: Path) -> Type {
    Type::Path(TypePath { qself: None, path })
}

/// Whether `ty` is `Option<_>`, spelled bare or through `std`/`core`.
pub fn is_optional(ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            let names: Vec<String> = path
                .path
                .segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect();
            let leading = path.path.leading_colon.is_some();
            match names.as_slice() {
                [option] => !leading && option == "Option",
                [root, module, option] => {
                    (root == "std" || root == "core") && module == "option" && option == "Option"
                }
                _ => false,
            }
        }
        Type::Paren(paren) => is_optional(&paren.elem),
        Type::Group(group) => is_optional(&group.elem),
        _ => false,
    }
}
