//! Structural description of a single struct member.
//!
//! Members are parsed from `synchronized!` input into a [`Declaration`], which is
//! what the descriptor parser validates. Keeping the model separate from the
//! surface syntax lets the validation rules be exercised without a struct shell.

use proc_macro2::Span;
use strum::Display;
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Ident, Item, Pat, Token, Type, Visibility};

/// A member declaration as the transformer sees it.
#[derive(Debug, Clone)]
pub enum Declaration {
    Variable(VariableDeclaration),
    Other(OtherDeclaration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    Immutable,
}

/// A `let` member, or a plain field viewed as an immutable binding.
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub mutability: Mutability,
    pub bindings: Vec<Binding>,
    /// Anchors declaration-level diagnostics (the `let` keyword, or the field name).
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub pattern: Pat,
    pub ty: Option<Type>,
    pub initializer: Option<Expr>,
}

/// What a non-variable member declares, as named in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DeclarationKind {
    #[strum(serialize = "function")]
    Function,
    #[strum(serialize = "const")]
    Constant,
    #[strum(serialize = "static")]
    Static,
    #[strum(serialize = "type definition")]
    Type,
    #[strum(serialize = "item")]
    Other,
}

/// Any member that is not a variable declaration.
#[derive(Debug, Clone)]
pub struct OtherDeclaration {
    pub kind: DeclarationKind,
    pub span: Span,
}

impl From<&Item> for OtherDeclaration {
    fn from(item: &Item) -> Self {
        let kind = match item {
            Item::Fn(_) => DeclarationKind::Function,
            Item::Const(_) => DeclarationKind::Constant,
            Item::Static(_) => DeclarationKind::Static,
            Item::Struct(_)
            | Item::Enum(_)
            | Item::Union(_)
            | Item::Type(_)
            | Item::Trait(_)
            | Item::TraitAlias(_) => DeclarationKind::Type,
            _ => DeclarationKind::Other,
        };
        Self {
            kind,
            span: item.span(),
        }
    }
}

/// A plain, unlocked struct field: `name: Type`.
#[derive(Debug, Clone)]
pub struct PlainField {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub name: Ident,
    pub ty: Type,
}

impl PlainField {
    /// The field as a declaration, for when it carries `#[locked]`.
    pub fn to_declaration(&self) -> Declaration {
        Declaration::Variable(VariableDeclaration {
            attrs: self.attrs.clone(),
            vis: self.vis.clone(),
            mutability: Mutability::Immutable,
            bindings: vec![Binding {
                pattern: Pat::Ident(syn::PatIdent {
                    attrs: Vec::new(),
                    by_ref: None,
                    mutability: None,
                    ident: self.name.clone(),
                    subpat: None,
                }),
                ty: Some(self.ty.clone()),
                initializer: None,
            }],
            span: self.name.span(),
        })
    }
}

/// One member of a `synchronized!` struct body, before `#[locked]` is interpreted.
#[derive(Debug, Clone)]
pub enum Member {
    Let(VariableDeclaration),
    Field(PlainField),
    Item { attrs: Vec<Attribute>, item: Box<Item> },
}

impl Member {
    pub fn attrs(&self) -> &[Attribute] {
        match self {
            Self::Let(variable) => &variable.attrs,
            Self::Field(field) => &field.attrs,
            Self::Item { attrs, .. } => attrs,
        }
    }

    pub fn to_declaration(&self) -> Declaration {
        match self {
            Self::Let(variable) => Declaration::Variable(variable.clone()),
            Self::Field(field) => field.to_declaration(),
            Self::Item { item, .. } => Declaration::Other(OtherDeclaration::from(&**item)),
        }
    }
}

impl Parse for Member {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;

        if input.peek(Token![let]) {
            let let_token: Token![let] = input.parse()?;
            let mutability = match input.parse::<Option<Token![mut]>>()? {
                Some(_) => Mutability::Mutable,
                None => Mutability::Immutable,
            };
            let mut bindings = Vec::new();
            loop {
                bindings.push(input.call(parse_binding)?);
                if input.peek(Token![,]) {
                    input.parse::<Token![,]>()?;
                    continue;
                }
                break;
            }
            input.parse::<Token![;]>()?;
            return Ok(Self::Let(VariableDeclaration {
                attrs,
                vis,
                mutability,
                bindings,
                span: let_token.span,
            }));
        }

        if input.peek(syn::Ident) && input.peek2(Token![:]) && !input.peek2(Token![::]) {
            let name: Ident = input.parse()?;
            input.parse::<Token![:]>()?;
            let ty: Type = input.parse()?;
            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
            return Ok(Self::Field(PlainField {
                attrs,
                vis,
                name,
                ty,
            }));
        }

        let item: Item = input.parse()?;
        Ok(Self::Item {
            attrs,
            item: Box::new(item),
        })
    }
}

fn parse_binding(input: ParseStream) -> syn::Result<Binding> {
    let pattern = Pat::parse_single(input)?;
    let ty = if input.peek(Token![:]) {
        input.parse::<Token![:]>()?;
        Some(input.parse::<Type>()?)
    } else {
        None
    };
    let initializer = if input.peek(Token![=]) {
        input.parse::<Token![=]>()?;
        Some(input.parse::<Expr>()?)
    } else {
        None
    };
    Ok(Binding {
        pattern,
        ty,
        initializer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn variable(member: Member) -> VariableDeclaration {
        match member {
            Member::Let(variable) => variable,
            other => panic!("expected a let member, got {other:?}"),
        }
    }

    #[test]
    fn parses_let_with_type_and_initializer() {
        let member: Member = parse_quote! {
            /// Hits.
            #[locked(Checked)]
            pub let mut hits: u64 = 0;
        };
        let decl = variable(member);
        assert_eq!(decl.mutability, Mutability::Mutable);
        assert_eq!(decl.attrs.len(), 2);
        assert!(matches!(decl.vis, Visibility::Public(_)));
        assert_eq!(decl.bindings.len(), 1);
        let binding = &decl.bindings[0];
        assert_eq!(binding.ty, Some(parse_quote!(u64)));
        assert_eq!(binding.initializer, Some(parse_quote!(0)));
    }

    #[test]
    fn parses_let_without_mut_or_initializer() {
        let decl = variable(parse_quote!(let label: String;));
        assert_eq!(decl.mutability, Mutability::Immutable);
        assert!(decl.bindings[0].initializer.is_none());
    }

    #[test]
    fn parses_multiple_bindings() {
        let decl = variable(parse_quote!(let mut a: u8 = 1, b = u8::MAX;));
        assert_eq!(decl.bindings.len(), 2);
        assert!(decl.bindings[1].ty.is_none());
        assert_eq!(decl.bindings[1].initializer, Some(parse_quote!(u8::MAX)));
    }

    #[test]
    fn parses_destructuring_pattern() {
        let decl = variable(parse_quote!(let mut (a, b) = pair;));
        assert!(matches!(decl.bindings[0].pattern, Pat::Tuple(_)));
    }

    #[test]
    fn parses_struct_literal_initializer() {
        let decl = variable(parse_quote!(let mut origin = Point { x: 0, y: 0 };));
        assert!(matches!(decl.bindings[0].initializer, Some(Expr::Struct(_))));
    }

    #[test]
    fn parses_plain_field() {
        let member: Member = parse_quote!(pub id: u32);
        let Member::Field(field) = member else {
            panic!("expected a plain field");
        };
        assert_eq!(field.name, "id");
        assert_eq!(field.ty, parse_quote!(u32));
    }

    #[test]
    fn plain_field_is_an_immutable_declaration() {
        let member: Member = parse_quote!(id: u32);
        let Declaration::Variable(decl) = member.to_declaration() else {
            panic!("expected a variable declaration");
        };
        assert_eq!(decl.mutability, Mutability::Immutable);
        assert_eq!(decl.bindings[0].ty, Some(parse_quote!(u32)));
    }

    #[test]
    fn items_become_other_declarations() {
        let member: Member = parse_quote! {
            #[locked(Checked)]
            fn count() -> u64 { 0 }
        };
        assert_eq!(member.attrs().len(), 1);
        let Declaration::Other(other) = member.to_declaration() else {
            panic!("expected a non-variable declaration");
        };
        assert_eq!(other.kind, DeclarationKind::Function);

        let member: Member = parse_quote!(const LIMIT: u64 = 3;);
        let Declaration::Other(other) = member.to_declaration() else {
            panic!("expected a non-variable declaration");
        };
        assert_eq!(other.kind, DeclarationKind::Constant);
        assert_eq!(other.kind.to_string(), "const");
    }
}
