use proc_macro2::Span;
use quote::format_ident;
use syn::{parse_quote, Attribute, Expr, Ident, ImplItemFn, Type};
use tracing::debug;

use crate::descriptor::FieldDescriptor;
use crate::lock_kind::LockKind;

/// The private lock that stores a property's value.
#[derive(Debug, Clone, PartialEq)]
pub struct BackingField {
    /// `_<name>`.
    pub name: Ident,
    /// `synchronized::UnfairLock<T>`.
    pub ty: Type,
    /// Eager lock construction, or `None` when an [`Accessor::Init`] assigns it.
    pub initializer: Option<Expr>,
    /// The property's `#[cfg]` attributes. They also gate the constructor parameter
    /// and assignment of the field.
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Init,
    Get,
    Set,
    TryGet,
    TrySet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Accessor {
    /// A constructor parameter and the one-time backing field assignment made from it.
    Init {
        parameter: Ident,
        ty: Type,
        value: Expr,
    },
    Get(ImplItemFn),
    Set(ImplItemFn),
    TryGet(ImplItemFn),
    TrySet(ImplItemFn),
}

impl Accessor {
    pub fn kind(&self) -> AccessorKind {
        match self {
            Self::Init { .. } => AccessorKind::Init,
            Self::Get(_) => AccessorKind::Get,
            Self::Set(_) => AccessorKind::Set,
            Self::TryGet(_) => AccessorKind::TryGet,
            Self::TrySet(_) => AccessorKind::TrySet,
        }
    }

    /// The generated method, for every accessor except `Init`.
    pub fn method(&self) -> Option<&ImplItemFn> {
        match self {
            Self::Init { .. } => None,
            Self::Get(method) | Self::Set(method) | Self::TryGet(method) | Self::TrySet(method) => {
                Some(method)
            }
        }
    }
}

/// Everything generated for one `#[locked]` property.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedMembers {
    pub backing_field: BackingField,
    /// `[Get, Set]` with an initializer, `[Init, Get, Set]` without.
    pub accessors: Vec<Accessor>,
    /// `[TryGet, TrySet]` for non-blocking kinds, empty otherwise.
    pub fallible: Vec<Accessor>,
}

/// Name of the `UnfairLock` method each kind reads and writes through.
pub fn lock_method(kind: LockKind) -> Ident {
    let name = match kind {
        LockKind::Checked => "with_lock",
        LockKind::Unchecked => "with_lock_unchecked",
        LockKind::CheckedOptional => "with_lock_if_available",
        LockKind::UncheckedOptional => "with_lock_if_available_unchecked",
    };
    Ident::new(name, Span::call_site())
}

/// Name of the `UnfairLock` constructor for each kind.
pub fn constructor(kind: LockKind) -> Ident {
    let name = if kind.is_checked() {
        "new"
    } else {
        "new_unchecked"
    };
    Ident::new(name, Span::call_site())
}

fn lock_phrase(kind: LockKind) -> &'static str {
    match kind {
        LockKind::Checked => "the lock (reentrant acquisition panics)",
        LockKind::Unchecked => "the lock, without reentrancy checks",
        LockKind::CheckedOptional => "the lock if it is available (reentrant acquisition panics)",
        LockKind::UncheckedOptional => "the lock if it is available, without reentrancy checks",
    }
}

/// Build the backing field and accessors for a validated property.
pub fn synthesize(descriptor: &FieldDescriptor, kind: LockKind) -> SynthesizedMembers {
    let FieldDescriptor {
        name,
        ty,
        initializer,
        vis,
        docs,
        cfgs,
        attrs,
        ..
    } = descriptor;

    let backing = format_ident!("_{}", name);
    let new = constructor(kind);
    let op = lock_method(kind);
    let phrase = lock_phrase(kind);
    let new_value = Ident::new("new_value", Span::mixed_site());

    let backing_field = BackingField {
        name: backing.clone(),
        ty: parse_quote!(synchronized::UnfairLock<#ty>),
        initializer: initializer
            .as_ref()
            .map(|value| parse_quote!(synchronized::UnfairLock::<#ty>::#new(#value))),
        attrs: cfgs.clone(),
    };

    let get_doc = doc_line(docs, &format!("Returns `{name}`, read under {phrase}."));
    let get: ImplItemFn = if kind.is_if_available() {
        parse_quote! {
            #(#cfgs)*
            #(#attrs)*
            #(#docs)*
            #[doc = #get_doc]
            #[doc = ""]
            #[doc = "Returns `None` when the lock is held elsewhere."]
            #vis fn #name(&self) -> #ty {
                self.#backing.#op(|#name| ::core::clone::Clone::clone(#name)).flatten()
            }
        }
    } else {
        parse_quote! {
            #(#cfgs)*
            #(#attrs)*
            #(#docs)*
            #[doc = #get_doc]
            #vis fn #name(&self) -> #ty {
                self.#backing.#op(|#name| ::core::clone::Clone::clone(#name))
            }
        }
    };

    let setter = format_ident!("set_{}", name);
    let set_doc = format!("Replaces `{name}`, written under {phrase}.");
    let set: ImplItemFn = if kind.is_if_available() {
        parse_quote! {
            #(#cfgs)*
            #(#attrs)*
            #[doc = #set_doc]
            #[doc = ""]
            #[doc = "The write is dropped when the lock is held elsewhere."]
            #vis fn #setter(&self, #new_value: #ty) {
                let _ = self.#backing.#op(|#name| *#name = #new_value);
            }
        }
    } else {
        parse_quote! {
            #(#cfgs)*
            #(#attrs)*
            #[doc = #set_doc]
            #vis fn #setter(&self, #new_value: #ty) {
                self.#backing.#op(|#name| *#name = #new_value);
            }
        }
    };

    let mut accessors = Vec::with_capacity(3);
    if initializer.is_none() {
        accessors.push(Accessor::Init {
            parameter: name.clone(),
            ty: ty.clone(),
            value: parse_quote!(synchronized::UnfairLock::<#ty>::#new(#name)),
        });
    }
    accessors.push(Accessor::Get(get));
    accessors.push(Accessor::Set(set));

    let fallible = if kind.is_if_available() {
        let try_getter = format_ident!("try_{}", name);
        let try_setter = format_ident!("try_set_{}", name);
        let try_get_doc = format!(
            "Returns `{name}`, read under {phrase}.\n\n\
             Fails with [`LockedError::LockUnavailable`](synchronized::LockedError::LockUnavailable) \
             when the lock is held elsewhere."
        );
        let try_set_doc = format!(
            "Replaces `{name}`, written under {phrase}.\n\n\
             Fails with [`LockedError::LockUnavailable`](synchronized::LockedError::LockUnavailable) \
             when the lock is held elsewhere; the value is not written."
        );
        vec![
            Accessor::TryGet(parse_quote! {
                #(#cfgs)*
                #(#attrs)*
                #[doc = #try_get_doc]
                #vis fn #try_getter(&self) -> ::core::result::Result<#ty, synchronized::LockedError> {
                    self.#backing
                        .#op(|#name| ::core::clone::Clone::clone(#name))
                        .ok_or(synchronized::LockedError::LockUnavailable)
                }
            }),
            Accessor::TrySet(parse_quote! {
                #(#cfgs)*
                #(#attrs)*
                #[doc = #try_set_doc]
                #vis fn #try_setter(
                    &self,
                    #new_value: #ty,
                ) -> ::core::result::Result<(), synchronized::LockedError> {
                    self.#backing
                        .#op(|#name| *#name = #new_value)
                        .ok_or(synchronized::LockedError::LockUnavailable)
                }
            }),
        ]
    } else {
        Vec::new()
    };

    debug!(
        target: "synchronized::expand",
        property = %name,
        kind = %kind,
        initializer = initializer.is_some(),
        "synthesized locked property"
    );

    SynthesizedMembers {
        backing_field,
        accessors,
        fallible,
    }
}

/// Separate generated docs from the property's own doc comments.
fn doc_line(docs: &[Attribute], text: &str) -> String {
    if !docs.is_empty() {
        format!("\n{text}")
    } else {
        text.to_owned()
    }
}
