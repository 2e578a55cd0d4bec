//! Struct-level expansion for `synchronized!`.
//!
//! Parses one or more struct shells, runs every `#[locked]` member through the
//! resolver, descriptor parser and synthesizer, then assembles the struct, its
//! constructor and the accessor methods.

use proc_macro2::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::parse::{Parse, ParseStream};
use syn::{braced, Attribute, Generics, Ident, Token, Visibility};

use crate::config::ExpandOptions;
use crate::declaration::{Member, OtherDeclaration, PlainField};
use crate::descriptor::FieldDescriptor;
use crate::synthesize::{Accessor, BackingField, SynthesizedMembers};

/// A struct declared inside `synchronized! { .. }`.
#[derive(Debug, Clone)]
pub struct SynchronizedStruct {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub name: Ident,
    pub generics: Generics,
    pub members: Vec<Member>,
}

impl Parse for SynchronizedStruct {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        input.parse::<Token![struct]>()?;
        let name: Ident = input.parse()?;
        let mut generics: Generics = input.parse()?;
        generics.where_clause = input.parse()?;

        let content;
        braced!(content in input);
        let mut members = Vec::new();
        while !content.is_empty() {
            members.push(content.parse()?);
        }

        Ok(Self {
            attrs,
            vis,
            name,
            generics,
            members,
        })
    }
}

/// Every struct of one macro invocation.
#[derive(Debug, Clone)]
pub struct SynchronizedInput {
    pub structs: Vec<SynchronizedStruct>,
}

impl Parse for SynchronizedInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut structs = Vec::new();
        while !input.is_empty() {
            structs.push(input.parse()?);
        }
        Ok(Self { structs })
    }
}

/// A member after `#[locked]` has been interpreted.
enum Resolved {
    Plain(PlainField),
    Locked {
        descriptor: FieldDescriptor,
        members: SynthesizedMembers,
    },
}

/// Expand the body of a `synchronized!` invocation.
pub fn expand(input: TokenStream, options: ExpandOptions) -> syn::Result<TokenStream> {
    let input: SynchronizedInput = syn::parse2(input)?;
    let mut output = TokenStream::new();
    let mut errors: Option<syn::Error> = None;

    for item in &input.structs {
        match expand_struct(item, options) {
            Ok(tokens) => output.extend(tokens),
            Err(e) => push_error(&mut errors, e),
        }
    }

    match errors {
        Some(e) => Err(e),
        None => Ok(output),
    }
}

fn push_error(errors: &mut Option<syn::Error>, error: syn::Error) {
    match errors {
        Some(existing) => existing.combine(error),
        None => *errors = Some(error),
    }
}

/// Expand one struct. Errors from all members are reported together.
pub fn expand_struct(
    item: &SynchronizedStruct,
    options: ExpandOptions,
) -> syn::Result<TokenStream> {
    let mut resolved = Vec::with_capacity(item.members.len());
    let mut errors: Option<syn::Error> = None;

    for member in &item.members {
        match resolve_member(member, options) {
            Ok(r) => resolved.push(r),
            Err(e) => push_error(&mut errors, e),
        }
    }
    if let Some(e) = errors {
        return Err(e);
    }

    Ok(generate(item, &resolved))
}

fn resolve_member(member: &Member, options: ExpandOptions) -> syn::Result<Resolved> {
    let mut locked = member.attrs().iter().filter(|a| a.path().is_ident("locked"));
    let attr = locked.next();
    if let Some(duplicate) = locked.next() {
        return Err(syn::Error::new_spanned(duplicate, "duplicate #[locked] attribute"));
    }

    let Some(attr) = attr else {
        return match member {
            Member::Field(field) => Ok(Resolved::Plain(field.clone())),
            Member::Let(variable) => Err(syn::Error::new(
                variable.span,
                "`let` members require #[locked(..)]; declare plain fields as `name: Type`",
            )),
            Member::Item { item, .. } => {
                let other = OtherDeclaration::from(&**item);
                Err(syn::Error::new(
                    other.span,
                    format!(
                        "unsupported {} member; synchronized! structs may only contain fields \
                         and #[locked] `let` declarations",
                        other.kind
                    ),
                ))
            }
        };
    };

    let (descriptor, members) = crate::transform(attr, &member.to_declaration(), options)?;
    Ok(Resolved::Locked {
        descriptor,
        members,
    })
}

fn generate(item: &SynchronizedStruct, resolved: &[Resolved]) -> TokenStream {
    let SynchronizedStruct {
        attrs,
        vis,
        name,
        generics,
        ..
    } = item;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut fields = Vec::new();
    let mut params = Vec::new();
    let mut inits = Vec::new();
    let mut methods = Vec::new();

    for r in resolved {
        match r {
            Resolved::Plain(field) => {
                let PlainField {
                    attrs,
                    vis,
                    name,
                    ty,
                } = field;
                fields.push(quote! { #(#attrs)* #vis #name: #ty, });
                params.push(quote! { #name: #ty });
                inits.push(quote! { #name, });
            }
            Resolved::Locked {
                descriptor,
                members,
            } => {
                let BackingField {
                    name: backing,
                    ty: backing_ty,
                    initializer,
                    attrs: cfgs,
                } = &members.backing_field;
                let field_doc = format!("Lock guarding `{}`.", descriptor.name);
                fields.push(quote_spanned! {descriptor.span=>
                    #(#cfgs)*
                    #[doc = #field_doc]
                    #backing: #backing_ty,
                });

                // Initializers must not see the parameters of `new`.
                if let Some(value) = initializer {
                    let init = format_ident!("__init_{}", descriptor.name);
                    methods.push(quote! {
                        #(#cfgs)*
                        #[inline]
                        fn #init() -> #backing_ty {
                            #value
                        }
                    });
                    inits.push(quote! { #(#cfgs)* #backing: Self::#init(), });
                }
                for accessor in members.accessors.iter().chain(&members.fallible) {
                    match accessor {
                        Accessor::Init {
                            parameter,
                            ty,
                            value,
                        } => {
                            params.push(quote! { #(#cfgs)* #parameter: #ty });
                            inits.push(quote! { #(#cfgs)* #backing: #value, });
                        }
                        other => methods.extend(other.method().map(|m| quote!(#m))),
                    }
                }
            }
        }
    }

    let new_doc = format!("Create a new [`{name}`].");

    let default_impl = if params.is_empty() {
        quote! {
            impl #impl_generics ::core::default::Default for #name #ty_generics #where_clause {
                fn default() -> Self {
                    Self::new()
                }
            }
        }
    } else {
        quote!()
    };

    quote! {
        #(#attrs)*
        #vis struct #name #generics #where_clause {
            #(#fields)*
        }

        impl #impl_generics #name #ty_generics #where_clause {
            #[doc = #new_doc]
            #vis fn new(#(#params),*) -> Self {
                Self {
                    #(#inits)*
                }
            }

            #(#methods)*
        }

        #default_impl
    }
}
