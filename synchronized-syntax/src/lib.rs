//! Parsing and code generation behind `synchronized!`.
//!
//! The pipeline for one `#[locked]` property is:
//!
//! 1. [`lock_kind::from_attribute`] resolves the requested [`LockKind`].
//! 2. [`descriptor::parse`] validates the member's [`Declaration`] and extracts a
//!    [`FieldDescriptor`] (name, type, optional initializer).
//! 3. [`synthesize::synthesize`] produces the private backing lock and the
//!    accessors that read and write through it.
//!
//! [`expand::expand`] runs that pipeline over every member of every struct in a
//! macro invocation and assembles the result. Nothing here performs I/O or keeps
//! state between calls.

pub mod config;
pub mod declaration;
pub mod descriptor;
pub mod error;
pub mod expand;
pub mod lock_kind;
pub mod synthesize;

pub use config::{Convention, ExpandOptions};
pub use declaration::{Binding, Declaration, Member, Mutability, VariableDeclaration};
pub use descriptor::FieldDescriptor;
pub use error::{ErrorKind, TransformError};
pub use expand::expand;
pub use lock_kind::LockKind;
pub use synthesize::{Accessor, AccessorKind, BackingField, SynthesizedMembers};

/// Resolve, validate and synthesize a single property.
///
/// `attr` is the member's `#[locked]` attribute. On success the descriptor is
/// returned alongside the generated members so callers can place them.
pub fn transform(
    attr: &syn::Attribute,
    declaration: &Declaration,
    options: ExpandOptions,
) -> Result<(FieldDescriptor, SynthesizedMembers), TransformError> {
    let kind = lock_kind::from_attribute(attr, options.convention)?;
    let descriptor = descriptor::parse(declaration, kind)?;
    let members = synthesize::synthesize(&descriptor, kind);
    Ok((descriptor, members))
}
