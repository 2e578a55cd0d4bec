use proc_macro::TokenStream;
use synchronized_syntax::{Convention, ExpandOptions};

/// Declare structs whose `#[locked]` properties are stored behind an `UnfairLock`.
///
/// See the `synchronized` crate for the full syntax.
#[proc_macro]
pub fn synchronized(input: TokenStream) -> TokenStream {
    let convention = if cfg!(feature = "implicit-checked") {
        Convention::Implicit
    } else {
        Convention::Explicit
    };

    match synchronized_syntax::expand(input.into(), ExpandOptions::new(convention)) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
