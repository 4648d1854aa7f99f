//! Service marker attributes for the wireup generator.
//!
//! These attributes carry no behavior of their own: each one checks that it
//! sits on a `struct` or `enum` declaration and passes the item through
//! unchanged. All semantic work — argument extraction, contract resolution,
//! registration emission — happens in `wireup-codegen`, which reads the
//! markers back out of the source text at build time.
//!
//! ```ignore
//! use wireup_macros::{scoped, singleton, transient};
//!
//! #[singleton]
//! pub struct ConfigStore;
//!
//! #[scoped(category = "Web")]
//! pub struct RequestContext;
//!
//! #[transient(key = "smtp", contract = Mailer)]
//! pub struct SmtpMailer;
//! ```
//!
//! Recognized arguments on every marker: `contract = Path`, `key = "name"`,
//! `category = "name"`, `try_add`, `as_self`. The base `#[service(...)]`
//! form additionally takes the lifetime as its first argument.

use proc_macro::TokenStream;
use quote::quote;

fn passthrough(marker: &str, input: TokenStream) -> TokenStream {
    let item = proc_macro2::TokenStream::from(input.clone());
    match syn::parse::<syn::Item>(input) {
        Ok(syn::Item::Struct(_) | syn::Item::Enum(_)) => item.into(),
        Ok(_) => {
            let message = format!("`#[{marker}]` only applies to structs and enums");
            let error = quote! { compile_error!(#message); };
            let mut out = proc_macro2::TokenStream::from(error);
            out.extend(item);
            out.into()
        }
        // leave unparseable items alone; the compiler reports them itself
        Err(_) => item.into(),
    }
}

/// Marks a type for singleton registration.
#[proc_macro_attribute]
pub fn singleton(_args: TokenStream, input: TokenStream) -> TokenStream {
    passthrough("singleton", input)
}

/// Marks a type for scoped registration.
#[proc_macro_attribute]
pub fn scoped(_args: TokenStream, input: TokenStream) -> TokenStream {
    passthrough("scoped", input)
}

/// Marks a type for transient registration.
#[proc_macro_attribute]
pub fn transient(_args: TokenStream, input: TokenStream) -> TokenStream {
    passthrough("transient", input)
}

/// Base marker form; the lifetime is given as the first argument
/// (`#[service(scoped)]`, `#[service(Lifetime::Scoped, "key")]`).
#[proc_macro_attribute]
pub fn service(_args: TokenStream, input: TokenStream) -> TokenStream {
    passthrough("service", input)
}
