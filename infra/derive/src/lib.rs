#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the launcher crates.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! fritz-derive = { path = "../infra/derive" }
//! thiserror = "2"
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns a plain enum into a launcher error type.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug` and `thiserror::Error` unless already derived.
/// * **Context**: a companion `<Name>Ext` trait adding `.context(...)` to
///   `Result<T, Name>` and to `Result<T, Source>` for every wrapped source type.
/// * **Conversions**: `From<Source>` for each variant holding a `source` field
///   (or a field tagged `#[source]`/`#[from]`), so `?` works on upstream errors.
/// * **Internal fallback**: `From<&'static str>` and `From<String>` when the enum
///   has an `Internal { message, context }` variant.
/// * **Accessor**: `Name::context_str()` returning the attached context, if any.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. A variant wrapping a source error must also carry
///    `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use fritz_derive::fritz_error;
/// use std::borrow::Cow;
///
/// #[fritz_error]
/// pub enum SplitError {
///     #[error("YAML error{}: {source}", format_context(.context))]
///     Yaml { source: serde_yaml::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn parse(raw: &str) -> Result<serde_yaml::Value, SplitError> {
///     serde_yaml::from_str(raw).context("Parsing fritz.yaml")
/// }
/// ```
#[proc_macro_attribute]
pub fn fritz_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
