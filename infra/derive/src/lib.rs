#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the MCQ Platform crates: error enums, API models and
//! handlers, feature slices and the runtime entry point.
//!
//! The examples below are `ignore`d because they only compile inside consuming crates.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the tuned Tokio runtime.
///
/// Turns an `async fn main` into a plain `fn main` that builds the runtime from one of the
/// profiles exposed by `mcq_runtime::RuntimeConfig`.
///
/// # Arguments
///
/// * `server` - Multi-threaded runtime sized for the HTTP server.
/// * `current_thread` - Single-threaded runtime for tools and tests.
/// * `default` - Multi-threaded runtime with automatic worker detection.
///
/// # Examples
///
/// ```rust,ignore
/// #[mcq_runtime::main(server)]
/// async fn main() -> anyhow::Result<()> {
/// # Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro to define an API data model (request or response body).
///
/// # Injected Behaviors
///
/// * **Derives**: adds `Debug`, `Serialize`, `Deserialize` and `utoipa::ToSchema` when missing.
/// * **Strict bodies**: `#[serde(deny_unknown_fields)]` unless called with
///   `deny_unknown_fields = false`, which form and query models use.
///
/// # Example
///
/// ```rust,ignore
/// use mcq_derive::api_model;
///
/// #[api_model(deny_unknown_fields = false)]
/// pub struct LoginForm {
///     pub username: String,
///     pub password: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Accepts the usual `utoipa::path` arguments (`get`, `post`, `path = "..."`,
/// `responses(...)`, `tag = "..."`) and silences `clippy::unused_async` for handlers that
/// never await.
///
/// # Example
///
/// ```rust,ignore
/// use mcq_derive::api_handler;
///
/// #[api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = "System"
/// )]
/// pub async fn health_handler() -> Json<HealthResponse> {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for domain error enums.
///
/// # Features
///
/// * **Automatic Derives**: injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to `Result<T, SourceError>` for each wrapped source.
/// * **Standard Conversions**: `From<SourceError>` for variants with a `source` field,
///   `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * **HTTP Status**: each variant may carry `#[status(404)]`; the generated
///   `const fn status(&self) -> u16` returns it, or 500 when absent.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. Variants wrapping a source must also declare `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use mcq_derive::mcq_error;
/// use std::borrow::Cow;
///
/// #[mcq_error]
/// pub enum QuestionError {
///     #[status(404)]
///     #[error("Question not found")]
///     NotFound { id: i32 },
///
///     #[error("Database error{}: {source}", format_context(.context))]
///     Database {
///         #[source]
///         source: sea_orm::DbErr,
///         context: Option<Cow<'static, str>>,
///     },
/// }
/// ```
#[proc_macro_attribute]
pub fn mcq_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature slice handle.
///
/// Generates an `Arc`-backed wrapper around `<Name>Inner`, a transparent `Deref` and an
/// implementation of `mcq_kernel::domain::registry::FeatureSlice`. An optional string
/// argument overrides the slice name used in logs.
///
/// # Example
/// ```rust,ignore
/// #[mcq_derive::mcq_slice("questions")]
/// pub struct QuestionsSlice {
///     pub service: QuestionService,
/// }
///
/// let slice = QuestionsSlice::new(QuestionsSliceInner { service });
/// ```
#[proc_macro_attribute]
pub fn mcq_slice(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(attr.into(), input).into()
}
