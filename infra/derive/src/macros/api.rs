use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, ItemFn, ItemStruct, Lit, MetaNameValue, Token};

/// Expands `#[api_model]`.
///
/// Adds whichever of `Debug`, `Serialize`, `Deserialize` and `ToSchema` the struct does not
/// derive yet, and rejects unknown fields unless called with `deny_unknown_fields = false`.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    let strict = match strict_fields(args) {
        Ok(strict) => strict,
        Err(err) => return err.to_compile_error(),
    };

    let derived = derived_traits(&input.attrs);
    let missing: Vec<TokenStream> = [
        ("Debug", quote!(Debug)),
        ("Serialize", quote!(::serde::Serialize)),
        ("Deserialize", quote!(::serde::Deserialize)),
        ("ToSchema", quote!(::utoipa::ToSchema)),
    ]
    .into_iter()
    .filter(|(name, _)| !derived.contains(*name))
    .map(|(_, path)| path)
    .collect();

    let derive_attr = if missing.is_empty() { quote! {} } else { quote! { #[derive(#(#missing),*)] } };
    let deny_attr = if strict && !serde_denies_unknown(&input.attrs) {
        quote! { #[serde(deny_unknown_fields)] }
    } else {
        quote! {}
    };

    quote! {
        #derive_attr
        #deny_attr
        #input
    }
}

/// Expands `#[api_handler]` into `utoipa::path`.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[::utoipa::path(#args)]
        #vis #sig #block
    }
}

fn strict_fields(args: TokenStream) -> syn::Result<bool> {
    let args = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse2(args)?;

    let mut strict = None;
    for arg in &args {
        if !arg.path.is_ident("deny_unknown_fields") {
            return Err(syn::Error::new_spanned(
                &arg.path,
                "Unsupported argument; expected deny_unknown_fields",
            ));
        }
        let Expr::Lit(ExprLit { lit: Lit::Bool(value), .. }) = &arg.value else {
            return Err(syn::Error::new_spanned(&arg.value, "deny_unknown_fields must be true or false"));
        };
        if strict.replace(value.value).is_some() {
            return Err(syn::Error::new_spanned(arg, "Duplicate argument"));
        }
    }

    Ok(strict.unwrap_or(true))
}

fn serde_denies_unknown(attrs: &[Attribute]) -> bool {
    let mut found = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("deny_unknown_fields") {
                found = true;
            } else if meta.input.peek(Token![=]) {
                meta.value()?.parse::<Expr>()?;
            }
            Ok(())
        });
    }
    found
}

fn derived_traits(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(last) = meta.path.segments.last() {
                traits.insert(last.ident.to_string());
            }
            Ok(())
        });
    }
    traits
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand(args: TokenStream, input: ItemStruct) -> String {
        expand_api_model(args, input).to_string()
    }

    #[test]
    fn test_request_bodies_are_strict_by_default() {
        let out = expand(quote!(), parse_quote! { pub struct TestPaperCreate { pub name: String } });
        assert!(out.contains("deny_unknown_fields"), "{out}");
        assert!(out.contains(":: utoipa :: ToSchema"), "{out}");
        assert!(out.contains(":: serde :: Deserialize"), "{out}");
    }

    #[test]
    fn test_lenient_models_accept_extra_fields() {
        let out = expand(
            quote!(deny_unknown_fields = false),
            parse_quote! { pub struct LoginForm { pub username: String } },
        );
        assert!(!out.contains("deny_unknown_fields"), "{out}");
    }

    #[test]
    fn test_existing_derives_are_not_repeated() {
        let out = expand(
            quote!(),
            parse_quote! {
                #[derive(Debug, serde::Deserialize)]
                #[serde(deny_unknown_fields)]
                pub struct AnswerSheet { pub answers: String }
            },
        );
        assert_eq!(out.matches("Debug").count(), 1, "{out}");
        assert_eq!(out.matches("Deserialize").count(), 1, "{out}");
        assert_eq!(out.matches("deny_unknown_fields").count(), 1, "{out}");
    }

    #[test]
    fn test_unknown_arguments_fail_to_compile() {
        let out = expand(quote!(rename_all = "camelCase"), parse_quote! { pub struct Body { pub a: u8 } });
        assert!(out.contains("compile_error"), "{out}");

        let out = expand(quote!(deny_unknown_fields = "no"), parse_quote! { pub struct Body { pub a: u8 } });
        assert!(out.contains("compile_error"), "{out}");
    }
}
