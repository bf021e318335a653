use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn, LitStr};

const USAGE: &str = "rxcombine_macro::test only accepts: #[rxcombine_macro::test] or \
                     #[rxcombine_macro::test(current_thread)]";

/// Marks a test that runs natively and under `wasm-bindgen-test`.
///
/// Sync functions become plain `#[test]`s. Async functions run on a
/// current-thread tokio runtime, which is the only flavor that fits the
/// `Rc`-based publishers of this crate.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);

  let is_async = input.sig.asyncness.is_some();

  let raw_args = proc_macro2::TokenStream::from(attr);
  if !raw_args.is_empty() {
    if !is_async {
      return TokenStream::from(
        syn::Error::new(
          raw_args.span(),
          "rxcombine_macro::test flavor args are only supported for async tests. Use \
           #[rxcombine_macro::test] for sync tests, or make the function async.",
        )
        .to_compile_error(),
      );
    }

    let flavor = if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
      Some((ident.to_string(), ident.span()))
    } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
      Some((lit.value(), lit.span()))
    } else {
      None
    };

    match flavor {
      Some((name, _)) if name == "current_thread" => {}
      Some((_, span)) => {
        return TokenStream::from(syn::Error::new(span, USAGE).to_compile_error());
      }
      None => {
        return TokenStream::from(syn::Error::new(raw_args.span(), USAGE).to_compile_error());
      }
    }
  }

  let wasm_attr = quote!(wasm_bindgen_test::wasm_bindgen_test);

  let native_attr = if is_async {
    quote!(tokio::test(flavor = "current_thread"))
  } else {
    quote!(test)
  };

  let expanded = quote! {
      #[cfg_attr(target_arch = "wasm32", #wasm_attr)]
      #[cfg_attr(not(target_arch = "wasm32"), #native_attr)]
      #input
  };

  TokenStream::from(expanded)
}
