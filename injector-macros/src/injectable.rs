//! Injectable attribute macro
//!
//! Provides the `#[injectable]` attribute macro that derives an injection
//! spec from a function's parameter names at compile time.
//!
//! Supports renaming a dependency via the `#[inject("name")]` parameter
//! attribute and taking the caller's argument via `#[positional]`.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::{parse_macro_input, FnArg, Ident, ItemFn, LitStr, Pat, ReturnType, Token};

/// Parsed arguments from the injectable attribute
struct InjectableArgs {
    name: Option<Ident>,
}

impl Parse for InjectableArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Ok(InjectableArgs { name: None });
        }

        let key: Ident = input.parse()?;
        if key != "name" {
            return Err(syn::Error::new(
                key.span(),
                format!("unknown parameter '{}', expected 'name'", key),
            ));
        }
        input.parse::<Token![=]>()?;
        let name: Ident = input.parse()?;

        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }

        Ok(InjectableArgs { name: Some(name) })
    }
}

/// How one parameter is resolved
enum ParamSource {
    Name(String),
    Positional,
}

/// Convert snake_case to PascalCase for the generated struct
fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Work out where a parameter comes from, removing our attributes from it
fn take_param_source(arg: &mut syn::PatType) -> syn::Result<ParamSource> {
    let mut source = None;
    let mut kept = Vec::with_capacity(arg.attrs.len());

    for attr in arg.attrs.drain(..) {
        if attr.path().is_ident("inject") {
            let name: LitStr = attr.parse_args()?;
            source = Some(ParamSource::Name(name.value()));
        } else if attr.path().is_ident("positional") {
            source = Some(ParamSource::Positional);
        } else {
            kept.push(attr);
        }
    }
    arg.attrs = kept;

    if let Some(source) = source {
        return Ok(source);
    }

    match &*arg.pat {
        Pat::Ident(pat_ident) => {
            let name = pat_ident.ident.to_string();
            Ok(ParamSource::Name(
                name.strip_prefix("r#").unwrap_or(&name).to_string(),
            ))
        }
        other => Err(syn::Error::new_spanned(
            other,
            "injectable parameters must be plain identifiers; use #[inject(\"name\")] for patterns",
        )),
    }
}

/// Implements the `#[injectable]` attribute macro
///
/// The function is kept as written (minus the parameter attributes) and a
/// unit struct implementing `Injectable` is generated next to it:
///
/// ```rust,ignore
/// #[injectable]
/// fn send_mail(mailer: Arc<Mailer>, #[inject("from_address")] from: Arc<String>) -> bool { .. }
///
/// // generates
/// struct SendMailInjectable;
///
/// impl ::injector::Injectable for SendMailInjectable {
///     type Output = bool;
///     fn dependencies() -> InjectionSpec { /* ["mailer", "from_address"] */ }
///     fn invoke(args: Args) -> Result<bool, InjectorError> {
///         Ok(send_mail(args.extract(0)?, args.extract(1)?))
///     }
/// }
/// ```
pub fn injectable_impl(attr: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as InjectableArgs);
    let mut item = parse_macro_input!(input as ItemFn);

    match generate(args, &mut item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate(args: InjectableArgs, item: &mut ItemFn) -> syn::Result<TokenStream2> {
    let sig = &item.sig;
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "injectable functions cannot be async",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "injectable functions cannot be generic",
        ));
    }

    let fn_name = sig.ident.clone();
    let vis = item.vis.clone();
    let output = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };
    let struct_name = args.name.unwrap_or_else(|| {
        let raw = fn_name.to_string();
        let base = raw.strip_prefix("r#").unwrap_or(&raw);
        format_ident!("{}Injectable", to_pascal_case(base))
    });

    let mut entries = Vec::new();
    let mut extractions = Vec::new();

    for (position, input) in item.sig.inputs.iter_mut().enumerate() {
        let pat_type = match input {
            FnArg::Typed(pat_type) => pat_type,
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "injectable cannot be used on methods; wrap a free function instead",
                ))
            }
        };

        match take_param_source(pat_type)? {
            ParamSource::Name(name) => {
                let name = LitStr::new(&name, Span::call_site());
                entries.push(quote! { ::injector::SpecEntry::name(#name) });
            }
            ParamSource::Positional => {
                entries.push(quote! { ::injector::SpecEntry::Positional });
            }
        }

        let ty = &pat_type.ty;
        extractions.push(quote! { args.extract::<#ty>(#position)? });
    }

    let doc = format!("Injection entry point for [`{}`]", fn_name);

    Ok(quote! {
        #item

        #[doc = #doc]
        #[derive(Debug, Clone, Copy, Default)]
        #vis struct #struct_name;

        impl ::injector::Injectable for #struct_name {
            type Output = #output;

            fn dependencies() -> ::injector::InjectionSpec {
                let entries: ::std::vec::Vec<::injector::SpecEntry> = ::std::vec![#(#entries),*];
                ::injector::InjectionSpec::from(entries)
            }

            fn invoke(
                args: ::injector::Args,
            ) -> ::std::result::Result<Self::Output, ::injector::InjectorError> {
                ::std::result::Result::Ok(#fn_name(#(#extractions),*))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("send_mail"), "SendMail");
        assert_eq!(to_pascal_case("connect"), "Connect");
        assert_eq!(to_pascal_case("_private__helper"), "PrivateHelper");
    }

    #[test]
    fn test_generate_collects_names_and_positionals() {
        let mut item: ItemFn = syn::parse_quote! {
            fn handler(db: Arc<Db>, #[positional] request: Arc<Request>, #[inject("app_config")] config: Arc<Config>) -> u16 {
                200
            }
        };

        let tokens = generate(InjectableArgs { name: None }, &mut item)
            .unwrap()
            .to_string();

        assert!(tokens.contains("struct HandlerInjectable"));
        assert!(tokens.contains("SpecEntry :: name (\"db\")"));
        assert!(tokens.contains("SpecEntry :: Positional"));
        assert!(tokens.contains("SpecEntry :: name (\"app_config\")"));
        assert!(!tokens.contains("# [positional]"));
    }

    #[test]
    fn test_generate_rejects_methods() {
        let mut item: ItemFn = syn::parse_quote! {
            fn run(&self, db: Arc<Db>) {}
        };

        assert!(generate(InjectableArgs { name: None }, &mut item).is_err());
    }

    #[test]
    fn test_generate_rejects_async() {
        let mut item: ItemFn = syn::parse_quote! {
            async fn run(db: Arc<Db>) {}
        };

        assert!(generate(InjectableArgs { name: None }, &mut item).is_err());
    }

    #[test]
    fn test_custom_struct_name() {
        let mut item: ItemFn = syn::parse_quote! {
            fn run() {}
        };
        let args: InjectableArgs = syn::parse_quote! { name = Runner };

        let tokens = generate(args, &mut item).unwrap().to_string();
        assert!(tokens.contains("struct Runner"));
    }
}
