use proc_macro::TokenStream;
use quote::quote;
use quote::quote_spanned;
use syn::spanned::Spanned;

/// Turns `fn name(app: &Application) { ... }` into a `#[test]` that builds an
/// application from the configuration function and runs the body through
/// `playtest::run_scenario`.
#[proc_macro_attribute]
pub fn playtest_scenario(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    let attributes = &input.attrs;
    let name = &input.sig.ident;
    let block = &input.block;

    if args.len() != 1 {
        return quote! {
            compile_error!("A configuration function should be passed to the macro");
        }
        .into();
    }

    let configuration_function;
    if let syn::NestedMeta::Meta(syn::Meta::Path(function_path)) = &args[0] {
        configuration_function = function_path;
    } else {
        let error = quote! {
            compile_error!("The argument should be a configuration function!");
        };

        return error.into();
    }

    let (argument_pattern, argument_type) = match validate_signature(&input.sig) {
        Ok(argument) => argument,
        Err(stream) => return stream.into(),
    };

    let body = match &input.sig.output {
        syn::ReturnType::Default => quote! {
            {
                #block
                Ok(())
            }
        },
        syn::ReturnType::Type(_, _) => quote! { #block },
    };

    let output = quote! {
        #(#attributes)*
        #[test]
        fn #name() {
            let mut __playtest_configuration = playtest::PlaytestConfiguration::new();
            #configuration_function(&mut __playtest_configuration);

            let __playtest_result = playtest::run_scenario(
                __playtest_configuration,
                |#argument_pattern: #argument_type| -> ::std::result::Result<(), playtest::Error> #body,
            );

            if let Err(e) = __playtest_result {
                panic!("Playtest Error: {}", e);
            }
        }
    };

    TokenStream::from(output)
}

fn validate_signature(
    signature: &syn::Signature,
) -> Result<(&syn::Pat, &syn::Type), proc_macro2::TokenStream> {
    if let Some(asyncness) = &signature.asyncness {
        return Err(quote_spanned! {asyncness.span()=>
            compile_error!("Scenarios can't be async!");
        });
    }

    if signature.inputs.len() != 1 {
        return Err(quote_spanned! {signature.inputs.span()=>
            compile_error!("A scenario takes exactly one argument: the application!");
        });
    }

    match &signature.inputs[0] {
        syn::FnArg::Typed(pattern_type) => Ok((&*pattern_type.pat, &*pattern_type.ty)),
        syn::FnArg::Receiver(receiver) => Err(quote_spanned! {receiver.span()=>
            compile_error!("Scenarios can't take self!");
        }),
    }
}
