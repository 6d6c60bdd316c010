use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

pub fn reflect_derive_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(
            name,
            "Reflect can only be derived for enums\n\
             hint: derive Validate for structs, which also implements Reflect",
        )
        .to_compile_error()
        .into();
    };

    let arms = data.variants.iter().map(|variant| {
        let ident = &variant.ident;
        let label = ident.to_string();
        match &variant.fields {
            Fields::Unit => quote!(Self::#ident => #label),
            Fields::Unnamed(_) => quote!(Self::#ident(..) => #label),
            Fields::Named(_) => quote!(Self::#ident { .. } => #label),
        }
    });

    let body = if data.variants.is_empty() {
        quote!(match *self {})
    } else {
        quote!(veritas::Value::Enum(match self { #(#arms,)* }))
    };

    let expanded = quote! {
        impl #impl_generics veritas::Reflect for #name #ty_generics #where_clause {
            fn reflect(&self) -> veritas::Value<'_> {
                #body
            }
        }
    };

    TokenStream::from(expanded)
}
