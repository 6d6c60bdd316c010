use crate::attrs::{self, ConstraintSpec};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, GenericParam, parse_macro_input, parse_quote};

pub fn validate_derive_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Validate can only be derived for structs\n\
             hint: derive Reflect for enums",
        ));
    };

    let mut fields = Vec::new();
    for (index, field) in data.fields.iter().enumerate() {
        let options = attrs::parse_field(field)?;
        if options.skip {
            continue;
        }

        let (member, label) = match &field.ident {
            Some(ident) => (quote!(#ident), ident.unraw().to_string()),
            None => {
                let index = syn::Index::from(index);
                (quote!(#index), index.index.to_string())
            }
        };
        let constraints = options.constraints.iter().map(ConstraintSpec::to_tokens);

        fields.push(quote! {
            .field(
                veritas::FieldDescriptor::new(#label, |target| {
                    target
                        .downcast_ref::<Self>()
                        .map(|this| veritas::Reflect::reflect(&this.#member))
                }),
                ::std::vec![#(#constraints),*],
            )
        });
    }

    // Metadata is keyed by TypeId, so every type parameter must be 'static
    for param in input.generics.params.iter_mut() {
        if let GenericParam::Type(param) = param {
            param.bounds.push(parse_quote!('static));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics veritas::Validatable for #name #ty_generics #where_clause {
            fn describe() -> veritas::TypeMetadata {
                veritas::TypeMetadata::of::<Self>()
                    #(#fields)*
            }
        }

        impl #impl_generics veritas::Reflect for #name #ty_generics #where_clause {
            fn reflect(&self) -> veritas::Value<'_> {
                veritas::Value::Object(self)
            }
        }
    })
}
