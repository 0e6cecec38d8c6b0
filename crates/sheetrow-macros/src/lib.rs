use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/* ────────────────────────── the derive macro ───────────────────────── */
/// Derive `sheetrow::Record` for a struct with named fields.
///
/// Labels are declared per namespace with `#[tag(xlsx = "ID", csv = "id")]`;
/// fields without a tag for a namespace use their own name.
#[proc_macro_derive(Record, attributes(tag))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

struct FieldSpec {
    ident: syn::Ident,
    name: String,
    ty: syn::Type,
    tags: Vec<(String, String)>,
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    /* -------- 1 · only structs with named fields -------- */
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "#[derive(Record)] needs a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Record)] can only be used on structs",
            ));
        }
    };

    /* -------- 2 · collect fields and their #[tag(...)] pairs -------- */
    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let mut tags = Vec::new();
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("tag")) {
            attr.parse_nested_meta(|meta| {
                let namespace = meta
                    .path
                    .get_ident()
                    .map(|i| i.unraw().to_string())
                    .ok_or_else(|| meta.error("expected `namespace = \"label\"`"))?;
                let label: LitStr = meta.value()?.parse()?;
                tags.push((namespace, label.value()));
                Ok(())
            })?;
        }
        fields.push(FieldSpec {
            name: ident.unraw().to_string(),
            ident,
            ty: field.ty.clone(),
            tags,
        });
    }

    /* -------- 3 · generated pieces -------- */
    let descriptors = fields.iter().map(|f| {
        let ty = &f.ty;
        let name = &f.name;
        let pairs = f.tags.iter().map(|(ns, label)| quote! { (#ns, #label) });
        quote! {
            ::sheetrow::FieldDescriptor::of::<#ty>(#name, &[ #(#pairs),* ])
        }
    });

    let assign_arms = fields.iter().map(|f| {
        let ident = &f.ident;
        let ty = &f.ty;
        let name = &f.name;
        quote! {
            #name => {
                <#ty as ::sheetrow::Field>::assign(&mut self.#ident, value)?;
                ::core::result::Result::Ok(true)
            }
        }
    });

    let values = fields.iter().map(|f| {
        let ident = &f.ident;
        let ty = &f.ty;
        quote! { <#ty as ::sheetrow::Field>::to_cell(&self.#ident) }
    });

    /* -------- 4 · assemble the impl -------- */
    let ident = &input.ident;
    let record_name = ident.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::sheetrow::Record for #ident #ty_generics #where_clause {
            fn descriptor() -> ::sheetrow::RecordDescriptor {
                ::sheetrow::RecordDescriptor::new(
                    #record_name,
                    ::std::vec![ #(#descriptors),* ],
                )
            }

            fn assign_field(
                &mut self,
                field: &str,
                value: ::sheetrow::Decoded,
            ) -> ::core::result::Result<bool, ::sheetrow::AssignError> {
                match field {
                    #(#assign_arms)*
                    _ => {
                        let _ = value;
                        ::core::result::Result::Ok(false)
                    }
                }
            }

            fn field_values(&self) -> ::std::vec::Vec<::sheetrow::CellValue> {
                ::std::vec![ #(#values),* ]
            }
        }
    })
}
