use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta};

/// Derive macro for model parameter structs whose fields are all `f64`.
///
/// Adds to the struct:
/// - `NAMES`: parameter names in field order
/// - `COUNT`: number of parameters
/// - `from_slice(&[f64]) -> Result<Self, String>`
/// - `to_array(&self) -> [f64; COUNT]`
///
/// The name of a parameter defaults to its field name. Use
/// `#[parameter(name = "SK")]` on a field to override it.
#[proc_macro_derive(ParameterSet, attributes(parameter))]
pub fn derive_parameter_set(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "ParameterSet can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "ParameterSet can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let mut names = Vec::new();
    let mut idents = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        if !is_f64_type(&field.ty) {
            return syn::Error::new_spanned(&field.ty, "ParameterSet derive: all fields must be f64")
                .to_compile_error()
                .into();
        }
        let label = match renamed(field) {
            Ok(Some(label)) => label,
            Ok(None) => ident.to_string(),
            Err(err) => return err.to_compile_error().into(),
        };
        names.push(label);
        idents.push(ident);
    }

    let count = idents.len();
    let indices = 0..count;

    let expanded = quote! {
        impl #name {
            /// Parameter names in canonical order.
            pub const NAMES: &'static [&'static str] = &[#(#names),*];

            /// Number of parameters.
            pub const COUNT: usize = #count;

            /// Build from a slice holding one value per parameter, in `NAMES` order.
            pub fn from_slice(values: &[f64]) -> ::core::result::Result<Self, ::std::string::String> {
                if values.len() != #count {
                    return ::core::result::Result::Err(::std::format!(
                        "expected {} parameters, got {}",
                        #count,
                        values.len()
                    ));
                }
                ::core::result::Result::Ok(Self {
                    #(#idents: values[#indices],)*
                })
            }

            /// Values in `NAMES` order.
            pub fn to_array(&self) -> [f64; #count] {
                [#(self.#idents),*]
            }
        }
    };

    expanded.into()
}

/// Value of `#[parameter(name = "...")]` on a field, if present.
fn renamed(field: &syn::Field) -> syn::Result<Option<String>> {
    for attr in &field.attrs {
        if !attr.path().is_ident("parameter") {
            continue;
        }
        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;
        for meta in nested {
            match meta {
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    if let syn::Expr::Lit(expr_lit) = &nv.value {
                        if let Lit::Str(lit_str) = &expr_lit.lit {
                            return Ok(Some(lit_str.value()));
                        }
                    }
                    return Err(syn::Error::new_spanned(nv.value, "expected a string literal"));
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "unknown parameter attribute, expected `name = \"...\"`",
                    ));
                }
            }
        }
    }
    Ok(None)
}

fn is_f64_type(ty: &syn::Type) -> bool {
    if let syn::Type::Path(type_path) = ty {
        type_path.path.is_ident("f64")
    } else {
        false
    }
}
