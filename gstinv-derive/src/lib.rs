use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Lit, Meta, Type};

/// Derive macro describing the CSV columns a record deserializes from.
///
/// For each named field it records:
/// - the column name, honouring `#[serde(rename = "...")]` and a container
///   level `#[serde(rename_all = "camelCase")]`
/// - whether the column is required (not `Option<T>` and no `#[serde(default)]`
///   on the field or the container)
/// - a description taken from the field's doc comment
///
/// Generates `csv_schema() -> &'static [CsvField]` and `csv_header() -> String`.
/// `CsvField` must be in scope where the derive is used.
#[proc_macro_derive(CsvSchema, attributes(serde))]
pub fn derive_csv_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("CsvSchema only supports structs with named fields"),
        },
        _ => panic!("CsvSchema only supports structs"),
    };

    let camel_case = serde_args(&input.attrs)
        .iter()
        .any(|arg| arg.replace(' ', "") == "rename_all=\"camelCase\"");
    let container_default = has_serde_flag(&input.attrs, "default");

    let columns: Vec<_> = fields
        .iter()
        .map(|field| {
            let ident = field.ident.as_ref().unwrap().to_string();
            let column = get_serde_rename(&field.attrs).unwrap_or_else(|| {
                if camel_case {
                    to_camel_case(&ident)
                } else {
                    ident
                }
            });
            let required = !is_option_type(&field.ty)
                && !container_default
                && !has_serde_flag(&field.attrs, "default");
            let doc = get_doc_comment(&field.attrs);
            (column, required, doc)
        })
        .collect();

    let header = columns
        .iter()
        .map(|(column, _, _)| column.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let entries = columns.iter().map(|(column, required, doc)| {
        quote! {
            CsvField {
                name: #column,
                required: #required,
                description: #doc,
            }
        }
    });

    let expanded = quote! {
        impl #name {
            pub fn csv_schema() -> &'static [CsvField] {
                static SCHEMA: &[CsvField] = &[
                    #(#entries),*
                ];
                SCHEMA
            }

            pub fn csv_header() -> String {
                #header.to_string()
            }
        }
    };

    TokenStream::from(expanded)
}

/// Top-level comma separated arguments of every `#[serde(...)]` attribute.
fn serde_args(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("serde"))
        .filter_map(|attr| match &attr.meta {
            Meta::List(list) => Some(list.tokens.to_string()),
            _ => None,
        })
        .flat_map(|tokens| {
            tokens
                .split(',')
                .map(|arg| arg.trim().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

fn has_serde_flag(attrs: &[Attribute], flag: &str) -> bool {
    serde_args(attrs)
        .iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag} =")))
}

fn get_serde_rename(attrs: &[Attribute]) -> Option<String> {
    serde_args(attrs).iter().find_map(|arg| {
        let value = arg.strip_prefix("rename")?.trim_start().strip_prefix('=')?;
        let value = value.trim().strip_prefix('"')?;
        value.find('"').map(|end| value[..end].to_string())
    })
}

fn to_camel_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let mut upper = false;
    for c in ident.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn get_doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}
