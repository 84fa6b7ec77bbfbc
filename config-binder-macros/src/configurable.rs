use darling::{FromDeriveInput, FromField};
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{DeriveInput, GenericArgument, Generics, Ident, PathArguments, Type};

/// Types bound directly as leaves.
const SCALAR_TYPES: &[&str] = &[
    "bool", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
    "usize", "f32", "f64", "String",
];

/// Wrappers and collections that are never treated as nested records.
const CONTAINER_TYPES: &[&str] = &[
    "Option", "Box", "Rc", "Arc", "Cell", "RefCell", "Vec", "VecDeque", "HashMap", "BTreeMap",
    "HashSet", "BTreeSet",
];

/// Standard library value types that have no fields of their own. Left alone
/// when unannotated instead of being walked as records.
const OPAQUE_TYPES: &[&str] = &[
    "char", "str", "Duration", "Instant", "SystemTime", "PathBuf", "Path", "OsString", "OsStr",
    "IpAddr", "Ipv4Addr", "Ipv6Addr", "SocketAddr", "SocketAddrV4", "SocketAddrV6",
    "PhantomData", "NonZeroU8", "NonZeroU16", "NonZeroU32", "NonZeroU64", "NonZeroUsize",
    "NonZeroI8", "NonZeroI16", "NonZeroI32", "NonZeroI64", "NonZeroIsize",
];

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(config), supports(struct_named))]
struct ConfigurableOpts {
    ident: Ident,
    generics: Generics,
    data: darling::ast::Data<(), FieldOpts>,
}

#[derive(Debug, FromField)]
#[darling(attributes(config))]
struct FieldOpts {
    ident: Option<Ident>,
    ty: Type,

    /// Lookup key passed to the provider
    #[darling(default)]
    key: Option<String>,

    /// Raw value used when the lookup fails
    #[darling(default)]
    default: Option<String>,

    /// Mask the value in log output
    #[darling(default)]
    secret: bool,

    /// Exclude this field entirely
    #[darling(default)]
    skip: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldShape {
    /// A known scalar or a `Vec` of one.
    Leaf,
    /// Any other named type, which is either a nested record or an alias.
    Named,
    /// A `Vec` whose element is an unrecognised named type.
    NamedSequence,
    Unsupported,
}

pub fn generate_impl(input: &DeriveInput) -> TokenStream2 {
    match ConfigurableOpts::from_derive_input(input) {
        Ok(opts) => generate_from_opts(opts).unwrap_or_else(|e| e.write_errors()),
        Err(e) => e.write_errors(),
    }
}

fn generate_from_opts(opts: ConfigurableOpts) -> darling::Result<TokenStream2> {
    let struct_name = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let fields = opts
        .data
        .take_struct()
        .ok_or_else(|| darling::Error::unsupported_shape("enum"))?
        .fields;

    let mut errors = darling::Error::accumulator();
    let bindings: Vec<TokenStream2> = fields
        .iter()
        .filter(|field| !field.skip)
        .filter_map(|field| errors.handle(generate_binding(field)).flatten())
        .collect();
    errors.finish()?;

    Ok(quote! {
        impl #impl_generics ::config_binder::Configurable for #struct_name #ty_generics #where_clause {
            fn bindings(&mut self) -> ::std::vec::Vec<::config_binder::Binding<'_>> {
                ::std::vec![#(#bindings),*]
            }
        }
    })
}

/// Binding expression for one field, or `None` if the field is ignored.
///
/// A field with a `key` is always bound as a leaf unless its type can never
/// hold a scalar; whether the type implements `Slot` is left to the compiler,
/// so scalar aliases work. Without a key, unrecognised named types are walked
/// as nested records.
fn generate_binding(field: &FieldOpts) -> darling::Result<Option<TokenStream2>> {
    let Some(ident) = &field.ident else {
        return Ok(None);
    };
    let name = ident.unraw().to_string();
    let shape = classify(&field.ty);

    if field.key.is_none() && (field.default.is_some() || field.secret) {
        let message = if shape == FieldShape::Named {
            format!(
                "nested record `{name}` cannot declare `default` or `secret`; \
                 annotate the fields of its type instead"
            )
        } else {
            format!("field `{name}` declares `default` or `secret` without `key`")
        };
        return Err(darling::Error::custom(message).with_span(ident));
    }

    match (shape, field.key.is_some()) {
        (FieldShape::Unsupported, true) => {
            let type_name = field.ty.to_token_stream().to_string().replace(' ', "");
            Err(darling::Error::custom(format!(
                "could not bind field `{name}` of type `{type_name}`; supported types are \
                 bool, integers, f32, f64, String, Vec of those, and nested records"
            ))
            .with_span(&field.ty))
        }
        (FieldShape::Leaf, _) | (FieldShape::Named | FieldShape::NamedSequence, true) => {
            let key = optional_str(field.key.as_deref());
            let default = optional_str(field.default.as_deref());
            let secret = field.secret;
            Ok(Some(quote! {
                ::config_binder::Binding::leaf(
                    ::config_binder::FieldSpec {
                        name: #name,
                        key: #key,
                        default: #default,
                        secret: #secret,
                    },
                    &mut self.#ident,
                )
            }))
        }
        (FieldShape::Named, false) => Ok(Some(quote! {
            ::config_binder::Binding::record(#name, &mut self.#ident)
        })),
        (FieldShape::NamedSequence | FieldShape::Unsupported, false) => Ok(None),
    }
}

fn optional_str(value: Option<&str>) -> TokenStream2 {
    match value {
        Some(value) => quote! { ::core::option::Option::Some(#value) },
        None => quote! { ::core::option::Option::None },
    }
}

fn classify(ty: &Type) -> FieldShape {
    match ty {
        Type::Group(group) => classify(&group.elem),
        Type::Paren(paren) => classify(&paren.elem),
        Type::Path(type_path) if type_path.qself.is_none() => {
            let Some(segment) = type_path.path.segments.last() else {
                return FieldShape::Unsupported;
            };
            let ident = segment.ident.to_string();

            if SCALAR_TYPES.contains(&ident.as_str()) {
                return FieldShape::Leaf;
            }
            if ident == "Vec" {
                return match first_type_argument(&segment.arguments) {
                    Some(element) if is_scalar(element) => FieldShape::Leaf,
                    Some(element) if classify(element) == FieldShape::Named => {
                        FieldShape::NamedSequence
                    }
                    _ => FieldShape::Unsupported,
                };
            }
            if CONTAINER_TYPES.contains(&ident.as_str()) || OPAQUE_TYPES.contains(&ident.as_str())
            {
                return FieldShape::Unsupported;
            }
            FieldShape::Named
        }
        _ => FieldShape::Unsupported,
    }
}

fn is_scalar(ty: &Type) -> bool {
    match ty {
        Type::Group(group) => is_scalar(&group.elem),
        Type::Paren(paren) => is_scalar(&paren.elem),
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .map(|segment| SCALAR_TYPES.contains(&segment.ident.to_string().as_str()))
            .unwrap_or(false),
        _ => false,
    }
}

fn first_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}
