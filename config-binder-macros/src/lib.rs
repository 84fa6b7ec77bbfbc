//! Derive macro for `config-binder` configuration records.
//!
//! `#[derive(Configurable)]` lists the fields of a struct as bindings the
//! loader walks in declaration order:
//! - **Keyed fields** (`#[config(key = ...)]`) are bound as leaves; the
//!   field type must implement `config_binder::Slot`, so aliases of
//!   primitives work as well as `bool`, integers, `f32`, `f64`, `String`
//!   and `Vec` of those
//! - **Nested types** (any other unannotated struct path) are loaded
//!   recursively and must implement `Configurable` themselves
//! - **Containers** (`Option`, `Box`, maps, sets, `Vec` of non-primitives),
//!   std value types (`char`, `Duration`, `PathBuf`, `IpAddr`, ...), tuples,
//!   arrays and references are ignored unless annotated, in which case they
//!   are a compile error
//!
//! An unannotated field of some other non-record type (a type alias, or a
//! third-party value type) is treated as nested; mark it `#[config(skip)]`.

mod configurable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro implementing `config_binder::Configurable`.
///
/// # Field Attributes
/// - `#[config(key = "DB_HOST")]` - Lookup key for the field
/// - `#[config(default = "localhost")]` - Raw value used when the lookup fails (requires `key`)
/// - `#[config(secret)]` - Mask the value in log output
/// - `#[config(skip)]` - Exclude this field entirely
///
/// # Example
/// ```ignore
/// #[derive(Default, Configurable)]
/// pub struct ServerConfig {
///     #[config(key = "SERVER_PORT", default = "8080")]
///     pub port: u16,
///     #[config(key = "SERVER_API_TOKEN", secret)]
///     pub api_token: String,
///     pub database: DatabaseConfig, // nested, loaded recursively
///     #[config(skip)]
///     pub started_at: Option<std::time::Instant>,
/// }
/// ```
#[proc_macro_derive(Configurable, attributes(config))]
pub fn derive_configurable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    configurable::generate_impl(&input).into()
}
