//! Annotation-driven configuration binding.
//!
//! This crate populates configuration structs from a key/value [`Provider`]
//! (environment variables, dotenv files, in-memory maps, or several of them
//! layered). Each field declares the key it is looked up under and,
//! optionally, a default used when the provider has no value.
//!
//! - **Declarative**: `#[derive(Configurable)]` with `#[config(...)]` field attributes
//! - **Nested records**: any struct field that is itself `Configurable` is loaded recursively
//! - **Typed**: strings, booleans, every integer width, `f32`/`f64` and `Vec`s of those
//! - **Strict or lenient**: missing values without a default either fail the load or are skipped
//! - **Structured errors**: failures carry the path of the offending field
//!
//! # Field Attributes
//!
//! - `#[config(key = "PORT")]` - lookup key; fields without one are never touched
//! - `#[config(default = "8080")]` - raw value used when the lookup fails
//! - `#[config(secret)]` - mask the value in log output
//! - `#[config(skip)]` - exclude the field entirely
//!
//! Sequence fields (`Vec<T>`) read a comma separated list. An empty string
//! produces an empty `Vec`.
//!
//! # Example
//!
//! ```rust
//! use config_binder::{load, Configurable, MapProvider};
//!
//! #[derive(Debug, Default, Configurable)]
//! struct DatabaseConfig {
//!     #[config(key = "DB_URL")]
//!     url: String,
//!     #[config(key = "DB_POOL_SIZE", default = "10")]
//!     pool_size: u32,
//! }
//!
//! #[derive(Debug, Default, Configurable)]
//! struct AppConfig {
//!     #[config(key = "APP_DEBUG", default = "false")]
//!     debug: bool,
//!     #[config(key = "APP_FEATURES", default = "")]
//!     features: Vec<String>,
//!     database: DatabaseConfig,
//! }
//!
//! let provider = MapProvider::new([
//!     ("DB_URL", "postgres://localhost/app"),
//!     ("APP_FEATURES", "audit,export"),
//! ]);
//!
//! let mut config = AppConfig::default();
//! load(&mut config, &provider, true).unwrap();
//!
//! assert_eq!(config.database.url, "postgres://localhost/app");
//! assert_eq!(config.database.pool_size, 10);
//! assert_eq!(config.features, ["audit", "export"]);
//! assert!(!config.debug);
//! ```

// Lets the derive's `::config_binder::` paths resolve inside this crate.
extern crate self as config_binder;

pub mod coercion;
pub mod error;
pub mod loader;
pub mod providers;
pub mod schema;

pub use error::{CoercionError, LoadError, LoadErrorKind, LookupError};
pub use loader::load;
pub use providers::{EnvProvider, LayeredProvider, MapProvider, Provider};
pub use schema::{
    describe, lookup_keys, Binding, Configurable, FieldDescriptor, FieldKind, FieldSpec,
    ScalarKind, Scalar, Slot, Value,
};

pub use config_binder_macros::Configurable;
