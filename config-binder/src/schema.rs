//! Field descriptors: the shape a configuration record exposes to the loader.
//!
//! A record implements [`Configurable`] by listing one [`Binding`] per field,
//! in declaration order. Leaf fields are bound through the [`Slot`] trait,
//! which reports the field's [`FieldKind`] and accepts a coerced [`Value`].
//! Nested records are bound as `&mut dyn Configurable` and walked recursively.

use std::fmt;

use crate::error::{CoercionError, LoadError};
use crate::providers::{EnvProvider, Provider};

/// Scalar types a leaf field (or sequence element) can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Sequence(Box<FieldKind>),
    Record,
}

impl FieldKind {
    pub fn sequence_of(element: ScalarKind) -> Self {
        Self::Sequence(Box::new(Self::Scalar(element)))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Sequence(element) => write!(f, "sequence of {element}"),
            Self::Record => f.write_str("record"),
        }
    }
}

/// A coerced value, ready to be assigned to a [`Slot`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    Sequence(Vec<Value>),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => ScalarKind::String.name(),
            Self::Bool(_) => ScalarKind::Bool.name(),
            Self::I8(_) => ScalarKind::I8.name(),
            Self::I16(_) => ScalarKind::I16.name(),
            Self::I32(_) => ScalarKind::I32.name(),
            Self::I64(_) => ScalarKind::I64.name(),
            Self::I128(_) => ScalarKind::I128.name(),
            Self::Isize(_) => ScalarKind::Isize.name(),
            Self::U8(_) => ScalarKind::U8.name(),
            Self::U16(_) => ScalarKind::U16.name(),
            Self::U32(_) => ScalarKind::U32.name(),
            Self::U64(_) => ScalarKind::U64.name(),
            Self::U128(_) => ScalarKind::U128.name(),
            Self::Usize(_) => ScalarKind::Usize.name(),
            Self::F32(_) => ScalarKind::F32.name(),
            Self::F64(_) => ScalarKind::F64.name(),
            Self::Sequence(_) => "sequence",
        }
    }
}

/// Rust types that map one-to-one onto a [`ScalarKind`].
pub trait Scalar: Sized {
    const KIND: ScalarKind;

    fn from_value(value: Value) -> Option<Self>;
}

/// A leaf field the loader can write into.
pub trait Slot {
    fn kind(&self) -> FieldKind;

    fn assign(&mut self, value: Value) -> Result<(), CoercionError>;
}

macro_rules! scalars {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::$variant;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl Slot for $ty {
                fn kind(&self) -> FieldKind {
                    FieldKind::Scalar(<$ty as Scalar>::KIND)
                }

                fn assign(&mut self, value: Value) -> Result<(), CoercionError> {
                    let found = value.kind_name();
                    *self = <$ty as Scalar>::from_value(value).ok_or_else(|| {
                        CoercionError::KindMismatch {
                            expected: <$ty as Scalar>::KIND.to_string(),
                            found,
                        }
                    })?;
                    Ok(())
                }
            }
        )*
    };
}

scalars! {
    String => String,
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl<T: Scalar> Slot for Vec<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::sequence_of(T::KIND)
    }

    fn assign(&mut self, value: Value) -> Result<(), CoercionError> {
        let items = match value {
            Value::Sequence(items) => items,
            other => {
                return Err(CoercionError::KindMismatch {
                    expected: self.kind().to_string(),
                    found: other.kind_name(),
                });
            }
        };

        let mut elements = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let found = item.kind_name();
            let element = T::from_value(item).ok_or_else(|| CoercionError::Element {
                index,
                source: Box::new(CoercionError::KindMismatch {
                    expected: T::KIND.to_string(),
                    found,
                }),
            })?;
            elements.push(element);
        }

        *self = elements;
        Ok(())
    }
}

/// Static annotations of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub key: Option<&'static str>,
    pub default: Option<&'static str>,
    pub secret: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            key: None,
            default: None,
            secret: false,
        }
    }

    pub const fn key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    pub const fn default_value(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

/// One field of a record, borrowed mutably for the duration of a load.
pub enum Binding<'a> {
    Leaf {
        spec: FieldSpec,
        slot: &'a mut dyn Slot,
    },
    Record {
        name: &'static str,
        record: &'a mut dyn Configurable,
    },
}

impl<'a> Binding<'a> {
    pub fn leaf(spec: FieldSpec, slot: &'a mut dyn Slot) -> Self {
        Self::Leaf { spec, slot }
    }

    pub fn record(name: &'static str, record: &'a mut dyn Configurable) -> Self {
        Self::Record { name, record }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Leaf { spec, .. } => spec.name,
            Self::Record { name, .. } => *name,
        }
    }
}

/// A configuration record the loader can populate.
///
/// Usually derived with `#[derive(Configurable)]`:
///
/// ```rust
/// use config_binder::{Configurable, MapProvider};
///
/// #[derive(Debug, Default, Configurable)]
/// struct HttpConfig {
///     #[config(key = "HTTP_PORT", default = "8080")]
///     port: u16,
///     #[config(key = "HTTP_ALLOWED_ORIGINS", default = "")]
///     allowed_origins: Vec<String>,
/// }
///
/// let provider = MapProvider::new([("HTTP_PORT", "3000")]);
/// let config = HttpConfig::from_provider(&provider, true).unwrap();
/// assert_eq!(config.port, 3000);
/// assert!(config.allowed_origins.is_empty());
/// ```
pub trait Configurable {
    /// Fields of this record in declaration order.
    fn bindings(&mut self) -> Vec<Binding<'_>>;

    fn load_from<P>(&mut self, provider: &P, strict: bool) -> Result<(), LoadError>
    where
        Self: Sized,
        P: Provider + ?Sized,
    {
        crate::loader::load(self, provider, strict)
    }

    fn from_provider<P>(provider: &P, strict: bool) -> Result<Self, LoadError>
    where
        Self: Default + Sized,
        P: Provider + ?Sized,
    {
        let mut config = Self::default();
        config.load_from(provider, strict)?;
        Ok(config)
    }

    fn from_env(strict: bool) -> Result<Self, LoadError>
    where
        Self: Default + Sized,
    {
        Self::from_provider(&EnvProvider, strict)
    }
}

/// Flattened description of a leaf field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Dotted path from the root record, e.g. `database.port`.
    pub path: String,
    pub kind: FieldKind,
    pub key: Option<&'static str>,
    pub default: Option<&'static str>,
    pub secret: bool,
}

/// Lists every leaf field of `config`, nested records included, in declaration order.
pub fn describe<C: Configurable + ?Sized>(config: &mut C) -> Vec<FieldDescriptor> {
    let mut descriptors = Vec::new();
    collect(config, "", &mut descriptors);
    descriptors
}

/// Every lookup key declared by `config` and its nested records.
pub fn lookup_keys<C: Configurable + ?Sized>(config: &mut C) -> Vec<&'static str> {
    describe(config)
        .into_iter()
        .filter_map(|descriptor| descriptor.key)
        .collect()
}

fn collect<C: Configurable + ?Sized>(
    config: &mut C,
    prefix: &str,
    descriptors: &mut Vec<FieldDescriptor>,
) {
    for binding in config.bindings() {
        let path = if prefix.is_empty() {
            binding.name().to_string()
        } else {
            format!("{prefix}.{}", binding.name())
        };

        match binding {
            Binding::Leaf { spec, slot } => descriptors.push(FieldDescriptor {
                path,
                kind: slot.kind(),
                key: spec.key,
                default: spec.default,
                secret: spec.secret,
            }),
            Binding::Record { record, .. } => collect(record, &path, descriptors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Configurable;

    #[derive(Default, Configurable)]
    struct Database {
        #[config(key = "DB_HOST", default = "localhost")]
        host: String,
        #[config(key = "DB_PASSWORD", secret)]
        password: String,
    }

    #[derive(Default, Configurable)]
    struct Service {
        #[config(key = "SERVICE_NAME")]
        name: String,
        database: Database,
        #[config(key = "SERVICE_PORTS", default = "")]
        ports: Vec<u16>,
        retries: u8,
    }

    #[test]
    fn test_describe_flattens_nested_records() {
        let mut service = Service::default();
        let descriptors = describe(&mut service);

        let paths: Vec<&str> = descriptors.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            ["name", "database.host", "database.password", "ports", "retries"]
        );

        assert_eq!(descriptors[1].default, Some("localhost"));
        assert!(descriptors[2].secret);
        assert_eq!(descriptors[3].kind, FieldKind::sequence_of(ScalarKind::U16));
        assert_eq!(descriptors[4].key, None);
    }

    #[test]
    fn test_lookup_keys_skips_unannotated_fields() {
        let mut service = Service::default();

        assert_eq!(
            lookup_keys(&mut service),
            ["SERVICE_NAME", "DB_HOST", "DB_PASSWORD", "SERVICE_PORTS"]
        );
    }

    #[test]
    fn test_scalar_slot_rejects_mismatched_value() {
        let mut port: u16 = 80;
        let error = port.assign(Value::String("80".to_string())).unwrap_err();

        assert_eq!(
            error,
            CoercionError::KindMismatch {
                expected: "u16".to_string(),
                found: "string",
            }
        );
        assert_eq!(port, 80);
    }

    #[test]
    fn test_sequence_slot_is_replaced_whole() {
        let mut hosts = vec!["old".to_string()];
        hosts
            .assign(Value::Sequence(vec![
                Value::String("a".to_string()),
                Value::String("b".to_string()),
            ]))
            .unwrap();

        assert_eq!(hosts, ["a", "b"]);
    }

    #[test]
    fn test_field_kind_display() {
        assert_eq!(FieldKind::Scalar(ScalarKind::F32).to_string(), "f32");
        assert_eq!(
            FieldKind::sequence_of(ScalarKind::Bool).to_string(),
            "sequence of bool"
        );
        assert_eq!(FieldKind::Record.to_string(), "record");
    }
}
