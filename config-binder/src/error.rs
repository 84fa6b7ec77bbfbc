use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::schema::ScalarKind;

/// Failure reported by a [`Provider`](crate::Provider) lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("key `{key}` not found")]
    NotFound { key: String },

    #[error("value for key `{key}` is not valid unicode")]
    NotUnicode { key: String },

    #[error("provider failed to resolve key `{key}`: {source}")]
    Provider {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

impl LookupError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure converting a raw string into a field's declared type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("`{value}` is not a valid boolean")]
    InvalidBool { value: String },

    #[error("`{value}` is not a valid {kind}: {source}")]
    InvalidInteger {
        value: String,
        kind: ScalarKind,
        #[source]
        source: ParseIntError,
    },

    #[error("`{value}` is not a valid {kind}: {source}")]
    InvalidFloat {
        value: String,
        kind: ScalarKind,
        #[source]
        source: ParseFloatError,
    },

    #[error("unable to set index {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<CoercionError>,
    },

    #[error("could not set value for {type_name} type")]
    UnsupportedType { type_name: String },

    #[error("field of type {expected} cannot hold a {found} value")]
    KindMismatch {
        expected: String,
        found: &'static str,
    },
}

/// Cause of a [`LoadError`].
#[derive(Error, Debug)]
pub enum LoadErrorKind {
    #[error("no value for key `{key}`: {source}")]
    Missing {
        key: String,
        #[source]
        source: LookupError,
    },

    #[error("invalid value for key `{key}`: {source}")]
    Invalid {
        key: String,
        #[source]
        source: CoercionError,
    },
}

/// Error returned by [`load`](crate::load).
///
/// `path` lists the field names from the root record down to the field that
/// failed, so a failure in `AppConfig::database::port` carries
/// `["database", "port"]`.
#[derive(Error, Debug)]
#[error("unable to load `{}`: {kind}", .path.join("."))]
pub struct LoadError {
    path: Vec<&'static str>,
    #[source]
    kind: LoadErrorKind,
}

impl LoadError {
    pub fn new(field: &'static str, kind: LoadErrorKind) -> Self {
        Self {
            path: vec![field],
            kind,
        }
    }

    /// Prefixes the path with the name of the enclosing record field.
    pub fn within(mut self, field: &'static str) -> Self {
        self.path.insert(0, field);
        self
    }

    pub fn path(&self) -> &[&'static str] {
        &self.path
    }

    /// Name of the leaf field that failed.
    pub fn field(&self) -> &'static str {
        self.path.last().copied().unwrap_or_default()
    }

    pub fn kind(&self) -> &LoadErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> LoadErrorKind {
        self.kind
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.kind, LoadErrorKind::Missing { .. })
    }

    /// The coercion failure behind this error, if any.
    pub fn coercion(&self) -> Option<&CoercionError> {
        match &self.kind {
            LoadErrorKind::Invalid { source, .. } => Some(source),
            LoadErrorKind::Missing { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
