//! Key/value sources the loader resolves lookup keys against.

use std::collections::HashMap;
use std::env::{self, VarError};
use std::path::Path;
use std::sync::Arc;

use crate::error::LookupError;

/// A source of raw configuration values.
///
/// `Ok` means the key was found; [`LookupError::NotFound`] means it was not.
/// Any other error is a failure of the source itself.
#[cfg_attr(test, mockall::automock)]
pub trait Provider {
    fn lookup(&self, key: &str) -> Result<String, LookupError>;
}

impl<P: Provider + ?Sized> Provider for &P {
    fn lookup(&self, key: &str) -> Result<String, LookupError> {
        (**self).lookup(key)
    }
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn lookup(&self, key: &str) -> Result<String, LookupError> {
        (**self).lookup(key)
    }
}

impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn lookup(&self, key: &str) -> Result<String, LookupError> {
        (**self).lookup(key)
    }
}

/// Resolves keys against the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProvider;

impl Provider for EnvProvider {
    fn lookup(&self, key: &str) -> Result<String, LookupError> {
        env::var(key).map_err(|err| match err {
            VarError::NotPresent => LookupError::not_found(key),
            VarError::NotUnicode(_) => LookupError::NotUnicode {
                key: key.to_string(),
            },
        })
    }
}

/// In-memory provider, handy for tests and for values read from files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapProvider {
    values: HashMap<String, String>,
}

impl MapProvider {
    pub fn new<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        values.into_iter().collect()
    }

    /// Reads `KEY=value` pairs from a dotenv file.
    ///
    /// The process environment is left untouched.
    pub fn from_dotenv(path: impl AsRef<Path>) -> Result<Self, dotenvy::Error> {
        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path.as_ref())? {
            let (key, value) = item?;
            values.insert(key, value);
        }
        tracing::debug!(
            path = %path.as_ref().display(),
            entries = values.len(),
            "Loaded dotenv file"
        );
        Ok(Self { values })
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapProvider {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl Provider for MapProvider {
    fn lookup(&self, key: &str) -> Result<String, LookupError> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::not_found(key))
    }
}

/// Consults a list of providers in order; the first one that finds the key wins.
///
/// A layer reporting [`LookupError::NotFound`] falls through to the next one;
/// any other error stops the lookup.
#[derive(Default)]
pub struct LayeredProvider {
    layers: Vec<Box<dyn Provider + Send + Sync>>,
}

impl LayeredProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, provider: impl Provider + Send + Sync + 'static) -> Self {
        self.layers.push(Box::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl std::fmt::Debug for LayeredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredProvider")
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl Provider for LayeredProvider {
    fn lookup(&self, key: &str) -> Result<String, LookupError> {
        for layer in &self.layers {
            match layer.lookup(key) {
                Err(err) if err.is_not_found() => continue,
                result => return result,
            }
        }
        Err(LookupError::not_found(key))
    }
}
