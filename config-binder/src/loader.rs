//! Recursive field walker.

use std::fmt;

use tracing::{debug, trace};

use crate::coercion::coerce;
use crate::error::{LoadError, LoadErrorKind};
use crate::providers::Provider;
use crate::schema::{Binding, Configurable, FieldSpec, Slot};

const SECRET_MASK: &str = "******";

#[derive(Debug, Clone, Copy)]
enum Origin {
    Provider,
    Default,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider => f.write_str("provider"),
            Self::Default => f.write_str("default"),
        }
    }
}

/// Populates `config` in place from `provider`.
///
/// Fields are visited in declaration order and nested records are always
/// descended into. For a field with a lookup key the provider value wins;
/// if the lookup fails the declared default is used instead. Without a
/// default the field is left untouched, unless `strict` is set, in which
/// case the load fails.
///
/// Values that cannot be coerced into the field's type abort the load even
/// when `strict` is off. Fields assigned before a failure keep their new
/// values.
pub fn load<C, P>(config: &mut C, provider: &P, strict: bool) -> Result<(), LoadError>
where
    C: Configurable + ?Sized,
    P: Provider + ?Sized,
{
    for binding in config.bindings() {
        match binding {
            Binding::Record { name, record } => {
                trace!(field = name, "Descending into nested record");
                load(record, provider, strict).map_err(|err| err.within(name))?;
            }
            Binding::Leaf { spec, slot } => {
                load_field(&spec, slot, provider, strict)
                    .map_err(|kind| LoadError::new(spec.name, kind))?;
            }
        }
    }
    Ok(())
}

fn load_field<P>(
    spec: &FieldSpec,
    slot: &mut dyn Slot,
    provider: &P,
    strict: bool,
) -> Result<(), LoadErrorKind>
where
    P: Provider + ?Sized,
{
    let Some(key) = spec.key else {
        trace!(field = spec.name, "No lookup key declared, skipping field");
        return Ok(());
    };

    let (raw, origin) = match provider.lookup(key) {
        Ok(value) => (value, Origin::Provider),
        Err(err) => match spec.default {
            Some(default) => (default.to_owned(), Origin::Default),
            None if strict => {
                return Err(LoadErrorKind::Missing {
                    key: key.to_owned(),
                    source: err,
                });
            }
            None => {
                debug!(
                    field = spec.name,
                    key,
                    reason = %err,
                    "No value found, keeping current value"
                );
                return Ok(());
            }
        },
    };

    let value = coerce(&slot.kind(), &raw).map_err(|source| LoadErrorKind::Invalid {
        key: key.to_owned(),
        source,
    })?;
    slot.assign(value).map_err(|source| LoadErrorKind::Invalid {
        key: key.to_owned(),
        source,
    })?;

    let display_value = if spec.secret { SECRET_MASK } else { raw.as_str() };
    debug!(
        field = spec.name,
        key,
        origin = %origin,
        value = display_value,
        "Configuration value assigned"
    );
    Ok(())
}
