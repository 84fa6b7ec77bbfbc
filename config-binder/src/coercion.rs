//! Conversion of raw provider strings into typed [`Value`]s.

use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

use crate::error::CoercionError;
use crate::schema::{FieldKind, ScalarKind, Value};

/// Separator between elements of a sequence value.
pub const SEQUENCE_DELIMITER: char = ',';

/// Converts `raw` into a value of the given kind.
///
/// Sequences are split on [`SEQUENCE_DELIMITER`]; an empty string yields an
/// empty sequence. Only sequences of scalars are supported.
pub fn coerce(kind: &FieldKind, raw: &str) -> Result<Value, CoercionError> {
    match kind {
        FieldKind::Scalar(scalar) => coerce_scalar(*scalar, raw),
        FieldKind::Sequence(element) => match element.as_ref() {
            FieldKind::Scalar(scalar) => coerce_sequence(*scalar, raw),
            FieldKind::Sequence(_) | FieldKind::Record => Err(CoercionError::UnsupportedType {
                type_name: kind.to_string(),
            }),
        },
        FieldKind::Record => Err(CoercionError::UnsupportedType {
            type_name: kind.to_string(),
        }),
    }
}

pub fn coerce_scalar(kind: ScalarKind, raw: &str) -> Result<Value, CoercionError> {
    let value = match kind {
        ScalarKind::String => Value::String(raw.to_owned()),
        ScalarKind::Bool => Value::Bool(parse_bool(raw)?),
        ScalarKind::I8 => Value::I8(parse_integer(raw, kind)?),
        ScalarKind::I16 => Value::I16(parse_integer(raw, kind)?),
        ScalarKind::I32 => Value::I32(parse_integer(raw, kind)?),
        ScalarKind::I64 => Value::I64(parse_integer(raw, kind)?),
        ScalarKind::I128 => Value::I128(parse_integer(raw, kind)?),
        ScalarKind::Isize => Value::Isize(parse_integer(raw, kind)?),
        ScalarKind::U8 => Value::U8(parse_integer(raw, kind)?),
        ScalarKind::U16 => Value::U16(parse_integer(raw, kind)?),
        ScalarKind::U32 => Value::U32(parse_integer(raw, kind)?),
        ScalarKind::U64 => Value::U64(parse_integer(raw, kind)?),
        ScalarKind::U128 => Value::U128(parse_integer(raw, kind)?),
        ScalarKind::Usize => Value::Usize(parse_integer(raw, kind)?),
        ScalarKind::F32 => Value::F32(parse_float(raw, kind)?),
        ScalarKind::F64 => Value::F64(parse_float(raw, kind)?),
    };
    Ok(value)
}

fn coerce_sequence(element: ScalarKind, raw: &str) -> Result<Value, CoercionError> {
    let parts: Vec<&str> = raw.split(SEQUENCE_DELIMITER).collect();
    if let [""] = parts.as_slice() {
        return Ok(Value::Sequence(Vec::new()));
    }

    let mut items = Vec::with_capacity(parts.len());
    for (index, part) in parts.into_iter().enumerate() {
        let item = coerce_scalar(element, part).map_err(|source| CoercionError::Element {
            index,
            source: Box::new(source),
        })?;
        items.push(item);
    }

    Ok(Value::Sequence(items))
}

/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false counterparts.
pub fn parse_bool(raw: &str) -> Result<bool, CoercionError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CoercionError::InvalidBool {
            value: raw.to_owned(),
        }),
    }
}

fn parse_integer<T>(raw: &str, kind: ScalarKind) -> Result<T, CoercionError>
where
    T: FromStr<Err = ParseIntError>,
{
    raw.parse().map_err(|source| CoercionError::InvalidInteger {
        value: raw.to_owned(),
        kind,
        source,
    })
}

fn parse_float<T>(raw: &str, kind: ScalarKind) -> Result<T, CoercionError>
where
    T: FromStr<Err = ParseFloatError>,
{
    raw.parse().map_err(|source| CoercionError::InvalidFloat {
        value: raw.to_owned(),
        kind,
        source,
    })
}
