use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};
use thiserror::Error;

/// Monetary values carry exactly two fractional digits.
pub const MONEY_SCALE: u32 = 2;
/// Item names fit the `VARCHAR(64)` column.
pub const NAME_MAX_LEN: usize = 64;

/// Classified outcome of populating an entity from an untyped payload.
///
/// Callers branch on the variant instead of matching message text. The
/// `Storage` variant carries store write failures on the same channel so
/// a rejected commit surfaces as a bad request, not a retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field [{0}]")]
    MissingField(&'static str),

    #[error("invalid type for [{field}], expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid value for [{field}]: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    #[error("body of request contained bad or no data")]
    MalformedInput,

    #[error("{0}")]
    Storage(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// The payload must be a JSON object to be deserialized at all.
pub fn as_object(value: &Value) -> ValidationResult<&Map<String, Value>> {
    value.as_object().ok_or(ValidationError::MalformedInput)
}

fn require<'a>(data: &'a Map<String, Value>, field: &'static str) -> ValidationResult<&'a Value> {
    match data.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

pub fn required_int(data: &Map<String, Value>, field: &'static str) -> ValidationResult<i32> {
    let value = require(data, field)?;
    let number = value.as_i64().ok_or(ValidationError::WrongType {
        field,
        expected: "integer",
    })?;
    i32::try_from(number).map_err(|_| ValidationError::InvalidValue {
        field,
        reason: format!("out of range: {number}"),
    })
}

/// Like [`required_int`] but additionally rejects negative values, so a
/// float and a negative count fail as two distinct kinds.
pub fn required_quantity(data: &Map<String, Value>, field: &'static str) -> ValidationResult<i32> {
    let quantity = required_int(data, field)?;
    if quantity < 0 {
        return Err(ValidationError::InvalidValue {
            field,
            reason: format!("must be non-negative, got {quantity}"),
        });
    }
    Ok(quantity)
}

/// Non-negative monetary amount, normalized to [`MONEY_SCALE`] digits.
pub fn required_money(data: &Map<String, Value>, field: &'static str) -> ValidationResult<Decimal> {
    let value = require(data, field)?;
    let number = value.as_f64().ok_or(ValidationError::WrongType {
        field,
        expected: "number",
    })?;
    let amount = Decimal::try_from(number).map_err(|_| ValidationError::InvalidValue {
        field,
        reason: format!("not representable: {number}"),
    })?;
    if amount < Decimal::ZERO {
        return Err(ValidationError::InvalidValue {
            field,
            reason: format!("must be non-negative, got {number}"),
        });
    }
    Ok(round_money(amount))
}

pub fn required_name(data: &Map<String, Value>, field: &'static str) -> ValidationResult<String> {
    let value = require(data, field)?;
    let name = value.as_str().ok_or(ValidationError::WrongType {
        field,
        expected: "string",
    })?;
    if name.chars().count() > NAME_MAX_LEN {
        return Err(ValidationError::InvalidValue {
            field,
            reason: format!("must be at most {NAME_MAX_LEN} characters"),
        });
    }
    Ok(name.to_string())
}

pub fn optional_array<'a>(
    data: &'a Map<String, Value>,
    field: &'static str,
) -> ValidationResult<Option<&'a Vec<Value>>> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_array()
            .map(Some)
            .ok_or(ValidationError::WrongType {
                field,
                expected: "array",
            }),
    }
}

/// Round half away from zero at two decimal places.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
