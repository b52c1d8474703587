use serde_json::Value;

use super::domain::UserId;

/// Why a token's `user_id` claim could not be turned into a [`UserId`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClaimFormatError {
    #[error("user_id claim missing")]
    Missing,
    #[error("user_id claim has unsupported type {0}")]
    UnsupportedType(&'static str),
    #[error("user_id claim {0} is not an integer")]
    NotInteger(String),
    #[error("user_id claim {0} must be positive")]
    NonPositive(i64),
}

/// Decodes the `user_id` claim.
///
/// Accepted: JSON integers, floats with no fractional part, and decimal strings.
pub fn decode_user_id(claim: Option<&Value>) -> Result<UserId, ClaimFormatError> {
    let raw = match claim {
        None | Some(Value::Null) => return Err(ClaimFormatError::Missing),
        Some(Value::Number(number)) => {
            if let Some(value) = number.as_i64() {
                value
            } else if let Some(value) = number.as_f64().filter(|value| is_integral_i64(*value)) {
                value as i64
            } else {
                return Err(ClaimFormatError::NotInteger(number.to_string()));
            }
        }
        Some(Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| ClaimFormatError::NotInteger(text.clone()))?,
        Some(Value::Bool(_)) => return Err(ClaimFormatError::UnsupportedType("bool")),
        Some(Value::Array(_)) => return Err(ClaimFormatError::UnsupportedType("array")),
        Some(Value::Object(_)) => return Err(ClaimFormatError::UnsupportedType("object")),
    };

    if raw <= 0 {
        return Err(ClaimFormatError::NonPositive(raw));
    }

    Ok(UserId(raw))
}

fn is_integral_i64(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64
}
