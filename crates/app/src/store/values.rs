//! Lenient decoding of numeric document attributes.
//!
//! Stores may hand back amounts as integers, floats or numeric strings depending on how the
//! attribute was declared. Anything that is not a finite, non-negative number reads as zero.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a stored value as a non-negative amount.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is finite, non-negative and rounded before the cast"
)]
pub(crate) fn amount(value: &Value) -> Option<u64> {
    let float = match value {
        Value::Number(number) => {
            if let Some(integer) = number.as_u64() {
                return Some(integer);
            }

            number.as_f64()?
        }
        Value::String(text) => {
            let text = text.trim();

            if let Ok(integer) = text.parse::<u64>() {
                return Some(integer);
            }

            text.parse::<f64>().ok()?
        }
        _ => return None,
    };

    (float.is_finite() && float >= 0.0).then(|| float.round() as u64)
}

/// Serde adapter for [`amount`], defaulting to zero.
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.as_ref().and_then(amount).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_integers_floats_and_strings() {
        assert_eq!(amount(&json!(1500)), Some(1500));
        assert_eq!(amount(&json!(14.6)), Some(15));
        assert_eq!(amount(&json!(" 42 ")), Some(42));
        assert_eq!(amount(&json!("7.4")), Some(7));
    }

    #[test]
    fn rejects_negative_and_non_numeric() {
        assert_eq!(amount(&json!(-1)), None);
        assert_eq!(amount(&json!("abc")), None);
        assert_eq!(amount(&json!(null)), None);
        assert_eq!(amount(&json!(true)), None);
    }
}
