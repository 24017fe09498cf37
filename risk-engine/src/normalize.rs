//! Field normalization: reconcile the shapes one clinical fact can arrive in.

use serde_json::Value;

/// Returns the first value found at one of the JSON pointers, skipping nulls.
pub fn first_present<'a>(record: &'a Value, pointers: &[&str]) -> Option<&'a Value> {
    pointers
        .iter()
        .filter_map(|pointer| record.pointer(pointer))
        .find(|value| !value.is_null())
}

/// Reads a number stored either as a JSON number or as numeric text.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };

    number.is_finite().then_some(number)
}

/// Normalize a model probability to `0..=1`.
///
/// Values above `1` are read as percentages. `1` itself stays a fraction, so
/// a literal `1` means 100%, never 1%.
pub fn normalize_probability(raw: Option<&Value>) -> Option<f64> {
    raw.and_then(coerce_number).and_then(fold_probability)
}

/// Numeric half of [`normalize_probability`].
///
/// Negative values and values above 100 are not probabilities in either
/// encoding and yield `None`.
pub fn fold_probability(value: f64) -> Option<f64> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return None;
    }
    if value > 1.0 {
        Some(value / 100.0)
    } else {
        Some(value)
    }
}

/// Truthiness for stringly-typed history flags.
pub fn resolve_boolean_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => {
            matches!(text.to_lowercase().as_str(), "1" | "true" | "yes")
        }
        Some(Value::Number(number)) => number.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Text form of a scalar, used for legacy label fields.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub(crate) fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_numeric_drops_integral_fraction() {
        assert_eq!(format_numeric(162.0), "162");
        assert_eq!(format_numeric(6.5), "6.5");
        assert_eq!(format_numeric(1.55), "1.55");
    }

    #[test]
    fn scalar_text_covers_numbers_and_strings() {
        assert_eq!(scalar_text(&json!("High")), Some("High".to_string()));
        assert_eq!(scalar_text(&json!(1)), Some("1".to_string()));
        assert_eq!(scalar_text(&json!(null)), None);
    }

    #[test]
    fn first_present_skips_null_values() {
        let record = json!({ "vitals": { "bmi": null }, "bmi": 31 });
        let found = first_present(&record, &["/vitals/bmi", "/bmi"]);
        assert_eq!(found, Some(&json!(31)));
    }
}
