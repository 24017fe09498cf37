use risk_core::PatientSummary;
use serde_json::Value;

use crate::normalize::{coerce_number, first_present};

/// Patient identifier from `id` or a Mongo-style `_id` (`{"$oid": ...}` included).
pub fn patient_id(record: &Value) -> Option<String> {
    match first_present(record, &["/id", "/_id"])? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Identity fields shown next to a verdict.
pub fn summarize_patient(record: &Value) -> PatientSummary {
    PatientSummary {
        id: patient_id(record),
        name: text_field(record, "name"),
        age: record
            .get("age")
            .and_then(coerce_number)
            .filter(|age| *age >= 0.0 && *age < f64::from(u32::MAX))
            .map(|age| age.floor() as u32),
        gender: text_field(record, "gender"),
    }
}

fn text_field(record: &Value, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
