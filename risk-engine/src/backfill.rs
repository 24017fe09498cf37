//! In-memory backfill of the derived risk fields stored alongside a record.

use risk_core::{RiskConfig, RiskLabels};
use serde_json::Value;

use crate::normalize::normalize_probability;

/// Write `High_norm` / `Yes_norm` into the existing probability blocks and set
/// `cardio_label` / `diabetes_label` on the record.
///
/// Probabilities are read from the raw `High` / `Yes` fields only. Blocks
/// missing from the record are not created. Non-object records are left as is.
pub fn backfill_risk_fields(record: &mut Value, config: &RiskConfig) -> RiskLabels {
    let cardio = normalize_probability(record.pointer("/risk/cardio/probabilities/High"));
    let diabetes = normalize_probability(record.pointer("/risk/diabetes/probabilities/Yes"));

    write_normalized(record, "/risk/cardio/probabilities", "High_norm", cardio);
    write_normalized(record, "/risk/diabetes/probabilities", "Yes_norm", diabetes);

    let labels = RiskLabels::from_probabilities(cardio, diabetes, config.probability_threshold);

    match record.as_object_mut() {
        Some(fields) => {
            fields.insert("cardio_label".to_string(), labels.cardio_label.into());
            fields.insert("diabetes_label".to_string(), labels.diabetes_label.into());
        }
        None => log::debug!("backfill skipped: record is not an object"),
    }

    labels
}

fn write_normalized(record: &mut Value, block: &str, field: &str, probability: Option<f64>) {
    let Some(probability) = probability else {
        return;
    };
    if let Some(probabilities) = record.pointer_mut(block).and_then(Value::as_object_mut) {
        probabilities.insert(field.to_string(), Value::from(probability));
    }
}
