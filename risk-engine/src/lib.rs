//! Patient-record risk flagging: field normalization, rule evaluation and
//! ranking over loosely structured JSON patient documents.

use risk_core::{
    HighRiskPatient, HighRiskReport, PatientSummary, RiskConfig, RiskError, RiskVerdict,
};
use serde_json::Value;

pub mod backfill;
pub mod evaluate;
pub mod labs;
pub mod normalize;
pub mod rank;
mod summary;

pub use backfill::backfill_risk_fields;
pub use evaluate::{evaluate, evaluate_with, ClinicalProfile};
pub use labs::{project_labs, resolve_lab_value, LabKind};
pub use normalize::{fold_probability, normalize_probability, resolve_boolean_flag};
pub use rank::{rank, score};
pub use summary::{patient_id, summarize_patient};

/// Evaluate a single patient record from a JSON string.
pub fn evaluate_record_str(
    record_json: &str,
    config: &RiskConfig,
) -> Result<RiskVerdict, RiskError> {
    let record: Value =
        serde_json::from_str(record_json).map_err(|err| RiskError::Parse(err.to_string()))?;

    if !record.is_object() {
        return Err(RiskError::InvalidRecord(format!(
            "expected a JSON object, received {}",
            json_kind(&record)
        )));
    }

    Ok(evaluate_with(&record, config))
}

/// Evaluate and rank every record of a roster held in a JSON string.
pub fn rank_roster_str(
    roster_json: &str,
    config: &RiskConfig,
) -> Result<HighRiskReport, RiskError> {
    let roster: Value =
        serde_json::from_str(roster_json).map_err(|err| RiskError::Parse(err.to_string()))?;
    rank_roster_value(&roster, config)
}

/// Evaluate and rank a roster: either a JSON array of patient records or an
/// object carrying them under `patients`.
pub fn rank_roster_value(
    roster: &Value,
    config: &RiskConfig,
) -> Result<HighRiskReport, RiskError> {
    let records = match roster {
        Value::Array(records) => records,
        Value::Object(fields) => fields
            .get("patients")
            .and_then(Value::as_array)
            .ok_or(RiskError::MissingData)?,
        other => {
            return Err(RiskError::Parse(format!(
                "Expected a patient array, received {}",
                json_kind(other)
            )))
        }
    };

    let entries: Vec<((PatientSummary, Option<&Value>), RiskVerdict)> = records
        .iter()
        .map(|record| {
            let context = (summarize_patient(record), record.get("risk"));
            (context, evaluate_with(record, config))
        })
        .collect();

    let flagged = entries
        .iter()
        .filter(|(_, verdict)| verdict.is_high_risk)
        .count();

    let patients = rank(entries, config.rank_limit)
        .into_iter()
        .map(|((patient, risk), verdict)| high_risk_row(patient, risk, verdict))
        .collect();

    Ok(HighRiskReport::new(records.len(), flagged, patients))
}

fn high_risk_row(
    patient: PatientSummary,
    risk: Option<&Value>,
    verdict: RiskVerdict,
) -> HighRiskPatient {
    HighRiskPatient {
        score: score(&verdict),
        patient,
        risk: risk.filter(|value| !value.is_null()).cloned(),
        cardio_probability: verdict.cardio_probability,
        diabetes_probability: verdict.diabetes_probability,
        reasons: verdict.reasons,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
