//! Rule evaluation: one patient record in, one `RiskVerdict` out.

use risk_core::{Reason, RiskConfig, RiskDomain, RiskVerdict};
use serde_json::Value;

use crate::labs::{resolve_lab_value, LabKind};
use crate::normalize::{
    coerce_number, first_present, format_numeric, normalize_probability, resolve_boolean_flag,
    scalar_text,
};
use crate::summary::patient_id;

const CARDIO_PROBABILITY: &[&str] = &[
    "/risk/cardio/probabilities/High_norm",
    "/risk/cardio/probabilities/High",
    "/risk/cardio/High",
];

const DIABETES_PROBABILITY: &[&str] = &[
    "/risk/diabetes/probabilities/Yes_norm",
    "/risk/diabetes/probabilities/Yes",
    "/risk/diabetes/Yes",
];

const SYSTOLIC: &[&str] = &["/vitals/bpSystolic", "/sbp"];
const DIASTOLIC: &[&str] = &["/vitals/bpDiastolic", "/dbp"];
const BMI: &[&str] = &["/vitals/bmi", "/bmi"];

const SMOKER: &[&str] = &["smoker"];
const DIABETIC: &[&str] = &["dm", "diabetes"];
const HYPERTENSIVE: &[&str] = &["htn", "hypertension"];
const FAMILY_CAD: &[&str] = &["fam_cad", "familyHistoryCad"];

/// Flat, typed view of the clinical facts a record carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClinicalProfile {
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
    pub bmi: Option<f64>,
    pub total_cholesterol: Option<f64>,
    pub ldl: Option<f64>,
    pub hdl: Option<f64>,
    pub creatinine: Option<f64>,
    pub egfr: Option<f64>,
    pub uacr: Option<f64>,
    pub glucose: Option<f64>,
    pub hba1c: Option<f64>,
    pub smoker: bool,
    pub diabetic: bool,
    pub hypertensive: bool,
    pub family_cad: bool,
}

impl ClinicalProfile {
    pub fn from_record(record: &Value) -> Self {
        let vital = |pointers: &[&str]| first_present(record, pointers).and_then(coerce_number);
        let lab = |kind: LabKind| resolve_lab_value(record, kind).and_then(coerce_number);
        let history = |keys: &[&str]| {
            keys.iter()
                .any(|key| resolve_boolean_flag(record.get(*key)))
        };

        Self {
            systolic: vital(SYSTOLIC),
            diastolic: vital(DIASTOLIC),
            bmi: vital(BMI),
            total_cholesterol: lab(LabKind::TotalCholesterol),
            ldl: lab(LabKind::Ldl),
            hdl: lab(LabKind::Hdl),
            creatinine: lab(LabKind::Creatinine),
            egfr: lab(LabKind::Egfr),
            uacr: lab(LabKind::Uacr),
            glucose: lab(LabKind::Glucose),
            hba1c: lab(LabKind::Hba1c),
            smoker: history(SMOKER),
            diabetic: history(DIABETIC),
            hypertensive: history(HYPERTENSIVE),
            family_cad: history(FAMILY_CAD),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    AtLeast(f64),
    Above(f64),
    Below(f64),
}

impl Trigger {
    fn fires(self, value: f64) -> bool {
        match self {
            Trigger::AtLeast(limit) => value >= limit,
            Trigger::Above(limit) => value > limit,
            Trigger::Below(limit) => value < limit,
        }
    }
}

struct ClinicalRule {
    domain: RiskDomain,
    label: &'static str,
    value: fn(&ClinicalProfile) -> Option<f64>,
    trigger: Trigger,
}

impl ClinicalRule {
    fn new(
        domain: RiskDomain,
        label: &'static str,
        value: fn(&ClinicalProfile) -> Option<f64>,
        trigger: Trigger,
    ) -> Self {
        Self {
            domain,
            label,
            value,
            trigger,
        }
    }
}

fn clinical_rules(config: &RiskConfig) -> [ClinicalRule; 13] {
    use RiskDomain::{Cardio, Diabetes};
    use Trigger::{Above, AtLeast, Below};

    let cardio = &config.cardio;
    let diabetes = &config.diabetes;
    let rule = ClinicalRule::new;

    [
        rule(Cardio, "systolic", |p| p.systolic, AtLeast(cardio.systolic)),
        rule(Cardio, "diastolic", |p| p.diastolic, AtLeast(cardio.diastolic)),
        rule(Cardio, "bmi", |p| p.bmi, AtLeast(cardio.bmi)),
        rule(Cardio, "tc", |p| p.total_cholesterol, Above(cardio.total_cholesterol)),
        rule(Cardio, "ldl", |p| p.ldl, Above(cardio.ldl)),
        rule(Cardio, "hdl", |p| p.hdl, Below(cardio.hdl)),
        rule(Cardio, "creat", |p| p.creatinine, Above(cardio.creatinine)),
        rule(Cardio, "egfr", |p| p.egfr, Below(cardio.egfr)),
        rule(Cardio, "uacr", |p| p.uacr, Above(cardio.uacr)),
        rule(Diabetes, "glucose", |p| p.glucose, AtLeast(diabetes.fasting_glucose)),
        rule(Diabetes, "hba1c", |p| p.hba1c, AtLeast(diabetes.hba1c)),
        rule(Diabetes, "uacr", |p| p.uacr, AtLeast(diabetes.uacr)),
        rule(Diabetes, "egfr", |p| p.egfr, Below(diabetes.egfr)),
    ]
}

/// Evaluate a record against the default thresholds.
pub fn evaluate(record: &Value) -> RiskVerdict {
    evaluate_with(record, &RiskConfig::default())
}

/// Evaluate a record. Missing or unparseable fields add no reason.
pub fn evaluate_with(record: &Value, config: &RiskConfig) -> RiskVerdict {
    if !record.is_object() {
        log::debug!("record is not an object; nothing to evaluate");
    }

    let cardio_probability = normalize_probability(first_present(record, CARDIO_PROBABILITY));
    let diabetes_probability =
        normalize_probability(first_present(record, DIABETES_PROBABILITY));

    let mut reasons = Vec::new();

    for (domain, probability) in [
        (RiskDomain::Cardio, cardio_probability),
        (RiskDomain::Diabetes, diabetes_probability),
    ] {
        if let Some(score) = probability.filter(|p| *p > config.probability_threshold) {
            reasons.push(Reason::model(domain, score));
        }
    }

    if legacy_flag(record, "cardio_label", "/risk/cardio/predicted_risk") {
        reasons.push(Reason::flag(RiskDomain::Cardio, "cardio_label/predicted_risk"));
    }
    if legacy_flag(record, "diabetes_label", "/risk/diabetes/prediction") {
        reasons.push(Reason::flag(RiskDomain::Diabetes, "diabetes_label/prediction"));
    }

    let profile = ClinicalProfile::from_record(record);

    for rule in clinical_rules(config) {
        let Some(observed) = (rule.value)(&profile) else {
            continue;
        };
        if rule.trigger.fires(observed) {
            reasons.push(Reason::clinical(
                rule.domain,
                format!("{} {}", rule.label, format_numeric(observed)),
            ));
        }
    }

    for (present, domain, note) in [
        (profile.smoker, RiskDomain::Cardio, "smoker"),
        (profile.diabetic, RiskDomain::Diabetes, "diabetes"),
        (profile.hypertensive, RiskDomain::Cardio, "hypertension"),
        (profile.family_cad, RiskDomain::Cardio, "family CAD"),
    ] {
        if present {
            reasons.push(Reason::history(domain, note));
        }
    }

    let verdict = RiskVerdict::new(
        patient_id(record),
        reasons,
        cardio_probability,
        diabetes_probability,
    );

    log::debug!(
        "evaluated patient {:?}: {} reason(s)",
        verdict.patient_id,
        verdict.reasons.len()
    );

    verdict
}

fn legacy_flag(record: &Value, label_field: &str, prediction_pointer: &str) -> bool {
    let labelled = record
        .get(label_field)
        .and_then(Value::as_f64)
        .is_some_and(|label| label == 1.0);

    labelled
        || record
            .pointer(prediction_pointer)
            .and_then(scalar_text)
            .is_some_and(|text| text.to_lowercase().contains("high"))
}
