use std::fs;

use pretty_assertions::assert_eq;
use risk_core::{RiskConfig, RiskError};
use risk_engine::{rank_roster_str, rank_roster_value};
use serde_json::{json, Value};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn clinic_roster_matches_golden() {
    let roster = fs::read_to_string(fixture_path("clinic_roster.json"))
        .expect("Không đọc được danh sách bệnh nhân mẫu");

    let report =
        rank_roster_str(&roster, &RiskConfig::default()).expect("Không tạo được báo cáo");

    let mut actual = serde_json::to_value(report).expect("Không serialize báo cáo");
    normalize_dynamic_fields(&mut actual);

    let expected = fs::read_to_string(fixture_path("clinic_roster_report.json"))
        .expect("Không đọc được golden report");

    let mut expected_value: Value = serde_json::from_str(&expected).expect("Golden không hợp lệ");
    normalize_dynamic_fields(&mut expected_value);

    assert_eq!(actual, expected_value);
}

#[test]
fn roster_limit_comes_from_config() {
    let roster = fs::read_to_string(fixture_path("clinic_roster.json"))
        .expect("Không đọc được danh sách bệnh nhân mẫu");

    let config = RiskConfig {
        rank_limit: 2,
        ..RiskConfig::default()
    };
    let report = rank_roster_str(&roster, &config).expect("Không tạo được báo cáo");

    assert_eq!(report.evaluated, 7);
    assert_eq!(report.flagged, 5);
    let ids: Vec<_> = report
        .patients
        .iter()
        .map(|row| row.patient.id.as_deref())
        .collect();
    assert_eq!(ids, vec![Some("65f0c0ffee"), Some("p-001")]);
}

fn normalize_dynamic_fields(value: &mut Value) {
    if let Some(obj) = value.as_object_mut() {
        if obj.contains_key("generated_at") {
            obj.insert(
                "generated_at".to_string(),
                Value::String("__DYNAMIC_TIMESTAMP__".to_string()),
            );
        }
    }
}

#[test]
fn roster_accepts_patients_envelope_and_rejects_scalars() {
    let config = RiskConfig::default();

    let report = rank_roster_value(
        &json!({ "patients": [{ "id": "a", "htn": 1 }, { "id": "b" }] }),
        &config,
    )
    .expect("Không tạo được báo cáo");
    assert_eq!(report.evaluated, 2);
    assert_eq!(report.flagged, 1);
    assert_eq!(report.patients[0].score, 1.0);

    assert!(matches!(
        rank_roster_value(&json!({ "doctor": "x" }), &config),
        Err(RiskError::MissingData)
    ));
    assert!(matches!(
        rank_roster_value(&json!(42), &config),
        Err(RiskError::Parse(_))
    ));
    assert!(rank_roster_str("[", &config).is_err());
}
