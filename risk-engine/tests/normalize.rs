use proptest::prelude::*;
use risk_core::{ReasonKind, RiskDomain};
use risk_engine::{
    evaluate, fold_probability, normalize_probability, resolve_boolean_flag, resolve_lab_value,
    LabKind,
};
use serde_json::{json, Value};

#[test]
fn probability_edge_values() {
    assert_eq!(normalize_probability(None), None);
    assert_eq!(normalize_probability(Some(&Value::Null)), None);
    assert_eq!(normalize_probability(Some(&json!("abc"))), None);
    assert_eq!(normalize_probability(Some(&json!(true))), None);
    assert_eq!(normalize_probability(Some(&json!("45"))), Some(0.45));
    assert_eq!(normalize_probability(Some(&json!(1))), Some(1.0));
    assert_eq!(normalize_probability(Some(&json!(100))), Some(1.0));
    assert_eq!(normalize_probability(Some(&json!(0))), Some(0.0));
    assert_eq!(normalize_probability(Some(&json!(-3))), None);
    assert_eq!(normalize_probability(Some(&json!(250))), None);
}

#[test]
fn boolean_flag_spellings() {
    for truthy in [json!(true), json!("1"), json!("true"), json!("yes"), json!("YES"), json!(1)] {
        assert!(resolve_boolean_flag(Some(&truthy)), "{truthy} should be true");
    }
    for falsy in [
        json!(false),
        json!("0"),
        json!("false"),
        json!("no"),
        json!(0),
        json!(null),
        json!(""),
    ] {
        assert!(!resolve_boolean_flag(Some(&falsy)), "{falsy} should be false");
    }
    assert!(!resolve_boolean_flag(None));
}

#[test]
fn lab_lookup_prefers_first_list_entry() {
    let record = json!({
        "labs": [
            { "name": "Total Cholesterol", "value": 5.1 },
            { "name": "tc", "value": 7.0 },
            { "value": 3 }
        ],
        "tc": 6.9,
        "egfr": 58
    });

    assert_eq!(
        resolve_lab_value(&record, LabKind::TotalCholesterol),
        Some(&json!(5.1))
    );
    assert_eq!(resolve_lab_value(&record, LabKind::Egfr), Some(&json!(58)));
    assert_eq!(resolve_lab_value(&record, LabKind::Ldl), None);
}

#[test]
fn lab_lookup_falls_back_when_entry_value_is_null() {
    let record = json!({
        "labs": [{ "name": "HbA1c", "value": null }],
        "hba1c": "6.8"
    });

    assert_eq!(resolve_lab_value(&record, LabKind::Hba1c), Some(&json!("6.8")));
}

proptest! {
    #[test]
    fn fractions_are_unchanged(x in 0.0f64..1.0) {
        prop_assert_eq!(fold_probability(x), Some(x));
        prop_assert_eq!(normalize_probability(Some(&json!(x))), Some(x));
    }

    #[test]
    fn percentages_are_folded(x in 1.0f64..=100.0) {
        prop_assume!(x > 1.0);
        prop_assert_eq!(fold_probability(x), Some(x / 100.0));
    }

    #[test]
    fn folding_stays_in_unit_interval(x in -1_000.0f64..1_000.0) {
        if let Some(p) = fold_probability(x) {
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn systolic_reason_tracks_threshold(
        systolic in 80u32..260,
        diastolic in 50u32..130,
        bmi in 15.0f64..45.0,
    ) {
        let verdict = evaluate(&json!({
            "vitals": { "bpSystolic": systolic, "bpDiastolic": diastolic, "bmi": bmi },
            "smoker": "yes"
        }));

        let has_systolic = verdict.reasons.iter().any(|reason| {
            reason.kind == ReasonKind::Clinical
                && reason.domain == RiskDomain::Cardio
                && reason.note().is_some_and(|note| note.starts_with("systolic "))
        });
        prop_assert_eq!(has_systolic, systolic >= 160);
    }

    #[test]
    fn high_risk_matches_reason_presence(
        systolic in proptest::option::of(100u32..200),
        hba1c in proptest::option::of(4.0f64..10.0),
        cardio in proptest::option::of(0.0f64..100.0),
        smoker in proptest::option::of(prop_oneof![Just("1"), Just("0"), Just("yes"), Just("no")]),
    ) {
        let mut record = json!({});
        if let Some(systolic) = systolic {
            record["vitals"] = json!({ "bpSystolic": systolic });
        }
        if let Some(hba1c) = hba1c {
            record["hba1c"] = json!(hba1c);
        }
        if let Some(cardio) = cardio {
            record["risk"] = json!({ "cardio": { "probabilities": { "High": cardio } } });
        }
        if let Some(smoker) = smoker {
            record["smoker"] = json!(smoker);
        }

        let verdict = evaluate(&record);
        prop_assert_eq!(verdict.is_high_risk, !verdict.reasons.is_empty());
        if let Some(p) = verdict.cardio_probability {
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
