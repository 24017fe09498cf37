//! Bridge WASM <-> JavaScript cho dashboard bác sĩ.

use risk_core::{RiskConfig, RiskError};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsRiskConfig {
    #[serde(default)]
    probability_threshold: Option<f64>,
    #[serde(default)]
    rank_limit: Option<usize>,
}

impl From<JsRiskConfig> for RiskConfig {
    fn from(cfg: JsRiskConfig) -> Self {
        let mut base = RiskConfig::default();
        if let Some(threshold) = cfg.probability_threshold {
            base.probability_threshold = threshold;
        }
        if let Some(limit) = cfg.rank_limit {
            base.rank_limit = limit;
        }
        base
    }
}

/// Đánh giá một hồ sơ bệnh nhân, trả về `RiskVerdict`.
#[wasm_bindgen]
pub fn evaluate_patient(record: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let record_value = from_value::<serde_json::Value>(record)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được hồ sơ: {err}")))?;

    if !record_value.is_object() {
        return Err(JsValue::from_str(&format_risk_error(RiskError::InvalidRecord(
            "expected a patient object".to_string(),
        ))));
    }

    let cfg = read_config(config)?;
    let verdict = risk_engine::evaluate_with(&record_value, &cfg);

    to_value(&verdict)
        .map_err(|err| JsValue::from_str(&format!("Không serialize verdict: {err}")))
}

/// Đánh giá và xếp hạng danh sách bệnh nhân, trả về `HighRiskReport`.
#[wasm_bindgen]
pub fn rank_patients(roster: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let roster_value = from_value::<serde_json::Value>(roster).map_err(|err| {
        JsValue::from_str(&format!("Không đọc được danh sách bệnh nhân: {err}"))
    })?;

    let cfg = read_config(config)?;
    let report = risk_engine::rank_roster_value(&roster_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_risk_error(err)))?;

    to_value(&report)
        .map_err(|err| JsValue::from_str(&format!("Không serialize báo cáo: {err}")))
}

fn read_config(config: Option<JsValue>) -> Result<RiskConfig, JsValue> {
    match config {
        Some(js_cfg) => {
            let cfg: JsRiskConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            Ok(RiskConfig::from(cfg))
        }
        None => Ok(RiskConfig::default()),
    }
}

fn format_risk_error(err: RiskError) -> String {
    format!("Risk error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_config_overrides_only_given_fields() {
        let cfg = RiskConfig::from(JsRiskConfig {
            probability_threshold: None,
            rank_limit: Some(3),
        });
        assert_eq!(cfg.rank_limit, 3);
        assert_eq!(cfg.probability_threshold, 0.35);
        assert_eq!(cfg.cardio, RiskConfig::default().cardio);
    }
}
