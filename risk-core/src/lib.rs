//! Kiểu dữ liệu lõi cho việc đánh giá và xếp hạng bệnh nhân nguy cơ cao.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cấu hình ngưỡng đánh giá và giới hạn xếp hạng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    /// Xác suất mô hình (0..1) vượt ngưỡng này thì coi là lý do nguy cơ.
    pub probability_threshold: f64,
    /// Số bệnh nhân tối đa trả về sau khi xếp hạng.
    pub rank_limit: usize,
    pub cardio: CardioThresholds,
    pub diabetes: DiabetesThresholds,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            probability_threshold: 0.35,
            rank_limit: 10,
            cardio: CardioThresholds::default(),
            diabetes: DiabetesThresholds::default(),
        }
    }
}

impl RiskConfig {
    /// Đọc cấu hình từ JSON; trường nào vắng mặt giữ giá trị mặc định.
    pub fn from_json_str(input: &str) -> Result<Self, RiskError> {
        serde_json::from_str(input).map_err(|err| RiskError::Parse(err.to_string()))
    }
}

/// Ngưỡng lâm sàng cho nhóm tim mạch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CardioThresholds {
    /// Huyết áp tâm thu (mmHg), kích hoạt khi >=.
    pub systolic: f64,
    /// Huyết áp tâm trương (mmHg), kích hoạt khi >=.
    pub diastolic: f64,
    /// BMI, kích hoạt khi >=.
    pub bmi: f64,
    /// Cholesterol toàn phần (mmol/L), kích hoạt khi >.
    pub total_cholesterol: f64,
    /// LDL (mmol/L), kích hoạt khi >.
    pub ldl: f64,
    /// HDL (mmol/L), kích hoạt khi <.
    pub hdl: f64,
    /// Creatinine (mg/dL), kích hoạt khi >.
    pub creatinine: f64,
    /// eGFR (mL/min/1.73m²), kích hoạt khi <.
    pub egfr: f64,
    /// UACR (mg/g), kích hoạt khi >.
    pub uacr: f64,
}

impl Default for CardioThresholds {
    fn default() -> Self {
        Self {
            systolic: 160.0,
            diastolic: 100.0,
            bmi: 30.0,
            total_cholesterol: 6.2,
            ldl: 3.4,
            hdl: 1.0,
            creatinine: 1.5,
            egfr: 60.0,
            uacr: 30.0,
        }
    }
}

/// Ngưỡng lâm sàng cho nhóm đái tháo đường.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiabetesThresholds {
    /// Đường huyết lúc đói (mmol/L), kích hoạt khi >=.
    pub fasting_glucose: f64,
    /// HbA1c (%), kích hoạt khi >=.
    pub hba1c: f64,
    /// UACR (mg/g), kích hoạt khi >=.
    pub uacr: f64,
    /// eGFR (mL/min/1.73m²), kích hoạt khi <.
    pub egfr: f64,
}

impl Default for DiabetesThresholds {
    fn default() -> Self {
        Self {
            fasting_glucose: 7.0,
            hba1c: 6.5,
            uacr: 30.0,
            egfr: 60.0,
        }
    }
}

/// Nhóm bệnh mà một lý do nguy cơ thuộc về.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskDomain {
    Cardio,
    Diabetes,
}

/// Loại quy tắc đã kích hoạt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    /// Xác suất từ mô hình dự đoán vượt ngưỡng.
    Model,
    /// Nhãn cũ (`cardio_label`, `predicted_risk`...).
    Flag,
    /// Chỉ số sinh tồn hoặc xét nghiệm vượt ngưỡng.
    Clinical,
    /// Tiền sử hoặc lối sống.
    History,
}

/// Bằng chứng kèm theo lý do: điểm số (mô hình) hoặc ghi chú.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    Score(f64),
    Note(String),
}

/// Một quy tắc đã kích hoạt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reason {
    #[serde(alias = "type")]
    pub kind: ReasonKind,
    pub domain: RiskDomain,
    #[serde(flatten)]
    pub evidence: Evidence,
}

impl Reason {
    pub fn model(domain: RiskDomain, score: f64) -> Self {
        Self {
            kind: ReasonKind::Model,
            domain,
            evidence: Evidence::Score(score),
        }
    }

    pub fn flag(domain: RiskDomain, note: impl Into<String>) -> Self {
        Self::noted(ReasonKind::Flag, domain, note)
    }

    pub fn clinical(domain: RiskDomain, note: impl Into<String>) -> Self {
        Self::noted(ReasonKind::Clinical, domain, note)
    }

    pub fn history(domain: RiskDomain, note: impl Into<String>) -> Self {
        Self::noted(ReasonKind::History, domain, note)
    }

    fn noted(kind: ReasonKind, domain: RiskDomain, note: impl Into<String>) -> Self {
        Self {
            kind,
            domain,
            evidence: Evidence::Note(note.into()),
        }
    }

    /// Điểm số nếu đây là lý do từ mô hình.
    pub fn score(&self) -> Option<f64> {
        match self.evidence {
            Evidence::Score(score) => Some(score),
            Evidence::Note(_) => None,
        }
    }

    /// Ghi chú mô tả nếu có.
    pub fn note(&self) -> Option<&str> {
        match &self.evidence {
            Evidence::Note(note) => Some(note),
            Evidence::Score(_) => None,
        }
    }
}

/// Kết quả đánh giá một bệnh nhân.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RiskVerdict {
    pub patient_id: Option<String>,
    pub is_high_risk: bool,
    pub reasons: Vec<Reason>,
    pub cardio_probability: Option<f64>,
    pub diabetes_probability: Option<f64>,
}

impl RiskVerdict {
    /// Dựng verdict; `is_high_risk` luôn suy ra từ danh sách lý do.
    pub fn new(
        patient_id: Option<String>,
        reasons: Vec<Reason>,
        cardio_probability: Option<f64>,
        diabetes_probability: Option<f64>,
    ) -> Self {
        Self {
            patient_id,
            is_high_risk: !reasons.is_empty(),
            reasons,
            cardio_probability,
            diabetes_probability,
        }
    }

    /// Các lý do thuộc một nhóm bệnh.
    pub fn reasons_for(&self, domain: RiskDomain) -> impl Iterator<Item = &Reason> {
        self.reasons
            .iter()
            .filter(move |reason| reason.domain == domain)
    }
}

/// Thông tin nhận dạng ngắn gọn của bệnh nhân.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PatientSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
}

/// Nhãn nguy cơ 0/1 lưu kèm hồ sơ theo định dạng cũ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RiskLabels {
    pub cardio_label: u8,
    pub diabetes_label: u8,
}

impl RiskLabels {
    /// Nhãn = 1 khi xác suất >= ngưỡng, 0 khi thấp hơn hoặc không có.
    pub fn from_probabilities(cardio: Option<f64>, diabetes: Option<f64>, threshold: f64) -> Self {
        let label = |prob: Option<f64>| match prob {
            Some(p) if p >= threshold => 1,
            _ => 0,
        };
        Self {
            cardio_label: label(cardio),
            diabetes_label: label(diabetes),
        }
    }
}

/// Một dòng trong danh sách bệnh nhân nguy cơ cao.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HighRiskPatient {
    #[serde(flatten)]
    pub patient: PatientSummary,
    /// Khối `risk` gốc của hồ sơ, giữ nguyên để hiển thị.
    pub risk: Option<Value>,
    pub cardio_probability: Option<f64>,
    pub diabetes_probability: Option<f64>,
    pub reasons: Vec<Reason>,
    pub score: f64,
}

/// Báo cáo xếp hạng cho một danh sách bệnh nhân.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HighRiskReport {
    pub generated_at: DateTime<Utc>,
    /// Số hồ sơ đã đánh giá.
    pub evaluated: usize,
    /// Số hồ sơ có ít nhất một lý do.
    pub flagged: usize,
    pub patients: Vec<HighRiskPatient>,
}

impl HighRiskReport {
    pub fn new(evaluated: usize, flagged: usize, patients: Vec<HighRiskPatient>) -> Self {
        Self {
            generated_at: Utc::now(),
            evaluated,
            flagged,
            patients,
        }
    }
}

/// Lỗi chung ở ranh giới đọc dữ liệu.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Hồ sơ không hợp lệ: {0}")]
    InvalidRecord(String),
    #[error("Lỗi khác: {0}")]
    Other(String),
}
