//! Lab values: lookup across the lab list and the legacy top-level fields.

use serde_json::{Map, Value};

/// Lab tests the engine knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabKind {
    Hba1c,
    TotalCholesterol,
    Ldl,
    Hdl,
    Creatinine,
    Egfr,
    Uacr,
    Glucose,
    Bilirubin,
    Alt,
    Ast,
}

impl LabKind {
    pub const ALL: [LabKind; 11] = [
        LabKind::Hba1c,
        LabKind::TotalCholesterol,
        LabKind::Ldl,
        LabKind::Hdl,
        LabKind::Creatinine,
        LabKind::Egfr,
        LabKind::Uacr,
        LabKind::Glucose,
        LabKind::Bilirubin,
        LabKind::Alt,
        LabKind::Ast,
    ];

    /// Canonical name, also the legacy top-level field name.
    pub fn canonical_name(self) -> &'static str {
        match self {
            LabKind::Hba1c => "hba1c",
            LabKind::TotalCholesterol => "tc",
            LabKind::Ldl => "ldl",
            LabKind::Hdl => "hdl",
            LabKind::Creatinine => "creat",
            LabKind::Egfr => "egfr",
            LabKind::Uacr => "uacr",
            LabKind::Glucose => "glucose",
            LabKind::Bilirubin => "bilirubin",
            LabKind::Alt => "alt",
            LabKind::Ast => "ast",
        }
    }

    /// Lowercase names accepted in a lab list entry.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            LabKind::Hba1c => &["hba1c", "hba-1c", "a1c", "hemoglobin a1c"],
            LabKind::TotalCholesterol => &["tc", "total cholesterol"],
            LabKind::Ldl => &["ldl", "ldl-c", "ldl cholesterol"],
            LabKind::Hdl => &["hdl", "hdl-c", "hdl cholesterol"],
            LabKind::Creatinine => &["creat", "creatinine", "serum creatinine"],
            LabKind::Egfr => &["egfr"],
            LabKind::Uacr => &["uacr"],
            LabKind::Glucose => &["glucose", "fasting glucose"],
            LabKind::Bilirubin => &["bilirubin", "total bilirubin"],
            LabKind::Alt => &["alt"],
            LabKind::Ast => &["ast"],
        }
    }

    /// Case-insensitive match of a lab entry name.
    pub fn from_name(name: &str) -> Option<LabKind> {
        let lower = name.trim().to_lowercase();
        LabKind::ALL
            .into_iter()
            .find(|kind| kind.synonyms().iter().any(|synonym| *synonym == lower))
    }
}

/// Resolve one lab value for `kind`.
///
/// The first named entry of `labs` matching `kind` wins; otherwise the legacy
/// top-level field is used. Sources are never merged.
pub fn resolve_lab_value(record: &Value, kind: LabKind) -> Option<&Value> {
    if let Some(entries) = record.get("labs").and_then(Value::as_array) {
        for entry in entries {
            let Some(name) = entry.get("name").and_then(Value::as_str) else {
                log::trace!("skipping lab entry without a name");
                continue;
            };

            if LabKind::from_name(name) != Some(kind) {
                continue;
            }

            match entry.get("value") {
                Some(value) if !value.is_null() => return Some(value),
                _ => log::trace!("lab entry {name:?} has no value"),
            }
        }
    }

    record
        .get(kind.canonical_name())
        .filter(|value| !value.is_null())
}

enum NameMatch {
    Exact(&'static str),
    Contains(&'static str),
}

impl NameMatch {
    fn matches(&self, name: &str) -> bool {
        match self {
            NameMatch::Exact(expected) => name == *expected,
            NameMatch::Contains(fragment) => name.contains(fragment),
        }
    }
}

const PROJECTION_RULES: [(&str, &[NameMatch]); 11] = [
    ("hba1c", &[NameMatch::Contains("hba1c")]),
    ("alt", &[NameMatch::Exact("alt")]),
    ("ast", &[NameMatch::Exact("ast")]),
    ("creat", &[NameMatch::Contains("creat")]),
    ("egfr", &[NameMatch::Contains("egfr")]),
    ("uacr", &[NameMatch::Contains("uacr")]),
    ("bilirubin", &[NameMatch::Contains("bilirubin")]),
    (
        "tc",
        &[NameMatch::Exact("tc"), NameMatch::Contains("total cholesterol")],
    ),
    ("ldl", &[NameMatch::Exact("ldl")]),
    ("hdl", &[NameMatch::Exact("hdl")]),
    ("glucose", &[NameMatch::Exact("glucose")]),
];

/// Project a lab list onto the legacy top-level lab fields.
///
/// Later entries overwrite earlier ones. Entries without a name are skipped;
/// a present name with a null value projects as `null`.
pub fn project_labs(labs: &[Value]) -> Map<String, Value> {
    let mut projected = Map::new();

    for entry in labs {
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            log::debug!("lab projection: entry without a name skipped");
            continue;
        };
        let lower = name.trim().to_lowercase();
        let value = entry.get("value").cloned().unwrap_or(Value::Null);

        for (field, patterns) in PROJECTION_RULES.iter() {
            if patterns.iter().any(|pattern| pattern.matches(&lower)) {
                projected.insert((*field).to_string(), value.clone());
            }
        }
    }

    projected
}
