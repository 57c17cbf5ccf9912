use serde_json::Value;

use super::{blood_pressure, Vitals};

/// Reported in place of an identifier that is missing or blank.
pub const UNKNOWN_ID: &str = "UNKNOWN_ID";

/// Why a record could not be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defect {
    MissingId,
    BloodPressure,
    Temperature,
    Age,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid(Vitals),
    Invalid(Vec<Defect>),
}

/// Field access over one untyped upstream record.
pub struct RawRecord<'a> {
    value: &'a Value,
}

impl<'a> RawRecord<'a> {
    pub fn new(value: &'a Value) -> Self {
        RawRecord { value }
    }

    fn field(&self, key: &str) -> Option<&'a Value> {
        self.value.get(key).filter(|v| !v.is_null())
    }

    /// `None` when `patient_id` is absent, null or blank.
    pub fn patient_id(&self) -> Option<String> {
        match self.field("patient_id")? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Identifier used in report sets.
    pub fn report_id(&self) -> String {
        self.patient_id().unwrap_or_else(|| UNKNOWN_ID.to_string())
    }

    pub fn blood_pressure(&self) -> Option<(u32, u32)> {
        match self.field("blood_pressure")? {
            Value::String(s) => blood_pressure::parse(s),
            _ => None,
        }
    }

    pub fn temperature(&self) -> Option<f64> {
        coerce_number(self.field("temperature"))
    }

    pub fn age(&self) -> Option<f64> {
        coerce_number(self.field("age"))
    }

    pub fn validate(&self) -> Validation {
        let mut defects = Vec::new();
        if self.patient_id().is_none() {
            defects.push(Defect::MissingId);
        }
        let bp = self.blood_pressure();
        if bp.is_none() {
            defects.push(Defect::BloodPressure);
        }
        let temperature = self.temperature();
        if temperature.is_none() {
            defects.push(Defect::Temperature);
        }
        let age = self.age();
        if age.is_none() {
            defects.push(Defect::Age);
        }

        match (bp, temperature, age) {
            (Some((systolic, diastolic)), Some(temperature), Some(age)) if defects.is_empty() => {
                Validation::Valid(Vitals {
                    systolic,
                    diastolic,
                    temperature,
                    age,
                })
            }
            _ => Validation::Invalid(defects),
        }
    }
}

/// JSON numbers and numeric text (surrounding whitespace allowed). Blank text,
/// booleans, containers and non-finite values do not coerce.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}
