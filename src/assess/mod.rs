pub mod blood_pressure;
pub mod record;
pub mod risk;

use serde_json::Value;
use tracing::{debug, warn};

use record::{Defect, RawRecord, Validation};
use risk::RiskBreakdown;

/// Vitals of a record that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub systolic: u32,
    pub diastolic: u32,
    pub temperature: f64,
    pub age: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Scored(RiskBreakdown),
    Unscorable(Vec<Defect>),
}

/// Everything the report needs to know about one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub patient_id: String,
    pub verdict: Verdict,
    pub fever: bool,
}

impl Classification {
    pub fn is_high_risk(&self) -> bool {
        matches!(&self.verdict, Verdict::Scored(b) if b.is_high_risk())
    }

    pub fn has_quality_issue(&self) -> bool {
        matches!(self.verdict, Verdict::Unscorable(_))
    }
}

/// Validate, score and fever-check one raw record.
pub fn classify(value: &Value) -> Classification {
    let record = RawRecord::new(value);
    let patient_id = record.report_id();

    // Fever depends on temperature alone, whatever else is wrong with the record.
    let fever = record.temperature().is_some_and(risk::is_fever);

    let verdict = match record.validate() {
        Validation::Valid(vitals) => Verdict::Scored(RiskBreakdown::of(&vitals)),
        Validation::Invalid(defects) => Verdict::Unscorable(defects),
    };

    if fever && record.patient_id().is_none() {
        warn!(
            "Febrile record without patient_id, reporting it as {}",
            record::UNKNOWN_ID
        );
    }
    debug!(patient_id = %patient_id, ?verdict, fever, "classified record");

    Classification {
        patient_id,
        verdict,
        fever,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stage_two_elderly_is_high_risk() {
        let c = classify(&json!({
            "patient_id": "P1",
            "blood_pressure": "150/95",
            "temperature": 98.1,
            "age": 72
        }));
        assert_eq!(
            c.verdict,
            Verdict::Scored(RiskBreakdown {
                blood_pressure: 3,
                temperature: 0,
                age: 2
            })
        );
        assert!(c.is_high_risk());
        assert!(!c.fever);
    }

    #[test]
    fn normal_adult_is_low_risk() {
        let c = classify(&json!({
            "patient_id": "P2",
            "blood_pressure": "115/75",
            "temperature": "98.4",
            "age": "33"
        }));
        assert!(!c.is_high_risk());
        assert!(!c.has_quality_issue());
    }

    #[test]
    fn invalid_record_can_still_have_fever() {
        let c = classify(&json!({
            "patient_id": "P3",
            "blood_pressure": "N/A",
            "temperature": 101.4,
            "age": 50
        }));
        assert!(c.has_quality_issue());
        assert!(!c.is_high_risk());
        assert!(c.fever);
    }

    #[test]
    fn missing_id_uses_placeholder_everywhere() {
        let c = classify(&json!({
            "blood_pressure": "120/80",
            "temperature": 100.0,
            "age": 50
        }));
        assert_eq!(c.patient_id, record::UNKNOWN_ID);
        assert!(c.fever);
        assert_eq!(c.verdict, Verdict::Unscorable(vec![Defect::MissingId]));
    }

    #[test]
    fn unparseable_temperature_is_never_fever() {
        let c = classify(&json!({
            "patient_id": "P4",
            "blood_pressure": "120/80",
            "temperature": "hot",
            "age": 50
        }));
        assert!(!c.fever);
        assert!(c.has_quality_issue());
    }
}
