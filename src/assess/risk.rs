//! Deterministic risk scoring.
//!
//! Each sub-score is a chain of bands checked top to bottom; the first band
//! that matches wins and a value falling between bands scores 0.

use serde::Serialize;

use super::Vitals;

pub const HIGH_RISK_THRESHOLD: u8 = 4;
pub const FEVER_THRESHOLD: f64 = 99.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    pub blood_pressure: u8,
    pub temperature: u8,
    pub age: u8,
}

impl RiskBreakdown {
    pub fn of(vitals: &Vitals) -> Self {
        RiskBreakdown {
            blood_pressure: blood_pressure_score(vitals.systolic, vitals.diastolic),
            temperature: temperature_score(vitals.temperature),
            age: age_score(vitals.age),
        }
    }

    pub fn total(&self) -> u8 {
        self.blood_pressure + self.temperature + self.age
    }

    pub fn is_high_risk(&self) -> bool {
        self.total() >= HIGH_RISK_THRESHOLD
    }
}

pub fn score(systolic: u32, diastolic: u32, temperature: f64, age: f64) -> u8 {
    blood_pressure_score(systolic, diastolic) + temperature_score(temperature) + age_score(age)
}

pub fn blood_pressure_score(systolic: u32, diastolic: u32) -> u8 {
    if systolic < 120 && diastolic < 80 {
        0
    } else if (120..130).contains(&systolic) && diastolic < 80 {
        1
    } else if (130..140).contains(&systolic) || (80..90).contains(&diastolic) {
        2
    } else if systolic >= 140 || diastolic >= 90 {
        3
    } else {
        0
    }
}

pub fn temperature_score(temperature: f64) -> u8 {
    if temperature <= 99.5 {
        0
    } else if (99.6..=100.9).contains(&temperature) {
        1
    } else if temperature >= 101.0 {
        2
    } else {
        0
    }
}

pub fn age_score(age: f64) -> u8 {
    if age > 65.0 {
        2
    } else if age <= 65.0 {
        // under 40 and 40..=65 weigh the same
        1
    } else {
        // NaN
        0
    }
}

pub fn is_fever(temperature: f64) -> bool {
    temperature >= FEVER_THRESHOLD
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn elevated_boundary() {
        assert_eq!(blood_pressure_score(120, 79), 1);
        assert_eq!(temperature_score(99.5), 0);
        assert_eq!(age_score(39.0), 1);
        assert_eq!(score(120, 79, 99.5, 39.0), 2);
    }

    #[test]
    fn worst_case() {
        assert_eq!(blood_pressure_score(140, 70), 3);
        assert_eq!(temperature_score(101.0), 2);
        assert_eq!(age_score(70.0), 2);
        assert_eq!(score(140, 70, 101.0, 70.0), 7);
    }

    #[test]
    fn normal_boundary() {
        assert_eq!(blood_pressure_score(119, 79), 0);
        assert_eq!(score(119, 79, 99.5, 39.0), 1);
    }

    #[test]
    fn blood_pressure_bands() {
        assert_eq!(blood_pressure_score(129, 79), 1);
        assert_eq!(blood_pressure_score(130, 70), 2);
        assert_eq!(blood_pressure_score(110, 80), 2);
        assert_eq!(blood_pressure_score(139, 89), 2);
        assert_eq!(blood_pressure_score(110, 90), 3);
        assert_eq!(blood_pressure_score(125, 95), 3);
        // stage-1 diastolic wins over stage-2 systolic: first matching band
        assert_eq!(blood_pressure_score(150, 85), 2);
    }

    #[test]
    fn temperature_gaps_score_zero() {
        assert_eq!(temperature_score(99.55), 0);
        assert_eq!(temperature_score(99.6), 1);
        assert_eq!(temperature_score(100.9), 1);
        assert_eq!(temperature_score(100.95), 0);
        assert_eq!(temperature_score(f64::NAN), 0);
    }

    #[test]
    fn age_bands() {
        assert_eq!(age_score(0.0), 1);
        assert_eq!(age_score(40.0), 1);
        assert_eq!(age_score(65.0), 1);
        assert_eq!(age_score(65.5), 2);
    }

    proptest! {
        #[test]
        fn total_over_any_input(
            systolic in any::<u32>(),
            diastolic in any::<u32>(),
            temperature in any::<f64>(),
            age in any::<f64>(),
        ) {
            let first = score(systolic, diastolic, temperature, age);
            prop_assert_eq!(first, score(systolic, diastolic, temperature, age));
            prop_assert!(first <= 7);

            prop_assert!(blood_pressure_score(systolic, diastolic) <= 3);
            prop_assert!(temperature_score(temperature) <= 2);
            let age_part = age_score(age);
            if age.is_nan() {
                prop_assert_eq!(age_part, 0);
            } else {
                prop_assert!(age_part == 1 || age_part == 2);
            }
            prop_assert_eq!(
                first,
                blood_pressure_score(systolic, diastolic) + temperature_score(temperature) + age_part
            );
        }

        #[test]
        fn plausible_vitals_stay_in_range(
            systolic in 60u32..260,
            diastolic in 30u32..160,
            temperature in 90.0f64..110.0,
            age in 0.0f64..120.0,
        ) {
            let vitals = Vitals { systolic, diastolic, temperature, age };
            let b = RiskBreakdown::of(&vitals);
            prop_assert!((1..=7).contains(&b.total()));
            prop_assert_eq!(b.is_high_risk(), b.total() >= HIGH_RISK_THRESHOLD);
            // any temperature points imply the fever threshold was crossed
            prop_assert!(temperature_score(temperature) == 0 || is_fever(temperature));
        }
    }

    #[test]
    fn breakdown_matches_score() {
        let vitals = Vitals {
            systolic: 145,
            diastolic: 92,
            temperature: 100.2,
            age: 67.0,
        };
        let b = RiskBreakdown::of(&vitals);
        assert_eq!(
            b,
            RiskBreakdown {
                blood_pressure: 3,
                temperature: 1,
                age: 2
            }
        );
        assert_eq!(b.total(), score(145, 92, 100.2, 67.0));
        assert!(b.is_high_risk());
    }
}
