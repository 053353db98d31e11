//! Rain risk classification.
//!
//! A sample is rainy when its WMO code is a drizzle/rain/shower code (or a
//! thunderstorm code, if enabled), or when probability or amount exceed the
//! rain thresholds. Severity then escalates through the moderate and heavy
//! thresholds. All limits live in [`RainThresholds`] so user settings can
//! feed them.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::forecast::wmo::{HEAVY_RAIN_CODES, MODERATE_RAIN_CODES, RAIN_CODES, THUNDERSTORM_CODES};
use crate::forecast::ForecastSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RainSeverity {
    #[default]
    None,
    Light,
    Moderate,
    Heavy,
}

impl RainSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RainRisk {
    pub is_rainy: bool,
    pub severity: RainSeverity,
}

/// Threshold table for the classifier.
///
/// `rain_*` limits are exclusive (`>`); `moderate_*` and `heavy_*` limits are
/// inclusive (`>=`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainThresholds {
    #[serde(default = "default_rain_probability")]
    pub rain_probability: u8,
    #[serde(default = "default_rain_amount_mm")]
    pub rain_amount_mm: f64,
    #[serde(default = "default_moderate_probability")]
    pub moderate_probability: u8,
    #[serde(default = "default_moderate_amount_mm")]
    pub moderate_amount_mm: f64,
    #[serde(default = "default_heavy_probability")]
    pub heavy_probability: u8,
    #[serde(default = "default_heavy_amount_mm")]
    pub heavy_amount_mm: f64,
    #[serde(default = "default_true")]
    pub include_thunderstorms: bool,
}

fn default_rain_probability() -> u8 {
    20
}
fn default_rain_amount_mm() -> f64 {
    0.1
}
fn default_moderate_probability() -> u8 {
    40
}
fn default_moderate_amount_mm() -> f64 {
    0.3
}
fn default_heavy_probability() -> u8 {
    70
}
fn default_heavy_amount_mm() -> f64 {
    1.0
}
fn default_true() -> bool {
    true
}

impl Default for RainThresholds {
    fn default() -> Self {
        Self {
            rain_probability: default_rain_probability(),
            rain_amount_mm: default_rain_amount_mm(),
            moderate_probability: default_moderate_probability(),
            moderate_amount_mm: default_moderate_amount_mm(),
            heavy_probability: default_heavy_probability(),
            heavy_amount_mm: default_heavy_amount_mm(),
            include_thunderstorms: true,
        }
    }
}

impl RainThresholds {
    /// Replace the rain-alert probability, as chosen in user settings.
    pub fn with_alert_probability(mut self, probability: u8) -> Self {
        self.rain_probability = probability;
        self
    }

    /// Check ranges and that moderate limits do not exceed heavy ones.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("rain_probability", self.rain_probability),
            ("moderate_probability", self.moderate_probability),
            ("heavy_probability", self.heavy_probability),
        ] {
            if value > 100 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    message: format!("{value} is not a percentage"),
                });
            }
        }
        for (field, value) in [
            ("rain_amount_mm", self.rain_amount_mm),
            ("moderate_amount_mm", self.moderate_amount_mm),
            ("heavy_amount_mm", self.heavy_amount_mm),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    message: format!("{value} must be a non-negative amount"),
                });
            }
        }
        if self.moderate_probability > self.heavy_probability {
            return Err(ValidationError::UnorderedThresholds {
                lower: "moderate_probability",
                lower_value: f64::from(self.moderate_probability),
                upper: "heavy_probability",
                upper_value: f64::from(self.heavy_probability),
            });
        }
        if self.moderate_amount_mm > self.heavy_amount_mm {
            return Err(ValidationError::UnorderedThresholds {
                lower: "moderate_amount_mm",
                lower_value: self.moderate_amount_mm,
                upper: "heavy_amount_mm",
                upper_value: self.heavy_amount_mm,
            });
        }
        Ok(())
    }
}

/// Classifies forecast samples against a validated threshold table.
#[derive(Debug, Clone, Default)]
pub struct RainClassifier {
    thresholds: RainThresholds,
}

impl RainClassifier {
    pub fn new(thresholds: RainThresholds) -> Result<Self, ValidationError> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &RainThresholds {
        &self.thresholds
    }

    pub fn classify(&self, sample: &ForecastSample) -> RainRisk {
        let t = &self.thresholds;
        let code = sample.weather_code;
        let probability = sample.precipitation_probability;
        let amount = sample.precipitation_amount;

        let rain_code = RAIN_CODES.contains(&code)
            || (t.include_thunderstorms && THUNDERSTORM_CODES.contains(&code));
        let is_rainy = rain_code || probability > t.rain_probability || amount > t.rain_amount_mm;
        if !is_rainy {
            return RainRisk::default();
        }

        let severity = if probability >= t.heavy_probability
            || amount >= t.heavy_amount_mm
            || HEAVY_RAIN_CODES.contains(&code)
        {
            RainSeverity::Heavy
        } else if probability >= t.moderate_probability
            || amount >= t.moderate_amount_mm
            || MODERATE_RAIN_CODES.contains(&code)
        {
            RainSeverity::Moderate
        } else {
            RainSeverity::Light
        };

        RainRisk {
            is_rainy: true,
            severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use proptest::prelude::*;

    fn sample(probability: u8, amount: f64, code: u16) -> ForecastSample {
        ForecastSample {
            timestamp: DateTime::parse_from_rfc3339("2025-06-02T08:00:00+03:00").unwrap(),
            temperature: 15.0,
            precipitation_probability: probability,
            precipitation_amount: amount,
            weather_code: code,
            wind_speed: 10.0,
        }
    }

    fn severity(probability: u8, amount: f64, code: u16) -> RainSeverity {
        RainClassifier::default()
            .classify(&sample(probability, amount, code))
            .severity
    }

    #[test]
    fn dry_sample_is_not_rainy() {
        let risk = RainClassifier::default().classify(&sample(20, 0.1, 2));
        assert_eq!(risk, RainRisk { is_rainy: false, severity: RainSeverity::None });
    }

    #[test]
    fn probability_thresholds() {
        assert_eq!(severity(21, 0.0, 0), RainSeverity::Light);
        assert_eq!(severity(39, 0.0, 0), RainSeverity::Light);
        assert_eq!(severity(40, 0.0, 0), RainSeverity::Moderate);
        assert_eq!(severity(69, 0.0, 0), RainSeverity::Moderate);
        assert_eq!(severity(70, 0.0, 0), RainSeverity::Heavy);
        assert_eq!(severity(80, 0.0, 0), RainSeverity::Heavy);
    }

    #[test]
    fn amount_thresholds() {
        assert_eq!(severity(0, 0.11, 0), RainSeverity::Light);
        assert_eq!(severity(0, 0.3, 0), RainSeverity::Moderate);
        assert_eq!(severity(0, 1.0, 0), RainSeverity::Heavy);
    }

    #[test]
    fn weather_codes_flag_and_escalate() {
        assert_eq!(severity(0, 0.0, 51), RainSeverity::Light);
        assert_eq!(severity(0, 0.0, 63), RainSeverity::Moderate);
        assert_eq!(severity(0, 0.0, 81), RainSeverity::Moderate);
        assert_eq!(severity(0, 0.0, 65), RainSeverity::Heavy);
        assert_eq!(severity(0, 0.0, 82), RainSeverity::Heavy);
        assert_eq!(severity(0, 0.0, 95), RainSeverity::Light);
        assert_eq!(severity(0, 0.0, 71), RainSeverity::None);
    }

    #[test]
    fn thunderstorms_can_be_excluded() {
        let classifier = RainClassifier::new(RainThresholds {
            include_thunderstorms: false,
            ..RainThresholds::default()
        })
        .unwrap();
        assert!(!classifier.classify(&sample(0, 0.0, 95)).is_rainy);
    }

    #[test]
    fn alert_probability_feeds_rain_flag() {
        let classifier =
            RainClassifier::new(RainThresholds::default().with_alert_probability(30)).unwrap();
        assert!(!classifier.classify(&sample(25, 0.0, 0)).is_rainy);
        assert!(classifier.classify(&sample(31, 0.0, 0)).is_rainy);
    }

    #[test]
    fn unordered_thresholds_are_rejected() {
        let err = RainClassifier::new(RainThresholds {
            moderate_probability: 80,
            heavy_probability: 70,
            ..RainThresholds::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::UnorderedThresholds { .. }));

        let err = RainClassifier::new(RainThresholds {
            heavy_amount_mm: -1.0,
            ..RainThresholds::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    proptest! {
        #[test]
        fn severity_is_monotonic_in_probability(
            low in 0u8..=100,
            bump in 0u8..=100,
            amount in 0.0f64..3.0,
            code in prop::sample::select(vec![0u16, 2, 51, 61, 63, 65, 71, 80, 81, 82, 95]),
            alert in 0u8..=100,
        ) {
            let high = low.saturating_add(bump).min(100);
            let classifier = RainClassifier::new(
                RainThresholds::default().with_alert_probability(alert),
            ).unwrap();
            let a = classifier.classify(&sample(low, amount, code));
            let b = classifier.classify(&sample(high, amount, code));
            prop_assert!(b.severity >= a.severity);
            prop_assert!(b.is_rainy || !a.is_rainy);
        }

        #[test]
        fn severity_is_monotonic_in_amount(
            probability in 0u8..=100,
            low in 0.0f64..3.0,
            bump in 0.0f64..3.0,
        ) {
            let classifier = RainClassifier::default();
            let a = classifier.classify(&sample(probability, low, 0));
            let b = classifier.classify(&sample(probability, low + bump, 0));
            prop_assert!(b.severity >= a.severity);
        }
    }
}
