//! Manual fire-risk estimate from four environmental inputs.

use serde::{Deserialize, Serialize};

use crate::domain::{RiskTier, Swatch};
use crate::error::InputError;

const NDVI_WEIGHT: f64 = 0.532;
const LST_WEIGHT: f64 = 0.058 / 100.0;
const SLOPE_WEIGHT: f64 = 0.121 / 100.0;
const ELEVATION_WEIGHT: f64 = 0.257 / 10_000.0;

const HIGH_RISK_ABOVE: f64 = 0.7;
const MEDIUM_RISK_ABOVE: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Vegetation index, expected in 0..=1.
    pub ndvi: f64,
    /// Land-surface temperature in °C.
    pub lst: f64,
    /// Slope in degrees.
    pub slope: f64,
    /// Elevation in metres.
    pub elevation: f64,
}

impl Default for PredictionInput {
    fn default() -> Self {
        Self {
            ndvi: 0.7,
            lst: 28.0,
            slope: 25.0,
            elevation: 1800.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub score: f64,
    pub tier: RiskTier,
}

impl PredictionResult {
    pub const fn swatch(&self) -> Swatch {
        self.tier.swatch()
    }

    pub fn percent(&self) -> String {
        format!("{:.1}%", self.score * 100.0)
    }
}

pub fn estimate(input: PredictionInput) -> PredictionResult {
    let raw = input.ndvi.mul_add(
        NDVI_WEIGHT,
        input.lst.mul_add(
            LST_WEIGHT,
            input
                .slope
                .mul_add(SLOPE_WEIGHT, input.elevation * ELEVATION_WEIGHT),
        ),
    );
    let score = raw.clamp(0.0, 1.0);

    let tier = if score > HIGH_RISK_ABOVE {
        RiskTier::High
    } else if score > MEDIUM_RISK_ABOVE {
        RiskTier::Medium
    } else {
        RiskTier::Low
    };

    PredictionResult { score, tier }
}

/// Field order used by the input forms.
pub const FIELD_LABELS: [(&str, &str); 4] = [
    ("NDVI", "0-1"),
    ("Temperature (°C)", ">25 = high risk"),
    ("Slope (°)", ">20 = steep"),
    ("Elevation (m)", "1200-2500 = pine"),
];

/// Parses one form field. Only finite numbers are accepted.
pub fn parse_field(field: &'static str, value: &str) -> Result<f64, InputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InputError::Missing { field });
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| InputError::NotNumeric {
            field,
            value: trimmed.to_string(),
        })
}

/// Builds an input from the four form fields, in `FIELD_LABELS` order.
pub fn parse_form(fields: [&str; 4]) -> Result<PredictionInput, InputError> {
    Ok(PredictionInput {
        ndvi: parse_field(FIELD_LABELS[0].0, fields[0])?,
        lst: parse_field(FIELD_LABELS[1].0, fields[1])?,
        slope: parse_field(FIELD_LABELS[2].0, fields[2])?,
        elevation: parse_field(FIELD_LABELS[3].0, fields[3])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    #[test]
    fn all_zero_is_low() {
        let result = estimate(PredictionInput {
            ndvi: 0.0,
            lst: 0.0,
            slope: 0.0,
            elevation: 0.0,
        });
        assert_close(result.score, 0.0);
        assert_eq!(result.tier, RiskTier::Low);
    }

    #[test]
    fn saturated_inputs_clamp_to_one() {
        let result = estimate(PredictionInput {
            ndvi: 1.0,
            lst: 100.0,
            slope: 100.0,
            elevation: 10_000.0,
        });
        assert!(result.score <= 1.0);
        assert_eq!(result.tier, RiskTier::High);
        assert_eq!(result.swatch().name, "red");
    }

    #[test]
    fn default_form_values_are_medium() {
        let result = estimate(PredictionInput::default());
        let expected = 0.7 * 0.532 + 28.0 * 0.058 / 100.0 + 25.0 * 0.121 / 100.0
            + 1800.0 * 0.257 / 10_000.0;
        assert_close(result.score, expected);
        assert!((result.score - 0.4652).abs() < 1e-3);
        assert_eq!(result.tier, RiskTier::Medium);
        assert_eq!(result.percent(), "46.5%");
    }

    #[test]
    fn negative_scores_clamp_to_zero() {
        let result = estimate(PredictionInput {
            ndvi: -1.0,
            lst: -10.0,
            slope: 0.0,
            elevation: 0.0,
        });
        assert_close(result.score, 0.0);
        assert_eq!(result.tier, RiskTier::Low);
    }

    #[test]
    fn tier_boundaries_are_exclusive() {
        let at_medium = estimate(PredictionInput {
            ndvi: 0.4 / 0.532,
            lst: 0.0,
            slope: 0.0,
            elevation: 0.0,
        });
        assert!(at_medium.score <= 0.4 + 1e-12);
        assert_ne!(at_medium.tier, RiskTier::High);
    }

    #[test]
    fn form_parsing_rejects_bad_numbers() {
        assert_eq!(parse_field("NDVI", " 0.5 "), Ok(0.5));
        assert_eq!(parse_field("NDVI", ""), Err(InputError::Missing { field: "NDVI" }));
        assert!(matches!(
            parse_field("NDVI", "abc"),
            Err(InputError::NotNumeric { .. })
        ));
        assert!(parse_field("NDVI", "inf").is_err());
        assert_eq!(parse_form(["0.7", "28", "25", "1800"]), Ok(PredictionInput::default()));
    }
}
