use serde::{Deserialize, Serialize};

const WEIGHT_TOLERANCE: f64 = 1e-6;
const MAX_ANNUAL_RATE_PERCENT: f64 = 100.0;

/// Fixed loan terms used to price the instalment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanTerms {
    pub annual_interest_rate_percent: f64,
    pub tenure_months: u32,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self {
            annual_interest_rate_percent: 8.5,
            tenure_months: 240,
        }
    }
}

impl LoanTerms {
    pub fn monthly_rate(&self) -> f64 {
        self.annual_interest_rate_percent / 12.0 / 100.0
    }
}

/// Relative importance of each risk factor. Must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub credit: f64,
    pub debt: f64,
    pub employment: f64,
    pub existing_loans: f64,
    pub affordability: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            credit: 0.35,
            debt: 0.25,
            employment: 0.10,
            existing_loans: 0.15,
            affordability: 0.15,
        }
    }
}

impl RiskWeights {
    fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("credit", self.credit),
            ("debt", self.debt),
            ("employment", self.employment),
            ("existing_loans", self.existing_loans),
            ("affordability", self.affordability),
        ]
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, weight)| weight).sum()
    }
}

/// Upper bounds (exclusive) of the low and medium risk bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryBands {
    pub low_below: f64,
    pub medium_below: f64,
}

impl Default for CategoryBands {
    fn default() -> Self {
        Self {
            low_below: 33.0,
            medium_below: 66.0,
        }
    }
}

/// Shape of the confidence curve around the eligibility threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceCurve {
    pub floor: f64,
    pub ceiling: f64,
    /// Confidence points gained per point of distance from the threshold.
    pub scale: f64,
}

impl Default for ConfidenceCurve {
    fn default() -> Self {
        Self {
            floor: 50.0,
            ceiling: 99.0,
            scale: 1.0,
        }
    }
}

/// Every tunable constant of the assessment pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    pub loan_terms: LoanTerms,
    pub weights: RiskWeights,
    /// Scores strictly below this value are eligible.
    pub eligibility_threshold: f64,
    pub bands: CategoryBands,
    pub confidence: ConfidenceCurve,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            loan_terms: LoanTerms::default(),
            weights: RiskWeights::default(),
            eligibility_threshold: 50.0,
            bands: CategoryBands::default(),
            confidence: ConfidenceCurve::default(),
        }
    }
}

impl RiskPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        let terms = &self.loan_terms;
        if !terms.annual_interest_rate_percent.is_finite()
            || !(0.0..=MAX_ANNUAL_RATE_PERCENT).contains(&terms.annual_interest_rate_percent)
        {
            return Err(PolicyError::InterestRate(
                terms.annual_interest_rate_percent,
            ));
        }
        if terms.tenure_months == 0 {
            return Err(PolicyError::ZeroTenure);
        }

        for (name, weight) in self.weights.entries() {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(PolicyError::Weight { name, value: weight });
            }
        }
        let total = self.weights.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(PolicyError::WeightSum(total));
        }

        let bands = &self.bands;
        let ordered = bands.low_below.is_finite()
            && bands.medium_below.is_finite()
            && 0.0 < bands.low_below
            && bands.low_below < bands.medium_below
            && bands.medium_below < 100.0;
        if !ordered {
            return Err(PolicyError::Bands {
                low_below: bands.low_below,
                medium_below: bands.medium_below,
            });
        }

        let threshold = self.eligibility_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(PolicyError::Threshold(threshold));
        }
        if threshold > bands.medium_below {
            return Err(PolicyError::ThresholdInHighBand {
                threshold,
                medium_below: bands.medium_below,
            });
        }

        let curve = &self.confidence;
        let curve_valid = curve.floor.is_finite()
            && curve.ceiling.is_finite()
            && curve.scale.is_finite()
            && curve.scale >= 0.0
            && 0.0 <= curve.floor
            && curve.floor <= curve.ceiling
            && curve.ceiling <= 100.0;
        if !curve_valid {
            return Err(PolicyError::Confidence {
                floor: curve.floor,
                ceiling: curve.ceiling,
                scale: curve.scale,
            });
        }

        Ok(())
    }
}

/// Reasons a policy is refused at load time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("annual interest rate must be a percentage between 0 and 100 (found {0})")]
    InterestRate(f64),
    #[error("loan tenure must be at least one month")]
    ZeroTenure,
    #[error("weight `{name}` must lie in [0, 1] (found {value})")]
    Weight { name: &'static str, value: f64 },
    #[error("risk weights must sum to 1.0 (found {0:.6})")]
    WeightSum(f64),
    #[error("risk bands must satisfy 0 < low ({low_below}) < medium ({medium_below}) < 100")]
    Bands { low_below: f64, medium_below: f64 },
    #[error("eligibility threshold must be positive (found {0})")]
    Threshold(f64),
    #[error("eligibility threshold {threshold} reaches into the high risk band (starts at {medium_below})")]
    ThresholdInHighBand { threshold: f64, medium_below: f64 },
    #[error("confidence curve is invalid (floor {floor}, ceiling {ceiling}, scale {scale})")]
    Confidence { floor: f64, ceiling: f64, scale: f64 },
}
