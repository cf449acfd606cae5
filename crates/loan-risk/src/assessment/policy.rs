use super::config::{CategoryBands, RiskPolicy};
use super::domain::{DeclineReason, DerivedFeatures, RiskCategory};

/// Outcome of the eligibility ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityDecision {
    pub eligible: bool,
    pub risk_category: RiskCategory,
    pub decline_reasons: Vec<DeclineReason>,
}

pub(crate) fn categorize(risk_score: f64, bands: &CategoryBands) -> RiskCategory {
    if risk_score < bands.low_below {
        RiskCategory::Low
    } else if risk_score < bands.medium_below {
        RiskCategory::Medium
    } else {
        RiskCategory::High
    }
}

/// Apply the score threshold and the negative cash-flow gate.
pub fn classify(
    risk_score: f64,
    features: &DerivedFeatures,
    policy: &RiskPolicy,
) -> EligibilityDecision {
    let risk_category = categorize(risk_score, &policy.bands);
    let mut decline_reasons = Vec::new();

    if risk_score >= policy.eligibility_threshold {
        decline_reasons.push(DeclineReason::RiskAboveThreshold {
            risk_score,
            threshold: policy.eligibility_threshold,
        });
    }

    if features.disposable_income < 0.0 {
        decline_reasons.push(DeclineReason::NegativeCashFlow {
            disposable_income: features.disposable_income,
        });
    }

    // Reachable only with a policy that skipped validation.
    if risk_category == RiskCategory::High && decline_reasons.is_empty() {
        decline_reasons.push(DeclineReason::HighRiskBand);
    }

    EligibilityDecision {
        eligible: decline_reasons.is_empty(),
        risk_category,
        decline_reasons,
    }
}
