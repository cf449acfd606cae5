use serde::{Deserialize, Serialize};

use super::config::{ConfidenceCurve, RiskPolicy, RiskWeights};
use super::domain::{ApplicantInput, DerivedFeatures, RiskFactor, ScoreComponent};

/// Output of a [`RiskScorer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    /// Aggregate risk in [0, 100], higher is riskier.
    pub risk_score: f64,
    /// Certainty of the decision in [0, 100].
    pub confidence: f64,
    /// Per-factor breakdown. May be empty for scorers that cannot attribute risk.
    pub components: Vec<ScoreComponent>,
}

impl RiskScore {
    pub fn contribution_of(&self, factor: RiskFactor) -> f64 {
        self.components
            .iter()
            .find(|component| component.factor == factor)
            .map(|component| component.contribution)
            .unwrap_or(0.0)
    }
}

/// Turns an applicant and their derived figures into a risk score.
///
/// Implementations must keep both outputs within [0, 100], never lower the score when
/// the credit score drops, and never lower it when existing loans increase.
pub trait RiskScorer: Send + Sync {
    fn score(&self, input: &ApplicantInput, features: &DerivedFeatures) -> RiskScore;
}

/// Linear blend of normalized sub-scores.
#[derive(Debug, Clone)]
pub struct WeightedRiskScorer {
    weights: RiskWeights,
    threshold: f64,
    curve: ConfidenceCurve,
}

impl WeightedRiskScorer {
    pub fn new(policy: &RiskPolicy) -> Self {
        Self {
            weights: policy.weights.clone(),
            threshold: policy.eligibility_threshold,
            curve: policy.confidence.clone(),
        }
    }

    fn weight_for(&self, factor: RiskFactor) -> f64 {
        match factor {
            RiskFactor::CreditHistory => self.weights.credit,
            RiskFactor::DebtLoad => self.weights.debt,
            RiskFactor::Employment => self.weights.employment,
            RiskFactor::ExistingLoans => self.weights.existing_loans,
            RiskFactor::Affordability => self.weights.affordability,
        }
    }
}

impl RiskScorer for WeightedRiskScorer {
    fn score(&self, input: &ApplicantInput, features: &DerivedFeatures) -> RiskScore {
        let components: Vec<ScoreComponent> = RiskFactor::ALL
            .iter()
            .map(|&factor| {
                let (sub_score, notes) = sub_score(factor, input, features);
                let weight = self.weight_for(factor);
                ScoreComponent {
                    factor,
                    sub_score,
                    weight,
                    contribution: sub_score * weight,
                    notes,
                }
            })
            .collect();

        let risk_score = components
            .iter()
            .map(|component| component.contribution)
            .sum::<f64>()
            .clamp(0.0, 100.0);
        let confidence = confidence(risk_score, self.threshold, &self.curve);

        RiskScore {
            risk_score,
            confidence,
            components,
        }
    }
}

fn sub_score(
    factor: RiskFactor,
    input: &ApplicantInput,
    features: &DerivedFeatures,
) -> (f64, String) {
    match factor {
        RiskFactor::CreditHistory => {
            let score = input.credit_score();
            let risk = (100.0 - (f64::from(score) - 300.0) / 6.0).max(0.0);
            (risk, format!("credit score {score}"))
        }
        RiskFactor::DebtLoad => {
            let dti = features.debt_to_income_ratio;
            (dti.min(100.0), format!("debt-to-income ratio {dti:.1}%"))
        }
        RiskFactor::Employment => {
            let years = input.employment_years();
            (
                (100.0 - years * 10.0).max(0.0),
                format!("{years:.1} year(s) of employment"),
            )
        }
        RiskFactor::ExistingLoans => {
            let loans = input.existing_loans();
            (
                (f64::from(loans) * 20.0).min(100.0),
                format!("{loans} existing loan(s)"),
            )
        }
        RiskFactor::Affordability => {
            let disposable = features.disposable_income;
            if disposable < 0.0 {
                (
                    100.0,
                    format!("monthly shortfall of {:.2}", disposable.abs()),
                )
            } else {
                (
                    (50.0 - disposable / 1000.0).max(0.0),
                    format!("disposable income {disposable:.2}"),
                )
            }
        }
    }
}

/// Lowest at the threshold and rising linearly in both directions.
pub(crate) fn confidence(risk_score: f64, threshold: f64, curve: &ConfidenceCurve) -> f64 {
    let distance = (risk_score - threshold).abs();
    (curve.floor + distance * curve.scale).clamp(curve.floor, curve.ceiling)
}
