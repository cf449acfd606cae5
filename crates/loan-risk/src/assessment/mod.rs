//! Loan eligibility and credit risk assessment.
//!
//! A request flows one way through the pipeline: validation, feature derivation,
//! scoring, classification and recommendations. Nothing is retained between calls, so a
//! single [`RiskAssessor`] can be shared freely across threads.

mod config;
mod domain;
mod features;
mod policy;
mod recommendations;
mod scoring;
mod validation;

#[cfg(test)]
mod tests;

pub use config::{
    CategoryBands, ConfidenceCurve, LoanTerms, PolicyError, RiskPolicy, RiskWeights,
};
pub use domain::{
    ApplicantInput, ApplicationRequest, AssessmentResult, DeclineReason, DerivedFeatures,
    RawNumber, RiskCategory, RiskFactor, ScoreComponent, Tip, TipCategory,
};
pub use features::{derive_features, monthly_emi};
pub use policy::{classify, EligibilityDecision};
pub use recommendations::generate_tips;
pub use scoring::{RiskScore, RiskScorer, WeightedRiskScorer};
pub use validation::{
    validate, Field, ValidationError, MAX_AMOUNT, MAX_CREDIT_SCORE, MIN_CREDIT_SCORE,
    MIN_MONTHLY_INCOME,
};

use tracing::debug;

/// Stateless orchestrator that sequences the assessment pipeline.
pub struct RiskAssessor {
    policy: RiskPolicy,
    scorer: Box<dyn RiskScorer>,
}

impl RiskAssessor {
    /// Build an assessor using the weighted rule scorer.
    pub fn new(policy: RiskPolicy) -> Result<Self, PolicyError> {
        let scorer = WeightedRiskScorer::new(&policy);
        Self::with_scorer(policy, scorer)
    }

    /// Build an assessor around an alternative scoring model.
    pub fn with_scorer<S>(policy: RiskPolicy, scorer: S) -> Result<Self, PolicyError>
    where
        S: RiskScorer + 'static,
    {
        policy.validate()?;
        Ok(Self {
            policy,
            scorer: Box::new(scorer),
        })
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Validate a raw request and assess it.
    pub fn assess(&self, request: &ApplicationRequest) -> Result<AssessmentResult, ValidationError> {
        let input = validate(request)?;
        self.assess_input(&input)
    }

    /// Assess an already validated applicant.
    pub fn assess_input(&self, input: &ApplicantInput) -> Result<AssessmentResult, ValidationError> {
        let features = derive_features(input, &self.policy.loan_terms)?;

        let mut score = self.scorer.score(input, &features);
        score.risk_score = bounded(score.risk_score, 100.0);
        score.confidence = bounded(score.confidence, self.policy.confidence.floor);

        let decision = classify(score.risk_score, &features, &self.policy);
        let tips = generate_tips(input, &features, &score);

        debug!(
            risk_score = score.risk_score,
            confidence = score.confidence,
            category = decision.risk_category.label(),
            eligible = decision.eligible,
            tips = tips.len(),
            "assessment complete"
        );

        Ok(AssessmentResult {
            eligible: decision.eligible,
            confidence: score.confidence,
            risk_score: score.risk_score,
            risk_category: decision.risk_category,
            monthly_emi: features.monthly_emi,
            disposable_income: features.disposable_income,
            debt_to_income_ratio: features.debt_to_income_ratio,
            income_to_loan_ratio: features.income_to_loan_ratio,
            tips,
            decline_reasons: decision.decline_reasons,
            components: score.components,
        })
    }
}

impl std::fmt::Debug for RiskAssessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskAssessor")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

// Alternative scorers are not trusted to respect the bounds.
fn bounded(value: f64, nan_fallback: f64) -> f64 {
    if value.is_nan() {
        nan_fallback
    } else {
        value.clamp(0.0, 100.0)
    }
}
