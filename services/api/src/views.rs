use loan_risk::assessment::{AssessmentResult, DeclineReason, Tip};
use serde::{Deserialize, Serialize};

/// Wire shape returned by `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PredictionView {
    pub(crate) eligible: bool,
    pub(crate) confidence: f64,
    pub(crate) risk_score: f64,
    pub(crate) risk_category: String,
    pub(crate) monthly_emi: f64,
    pub(crate) disposable_income: f64,
    pub(crate) debt_to_income: f64,
    pub(crate) tips: Vec<String>,
    pub(crate) recommendations: Vec<Tip>,
    pub(crate) decline_reasons: Vec<String>,
}

impl From<&AssessmentResult> for PredictionView {
    fn from(result: &AssessmentResult) -> Self {
        Self {
            eligible: result.eligible,
            confidence: round2(result.confidence),
            risk_score: round2(result.risk_score),
            risk_category: result.risk_category.label().to_string(),
            monthly_emi: round2(result.monthly_emi),
            disposable_income: round2(result.disposable_income),
            debt_to_income: round2(result.debt_to_income_ratio),
            tips: result.tip_messages(),
            recommendations: result.tips.clone(),
            decline_reasons: result
                .decline_reasons
                .iter()
                .map(DeclineReason::summary)
                .collect(),
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
