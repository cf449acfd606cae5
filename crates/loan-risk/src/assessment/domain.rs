use serde::{Deserialize, Serialize};

use super::validation::{self, Field, ValidationError};

/// A single loosely-typed value as it arrives from a client.
///
/// Web forms routinely post numbers as strings, so both shapes are accepted and
/// resolved by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for RawNumber {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Applicant request exactly as received; nothing here has been checked yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    #[serde(default)]
    pub monthly_income: Option<RawNumber>,
    #[serde(default)]
    pub loan_amount: Option<RawNumber>,
    #[serde(default)]
    pub credit_score: Option<RawNumber>,
    #[serde(default)]
    pub existing_loans: Option<RawNumber>,
    #[serde(default)]
    pub monthly_expenses: Option<RawNumber>,
    #[serde(default)]
    pub employment_years: Option<RawNumber>,
}

impl ApplicationRequest {
    pub(crate) fn raw(&self, field: Field) -> Option<&RawNumber> {
        match field {
            Field::MonthlyIncome => self.monthly_income.as_ref(),
            Field::LoanAmount => self.loan_amount.as_ref(),
            Field::CreditScore => self.credit_score.as_ref(),
            Field::ExistingLoans => self.existing_loans.as_ref(),
            Field::MonthlyExpenses => self.monthly_expenses.as_ref(),
            Field::EmploymentYears => self.employment_years.as_ref(),
        }
    }
}

impl From<&ApplicantInput> for ApplicationRequest {
    fn from(input: &ApplicantInput) -> Self {
        Self {
            monthly_income: Some(input.monthly_income.into()),
            loan_amount: Some(input.loan_amount.into()),
            credit_score: Some(u32::from(input.credit_score).into()),
            existing_loans: Some(input.existing_loans.into()),
            monthly_expenses: Some(input.monthly_expenses.into()),
            employment_years: Some(input.employment_years.into()),
        }
    }
}

/// Validated applicant figures. Only constructible through [`ApplicantInput::new`] or the
/// request validator, so every instance satisfies the range rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApplicantInput {
    monthly_income: f64,
    loan_amount: f64,
    credit_score: u16,
    existing_loans: u32,
    monthly_expenses: f64,
    employment_years: f64,
}

impl ApplicantInput {
    pub fn new(
        monthly_income: f64,
        loan_amount: f64,
        credit_score: u16,
        existing_loans: u32,
        monthly_expenses: f64,
        employment_years: f64,
    ) -> Result<Self, ValidationError> {
        validation::check_monthly_income(monthly_income)?;
        validation::check_loan_amount(loan_amount)?;
        validation::check_credit_score(f64::from(credit_score))?;
        validation::check_monthly_expenses(monthly_expenses)?;
        validation::check_employment_years(employment_years)?;

        let input = Self {
            monthly_income,
            loan_amount,
            credit_score,
            existing_loans,
            monthly_expenses,
            employment_years,
        };
        validation::warn_on_soft_limits(&input);
        Ok(input)
    }

    pub fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    pub fn loan_amount(&self) -> f64 {
        self.loan_amount
    }

    pub fn credit_score(&self) -> u16 {
        self.credit_score
    }

    pub fn existing_loans(&self) -> u32 {
        self.existing_loans
    }

    pub fn monthly_expenses(&self) -> f64 {
        self.monthly_expenses
    }

    pub fn employment_years(&self) -> f64 {
        self.employment_years
    }
}

/// Secondary affordability figures computed from an [`ApplicantInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub monthly_emi: f64,
    /// Income left after expenses and the new instalment. Negative values are kept.
    pub disposable_income: f64,
    /// Percentage of monthly income consumed by expenses plus the instalment.
    pub debt_to_income_ratio: f64,
    /// Loan amount expressed in years of income.
    pub income_to_loan_ratio: f64,
}

/// Ordered risk bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk",
            RiskCategory::Medium => "Medium Risk",
            RiskCategory::High => "High Risk",
        }
    }
}

/// The scored dimensions of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    CreditHistory,
    DebtLoad,
    Employment,
    ExistingLoans,
    Affordability,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 5] = [
        RiskFactor::CreditHistory,
        RiskFactor::DebtLoad,
        RiskFactor::Employment,
        RiskFactor::ExistingLoans,
        RiskFactor::Affordability,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::CreditHistory => "credit history",
            RiskFactor::DebtLoad => "debt load",
            RiskFactor::Employment => "employment tenure",
            RiskFactor::ExistingLoans => "existing loans",
            RiskFactor::Affordability => "affordability",
        }
    }
}

/// Rendering tag attached to each tip so clients never have to parse the sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    CreditScore,
    DebtToIncome,
    LoanAmount,
    Employment,
    ExistingLoans,
    CashFlow,
    Strength,
}

/// One improvement suggestion produced by the recommendation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub category: TipCategory,
    /// Factor the tip addresses; `None` for the affirmative strong-profile tip.
    pub factor: Option<RiskFactor>,
    pub message: String,
}

/// Why an application was not approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclineReason {
    RiskAboveThreshold { risk_score: f64, threshold: f64 },
    NegativeCashFlow { disposable_income: f64 },
    HighRiskBand,
}

impl DeclineReason {
    pub fn summary(&self) -> String {
        match self {
            DeclineReason::RiskAboveThreshold {
                risk_score,
                threshold,
            } => format!(
                "risk score {:.2} is not below the eligibility threshold {:.2}",
                risk_score, threshold
            ),
            DeclineReason::NegativeCashFlow { disposable_income } => format!(
                "the instalment would leave a monthly shortfall of {:.2}",
                disposable_income.abs()
            ),
            DeclineReason::HighRiskBand => "profile falls in the high risk band".to_string(),
        }
    }
}

/// Weighted contribution of a single factor to the risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: RiskFactor,
    /// Normalized sub-score in [0, 100], higher is riskier.
    pub sub_score: f64,
    pub weight: f64,
    pub contribution: f64,
    pub notes: String,
}

/// Complete outcome of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub eligible: bool,
    pub confidence: f64,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub monthly_emi: f64,
    pub disposable_income: f64,
    pub debt_to_income_ratio: f64,
    pub income_to_loan_ratio: f64,
    pub tips: Vec<Tip>,
    pub decline_reasons: Vec<DeclineReason>,
    pub components: Vec<ScoreComponent>,
}

impl AssessmentResult {
    pub fn tip_messages(&self) -> Vec<String> {
        self.tips.iter().map(|tip| tip.message.clone()).collect()
    }

    pub fn decision_summary(&self) -> String {
        if self.eligible {
            format!("approved ({})", self.risk_category.label())
        } else if self.decline_reasons.is_empty() {
            format!("rejected ({})", self.risk_category.label())
        } else {
            let reasons: Vec<String> = self
                .decline_reasons
                .iter()
                .map(DeclineReason::summary)
                .collect();
            format!("rejected: {}", reasons.join("; "))
        }
    }
}
