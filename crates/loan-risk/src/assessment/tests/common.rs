use crate::assessment::{
    derive_features, ApplicantInput, ApplicationRequest, DerivedFeatures, RawNumber, RiskAssessor,
    RiskPolicy,
};

pub(super) fn policy() -> RiskPolicy {
    RiskPolicy::default()
}

pub(super) fn assessor() -> RiskAssessor {
    RiskAssessor::new(policy()).expect("default policy is valid")
}

pub(super) fn applicant(
    monthly_income: f64,
    loan_amount: f64,
    credit_score: u16,
    existing_loans: u32,
    monthly_expenses: f64,
    employment_years: f64,
) -> ApplicantInput {
    ApplicantInput::new(
        monthly_income,
        loan_amount,
        credit_score,
        existing_loans,
        monthly_expenses,
        employment_years,
    )
    .expect("fixture applicant is valid")
}

/// Salaried applicant with a modest loan; lands in the low risk band.
pub(super) fn solid_applicant() -> ApplicantInput {
    applicant(50_000.0, 500_000.0, 750, 0, 20_000.0, 5.0)
}

/// Stretched applicant asking for a loan far beyond their means.
pub(super) fn stretched_applicant() -> ApplicantInput {
    applicant(20_000.0, 2_000_000.0, 450, 3, 15_000.0, 0.5)
}

/// Excellent history on every axis; no improvement rule should fire.
pub(super) fn pristine_applicant() -> ApplicantInput {
    applicant(100_000.0, 100_000.0, 900, 0, 0.0, 15.0)
}

/// Clean credit and tenure, but the instalment exceeds income.
pub(super) fn overextended_applicant() -> ApplicantInput {
    applicant(10_000.0, 2_000_000.0, 900, 0, 0.0, 15.0)
}

pub(super) fn features_for(input: &ApplicantInput) -> DerivedFeatures {
    derive_features(input, &policy().loan_terms).expect("features derive")
}

pub(super) fn request() -> ApplicationRequest {
    ApplicationRequest {
        monthly_income: Some(RawNumber::Number(50_000.0)),
        loan_amount: Some(RawNumber::Number(500_000.0)),
        credit_score: Some(RawNumber::Number(750.0)),
        existing_loans: Some(RawNumber::Number(0.0)),
        monthly_expenses: Some(RawNumber::Number(20_000.0)),
        employment_years: Some(RawNumber::Number(5.0)),
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
