use std::fmt;

use serde::Serialize;
use tracing::warn;

use super::domain::{ApplicantInput, ApplicationRequest, RawNumber};

pub const MIN_CREDIT_SCORE: f64 = 300.0;
pub const MAX_CREDIT_SCORE: f64 = 900.0;
/// Ceiling for every monetary field. Derived ratios stay finite below it.
pub const MAX_AMOUNT: f64 = 1e12;
/// One hundredth of a currency unit.
pub const MIN_MONTHLY_INCOME: f64 = 0.01;

/// Request fields, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    MonthlyIncome,
    LoanAmount,
    CreditScore,
    ExistingLoans,
    MonthlyExpenses,
    EmploymentYears,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::MonthlyIncome => "monthly_income",
            Field::LoanAmount => "loan_amount",
            Field::CreditScore => "credit_score",
            Field::ExistingLoans => "existing_loans",
            Field::MonthlyExpenses => "monthly_expenses",
            Field::EmploymentYears => "employment_years",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level rejection raised before any computation happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: Field },
    #[error("{field} must be a finite number (found {found:?})")]
    NotNumeric { field: Field, found: String },
    #[error("{field} must be a whole number (found {found})")]
    NotIntegral { field: Field, found: f64 },
    #[error("{field} {requirement} (found {found})")]
    OutOfRange {
        field: Field,
        requirement: &'static str,
        found: f64,
    },
    #[error("{field} produced a zero denominator")]
    DivisionHazard { field: Field },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Missing { field }
            | ValidationError::NotNumeric { field, .. }
            | ValidationError::NotIntegral { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::DivisionHazard { field } => *field,
        }
    }
}

/// Normalize and range-check a raw request into an [`ApplicantInput`].
///
/// Fields are checked in wire order and the first failure wins. Values are rejected,
/// never clamped.
pub fn validate(request: &ApplicationRequest) -> Result<ApplicantInput, ValidationError> {
    let monthly_income = number(request, Field::MonthlyIncome)?;
    check_monthly_income(monthly_income)?;
    let loan_amount = number(request, Field::LoanAmount)?;
    check_loan_amount(loan_amount)?;
    let credit_score = whole_number(request, Field::CreditScore)?;
    check_credit_score(credit_score)?;
    let existing_loans = whole_number(request, Field::ExistingLoans)?;
    check_existing_loans(existing_loans)?;
    let monthly_expenses = number(request, Field::MonthlyExpenses)?;
    let employment_years = number(request, Field::EmploymentYears)?;

    ApplicantInput::new(
        monthly_income,
        loan_amount,
        credit_score as u16,
        existing_loans as u32,
        monthly_expenses,
        employment_years,
    )
}

fn number(request: &ApplicationRequest, field: Field) -> Result<f64, ValidationError> {
    let raw = request
        .raw(field)
        .ok_or(ValidationError::Missing { field })?;

    let value = match raw {
        RawNumber::Number(value) => *value,
        RawNumber::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::Missing { field });
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| ValidationError::NotNumeric {
                    field,
                    found: text.clone(),
                })?
        }
    };

    if !value.is_finite() {
        return Err(ValidationError::NotNumeric {
            field,
            found: value.to_string(),
        });
    }

    Ok(value)
}

fn whole_number(request: &ApplicationRequest, field: Field) -> Result<f64, ValidationError> {
    let value = number(request, field)?;
    if value.fract() != 0.0 {
        return Err(ValidationError::NotIntegral {
            field,
            found: value,
        });
    }
    Ok(value)
}

pub(crate) fn check_monthly_income(value: f64) -> Result<(), ValidationError> {
    positive(Field::MonthlyIncome, value)?;
    within(
        Field::MonthlyIncome,
        value,
        MIN_MONTHLY_INCOME,
        "must be between 0.01 and 1000000000000",
    )
}

pub(crate) fn check_loan_amount(value: f64) -> Result<(), ValidationError> {
    positive(Field::LoanAmount, value)?;
    within(Field::LoanAmount, value, 0.0, "must not exceed 1000000000000")
}

pub(crate) fn check_credit_score(value: f64) -> Result<(), ValidationError> {
    if (MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: Field::CreditScore,
            requirement: "must be between 300 and 900",
            found: value,
        })
    }
}

fn check_existing_loans(value: f64) -> Result<(), ValidationError> {
    let requirement = if value < 0.0 {
        "must not be negative"
    } else if value > f64::from(u32::MAX) {
        "must not exceed 4294967295"
    } else {
        return Ok(());
    };

    Err(ValidationError::OutOfRange {
        field: Field::ExistingLoans,
        requirement,
        found: value,
    })
}

pub(crate) fn check_monthly_expenses(value: f64) -> Result<(), ValidationError> {
    non_negative(Field::MonthlyExpenses, value)?;
    within(Field::MonthlyExpenses, value, 0.0, "must not exceed 1000000000000")
}

pub(crate) fn check_employment_years(value: f64) -> Result<(), ValidationError> {
    non_negative(Field::EmploymentYears, value)
}

fn positive(field: Field, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            requirement: "must be greater than zero",
            found: value,
        })
    }
}

fn non_negative(field: Field, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            requirement: "must not be negative",
            found: value,
        })
    }
}

fn within(
    field: Field,
    value: f64,
    min: f64,
    requirement: &'static str,
) -> Result<(), ValidationError> {
    if (min..=MAX_AMOUNT).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            requirement,
            found: value,
        })
    }
}

pub(crate) fn warn_on_soft_limits(input: &ApplicantInput) {
    if input.monthly_expenses() > input.monthly_income() {
        warn!(
            monthly_income = input.monthly_income(),
            monthly_expenses = input.monthly_expenses(),
            "monthly expenses exceed monthly income"
        );
    }
}
