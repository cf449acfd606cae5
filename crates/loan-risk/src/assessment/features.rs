use super::config::LoanTerms;
use super::domain::{ApplicantInput, DerivedFeatures};
use super::validation::{Field, ValidationError};

/// Reducing-balance instalment for `principal` under `terms`.
///
/// Falls back to straight division when the rate is zero.
pub fn monthly_emi(principal: f64, terms: &LoanTerms) -> f64 {
    let months = f64::from(terms.tenure_months.max(1));
    let rate = terms.monthly_rate();

    if rate == 0.0 {
        return principal / months;
    }

    // (1 + r)^n - 1, kept precise for tiny rates.
    let accrued = (months * rate.ln_1p()).exp_m1();
    if !accrued.is_finite() {
        // Interest-only limit of the schedule as the term grows without bound.
        return principal * rate;
    }
    principal * (rate + rate / accrued)
}

/// Compute the affordability figures consumed by scoring and recommendations.
pub fn derive_features(
    input: &ApplicantInput,
    terms: &LoanTerms,
) -> Result<DerivedFeatures, ValidationError> {
    let monthly_emi = monthly_emi(input.loan_amount(), terms);

    let income = input.monthly_income();
    let disposable_income = income - input.monthly_expenses() - monthly_emi;
    let debt_to_income_ratio =
        ratio(input.monthly_expenses() + monthly_emi, income, Field::MonthlyIncome)? * 100.0;
    let income_to_loan_ratio = ratio(input.loan_amount(), income, Field::MonthlyIncome)? / 12.0;

    Ok(DerivedFeatures {
        monthly_emi,
        disposable_income,
        debt_to_income_ratio,
        income_to_loan_ratio,
    })
}

/// Validated inputs keep the quotient finite; only a zero denominator is refused.
fn ratio(numerator: f64, denominator: f64, field: Field) -> Result<f64, ValidationError> {
    if denominator == 0.0 {
        return Err(ValidationError::DivisionHazard { field });
    }
    Ok(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emi_matches_reference_schedule() {
        let terms = LoanTerms {
            annual_interest_rate_percent: 12.0,
            tenure_months: 12,
        };
        let emi = monthly_emi(100_000.0, &terms);
        assert!((emi - 8_884.88).abs() < 0.01, "unexpected emi {emi}");
    }

    #[test]
    fn emi_at_zero_rate_is_straight_division() {
        let terms = LoanTerms {
            annual_interest_rate_percent: 0.0,
            tenure_months: 60,
        };
        assert_eq!(monthly_emi(60_000.0, &terms), 1_000.0);
    }

    #[test]
    fn emi_stays_finite_when_growth_overflows() {
        let terms = LoanTerms {
            annual_interest_rate_percent: 100.0,
            tenure_months: u32::MAX,
        };
        let emi = monthly_emi(1_000_000.0, &terms);
        assert!(emi.is_finite());
        assert!((emi - 1_000_000.0 / 12.0).abs() < 1e-6, "unexpected emi {emi}");
    }

    #[test]
    fn emi_at_vanishing_rate_approaches_straight_division() {
        let terms = LoanTerms {
            annual_interest_rate_percent: 1e-300,
            tenure_months: 60,
        };
        let emi = monthly_emi(60_000.0, &terms);
        assert!((emi - 1_000.0).abs() < 1e-6, "unexpected emi {emi}");
    }

    #[test]
    fn extreme_accepted_incomes_derive_finite_features() {
        let terms = LoanTerms::default();
        let cases = [
            (crate::assessment::MAX_AMOUNT, 500_000.0, 20_000.0),
            (crate::assessment::MIN_MONTHLY_INCOME, 500_000.0, 0.0),
            (
                crate::assessment::MIN_MONTHLY_INCOME,
                crate::assessment::MAX_AMOUNT,
                crate::assessment::MAX_AMOUNT,
            ),
        ];

        for (income, loan, expenses) in cases {
            let input = ApplicantInput::new(income, loan, 750, 0, expenses, 5.0)
                .expect("bounds are accepted");
            let features = derive_features(&input, &terms).expect("features derive");

            assert!(features.monthly_emi.is_finite());
            assert!(features.disposable_income.is_finite());
            assert!(features.debt_to_income_ratio.is_finite());
            assert!(features.income_to_loan_ratio.is_finite());
        }
    }
}
