use super::domain::{ApplicantInput, DerivedFeatures, RiskFactor, Tip, TipCategory};
use super::scoring::RiskScore;

const FAIR_CREDIT_BELOW: u16 = 700;
const GOOD_CREDIT_BELOW: u16 = 750;
const HIGH_DTI_ABOVE: f64 = 50.0;
const ELEVATED_DTI_ABOVE: f64 = 36.0;
const OVERSIZED_LOAN_YEARS_ABOVE: f64 = 5.0;
const LARGE_LOAN_YEARS_ABOVE: f64 = 3.0;
const MANY_LOANS_ABOVE: u32 = 2;
const NEW_JOB_YEARS_BELOW: f64 = 1.0;
const SHORT_TENURE_YEARS_BELOW: f64 = 2.0;
const THIN_BUFFER_SHARE: f64 = 0.10;

const STRONG_PROFILE: &str =
    "Strong profile! Compare offers from 3-4 lenders to lock in the best interest rate.";

struct RuleContext<'a> {
    input: &'a ApplicantInput,
    features: &'a DerivedFeatures,
}

type Rule = fn(&RuleContext<'_>) -> Option<Tip>;

/// Evaluated in this order; the order breaks ties between equally weighted factors.
const RULES: [Rule; 6] = [
    credit_rule,
    debt_rule,
    cash_flow_rule,
    loan_size_rule,
    existing_loans_rule,
    employment_rule,
];

/// Produce improvement tips, most influential factor first.
///
/// Never empty: a profile that trips no rule receives a single affirmative tip.
pub fn generate_tips(
    input: &ApplicantInput,
    features: &DerivedFeatures,
    score: &RiskScore,
) -> Vec<Tip> {
    let context = RuleContext { input, features };
    let mut tips: Vec<Tip> = RULES.iter().filter_map(|rule| rule(&context)).collect();

    if tips.is_empty() {
        return vec![Tip {
            category: TipCategory::Strength,
            factor: None,
            message: STRONG_PROFILE.to_string(),
        }];
    }

    tips.sort_by(|left, right| {
        let left = left.factor.map(|f| score.contribution_of(f)).unwrap_or(0.0);
        let right = right.factor.map(|f| score.contribution_of(f)).unwrap_or(0.0);
        right.total_cmp(&left)
    });
    tips
}

fn tip(factor: RiskFactor, category: TipCategory, message: impl Into<String>) -> Option<Tip> {
    Some(Tip {
        category,
        factor: Some(factor),
        message: message.into(),
    })
}

fn credit_rule(context: &RuleContext<'_>) -> Option<Tip> {
    let score = context.input.credit_score();
    if score < FAIR_CREDIT_BELOW {
        tip(
            RiskFactor::CreditHistory,
            TipCategory::CreditScore,
            format!(
                "Improve your credit score from {score} to 750+ for better loan terms. Pay bills on time and reduce credit utilization."
            ),
        )
    } else if score < GOOD_CREDIT_BELOW {
        tip(
            RiskFactor::CreditHistory,
            TipCategory::CreditScore,
            format!("Good credit score of {score}! Aim for 750+ to get the best interest rates."),
        )
    } else {
        None
    }
}

fn debt_rule(context: &RuleContext<'_>) -> Option<Tip> {
    let dti = context.features.debt_to_income_ratio;
    if dti > HIGH_DTI_ABOVE {
        tip(
            RiskFactor::DebtLoad,
            TipCategory::DebtToIncome,
            format!(
                "Your debt-to-income ratio is high ({dti:.1}%, above 50%). Reduce monthly expenses or increase income."
            ),
        )
    } else if dti > ELEVATED_DTI_ABOVE {
        tip(
            RiskFactor::DebtLoad,
            TipCategory::DebtToIncome,
            format!(
                "Your debt-to-income ratio of {dti:.1}% is above the 36% comfort level. Consider a smaller loan or lower monthly expenses."
            ),
        )
    } else {
        None
    }
}

fn cash_flow_rule(context: &RuleContext<'_>) -> Option<Tip> {
    let disposable = context.features.disposable_income;
    if disposable < 0.0 {
        tip(
            RiskFactor::Affordability,
            TipCategory::CashFlow,
            format!(
                "This loan would leave a monthly shortfall of {:.2}. Reduce the loan amount or your fixed expenses before applying.",
                disposable.abs()
            ),
        )
    } else if disposable < context.input.monthly_income() * THIN_BUFFER_SHARE {
        tip(
            RiskFactor::Affordability,
            TipCategory::CashFlow,
            "Less than 10% of your income would remain each month. Build an emergency fund covering 6 months of expenses.",
        )
    } else {
        None
    }
}

fn loan_size_rule(context: &RuleContext<'_>) -> Option<Tip> {
    let years = context.features.income_to_loan_ratio;
    if years > OVERSIZED_LOAN_YEARS_ABOVE {
        tip(
            RiskFactor::Affordability,
            TipCategory::LoanAmount,
            format!(
                "The loan equals {years:.1} years of income. Save for a larger down payment or add a co-applicant."
            ),
        )
    } else if years > LARGE_LOAN_YEARS_ABOVE {
        tip(
            RiskFactor::Affordability,
            TipCategory::LoanAmount,
            "Loan amount is high relative to annual income. Consider a lower amount or a co-applicant.",
        )
    } else {
        None
    }
}

fn existing_loans_rule(context: &RuleContext<'_>) -> Option<Tip> {
    let loans = context.input.existing_loans();
    if loans > MANY_LOANS_ABOVE {
        tip(
            RiskFactor::ExistingLoans,
            TipCategory::ExistingLoans,
            format!(
                "You have {loans} existing loans. Try consolidating or paying off some before applying."
            ),
        )
    } else {
        None
    }
}

fn employment_rule(context: &RuleContext<'_>) -> Option<Tip> {
    let years = context.input.employment_years();
    if years < NEW_JOB_YEARS_BELOW {
        tip(
            RiskFactor::Employment,
            TipCategory::Employment,
            "You have been employed for less than a year. Waiting 6-12 months in your current role strengthens the application.",
        )
    } else if years < SHORT_TENURE_YEARS_BELOW {
        tip(
            RiskFactor::Employment,
            TipCategory::Employment,
            "Lenders prefer at least 2 years of continuous employment. Include proof of stable income with your application.",
        )
    } else {
        None
    }
}
