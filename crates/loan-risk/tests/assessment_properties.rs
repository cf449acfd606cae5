use loan_risk::assessment::{
    monthly_emi, ApplicantInput, AssessmentResult, RiskAssessor, RiskCategory, RiskPolicy,
};

const INCOMES: [f64; 4] = [8_000.0, 25_000.0, 60_000.0, 150_000.0];
const LOANS: [f64; 4] = [50_000.0, 400_000.0, 1_500_000.0, 6_000_000.0];
const CREDIT_SCORES: [u16; 5] = [300, 520, 680, 760, 900];
const EXISTING_LOANS: [u32; 4] = [0, 1, 3, 7];
const EXPENSE_SHARES: [f64; 3] = [0.0, 0.4, 1.2];
const TENURES: [f64; 4] = [0.0, 1.5, 6.0, 20.0];

fn assessor() -> RiskAssessor {
    RiskAssessor::new(RiskPolicy::default()).expect("default policy is valid")
}

fn grid() -> Vec<ApplicantInput> {
    let mut inputs = Vec::new();
    for &income in &INCOMES {
        for &loan in &LOANS {
            for &credit in &CREDIT_SCORES {
                for &existing in &EXISTING_LOANS {
                    for &share in &EXPENSE_SHARES {
                        for &tenure in &TENURES {
                            inputs.push(
                                ApplicantInput::new(
                                    income,
                                    loan,
                                    credit,
                                    existing,
                                    income * share,
                                    tenure,
                                )
                                .expect("grid input is valid"),
                            );
                        }
                    }
                }
            }
        }
    }
    inputs
}

fn assess(assessor: &RiskAssessor, input: &ApplicantInput) -> AssessmentResult {
    assessor.assess_input(input).expect("valid input assesses")
}

#[test]
fn every_result_respects_bounds_gate_and_category() {
    let assessor = assessor();

    for input in grid() {
        let result = assess(&assessor, &input);

        assert!((0.0..=100.0).contains(&result.risk_score), "{input:?}");
        assert!((0.0..=100.0).contains(&result.confidence), "{input:?}");
        assert!(!result.tips.is_empty(), "{input:?}");
        if result.disposable_income < 0.0 {
            assert!(!result.eligible, "{input:?}");
        }
        if result.risk_category == RiskCategory::High {
            assert!(!result.eligible, "{input:?}");
        }
    }
}

#[test]
fn every_result_is_reproducible() {
    let assessor = assessor();

    for input in grid() {
        assert_eq!(assess(&assessor, &input), assess(&assessor, &input));
    }
}

#[test]
fn better_credit_never_raises_risk() {
    let assessor = assessor();

    for base in grid().into_iter().filter(|input| input.credit_score() == 300) {
        let mut previous = f64::INFINITY;
        for credit in (300..=900).step_by(25) {
            let input = ApplicantInput::new(
                base.monthly_income(),
                base.loan_amount(),
                credit,
                base.existing_loans(),
                base.monthly_expenses(),
                base.employment_years(),
            )
            .expect("valid input");
            let risk = assess(&assessor, &input).risk_score;
            assert!(risk <= previous, "credit {credit} raised risk for {base:?}");
            previous = risk;
        }
    }
}

#[test]
fn more_existing_loans_never_lower_risk() {
    let assessor = assessor();

    for base in grid().into_iter().filter(|input| input.existing_loans() == 0) {
        let mut previous = f64::NEG_INFINITY;
        for existing in 0..=8 {
            let input = ApplicantInput::new(
                base.monthly_income(),
                base.loan_amount(),
                base.credit_score(),
                existing,
                base.monthly_expenses(),
                base.employment_years(),
            )
            .expect("valid input");
            let risk = assess(&assessor, &input).risk_score;
            assert!(risk >= previous, "{existing} loans lowered risk for {base:?}");
            previous = risk;
        }
    }
}

#[test]
fn larger_loans_never_lower_the_instalment() {
    let terms = RiskPolicy::default().loan_terms;
    let mut previous = 0.0;

    for step in 1..=200 {
        let emi = monthly_emi(f64::from(step) * 25_000.0, &terms);
        assert!(emi >= previous);
        previous = emi;
    }
}

#[test]
fn confidence_is_lowest_near_the_threshold() {
    let assessor = assessor();
    let threshold = assessor.policy().eligibility_threshold;
    let results: Vec<AssessmentResult> = grid().iter().map(|input| assess(&assessor, input)).collect();

    for left in &results {
        for right in results.iter().step_by(97) {
            let left_distance = (left.risk_score - threshold).abs();
            let right_distance = (right.risk_score - threshold).abs();
            if left_distance < right_distance {
                assert!(left.confidence <= right.confidence);
            }
        }
    }
}
