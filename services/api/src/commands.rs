use clap::Args;
use std::path::PathBuf;

use loan_risk::assessment::{ApplicationRequest, AssessmentResult, RawNumber};
use loan_risk::batch::{BatchImporter, BatchOutcome, BatchReport};
use loan_risk::config::AppConfig;
use loan_risk::error::AppError;

use crate::infra::build_assessor;
use crate::views::PredictionView;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Gross monthly income
    #[arg(long)]
    pub(crate) monthly_income: f64,
    /// Requested loan principal
    #[arg(long)]
    pub(crate) loan_amount: f64,
    /// Credit score (300-900)
    #[arg(long)]
    pub(crate) credit_score: f64,
    /// Number of loans already being repaid
    #[arg(long, default_value_t = 0.0)]
    pub(crate) existing_loans: f64,
    /// Monthly living expenses
    #[arg(long)]
    pub(crate) monthly_expenses: f64,
    /// Years with the current employer
    #[arg(long)]
    pub(crate) employment_years: f64,
    /// Print the HTTP response payload instead of a readable summary
    #[arg(long)]
    pub(crate) json: bool,
}

impl AssessArgs {
    fn to_request(&self) -> ApplicationRequest {
        ApplicationRequest {
            monthly_income: Some(RawNumber::Number(self.monthly_income)),
            loan_amount: Some(RawNumber::Number(self.loan_amount)),
            credit_score: Some(RawNumber::Number(self.credit_score)),
            existing_loans: Some(RawNumber::Number(self.existing_loans)),
            monthly_expenses: Some(RawNumber::Number(self.monthly_expenses)),
            employment_years: Some(RawNumber::Number(self.employment_years)),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with one applicant per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let assessor = build_assessor(&config)?;
    let result = assessor.assess(&args.to_request())?;

    if args.json {
        print_json(&PredictionView::from(&result));
    } else {
        render_assessment(&result);
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let assessor = build_assessor(&config)?;
    let report = BatchImporter::from_path(&assessor, &args.csv)?;

    if args.json {
        print_json(&report);
    } else {
        render_batch_report(&report, &args.csv);
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("unable to serialize output: {}", err),
    }
}

pub(crate) fn render_assessment(result: &AssessmentResult) {
    println!("Loan risk assessment");
    println!(
        "Decision: {} | confidence {:.2}%",
        result.decision_summary(),
        result.confidence
    );
    println!(
        "Risk score: {:.2} ({})",
        result.risk_score,
        result.risk_category.label()
    );
    println!(
        "Monthly EMI: {:.2} | disposable income: {:.2} | debt-to-income: {:.2}%",
        result.monthly_emi, result.disposable_income, result.debt_to_income_ratio
    );

    println!("\nScore components");
    for component in &result.components {
        println!(
            "  - {:<16} sub-score {:>6.2} x {:.2} = {:>6.2} ({})",
            component.factor.label(),
            component.sub_score,
            component.weight,
            component.contribution,
            component.notes
        );
    }

    println!("\nRecommendations");
    for tip in &result.tips {
        println!("  - {}", tip.message);
    }
}

pub(crate) fn render_batch_report(report: &BatchReport, source: &std::path::Path) {
    println!("Batch assessment of {}", source.display());
    println!(
        "Rows: {} | approved: {} | rejected: {} | invalid: {}",
        report.entries.len(),
        report.approved(),
        report.rejected(),
        report.invalid()
    );

    if report.entries.is_empty() {
        println!("\nNo applicant rows found");
        return;
    }

    println!();
    for entry in &report.entries {
        match &entry.outcome {
            BatchOutcome::Assessed { result } => println!(
                "  line {:>4}: risk {:>6.2} ({}) {}",
                entry.line,
                result.risk_score,
                result.risk_category.label(),
                result.decision_summary()
            ),
            BatchOutcome::Invalid { error, .. } => {
                println!("  line {:>4}: invalid input: {}", entry.line, error)
            }
        }
    }
}
