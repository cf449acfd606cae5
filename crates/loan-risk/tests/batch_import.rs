use loan_risk::assessment::{RiskAssessor, RiskPolicy};
use loan_risk::batch::{BatchImportError, BatchImporter, BatchOutcome};

const HEADER: &str =
    "monthly_income,loan_amount,credit_score,existing_loans,monthly_expenses,employment_years\n";

fn assessor() -> RiskAssessor {
    RiskAssessor::new(RiskPolicy::default()).expect("default policy is valid")
}

#[test]
fn importer_assesses_each_row_independently() {
    let csv = format!(
        "{HEADER}50000,500000,750,0,20000,5\n20000,2000000,450,3,15000,0.5\n0,100000,700,0,0,1\n"
    );

    let report = BatchImporter::from_reader(&assessor(), csv.as_bytes()).expect("batch runs");

    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.approved(), 1);
    assert_eq!(report.rejected(), 1);
    assert_eq!(report.invalid(), 1);

    let invalid = &report.entries[2];
    assert_eq!(invalid.line, 4);
    match &invalid.outcome {
        BatchOutcome::Invalid { field, error } => {
            assert_eq!(field, "monthly_income");
            assert!(error.contains("greater than zero"));
        }
        other => panic!("expected invalid row, got {other:?}"),
    }
}

#[test]
fn importer_reports_missing_cells_by_field() {
    let csv = format!("{HEADER}50000,500000,,0,20000,5\n");

    let report = BatchImporter::from_reader(&assessor(), csv.as_bytes()).expect("batch runs");

    match &report.entries[0].outcome {
        BatchOutcome::Invalid { field, .. } => assert_eq!(field, "credit_score"),
        other => panic!("expected invalid row, got {other:?}"),
    }
}

#[test]
fn importer_surfaces_missing_file() {
    match BatchImporter::from_path(&assessor(), "/nonexistent/applicants.csv") {
        Err(BatchImportError::Io(_)) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn importer_rejects_ragged_rows() {
    let csv = format!("{HEADER}50000,500000,750\n");

    match BatchImporter::from_reader(&assessor(), csv.as_bytes()) {
        Err(BatchImportError::Csv(_)) => {}
        other => panic!("expected csv error, got {other:?}"),
    }
}
