//! CSV intake for assessing many applicants in one pass.

mod parser;

use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::assessment::{AssessmentResult, RiskAssessor, ValidationError};

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read applicant file: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid applicant CSV data: {}", err),
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Result for a single CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Assessed { result: AssessmentResult },
    Invalid { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    /// One-based line in the source file, header included.
    pub line: u64,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn approved(&self) -> usize {
        self.count(|result| result.eligible)
    }

    pub fn rejected(&self) -> usize {
        self.count(|result| !result.eligible)
    }

    pub fn invalid(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, BatchOutcome::Invalid { .. }))
            .count()
    }

    fn count(&self, predicate: impl Fn(&AssessmentResult) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| match &entry.outcome {
                BatchOutcome::Assessed { result } => predicate(result),
                BatchOutcome::Invalid { .. } => false,
            })
            .count()
    }
}

pub struct BatchImporter;

impl BatchImporter {
    pub fn from_path<P: AsRef<Path>>(
        assessor: &RiskAssessor,
        path: P,
    ) -> Result<BatchReport, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(assessor, file)
    }

    /// Rows that fail validation are recorded and do not stop the batch.
    pub fn from_reader<R: Read>(
        assessor: &RiskAssessor,
        reader: R,
    ) -> Result<BatchReport, BatchImportError> {
        let mut report = BatchReport::default();

        for record in parser::parse_records(reader)? {
            let outcome = match assessor.assess(&record.request) {
                Ok(result) => BatchOutcome::Assessed { result },
                Err(err) => invalid(err),
            };
            report.entries.push(BatchEntry {
                line: record.line,
                outcome,
            });
        }

        info!(
            rows = report.entries.len(),
            approved = report.approved(),
            rejected = report.rejected(),
            invalid = report.invalid(),
            "batch assessment finished"
        );

        Ok(report)
    }
}

fn invalid(err: ValidationError) -> BatchOutcome {
    BatchOutcome::Invalid {
        field: err.field().to_string(),
        error: err.to_string(),
    }
}
