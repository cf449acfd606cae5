use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::assessment::{ApplicationRequest, RawNumber};

#[derive(Debug)]
pub(crate) struct BatchRecord {
    pub(crate) line: u64,
    pub(crate) request: ApplicationRequest,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<BatchRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        let row: BatchRow = record.deserialize(Some(&headers))?;

        records.push(BatchRecord {
            line,
            request: row.into_request(),
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct BatchRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    monthly_income: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    loan_amount: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    credit_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    existing_loans: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    monthly_expenses: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    employment_years: Option<String>,
}

impl BatchRow {
    fn into_request(self) -> ApplicationRequest {
        ApplicationRequest {
            monthly_income: self.monthly_income.map(RawNumber::Text),
            loan_amount: self.loan_amount.map(RawNumber::Text),
            credit_score: self.credit_score.map(RawNumber::Text),
            existing_loans: self.existing_loans.map(RawNumber::Text),
            monthly_expenses: self.monthly_expenses.map(RawNumber::Text),
            employment_years: self.employment_years.map(RawNumber::Text),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
