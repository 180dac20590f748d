use crate::types::{CleanOrder, RawOrder};
use crate::validate::{validate_row, RowError};
use csv::ReaderBuilder;
use std::error::Error;

/// Per-reason accounting of what the cleaning pass dropped. Printed once
/// after load; individual row failures are otherwise invisible.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub missing_fields: usize,
    pub bad_numbers: usize,
    pub bad_dates: usize,
    pub bad_time_taken: usize,
    pub unknown_categories: usize,
    pub read_errors: usize,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.missing_fields
            + self.bad_numbers
            + self.bad_dates
            + self.bad_time_taken
            + self.unknown_categories
            + self.read_errors
    }

    fn count(&mut self, err: &RowError) {
        match err {
            RowError::Missing(_) => self.missing_fields += 1,
            RowError::BadNumber(_) => self.bad_numbers += 1,
            RowError::BadDate => self.bad_dates += 1,
            RowError::BadTimeTaken => self.bad_time_taken += 1,
            RowError::UnknownCategory { .. } => self.unknown_categories += 1,
        }
    }
}

/// Load the order export and run every row through the validator.
///
/// Rows that fail validation are dropped whole; the output preserves input
/// order and is fully determined by the file contents. A missing or
/// unreadable file is the caller's problem and propagates as an error.
pub fn load_and_clean(path: &str) -> Result<(Vec<CleanOrder>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut report = LoadReport::default();
    let mut orders: Vec<CleanOrder> = Vec::new();

    for result in rdr.deserialize::<RawOrder>() {
        report.total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(_) => {
                report.read_errors += 1;
                continue;
            }
        };
        match validate_row(&raw) {
            Ok(order) => orders.push(order),
            Err(e) => report.count(&e),
        }
    }

    report.kept_rows = orders.len();
    Ok((orders, report))
}
