//! Batch scoring of student survey exports against the interview rubric.

mod parser;
mod report;

pub use parser::SurveyRecord;
pub use report::{RejectedRow, ScoredRow, SurveyBatchReport};

use crate::assessment::Scorer;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum SurveyImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for SurveyImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyImportError::Io(err) => write!(f, "failed to read survey export: {}", err),
            SurveyImportError::Csv(err) => write!(f, "invalid survey CSV data: {}", err),
        }
    }
}

impl std::error::Error for SurveyImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurveyImportError::Io(err) => Some(err),
            SurveyImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SurveyImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SurveyImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct SurveyImporter;

impl SurveyImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<SurveyRecord>, SurveyImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<SurveyRecord>, SurveyImportError> {
        Ok(parser::parse_records(reader)?)
    }

    /// Import and score in one pass; row-level domain failures land in `rejected`.
    pub fn score_reader<R: Read>(
        reader: R,
        scorer: &Scorer,
    ) -> Result<SurveyBatchReport, SurveyImportError> {
        let records = Self::from_reader(reader)?;
        Ok(SurveyBatchReport::build(scorer, &records))
    }

    pub fn score_path<P: AsRef<Path>>(
        path: P,
        scorer: &Scorer,
    ) -> Result<SurveyBatchReport, SurveyImportError> {
        let records = Self::from_path(path)?;
        Ok(SurveyBatchReport::build(scorer, &records))
    }
}
