use std::fmt;

#[derive(Debug)]
pub enum WorkforceError {
    /// Feed header lacks a column the engine cannot default.
    MissingColumn { column: String },
    /// Structurally broken CSV (bad quoting, invalid UTF-8, ...).
    Csv(String),
}

impl fmt::Display for WorkforceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { column } => write!(f, "feed is missing column '{column}'"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for WorkforceError {}

impl From<csv::Error> for WorkforceError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}
