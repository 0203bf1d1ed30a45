use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] serde_json::Error),

    #[error("invalid job '{id}': {reason}")]
    InvalidJob { id: String, reason: String },

    #[error("invalid constraints: {0}")]
    InvalidConstraints(String),

    #[error("price table covers lengths 1..={available}, rod length {length} requested")]
    PriceTableTooShort { length: usize, available: usize },

    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),

    #[error("strategies disagree: memo found {memo}, table found {table}")]
    StrategyMismatch { memo: u64, table: u64 },
}

pub type Result<T> = std::result::Result<T, OptimizeError>;
