use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Validation error: {0}")]
    Validation(String),
}
