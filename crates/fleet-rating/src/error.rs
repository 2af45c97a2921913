use thiserror::Error;

/// Rater-construction failures.
#[derive(Debug, Error)]
pub enum RatingError {
    #[error("factor {got} outside the valid range {range}")]
    FactorOutOfRange { got: f64, range: &'static str },
}

pub type RatingResult<T> = Result<T, RatingError>;
