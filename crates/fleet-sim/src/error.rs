use fleet_order::OrderError;
use thiserror::Error;

use crate::RatingCriteria;

#[derive(Debug, Error)]
pub enum SimError {
    // ── Problem validation ────────────────────────────────────────────────
    #[error("problem name must not be blank")]
    BlankName,

    #[error("simulation length must be positive")]
    ZeroLength,

    #[error("rater factory registered under {expected} rates {got}")]
    CriteriaMismatch {
        expected: RatingCriteria,
        got: RatingCriteria,
    },

    #[error("rater was built against a different region than the vehicle manager's")]
    RegionMismatch,

    // ── Runtime ───────────────────────────────────────────────────────────
    #[error("no rater registered for criterion {0}")]
    NoRaterForCriterion(RatingCriteria),

    #[error("simulation already finished")]
    AlreadyFinished,

    #[error("simulation has not been set up")]
    NotStarted,

    #[error(transparent)]
    Order(#[from] OrderError),
}

pub type SimResult<T> = Result<T, SimError>;
