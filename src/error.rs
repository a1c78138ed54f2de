use thiserror::Error;

use crate::PersonId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("weight must be a finite number, got `{0}`")]
    NonFiniteWeight(f64),
    #[error("weight must be positive, got `{0}`")]
    NonPositiveWeight(f64),
    #[error("weight `{weight}` exceeds the limit of `{max}`")]
    WeightAboveLimit { weight: f64, max: f64 },
    #[error("person id `{0}` appears more than once")]
    DuplicateId(PersonId),
    #[error("no person ids left to assign")]
    IdsExhausted,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
