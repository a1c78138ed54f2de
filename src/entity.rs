use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A weighted person. The weight is always finite and strictly positive,
/// so comparisons between two entities never meet a NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEntity")]
pub struct Entity {
    id: PersonId,
    weight: f64,
}

impl Entity {
    pub fn new(id: u64, weight: f64) -> Result<Self> {
        if !weight.is_finite() {
            return Err(Error::NonFiniteWeight(weight));
        }
        if weight <= 0.0 {
            return Err(Error::NonPositiveWeight(weight));
        }
        Ok(Self {
            id: PersonId(id),
            weight,
        })
    }

    /// Like [`Entity::new`], but also rejects weights above `max`.
    pub fn with_limit(id: u64, weight: f64, max: f64) -> Result<Self> {
        let entity = Self::new(id, weight)?;
        if weight > max {
            return Err(Error::WeightAboveLimit { weight, max });
        }
        Ok(entity)
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Strict comparison used by every sift. Equal weights are never heavier.
    pub(crate) fn heavier_than(&self, other: &Self) -> bool {
        self.weight > other.weight
    }
}

impl From<u64> for PersonId {
    fn from(id: u64) -> Self {
        PersonId(id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "person {} (weight {})", self.id, self.weight)
    }
}

#[derive(Deserialize)]
struct RawEntity {
    id: PersonId,
    weight: f64,
}

impl TryFrom<RawEntity> for Entity {
    type Error = Error;

    fn try_from(raw: RawEntity) -> Result<Self> {
        Entity::new(raw.id.0, raw.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_weights() {
        assert!(matches!(
            Entity::new(1, f64::NAN),
            Err(Error::NonFiniteWeight(_))
        ));
        assert!(matches!(
            Entity::new(1, f64::INFINITY),
            Err(Error::NonFiniteWeight(_))
        ));
        assert!(matches!(
            Entity::new(1, 0.0),
            Err(Error::NonPositiveWeight(_))
        ));
        assert!(matches!(
            Entity::new(1, -3.0),
            Err(Error::NonPositiveWeight(_))
        ));
    }

    #[test]
    fn limit_is_inclusive() {
        assert!(Entity::with_limit(1, 500.0, 500.0).is_ok());
        assert!(matches!(
            Entity::with_limit(1, 500.5, 500.0),
            Err(Error::WeightAboveLimit { .. })
        ));
    }

    #[test]
    fn ties_are_not_heavier() {
        let a = Entity::new(1, 70.0).unwrap();
        let b = Entity::new(2, 70.0).unwrap();
        assert!(!a.heavier_than(&b));
        assert!(!b.heavier_than(&a));
    }

    #[test]
    fn deserialize_validates() {
        let e: Entity = serde_json::from_str(r#"{"id": 4, "weight": 82}"#).unwrap();
        assert_eq!(e.id(), PersonId(4));
        assert_eq!(e.weight(), 82.0);

        let err = serde_json::from_str::<Entity>(r#"{"id": 4, "weight": -1}"#);
        assert!(err.is_err());
    }
}
