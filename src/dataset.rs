use std::ops::Range;

use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{Entity, Error, PersonId, Result};

/// Weights handed out by the "random person" path: 50 up to, not
/// including, 150.
pub const DEFAULT_WEIGHTS: Range<f64> = 50.0..150.0;

/// The part of `DEFAULT_WEIGHTS` a roster may draw from when no weight may
/// exceed `max`. Expects `max >= 1`.
pub fn weights_up_to(max: f64) -> Range<f64> {
    let end = DEFAULT_WEIGHTS.end.min(libm::floor(max) + 1.0);
    DEFAULT_WEIGHTS.start.min(end - 1.0)..end
}

/// Hands out monotonically increasing person ids. `u64::MAX` is never
/// handed out.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// The first id after every id in `ids`, or 1 for none.
    pub fn after<'a>(ids: impl IntoIterator<Item = &'a PersonId>) -> Result<Self> {
        let mut next = 1;
        for id in ids {
            next = next.max(id.0.checked_add(1).ok_or(Error::IdsExhausted)?);
        }
        Ok(Self::starting_at(next))
    }

    pub fn peek(&self) -> PersonId {
        PersonId(self.next)
    }

    pub fn next_id(&mut self) -> Result<PersonId> {
        if self.next == u64::MAX {
            return Err(Error::IdsExhausted);
        }
        let id = PersonId(self.next);
        self.next += 1;
        Ok(id)
    }
}

/// Draws whole-number weights from `range` with a seeded generator.
#[derive(Debug, Clone)]
pub struct WeightSource {
    rng: Xoshiro256PlusPlus,
    range: Range<f64>,
}

impl WeightSource {
    pub fn new(seed: u64, range: Range<f64>) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            range,
        }
    }

    pub fn next_weight(&mut self) -> f64 {
        // 53 random mantissa bits, uniform in [0, 1)
        let unit = (self.rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64);
        let span = self.range.end - self.range.start;
        libm::floor(self.range.start + unit * span)
    }
}

/// `count` people with ids from `first_id` upward and seeded weights.
pub fn generate(count: usize, first_id: u64, seed: u64, range: Range<f64>) -> Result<Vec<Entity>> {
    let mut ids = IdAllocator::starting_at(first_id);
    let mut weights = WeightSource::new(seed, range);
    (0..count)
        .map(|_| Entity::new(ids.next_id()?.0, weights.next_weight()))
        .collect()
}

/// The thirty people a fresh session starts with, ids 1 to 30.
pub fn default_people(seed: u64) -> Result<Vec<Entity>> {
    generate(30, 1, seed, DEFAULT_WEIGHTS)
}
