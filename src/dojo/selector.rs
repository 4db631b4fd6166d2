//! Room selection strategies for automatic allocation

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fmt::Debug;

/// Picks one room out of the eligible candidates.
///
/// `eligible` holds bucket indices of rooms that still have a vacancy, in
/// creation order. Returning `None` leaves the person unallocated.
pub trait RoomSelector: Debug {
    fn select(&mut self, eligible: &[usize]) -> Option<usize>;
}

/// Uniform random choice among eligible rooms
#[derive(Debug)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RoomSelector for RandomSelector {
    fn select(&mut self, eligible: &[usize]) -> Option<usize> {
        eligible.choose(&mut self.rng).copied()
    }
}

/// Always the earliest created room with space
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstEligible;

impl RoomSelector for FirstEligible {
    fn select(&mut self, eligible: &[usize]) -> Option<usize> {
        eligible.first().copied()
    }
}
