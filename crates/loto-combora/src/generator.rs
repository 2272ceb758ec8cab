use chrono::NaiveDate;
use serde::Serialize;

use crate::checker::{FilterFlags, Rejection, SumRange};
use crate::frequency::MODERN_ERA_CUTOFF;
use crate::loto::{Combination, DrawingResult, NumberSet};

/// Trial ceiling of one generation run.
pub const MAX_ATTEMPTS: usize = 150_000;

pub enum Generator {
    Guillotine,
}

impl AsRef<Self> for Generator {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl Generator {
    pub fn create_generator(generator: impl AsRef<Self>) -> Box<dyn CombinationGenerator> {
        match generator.as_ref() {
            Self::Guillotine => Box::new(guillotine::Guillotine),
        }
    }
}

pub trait CombinationGenerator {
    /// Produce up to `request.count` combinations.
    ///
    /// `already_generated` holds primary sets that must not be produced again,
    /// typically the ones already in the ledger. Running out of attempts
    /// yields a partial [`Generation`] rather than an error.
    fn generate(
        &self,
        history: &[DrawingResult],
        request: &GenerationRequest,
        already_generated: &[NumberSet],
    ) -> Generation;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub count: usize,
    pub sum_range: SumRange,
    pub flags: FilterFlags,
    /// Start of the frequency window used to build the pools.
    pub cutoff: NaiveDate,
    pub max_attempts: usize,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            count: 5,
            sum_range: SumRange::default(),
            flags: FilterFlags::default(),
            cutoff: MODERN_ERA_CUTOFF,
            max_attempts: MAX_ATTEMPTS,
            seed: None,
        }
    }
}

impl GenerationRequest {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sum_range(mut self, sum_range: SumRange) -> Self {
        self.sum_range = sum_range;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FilterFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_cutoff(mut self, cutoff: NaiveDate) -> Self {
        self.cutoff = cutoff;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// How many trials each filter threw away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectionStats {
    pub anti_clone: usize,
    pub anti_repeat: usize,
    pub sum_out_of_range: usize,
    pub parity: usize,
    pub endings: usize,
    pub consecutive: usize,
    /// Trials whose hot and cool picks overlapped and gave fewer than six numbers.
    pub overlapping: usize,
}

impl RejectionStats {
    pub fn record(&mut self, rejection: Rejection) {
        let slot = match rejection {
            Rejection::AntiClone => &mut self.anti_clone,
            Rejection::AntiRepeat => &mut self.anti_repeat,
            Rejection::SumOutOfRange => &mut self.sum_out_of_range,
            Rejection::ParityUnbalanced => &mut self.parity,
            Rejection::SharedEndings => &mut self.endings,
            Rejection::ConsecutiveRun => &mut self.consecutive,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.anti_clone
            + self.anti_repeat
            + self.sum_out_of_range
            + self.parity
            + self.endings
            + self.consecutive
            + self.overlapping
    }
}

/// Outcome of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    combinations: Vec<Combination>,
    requested: usize,
    attempts: usize,
    stats: RejectionStats,
}

impl Generation {
    pub fn new(
        combinations: Vec<Combination>,
        requested: usize,
        attempts: usize,
        stats: RejectionStats,
    ) -> Self {
        Self {
            combinations,
            requested,
            attempts,
            stats,
        }
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn stats(&self) -> &RejectionStats {
        &self.stats
    }

    /// The attempt ceiling ran out before the requested count was reached.
    pub fn is_partial(&self) -> bool {
        self.combinations.len() < self.requested
    }

    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.combinations.len())
    }
}

pub mod guillotine;
