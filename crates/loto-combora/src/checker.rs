//! Rejection filters of the Guillotine.
//!
//! A [`Candidate`] is checked against the enabled filters in a fixed order and
//! the first failing one is reported as a [`Rejection`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::loto::{NumberSet, PRIMARY_COUNT};

/// Why a candidate was thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rejection {
    /// Same six primaries as a past drawing.
    AntiClone,
    /// Same six primaries as a play already generated.
    AntiRepeat,
    SumOutOfRange,
    /// Five or six primaries share parity.
    ParityUnbalanced,
    /// Three or more primaries share the last digit.
    SharedEndings,
    /// Three or more strictly consecutive primaries.
    ConsecutiveRun,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("Sum range is inverted: {0} > {1}")]
    InvertedSumRange(u16, u16),
}

/// Inclusive bounds on the sum of the six primaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumRange {
    low: u16,
    high: u16,
}

impl SumRange {
    /// 1 + 2 + 3 + 4 + 5 + 6
    pub const MIN: u16 = 21;
    /// 35 + 36 + 37 + 38 + 39 + 40
    pub const MAX: u16 = 213;

    /// Bounds are clamped to `MIN..=MAX`.
    pub fn new(low: u16, high: u16) -> Result<Self, FilterError> {
        if low > high {
            return Err(FilterError::InvertedSumRange(low, high));
        }
        Ok(Self {
            low: low.clamp(Self::MIN, Self::MAX),
            high: high.clamp(Self::MIN, Self::MAX),
        })
    }

    pub fn low(&self) -> u16 {
        self.low
    }

    pub fn high(&self) -> u16 {
        self.high
    }

    pub fn contains(&self, sum: u16) -> bool {
        self.low <= sum && sum <= self.high
    }
}

impl Default for SumRange {
    fn default() -> Self {
        Self { low: 80, high: 150 }
    }
}

/// Toggles of the optional filters. Anti-repeat and the sum range always apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterFlags {
    pub parity: bool,
    pub endings: bool,
    pub consecutive: bool,
    pub anti_clone: bool,
}

impl FilterFlags {
    pub fn none() -> Self {
        Self {
            parity: false,
            endings: false,
            consecutive: false,
            anti_clone: false,
        }
    }
}

impl Default for FilterFlags {
    fn default() -> Self {
        Self {
            parity: true,
            endings: true,
            consecutive: true,
            anti_clone: true,
        }
    }
}

/// Everything a candidate is checked against during one generation run.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub sum_range: SumRange,
    pub flags: FilterFlags,
    /// Primary sets of past drawings.
    pub history: &'a HashSet<NumberSet>,
    /// Primary sets accepted so far, including the ones supplied by the caller.
    pub seen: &'a HashSet<NumberSet>,
}

/// Six distinct primaries in ascending order, not yet approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    numbers: [u8; PRIMARY_COUNT],
    set: NumberSet,
}

impl Candidate {
    /// `None` unless `numbers` holds exactly six distinct values.
    pub fn new(numbers: &[u8]) -> Option<Self> {
        let mut numbers: [u8; PRIMARY_COUNT] = numbers.try_into().ok()?;
        let set = NumberSet::from_numbers(&numbers);
        if set.len() != PRIMARY_COUNT {
            return None;
        }
        numbers.sort_unstable();
        Some(Self { numbers, set })
    }

    pub fn numbers(&self) -> [u8; PRIMARY_COUNT] {
        self.numbers
    }

    pub fn number_set(&self) -> NumberSet {
        self.set
    }

    pub fn sum(&self) -> u16 {
        self.numbers.iter().map(|&n| u16::from(n)).sum()
    }

    pub fn is_history_clone(&self, history: &HashSet<NumberSet>) -> Option<Rejection> {
        history
            .contains(&self.set)
            .then_some(Rejection::AntiClone)
    }

    pub fn is_repeat(&self, seen: &HashSet<NumberSet>) -> Option<Rejection> {
        seen.contains(&self.set).then_some(Rejection::AntiRepeat)
    }

    pub fn is_sum_out_of_range(&self, range: SumRange) -> Option<Rejection> {
        (!range.contains(self.sum())).then_some(Rejection::SumOutOfRange)
    }

    /// Rejects 6/0, 5/1, 1/5 and 0/6 even/odd splits.
    pub fn is_parity_unbalanced(&self) -> Option<Rejection> {
        let evens = self.numbers.iter().filter(|&&n| n % 2 == 0).count();
        (evens <= 1 || evens >= 5).then_some(Rejection::ParityUnbalanced)
    }

    pub fn has_shared_endings(&self) -> Option<Rejection> {
        let mut endings = [0u8; 10];
        for &n in &self.numbers {
            endings[usize::from(n % 10)] += 1;
        }
        endings
            .iter()
            .any(|&count| count >= 3)
            .then_some(Rejection::SharedEndings)
    }

    pub fn has_consecutive_run(&self) -> Option<Rejection> {
        self.numbers
            .windows(3)
            .any(|w| w[1] == w[0] + 1 && w[2] == w[1] + 1)
            .then_some(Rejection::ConsecutiveRun)
    }

    /// Run the filters in order; the first failing one wins.
    pub fn evaluate(&self, ctx: &FilterContext<'_>) -> Result<(), Rejection> {
        let flags = ctx.flags;
        let rejection = if flags.anti_clone {
            self.is_history_clone(ctx.history)
        } else {
            None
        }
        .or_else(|| self.is_repeat(ctx.seen))
        .or_else(|| self.is_sum_out_of_range(ctx.sum_range))
        .or_else(|| if flags.parity { self.is_parity_unbalanced() } else { None })
        .or_else(|| if flags.endings { self.has_shared_endings() } else { None })
        .or_else(|| {
            if flags.consecutive {
                self.has_consecutive_run()
            } else {
                None
            }
        });

        match rejection {
            Some(rejection) => Err(rejection),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(numbers: [u8; 6]) -> Candidate {
        Candidate::new(&numbers).unwrap()
    }

    fn wide_open() -> SumRange {
        SumRange::new(SumRange::MIN, SumRange::MAX).unwrap()
    }

    #[test]
    fn candidate_requires_six_distinct() {
        assert!(Candidate::new(&[1, 2, 3, 4, 5]).is_none());
        assert!(Candidate::new(&[1, 2, 3, 4, 5, 5]).is_none());
        assert_eq!(candidate([9, 1, 30, 4, 22, 17]).numbers(), [1, 4, 9, 17, 22, 30]);
    }

    #[test]
    fn sum_range_bounds() {
        let range = SumRange::default();
        assert_eq!((range.low(), range.high()), (80, 150));
        assert!(range.contains(80));
        assert!(range.contains(150));
        assert!(!range.contains(79));
        assert!(!range.contains(151));

        assert_eq!(SumRange::new(0, 500).unwrap(), wide_open());
        assert_eq!(
            SumRange::new(151, 150),
            Err(FilterError::InvertedSumRange(151, 150))
        );
    }

    #[test]
    fn parity_rejects_five_or_six_of_a_kind() {
        // six even
        assert!(candidate([2, 4, 6, 8, 10, 12]).is_parity_unbalanced().is_some());
        // six odd
        assert!(candidate([1, 3, 5, 7, 9, 11]).is_parity_unbalanced().is_some());
        // five even, one odd
        assert!(candidate([2, 4, 6, 8, 10, 13]).is_parity_unbalanced().is_some());
        // one even, five odd
        assert!(candidate([2, 3, 5, 7, 9, 11]).is_parity_unbalanced().is_some());
        // 4/2 and 3/3 pass
        assert!(candidate([2, 4, 6, 8, 11, 13]).is_parity_unbalanced().is_none());
        assert!(candidate([2, 4, 6, 9, 11, 13]).is_parity_unbalanced().is_none());
    }

    #[test]
    fn endings_reject_three_sharing_a_digit() {
        assert_eq!(
            candidate([3, 13, 23, 5, 16, 38]).has_shared_endings(),
            Some(Rejection::SharedEndings)
        );
        assert!(candidate([3, 13, 5, 15, 27, 38]).has_shared_endings().is_none());
        // 10, 20, 30 all end in zero
        assert!(candidate([10, 20, 30, 1, 2, 4]).has_shared_endings().is_some());
    }

    #[test]
    fn consecutive_rejects_runs_of_three() {
        assert_eq!(
            candidate([1, 14, 15, 16, 30, 38]).has_consecutive_run(),
            Some(Rejection::ConsecutiveRun)
        );
        assert!(candidate([1, 2, 14, 15, 30, 31]).has_consecutive_run().is_none());
        assert!(candidate([35, 36, 37, 38, 39, 40]).has_consecutive_run().is_some());
    }

    #[test]
    fn filters_apply_in_order() {
        // a history clone that also fails every other filter
        let bad = candidate([2, 4, 6, 8, 10, 12]);
        let history: HashSet<NumberSet> = [bad.number_set()].into_iter().collect();
        let seen: HashSet<NumberSet> = [bad.number_set()].into_iter().collect();
        let mut ctx = FilterContext {
            sum_range: SumRange::default(),
            flags: FilterFlags::default(),
            history: &history,
            seen: &seen,
        };
        assert_eq!(bad.evaluate(&ctx), Err(Rejection::AntiClone));

        ctx.flags.anti_clone = false;
        assert_eq!(bad.evaluate(&ctx), Err(Rejection::AntiRepeat));

        let empty = HashSet::new();
        ctx.seen = &empty;
        assert_eq!(bad.evaluate(&ctx), Err(Rejection::SumOutOfRange));

        ctx.sum_range = wide_open();
        assert_eq!(bad.evaluate(&ctx), Err(Rejection::ParityUnbalanced));

        ctx.flags.parity = false;
        // 2, 12 end in 2 but only twice; 2, 4, 6 ... no three share
        assert_eq!(bad.evaluate(&ctx), Ok(()));
    }

    #[test]
    fn disabled_filters_let_candidates_through() {
        let empty = HashSet::new();
        let ctx = FilterContext {
            sum_range: wide_open(),
            flags: FilterFlags::none(),
            history: &empty,
            seen: &empty,
        };
        assert_eq!(candidate([1, 2, 3, 11, 21, 31]).evaluate(&ctx), Ok(()));

        let ctx = FilterContext {
            flags: FilterFlags {
                consecutive: true,
                ..FilterFlags::none()
            },
            ..ctx
        };
        assert_eq!(
            candidate([1, 2, 3, 11, 21, 31]).evaluate(&ctx),
            Err(Rejection::ConsecutiveRun)
        );
    }

    #[test]
    fn sum_filter_always_applies() {
        let empty = HashSet::new();
        let ctx = FilterContext {
            sum_range: SumRange::default(),
            flags: FilterFlags::none(),
            history: &empty,
            seen: &empty,
        };
        // sum 21
        assert_eq!(
            candidate([1, 2, 3, 4, 5, 6]).evaluate(&ctx),
            Err(Rejection::SumOutOfRange)
        );
    }
}
