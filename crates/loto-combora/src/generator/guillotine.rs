use rand::rngs::StdRng;
use rand::seq::SliceRandom as _;
use rand::{Rng, SeedableRng as _};
use std::collections::HashSet;

use super::{CombinationGenerator, Generation, GenerationRequest, RejectionStats};
use crate::checker::{Candidate, FilterContext};
use crate::frequency::{self, FrequencyTable};
use crate::loto::{BONUS1_MAX, BONUS2_MAX, Combination, DrawingResult, NumberSet, PRIMARY_MAX};

/// Size of the hot pool; the cool pool takes the remaining numbers.
pub const HOT_POOL_SIZE: usize = 15;
const HOT_PICKS: usize = 4;
const COOL_PICKS: usize = 2;

/// Frequency-weighted sampler behind a rejection filter chain.
pub struct Guillotine;

impl CombinationGenerator for Guillotine {
    fn generate(
        &self,
        history: &[DrawingResult],
        request: &GenerationRequest,
        already_generated: &[NumberSet],
    ) -> Generation {
        let table = frequency::analyze_since(history, request.cutoff);
        let pools = Pools::from_frequency(&table);
        let history_sets: HashSet<NumberSet> =
            history.iter().map(DrawingResult::number_set).collect();

        match request.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                Self::generate_from_pools(&pools, &history_sets, request, already_generated, &mut rng)
            }
            None => {
                let mut rng = rand::thread_rng();
                Self::generate_from_pools(&pools, &history_sets, request, already_generated, &mut rng)
            }
        }
    }
}

impl Guillotine {
    /// Sample candidates from `pools` until `request.count` pass the filters
    /// or `request.max_attempts` trials have been spent.
    pub fn generate_from_pools<R: Rng>(
        pools: &Pools,
        history_sets: &HashSet<NumberSet>,
        request: &GenerationRequest,
        already_generated: &[NumberSet],
        rng: &mut R,
    ) -> Generation {
        let mut seen: HashSet<NumberSet> = already_generated.iter().copied().collect();
        let mut combinations = Vec::with_capacity(request.count.min(request.max_attempts));
        let mut stats = RejectionStats::default();
        let mut attempts = 0;

        while combinations.len() < request.count && attempts < request.max_attempts {
            attempts += 1;

            let Some(candidate) = pools.draw_candidate(rng) else {
                stats.overlapping += 1;
                log::trace!("Trial {attempts}: hot and cool picks overlap");
                continue;
            };

            let ctx = FilterContext {
                sum_range: request.sum_range,
                flags: request.flags,
                history: history_sets,
                seen: &seen,
            };
            if let Err(rejection) = candidate.evaluate(&ctx) {
                log::trace!("Trial {attempts}: {:?} rejected by {rejection:?}", candidate.numbers());
                stats.record(rejection);
                continue;
            }

            let bonus1 = rng.gen_range(1..=BONUS1_MAX);
            let bonus2 = rng.gen_range(1..=BONUS2_MAX);
            let combination = Combination::from_sorted(candidate.numbers(), bonus1, bonus2);
            log::trace!("Trial {attempts}: accepted {}", combination.format_numbers());

            seen.insert(candidate.number_set());
            combinations.push(combination);
        }

        let generation = Generation::new(combinations, request.count, attempts, stats);
        if generation.is_partial() {
            log::warn!(
                "Only {} of {} combinations passed the filters after {attempts} attempts: {:?}",
                generation.combinations().len(),
                request.count,
                generation.stats()
            );
        } else {
            log::debug!(
                "Generated {} combinations in {attempts} attempts",
                generation.combinations().len()
            );
        }
        generation
    }
}

/// Hot and cool number pools a candidate is drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pools {
    hot: Vec<u8>,
    cool: Vec<u8>,
}

impl Pools {
    pub fn new(hot: Vec<u8>, cool: Vec<u8>) -> Self {
        Self { hot, cool }
    }

    /// Top fifteen numbers by frequency are hot, the other twenty-five cool.
    /// Without frequency data both pools span the whole range.
    pub fn from_frequency(table: &FrequencyTable) -> Self {
        if table.is_empty() {
            let all: Vec<u8> = (1..=PRIMARY_MAX).collect();
            return Self {
                hot: all.clone(),
                cool: all,
            };
        }

        let ranked: Vec<u8> = table.ranked().iter().map(|row| row.number).collect();
        let (hot, cool) = ranked.split_at(HOT_POOL_SIZE.min(ranked.len()));
        Self {
            hot: hot.to_vec(),
            cool: cool.to_vec(),
        }
    }

    pub fn hot(&self) -> &[u8] {
        &self.hot
    }

    pub fn cool(&self) -> &[u8] {
        &self.cool
    }

    /// Four hot and two cool numbers, or `None` when they do not make six
    /// distinct values.
    pub fn draw_candidate<R: Rng>(&self, rng: &mut R) -> Option<Candidate> {
        let mut numbers: Vec<u8> = self.hot.choose_multiple(rng, HOT_PICKS).copied().collect();
        numbers.extend(self.cool.choose_multiple(rng, COOL_PICKS).copied());
        Candidate::new(&numbers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{FilterFlags, SumRange};
    use crate::generator::Generator;
    use chrono::NaiveDate;

    fn drawing(y: i32, m: u32, d: u32, primaries: [u8; 6]) -> DrawingResult {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        DrawingResult::new(date, &primaries, 3, 5).unwrap()
    }

    fn sample_history() -> Vec<DrawingResult> {
        vec![
            drawing(2024, 3, 2, [3, 11, 18, 24, 30, 37]),
            drawing(2024, 3, 6, [1, 7, 15, 22, 29, 40]),
            drawing(2024, 3, 9, [5, 11, 19, 26, 33, 38]),
            drawing(2024, 3, 13, [2, 8, 14, 21, 30, 36]),
            drawing(2023, 11, 4, [4, 9, 16, 23, 31, 35]),
        ]
    }

    #[test]
    fn pools_partition_by_frequency() {
        let table = frequency::analyze(&sample_history());
        let pools = Pools::from_frequency(&table);

        assert_eq!(pools.hot().len(), 15);
        assert_eq!(pools.cool().len(), 25);
        // 11 and 30 were drawn twice
        assert_eq!(&pools.hot()[..2], &[11, 30]);

        let mut all: Vec<u8> = pools.hot().iter().chain(pools.cool()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (1..=40).collect::<Vec<u8>>());
    }

    #[test]
    fn pools_without_data_span_the_range() {
        let pools = Pools::from_frequency(&FrequencyTable::default());
        assert_eq!(pools.hot(), pools.cool());
        assert_eq!(pools.hot().len(), 40);
    }

    #[test]
    fn accepted_combinations_pass_every_filter() {
        let history = sample_history();
        let request = GenerationRequest::new(40).with_seed(Some(42));
        let generation = Guillotine.generate(&history, &request, &[]);

        assert_eq!(generation.combinations().len(), 40);
        assert!(!generation.is_partial());

        let clones: HashSet<NumberSet> = history.iter().map(DrawingResult::number_set).collect();
        let mut seen = HashSet::new();
        for combination in generation.combinations() {
            let primaries = combination.primaries();
            assert!(primaries.windows(2).all(|w| w[0] < w[1]));
            assert!(primaries.iter().all(|&n| (1..=40).contains(&n)));
            assert_eq!(
                combination.sum(),
                primaries.iter().map(|&n| u16::from(n)).sum::<u16>()
            );
            assert!((80..=150).contains(&combination.sum()));
            assert!((1..=12).contains(&combination.bonus1()));
            assert!((1..=15).contains(&combination.bonus2()));

            let evens = primaries.iter().filter(|&&n| n % 2 == 0).count();
            assert!((2..=4).contains(&evens));

            let mut endings = [0; 10];
            for &n in primaries {
                endings[usize::from(n % 10)] += 1;
            }
            assert!(endings.iter().all(|&c| c < 3));
            assert!(
                !primaries
                    .windows(3)
                    .any(|w| w[1] == w[0] + 1 && w[2] == w[1] + 1)
            );

            assert!(!clones.contains(&combination.number_set()));
            assert!(seen.insert(combination.number_set()));
        }
    }

    #[test]
    fn empty_history_with_filters_off() {
        let request = GenerationRequest::new(5)
            .with_flags(FilterFlags::none())
            .with_seed(Some(1));
        let generator = Generator::create_generator(Generator::Guillotine);
        let generation = generator.generate(&[], &request, &[]);

        assert_eq!(generation.combinations().len(), 5);
        assert!(generation.attempts() <= crate::generator::MAX_ATTEMPTS);
        for combination in generation.combinations() {
            assert!((80..=150).contains(&combination.sum()));
        }
    }

    #[test]
    fn small_universe_returns_partial_result() {
        // only three distinct candidates exist, one of them a past drawing
        let pools = Pools::new(vec![1, 2, 3, 4], vec![5, 6, 7]);
        let history: HashSet<NumberSet> = [NumberSet::from_numbers(&[1, 2, 3, 4, 5, 6])]
            .into_iter()
            .collect();
        let request = GenerationRequest::new(5)
            .with_sum_range(SumRange::new(SumRange::MIN, SumRange::MAX).unwrap())
            .with_flags(FilterFlags {
                anti_clone: true,
                ..FilterFlags::none()
            })
            .with_max_attempts(1_000);
        let mut rng = StdRng::seed_from_u64(9);

        let generation = Guillotine::generate_from_pools(&pools, &history, &request, &[], &mut rng);

        assert_eq!(generation.combinations().len(), 2);
        assert!(generation.is_partial());
        assert_eq!(generation.shortfall(), 3);
        assert_eq!(generation.attempts(), 1_000);
        assert!(generation.stats().anti_clone > 0);
        assert!(generation.stats().anti_repeat > 0);
        assert_eq!(generation.stats().total() + 2, 1_000);
    }

    #[test]
    fn already_generated_sets_are_not_repeated() {
        let pools = Pools::new(vec![1, 2, 3, 4], vec![5, 6, 7]);
        let already = [
            NumberSet::from_numbers(&[1, 2, 3, 4, 5, 6]),
            NumberSet::from_numbers(&[1, 2, 3, 4, 5, 7]),
        ];
        let request = GenerationRequest::new(3)
            .with_sum_range(SumRange::new(SumRange::MIN, SumRange::MAX).unwrap())
            .with_flags(FilterFlags::none())
            .with_max_attempts(500);
        let mut rng = StdRng::seed_from_u64(3);

        let generation =
            Guillotine::generate_from_pools(&pools, &HashSet::new(), &request, &already, &mut rng);

        assert_eq!(generation.combinations().len(), 1);
        assert_eq!(generation.combinations()[0].primaries(), &[1, 2, 3, 4, 6, 7]);
    }

    #[test]
    fn overlapping_pools_count_as_attempts() {
        let pools = Pools::new(vec![1, 2, 3, 4], vec![1, 2]);
        let request = GenerationRequest::new(1)
            .with_flags(FilterFlags::none())
            .with_max_attempts(50);
        let mut rng = StdRng::seed_from_u64(5);

        let generation =
            Guillotine::generate_from_pools(&pools, &HashSet::new(), &request, &[], &mut rng);

        assert!(generation.combinations().is_empty());
        assert_eq!(generation.stats().overlapping, 50);
    }

    #[test]
    fn huge_count_is_bounded_by_the_attempt_ceiling() {
        let request = GenerationRequest::new(1usize << 40)
            .with_flags(FilterFlags::none())
            .with_seed(Some(1))
            .with_max_attempts(10);

        let generation = Guillotine.generate(&[], &request, &[]);

        assert!(generation.is_partial());
        assert_eq!(generation.attempts(), 10);
        assert!(generation.combinations().len() <= 10);
        assert_eq!(generation.requested(), 1usize << 40);
    }

    #[test]
    fn same_seed_same_combinations() {
        let history = sample_history();
        let request = GenerationRequest::new(10).with_seed(Some(2024));
        let first = Guillotine.generate(&history, &request, &[]);
        let second = Guillotine.generate(&history, &request, &[]);
        assert_eq!(first, second);
    }
}
