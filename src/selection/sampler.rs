//! Random draw and ordered assembly of a contest problem list

use std::sync::{Arc, Mutex};

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use super::{
    SelectedProblem, Selection, SelectionError, distribution::Distribution, fetcher::TierPools,
};
use crate::models::{Difficulty, Problem};

/// Where draws get their randomness from.
///
/// Both variants are safe to use from concurrent requests.
#[derive(Debug, Clone, Default)]
pub enum RandomSource {
    /// Fresh OS-seeded generator for every selection
    #[default]
    PerCall,
    /// One generator shared by all selections behind a mutex
    Shared(Arc<Mutex<StdRng>>),
}

impl RandomSource {
    /// Shared generator with a fixed seed, for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self::Shared(Arc::new(Mutex::new(StdRng::seed_from_u64(seed))))
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_default()
    }

    /// Run `f` with exclusive access to a generator
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        match self {
            Self::PerCall => {
                let mut rng = StdRng::from_os_rng();
                f(&mut rng)
            }
            Self::Shared(shared) => {
                // A panic while holding the lock leaves the generator usable
                let mut rng = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                f(&mut rng)
            }
        }
    }
}

/// Uniformly draw `needed` problems without replacement.
///
/// A pool no larger than `needed` is returned whole, in shuffled order.
fn draw(mut pool: Vec<Problem>, needed: usize, rng: &RandomSource) -> Vec<Problem> {
    let amount = needed.min(pool.len());
    rng.with_rng(|rng| {
        let (chosen, _) = pool.partial_shuffle(rng, amount);
        chosen.to_vec()
    })
}

/// Assemble the final ordered list from per-tier pools.
///
/// Tiers are visited Easy, Medium, Hard. A tier that cannot cover its target
/// plus any carried deficit contributes its whole pool and pushes the
/// remaining deficit to the next harder tier.
pub fn assemble(
    mut pools: TierPools,
    distribution: Distribution,
    requested: usize,
    rng: &RandomSource,
) -> Result<Selection, SelectionError> {
    let mut picked: Vec<Problem> = Vec::with_capacity(distribution.total());
    let mut shortfall = 0usize;

    for tier in Difficulty::ALL {
        let needed = distribution.for_tier(tier) + shortfall;
        let pool = pools.take(tier);
        let available = pool.len();

        picked.extend(draw(pool, needed, rng));
        shortfall = needed.saturating_sub(available);
    }

    if picked.is_empty() {
        return Err(SelectionError::NotEnoughProblems { requested });
    }

    // Stable, so draw order is kept within a tier
    picked.sort_by_key(|p| p.difficulty.weight());

    let truncated = picked.len() < requested;
    let problems = picked
        .into_iter()
        .zip(1u32..)
        .map(|(problem, position)| SelectedProblem { position, problem })
        .collect();

    Ok(Selection {
        problems,
        requested,
        distribution,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use uuid::Uuid;

    use super::*;
    use crate::selection::{distribution::plan_distribution, testing::problems};

    fn pools(easy: usize, medium: usize, hard: usize) -> TierPools {
        TierPools {
            easy: problems(Difficulty::Easy, easy),
            medium: problems(Difficulty::Medium, medium),
            hard: problems(Difficulty::Hard, hard),
        }
    }

    fn count_of(selection: &Selection, tier: Difficulty) -> usize {
        selection
            .problems
            .iter()
            .filter(|p| p.problem.difficulty == tier)
            .count()
    }

    fn assert_well_formed(selection: &Selection) {
        let ids: HashSet<Uuid> = selection.problems.iter().map(|p| p.problem.id).collect();
        assert_eq!(ids.len(), selection.problems.len(), "duplicate problem drawn");

        let weights: Vec<u8> = selection
            .problems
            .iter()
            .map(|p| p.problem.difficulty.weight())
            .collect();
        assert!(weights.windows(2).all(|w| w[0] <= w[1]), "not ascending: {:?}", weights);

        let positions: Vec<u32> = selection.problems.iter().map(|p| p.position).collect();
        let expected: Vec<u32> = (1..=selection.problems.len() as u32).collect();
        assert_eq!(positions, expected);
    }

    #[test]
    fn test_full_supply_meets_distribution() {
        let dist = plan_distribution(10);
        let selection = assemble(pools(20, 20, 20), dist, 10, &RandomSource::seeded(1)).unwrap();

        assert_eq!(selection.problems.len(), 10);
        assert!(!selection.truncated);
        assert_eq!(count_of(&selection, Difficulty::Easy), dist.easy);
        assert_eq!(count_of(&selection, Difficulty::Medium), dist.medium);
        assert_eq!(count_of(&selection, Difficulty::Hard), dist.hard);
        assert_well_formed(&selection);
    }

    #[test]
    fn test_shortfall_carries_forward() {
        let dist = Distribution {
            easy: 3,
            medium: 3,
            hard: 3,
        };
        let selection = assemble(pools(1, 10, 10), dist, 9, &RandomSource::seeded(7)).unwrap();

        assert_eq!(selection.problems.len(), 9);
        assert_eq!(count_of(&selection, Difficulty::Easy), 1);
        assert_eq!(count_of(&selection, Difficulty::Medium), 5);
        assert_eq!(count_of(&selection, Difficulty::Hard), 3);
        assert!(!selection.truncated);
        assert_well_formed(&selection);
    }

    #[test]
    fn test_shortfall_resets_after_covered_tier() {
        let dist = Distribution {
            easy: 2,
            medium: 2,
            hard: 2,
        };
        // Easy short by 2, Medium covers 4, Hard only needs its own 2
        let selection = assemble(pools(0, 10, 10), dist, 6, &RandomSource::seeded(3)).unwrap();
        assert_eq!(count_of(&selection, Difficulty::Medium), 4);
        assert_eq!(count_of(&selection, Difficulty::Hard), 2);
    }

    #[test]
    fn test_deficit_in_hardest_tier_truncates() {
        let dist = plan_distribution(10);
        let selection = assemble(pools(20, 20, 1), dist, 10, &RandomSource::seeded(5)).unwrap();

        assert_eq!(selection.problems.len(), dist.easy + dist.medium + 1);
        assert!(selection.truncated);
        assert_well_formed(&selection);
    }

    #[test]
    fn test_full_exhaustion_is_an_error() {
        let err = assemble(pools(0, 0, 0), plan_distribution(5), 5, &RandomSource::PerCall)
            .unwrap_err();
        assert!(matches!(err, SelectionError::NotEnoughProblems { requested: 5 }));
    }

    #[test]
    fn test_floor_inflated_plan_draws_extra_when_supply_allows() {
        let selection =
            assemble(pools(10, 10, 10), plan_distribution(3), 3, &RandomSource::seeded(9))
                .unwrap();
        assert_eq!(selection.problems.len(), 4);
        assert!(!selection.truncated);
    }

    #[test]
    fn test_solved_problems_never_selected() {
        let mut all = pools(8, 8, 8);
        let solved: HashSet<Uuid> = all
            .easy
            .iter()
            .chain(all.medium.iter())
            .chain(all.hard.iter())
            .step_by(2)
            .map(|p| p.id)
            .collect();

        all.easy.retain(|p| !solved.contains(&p.id));
        all.medium.retain(|p| !solved.contains(&p.id));
        all.hard.retain(|p| !solved.contains(&p.id));

        for seed in 0..50 {
            let selection = assemble(
                all.clone(),
                plan_distribution(12),
                12,
                &RandomSource::seeded(seed),
            )
            .unwrap();
            assert!(selection.problems.iter().all(|p| !solved.contains(&p.problem.id)));
            assert_well_formed(&selection);
        }
    }

    #[test]
    fn test_draw_covers_whole_pool_over_many_runs() {
        let pool = problems(Difficulty::Medium, 6);
        let rng = RandomSource::seeded(42);
        let mut seen = HashSet::new();

        for _ in 0..200 {
            for p in draw(pool.clone(), 2, &rng) {
                seen.insert(p.id);
            }
        }

        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn test_draw_is_uniform() {
        let pool = problems(Difficulty::Medium, 6);
        let rng = RandomSource::seeded(7);
        let runs = 30_000;
        let mut hits = [0usize; 6];

        for _ in 0..runs {
            let drawn = draw(pool.clone(), 2, &rng);
            assert_eq!(drawn.len(), 2);
            for p in drawn {
                hits[p.order_index as usize] += 1;
            }
        }

        // Each index is expected 10_000 times
        for (index, count) in hits.iter().enumerate() {
            assert!(
                (9_000..=11_000).contains(count),
                "index {} drawn {} times: {:?}",
                index,
                count,
                hits
            );
        }
    }

    #[test]
    fn test_single_pick_reaches_every_problem() {
        let pool = problems(Difficulty::Hard, 25);
        let rng = RandomSource::seeded(99);
        let mut hits = [0usize; 25];

        for _ in 0..20_000 {
            let drawn = draw(pool.clone(), 1, &rng);
            hits[drawn[0].order_index as usize] += 1;
        }

        // 800 expected per index
        assert!(hits.iter().all(|&h| (600..=1_000).contains(&h)), "{:?}", hits);
    }

    #[test]
    fn test_exhausted_tier_is_shuffled() {
        let pool = problems(Difficulty::Easy, 3);
        let mut orders = HashSet::new();

        for seed in 0..30 {
            let selection = assemble(
                TierPools {
                    easy: pool.clone(),
                    ..TierPools::default()
                },
                Distribution {
                    easy: 5,
                    medium: 0,
                    hard: 0,
                },
                5,
                &RandomSource::seeded(seed),
            )
            .unwrap();

            assert_eq!(selection.problems.len(), 3);
            assert!(selection.truncated);
            orders.insert(
                selection
                    .problems
                    .iter()
                    .map(|p| p.problem.order_index)
                    .collect::<Vec<_>>(),
            );
        }

        assert!(orders.len() > 1, "exhausted tier kept one order: {:?}", orders);
    }

    #[test]
    fn test_same_seed_same_selection() {
        let supply = pools(30, 30, 30);
        let run = |seed| {
            assemble(supply.clone(), plan_distribution(8), 8, &RandomSource::seeded(seed))
                .unwrap()
                .problems
                .into_iter()
                .map(|p| p.problem.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_concurrent_selections_with_shared_generator() {
        let rng = RandomSource::seeded(2024);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..100)
                .map(|i| {
                    let rng = rng.clone();
                    scope.spawn(move || {
                        let count = 1 + i % 20;
                        assemble(pools(15, 15, 15), plan_distribution(count), count, &rng)
                    })
                })
                .collect();

            for handle in handles {
                let selection = handle.join().unwrap().unwrap();
                assert_well_formed(&selection);
            }
        });
    }

    #[test]
    fn test_per_call_generator_under_concurrency() {
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..100)
                .map(|_| {
                    scope.spawn(|| {
                        assemble(pools(5, 5, 5), plan_distribution(9), 9, &RandomSource::PerCall)
                    })
                })
                .collect();

            for handle in handles {
                assert_well_formed(&handle.join().unwrap().unwrap());
            }
        });
    }
}
