//! Contest problem selection
//!
//! Plans a difficulty distribution for the requested count, fetches the
//! user's unsolved pools for every tier concurrently, and draws an ordered,
//! gradually harder problem list from them. Storage is reached only through
//! [`UnsolvedProblemSource`].

pub mod distribution;
pub mod fetcher;
pub mod sampler;

use std::{future::Future, sync::Arc, time::Duration};

use uuid::Uuid;

pub use distribution::{Distribution, plan_distribution};
pub use fetcher::{TierPools, UnsolvedProblemSource, fetch_pools};
pub use sampler::{RandomSource, assemble};

use crate::{
    error::AppError,
    models::{Difficulty, Problem},
};

/// Selection failures
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("problem count must be at least 1, got {0}")]
    InvalidCount(usize),

    #[error("failed to fetch unsolved {tier} problems: {source}")]
    PoolFetch {
        tier: Difficulty,
        source: Box<AppError>,
    },

    #[error("not enough unsolved problems for {requested} problems")]
    NotEnoughProblems { requested: usize },

    #[error("problem pools not fetched within {0:?}")]
    Timeout(Duration),

    #[error("selection cancelled")]
    Cancelled,
}

/// A problem with its 1-based position in the contest
#[derive(Debug, Clone)]
pub struct SelectedProblem {
    pub position: u32,
    pub problem: Problem,
}

/// Result of a successful selection
#[derive(Debug, Clone)]
pub struct Selection {
    /// Ordered by non-decreasing difficulty weight
    pub problems: Vec<SelectedProblem>,
    pub requested: usize,
    pub distribution: Distribution,
    /// Fewer problems than requested were available
    pub truncated: bool,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Selects contest problems for a user
#[derive(Clone)]
pub struct ContestSelector {
    source: Arc<dyn UnsolvedProblemSource>,
    rng: RandomSource,
    fetch_timeout: Duration,
}

impl ContestSelector {
    pub fn new(
        source: Arc<dyn UnsolvedProblemSource>,
        rng: RandomSource,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            rng,
            fetch_timeout,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Select `count` problems for `user_id`
    pub async fn select(&self, user_id: Uuid, count: usize) -> Result<Selection, SelectionError> {
        self.select_until(user_id, count, std::future::pending()).await
    }

    /// Like [`select`](Self::select), giving up with
    /// [`SelectionError::Cancelled`] once `cancelled` resolves before the
    /// pools are in.
    pub async fn select_until<F>(
        &self,
        user_id: Uuid,
        count: usize,
        cancelled: F,
    ) -> Result<Selection, SelectionError>
    where
        F: Future<Output = ()>,
    {
        if count < 1 {
            return Err(SelectionError::InvalidCount(count));
        }

        let distribution = plan_distribution(count);
        tracing::debug!(
            user_id = %user_id,
            requested = count,
            easy = distribution.easy,
            medium = distribution.medium,
            hard = distribution.hard,
            "Planned difficulty distribution"
        );

        let pools = fetch_pools(
            self.source.as_ref(),
            user_id,
            self.fetch_timeout,
            cancelled,
        )
        .await?;

        let selection = assemble(pools, distribution, count, &self.rng)?;

        tracing::info!(
            user_id = %user_id,
            requested = count,
            selected = selection.len(),
            truncated = selection.truncated,
            "Selected contest problems"
        );

        Ok(selection)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::UnsolvedProblemSource;
    use crate::{
        error::AppResult,
        models::{Difficulty, Problem, SolveRecord},
    };

    pub fn problem(difficulty: Difficulty, order_index: i32) -> Problem {
        let slug = format!("{}-{}", difficulty.as_str().to_lowercase(), order_index);
        Problem {
            id: Uuid::new_v4(),
            title: slug.replace('-', " "),
            leetcode_url: format!("https://leetcode.com/problems/{}/", slug),
            neetcode_url: None,
            slug,
            difficulty,
            topics: vec!["Arrays & Hashing".to_string()],
            order_index,
        }
    }

    pub fn problems(difficulty: Difficulty, n: usize) -> Vec<Problem> {
        (0..n as i32).map(|i| problem(difficulty, i)).collect()
    }

    /// Catalog plus solve history held in memory
    #[derive(Default)]
    pub struct InMemorySource {
        pub catalog: Vec<Problem>,
        pub solves: Vec<SolveRecord>,
    }

    impl InMemorySource {
        pub fn with_catalog(easy: usize, medium: usize, hard: usize) -> Self {
            let mut catalog = problems(Difficulty::Easy, easy);
            catalog.extend(problems(Difficulty::Medium, medium));
            catalog.extend(problems(Difficulty::Hard, hard));
            Self {
                catalog,
                solves: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl UnsolvedProblemSource for InMemorySource {
        async fn fetch_unsolved(
            &self,
            user_id: Uuid,
            difficulty: Difficulty,
        ) -> AppResult<Vec<Problem>> {
            let solved: HashSet<Uuid> = self
                .solves
                .iter()
                .filter(|s| s.user_id == user_id)
                .map(|s| s.problem_id)
                .collect();

            Ok(self
                .catalog
                .iter()
                .filter(|p| p.difficulty == difficulty && !solved.contains(&p.id))
                .cloned()
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Utc;
    use tokio_test::assert_ok;

    use super::{testing::InMemorySource, *};
    use crate::models::SolveRecord;

    fn selector(source: InMemorySource, seed: u64) -> ContestSelector {
        ContestSelector::new(
            Arc::new(source),
            RandomSource::seeded(seed),
            Duration::from_secs(2),
        )
    }

    fn solve(user_id: Uuid, problem_id: Uuid) -> SolveRecord {
        SolveRecord {
            id: Uuid::new_v4(),
            user_id,
            problem_id,
            contest_id: None,
            solved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_fresh_user_five_problems() {
        let selector = selector(InMemorySource::with_catalog(45, 80, 25), 1);

        let selection = assert_ok!(selector.select(Uuid::new_v4(), 5).await);

        assert_eq!(
            selection.distribution,
            Distribution {
                easy: 2,
                medium: 2,
                hard: 1
            }
        );
        assert_eq!(selection.len(), 5);
        assert!(!selection.truncated);

        let tiers: Vec<Difficulty> = selection
            .problems
            .iter()
            .map(|p| p.problem.difficulty)
            .collect();
        assert_eq!(
            tiers,
            vec![
                Difficulty::Easy,
                Difficulty::Easy,
                Difficulty::Medium,
                Difficulty::Medium,
                Difficulty::Hard
            ]
        );

        let ids: HashSet<Uuid> = selection.problems.iter().map(|p| p.problem.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn test_zero_count_rejected() {
        let selector = selector(InMemorySource::with_catalog(5, 5, 5), 1);
        let err = selector.select(Uuid::new_v4(), 0).await.unwrap_err();
        assert!(matches!(err, SelectionError::InvalidCount(0)));
    }

    #[tokio::test]
    async fn test_duplicate_solve_records_exclude_once() {
        let user_id = Uuid::new_v4();
        let mut source = InMemorySource::with_catalog(3, 3, 3);
        let solved_id = source.catalog[0].id;
        source.solves.push(solve(user_id, solved_id));
        source.solves.push(solve(user_id, solved_id));
        let selector = selector(source, 4);

        // Two records for one problem still leave exactly 8 unsolved
        let selection = assert_ok!(selector.select(user_id, 9).await);
        assert_eq!(selection.len(), 8);
        assert!(selection.truncated);
        assert!(selection.problems.iter().all(|p| p.problem.id != solved_id));
    }

    #[tokio::test]
    async fn test_other_users_solves_do_not_exclude() {
        let mut source = InMemorySource::with_catalog(1, 1, 1);
        let other = Uuid::new_v4();
        let ids: Vec<Uuid> = source.catalog.iter().map(|p| p.id).collect();
        source.solves.extend(ids.iter().map(|id| solve(other, *id)));
        let selector = selector(source, 5);

        let selection = assert_ok!(selector.select(Uuid::new_v4(), 3).await);
        assert_eq!(selection.len(), 3);
    }

    #[tokio::test]
    async fn test_everything_solved() {
        let user_id = Uuid::new_v4();
        let mut source = InMemorySource::with_catalog(2, 2, 2);
        let ids: Vec<Uuid> = source.catalog.iter().map(|p| p.id).collect();
        source.solves.extend(ids.iter().map(|id| solve(user_id, *id)));
        let selector = selector(source, 6);

        let err = selector.select(user_id, 5).await.unwrap_err();
        assert!(matches!(err, SelectionError::NotEnoughProblems { requested: 5 }));
    }

    #[tokio::test]
    async fn test_fetch_failure_names_tier() {
        let mut source = fetcher::MockUnsolvedProblemSource::new();
        source.expect_fetch_unsolved().returning(|_, tier| match tier {
            Difficulty::Hard => Err(AppError::Database("timeout".to_string())),
            _ => Ok(testing::problems(tier, 5)),
        });
        let selector = ContestSelector::new(
            Arc::new(source),
            RandomSource::PerCall,
            Duration::from_secs(2),
        );

        let err = selector.select(Uuid::new_v4(), 5).await.unwrap_err();
        assert!(matches!(
            err,
            SelectionError::PoolFetch {
                tier: Difficulty::Hard,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_selector() {
        let selector = selector(InMemorySource::with_catalog(20, 20, 20), 77);

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let selector = selector.clone();
                tokio::spawn(async move { selector.select(Uuid::new_v4(), 1 + i % 20).await })
            })
            .collect();

        for handle in handles {
            let selection = handle.await.unwrap().unwrap();
            let ids: HashSet<Uuid> = selection.problems.iter().map(|p| p.problem.id).collect();
            assert_eq!(ids.len(), selection.len());
            assert!(
                selection
                    .problems
                    .windows(2)
                    .all(|w| w[0].problem.difficulty <= w[1].problem.difficulty)
            );
        }
    }
}
