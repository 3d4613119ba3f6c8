//! Concurrent retrieval of per-tier unsolved problem pools

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use uuid::Uuid;

use super::SelectionError;
use crate::{
    error::AppResult,
    models::{Difficulty, Problem},
};

/// Capability the engine needs from storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnsolvedProblemSource: Send + Sync {
    /// Catalog problems of `difficulty` that `user_id` has never solved
    async fn fetch_unsolved(&self, user_id: Uuid, difficulty: Difficulty)
    -> AppResult<Vec<Problem>>;
}

/// Unsolved pools for all three tiers
#[derive(Debug, Clone, Default)]
pub struct TierPools {
    pub easy: Vec<Problem>,
    pub medium: Vec<Problem>,
    pub hard: Vec<Problem>,
}

impl TierPools {
    pub fn len(&self, tier: Difficulty) -> usize {
        match tier {
            Difficulty::Easy => self.easy.len(),
            Difficulty::Medium => self.medium.len(),
            Difficulty::Hard => self.hard.len(),
        }
    }

    /// Move a tier's pool out, leaving it empty
    pub fn take(&mut self, tier: Difficulty) -> Vec<Problem> {
        match tier {
            Difficulty::Easy => std::mem::take(&mut self.easy),
            Difficulty::Medium => std::mem::take(&mut self.medium),
            Difficulty::Hard => std::mem::take(&mut self.hard),
        }
    }
}

/// Fetch all three pools concurrently.
///
/// The first failing tier aborts the rest. The whole fan-out is bounded by
/// `limit` and abandoned as soon as `cancelled` resolves; either way no
/// partial pools are returned.
pub async fn fetch_pools<F>(
    source: &dyn UnsolvedProblemSource,
    user_id: Uuid,
    limit: Duration,
    cancelled: F,
) -> Result<TierPools, SelectionError>
where
    F: Future<Output = ()>,
{
    let fetch_tier = move |tier: Difficulty| async move {
        source
            .fetch_unsolved(user_id, tier)
            .await
            .map_err(|e| SelectionError::PoolFetch {
                tier,
                source: Box::new(e),
            })
    };

    let fan_in = async {
        let (easy, medium, hard) = tokio::try_join!(
            fetch_tier(Difficulty::Easy),
            fetch_tier(Difficulty::Medium),
            fetch_tier(Difficulty::Hard),
        )?;
        Ok::<_, SelectionError>(TierPools { easy, medium, hard })
    };

    tokio::select! {
        result = tokio::time::timeout(limit, fan_in) => match result {
            Ok(pools) => pools,
            Err(_) => Err(SelectionError::Timeout(limit)),
        },
        _ = cancelled => Err(SelectionError::Cancelled),
    }
}
