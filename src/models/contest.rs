//! Contest model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Problem;

/// Contest database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub duration_minutes: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: ContestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contest {
    /// Moment the contest timer runs out
    pub fn deadline(&self) -> DateTime<Utc> {
        self.started_at + Duration::minutes(self.duration_minutes as i64)
    }

    /// An active contest whose timer has run out
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ContestStatus::Active && now > self.deadline()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Seconds left on the timer; zero once expired or no longer active
    pub fn time_remaining_seconds_at(&self, now: DateTime<Utc>) -> i64 {
        if self.status != ContestStatus::Active {
            return 0;
        }
        (self.deadline() - now).num_seconds().max(0)
    }
}

/// Contest lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "contest_status", rename_all = "lowercase")]
pub enum ContestStatus {
    Active,
    Completed,
    Abandoned,
}

impl std::fmt::Display for ContestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// Problem slot within a contest, joined with its catalog entry
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContestProblem {
    pub contest_id: Uuid,
    /// 1-based position assigned at creation
    pub position: i32,
    pub is_completed: bool,
    #[sqlx(flatten)]
    pub problem: Problem,
}

/// Per-user contest counts by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct ContestStats {
    pub total_contests: i64,
    pub completed_contests: i64,
    pub abandoned_contests: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contest(status: ContestStatus, started_minutes_ago: i64, duration: i32) -> Contest {
        let now = Utc::now();
        Contest {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            duration_minutes: duration,
            started_at: now - Duration::minutes(started_minutes_ago),
            ended_at: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_active_contest_expires_after_duration() {
        let running = contest(ContestStatus::Active, 10, 60);
        assert!(!running.is_expired());

        let overdue = contest(ContestStatus::Active, 61, 60);
        assert!(overdue.is_expired());
    }

    #[test]
    fn test_finished_contest_never_expires() {
        let done = contest(ContestStatus::Completed, 500, 60);
        assert!(!done.is_expired());
        assert_eq!(done.time_remaining_seconds_at(Utc::now()), 0);
    }

    #[test]
    fn test_time_remaining() {
        let c = contest(ContestStatus::Active, 0, 30);
        let now = c.started_at + Duration::minutes(10);
        assert_eq!(c.time_remaining_seconds_at(now), 20 * 60);
        assert_eq!(c.time_remaining_seconds_at(c.deadline() + Duration::seconds(5)), 0);
    }
}
