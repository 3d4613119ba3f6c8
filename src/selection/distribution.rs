//! Difficulty distribution planning
//!
//! Maps a requested problem count to per-tier targets so that larger
//! contests lean harder.

use serde::Serialize;

use crate::models::Difficulty;

/// Target number of problems to draw from each tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Distribution {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl Distribution {
    pub fn for_tier(&self, tier: Difficulty) -> usize {
        match tier {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Sum of all tiers. May exceed the requested count after the floor pass.
    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard
    }
}

/// Compute the per-tier distribution for `requested` problems.
///
/// Callers validate `requested >= 1`; zero yields an empty distribution.
///
/// Once `requested >= 3`, every tier that came out as zero is raised to one
/// without rebalancing the others, so counts 3 and 4 plan one problem more
/// than requested. The sampler never returns more than it drew, and the
/// extra slot is simply left unfilled when supply runs short.
pub fn plan_distribution(requested: usize) -> Distribution {
    let mut dist = match requested {
        0 => Distribution::default(),
        1 => Distribution {
            easy: 1,
            medium: 0,
            hard: 0,
        },
        2..=3 => Distribution {
            easy: requested - 1,
            medium: 1,
            hard: 0,
        },
        4..=5 => Distribution {
            easy: 2,
            medium: 2,
            hard: requested - 4,
        },
        6..=10 => {
            // floor(n * 0.3) and floor(n * 0.4) in integer arithmetic
            let easy = requested * 3 / 10;
            let medium = requested * 4 / 10;
            Distribution {
                easy,
                medium,
                hard: requested - easy - medium,
            }
        }
        _ => {
            let easy = requested / 4;
            let medium = requested / 2;
            Distribution {
                easy,
                medium,
                hard: requested - easy - medium,
            }
        }
    };

    if requested >= 3 {
        for tier in [&mut dist.easy, &mut dist.medium, &mut dist.hard] {
            if *tier == 0 {
                *tier = 1;
            }
        }
    }

    dist
}
