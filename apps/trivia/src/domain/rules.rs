//! Scoring and progression constants, supplied by `GameConfig`.

/// Rules for a single-player level attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRules {
    /// Questions a run must get through to complete.
    pub questions_per_level: usize,
    pub points_per_correct: u32,
    pub starting_lives: u8,
    /// Points deducted from the stored balance for one retry.
    pub retry_cost: u32,
    /// Extra points on top of the run score when a level unlocks the next one.
    pub level_up_bonus: u32,
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            questions_per_level: 10,
            points_per_correct: 2,
            starting_lives: 3,
            retry_cost: 20,
            level_up_bonus: 10,
        }
    }
}

/// Rules for a head-to-head match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    pub questions_per_match: usize,
    pub points_per_correct: u32,
    /// Seed for shuffling the fetched question set; `None` keeps provider order.
    pub shuffle_seed: Option<u64>,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            questions_per_match: 10,
            points_per_correct: 2,
            shuffle_seed: None,
        }
    }
}
