use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::rules::{LevelRules, MatchRules};
use crate::error::AppError;

/// Tunables for the trivia core, read from `TRIVIA_*` environment variables.
///
/// Every variable is optional; unset variables fall back to the defaults
/// documented on each field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// `TRIVIA_QUESTIONS_PER_LEVEL` (10)
    pub questions_per_level: usize,
    /// `TRIVIA_QUESTIONS_PER_MATCH` (10)
    pub questions_per_match: usize,
    /// `TRIVIA_POINTS_PER_CORRECT` (2)
    pub points_per_correct: u32,
    /// `TRIVIA_STARTING_LIVES` (3)
    pub starting_lives: u8,
    /// `TRIVIA_RETRY_COST` (20)
    pub retry_cost: u32,
    /// `TRIVIA_LEVEL_UP_BONUS` (10)
    pub level_up_bonus: u32,
    /// `TRIVIA_CAS_RETRY_LIMIT` (5)
    pub cas_retry_limit: u32,
    /// `TRIVIA_MATCH_SHUFFLE_SEED` (unset: questions keep provider order)
    pub match_shuffle_seed: Option<u64>,
    /// `TRIVIA_GALLERY_DIR` (`./gallery`)
    pub gallery_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            questions_per_level: 10,
            questions_per_match: 10,
            points_per_correct: 2,
            starting_lives: 3,
            retry_cost: 20,
            level_up_bonus: 10,
            cas_retry_limit: 5,
            match_shuffle_seed: None,
            gallery_dir: PathBuf::from("./gallery"),
        }
    }
}

impl GameConfig {
    /// Build the config from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let config = Self {
            questions_per_level: parse_var("TRIVIA_QUESTIONS_PER_LEVEL")?
                .unwrap_or(defaults.questions_per_level),
            questions_per_match: parse_var("TRIVIA_QUESTIONS_PER_MATCH")?
                .unwrap_or(defaults.questions_per_match),
            points_per_correct: parse_var("TRIVIA_POINTS_PER_CORRECT")?
                .unwrap_or(defaults.points_per_correct),
            starting_lives: parse_var("TRIVIA_STARTING_LIVES")?
                .unwrap_or(defaults.starting_lives),
            retry_cost: parse_var("TRIVIA_RETRY_COST")?.unwrap_or(defaults.retry_cost),
            level_up_bonus: parse_var("TRIVIA_LEVEL_UP_BONUS")?
                .unwrap_or(defaults.level_up_bonus),
            cas_retry_limit: parse_var("TRIVIA_CAS_RETRY_LIMIT")?
                .unwrap_or(defaults.cas_retry_limit),
            match_shuffle_seed: parse_var("TRIVIA_MATCH_SHUFFLE_SEED")?,
            gallery_dir: env::var("TRIVIA_GALLERY_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.gallery_dir),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a level or match unplayable.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.questions_per_level == 0 {
            return Err(AppError::config(
                "TRIVIA_QUESTIONS_PER_LEVEL must be at least 1".to_string(),
            ));
        }
        if self.questions_per_match == 0 {
            return Err(AppError::config(
                "TRIVIA_QUESTIONS_PER_MATCH must be at least 1".to_string(),
            ));
        }
        if self.starting_lives == 0 {
            return Err(AppError::config(
                "TRIVIA_STARTING_LIVES must be at least 1".to_string(),
            ));
        }
        if self.cas_retry_limit == 0 {
            return Err(AppError::config(
                "TRIVIA_CAS_RETRY_LIMIT must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn level_rules(&self) -> LevelRules {
        LevelRules {
            questions_per_level: self.questions_per_level,
            points_per_correct: self.points_per_correct,
            starting_lives: self.starting_lives,
            retry_cost: self.retry_cost,
            level_up_bonus: self.level_up_bonus,
        }
    }

    pub fn match_rules(&self) -> MatchRules {
        MatchRules {
            questions_per_match: self.questions_per_match,
            points_per_correct: self.points_per_correct,
            shuffle_seed: self.match_shuffle_seed,
        }
    }
}

/// Parse an optional environment variable, failing on malformed values.
fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::config(format!(
                "Environment variable '{name}' has an invalid value: '{raw}'"
            ))
        }),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
