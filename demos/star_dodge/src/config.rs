use std::num::ParseIntError;

use thiserror::Error;

/// Logical canvas width; the window is scaled to fit it.
pub const SCREEN_WIDTH: u32 = 640;
/// Logical canvas height.
pub const SCREEN_HEIGHT: u32 = 480;
pub const WINDOW_TITLE: &str = "Random Direction Enemy with Lives";

/// Side of the player and enemy squares.
pub const SPRITE_SIZE: f32 = 16.0;
/// Largest x a sprite's top-left corner may take.
pub const MAX_X: f32 = SCREEN_WIDTH as f32 - SPRITE_SIZE;
/// Largest y a sprite's top-left corner may take.
pub const MAX_Y: f32 = SCREEN_HEIGHT as f32 - SPRITE_SIZE;

/// Player movement per tick for each held direction.
pub const PLAYER_STEP: f32 = 2.0;
/// Enemy velocity components are drawn from `[-ENEMY_MAX_SPEED, ENEMY_MAX_SPEED)`.
pub const ENEMY_MAX_SPEED: f32 = 3.0;
/// Ticks an enemy keeps one velocity, drawn per move segment.
pub const MOVE_LIMIT_RANGE: std::ops::RangeInclusive<u32> = 10..=19;
pub const STAR_SIZE: f32 = 2.0;

pub const PLAYER_START: (f32, f32) = (320.0, 240.0);
pub const ENEMY_START: (f32, f32) = (100.0, 100.0);

/// Environment variable holding an optional `u64` seed.
pub const SEED_ENV: &str = "STAR_DODGE_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got {value:?}")]
    InvalidSeed {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Startup settings for a game session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DodgeConfig {
    pub lives: i32,
    pub star_count: usize,
    /// Seed for the game's random source. `None` picks one at startup.
    pub seed: Option<u64>,
}

impl Default for DodgeConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            star_count: 100,
            seed: None,
        }
    }
}

impl DodgeConfig {
    /// Defaults, with the seed taken from `STAR_DODGE_SEED` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`DodgeConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seed = match lookup(SEED_ENV) {
            Some(raw) if !raw.trim().is_empty() => {
                let seed = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|source| ConfigError::InvalidSeed {
                        var: SEED_ENV,
                        value: raw.clone(),
                        source,
                    })?;
                Some(seed)
            }
            _ => None,
        };

        Ok(Self {
            seed,
            ..Self::default()
        })
    }

    /// The configured seed, or a fresh random one.
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(|| fastrand::u64(..))
    }
}
