//! Star Dodge: steer a white square around a wandering red one on a starfield.
//!
//! Three hits and it is game over.

pub mod config;
pub mod controls;
pub mod entities;
pub mod game;

pub use config::{ConfigError, DodgeConfig, SCREEN_HEIGHT, SCREEN_WIDTH, SEED_ENV, WINDOW_TITLE};
pub use controls::{Controls, Direction, HeldDirections};
pub use entities::{init_stars, Enemy, Player, Star};
pub use game::{GameState, StarDodge, GAME_OVER_TEXT};
