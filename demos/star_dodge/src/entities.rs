use arcade2d::{Color, Drawable, Rect, Surface, Vec2};
use fastrand::Rng;

use crate::config::{
    ENEMY_MAX_SPEED, MAX_X, MAX_Y, MOVE_LIMIT_RANGE, PLAYER_STEP, SCREEN_HEIGHT, SCREEN_WIDTH,
    SPRITE_SIZE, STAR_SIZE,
};
use crate::controls::{Controls, Direction};

/// The white square steered with the arrow keys.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Top-left corner of the sprite.
    pub position: Vec2,
    pub lives: i32,
}

impl Player {
    /// A player at `position` (top-left corner) with `lives` remaining.
    pub fn new(position: Vec2, lives: i32) -> Self {
        Self { position, lives }
    }

    /// Move one step per held direction, skipping any step that would leave the field.
    pub fn update(&mut self, controls: &impl Controls) {
        if controls.is_held(Direction::Up) {
            self.position.y = step_within(self.position.y, -PLAYER_STEP, MAX_Y);
        }
        if controls.is_held(Direction::Down) {
            self.position.y = step_within(self.position.y, PLAYER_STEP, MAX_Y);
        }
        if controls.is_held(Direction::Left) {
            self.position.x = step_within(self.position.x, -PLAYER_STEP, MAX_X);
        }
        if controls.is_held(Direction::Right) {
            self.position.x = step_within(self.position.x, PLAYER_STEP, MAX_X);
        }
    }

    /// The 16×16 box covered by the sprite.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, Vec2::splat(SPRITE_SIZE))
    }

    /// Strict box overlap; squares that only touch do not collide.
    pub fn collides_with(&self, enemy: &Enemy) -> bool {
        self.bounds().intersects(&enemy.bounds())
    }
}

fn step_within(value: f32, step: f32, max: f32) -> f32 {
    let next = value + step;
    if (0.0..=max).contains(&next) {
        next
    } else {
        value
    }
}

impl Drawable for Player {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.bounds(), Color::WHITE);
    }
}

/// Wanders by holding a random velocity for a random number of ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub position: Vec2,
    /// Displacement per tick.
    pub velocity: Vec2,
    /// Ticks spent in the current move segment.
    pub move_counter: u32,
    /// Length of the current move segment.
    pub move_limit: u32,
}

impl Enemy {
    /// A motionless enemy whose first tick ends its (empty) move segment.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            move_counter: 0,
            move_limit: 0,
        }
    }

    /// Cruise along the current segment, or start a new one once it is used up,
    /// then clamp to the field.
    pub fn update(&mut self, rng: &mut Rng) {
        if self.move_counter <= self.move_limit {
            self.position += self.velocity;
            self.move_counter += 1;
        } else {
            self.velocity = Vec2::new(random_speed(rng), random_speed(rng));
            self.move_counter = 0;
            self.move_limit = rng.u32(MOVE_LIMIT_RANGE);
        }

        self.clamp_to_field(rng);
    }

    /// Pin the enemy inside the field; an axis that hit a wall gets a new random speed.
    fn clamp_to_field(&mut self, rng: &mut Rng) {
        if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.velocity.x = random_speed(rng);
        } else if self.position.x > MAX_X {
            self.position.x = MAX_X;
            self.velocity.x = random_speed(rng);
        }

        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity.y = random_speed(rng);
        } else if self.position.y > MAX_Y {
            self.position.y = MAX_Y;
            self.velocity.y = random_speed(rng);
        }
    }

    /// Jump to a uniformly random point of the whole screen.
    ///
    /// The point is not adjusted for sprite size; the next update clamps it.
    pub fn relocate(&mut self, rng: &mut Rng) {
        self.position = Vec2::new(
            rng.f32() * SCREEN_WIDTH as f32,
            rng.f32() * SCREEN_HEIGHT as f32,
        );
    }

    /// Same 16×16 box as the player's.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, Vec2::splat(SPRITE_SIZE))
    }
}

fn random_speed(rng: &mut Rng) -> f32 {
    rng.f32() * 2.0 * ENEMY_MAX_SPEED - ENEMY_MAX_SPEED
}

impl Drawable for Enemy {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.bounds(), Color::rgb8(255, 0, 0));
    }
}

/// Decorative background point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: Vec2,
}

impl Drawable for Star {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(
            Rect::from_origin_size(self.position, Vec2::splat(STAR_SIZE)),
            Color::WHITE,
        );
    }
}

/// `count` stars at whole-pixel positions spread uniformly over the screen.
pub fn init_stars(rng: &mut Rng, count: usize) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            position: Vec2::new(
                rng.u32(0..SCREEN_WIDTH) as f32,
                rng.u32(0..SCREEN_HEIGHT) as f32,
            ),
        })
        .collect()
}
