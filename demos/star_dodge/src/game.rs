use anyhow::Result;
use arcade2d::{Color, Drawable, EngineContext, Game, Surface, Vec2};
use fastrand::Rng;

use crate::config::{DodgeConfig, ENEMY_START, PLAYER_START, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::controls::Controls;
use crate::entities::{init_stars, Enemy, Player, Star};

pub const GAME_OVER_TEXT: &str = "GAME OVER!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    /// Terminal: nothing changes until the process restarts.
    GameOver,
}

/// The whole game: entities, state, and the random source driving them.
pub struct StarDodge {
    player: Player,
    enemy: Enemy,
    stars: Vec<Star>,
    state: GameState,
    rng: Rng,
}

impl StarDodge {
    /// A fresh session: player centered, enemy near the top-left, new star field.
    pub fn new(config: &DodgeConfig, mut rng: Rng) -> Self {
        let stars = init_stars(&mut rng, config.star_count);
        Self::from_parts(
            Player::new(PLAYER_START.into(), config.lives),
            Enemy::new(ENEMY_START.into()),
            stars,
            rng,
        )
    }

    /// Assemble a running game from existing entities.
    pub fn from_parts(player: Player, enemy: Enemy, stars: Vec<Star>, rng: Rng) -> Self {
        Self {
            player,
            enemy,
            stars,
            state: GameState::Running,
            rng,
        }
    }

    /// Advance one tick: player, enemy, then collision bookkeeping.
    ///
    /// Does nothing once the game is over. Never fails.
    pub fn tick(&mut self, controls: &impl Controls) -> Result<()> {
        if self.state == GameState::GameOver {
            return Ok(());
        }

        self.player.update(controls);
        self.enemy.update(&mut self.rng);

        if self.player.collides_with(&self.enemy) {
            self.on_collision();
        }
        Ok(())
    }

    fn on_collision(&mut self) {
        self.player.lives -= 1;
        log::info!("Collision! Lives left: {}", self.player.lives);

        if self.player.lives <= 0 {
            self.state = GameState::GameOver;
            log::info!("game over");
        } else {
            self.enemy.relocate(&mut self.rng);
        }
    }

    /// Draw the current frame: the playfield and HUD, or the game-over screen.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.fill(Color::BLACK);

        if self.state == GameState::GameOver {
            surface.debug_print(GAME_OVER_TEXT);
            return;
        }

        let layers = self
            .stars
            .iter()
            .map(|star| star as &dyn Drawable)
            .chain([&self.player as &dyn Drawable, &self.enemy as &dyn Drawable]);
        for drawable in layers {
            drawable.draw(surface);
        }

        surface.debug_print(&format!("Lives: {}", self.player.lives));
    }

    /// Fixed logical canvas size, whatever the window size.
    pub fn logical_size(&self) -> (u32, u32) {
        (SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    /// Current phase of the session.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// True once the last life is lost.
    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Lives the player has left.
    pub fn lives(&self) -> i32 {
        self.player.lives
    }

    /// The player-controlled square.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The wandering red square.
    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    /// Background stars in draw order.
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Move the enemy directly, e.g. to stage a collision in a scripted scenario.
    pub fn place_enemy(&mut self, position: Vec2) {
        self.enemy = Enemy::new(position);
    }
}

impl Game for StarDodge {
    fn update(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.tick(ctx.input())
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        self.render(surface);
    }

    fn layout(&self, _outside_width: u32, _outside_height: u32) -> (u32, u32) {
        self.logical_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::HeldDirections;
    use arcade2d::{CommandList, DrawCommand};

    fn game(seed: u64) -> StarDodge {
        StarDodge::new(&DodgeConfig::default(), Rng::with_seed(seed))
    }

    #[test]
    fn new_game_matches_the_classic_setup() {
        let game = game(1);
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.player().position, Vec2::new(320.0, 240.0));
        assert_eq!(game.enemy().position, Vec2::new(100.0, 100.0));
        assert_eq!(game.stars().len(), 100);
    }

    #[test]
    fn layout_ignores_window_size() {
        let game = game(1);
        assert_eq!(Game::layout(&game, 1920, 1080), (640, 480));
        assert_eq!(Game::layout(&game, 1, 1), (640, 480));
    }

    #[test]
    fn collision_costs_a_life_and_moves_the_enemy() {
        let mut game = game(2);
        game.place_enemy(game.player().position);
        game.tick(&HeldDirections::none()).unwrap();

        assert_eq!(game.lives(), 2);
        assert_eq!(game.state(), GameState::Running);
        let p = game.enemy().position;
        assert!((0.0..640.0).contains(&p.x) && (0.0..480.0).contains(&p.y));
    }

    #[test]
    fn running_frame_draws_in_order() {
        let game = game(3);
        let mut surface = CommandList::new();
        game.render(&mut surface);

        let commands = surface.commands();
        assert_eq!(commands.len(), 1 + 100 + 2 + 1);
        assert_eq!(commands[0], DrawCommand::Fill(Color::BLACK));
        assert!(commands[1..101].iter().all(|c| matches!(
            c,
            DrawCommand::Rect { rect, .. } if rect.size == Vec2::splat(2.0)
        )));
        assert!(matches!(
            &commands[101],
            DrawCommand::Rect { rect, color } if rect.origin == game.player().position && *color == Color::WHITE
        ));
        assert!(matches!(
            &commands[102],
            DrawCommand::Rect { rect, color } if rect.origin == game.enemy().position && *color == Color::RED
        ));
        assert!(matches!(&commands[103], DrawCommand::Text { text, .. } if text == "Lives: 3"));
    }

    #[test]
    fn game_over_frame_only_shows_the_message() {
        let mut game = StarDodge::from_parts(
            Player::new(Vec2::new(50.0, 50.0), 1),
            Enemy::new(Vec2::new(50.0, 50.0)),
            Vec::new(),
            Rng::with_seed(4),
        );
        game.tick(&HeldDirections::none()).unwrap();
        assert!(game.is_game_over());

        let mut surface = CommandList::new();
        game.render(&mut surface);
        assert_eq!(surface.len(), 2);
        assert_eq!(surface.commands()[0], DrawCommand::Fill(Color::BLACK));
        assert!(matches!(&surface.commands()[1], DrawCommand::Text { text, .. } if text == GAME_OVER_TEXT));
    }
}
