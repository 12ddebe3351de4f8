//! Session state and the fixed per-tick procedure.
//!
//! The loop is single-threaded. Player and adversary are gated by their own
//! cadences against the injected clock, independent of the frame rate.

use std::io;

use rand::Rng;
use tracing::{debug, info};

use crate::components::{Actor, Direction, EntityKind, Pos};
use crate::config::GameConfig;
use crate::error::GameResult;
use crate::level::{Cell, Entry, Grid};
use crate::{ghost, maze, player};

pub trait Renderer {
    fn draw_wall(&mut self, pos: Pos) -> io::Result<()>;
    fn draw_dot(&mut self, pos: Pos) -> io::Result<()>;
    fn draw_sprite(&mut self, kind: EntityKind, pos: Pos, facing: Direction) -> io::Result<()>;
    fn draw_score(&mut self, score: u32) -> io::Result<()>;
    fn present_frame(&mut self) -> io::Result<()>;
}

pub trait Input {
    /// Drains pending events; true once the user asked to quit.
    fn poll_quit_requested(&mut self) -> io::Result<bool>;
    fn is_direction_pressed(&self, dir: Direction) -> bool;
}

pub trait Clock {
    /// Monotonic milliseconds.
    fn now_millis(&self) -> u64;
}

pub trait FrameGovernor {
    fn cap_frame_rate(&mut self, fps: u32);
}

/// The collaborators a session draws, reads and sleeps through.
pub struct Services<'a> {
    pub renderer: &'a mut dyn Renderer,
    pub input: &'a mut dyn Input,
    pub clock: &'a dyn Clock,
    pub governor: &'a mut dyn FrameGovernor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The adversary caught the player.
    GameOver { score: u32 },
    Quit { score: u32 },
    /// Every dot was eaten.
    Cleared { score: u32 },
}

impl Outcome {
    pub fn score(self) -> u32 {
        match self {
            Outcome::GameOver { score } | Outcome::Quit { score } | Outcome::Cleared { score } => {
                score
            }
        }
    }
}

pub struct GameState<R> {
    config: GameConfig,
    grid: Grid,
    player: Actor,
    adversary: Actor,
    score: u32,
    rng: R,
}

impl<R: Rng> GameState<R> {
    /// Carves a fresh maze, puts the player on the start cell and the
    /// adversary on the goal cell.
    pub fn new(config: GameConfig, mut rng: R, now_ms: u64) -> Self {
        let grid = maze::generate(config.width, config.height, &mut rng);
        let adversary_pos = maze::goal(config.width, config.height);
        let facing = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        let mut state = Self::from_parts(config, grid, maze::START, adversary_pos, rng, now_ms);
        state.adversary.direction = facing;
        state
    }

    /// Session over an existing grid. The player starts facing right.
    pub fn from_parts(
        config: GameConfig,
        grid: Grid,
        player_pos: Pos,
        adversary_pos: Pos,
        rng: R,
        now_ms: u64,
    ) -> Self {
        Self {
            config,
            grid,
            player: Actor::new(EntityKind::Player, player_pos, Direction::Right, now_ms),
            adversary: Actor::new(EntityKind::Adversary, adversary_pos, Direction::Left, now_ms),
            score: 0,
            rng,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn adversary(&self) -> &Actor {
        &self.adversary
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Movement, pursuit, collection and terminal checks for one tick.
    pub fn tick(&mut self, now_ms: u64, input: &dyn Input) -> Option<Outcome> {
        if self.player.ready(now_ms, self.config.player_cadence_ms) {
            let step = player::choose_step(&self.grid, self.player.pos, |dir| {
                input.is_direction_pressed(dir)
            });
            if let Some((next, dir)) = step {
                let entry = self.grid.try_enter(&mut self.player, next);
                if entry.moved() {
                    self.player.direction = dir;
                    self.player.last_move_ms = now_ms;
                }
                if entry == Entry::Collected {
                    self.score = self.score.saturating_add(self.config.dot_reward);
                }
            }
        }

        if self.adversary.ready(now_ms, self.config.adversary_cadence_ms) {
            let (pos, dir) = ghost::next_move(
                &self.grid,
                self.adversary.pos,
                self.player.pos,
                self.adversary.direction,
                &mut self.rng,
            );
            self.adversary.pos = pos;
            self.adversary.direction = dir;
            self.adversary.last_move_ms = now_ms;
        }

        // Covers the spawn cell, which no move ever entered.
        if self.grid.collect(self.player.pos) {
            self.score = self.score.saturating_add(self.config.dot_reward);
        }

        if self.player.pos == self.adversary.pos {
            debug!(pos = ?self.player.pos, "adversary caught the player");
            return Some(Outcome::GameOver { score: self.score });
        }
        if self.grid.cells_remaining() == 0 {
            return Some(Outcome::Cleared { score: self.score });
        }
        None
    }

    /// Hands the whole scene to `renderer` and presents it.
    pub fn draw(&self, renderer: &mut dyn Renderer) -> io::Result<()> {
        for (pos, cell) in self.grid.iter() {
            match cell {
                Cell::Wall => renderer.draw_wall(pos)?,
                Cell::Open => renderer.draw_dot(pos)?,
                Cell::Cleared => {}
            }
        }
        renderer.draw_sprite(EntityKind::Player, self.player.pos, self.player.direction)?;
        renderer.draw_sprite(
            EntityKind::Adversary,
            self.adversary.pos,
            self.adversary.direction,
        )?;
        renderer.draw_score(self.score)?;
        renderer.present_frame()
    }
}

/// Plays one session to completion.
pub fn run<R: Rng>(config: GameConfig, rng: R, services: Services<'_>) -> GameResult<Outcome> {
    config.validate()?;
    let Services {
        renderer,
        input,
        clock,
        governor,
    } = services;

    let fps = config.fps;
    let mut state = GameState::new(config, rng, clock.now_millis());
    info!(
        width = state.grid.width(),
        height = state.grid.height(),
        dots = state.grid.cells_remaining(),
        "session started"
    );

    loop {
        if input.poll_quit_requested()? {
            let outcome = Outcome::Quit { score: state.score };
            info!(?outcome, "session ended");
            return Ok(outcome);
        }

        let outcome = state.tick(clock.now_millis(), &*input);
        state.draw(renderer)?;
        if let Some(outcome) = outcome {
            info!(?outcome, "session ended");
            return Ok(outcome);
        }
        governor.cap_frame_rate(fps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Held(Option<Direction>);

    impl Input for Held {
        fn poll_quit_requested(&mut self) -> io::Result<bool> {
            Ok(false)
        }

        fn is_direction_pressed(&self, dir: Direction) -> bool {
            self.0 == Some(dir)
        }
    }

    fn corridor() -> Grid {
        Grid::from_rows(&["#######", "#.....#", "#######"])
    }

    fn state(grid: Grid, player: Pos, adversary: Pos) -> GameState<ChaCha8Rng> {
        GameState::from_parts(
            GameConfig::default(),
            grid,
            player,
            adversary,
            ChaCha8Rng::seed_from_u64(0),
            0,
        )
    }

    #[test]
    fn player_moves_only_after_cadence() {
        let mut game = state(corridor(), Pos::new(1, 1), Pos::new(5, 1));
        let right = Held(Some(Direction::Right));
        game.tick(100, &right);
        assert_eq!(game.player().pos, Pos::new(1, 1));
        game.tick(101, &right);
        assert_eq!(game.player().pos, Pos::new(2, 1));
        assert_eq!(game.player().last_move_ms, 101);
        game.tick(150, &right);
        assert_eq!(game.player().pos, Pos::new(2, 1));
    }

    #[test]
    fn spawn_dot_is_eaten_on_the_first_tick() {
        let mut game = state(corridor(), Pos::new(1, 1), Pos::new(5, 1));
        assert_eq!(game.tick(1, &Held(None)), None);
        assert_eq!(game.score(), 10);
        assert_eq!(game.grid().get(Pos::new(1, 1)), Some(Cell::Cleared));
    }

    #[test]
    fn blocked_input_keeps_the_timestamp() {
        let mut game = state(corridor(), Pos::new(1, 1), Pos::new(5, 1));
        game.tick(200, &Held(Some(Direction::Up)));
        assert_eq!(game.player().pos, Pos::new(1, 1));
        assert_eq!(game.player().last_move_ms, 0);
        assert_eq!(game.player().direction, Direction::Right);
    }

    #[test]
    fn catching_the_player_ends_the_session() {
        let mut game = state(corridor(), Pos::new(1, 1), Pos::new(2, 1));
        let outcome = game.tick(151, &Held(None));
        assert_eq!(outcome, Some(Outcome::GameOver { score: 10 }));
    }

    #[test]
    fn huge_dot_reward_saturates_the_score() {
        let config = GameConfig {
            dot_reward: u32::MAX,
            ..GameConfig::default()
        };
        let mut game = GameState::from_parts(
            config,
            corridor(),
            Pos::new(1, 1),
            Pos::new(5, 1),
            ChaCha8Rng::seed_from_u64(0),
            0,
        );
        let right = Held(Some(Direction::Right));
        game.tick(1, &right);
        assert_eq!(game.score(), u32::MAX);
        game.tick(102, &right);
        assert_eq!(game.player().pos, Pos::new(2, 1));
        assert_eq!(game.score(), u32::MAX);
    }

    #[test]
    fn eating_the_last_dot_clears_the_maze() {
        let grid = Grid::from_rows(&["######", "# .  #", "######"]);
        let mut game = state(grid, Pos::new(1, 1), Pos::new(4, 1));
        let outcome = game.tick(101, &Held(Some(Direction::Right)));
        assert_eq!(outcome, Some(Outcome::Cleared { score: 10 }));
    }
}
