//! Single-player maze chase: a procedurally carved maze, a dot-collecting
//! player and a greedy pursuer.

pub mod components;
pub mod config;
pub mod error;
pub mod game;
pub mod ghost;
pub mod level;
pub mod maze;
pub mod player;
pub mod render;
pub mod terminal;

pub use components::{Actor, Direction, EntityKind, Pos};
pub use config::GameConfig;
pub use error::{ConfigError, GameError};
pub use game::{run, Clock, FrameGovernor, GameState, Input, Outcome, Renderer, Services};
pub use level::{Cell, Grid};
