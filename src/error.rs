use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got {value:?}")]
    NotANumber { var: &'static str, value: String },
    #[error("maze must be at least 3x3 cells, got {width}x{height}")]
    GridTooSmall { width: usize, height: usize },
    #[error("a {width}x{height} maze at {cell_columns} columns per cell does not fit a terminal")]
    GridTooLarge {
        width: usize,
        height: usize,
        cell_columns: usize,
    },
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

pub type GameResult<T> = Result<T, GameError>;
