use crate::error::ConfigError;

pub const DEFAULT_WIDTH: usize = 20;
pub const DEFAULT_HEIGHT: usize = 15;
pub const DEFAULT_CELL_COLUMNS: usize = 2;
pub const DEFAULT_PLAYER_CADENCE_MS: u64 = 100;
pub const DEFAULT_ADVERSARY_CADENCE_MS: u64 = 150;
pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_DOT_REWARD: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Maze width in cells.
    pub width: usize,
    /// Maze height in cells.
    pub height: usize,
    /// Terminal columns drawn per maze cell.
    pub cell_columns: usize,
    pub player_cadence_ms: u64,
    pub adversary_cadence_ms: u64,
    pub fps: u32,
    pub dot_reward: u32,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cell_columns: DEFAULT_CELL_COLUMNS,
            player_cadence_ms: DEFAULT_PLAYER_CADENCE_MS,
            adversary_cadence_ms: DEFAULT_ADVERSARY_CADENCE_MS,
            fps: DEFAULT_FPS,
            dot_reward: DEFAULT_DOT_REWARD,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults overridden by any `MAZE_CHASE_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            width: read(&lookup, "MAZE_CHASE_WIDTH")?.unwrap_or(defaults.width),
            height: read(&lookup, "MAZE_CHASE_HEIGHT")?.unwrap_or(defaults.height),
            cell_columns: read(&lookup, "MAZE_CHASE_CELL_COLUMNS")?
                .unwrap_or(defaults.cell_columns),
            player_cadence_ms: read(&lookup, "MAZE_CHASE_PLAYER_MS")?
                .unwrap_or(defaults.player_cadence_ms),
            adversary_cadence_ms: read(&lookup, "MAZE_CHASE_ADVERSARY_MS")?
                .unwrap_or(defaults.adversary_cadence_ms),
            fps: read(&lookup, "MAZE_CHASE_FPS")?.unwrap_or(defaults.fps),
            dot_reward: read(&lookup, "MAZE_CHASE_DOT_REWARD")?.unwrap_or(defaults.dot_reward),
            seed: read(&lookup, "MAZE_CHASE_SEED")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 3 || self.height < 3 {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.cell_columns == 0 {
            return Err(ConfigError::Zero { name: "cell columns" });
        }
        let columns = self.width.checked_mul(self.cell_columns);
        let rows = self.height.checked_add(2);
        let fits = |n: Option<usize>| n.is_some_and(|n| n <= usize::from(u16::MAX));
        if !fits(columns) || !fits(rows) {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
                cell_columns: self.cell_columns,
            });
        }
        if self.player_cadence_ms == 0 {
            return Err(ConfigError::Zero { name: "player cadence" });
        }
        if self.adversary_cadence_ms == 0 {
            return Err(ConfigError::Zero { name: "adversary cadence" });
        }
        if self.fps == 0 {
            return Err(ConfigError::Zero { name: "frame rate" });
        }
        Ok(())
    }
}

fn read<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::NotANumber { var, value }),
    }
}
