use crate::components::{Direction, Pos};
use crate::level::Grid;

/// First pressed direction, in up/down/left/right order, whose target cell
/// is walkable. A pressed but blocked key falls through to the next one.
pub fn choose_step<F>(grid: &Grid, from: Pos, pressed: F) -> Option<(Pos, Direction)>
where
    F: Fn(Direction) -> bool,
{
    Direction::ALL.into_iter().find_map(|dir| {
        if !pressed(dir) {
            return None;
        }
        let next = from.step(dir)?;
        grid.is_walkable(next).then_some((next, dir))
    })
}
