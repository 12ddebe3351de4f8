//! Randomised recursive-backtracking maze carver.
//!
//! Passages are carved on a two-cell stride from `(1, 1)`, so the walls
//! between corridors sit on the even rows and columns. The carve is a
//! spanning tree over the odd cells: fully connected and loop-free.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::components::Pos;
use crate::level::{Cell, Grid};

const CARVE_STEPS: [(isize, isize); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

pub const START: Pos = Pos { x: 1, y: 1 };

pub fn goal(width: usize, height: usize) -> Pos {
    Pos {
        x: width.saturating_sub(2),
        y: height.saturating_sub(2),
    }
}

/// Carves a `width` x `height` maze. Both dimensions must be at least 3.
pub fn generate(width: usize, height: usize, rng: &mut impl Rng) -> Grid {
    debug_assert!(width >= 3 && height >= 3, "maze must be at least 3x3");
    let mut grid = Grid::filled(width, height, Cell::Wall);
    let mut stack = vec![START];
    let mut steps = CARVE_STEPS;
    grid.set(START, Cell::Open);

    while let Some(&current) = stack.last() {
        steps.shuffle(rng);
        let next = steps.iter().find_map(|&(dx, dy)| {
            let x = current.x.checked_add_signed(dx)?;
            let y = current.y.checked_add_signed(dy)?;
            let target = Pos { x, y };
            let interior = (1..width - 1).contains(&x) && (1..height - 1).contains(&y);
            (interior && grid.get(target) == Some(Cell::Wall)).then_some(target)
        });

        match next {
            Some(target) => {
                let between = Pos {
                    x: (current.x + target.x) / 2,
                    y: (current.y + target.y) / 2,
                };
                grid.set(between, Cell::Open);
                grid.set(target, Cell::Open);
                stack.push(target);
            }
            None => {
                stack.pop();
            }
        }
    }

    grid.set(START, Cell::Open);
    grid.set(goal(width, height), Cell::Open);
    let bridges = ensure_connected(&mut grid);

    debug!(
        width,
        height,
        open = grid.cells_remaining(),
        bridges,
        "maze carved"
    );
    grid
}

/// Opens interior walls until every walkable cell is reachable from
/// [`START`]. Needed when the goal lands on an even/even cell the stride
/// never visits. Returns the number of walls opened.
fn ensure_connected(grid: &mut Grid) -> usize {
    let (width, height) = (grid.width(), grid.height());
    let mut opened = 0;
    let mut reachable = flood(grid, START);

    while grid
        .iter()
        .any(|(pos, _)| grid.is_walkable(pos) && !reachable[pos.y][pos.x])
    {
        let bridge = (1..height - 1)
            .flat_map(|y| (1..width - 1).map(move |x| Pos { x, y }))
            .filter(|&pos| grid.get(pos) == Some(Cell::Wall))
            .find(|&pos| {
                let mut touches_reached = false;
                let mut touches_unreached = false;
                for n in neighbours(pos).filter(|&n| grid.is_walkable(n)) {
                    if reachable[n.y][n.x] {
                        touches_reached = true;
                    } else {
                        touches_unreached = true;
                    }
                }
                touches_reached && touches_unreached
            });

        let Some(bridge) = bridge else {
            break;
        };
        grid.set(bridge, Cell::Open);
        opened += 1;
        reachable = flood(grid, START);
    }
    opened
}

fn neighbours(pos: Pos) -> impl Iterator<Item = Pos> {
    crate::components::Direction::ALL
        .into_iter()
        .filter_map(move |dir| pos.step(dir))
}

pub fn flood(grid: &Grid, start: Pos) -> Vec<Vec<bool>> {
    let mut seen = vec![vec![false; grid.width()]; grid.height()];
    if !grid.is_walkable(start) {
        return seen;
    }
    let mut queue = VecDeque::new();
    seen[start.y][start.x] = true;
    queue.push_back(start);
    while let Some(pos) = queue.pop_front() {
        for next in neighbours(pos) {
            if grid.is_walkable(next) && !seen[next.y][next.x] {
                seen[next.y][next.x] = true;
                queue.push_back(next);
            }
        }
    }
    seen
}
