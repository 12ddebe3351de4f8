use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{trace, warn};

use crate::components::{Direction, Pos};
use crate::level::Grid;

/// Greedy chase step: of the walkable neighbours, pick one that minimises
/// the Manhattan distance to `target`, breaking ties uniformly at random.
/// Boxed in, the adversary keeps its position and facing.
pub fn next_move(
    grid: &Grid,
    from: Pos,
    target: Pos,
    facing: Direction,
    rng: &mut impl Rng,
) -> (Pos, Direction) {
    let mut options = Vec::with_capacity(4);
    let mut best = usize::MAX;
    for dir in Direction::ALL {
        let Some(next) = from.step(dir) else {
            continue;
        };
        if !grid.is_walkable(next) {
            continue;
        }
        let d = next.manhattan_distance(target);
        if d < best {
            best = d;
            options.clear();
            options.push((next, dir));
        } else if d == best {
            options.push((next, dir));
        }
    }

    match options.choose(rng) {
        Some(&(pos, dir)) => {
            trace!(?from, to = ?pos, ?dir, distance = best, ties = options.len(), "adversary step");
            (pos, dir)
        }
        None => {
            warn!(?from, "adversary has no legal move, holding position");
            (from, facing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn open_5x5() -> Grid {
        Grid::from_rows(&["#####", "#...#", "#...#", "#...#", "#####"])
    }

    #[test]
    fn tie_is_split_between_both_closer_cells() {
        let grid = open_5x5();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let (pos, _) = next_move(&grid, Pos::new(3, 3), Pos::new(1, 1), Direction::Left, &mut rng);
            assert!(
                pos == Pos::new(2, 3) || pos == Pos::new(3, 2),
                "moved away from target to {pos:?}"
            );
            seen.insert(pos);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn direction_label_matches_the_step() {
        let grid = open_5x5();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let (pos, dir) = next_move(&grid, Pos::new(1, 2), Pos::new(3, 2), Direction::Up, &mut rng);
        assert_eq!(pos, Pos::new(2, 2));
        assert_eq!(dir, Direction::Right);
    }

    #[test]
    fn boxed_in_adversary_holds_still() {
        let grid = Grid::from_rows(&["###", "#.#", "###"]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let result = next_move(&grid, Pos::new(1, 1), Pos::new(5, 5), Direction::Down, &mut rng);
        assert_eq!(result, (Pos::new(1, 1), Direction::Down));
    }

    #[test]
    fn greedy_step_can_move_away_when_walls_force_it() {
        // Dead end pointing at the target: the only exit increases distance.
        let grid = Grid::from_rows(&["#####", "#.#.#", "#...#", "#####"]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (pos, dir) = next_move(&grid, Pos::new(1, 1), Pos::new(3, 1), Direction::Up, &mut rng);
        assert_eq!(pos, Pos::new(1, 2));
        assert_eq!(dir, Direction::Down);
    }
}
