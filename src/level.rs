use crate::components::{Actor, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Open,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Blocked,
    Moved,
    /// Moved onto a dot and ate it.
    Collected,
}

impl Entry {
    pub fn moved(self) -> bool {
        !matches!(self, Entry::Blocked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![cell; width]; height],
        }
    }

    /// Parses rows of `#` (wall), `.` (dot) and ` ` (cleared). Rows are
    /// padded with walls to the longest row.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let cells = rows
            .iter()
            .map(|row| {
                let mut line: Vec<Cell> = row
                    .chars()
                    .map(|ch| match ch {
                        '.' => Cell::Open,
                        ' ' => Cell::Cleared,
                        _ => Cell::Wall,
                    })
                    .collect();
                line.resize(width, Cell::Wall);
                line
            })
            .collect();
        Self {
            width,
            height: rows.len(),
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.cells.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(pos.y).and_then(|row| row.get_mut(pos.x)) {
            *slot = cell;
        }
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Some(Cell::Open | Cell::Cleared))
    }

    pub fn try_enter(&mut self, actor: &mut Actor, pos: Pos) -> Entry {
        if !self.is_walkable(pos) {
            return Entry::Blocked;
        }
        actor.pos = pos;
        if self.collect(pos) {
            Entry::Collected
        } else {
            Entry::Moved
        }
    }

    pub fn collect(&mut self, pos: Pos) -> bool {
        if self.get(pos) == Some(Cell::Open) {
            self.set(pos, Cell::Cleared);
            return true;
        }
        false
    }

    pub fn cells_remaining(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell == Cell::Open)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &cell)| (Pos { x, y }, cell))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Direction, EntityKind};

    fn player_at(pos: Pos) -> Actor {
        Actor::new(EntityKind::Player, pos, Direction::Right, 0)
    }

    #[test]
    fn walls_and_out_of_bounds_are_not_walkable() {
        let grid = Grid::from_rows(&["###", "#. ", "###"]);
        assert!(grid.is_walkable(Pos::new(1, 1)));
        assert!(grid.is_walkable(Pos::new(2, 1)));
        assert!(!grid.is_walkable(Pos::new(0, 1)));
        assert!(!grid.is_walkable(Pos::new(3, 1)));
        assert!(!grid.is_walkable(Pos::new(1, 7)));
    }

    #[test]
    fn entering_a_wall_leaves_the_actor_in_place() {
        let mut grid = Grid::from_rows(&["###", "#.#", "###"]);
        let mut player = player_at(Pos::new(1, 1));
        assert_eq!(grid.try_enter(&mut player, Pos::new(2, 1)), Entry::Blocked);
        assert_eq!(player.pos, Pos::new(1, 1));
        assert_eq!(grid.cells_remaining(), 1);
    }

    #[test]
    fn dots_are_collected_exactly_once() {
        let mut grid = Grid::from_rows(&["####", "# .#", "####"]);
        let mut player = player_at(Pos::new(1, 1));
        assert_eq!(grid.try_enter(&mut player, Pos::new(2, 1)), Entry::Collected);
        assert_eq!(grid.get(Pos::new(2, 1)), Some(Cell::Cleared));
        assert_eq!(grid.try_enter(&mut player, Pos::new(1, 1)), Entry::Moved);
        assert_eq!(grid.try_enter(&mut player, Pos::new(2, 1)), Entry::Moved);
        assert_eq!(grid.cells_remaining(), 0);
    }

    #[test]
    fn short_rows_are_padded_with_walls() {
        let grid = Grid::from_rows(&["#####", "#.", "#####"]);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.get(Pos::new(4, 1)), Some(Cell::Wall));
    }
}
