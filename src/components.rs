#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Pos { x, y })
    }

    pub fn manhattan_distance(self, other: Pos) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Evaluation order shared by input priority and pursuit candidates.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Adversary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub kind: EntityKind,
    pub pos: Pos,
    pub direction: Direction,
    pub last_move_ms: u64,
}

impl Actor {
    pub fn new(kind: EntityKind, pos: Pos, direction: Direction, now_ms: u64) -> Self {
        Self {
            kind,
            pos,
            direction,
            last_move_ms: now_ms,
        }
    }

    /// True once strictly more than `cadence_ms` has passed since the last move.
    pub fn ready(&self, now_ms: u64, cadence_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_move_ms) > cadence_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_refuses_negative_coordinates() {
        let origin = Pos::new(0, 0);
        assert_eq!(origin.step(Direction::Up), None);
        assert_eq!(origin.step(Direction::Left), None);
        assert_eq!(origin.step(Direction::Right), Some(Pos::new(1, 0)));
        assert_eq!(origin.step(Direction::Down), Some(Pos::new(0, 1)));
    }

    #[test]
    fn manhattan_distance_is_symmetric() {
        let a = Pos::new(3, 3);
        let b = Pos::new(1, 4);
        assert_eq!(a.manhattan_distance(b), 3);
        assert_eq!(b.manhattan_distance(a), 3);
    }

    #[test]
    fn readiness_requires_strictly_elapsed_cadence() {
        let actor = Actor::new(EntityKind::Player, Pos::new(1, 1), Direction::Right, 1_000);
        assert!(!actor.ready(1_100, 100));
        assert!(actor.ready(1_101, 100));
        assert!(!actor.ready(500, 100));
    }
}
