use crate::components::{Direction, EntityKind};

/// How a sprite's artwork should be transformed before drawing. The player
/// art faces left as drawn; the adversary art only ever flips horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteOrientation {
    AsDrawn,
    Mirrored,
    TurnedUp,
    TurnedDown,
}

pub fn sprite_orientation(kind: EntityKind, direction: Direction) -> SpriteOrientation {
    match (kind, direction) {
        (_, Direction::Right) => SpriteOrientation::Mirrored,
        (_, Direction::Left) => SpriteOrientation::AsDrawn,
        (EntityKind::Player, Direction::Up) => SpriteOrientation::TurnedUp,
        (EntityKind::Player, Direction::Down) => SpriteOrientation::TurnedDown,
        (EntityKind::Adversary, Direction::Up | Direction::Down) => SpriteOrientation::AsDrawn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adversary_never_rotates() {
        for dir in Direction::ALL {
            let o = sprite_orientation(EntityKind::Adversary, dir);
            assert!(matches!(o, SpriteOrientation::AsDrawn | SpriteOrientation::Mirrored));
        }
    }

    #[test]
    fn player_orientation_follows_facing() {
        assert_eq!(
            sprite_orientation(EntityKind::Player, Direction::Right),
            SpriteOrientation::Mirrored
        );
        assert_eq!(
            sprite_orientation(EntityKind::Player, Direction::Up),
            SpriteOrientation::TurnedUp
        );
    }
}
