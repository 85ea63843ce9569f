use bracket_geometry::prelude::Point;

use crate::entity::item::{ItemId, ItemKey};

/// Identifies one registered presentation client.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> Point {
        match self {
            Direction::Up => Point::new(0, -1),
            Direction::Down => Point::new(0, 1),
            Direction::Left => Point::new(-1, 0),
            Direction::Right => Point::new(1, 0),
        }
    }

    /// Rhythm lane this direction plays during the player's burst.
    pub fn lane(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Down => 1,
            Direction::Up => 2,
            Direction::Right => 3,
        }
    }
}

/// Player input as it arrives on the game's inbound queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    None,
    Move(Direction),
    TakeItem(ItemKey),
    DropItem(ItemId),
    CloseWindow(ClientId),
    QuitGame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_cover_the_alphabet_once() {
        let mut lanes: Vec<usize> = Direction::ALL.iter().map(|dir| dir.lane()).collect();
        lanes.sort();
        assert_eq!(lanes, vec![0, 1, 2, 3]);
        assert_eq!(Direction::Up.lane(), 2);
    }

    #[test]
    fn up_is_toward_row_zero() {
        assert_eq!(Direction::Up.delta(), Point::new(0, -1));
        assert_eq!(Direction::Right.delta(), Point::new(1, 0));
    }
}
