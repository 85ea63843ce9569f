pub mod fov;
pub mod path;
pub mod pqueue;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, DistanceAlg};
use smallvec::SmallVec;

use crate::error::LevelError;

pub type Position = Point;

pub const CARDINALS: [Point; 4] = [
    Point { x: 0, y: -1 },
    Point { x: 0, y: 1 },
    Point { x: -1, y: 0 },
    Point { x: 1, y: 0 },
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    Floor,
    Wall,
    ClosedDoor,
    OpenDoor,
    ClosedTrap,
    OpenTrap,
    /// Placeholder whose meaning comes from the tile's overlay.
    Pending,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Overlay {
    ClosedDoor,
    OpenDoor,
    ClosedTrap,
    OpenTrap,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub overlay: Option<Overlay>,
    pub visible: bool,
    pub seen: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Tile::wall()
    }
}

impl Tile {
    pub const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            overlay: None,
            visible: false,
            seen: false,
        }
    }

    pub const fn wall() -> Self {
        Self::new(TileKind::Wall)
    }

    pub const fn floor() -> Self {
        Self::new(TileKind::Floor)
    }

    pub const fn pending(overlay: Overlay) -> Self {
        Self {
            kind: TileKind::Pending,
            overlay: Some(overlay),
            visible: false,
            seen: false,
        }
    }

    pub fn is_closed_door(&self) -> bool {
        self.kind == TileKind::ClosedDoor || self.overlay == Some(Overlay::ClosedDoor)
    }

    pub fn is_closed_trap(&self) -> bool {
        self.kind == TileKind::ClosedTrap || self.overlay == Some(Overlay::ClosedTrap)
    }

    pub fn blocks_move(&self) -> bool {
        self.kind == TileKind::Wall || self.is_closed_door()
    }

    pub fn blocks_sight(&self) -> bool {
        self.kind == TileKind::Wall || self.is_closed_door()
    }

    /// Flips a closed door to open, wherever the closed state lives.
    pub fn open_door(&mut self) -> bool {
        let mut opened = false;
        if self.kind == TileKind::ClosedDoor {
            self.kind = TileKind::OpenDoor;
            opened = true;
        }
        if self.overlay == Some(Overlay::ClosedDoor) {
            self.overlay = Some(Overlay::OpenDoor);
            opened = true;
        }
        opened
    }

    pub fn spring_trap(&mut self) -> bool {
        let mut sprung = false;
        if self.kind == TileKind::ClosedTrap {
            self.kind = TileKind::OpenTrap;
            sprung = true;
        }
        if self.overlay == Some(Overlay::ClosedTrap) {
            self.overlay = Some(Overlay::OpenTrap);
            sprung = true;
        }
        sprung
    }

    pub(crate) fn reveal(&mut self) {
        self.visible = true;
        self.seen = true;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn filled(width: i32, height: i32, kind: TileKind) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::new(kind); size],
        }
    }

    /// Builds a grid from row-major tile kinds; every row must be the same length.
    pub fn from_rows(rows: &[Vec<TileKind>]) -> Result<Self, LevelError> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        if expected == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (row, kinds) in rows.iter().enumerate() {
            if kinds.len() != expected {
                return Err(LevelError::RaggedGrid {
                    row,
                    expected,
                    found: kinds.len(),
                });
            }
            tiles.extend(kinds.iter().map(|kind| Tile::new(*kind)));
        }
        Ok(Self {
            width: expected as i32,
            height: rows.len() as i32,
            tiles,
        })
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(Point::new(x, y)) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn set_tile(&mut self, point: Point, tile: Tile) {
        if let Some(idx) = self.idx(point.x, point.y) {
            self.tiles[idx] = tile;
        }
    }

    pub fn tile_at(&self, point: Point) -> Option<&Tile> {
        self.idx(point.x, point.y).map(|idx| &self.tiles[idx])
    }

    pub fn tile_at_mut(&mut self, point: Point) -> Option<&mut Tile> {
        self.idx(point.x, point.y).map(|idx| &mut self.tiles[idx])
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.tile_at(point).is_some_and(|tile| !tile.blocks_move())
    }

    pub fn is_opaque_at(&self, point: Point) -> bool {
        self.tile_at(point).is_none_or(Tile::blocks_sight)
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point::new(x, y)))
    }
}

impl BaseMap for TileGrid {
    fn is_opaque(&self, idx: usize) -> bool {
        self.tiles.get(idx).is_none_or(Tile::blocks_sight)
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let mut exits = SmallVec::new();
        let point = self.index_to_point2d(idx);
        for dir in CARDINALS {
            let dest = Point::new(point.x + dir.x, point.y + dir.y);
            if self.is_walkable(dest) {
                exits.push((self.point2d_to_index(dest), 1.0));
            }
        }
        exits
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Manhattan.distance2d(p1, p2)
    }
}

impl Algorithm2D for TileGrid {
    fn dimensions(&self) -> Point {
        Point::new(self.width, self.height)
    }

    fn in_bounds(&self, point: Point) -> bool {
        TileGrid::in_bounds(self, point)
    }
}
