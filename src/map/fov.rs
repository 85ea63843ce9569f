use bracket_geometry::prelude::{Point, line2d_bresenham};
use bracket_pathfinding::prelude::DistanceAlg;

use super::TileGrid;

/// Recomputes `visible` for every tile from `origin`, reaching `range` tiles
/// (Euclidean). `seen` is only ever raised.
pub fn line_of_sight(grid: &mut TileGrid, origin: Point, range: i32) {
    for tile in grid.tiles_mut() {
        tile.visible = false;
    }
    if !grid.in_bounds(origin) {
        return;
    }

    let reach = range.max(0);
    let mut lit = Vec::new();
    for y in (origin.y - reach)..=(origin.y + reach) {
        for x in (origin.x - reach)..=(origin.x + reach) {
            let target = Point::new(x, y);
            if !grid.in_bounds(target) {
                continue;
            }
            if DistanceAlg::Pythagoras.distance2d(origin, target) > reach as f32 {
                continue;
            }
            if sightline_clear(grid, origin, target) {
                lit.push(target);
            }
        }
    }
    lit.push(origin);

    for point in lit {
        if let Some(tile) = grid.tile_at_mut(point) {
            tile.reveal();
        }
    }
}

// Walls are visible themselves; only the cells strictly between the two
// endpoints can block.
fn sightline_clear(grid: &TileGrid, from: Point, to: Point) -> bool {
    line2d_bresenham(from, to)
        .into_iter()
        .filter(|point| *point != from && *point != to)
        .all(|point| !grid.is_opaque_at(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Tile, TileKind};

    fn open_grid(size: i32) -> TileGrid {
        TileGrid::filled(size, size, TileKind::Floor)
    }

    fn visible(grid: &TileGrid, x: i32, y: i32) -> bool {
        grid.tile_at(Point::new(x, y)).unwrap().visible
    }

    #[test]
    fn origin_is_always_visible() {
        let mut grid = open_grid(5);
        line_of_sight(&mut grid, Point::new(2, 2), 0);
        assert!(visible(&grid, 2, 2));
        assert_eq!(grid.tiles().iter().filter(|t| t.visible).count(), 1);
    }

    #[test]
    fn range_and_walls_limit_sight() {
        let mut grid = open_grid(7);
        grid.set_tile(Point::new(2, 2), Tile::wall());
        grid.set_tile(Point::new(4, 4), Tile::wall());
        line_of_sight(&mut grid, Point::new(3, 3), 2);

        assert!(visible(&grid, 3, 3));
        assert!(visible(&grid, 3, 4));
        assert!(visible(&grid, 2, 2), "walls themselves are visible");
        assert!(!visible(&grid, 1, 1));
        assert!(!visible(&grid, 6, 6));
        assert!(!visible(&grid, 3, 6));
    }

    #[test]
    fn wall_casts_a_shadow() {
        let mut grid = open_grid(9);
        grid.set_tile(Point::new(4, 3), Tile::wall());
        line_of_sight(&mut grid, Point::new(4, 4), 4);
        assert!(visible(&grid, 4, 3));
        assert!(!visible(&grid, 4, 2));
        assert!(!visible(&grid, 4, 1));
        assert!(visible(&grid, 4, 6));
    }

    #[test]
    fn seen_survives_recompute() {
        let mut grid = open_grid(9);
        line_of_sight(&mut grid, Point::new(1, 1), 2);
        assert!(visible(&grid, 2, 2));

        line_of_sight(&mut grid, Point::new(7, 7), 2);
        let tile = grid.tile_at(Point::new(2, 2)).unwrap();
        assert!(!tile.visible);
        assert!(tile.seen);
        for tile in grid.tiles() {
            assert!(!tile.visible || tile.seen);
        }
    }
}
