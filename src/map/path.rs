use std::collections::HashMap;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, DistanceAlg};

use super::{TileGrid, pqueue::PriorityQueue};

/// Shortest 4-directional walk from `start` to `end`, both endpoints included.
/// An empty path means there is no route.
pub fn astar(grid: &TileGrid, start: Point, end: Point) -> Vec<Point> {
    if !grid.in_bounds(start) || !grid.is_walkable(end) {
        return Vec::new();
    }
    if start == end {
        return vec![start];
    }

    let mut frontier = PriorityQueue::new();
    let mut came_from: HashMap<Point, Point> = HashMap::new();
    let mut cost_so_far: HashMap<Point, i32> = HashMap::new();
    frontier.push(start, 0);
    cost_so_far.insert(start, 0);

    while let Some(current) = frontier.pop() {
        if current == end {
            return reconstruct(&came_from, start, end);
        }
        let current_cost = cost_so_far[&current];
        let idx = grid.point2d_to_index(current);
        for (exit, step) in grid.get_available_exits(idx) {
            let next = grid.index_to_point2d(exit);
            let new_cost = current_cost + step as i32;
            if cost_so_far.get(&next).is_some_and(|known| *known <= new_cost) {
                continue;
            }
            cost_so_far.insert(next, new_cost);
            came_from.insert(next, current);
            let heuristic = DistanceAlg::Manhattan.distance2d(next, end) as i32;
            frontier.push(next, new_cost + heuristic);
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &HashMap<Point, Point>, start: Point, end: Point) -> Vec<Point> {
    let mut path = vec![end];
    let mut cursor = end;
    while cursor != start {
        match came_from.get(&cursor) {
            Some(prev) => {
                cursor = *prev;
                path.push(cursor);
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}
