//! Traversable surface: walkable cell grid with sampling and pathfinding

use serde::{Deserialize, Serialize};
use shamble_math::Vec3;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// The walkable region of the level, as a uniform cell grid on the
/// ground plane
///
/// Cells can be marked unwalkable to represent holes and blockers.
/// Destination requests are sampled onto this surface before an agent
/// will move toward them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavSurface {
    /// World position of the grid's min corner
    origin: Vec3,
    /// Cell edge length
    cell_size: f32,
    /// Cell columns (along x)
    cols: usize,
    /// Cell rows (along z)
    rows: usize,
    /// Walkable flag per cell, row-major
    walkable: Vec<bool>,
}

impl NavSurface {
    /// Create a fully walkable grid covering `width` x `depth` from `origin`
    pub fn create_grid(origin: Vec3, width: f32, depth: f32, cell_size: f32) -> Self {
        let cols = (width / cell_size).ceil().max(1.0) as usize;
        let rows = (depth / cell_size).ceil().max(1.0) as usize;
        Self {
            origin,
            cell_size,
            cols,
            rows,
            walkable: vec![true; cols * rows],
        }
    }

    /// Grid columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Grid rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Mark a cell walkable or not
    pub fn set_walkable(&mut self, col: usize, row: usize, walkable: bool) {
        if col < self.cols && row < self.rows {
            self.walkable[row * self.cols + col] = walkable;
        }
    }

    fn is_walkable(&self, cell: usize) -> bool {
        self.walkable.get(cell).copied().unwrap_or(false)
    }

    /// Find the cell containing a point, if it lies on the grid
    fn locate(&self, point: Vec3) -> Option<usize> {
        let local_x = point.x - self.origin.x;
        let local_z = point.z - self.origin.z;
        if local_x < 0.0 || local_z < 0.0 {
            return None;
        }
        let col = (local_x / self.cell_size) as usize;
        let row = (local_z / self.cell_size) as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row * self.cols + col)
    }

    fn cell_center(&self, cell: usize) -> Vec3 {
        let col = cell % self.cols;
        let row = cell / self.cols;
        Vec3::new(
            self.origin.x + (col as f32 + 0.5) * self.cell_size,
            self.origin.y,
            self.origin.z + (row as f32 + 0.5) * self.cell_size,
        )
    }

    /// Project a point onto the traversable surface
    ///
    /// Returns the nearest walkable position within `radius` of `point`,
    /// or None when no walkable cell is close enough. A point already on
    /// a walkable cell projects straight down to the surface plane.
    pub fn sample_position(&self, point: Vec3, radius: f32) -> Option<Vec3> {
        if let Some(cell) = self.locate(point) {
            if self.is_walkable(cell) {
                return Some(Vec3::new(point.x, self.origin.y, point.z));
            }
        }

        // Nearest walkable cell center within the radius
        let mut best: Option<(f32, Vec3)> = None;
        let flat = point.horizontal() + Vec3::new(0.0, self.origin.y, 0.0);
        for cell in 0..self.walkable.len() {
            if !self.is_walkable(cell) {
                continue;
            }
            let center = self.cell_center(cell);
            let dist = center.distance(flat);
            if dist <= radius && best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, center));
            }
        }
        best.map(|(_, center)| center)
    }

    /// Find a path between two points over walkable cells
    ///
    /// Both endpoints must sample onto the surface. Within a single cell
    /// the path is a straight segment.
    pub fn find_path(&self, start: Vec3, end: Vec3) -> Option<NavPath> {
        let start_cell = self.locate(start).filter(|&c| self.is_walkable(c))?;
        let end_cell = self.locate(end).filter(|&c| self.is_walkable(c))?;

        if start_cell == end_cell {
            return Some(NavPath::new(vec![start, end]));
        }

        let cells = self.astar(start_cell, end_cell)?;

        let mut waypoints = vec![start];
        // Skip the entry cell's center; the agent is already inside it
        waypoints.extend(cells.iter().skip(1).map(|&c| self.cell_center(c)));
        waypoints.push(end);
        Some(NavPath::new(waypoints))
    }

    fn neighbors(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        let col = cell % self.cols;
        let row = cell / self.cols;
        let mut out = Vec::with_capacity(4);
        if col > 0 {
            out.push(cell - 1);
        }
        if col + 1 < self.cols {
            out.push(cell + 1);
        }
        if row > 0 {
            out.push(cell - self.cols);
        }
        if row + 1 < self.rows {
            out.push(cell + self.cols);
        }
        out.into_iter()
    }

    /// A* over the cell grid
    fn astar(&self, start: usize, goal: usize) -> Option<Vec<usize>> {
        #[derive(Clone, Copy)]
        struct Node {
            cell: usize,
            f_score: f32,
        }

        impl PartialEq for Node {
            fn eq(&self, other: &Self) -> bool {
                self.cell == other.cell
            }
        }

        impl Eq for Node {}

        impl PartialOrd for Node {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for Node {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                other
                    .f_score
                    .partial_cmp(&self.f_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }
        }

        let goal_center = self.cell_center(goal);
        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<usize, usize> = HashMap::new();
        let mut g_score: HashMap<usize, f32> = HashMap::new();
        let mut closed_set: HashSet<usize> = HashSet::new();

        g_score.insert(start, 0.0);
        open_set.push(Node {
            cell: start,
            f_score: self.cell_center(start).distance(goal_center),
        });

        while let Some(current) = open_set.pop() {
            if current.cell == goal {
                let mut path = vec![goal];
                let mut cell = goal;
                while let Some(&prev) = came_from.get(&cell) {
                    path.push(prev);
                    cell = prev;
                }
                path.reverse();
                return Some(path);
            }

            if !closed_set.insert(current.cell) {
                continue;
            }

            let current_g = *g_score.get(&current.cell).unwrap_or(&f32::MAX);
            let current_center = self.cell_center(current.cell);

            for neighbor in self.neighbors(current.cell) {
                if closed_set.contains(&neighbor) || !self.is_walkable(neighbor) {
                    continue;
                }

                let neighbor_center = self.cell_center(neighbor);
                let tentative_g = current_g + current_center.distance(neighbor_center);
                if tentative_g < *g_score.get(&neighbor).unwrap_or(&f32::MAX) {
                    came_from.insert(neighbor, current.cell);
                    g_score.insert(neighbor, tentative_g);
                    open_set.push(Node {
                        cell: neighbor,
                        f_score: tentative_g + neighbor_center.distance(goal_center),
                    });
                }
            }
        }

        None
    }
}

/// A computed path across the surface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavPath {
    /// Waypoints along the path
    waypoints: Vec<Vec3>,
    /// Index of the waypoint currently steered toward
    current_index: usize,
}

impl NavPath {
    /// Create a path from waypoints
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self {
            waypoints,
            current_index: 0,
        }
    }

    /// Check if every waypoint has been consumed
    pub fn is_complete(&self) -> bool {
        self.current_index >= self.waypoints.len()
    }

    /// Get the waypoint currently steered toward
    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.waypoints.get(self.current_index).copied()
    }

    /// Get the final destination
    pub fn destination(&self) -> Option<Vec3> {
        self.waypoints.last().copied()
    }

    /// Advance to the next waypoint
    pub fn advance(&mut self) {
        if self.current_index < self.waypoints.len() {
            self.current_index += 1;
        }
    }

    /// Path distance left from `position` through the remaining waypoints
    pub fn remaining_from(&self, position: Vec3) -> f32 {
        let Some(first) = self.waypoints.get(self.current_index) else {
            // Fully consumed: remaining distance is to the destination
            return self
                .destination()
                .map_or(0.0, |dest| position.distance(dest));
        };

        let mut distance = position.distance(*first);
        for pair in self.waypoints[self.current_index..].windows(2) {
            distance += pair[0].distance(pair[1]);
        }
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        let surface = NavSurface::create_grid(Vec3::ZERO, 10.0, 10.0, 5.0);
        assert_eq!(surface.cols(), 2);
        assert_eq!(surface.rows(), 2);
    }

    #[test]
    fn test_sample_on_walkable() {
        let surface = NavSurface::create_grid(Vec3::ZERO, 10.0, 10.0, 5.0);
        let sampled = surface.sample_position(Vec3::new(2.5, 3.0, 2.5), 5.0).unwrap();
        assert_eq!(sampled, Vec3::new(2.5, 0.0, 2.5));
    }

    #[test]
    fn test_sample_off_grid_snaps_to_nearest_cell() {
        let surface = NavSurface::create_grid(Vec3::ZERO, 10.0, 10.0, 5.0);
        let sampled = surface.sample_position(Vec3::new(-1.0, 0.0, 2.5), 5.0);
        assert!(sampled.is_some());
    }

    #[test]
    fn test_sample_fails_far_away() {
        let surface = NavSurface::create_grid(Vec3::ZERO, 10.0, 10.0, 5.0);
        assert!(surface
            .sample_position(Vec3::new(-100.0, 0.0, -100.0), 5.0)
            .is_none());
    }

    #[test]
    fn test_sample_unwalkable_cell() {
        let mut surface = NavSurface::create_grid(Vec3::ZERO, 10.0, 10.0, 5.0);
        surface.set_walkable(0, 0, false);
        // Point on the blocked cell snaps to a neighboring walkable center
        let sampled = surface.sample_position(Vec3::new(2.5, 0.0, 2.5), 10.0).unwrap();
        assert_ne!(sampled, Vec3::new(2.5, 0.0, 2.5));
    }

    #[test]
    fn test_find_path_same_cell() {
        let surface = NavSurface::create_grid(Vec3::ZERO, 10.0, 10.0, 5.0);
        let path = surface
            .find_path(Vec3::new(1.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 2.0))
            .unwrap();
        assert_eq!(path.remaining_from(Vec3::new(1.0, 0.0, 1.0)) > 0.0, true);
    }

    #[test]
    fn test_find_path_across_grid() {
        let surface = NavSurface::create_grid(Vec3::ZERO, 20.0, 20.0, 5.0);
        let path = surface
            .find_path(Vec3::new(2.5, 0.0, 2.5), Vec3::new(17.5, 0.0, 17.5))
            .unwrap();
        assert!(path.remaining_from(Vec3::new(2.5, 0.0, 2.5)) >= 15.0);
    }

    #[test]
    fn test_no_path_through_blocked_corridor() {
        let mut surface = NavSurface::create_grid(Vec3::ZERO, 15.0, 5.0, 5.0);
        surface.set_walkable(1, 0, false);
        let path = surface.find_path(Vec3::new(2.5, 0.0, 2.5), Vec3::new(12.5, 0.0, 2.5));
        assert!(path.is_none());
    }

    #[test]
    fn test_path_advance() {
        let mut path = NavPath::new(vec![
            Vec3::ZERO,
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
        ]);
        assert!(!path.is_complete());
        path.advance();
        assert_eq!(path.current_waypoint(), Some(Vec3::new(5.0, 0.0, 0.0)));
        path.advance();
        path.advance();
        assert!(path.is_complete());
    }
}
