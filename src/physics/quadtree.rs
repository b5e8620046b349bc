use eframe::egui::{Vec2, vec2};

use crate::util::separation_direction;

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;
const COINCIDENT_DISTANCE_SQ: f32 = 1e-12;

/// Parameters of the inverse-distance repulsion evaluated against the tree.
#[derive(Clone, Copy, Debug)]
pub(super) struct Charge {
    /// Already scaled by alpha. Negative values repel.
    pub(super) strength: f32,
    pub(super) distance_min_sq: f32,
    pub(super) theta_sq: f32,
}

impl Charge {
    /// Velocity change on `index` caused by `other` at offset `delta`.
    /// Coincident pairs get a fixed, antisymmetric direction.
    fn pair(&self, index: usize, other: usize, delta: Vec2) -> Vec2 {
        let distance_sq = delta.length_sq();
        if distance_sq <= COINCIDENT_DISTANCE_SQ {
            let push = self.strength / self.distance_min_sq.max(1.0);
            return separation_direction(index, other) * push;
        }
        delta * (self.strength / distance_sq.max(self.distance_min_sq))
    }

    fn aggregate(&self, delta: Vec2, mass: f32) -> Vec2 {
        delta * (self.strength * mass / delta.length_sq().max(self.distance_min_sq))
    }
}

/// Square region with the aggregate mass of the points inside it. Leaves keep
/// their point indices; inner cells refer to up to four children by index.
struct Cell {
    center: Vec2,
    half_extent: f32,
    mass: f32,
    center_of_mass: Vec2,
    points: Vec<usize>,
    children: [Option<usize>; 4],
}

impl Cell {
    fn side(&self) -> f32 {
        self.half_extent * 2.0
    }

    fn contains(&self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half_extent
            && (point.y - self.center.y).abs() <= self.half_extent
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    fn quadrant(&self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) + 2 * usize::from(point.y >= self.center.y)
    }

    fn child_center(&self, quadrant: usize) -> Vec2 {
        let quarter = self.half_extent * 0.5;
        let sign = |bit: bool| if bit { quarter } else { -quarter };
        self.center + vec2(sign(quadrant & 1 == 1), sign(quadrant & 2 == 2))
    }
}

/// Barnes-Hut tree over a snapshot of node positions, stored as a flat arena
/// with the root at index 0.
pub(super) struct QuadTree {
    cells: Vec<Cell>,
}

impl QuadTree {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let (center, half_extent) = bounding_square(positions)?;
        let mut tree = Self {
            cells: Vec::with_capacity(positions.len() / LEAF_CAPACITY * 2 + 1),
        };
        tree.insert_cell(center, half_extent, (0..positions.len()).collect(), positions, 0);
        Some(tree)
    }

    fn insert_cell(
        &mut self,
        center: Vec2,
        half_extent: f32,
        points: Vec<usize>,
        positions: &[Vec2],
        depth: usize,
    ) -> usize {
        let mass = points.len() as f32;
        let sum = points
            .iter()
            .fold(Vec2::ZERO, |sum, &index| sum + positions[index]);
        let slot = self.cells.len();
        self.cells.push(Cell {
            center,
            half_extent,
            mass,
            center_of_mass: if mass > 0.0 { sum / mass } else { center },
            points,
            children: [None; 4],
        });

        if depth >= MAX_DEPTH || self.cells[slot].points.len() <= LEAF_CAPACITY {
            return slot;
        }

        let mut quadrants: [Vec<usize>; 4] = Default::default();
        for &index in &self.cells[slot].points {
            quadrants[self.cells[slot].quadrant(positions[index])].push(index);
        }
        // Coincident or tightly packed points that all fall in one quadrant
        // stay together in this leaf.
        if quadrants.iter().filter(|points| !points.is_empty()).count() <= 1 {
            return slot;
        }

        self.cells[slot].points.clear();
        for (quadrant, points) in quadrants.into_iter().enumerate() {
            if points.is_empty() {
                continue;
            }
            let child_center = self.cells[slot].child_center(quadrant);
            let child =
                self.insert_cell(child_center, half_extent * 0.5, points, positions, depth + 1);
            self.cells[slot].children[quadrant] = Some(child);
        }
        slot
    }

    /// Total velocity change on `index` from every other point. A cell is
    /// treated as a single mass once `side / distance < theta` and the point
    /// lies outside it.
    pub(super) fn repulsion(&self, index: usize, positions: &[Vec2], charge: &Charge) -> Vec2 {
        let point = positions[index];
        let mut total = Vec2::ZERO;
        let mut pending = vec![0usize];

        while let Some(slot) = pending.pop() {
            let Some(cell) = self.cells.get(slot) else {
                continue;
            };
            if cell.mass <= 0.0 {
                continue;
            }

            if cell.is_leaf() {
                for &other in cell.points.iter().filter(|&&other| other != index) {
                    total += charge.pair(index, other, positions[other] - point);
                }
                continue;
            }

            let delta = cell.center_of_mass - point;
            let distance_sq = delta.length_sq();
            let far_enough = !cell.contains(point)
                && distance_sq > 0.0
                && cell.side() * cell.side() < charge.theta_sq * distance_sq;
            if far_enough {
                total += charge.aggregate(delta, cell.mass);
            } else {
                pending.extend(cell.children.iter().flatten());
            }
        }
        total
    }
}

fn bounding_square(points: &[Vec2]) -> Option<(Vec2, f32)> {
    let first = *points.first()?;
    let (min, max) = points.iter().fold((first, first), |(min, max), point| {
        (
            vec2(min.x.min(point.x), min.y.min(point.y)),
            vec2(max.x.max(point.x), max.y.max(point.y)),
        )
    });
    if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
        return None;
    }

    let span = (max.x - min.x).max(max.y - min.y).max(1.0);
    Some(((min + max) * 0.5, span * 0.5 + 1.0))
}
