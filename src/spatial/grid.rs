//! Sparse hash grid for spatial queries over the tick snapshot

use ahash::AHashMap;

use crate::core::types::{ObjectId, Vec2};

/// Sparse hash grid mapping cells to the objects inside them.
///
/// Rebuilt from the snapshot at the start of every tick, so queries reflect
/// positions as of the start of the current tick.
pub struct SpatialGrid {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<(ObjectId, Vec2)>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, id: ObjectId, pos: Vec2) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push((id, pos));
    }

    /// All objects in the 3x3 cell neighbourhood around `pos`
    pub fn query_neighbors(&self, pos: Vec2) -> impl Iterator<Item = ObjectId> + '_ {
        let (cx, cy) = self.cell_coord(pos);

        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                self.cells
                    .get(&(cx + dx, cy + dy))
                    .into_iter()
                    .flatten()
                    .map(|(id, _)| *id)
            })
        })
    }

    /// All objects within `radius` of `center`, exact.
    ///
    /// Scans as many cell rings as the radius requires, then distance-filters.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<ObjectId> {
        let (cx, cy) = self.cell_coord(center);
        let reach = (radius / self.cell_size).ceil() as i32;

        let mut found = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                if let Some(cell) = self.cells.get(&(cx + dx, cy + dy)) {
                    for (id, pos) in cell {
                        if center.distance(pos) <= radius {
                            found.push(*id);
                        }
                    }
                }
            }
        }
        found
    }

    /// Rebuild grid from an id/position stream
    pub fn rebuild(&mut self, objects: impl Iterator<Item = (ObjectId, Vec2)>) {
        self.clear();
        for (id, pos) in objects {
            self.insert(id, pos);
        }
    }
}
