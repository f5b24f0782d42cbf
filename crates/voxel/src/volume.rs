//! Dense voxel grid the carve passes write into.

use glam::{IVec3, UVec3};

/// A voxel grid with per-voxel occupancy and palette color.
///
/// Occupancy and color are independent: [`Volume::clear`] vacates a voxel
/// but leaves its last color behind, and [`Volume::paint`] recolors a
/// voxel without occupying it. The carve passes rely on both.
#[derive(Debug, Clone)]
pub struct Volume {
    size: UVec3,
    occupancy: Vec<bool>,
    colors: Vec<u8>,
}

impl Volume {
    pub fn new(size: UVec3) -> Self {
        let len = size.x as usize * size.y as usize * size.z as usize;
        Self {
            size,
            occupancy: vec![false; len],
            colors: vec![0; len],
        }
    }

    pub fn cube(side: u32) -> Self {
        Self::new(UVec3::splat(side))
    }

    pub fn size(&self) -> UVec3 {
        self.size
    }

    /// Whether a signed position lies inside the grid.
    pub fn contains(&self, p: IVec3) -> bool {
        p.x >= 0
            && p.y >= 0
            && p.z >= 0
            && (p.x as u32) < self.size.x
            && (p.y as u32) < self.size.y
            && (p.z as u32) < self.size.z
    }

    fn index(&self, p: IVec3) -> usize {
        debug_assert!(self.contains(p));
        (p.x as usize * self.size.y as usize + p.y as usize) * self.size.z as usize
            + p.z as usize
    }

    pub fn is_occupied(&self, p: IVec3) -> bool {
        self.occupancy[self.index(p)]
    }

    pub fn color(&self, p: IVec3) -> u8 {
        self.colors[self.index(p)]
    }

    /// Occupies a voxel and sets its color.
    pub fn fill(&mut self, p: IVec3, color: u8) {
        let i = self.index(p);
        self.occupancy[i] = true;
        self.colors[i] = color;
    }

    /// Vacates a voxel, leaving its color behind.
    pub fn clear(&mut self, p: IVec3) {
        let i = self.index(p);
        self.occupancy[i] = false;
    }

    /// Recolors a voxel without changing its occupancy.
    pub fn paint(&mut self, p: IVec3, color: u8) {
        let i = self.index(p);
        self.colors[i] = color;
    }

    pub fn occupied_count(&self) -> usize {
        self.occupancy.iter().filter(|&&occupied| occupied).count()
    }

    /// Occupied voxels with their colors, in X-major, then Y, then Z order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (UVec3, u8)> + '_ {
        let size = self.size;
        self.occupancy
            .iter()
            .enumerate()
            .filter_map(move |(i, &occupied)| {
                if !occupied {
                    return None;
                }
                let z = i % size.z as usize;
                let y = (i / size.z as usize) % size.y as usize;
                let x = i / (size.z as usize * size.y as usize);
                Some((UVec3::new(x as u32, y as u32, z as u32), self.colors[i]))
            })
    }
}
