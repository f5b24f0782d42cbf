//! The fixed eight-camera arrangement a rotation set is captured with.

use glam::{DMat3, DVec3};

/// Views in a full rotation set.
pub const ROTATION_COUNT: usize = 8;

/// Order the carve passes visit rotations in. Later entries overwrite
/// earlier ones wherever a pass writes the same voxel from several views;
/// rotation 0 comes last.
pub const PASS_ORDER: [usize; ROTATION_COUNT] = [1, 3, 5, 7, 2, 6, 4, 0];

const SNAP_EPSILON: f64 = 1e-12;

/// Eight view-to-volume rotations, one per 45 degree step around the
/// vertical axis.
#[derive(Debug, Clone)]
pub struct CameraRig {
    transforms: [DMat3; ROTATION_COUNT],
}

impl CameraRig {
    pub fn new() -> Self {
        let transforms = std::array::from_fn(|k| {
            let angle = std::f64::consts::TAU * k as f64 / ROTATION_COUNT as f64;
            snap_zeros(DMat3::from_rotation_z(angle))
        });
        Self { transforms }
    }

    /// Maps a point from a view's local frame into volume space. The local
    /// frame runs X across the canvas, Y along the view depth, and Z up.
    pub fn view_to_volume(&self, rotation: usize, point: DVec3) -> DVec3 {
        self.transforms[rotation] * point
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

/// Zeroes matrix entries within `SNAP_EPSILON` of zero, keeping the four
/// cardinal rotations exact on integer points.
fn snap_zeros(m: DMat3) -> DMat3 {
    let mut cols = m.to_cols_array();
    for value in &mut cols {
        if value.abs() < SNAP_EPSILON {
            *value = 0.0;
        }
    }
    DMat3::from_cols_array(&cols)
}
