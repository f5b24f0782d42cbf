//! Three-pass visual-hull sweep over an eight-view rotation set.
//!
//! Each view contributes a fan of sample columns marching through the
//! volume along the view's depth axis. Pass 1 marks every voxel an opaque
//! pixel sweeps, pass 2 erases every voxel a transparent pixel sweeps,
//! and pass 3 walks opaque columns once more to give the surviving
//! surfaces the color each view actually saw.

use glam::{DVec3, IVec3};

use crate::raster::Raster;
use crate::rig::{CameraRig, PASS_ORDER, ROTATION_COUNT};
use crate::volume::Volume;

/// Samples taken per voxel of column depth.
pub const SAMPLE_STEP: u32 = 4;

/// Sampling geometry shared by all columns of one rotation set against
/// one volume.
struct SweepFrame {
    horiz_center: f64,
    vert_center: f64,
    half_radius: f64,
    sample_count: u32,
    volume_center: DVec3,
}

impl SweepFrame {
    fn new(views: &[Raster; ROTATION_COUNT], volume: &Volume) -> Self {
        debug_assert!(views
            .iter()
            .all(|v| v.width() == views[0].width() && v.height() == views[0].height()));
        let width = views[0].width() as f64;
        let height = views[0].height() as f64;
        // Columns must cross the whole canvas footprint at any rotation
        // angle, so they run the length of the canvas diagonal.
        let radius = width * std::f64::consts::FRAC_PI_4.cos();
        Self {
            horiz_center: width / 2.0,
            vert_center: height / 2.0,
            half_radius: radius / 2.0,
            sample_count: (radius * SAMPLE_STEP as f64).ceil() as u32,
            volume_center: volume.size().as_dvec3() / 2.0,
        }
    }

    /// Voxel positions sampled along the column behind canvas position
    /// (u, v) of the given rotation, front to back. `v` counts up from
    /// the canvas bottom.
    fn column<'a>(
        &'a self,
        rig: &'a CameraRig,
        rotation: usize,
        u: f64,
        v: f64,
    ) -> impl Iterator<Item = IVec3> + 'a {
        (0..self.sample_count).map(move |t| {
            let local = DVec3::new(
                u - self.horiz_center,
                t as f64 / SAMPLE_STEP as f64 - self.half_radius,
                v - self.vert_center,
            );
            let p = rig.view_to_volume(rotation, local) + self.volume_center;
            IVec3::new(
                p.x.round() as i32,
                p.y.round() as i32,
                p.z.round() as i32,
            )
        })
    }
}

/// Pass 1: sweeps every opaque pixel of every view through the volume,
/// occupying each sampled voxel with the pixel's palette index. The
/// result is the union of all eight swept silhouettes.
pub fn carve_silhouettes(volume: &mut Volume, rig: &CameraRig, views: &[Raster; ROTATION_COUNT]) {
    let frame = SweepFrame::new(views, volume);
    let (width, height) = (views[0].width(), views[0].height());

    for &rotation in &PASS_ORDER {
        tracing::debug!(rotation, "sweeping silhouette");
        let view = &views[rotation];
        for u in 0..width {
            for v in 0..height {
                let c = view.get(u, height - 1 - v);
                if c == view.transparent_index() {
                    continue;
                }
                for p in frame.column(rig, rotation, u as f64, v as f64) {
                    if volume.contains(p) {
                        volume.fill(p, c);
                    }
                }
            }
        }
    }
}

/// Pass 2: sweeps every transparent pixel of every view through the
/// volume, vacating each sampled voxel. Each view additionally wipes the
/// columns its diagonal sweep reach extends beyond the canvas width, on
/// both the direct and the width-mirrored side, so no rotation leaves
/// residue outside its own silhouette.
pub fn carve_background(volume: &mut Volume, rig: &CameraRig, views: &[Raster; ROTATION_COUNT]) {
    let frame = SweepFrame::new(views, volume);
    let (width, height) = (views[0].width(), views[0].height());
    let overscan = (width as f64 * std::f64::consts::SQRT_2) as u32;

    for &rotation in &PASS_ORDER {
        tracing::debug!(rotation, "carving background");
        let view = &views[rotation];
        for u in 0..width {
            for v in 0..height {
                if !view.is_transparent(u, height - 1 - v) {
                    continue;
                }
                for p in frame.column(rig, rotation, u as f64, v as f64) {
                    if volume.contains(p) {
                        volume.clear(p);
                    }
                }
            }
        }

        for u in width..overscan {
            for v in 0..height {
                for p in frame.column(rig, rotation, u as f64, v as f64) {
                    if volume.contains(p) {
                        volume.clear(p);
                    }
                }
                let mirrored = width as f64 - u as f64;
                for p in frame.column(rig, rotation, mirrored, v as f64) {
                    if volume.contains(p) {
                        volume.clear(p);
                    }
                }
            }
        }
    }
}

/// Pass 3: walks every opaque pixel's column front to back, recoloring
/// voxels with the pixel's palette index until the first occupied voxel
/// has been painted. That voxel is the surface the view sees; the column
/// stops there. Views later in [`PASS_ORDER`] overwrite earlier ones on
/// shared surfaces.
pub fn paint_surfaces(volume: &mut Volume, rig: &CameraRig, views: &[Raster; ROTATION_COUNT]) {
    let frame = SweepFrame::new(views, volume);
    let (width, height) = (views[0].width(), views[0].height());

    for &rotation in &PASS_ORDER {
        tracing::debug!(rotation, "painting surfaces");
        let view = &views[rotation];
        for u in 0..width {
            for v in 0..height {
                let c = view.get(u, height - 1 - v);
                if c == view.transparent_index() {
                    continue;
                }
                for p in frame.column(rig, rotation, u as f64, v as f64) {
                    if !volume.contains(p) {
                        continue;
                    }
                    volume.paint(p, c);
                    if volume.is_occupied(p) {
                        break;
                    }
                }
            }
        }
    }
}

/// Runs the three carve passes in order.
pub fn voxelize(volume: &mut Volume, rig: &CameraRig, views: &[Raster; ROTATION_COUNT]) {
    tracing::info!("pass 1: sweeping silhouettes");
    carve_silhouettes(volume, rig, views);
    tracing::info!(occupied = volume.occupied_count(), "pass 2: carving background");
    carve_background(volume, rig, views);
    tracing::info!(occupied = volume.occupied_count(), "pass 3: painting surfaces");
    paint_surfaces(volume, rig, views);
}
