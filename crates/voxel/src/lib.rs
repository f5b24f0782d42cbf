//! Voxel reconstruction from sprite rotation sets.
//!
//! A [`Volume`] is carved from eight fixed-angle views of an object using a
//! three-pass visual-hull sweep: mark everything any view can see, carve away
//! everything any view sees through, then repaint the surfaces that survived.
//! The result can be serialized as a MagicaVoxel model through [`io::vox`].

pub mod carve;
pub mod io;
pub mod palette;
pub mod raster;
pub mod rig;
pub mod volume;

pub use carve::{carve_background, carve_silhouettes, paint_surfaces, voxelize, SAMPLE_STEP};
pub use palette::{Palette, PaletteError, Rgba, PALETTE_BYTES};
pub use raster::Raster;
pub use rig::{CameraRig, PASS_ORDER, ROTATION_COUNT};
pub use volume::Volume;
