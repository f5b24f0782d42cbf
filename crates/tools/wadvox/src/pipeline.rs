//! End-to-end drive from loaded WADs to model files on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use voxel::{voxelize, CameraRig, Palette, Volume};
use wad::{WadCollection, TRANSPARENT_INDEX};

use crate::config::Corrections;
use crate::rotation::{self, RotationSet};

/// Cube side of the working volume.
pub const VOLUME_SIZE: u32 = 256;

/// Name of the palette lump.
pub const PALETTE_LUMP: &str = "PLAYPAL";

/// One sprite frame to convert.
#[derive(Debug, Clone)]
pub struct Target {
    pub sprite: String,
    pub frame: char,
}

impl Target {
    pub fn name(&self) -> String {
        format!("{}{}", self.sprite, self.frame)
    }
}

/// Pulls the game palette out of the loaded WADs.
pub fn load_palette(wads: &WadCollection) -> Result<Palette> {
    let lump = wads
        .find_lump(PALETTE_LUMP)
        .with_context(|| format!("no {PALETTE_LUMP} lump in any loaded WAD"))?;
    Palette::from_rgb_triplets(&lump.data, TRANSPARENT_INDEX)
        .with_context(|| format!("decoding {PALETTE_LUMP}"))
}

/// Converts every target frame and returns the model paths written.
pub fn convert_all(
    wads: &WadCollection,
    palette: &Palette,
    corrections: &Corrections,
    targets: &[Target],
    out_dir: &Path,
    dump_frames: bool,
) -> Result<Vec<PathBuf>> {
    let rig = CameraRig::new();
    let mut written = Vec::with_capacity(targets.len());
    for target in targets {
        let path = convert_frame(
            wads,
            palette,
            &rig,
            corrections,
            target,
            out_dir,
            dump_frames,
        )?;
        written.push(path);
    }
    Ok(written)
}

/// Converts one sprite frame and writes `mdl-{sprite}{frame}.vox` into
/// `out_dir`.
pub fn convert_frame(
    wads: &WadCollection,
    palette: &Palette,
    rig: &CameraRig,
    corrections: &Corrections,
    target: &Target,
    out_dir: &Path,
    dump_frames: bool,
) -> Result<PathBuf> {
    let set = rotation::build_views(wads, &target.sprite, target.frame, corrections)
        .with_context(|| format!("assembling rotation set for {}", target.name()))?;
    tracing::info!(
        frame = %target.name(),
        width = set.views[0].width(),
        height = set.views[0].height(),
        "composed rotation set"
    );

    if dump_frames {
        dump_canvases(&set, palette, target, out_dir)?;
    }

    let mut volume = Volume::cube(VOLUME_SIZE);
    tracing::info!(frame = %target.name(), "carving");
    voxelize(&mut volume, rig, &set.views);
    tracing::info!(
        frame = %target.name(),
        voxels = volume.occupied_count(),
        "carved model"
    );

    let path = out_dir.join(format!("mdl-{}.vox", target.name()));
    voxel::io::save_model(&path, &volume, palette)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Writes each uncropped canvas as `fr-{sprite}{frame}{rotation}.png`.
fn dump_canvases(
    set: &RotationSet,
    palette: &Palette,
    target: &Target,
    out_dir: &Path,
) -> Result<()> {
    for (slot, canvas) in set.canvases.iter().enumerate() {
        let mut image = image::RgbaImage::new(canvas.width(), canvas.height());
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let color = palette.color(canvas.get(x, y));
            *pixel = image::Rgba([color.r, color.g, color.b, color.a]);
        }
        let path = out_dir.join(format!("fr-{}{}.png", target.name(), slot + 1));
        image
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), "dumped canvas");
    }
    Ok(())
}
