//! Assembles a frame's eight rotation views onto aligned canvases.
//!
//! Rotation lumps come in two naming forms. `CYBRA1` holds frame A,
//! rotation 1 of sprite CYBR. An eight-character name like `SARGA3A7`
//! holds two rotations of the same frame in one lump: rotation 3 as
//! stored and rotation 7 as its horizontal mirror. The first lump found
//! for a rotation wins, so patch WADs loaded with higher precedence
//! override stock sprites.
//!
//! Each view is drawn onto a fixed canvas, horizontally centered on its
//! own offsets so all eight line up on the same origin, then every view
//! is cropped to the drawn bounding box of the whole set.

use thiserror::Error;
use voxel::{Raster, ROTATION_COUNT};
use wad::{Lump, Picture, PictureError, WadCollection, TRANSPARENT_INDEX};

use crate::config::Corrections;

/// Side of the square canvas views are composed on.
pub const CANVAS_SIZE: u32 = 256;

/// Rows kept free below the sprite baseline.
pub const BASELINE_MARGIN: u32 = 16;

/// Failure to assemble a rotation set.
#[derive(Debug, Error)]
pub enum RotationError {
    /// The sprite ranges do not cover all eight rotations of the frame.
    #[error("sprite {sprite} frame {frame} is missing rotations {}", missing_list(.missing))]
    Incomplete {
        sprite: String,
        frame: char,
        missing: Vec<u8>,
    },

    /// A matched lump is not a valid picture.
    #[error("decoding {lump}")]
    Decode {
        lump: String,
        #[source]
        source: PictureError,
    },

    /// Every drawn pixel of every rotation fell outside the canvas.
    #[error("sprite {sprite} frame {frame} has no visible pixels")]
    Empty { sprite: String, frame: char },
}

fn missing_list(missing: &[u8]) -> String {
    missing
        .iter()
        .map(|rotation| rotation.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A frame's eight views, cropped and ready to sweep, plus the uncropped
/// canvases they were drawn on.
#[derive(Debug)]
pub struct RotationSet {
    pub views: [Raster; ROTATION_COUNT],
    pub canvases: [Raster; ROTATION_COUNT],
}

/// Composes the rotation set of one sprite frame from the loaded WADs.
pub fn build_views(
    wads: &WadCollection,
    sprite: &str,
    frame: char,
    corrections: &Corrections,
) -> Result<RotationSet, RotationError> {
    let lumps = find_rotations(wads, sprite, frame)?;
    let frame_name = format!("{sprite}{frame}");
    let adjustments = corrections.get(&frame_name);

    let mut pictures = Vec::with_capacity(ROTATION_COUNT);
    for (slot, (lump, mirrored)) in lumps.iter().enumerate() {
        let picture = Picture::parse(&lump.data).map_err(|source| RotationError::Decode {
            lump: lump.name.clone(),
            source,
        })?;
        let mut left = i32::from(picture.left_offset());
        let mut top = i32::from(picture.top_offset());
        if let Some(adjust) = adjustments {
            left += adjust[slot][0];
            top += adjust[slot][1];
        }
        tracing::debug!(
            lump = %lump.name,
            rotation = slot + 1,
            left,
            top,
            mirrored,
            "composing view"
        );
        pictures.push((picture, left, top, *mirrored));
    }

    let mut bounds = Bounds::new();
    let canvases: [Raster; ROTATION_COUNT] = std::array::from_fn(|slot| {
        let (picture, left, top, mirrored) = &pictures[slot];
        blit(picture, *left, *top, *mirrored, &mut bounds)
    });

    let window = bounds.window().ok_or_else(|| RotationError::Empty {
        sprite: sprite.to_string(),
        frame,
    })?;
    tracing::debug!(
        x = window.x,
        y = window.y,
        width = window.width,
        height = window.height,
        "cropping views"
    );
    let views = std::array::from_fn(|slot| {
        canvases[slot].crop(window.x, window.y, window.width, window.height)
    });

    Ok(RotationSet { views, canvases })
}

/// Finds the lump for each of the eight rotations, walking the sprite
/// ranges of the collection in precedence order.
fn find_rotations<'a>(
    wads: &'a WadCollection,
    sprite: &str,
    frame: char,
) -> Result<Vec<(&'a Lump, bool)>, RotationError> {
    let mut found: [Option<(&Lump, bool)>; ROTATION_COUNT] = [None; ROTATION_COUNT];
    let mut remaining = ROTATION_COUNT;
    let frame_byte = frame as u8;

    for lump in wads.sprite_lumps() {
        let name = lump.name.as_bytes();
        if name.len() < 4 || &name[..4] != sprite.as_bytes() {
            continue;
        }
        if name.len() >= 6 && name[4] == frame_byte {
            if let Some(slot) = rotation_slot(name[5]) {
                if found[slot].is_none() {
                    found[slot] = Some((lump, false));
                    remaining -= 1;
                }
            }
        }
        if name.len() == 8 && name[6] == frame_byte {
            if let Some(slot) = rotation_slot(name[7]) {
                if found[slot].is_none() {
                    found[slot] = Some((lump, true));
                    remaining -= 1;
                }
            }
        }
        if remaining == 0 {
            break;
        }
    }

    let mut lumps = Vec::with_capacity(ROTATION_COUNT);
    let mut missing = Vec::new();
    for (slot, entry) in found.into_iter().enumerate() {
        match entry {
            Some(view) => lumps.push(view),
            None => missing.push(slot as u8 + 1),
        }
    }
    if !missing.is_empty() {
        return Err(RotationError::Incomplete {
            sprite: sprite.to_string(),
            frame,
            missing,
        });
    }
    Ok(lumps)
}

fn rotation_slot(digit: u8) -> Option<usize> {
    match digit {
        b'1'..=b'8' => Some((digit - b'1') as usize),
        _ => None,
    }
}

/// Draws a picture onto a fresh canvas. The sprite's left offset centers
/// it horizontally; its top offset hangs it from the baseline row. Drawn
/// pixel positions widen `bounds` even when they miss the canvas.
fn blit(picture: &Picture, left: i32, top: i32, mirrored: bool, bounds: &mut Bounds) -> Raster {
    let mut canvas = Raster::filled(CANVAS_SIZE, CANVAS_SIZE, TRANSPARENT_INDEX);
    let x_base = CANVAS_SIZE as i32 / 2 - left;
    let y_base = CANVAS_SIZE as i32 - BASELINE_MARGIN as i32 - top;

    for px in 0..picture.width() {
        let x = if mirrored {
            x_base + picture.width() as i32 - 1 - px as i32
        } else {
            x_base + px as i32
        };
        for py in 0..picture.height() {
            let c = picture.pixel(px, py);
            if c == TRANSPARENT_INDEX {
                continue;
            }
            let y = y_base + py as i32;
            bounds.include(x, y);
            canvas.put(x, y, c);
        }
    }
    canvas
}

/// Drawn bounding box across a whole rotation set.
struct Bounds {
    xmin: i32,
    ymin: i32,
    xmax: i32,
    ymax: i32,
}

/// Crop window in canvas coordinates.
struct Window {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl Bounds {
    fn new() -> Self {
        Self {
            xmin: i32::MAX,
            ymin: i32::MAX,
            xmax: i32::MIN,
            ymax: i32::MIN,
        }
    }

    fn include(&mut self, x: i32, y: i32) {
        self.xmin = self.xmin.min(x);
        self.ymin = self.ymin.min(y);
        self.xmax = self.xmax.max(x);
        self.ymax = self.ymax.max(y);
    }

    /// The smallest window covering every drawn pixel, clipped to the
    /// canvas. `None` when nothing landed on it.
    fn window(&self) -> Option<Window> {
        let x0 = self.xmin.max(0);
        let y0 = self.ymin.max(0);
        let x1 = self.xmax.min(CANVAS_SIZE as i32 - 1);
        let y1 = self.ymax.min(CANVAS_SIZE as i32 - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some(Window {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0 + 1) as u32,
            height: (y1 - y0 + 1) as u32,
        })
    }
}
