//! Indexed 2D canvases the carve passes sample from.

/// A palette-indexed image with one index designated transparent.
///
/// Row 0 is the top of the image. Out-of-bounds writes are dropped so
/// blitting offset sprites near the canvas edge needs no clipping at the
/// call site.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    transparent: u8,
    pixels: Vec<u8>,
}

impl Raster {
    /// Creates a raster filled with the transparent index.
    pub fn filled(width: u32, height: u32, transparent: u8) -> Self {
        Self {
            width,
            height,
            transparent,
            pixels: vec![transparent; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn transparent_index(&self) -> u8 {
        self.transparent
    }

    /// Palette index at (x, y), counted from the top-left corner. The
    /// position must lie inside the canvas.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn is_transparent(&self, x: u32, y: u32) -> bool {
        self.get(x, y) == self.transparent
    }

    /// Writes a palette index at (x, y). Writes outside the canvas are
    /// silently dropped.
    pub fn put(&mut self, x: i32, y: i32, index: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.pixels[(y as u32 * self.width + x as u32) as usize] = index;
    }

    /// Copies out the window starting at (x, y). The window must lie
    /// inside the canvas.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Raster {
        debug_assert!(x + width <= self.width && y + height <= self.height);
        let mut out = Raster::filled(width, height, self.transparent);
        for row in 0..height {
            let from = ((y + row) * self.width + x) as usize;
            let to = (row * width) as usize;
            out.pixels[to..to + width as usize]
                .copy_from_slice(&self.pixels[from..from + width as usize]);
        }
        out
    }
}
