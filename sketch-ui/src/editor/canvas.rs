// This is the raster behind the drawing surface
// Strokes are painted straight into it and undo snapshots are copies of it

use egui::Color32;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color32>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color32) -> Self {
        info!(
            "Creating new canvas of size {}x{} with background color {:?}",
            width, height, background
        );

        let total_pixels = width as usize * height as usize;
        debug!("Total pixels to initialize: {}", total_pixels);

        Self {
            width,
            height,
            pixels: vec![background; total_pixels],
        }
    }

    /// A solid white canvas, the state of a fresh drawing.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, Color32::WHITE)
    }

    // Check if coordinates are within canvas bounds
    fn is_valid_coordinate(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    //convert 2d coordinates to 1d index
    fn coord_to_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    // Get the color of a pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color32> {
        if !self.is_valid_coordinate(x, y) {
            warn!(
                "Requested pixel color at invalid coordinates ({}, {})",
                x, y
            );
            return None;
        }

        Some(self.pixels[self.coord_to_index(x, y)])
    }

    // Set the color of a pixel at (x, y)
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color32) -> bool {
        if !self.is_valid_coordinate(x, y) {
            trace!("Skipping pixel outside the canvas ({}, {})", x, y);
            return false;
        }

        let index = self.coord_to_index(x, y);
        self.pixels[index] = color;
        true
    }

    // Fill entire canvas with a color
    pub fn fill(&mut self, color: Color32) {
        debug!("Filling canvas {:?}", color);
        self.pixels.fill(color);
    }

    // Clear canvas
    pub fn clear(&mut self) {
        info!("Clearing canvas");
        self.fill(Color32::WHITE);
    }

    /// True when every pixel is white.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == Color32::WHITE)
    }

    /// Unpremultiplied RGBA bytes, row by row.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.to_srgba_unmultiplied())
            .collect()
    }

    // Get canvas dimensions
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
