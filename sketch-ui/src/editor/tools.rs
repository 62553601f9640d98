// Pen tool and palette for the drawing surface.

use crate::editor::Canvas;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

/// Pen width in logical (on-screen) pixels.
pub const LINE_WIDTH: f32 = 8.0;

/// The fixed palette offered next to the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenColor {
    #[default]
    Black,
    Red,
    Green,
    Blue,
    Orange,
    Purple,
}

impl PenColor {
    pub const PALETTE: [PenColor; 6] = [
        PenColor::Black,
        PenColor::Red,
        PenColor::Green,
        PenColor::Blue,
        PenColor::Orange,
        PenColor::Purple,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            PenColor::Black => "#000000",
            PenColor::Red => "#FF3B30",
            PenColor::Green => "#34C759",
            PenColor::Blue => "#007AFF",
            PenColor::Orange => "#FF9500",
            PenColor::Purple => "#AF52DE",
        }
    }

    pub fn color32(&self) -> Color32 {
        match self {
            PenColor::Black => Color32::from_rgb(0x00, 0x00, 0x00),
            PenColor::Red => Color32::from_rgb(0xFF, 0x3B, 0x30),
            PenColor::Green => Color32::from_rgb(0x34, 0xC7, 0x59),
            PenColor::Blue => Color32::from_rgb(0x00, 0x7A, 0xFF),
            PenColor::Orange => Color32::from_rgb(0xFF, 0x95, 0x00),
            PenColor::Purple => Color32::from_rgb(0xAF, 0x52, 0xDE),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PenColor::Black => "black",
            PenColor::Red => "red",
            PenColor::Green => "green",
            PenColor::Blue => "blue",
            PenColor::Orange => "orange",
            PenColor::Purple => "purple",
        }
    }
}

/// Accepts a palette name ("red") or its hex code ("#FF3B30").
impl FromStr for PenColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PenColor::PALETTE
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted) || c.hex().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownColor(wanted.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("not a palette color: {0}")]
pub struct UnknownColor(pub String);

/// Style applied to every stroke until it is changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: PenColor,
    /// Logical pixels.
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: PenColor::default(),
            width: LINE_WIDTH,
        }
    }
}

/// Round-tipped pen working in raster (device) pixels.
/// Segments are painted as capsules, which gives round caps and joins.
#[derive(Debug, Clone)]
pub struct Pen {
    pub size: f32,
    pub color: Color32,
}

impl Pen {
    pub fn new(size: f32, color: Color32) -> Self {
        Self { size, color }
    }

    /// Pen for `style` on a raster scaled by `scale`.
    pub fn for_style(style: &StrokeStyle, scale: f32) -> Self {
        Self::new(style.width * scale, style.color.color32())
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Paint a single round dab centered on `at`.
    pub fn dab(&self, canvas: &mut Canvas, at: (f32, f32)) {
        self.segment(canvas, at, at);
    }

    /// Paint the line from `from` to `to`, both in raster pixels.
    pub fn segment(&self, canvas: &mut Canvas, from: (f32, f32), to: (f32, f32)) {
        let r = self.radius();
        if r <= 0.0 || canvas.width == 0 || canvas.height == 0 {
            return;
        }

        let max_x = (canvas.width - 1) as f32;
        let max_y = (canvas.height - 1) as f32;
        let x0 = (from.0.min(to.0) - r).floor().clamp(0.0, max_x) as u32;
        let x1 = (from.0.max(to.0) + r).ceil().clamp(0.0, max_x) as u32;
        let y0 = (from.1.min(to.1) - r).floor().clamp(0.0, max_y) as u32;
        let y1 = (from.1.max(to.1) + r).ceil().clamp(0.0, max_y) as u32;

        let r2 = r * r;
        let mut painted = 0usize;
        for y in y0..=y1 {
            for x in x0..=x1 {
                // sample at the pixel center
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                if distance_sq_to_segment(p, from, to) <= r2 && canvas.set_pixel(x, y, self.color) {
                    painted += 1;
                }
            }
        }
        trace!(
            "Pen segment ({:.1}, {:.1}) -> ({:.1}, {:.1}) painted {} pixels",
            from.0,
            from.1,
            to.0,
            to.1,
            painted
        );
    }
}

fn distance_sq_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let (apx, apy) = (p.0 - a.0, p.1 - a.1);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    };
    let (dx, dy) = (apx - t * abx, apy - t * aby);
    dx * dx + dy * dy
}
