//! The freehand drawing surface.
//!
//! Owns the raster, the undo history and the current stroke. Every input event
//! mutates the raster synchronously; there is no buffering of vector strokes.
//!
//! - One undo entry per stroke: the snapshot is taken when the stroke begins.
//! - Undo with an empty history clears the canvas instead of doing nothing.
//! - Points come in as logical, canvas-local coordinates and are scaled by the
//!   device pixel ratio before they hit the raster.

use serde::{Deserialize, Serialize};
use sketch_core::EncodedImage;
use tracing::{debug, info, trace, warn};

use crate::editor::export::{encode_png, ExportError};
use crate::editor::history::History;
use crate::editor::tools::{Pen, PenColor, StrokeStyle};
use crate::editor::Canvas;

/// Largest raster width or height, in device pixels.
pub const MAX_RASTER_SIDE: u32 = 4096;

/// A position in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Raw pointer input in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput<'a> {
    Mouse { client_x: f32, client_y: f32 },
    /// Active touches; only the first one draws.
    Touch(&'a [Point]),
}

/// Where the surface sits in the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenOrigin {
    pub left: f32,
    pub top: f32,
}

impl ScreenOrigin {
    /// Viewport coordinates to canvas-local ones. `None` for a touch event without touches.
    pub fn to_local(&self, input: &PointerInput<'_>) -> Option<Point> {
        let (x, y) = match input {
            PointerInput::Mouse { client_x, client_y } => (*client_x, *client_y),
            PointerInput::Touch(touches) => {
                let first = touches.first()?;
                (first.x, first.y)
            }
        };
        Some(Point::new(x - self.left, y - self.top))
    }
}

/// Input events, already in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    /// The pointer left the surface.
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StrokeState {
    Idle,
    Drawing { last: Point },
}

#[derive(Debug, Clone)]
pub struct DrawingSurface {
    canvas: Canvas,
    history: History,
    style: StrokeStyle,
    scale: f32,
    stroke: StrokeState,
    has_content: bool,
    revision: u64,
}

impl DrawingSurface {
    /// A blank surface for an on-screen area of `width` x `height` logical pixels
    /// on a display with the given device pixel ratio.
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        let raster_width = raster_size(width, scale);
        let raster_height = raster_size(height, scale);
        info!(
            "Drawing surface {}x{} at scale {} -> raster {}x{}",
            width, height, scale, raster_width, raster_height
        );

        Self {
            canvas: Canvas::blank(raster_width, raster_height),
            history: History::default(),
            style: StrokeStyle::default(),
            scale,
            stroke: StrokeState::Idle,
            has_content: false,
            revision: 0,
        }
    }

    /// Start a stroke. Snapshots the raster first so undo removes the whole stroke.
    pub fn begin_stroke(&mut self, point: Point) {
        self.history.push(self.canvas.clone());
        self.stroke = StrokeState::Drawing { last: point };
        self.has_content = true;
        debug!(
            "Stroke started at ({:.1}, {:.1}), {} undo snapshots",
            point.x,
            point.y,
            self.history.len()
        );
    }

    /// Draw from the previous point to `point`. Ignored when no stroke is active.
    pub fn extend_stroke(&mut self, point: Point) {
        let StrokeState::Drawing { last } = self.stroke else {
            trace!("Ignoring move without an active stroke");
            return;
        };

        let pen = Pen::for_style(&self.style, self.scale);
        let (from, to) = (self.to_raster(last), self.to_raster(point));
        pen.segment(&mut self.canvas, from, to);
        self.stroke = StrokeState::Drawing { last: point };
        self.revision += 1;
    }

    pub fn end_stroke(&mut self) {
        if self.stroke != StrokeState::Idle {
            debug!("Stroke ended");
            self.stroke = StrokeState::Idle;
        }
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(point) => self.begin_stroke(point),
            PointerEvent::Move(point) => self.extend_stroke(point),
            PointerEvent::Up | PointerEvent::Leave => self.end_stroke(),
        }
    }

    /// Blank white raster, no undo history, no content.
    pub fn clear(&mut self) {
        info!("Clearing drawing surface");
        self.canvas.clear();
        self.history.clear();
        self.stroke = StrokeState::Idle;
        self.has_content = false;
        self.revision += 1;
    }

    /// Restore the snapshot taken before the latest stroke, or clear when there is none.
    pub fn undo(&mut self) {
        match self.history.pop() {
            Some(snapshot) => {
                self.canvas = snapshot;
                self.stroke = StrokeState::Idle;
                self.has_content = !self.history.is_empty();
                self.revision += 1;
                debug!("Undo, {} snapshots left", self.history.len());
            }
            None => {
                debug!("Undo with empty history clears the surface");
                self.clear();
            }
        }
    }

    /// The current raster as PNG. Works on a blank surface too.
    pub fn export_image(&self) -> Result<EncodedImage, ExportError> {
        encode_png(&self.canvas)
    }

    pub fn has_content(&self) -> bool {
        self.has_content
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.stroke, StrokeState::Drawing { .. })
    }

    pub fn set_color(&mut self, color: PenColor) {
        debug!("Pen color set to {}", color.name());
        self.style.color = color;
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// On-screen size in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.canvas.width() as f32 / self.scale,
            self.canvas.height() as f32 / self.scale,
        )
    }

    /// Bumped on every raster change; lets a view skip re-uploading an unchanged image.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn to_raster(&self, point: Point) -> (f32, f32) {
        (point.x * self.scale, point.y * self.scale)
    }
}

fn raster_size(logical: f32, scale: f32) -> u32 {
    let size = (logical * scale).floor();
    if size.is_nan() || size < 1.0 {
        return 1;
    }
    if size > MAX_RASTER_SIDE as f32 {
        warn!(
            requested = size,
            max = MAX_RASTER_SIDE,
            "raster side too large, clamping"
        );
        return MAX_RASTER_SIDE;
    }
    size as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::history::MAX_UNDO_STATES;
    use egui::Color32;

    fn surface() -> DrawingSurface {
        DrawingSurface::new(40.0, 30.0, 1.0)
    }

    fn stroke(surface: &mut DrawingSurface, from: (f32, f32), to: (f32, f32)) {
        surface.begin_stroke(Point::new(from.0, from.1));
        surface.extend_stroke(Point::new(to.0, to.1));
        surface.end_stroke();
    }

    #[test]
    fn test_raster_is_scaled_by_device_pixel_ratio() {
        let s = DrawingSurface::new(100.5, 50.0, 2.0);
        assert_eq!((s.canvas().width(), s.canvas().height()), (201, 100));

        let s = DrawingSurface::new(10.0, 10.0, 1.5);
        assert_eq!((s.canvas().width(), s.canvas().height()), (15, 15));
        assert_eq!(s.logical_size(), (10.0, 10.0));
    }

    #[test]
    fn test_oversized_raster_is_clamped() {
        let s = DrawingSurface::new(1e6, 10.0, 2.0);
        assert_eq!((s.canvas().width(), s.canvas().height()), (MAX_RASTER_SIDE, 20));

        let s = DrawingSurface::new(f32::MAX, 1.0, 2.0);
        assert_eq!(s.canvas().width(), MAX_RASTER_SIDE);
        assert_eq!(s.canvas().height(), 2);
    }

    #[test]
    fn test_stroke_draws_between_points() {
        let mut s = DrawingSurface::new(20.0, 10.0, 1.0);
        s.begin_stroke(Point::new(2.0, 5.0));
        s.extend_stroke(Point::new(10.0, 5.0));
        s.extend_stroke(Point::new(18.0, 5.0));
        s.end_stroke();

        for x in 2..18 {
            assert_eq!(s.canvas().get_pixel(x, 5), Some(Color32::BLACK));
        }
        assert_eq!(s.canvas().get_pixel(10, 0), Some(Color32::WHITE));
        assert_eq!(s.history_len(), 1);
    }

    #[test]
    fn test_invalid_scale_falls_back_to_one() {
        let s = DrawingSurface::new(10.0, 10.0, 0.0);
        assert_eq!(s.scale(), 1.0);
        assert_eq!(s.canvas().width(), 10);
    }

    #[test]
    fn test_fresh_surface_is_blank() {
        let s = surface();
        assert!(!s.has_content());
        assert!(s.canvas().is_blank());
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn test_begin_marks_content_without_painting() {
        let mut s = surface();
        s.begin_stroke(Point::new(5.0, 5.0));
        assert!(s.has_content());
        assert!(s.is_drawing());
        assert!(s.canvas().is_blank());
        assert_eq!(s.history_len(), 1);
    }

    #[test]
    fn test_one_snapshot_per_stroke() {
        let mut s = surface();
        s.begin_stroke(Point::new(5.0, 5.0));
        for i in 0..10 {
            s.extend_stroke(Point::new(6.0 + i as f32, 5.0));
        }
        s.end_stroke();
        assert_eq!(s.history_len(), 1);
        assert!(!s.canvas().is_blank());
    }

    #[test]
    fn test_move_after_end_is_ignored() {
        let mut s = surface();
        stroke(&mut s, (5.0, 5.0), (10.0, 5.0));
        let before = s.canvas().clone();

        s.extend_stroke(Point::new(30.0, 20.0));
        assert_eq!(s.canvas(), &before);
        assert!(!s.is_drawing());
    }

    #[test]
    fn test_move_before_any_stroke_is_ignored() {
        let mut s = surface();
        s.extend_stroke(Point::new(10.0, 10.0));
        s.end_stroke();
        assert!(s.canvas().is_blank());
        assert!(!s.has_content());
    }

    #[test]
    fn test_leave_ends_stroke() {
        let mut s = surface();
        s.handle(PointerEvent::Down(Point::new(5.0, 5.0)));
        s.handle(PointerEvent::Move(Point::new(15.0, 5.0)));
        s.handle(PointerEvent::Leave);
        assert!(!s.is_drawing());

        let before = s.canvas().clone();
        s.handle(PointerEvent::Move(Point::new(15.0, 25.0)));
        assert_eq!(s.canvas(), &before);
    }

    #[test]
    fn test_stroke_uses_current_color_and_scale() {
        let mut s = DrawingSurface::new(20.0, 20.0, 2.0);
        s.set_color(PenColor::Green);
        stroke(&mut s, (5.0, 10.0), (15.0, 10.0));

        // logical (10, 10) is raster (20, 20)
        assert_eq!(s.canvas().get_pixel(20, 20), Some(PenColor::Green.color32()));
        assert_eq!(s.canvas().get_pixel(20, 2), Some(Color32::WHITE));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut s = surface();
        stroke(&mut s, (5.0, 5.0), (10.0, 5.0));
        stroke(&mut s, (5.0, 15.0), (10.0, 15.0));

        s.clear();
        assert!(!s.has_content());
        assert_eq!(s.history_len(), 0);
        assert!(s.canvas().is_blank());
    }

    #[test]
    fn test_undo_on_empty_history_clears() {
        let mut s = surface();
        s.undo();
        assert!(!s.has_content());
        assert!(s.canvas().is_blank());
    }

    #[test]
    fn test_single_stroke_then_undo() {
        let mut s = surface();
        stroke(&mut s, (5.0, 5.0), (20.0, 5.0));
        assert!(s.has_content());

        s.undo();
        assert!(!s.has_content());
        assert!(s.canvas().is_blank());
    }

    #[test]
    fn test_undo_restores_state_after_first_stroke() {
        let mut s = surface();
        stroke(&mut s, (5.0, 5.0), (20.0, 5.0));
        let after_first = s.canvas().clone();
        stroke(&mut s, (5.0, 20.0), (20.0, 20.0));
        assert_ne!(s.canvas(), &after_first);

        s.undo();
        assert_eq!(s.canvas(), &after_first);
        assert!(s.has_content());
    }

    #[test]
    fn test_extra_undo_stays_blank() {
        let mut s = surface();
        for y in [5.0, 10.0, 15.0] {
            stroke(&mut s, (5.0, y), (20.0, y));
        }
        for _ in 0..3 {
            s.undo();
        }
        assert!(s.canvas().is_blank());
        assert!(!s.has_content());

        s.undo();
        assert!(s.canvas().is_blank());
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn test_export_after_undo_matches_snapshot() {
        let mut s = surface();
        s.set_color(PenColor::Red);
        stroke(&mut s, (5.0, 5.0), (30.0, 25.0));
        let snapshot = s.canvas().clone();
        stroke(&mut s, (5.0, 25.0), (30.0, 5.0));
        s.undo();

        let png = s.export_image().unwrap();
        let decoded = image::load_from_memory(png.bytes()).unwrap().to_rgba8();
        assert_eq!(decoded.into_raw(), snapshot.to_rgba_bytes());
    }

    #[test]
    fn test_export_of_cleared_surface_is_blank() {
        let mut s = DrawingSurface::new(12.0, 8.0, 2.0);
        stroke(&mut s, (1.0, 1.0), (10.0, 6.0));
        s.clear();

        let png = s.export_image().unwrap();
        let decoded = image::load_from_memory(png.bytes()).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (24, 16));
        assert!(decoded.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_history_is_capped() {
        let mut s = surface();
        for i in 0..(MAX_UNDO_STATES + 5) {
            let y = (i % 30) as f32;
            stroke(&mut s, (0.0, y), (39.0, y));
        }
        assert_eq!(s.history_len(), MAX_UNDO_STATES);
    }

    #[test]
    fn test_oldest_snapshot_is_evicted() {
        let mut s = surface();
        // the first snapshot (blank) is the one that goes
        for i in 0..=MAX_UNDO_STATES {
            let y = i as f32;
            stroke(&mut s, (0.0, y), (39.0, y));
        }
        for _ in 0..MAX_UNDO_STATES {
            s.undo();
        }
        assert!(!s.canvas().is_blank());
        assert!(!s.has_content());
    }

    #[test]
    fn test_revision_moves_on_raster_changes() {
        let mut s = surface();
        let r0 = s.revision();
        s.begin_stroke(Point::new(1.0, 1.0));
        assert_eq!(s.revision(), r0);
        s.extend_stroke(Point::new(5.0, 5.0));
        assert!(s.revision() > r0);
    }

    #[test]
    fn test_mouse_coordinates_are_made_local() {
        let origin = ScreenOrigin {
            left: 100.0,
            top: 50.0,
        };
        let input = PointerInput::Mouse {
            client_x: 130.0,
            client_y: 75.5,
        };
        assert_eq!(origin.to_local(&input), Some(Point::new(30.0, 25.5)));
    }

    #[test]
    fn test_only_first_touch_is_used() {
        let origin = ScreenOrigin {
            left: 10.0,
            top: 10.0,
        };
        let touches = [Point::new(20.0, 30.0), Point::new(200.0, 300.0)];
        assert_eq!(
            origin.to_local(&PointerInput::Touch(&touches)),
            Some(Point::new(10.0, 20.0))
        );
        assert_eq!(origin.to_local(&PointerInput::Touch(&[])), None);
    }
}
