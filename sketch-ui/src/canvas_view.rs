// egui widget for the drawing surface.
// Turns egui pointer input into surface events and shows the raster as a texture.

use egui::{pos2, Color32, ColorImage, Pos2, Rect, Response, Sense, TextureHandle, TextureOptions, Ui, Vec2};
use tracing::trace;

use crate::editor::{DrawingSurface, PenColor, PointerEvent, PointerInput, ScreenOrigin};

/// Pointer state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    /// Screen position, if there is a pointer at all.
    pub pos: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
    /// Whether `pos` is over the surface.
    pub inside: bool,
}

/// Surface events for one frame of pointer input over a surface at `origin`.
pub fn pointer_events(sample: &PointerSample, origin: Pos2, drawing: bool) -> Vec<PointerEvent> {
    let origin = ScreenOrigin {
        left: origin.x,
        top: origin.y,
    };
    let local = sample.pos.and_then(|p| {
        origin.to_local(&PointerInput::Mouse {
            client_x: p.x,
            client_y: p.y,
        })
    });

    let mut events = Vec::new();
    let mut drawing = drawing;
    if sample.pressed && sample.inside {
        if let Some(point) = local {
            events.push(PointerEvent::Down(point));
            drawing = true;
        }
    } else if drawing {
        if !sample.inside {
            events.push(PointerEvent::Leave);
            return events;
        }
        if let Some(point) = local {
            events.push(PointerEvent::Move(point));
        }
    }

    if sample.released && drawing {
        events.push(PointerEvent::Up);
    }
    events
}

/// A surface of `size` points whose raster matches the display's pixel density.
pub fn surface_for_display(ctx: &egui::Context, size: Vec2) -> DrawingSurface {
    DrawingSurface::new(size.x, size.y, ctx.pixels_per_point())
}

/// Keeps the GPU copy of the raster in sync with the surface.
#[derive(Default)]
pub struct CanvasView {
    texture: Option<TextureHandle>,
    uploaded_revision: Option<u64>,
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut Ui, surface: &mut DrawingSurface) -> Response {
        let (width, height) = surface.logical_size();
        let (response, painter) = ui.allocate_painter(Vec2::new(width, height), Sense::drag());
        let rect = response.rect;

        let (pos, pressed, released) = ui.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
            )
        });
        let sample = PointerSample {
            pos,
            pressed,
            released,
            inside: pos.is_some_and(|p| rect.contains(p)),
        };
        for event in pointer_events(&sample, rect.min, surface.is_drawing()) {
            trace!("Canvas event {:?}", event);
            surface.handle(event);
        }

        self.upload(ui, surface);
        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
        response
    }

    fn upload(&mut self, ui: &Ui, surface: &DrawingSurface) {
        let revision = surface.revision();
        if self.texture.is_some() && self.uploaded_revision == Some(revision) {
            return;
        }

        let canvas = surface.canvas();
        let image = ColorImage::from_rgba_unmultiplied(
            [canvas.width() as usize, canvas.height() as usize],
            &canvas.to_rgba_bytes(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ui.ctx().load_texture(
                    "magic-sketch-canvas",
                    image,
                    TextureOptions::LINEAR,
                ))
            }
        }
        self.uploaded_revision = Some(revision);
    }
}

/// Palette swatches plus undo and clear.
pub fn toolbar(ui: &mut Ui, surface: &mut DrawingSurface) {
    ui.horizontal(|ui| {
        for color in PenColor::PALETTE {
            let swatch = egui::Button::new("   ")
                .fill(color.color32())
                .selected(surface.style().color == color);
            if ui.add(swatch).on_hover_text(color.name()).clicked() {
                surface.set_color(color);
            }
        }
        ui.separator();
        if ui.button("Undo").clicked() {
            surface.undo();
        }
        if ui.button("Clear").clicked() {
            surface.clear();
        }
    });
}
