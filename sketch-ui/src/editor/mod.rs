// Editor module: the freehand drawing surface and its parts.

pub mod canvas;
pub mod export;
pub mod history;
pub mod surface;
pub mod tools;

pub use canvas::Canvas;
pub use export::{encode_png, ExportError};
pub use history::{History, MAX_UNDO_STATES};
pub use surface::{DrawingSurface, MAX_RASTER_SIDE, Point, PointerEvent, PointerInput, ScreenOrigin};
pub use tools::{Pen, PenColor, StrokeStyle, UnknownColor, LINE_WIDTH};
