//! sketch-ui: the Magic Sketch front end.
//!
//! Design rules:
//! - The drawing surface owns its raster and undo history; the shell never touches pixels.
//! - The shell talks to the model only through the `sketch-ai` traits.
//! - Speech and rendering are capabilities handed in by the caller.

pub mod canvas_view;
pub mod config;
pub mod editor;
pub mod logging;
pub mod presentation;
pub mod replay;
pub mod shell;
pub mod speech;

pub use config::AppConfig;
pub use presentation::ResultPresentation;
pub use shell::{Notice, ProcessingFlag, View, ViewShell};
