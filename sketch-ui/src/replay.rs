// Scripted drawing: a JSON list of actions replayed onto a drawing surface.
//
// [
//   {"action": "stroke", "color": "red", "points": [[10, 10], [40, 60]]},
//   {"action": "undo"},
//   {"action": "clear"}
// ]

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::editor::{DrawingSurface, PenColor, Point, PointerEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SketchAction {
    /// Points are logical, canvas-local coordinates.
    Stroke {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<PenColor>,
        points: Vec<[f32; 2]>,
    },
    Undo,
    Clear,
}

pub fn load_actions(path: &Path) -> Result<Vec<SketchAction>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read sketch script: {}", path.display()))?;
    let actions: Vec<SketchAction> =
        serde_json::from_str(&data).context("parse sketch script json")?;
    info!("Loaded {} sketch actions from {}", actions.len(), path.display());
    Ok(actions)
}

/// Feed the actions to `surface` as pointer events.
pub fn replay(surface: &mut DrawingSurface, actions: &[SketchAction]) {
    for action in actions {
        match action {
            SketchAction::Stroke { color, points } => {
                if let Some(color) = color {
                    surface.set_color(*color);
                }
                let mut points = points.iter().map(|[x, y]| Point::new(*x, *y));
                let Some(first) = points.next() else {
                    debug!("Skipping stroke without points");
                    continue;
                };
                surface.handle(PointerEvent::Down(first));
                for point in points {
                    surface.handle(PointerEvent::Move(point));
                }
                surface.handle(PointerEvent::Up);
            }
            SketchAction::Undo => surface.undo(),
            SketchAction::Clear => surface.clear(),
        }
    }
}
