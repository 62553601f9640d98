// Undo history for the drawing surface.
// Whole-canvas snapshots, bounded; the oldest one is dropped when full.

use crate::editor::Canvas;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// How many snapshots the drawing surface keeps.
pub const MAX_UNDO_STATES: usize = 20;

#[derive(Debug, Clone)]
pub struct History {
    states: VecDeque<Canvas>,
    max_states: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_STATES)
    }
}

impl History {
    pub fn new(max_states: usize) -> Self {
        let max_states = max_states.max(1);
        Self {
            states: VecDeque::with_capacity(max_states),
            max_states,
        }
    }

    /// Append a snapshot, evicting the oldest one first when full.
    pub fn push(&mut self, snapshot: Canvas) {
        if self.states.len() >= self.max_states {
            self.states.pop_front();
            debug!("Undo history full, dropped oldest snapshot");
        }
        self.states.push_back(snapshot);
        trace!("Undo history now holds {} snapshots", self.states.len());
    }

    /// Take the most recent snapshot.
    pub fn pop(&mut self) -> Option<Canvas> {
        self.states.pop_back()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn oldest(&self) -> Option<&Canvas> {
        self.states.front()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn max_states(&self) -> usize {
        self.max_states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn marked(i: u32) -> Canvas {
        let mut canvas = Canvas::blank(32, 1);
        canvas.set_pixel(i, 0, Color32::BLACK);
        canvas
    }

    #[test]
    fn test_push_pop_is_lifo() {
        let mut history = History::default();
        history.push(marked(0));
        history.push(marked(1));

        assert_eq!(history.pop(), Some(marked(1)));
        assert_eq!(history.pop(), Some(marked(0)));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn test_bounded_drops_oldest() {
        let mut history = History::default();
        for i in 0..=MAX_UNDO_STATES as u32 {
            history.push(marked(i));
        }

        assert_eq!(history.len(), MAX_UNDO_STATES);
        assert_eq!(history.oldest(), Some(&marked(1)));
        assert_eq!(history.pop(), Some(marked(MAX_UNDO_STATES as u32)));
    }

    #[test]
    fn test_zero_capacity_is_bumped_to_one() {
        let mut history = History::new(0);
        history.push(marked(0));
        history.push(marked(1));
        assert_eq!(history.max_states(), 1);
        assert_eq!(history.pop(), Some(marked(1)));
        assert!(history.is_empty());
    }
}
