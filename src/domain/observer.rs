//! Change notification interface for the presentation layer.

use generational_arena::Index;

use crate::domain::entities::TriState;

/// Receives per-node change notifications, fired synchronously.
///
/// Both methods default to doing nothing, so an observer only overrides what it needs.
pub trait SelectionObserver {
    fn on_state_changed(&mut self, _node: Index, _caption: &str, _state: TriState) {}

    fn on_caption_changed(&mut self, _node: Index, _caption: &str) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SelectionObserver for NoopObserver {}
