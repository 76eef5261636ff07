use ratatui::Frame;
use ratatui::layout::{Rect, Size};

use crate::tui::components::TabLabel;

/// A reusable UI component.
///
/// Components in this architecture follow the React pattern:
/// - They receive data via props (struct fields or method parameters).
/// - They may hold internal state (scroll offsets, one-shot layout flags).
/// - They render to a `Frame` within a given `Rect`.
///
/// # Mutability
///
/// The `render` method takes `&mut self` to allow components to:
/// 1. Update internal caches (e.g. content height).
/// 2. Manage presentation state (e.g. scroll offsets) during rendering.
///
/// This aligns with Ratatui's `StatefulWidget` pattern.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}

/// A component that can live in a tab container.
pub trait TabPage: Component {
    fn tab_label(&self) -> &TabLabel;
}

/// A component with a natural size, which a parent container may place with
/// an [`Alignment`](crate::tui::alignment::Alignment).
pub trait Packable: Component {
    fn natural_size(&self) -> Size;
}
