//! # ContactInfo Component
//!
//! Side panel with two avatar slots: `first` (the conversation partner,
//! anchored to the top of its cell) and `last` (the local user, anchored to
//! the bottom).
//!
//! Every assignment wraps the new image in a fresh [`Alignment`], removes the
//! slot's previous wrapper from the packing order and appends the new one.
//! Packed children share the panel height equally, in packing order.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect, Size};

use crate::tui::alignment::Alignment;
use crate::tui::component::{Component, Packable};
use crate::tui::images::Image;

const FIRST_ALIGNMENT: Alignment = Alignment::new(0.5, 0.0, 1.0, 0.1);
const LAST_ALIGNMENT: Alignment = Alignment::new(0.5, 1.0, 1.0, 0.1);

/// Columns of padding on each side of the avatars.
const SIDE_PADDING: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Last,
}

#[derive(Debug, Clone)]
struct Packed {
    slot: Slot,
    alignment: Alignment,
}

#[derive(Debug, Clone, Default)]
pub struct ContactInfo {
    first: Option<Image>,
    last: Option<Image>,
    children: Vec<Packed>,
}

impl ContactInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the partner avatar, replacing any previous one.
    pub fn set_first(&mut self, image: Image) {
        self.first = Some(image);
        self.repack(Slot::First, FIRST_ALIGNMENT);
    }

    /// Set the local user's avatar, replacing any previous one.
    pub fn set_last(&mut self, image: Image) {
        self.last = Some(image);
        self.repack(Slot::Last, LAST_ALIGNMENT);
    }

    pub fn first(&self) -> Option<&Image> {
        self.first.as_ref()
    }

    pub fn last(&self) -> Option<&Image> {
        self.last.as_ref()
    }

    /// Slots in packing order (top to bottom).
    pub fn packing_order(&self) -> Vec<Slot> {
        self.children.iter().map(|p| p.slot).collect()
    }

    fn repack(&mut self, slot: Slot, alignment: Alignment) {
        self.children.retain(|p| p.slot != slot);
        self.children.push(Packed { slot, alignment });
    }

    fn image(&self, slot: Slot) -> Option<&Image> {
        match slot {
            Slot::First => self.first.as_ref(),
            Slot::Last => self.last.as_ref(),
        }
    }

    /// Where each packed slot's image goes inside `area`.
    fn placements(&self, area: Rect) -> Vec<(Slot, Rect)> {
        if self.children.is_empty() {
            return Vec::new();
        }
        let inner = Rect {
            x: area.x + SIDE_PADDING.min(area.width),
            width: area.width.saturating_sub(SIDE_PADDING * 2),
            ..area
        };
        let constraints = vec![Constraint::Fill(1); self.children.len()];
        let cells = Layout::vertical(constraints).split(inner);

        self.children
            .iter()
            .zip(cells.iter())
            .filter_map(|(packed, cell)| {
                let image = self.image(packed.slot)?;
                Some((packed.slot, packed.alignment.place(image.natural_size(), *cell)))
            })
            .collect()
    }
}

impl Component for ContactInfo {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        for (slot, rect) in self.placements(area) {
            let image = match slot {
                Slot::First => self.first.as_mut(),
                Slot::Last => self.last.as_mut(),
            };
            if let Some(image) = image {
                image.render(frame, rect);
            }
        }
    }
}

impl Packable for ContactInfo {
    fn natural_size(&self) -> Size {
        let images = [self.first.as_ref(), self.last.as_ref()];
        let sizes = images.iter().flatten().map(|i| i.natural_size());
        let (width, height) = sizes.fold((0u16, 0u16), |(w, h), s| (w.max(s.width), h + s.height));
        if width == 0 {
            return Size::new(0, 0);
        }
        Size::new(width + SIDE_PADDING * 2, height)
    }
}
