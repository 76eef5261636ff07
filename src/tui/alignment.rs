//! Placement of a child with a natural size inside a larger allocation.
//!
//! `xalign`/`yalign` position the child (0.0 = start, 1.0 = end) and
//! `xscale`/`yscale` decide how much of the spare space it grows into
//! (0.0 = natural size, 1.0 = fill).

use ratatui::layout::{Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub xalign: f32,
    pub yalign: f32,
    pub xscale: f32,
    pub yscale: f32,
}

impl Alignment {
    pub const fn new(xalign: f32, yalign: f32, xscale: f32, yscale: f32) -> Self {
        Self {
            xalign,
            yalign,
            xscale,
            yscale,
        }
    }

    /// Rectangle the child occupies inside `area`.
    pub fn place(&self, child: Size, area: Rect) -> Rect {
        let (x, width) = Self::axis(area.x, area.width, child.width, self.xalign, self.xscale);
        let (y, height) = Self::axis(area.y, area.height, child.height, self.yalign, self.yscale);
        Rect::new(x, y, width, height)
    }

    fn axis(start: u16, available: u16, natural: u16, align: f32, scale: f32) -> (u16, u16) {
        let natural = natural.min(available);
        let spare = available - natural;
        let size = natural + (f32::from(spare) * scale.clamp(0.0, 1.0)).round() as u16;
        let size = size.min(available);
        let offset = (f32::from(available - size) * align.clamp(0.0, 1.0)).round() as u16;
        (start + offset, size)
    }
}
