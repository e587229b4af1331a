use crate::schedule::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Subtract `amount` from every channel, stopping at 0.
    pub fn darken(self, amount: u8) -> Rgb {
        Rgb(
            self.0.saturating_sub(amount),
            self.1.saturating_sub(amount),
            self.2.saturating_sub(amount),
        )
    }

    /// Channels scaled to 0.0..=1.0
    pub fn unit(self) -> [f32; 3] {
        [self.0 as f32 / 255.0, self.1 as f32 / 255.0, self.2 as f32 / 255.0]
    }
}

/// Color for kinds outside the category set.
pub const FALLBACK_COLOR: Rgb = Rgb(200, 200, 200);

pub fn category_color(category: Option<Category>) -> Rgb {
    match category {
        Some(Category::FreeTime) => Rgb(39, 174, 96),     // green
        Some(Category::Busy) => Rgb(231, 76, 60),         // red
        Some(Category::Meeting) => Rgb(52, 152, 219),     // blue
        Some(Category::Work) => Rgb(155, 89, 182),        // purple
        Some(Category::Personal) => Rgb(243, 156, 18),    // orange
        None => FALLBACK_COLOR,
    }
}

/// Chrome colors shared by the grid renderers.
pub struct Palette;

impl Palette {
    pub const HEADER: Rgb = Rgb(44, 62, 80);
    pub const SUBTITLE: Rgb = Rgb(127, 140, 141);
    pub const SLOT: Rgb = Rgb(248, 249, 250);
    pub const SLOT_ALT: Rgb = Rgb(241, 243, 244);
    pub const SLOT_TEXT: Rgb = Rgb(108, 117, 125);
    pub const GRID_LINE: Rgb = Rgb(233, 236, 239);
    pub const FRAME: Rgb = Rgb(150, 150, 150);
    pub const CONTAINER: Rgb = Rgb(200, 200, 200);
    /// Outline of the cell matching the current time.
    pub const NOW: Rgb = Rgb(52, 152, 219);

    /// Background of a row, alternating by parity.
    pub fn slot_background(slot: usize) -> Rgb {
        if slot % 2 == 0 {
            Self::SLOT
        } else {
            Self::SLOT_ALT
        }
    }
}
