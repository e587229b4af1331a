//! Drawing primitives the page exporter needs.
//!
//! Coordinates are millimetres from the top-left corner of the page; text
//! `y` is the baseline. Backends translate into their own space.

use crate::render::Rgb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Shrink on every side.
    pub fn inset(self, by: f32) -> Self {
        Self::new(self.x + by, self.y + by, (self.w - 2.0 * by).max(0.0), (self.h - 2.0 * by).max(0.0))
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    /// Millimetres
    pub width: f32,
    /// (dash, gap) in millimetres
    pub dash: Option<(f32, f32)>,
}

impl Stroke {
    pub fn solid(color: Rgb, width: f32) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Rgb, width: f32, dash: f32, gap: f32) -> Self {
        Self { color, width, dash: Some((dash, gap)) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Points
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
    pub align: Align,
}

impl TextStyle {
    pub fn new(size: f32, color: Rgb) -> Self {
        Self { size, bold: false, color, align: Align::Left }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }
}

pub trait DrawingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke);

    fn rounded_rect(&mut self, rect: Rect, radius: f32, fill: Rgb, stroke: Stroke);

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);
}

#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Fill(Rect, Rgb),
        Stroke(Rect, Stroke),
        Rounded(Rect, f32, Rgb, Stroke),
        Text(String, f32, f32, TextStyle),
    }

    /// Keeps every call so tests can inspect what a page would contain.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub ops: Vec<DrawOp>,
    }

    impl RecordingSurface {
        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text(text, ..) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn text_op(&self, wanted: &str) -> Option<(f32, f32, TextStyle)> {
            self.ops.iter().find_map(|op| match op {
                DrawOp::Text(text, x, y, style) if text == wanted => Some((*x, *y, *style)),
                _ => None,
            })
        }

        pub fn rounded(&self) -> Vec<(Rect, Rgb)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Rounded(rect, _, fill, _) => Some((*rect, *fill)),
                    _ => None,
                })
                .collect()
        }

        pub fn position(&self, pred: impl Fn(&DrawOp) -> bool) -> Option<usize> {
            self.ops.iter().position(pred)
        }
    }

    impl DrawingSurface for RecordingSurface {
        fn fill_rect(&mut self, rect: Rect, color: Rgb) {
            self.ops.push(DrawOp::Fill(rect, color));
        }

        fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) {
            self.ops.push(DrawOp::Stroke(rect, stroke));
        }

        fn rounded_rect(&mut self, rect: Rect, radius: f32, fill: Rgb, stroke: Stroke) {
            self.ops.push(DrawOp::Rounded(rect, radius, fill, stroke));
        }

        fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
            self.ops.push(DrawOp::Text(text.to_string(), x, y, style));
        }
    }
}
